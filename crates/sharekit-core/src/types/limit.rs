//! Result-count limits for recipient searches.

use serde::{Deserialize, Serialize};

/// Absolute ceiling on a single search, whatever the configuration says.
pub const MAX_RESULT_LIMIT: usize = 500;

/// The effective number of candidates a search may return.
///
/// A missing or zero request falls back to the configured default; anything
/// above the configured ceiling, or above [`MAX_RESULT_LIMIT`], is clamped
/// down to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultLimit(usize);

impl ResultLimit {
    /// Resolve the requested limit against a default and a ceiling.
    pub fn resolve(requested: Option<usize>, default: usize, ceiling: usize) -> Self {
        let wanted = match requested {
            Some(0) | None => default,
            Some(n) => n,
        };
        Self(wanted.min(ceiling.min(MAX_RESULT_LIMIT)))
    }

    /// Return the limit value.
    pub fn get(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_missing_or_zero() {
        assert_eq!(ResultLimit::resolve(None, 15, 500).get(), 15);
        assert_eq!(ResultLimit::resolve(Some(0), 15, 500).get(), 15);
    }

    #[test]
    fn test_clamped_to_ceiling() {
        assert_eq!(ResultLimit::resolve(Some(1000), 15, 500).get(), 500);
        assert_eq!(ResultLimit::resolve(Some(40), 15, 500).get(), 40);
    }

    #[test]
    fn test_configured_ceiling_cannot_exceed_max() {
        assert_eq!(ResultLimit::resolve(Some(1000), 15, 5000).get(), MAX_RESULT_LIMIT);
        assert_eq!(ResultLimit::resolve(None, 800, 5000).get(), MAX_RESULT_LIMIT);
        assert_eq!(ResultLimit::resolve(Some(1000), 15, 100).get(), 100);
    }
}
