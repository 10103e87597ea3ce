//! Textual relevance ordering of recipient candidates.

use sharekit_entity::candidate::Candidate;

/// How closely a label matches the query. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// Label equals the query, ignoring case.
    Exact,
    /// Label starts with the query.
    Prefix,
    /// Label contains the query somewhere else.
    Contains,
    /// Label does not contain the query.
    Unrelated,
}

/// Orders candidates by how well their label matches a query.
#[derive(Debug, Clone)]
pub struct RelevanceRanker {
    query: String,
}

impl RelevanceRanker {
    /// Create a ranker for `query`. Matching ignores case.
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_lowercase(),
        }
    }

    /// Classify a label against the query.
    pub fn tier(&self, label: &str) -> MatchTier {
        let label = label.to_lowercase();
        if label == self.query {
            MatchTier::Exact
        } else if label.starts_with(&self.query) {
            MatchTier::Prefix
        } else if label.contains(&self.query) {
            MatchTier::Contains
        } else {
            MatchTier::Unrelated
        }
    }

    /// Sort key: tier, character position of the first match, lowercase label.
    fn key(&self, candidate: &Candidate) -> (MatchTier, usize, String) {
        let label = candidate.label.to_lowercase();
        let position = label
            .find(&self.query)
            .map(|byte| label[..byte].chars().count())
            .unwrap_or(usize::MAX);
        (self.tier(&candidate.label), position, label)
    }

    /// Sort candidates in place. Equal keys keep their input order.
    pub fn rank(&self, candidates: &mut [Candidate]) {
        candidates.sort_by_cached_key(|candidate| self.key(candidate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_exact_then_prefix_then_contains() {
        let ranker = RelevanceRanker::new("an");
        let mut candidates = vec![
            Candidate::user("banana", "banana"),
            Candidate::user("anna", "anna"),
            Candidate::user("an", "an"),
        ];
        ranker.rank(&mut candidates);
        assert_eq!(labels(&candidates), vec!["an", "anna", "banana"]);
    }

    #[test]
    fn test_tiers_ignore_case() {
        let ranker = RelevanceRanker::new("An");
        assert_eq!(ranker.tier("AN"), MatchTier::Exact);
        assert_eq!(ranker.tier("Anna"), MatchTier::Prefix);
        assert_eq!(ranker.tier("Banana"), MatchTier::Contains);
        assert_eq!(ranker.tier("Bob"), MatchTier::Unrelated);
    }

    #[test]
    fn test_earlier_match_position_wins_within_tier() {
        let ranker = RelevanceRanker::new("an");
        let mut candidates = vec![
            Candidate::group("xxxan"),
            Candidate::group("xan"),
            Candidate::group("zz"),
        ];
        ranker.rank(&mut candidates);
        assert_eq!(labels(&candidates), vec!["xan", "xxxan", "zz"]);
    }

    #[test]
    fn test_equal_labels_keep_input_order() {
        let ranker = RelevanceRanker::new("bob");
        let mut candidates = vec![
            Candidate::user("bob-2", "Bob"),
            Candidate::group("bob"),
            Candidate::user("bob-1", "Bob"),
        ];
        ranker.rank(&mut candidates);
        let ids: Vec<&str> = candidates.iter().map(|c| c.recipient_id.as_str()).collect();
        assert_eq!(ids, vec!["bob-2", "bob", "bob-1"]);
    }
}
