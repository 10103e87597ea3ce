//! PostgreSQL implementations of the ShareKit collaborators.

pub mod contact;
pub mod directory;
pub mod scan_queue;
pub mod share;

pub use contact::ContactRepository;
pub use directory::DirectoryRepository;
pub use scan_queue::ScanQueueRepository;
pub use share::ShareRepository;

/// Build an `ILIKE` pattern matching `query` anywhere, with `%`, `_` and
/// `\` taken literally.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("bob"), "%bob%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
        assert_eq!(contains_pattern(""), "%%");
    }
}
