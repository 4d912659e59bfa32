use std::cmp::Ordering;

/// Case-insensitive substring check.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive ordering, matching SQLite's NOCASE collation closely
/// enough for display purposes.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Lemon Cake", "CAKE"));
        assert!(contains_ignore_case("Lemon Cake", "lemon c"));
        assert!(!contains_ignore_case("Lemon Cake", "pie"));
        assert!(contains_ignore_case("anything", ""));
    }

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("apple", "Banana"), Ordering::Less);
        assert_eq!(cmp_ignore_case("Apple", "apple"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("zucchini", "Apple"), Ordering::Greater);
    }
}
