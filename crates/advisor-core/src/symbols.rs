//! Ticker symbol normalization.

/// Longest symbol accepted, including share-class suffixes such as `BRK.B`.
const MAX_SYMBOL_LEN: usize = 12;

/// Normalize a raw ticker symbol for lookup and storage.
///
/// Trims whitespace, strips a leading `$` cashtag marker and uppercases the
/// rest. Returns `None` when nothing usable remains or the symbol contains
/// characters other than ASCII alphanumerics, `.` and `-`.
#[must_use]
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);

    if trimmed.is_empty() || trimmed.len() > MAX_SYMBOL_LEN {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return None;
    }
    if !trimmed.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(trimmed.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_is_uppercased() {
        assert_eq!(normalize_symbol("aapl").as_deref(), Some("AAPL"));
    }

    #[test]
    fn surrounding_whitespace_and_cashtag_are_stripped() {
        assert_eq!(normalize_symbol("  $tsla ").as_deref(), Some("TSLA"));
    }

    #[test]
    fn share_class_suffix_is_kept() {
        assert_eq!(normalize_symbol("brk.b").as_deref(), Some("BRK.B"));
    }

    #[test]
    fn hyphen_and_leading_digit_are_accepted() {
        assert_eq!(normalize_symbol("rds-a").as_deref(), Some("RDS-A"));
        assert_eq!(normalize_symbol("7203.t").as_deref(), Some("7203.T"));
        assert_eq!(normalize_symbol("-AAPL"), None);
    }

    #[test]
    fn twelve_characters_is_the_limit() {
        assert_eq!(normalize_symbol("ABCDEFGHIJKL").as_deref(), Some("ABCDEFGHIJKL"));
    }

    #[test]
    fn empty_and_bare_cashtag_are_rejected() {
        assert_eq!(normalize_symbol(""), None);
        assert_eq!(normalize_symbol("   "), None);
        assert_eq!(normalize_symbol("$"), None);
    }

    #[test]
    fn embedded_spaces_and_symbols_are_rejected() {
        assert_eq!(normalize_symbol("AA PL"), None);
        assert_eq!(normalize_symbol("AAPL!"), None);
        assert_eq!(normalize_symbol(".AAPL"), None);
    }

    #[test]
    fn overlong_symbol_is_rejected() {
        assert_eq!(normalize_symbol("ABCDEFGHIJKLM"), None);
    }
}
