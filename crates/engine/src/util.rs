use unicode_normalization::UnicodeNormalization;

/// Canonical form of an email address: NFKC, trimmed, lowercased.
///
/// Normalization happens at write time (registration) as well as on every
/// lookup input, so address matching is plain string equality.
pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().nfkc().collect::<String>().to_lowercase()
}

pub(crate) fn normalize_coin(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn email_is_unicode_normalized() {
        // U+FF41 fullwidth 'a' folds to plain 'a' under NFKC.
        assert_eq!(normalize_email("\u{ff41}@b.com"), "a@b.com");
    }

    #[test]
    fn coin_symbol_is_uppercased() {
        assert_eq!(normalize_coin(" btc "), "BTC");
    }
}
