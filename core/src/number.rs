//! Numeric token decoding with byte-multiplier suffixes and hex literals.
//!
//! Dumping tools accept sizes such as `20k`, `8q` or `0x1F`. A single
//! trailing suffix letter scales the number:
//!
//! | Suffix | Factor        |
//! |--------|---------------|
//! | `c`    | 1             |
//! | `w`    | 2             |
//! | `d`    | 4             |
//! | `q`    | 8             |
//! | `k`    | 1024          |
//! | `M`    | 1024 × 1024   |
//! | `G`    | 1024 × 1024 × 1024 |
//!
//! The suffix is stripped first; the remaining text is parsed as decimal,
//! and only when that fails as hexadecimal (with an optional `0x`/`0X`
//! prefix removed).
//!
//! # Examples
//!
//! ```
//! use dump_params_core::decode_number;
//!
//! assert_eq!(decode_number("20k"), Some(20 * 1024));
//! assert_eq!(decode_number("8q"), Some(64));
//! assert_eq!(decode_number("0x1F"), Some(31));
//! assert_eq!(decode_number("20"), Some(20));
//! assert_eq!(decode_number("bogus"), None);
//! ```

/// Returns the scale factor for a multiplier suffix character.
pub fn multiplier_factor(suffix: char) -> Option<i64> {
    match suffix {
        'c' => Some(1),
        'w' => Some(2),
        'd' => Some(4),
        'q' => Some(8),
        'k' => Some(1024),
        'M' => Some(1024 * 1024),
        'G' => Some(1024 * 1024 * 1024),
        _ => None,
    }
}

/// Splits a trimmed numeric token into its digits and multiplier.
///
/// A token with no recognized trailing suffix is returned whole with a
/// factor of 1.
pub fn split_multiplier(text: &str) -> (&str, i64) {
    let Some(last) = text.chars().last() else {
        return (text, 1);
    };
    match multiplier_factor(last) {
        Some(factor) => (&text[..text.len() - last.len_utf8()], factor),
        None => (text, 1),
    }
}

/// Decodes a raw numeric token into its final value.
///
/// Returns `None` when neither the decimal nor the hexadecimal reading of
/// the suffix-stripped text is valid, or when scaling overflows `i64`.
pub fn decode_number(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (digits, factor) = split_multiplier(trimmed);
    let base = match digits.parse::<i64>() {
        Ok(value) => value,
        Err(_) => parse_hex(digits)?,
    };
    base.checked_mul(factor)
}

fn parse_hex(text: &str) -> Option<i64> {
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if hex.is_empty() {
        return None;
    }
    i64::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_decimal() {
        assert_eq!(decode_number("20"), Some(20));
        assert_eq!(decode_number("  -5 "), Some(-5));
    }

    #[test]
    fn test_every_suffix_is_stripped() {
        assert_eq!(decode_number("3c"), Some(3));
        assert_eq!(decode_number("3w"), Some(6));
        assert_eq!(decode_number("3d"), Some(12));
        assert_eq!(decode_number("8q"), Some(64));
        assert_eq!(decode_number("20k"), Some(20 * 1024));
        assert_eq!(decode_number("2M"), Some(2 * 1024 * 1024));
        assert_eq!(decode_number("1G"), Some(1024 * 1024 * 1024));
    }

    #[test]
    fn test_suffixes_are_case_sensitive() {
        // `K` is not a multiplier and is not a hex digit either.
        assert_eq!(decode_number("20K"), None);
        // `m` is not a multiplier.
        assert_eq!(decode_number("2m"), None);
    }

    #[test]
    fn test_hex_fallback() {
        assert_eq!(decode_number("0x1F"), Some(31));
        assert_eq!(decode_number("0X10"), Some(16));
        assert_eq!(decode_number("ff"), Some(255));
        assert_eq!(decode_number("0x10k"), Some(16 * 1024));
    }

    #[test]
    fn test_decimal_wins_over_hex() {
        // "10" is valid in both bases; decimal is tried first.
        assert_eq!(decode_number("10"), Some(10));
    }

    #[test]
    fn test_unknown_trailing_letter_keeps_text() {
        // `F` is not a suffix, so the whole token falls through to hex.
        assert_eq!(decode_number("1F"), Some(31));
        assert_eq!(decode_number("12z"), None);
    }

    #[test]
    fn test_rejects_empty_and_bare_prefix() {
        assert_eq!(decode_number(""), None);
        assert_eq!(decode_number("k"), None);
        assert_eq!(decode_number("0x"), None);
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(decode_number("9223372036854775807G"), None);
    }

    #[test]
    fn test_split_multiplier() {
        assert_eq!(split_multiplier("20k"), ("20", 1024));
        assert_eq!(split_multiplier("20"), ("20", 1));
        assert_eq!(split_multiplier(""), ("", 1));
    }
}
