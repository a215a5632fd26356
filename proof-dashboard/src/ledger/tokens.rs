//! e8s amounts and their display form.
//!
//! All arithmetic is integer-only so balances above 2^53 e8s render exactly.

/// Smallest units per whole token
pub const E8S_PER_TOKEN: u64 = 100_000_000;

/// Number of fractional digits in a display amount
pub const DISPLAY_DECIMALS: usize = 8;

/// What a zero (or unavailable) balance renders as
pub const ZERO_DISPLAY_AMOUNT: &str = "0.00000000";

/// Render `e8s` as a whole-token amount with exactly 8 fractional digits.
pub fn format_e8s(e8s: u64) -> String {
    let whole = e8s / E8S_PER_TOKEN;
    let fraction = e8s % E8S_PER_TOKEN;
    format!("{whole}.{fraction:0width$}", width = DISPLAY_DECIMALS)
}

/// Parse a display amount back into e8s.
///
/// Accepts an optional fractional part of up to 8 digits; anything that is
/// not a plain non-negative decimal, or overflows `u64`, yields `None`.
pub fn parse_display_amount(amount: &str) -> Option<u64> {
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() || fraction.len() > DISPLAY_DECIMALS {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: u64 = whole.parse().ok()?;
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        let scale = 10u64.pow((DISPLAY_DECIMALS - fraction.len()) as u32);
        fraction.parse::<u64>().ok()? * scale
    };

    whole.checked_mul(E8S_PER_TOKEN)?.checked_add(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_examples() {
        assert_eq!(format_e8s(0), ZERO_DISPLAY_AMOUNT);
        assert_eq!(format_e8s(123_456_789), "1.23456789");
        assert_eq!(format_e8s(100_000_000), "1.00000000");
        assert_eq!(format_e8s(1), "0.00000001");
        assert_eq!(format_e8s(10), "0.00000010");
    }

    #[test]
    fn test_format_beyond_float_precision() {
        // 2^53 + 1 is not representable as f64
        assert_eq!(format_e8s(9_007_199_254_740_993), "90071992.54740993");
        assert_eq!(format_e8s(u64::MAX), "184467440737.09551615");
    }

    #[test]
    fn test_parse_inverts_format() {
        for e8s in [0, 1, 99_999_999, 100_000_000, 123_456_789, u64::MAX] {
            let formatted = format_e8s(e8s);
            assert_eq!(parse_display_amount(&formatted), Some(e8s));
            // idempotent through the numeric round-trip
            assert_eq!(format_e8s(parse_display_amount(&formatted).unwrap()), formatted);
        }
    }

    #[test]
    fn test_parse_short_and_invalid() {
        assert_eq!(parse_display_amount("2"), Some(200_000_000));
        assert_eq!(parse_display_amount("0.5"), Some(50_000_000));
        assert_eq!(parse_display_amount("1.000000001"), None);
        assert_eq!(parse_display_amount("-1.0"), None);
        assert_eq!(parse_display_amount(".5"), None);
        assert_eq!(parse_display_amount("184467440737.09551616"), None);
    }
}
