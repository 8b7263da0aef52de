//! Numeric-literal grammar.
//!
//! ```text
//! literal  := sign? mantissa exponent?
//! sign     := "+" | "-"
//! mantissa := digits ("." digits?)? | "." digits
//! exponent := ("e" | "E") sign? digits
//! ```
//!
//! No surrounding whitespace, no hexadecimal, no `Infinity` or `NaN`.

/// Returns true if `s` is a complete numeric literal.
pub fn is_numeric_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

/// Parse `raw` into a finite operand.
///
/// Literals that overflow `f64` (e.g. `1e400`) are rejected rather than
/// becoming infinity.
pub fn parse_operand(raw: &str) -> Option<f64> {
    if !is_numeric_literal(raw) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_numeric_literals() {
        for s in [
            "0", "5", "-3", "+7", "42.", ".5", "-.5", "3.14159", "1e3", "1E3", "2.5e-4", "-6.02E+23",
            "007",
        ] {
            assert!(is_numeric_literal(s), "{s:?} should be accepted");
        }
    }

    #[test]
    fn test_rejects_non_literals() {
        for s in [
            "", " ", "abc", "NaN", "nan", "Infinity", "-inf", "0x10", " 5", "5 ", "1,000", "+", "-",
            ".", "e5", "1e", "1e+", "1.2.3", "--1", "5abc", "1_000", "١٢",
        ] {
            assert!(!is_numeric_literal(s), "{s:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_operand() {
        assert_eq!(parse_operand("5"), Some(5.0));
        assert_eq!(parse_operand("-2.5e1"), Some(-25.0));
        assert_eq!(parse_operand(".25"), Some(0.25));
        assert_eq!(parse_operand("abc"), None);
        assert_eq!(parse_operand("inf"), None);
        assert_eq!(parse_operand("1e400"), None);
        assert_eq!(parse_operand("1e-400"), Some(0.0));
    }
}
