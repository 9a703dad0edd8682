//! Numeric literal extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::Span;

lazy_static! {
    // ASCII digits with at most one decimal separator, either "." or ","
    static ref NUMBER: Regex = Regex::new(r"[0-9]+(?:[.,][0-9]*)?").unwrap();
}

/// Find the first number in `text`.
///
/// A comma decimal separator is read as a dot, so `"2,5 kg"` yields `2.5`.
/// Returns the value and its byte span, or `None` if `text` has no digits.
pub fn parse_number(text: &str) -> Option<(f64, Span)> {
    let m = NUMBER.find(text)?;
    let literal = m.as_str().replace(',', ".");
    let value = literal.trim_end_matches('.').parse::<f64>().ok()?;
    Some((value, (m.start(), m.end())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_number("box 5 kg"), Some((5.0, (4, 5))));
    }

    #[test]
    fn test_parse_decimal_separators() {
        assert_eq!(parse_number("2,5kg"), Some((2.5, (0, 3))));
        assert_eq!(parse_number("x0.75l"), Some((0.75, (1, 5))));
    }

    #[test]
    fn test_trailing_separator() {
        assert_eq!(parse_number("12. pcs"), Some((12.0, (0, 3))));
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(parse_number("a 3 b 4"), Some((3.0, (2, 3))));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(parse_number("kg"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_only_ascii_digits() {
        assert_eq!(parse_number("\u{0665} kg"), None);
        assert_eq!(parse_number("\u{0665} 7 kg"), Some((7.0, (3, 4))));
    }
}
