//! Key derivation from raw record fields.
//!
//! These functions never fail: non-numeric input coerces to zero, positions
//! past the end of a code yield an empty fragment.

use std::borrow::Cow;

use stage_types::well_known::CS_FULL_WIDTH_VERSION;

/// Lenient integer coercion.
///
/// Reads optional leading whitespace, an optional sign and the longest run of
/// leading digits. Anything else, including empty input, yields 0.
///
/// ```
/// use stage_engine::derive::atoi;
///
/// assert_eq!(atoi("1990"), 1990);
/// assert_eq!(atoi("12ab"), 12);
/// assert_eq!(atoi("abc"), 0);
/// assert_eq!(atoi(""), 0);
/// ```
pub fn atoi(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut result: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        result = result.saturating_mul(10).saturating_add(i64::from(byte - b'0'));
    }

    if negative {
        -result
    } else {
        result
    }
}

/// Returns true if the value is a non-empty run of ASCII digits.
pub fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Extracts the single character at a 1-based position of a packed code.
///
/// Positions past the end yield `""`.
///
/// ```
/// use stage_engine::derive::digit;
///
/// assert_eq!(digit("4812", 2), "8");
/// assert_eq!(digit("4", 2), "");
/// ```
pub fn digit(code: &str, position: usize) -> &str {
    if position == 0 {
        return "";
    }
    code.get(position - 1..position).unwrap_or("")
}

/// Extracts several 1-based positions of a packed code, in order.
pub fn digits<'a>(code: &'a str, positions: &[usize]) -> Vec<&'a str> {
    positions.iter().map(|p| digit(code, *p)).collect()
}

/// Strips a leading `C` or `c` from a site code (`C619` becomes `619`).
/// Unprefixed codes are returned as is.
pub fn site_numeric(raw_site: &str) -> &str {
    raw_site.strip_prefix(['C', 'c']).unwrap_or(raw_site)
}

/// Repads a CS extension or CS lymph nodes value recorded before the
/// full-width field version.
///
/// `"99"` becomes `"999"`, `"88"` becomes `"988"`, anything else gets a
/// trailing zero. From the full-width version on the value is unchanged.
pub fn repad_cs_extension(value: &str, version: u32) -> Cow<'_, str> {
    if version >= CS_FULL_WIDTH_VERSION {
        return Cow::Borrowed(value);
    }
    match value {
        "99" => Cow::Borrowed("999"),
        "88" => Cow::Borrowed("988"),
        other => Cow::Owned(format!("{other}0")),
    }
}

/// Repads a CS lymph nodes value; same rules as the extension.
pub fn repad_cs_nodes(value: &str, version: u32) -> Cow<'_, str> {
    repad_cs_extension(value, version)
}

/// Repads a CS mets value recorded before the full-width field version.
///
/// Only `"88"` changes, to `"98"`.
pub fn repad_cs_mets(value: &str, version: u32) -> Cow<'_, str> {
    if version < CS_FULL_WIDTH_VERSION && value == "88" {
        Cow::Borrowed("98")
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoi_lenient() {
        assert_eq!(atoi("0"), 0);
        assert_eq!(atoi("  42"), 42);
        assert_eq!(atoi("-7"), -7);
        assert_eq!(atoi("+3x"), 3);
        assert_eq!(atoi("9140"), 9140);
        assert_eq!(atoi("C619"), 0);
        assert_eq!(atoi("-"), 0);
    }

    #[test]
    fn test_is_integer() {
        assert!(is_integer("1990"));
        assert!(is_integer("05"));
        assert!(!is_integer(""));
        assert!(!is_integer("1a"));
        assert!(!is_integer(" 1"));
        assert!(!is_integer("-1"));
    }

    #[test]
    fn test_digit_extraction() {
        let code = "1234567890123";
        assert_eq!(digit(code, 1), "1");
        assert_eq!(digit(code, 13), "3");
        assert_eq!(digit(code, 14), "");
        assert_eq!(digit(code, 0), "");
        assert_eq!(digits(code, &[4, 5, 13]), vec!["4", "5", "3"]);
        assert_eq!(digits("", &[1, 2]), vec!["", ""]);
    }

    #[test]
    fn test_site_numeric() {
        assert_eq!(site_numeric("C619"), "619");
        assert_eq!(site_numeric("c619"), "619");
        assert_eq!(site_numeric("619"), "619");
        assert_eq!(site_numeric("X619"), "X619");
        assert_eq!(site_numeric("C"), "");
        assert_eq!(site_numeric(""), "");
    }

    #[test]
    fn test_repad_before_full_width() {
        assert_eq!(repad_cs_extension("99", 11), "999");
        assert_eq!(repad_cs_extension("88", 11), "988");
        assert_eq!(repad_cs_extension("15", 11), "150");
        assert_eq!(repad_cs_nodes("99", 1), "999");
        assert_eq!(repad_cs_mets("88", 11), "98");
        assert_eq!(repad_cs_mets("10", 11), "10");
    }

    #[test]
    fn test_no_repad_from_full_width() {
        assert_eq!(repad_cs_extension("99", 12), "99");
        assert_eq!(repad_cs_nodes("150", 12), "150");
        assert_eq!(repad_cs_mets("88", 12), "88");
    }
}
