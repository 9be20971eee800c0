//! Lenient integer parsing for CSS-like style values.

/// Parse the leading integer of a style value, ignoring any trailing unit.
///
/// Leading whitespace and an optional sign are accepted, then as many ASCII
/// digits as follow. Everything after the digits is ignored, so `"20px"`
/// is 20 and `"1.5"` is 1. Returns `None` when no digit is found
/// (`"normal"`, `""`, `"px"`).
pub fn parse_css_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate absurdly long digit runs rather than failing.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
