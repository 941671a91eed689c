//! Digit grouping for formatted number strings.
//!
//! Works on the textual output of `format!` so callers control rounding and
//! precision beforehand. For `Decimal` formatting, use the `decimal` sibling module.

/// Inserts `,` every three digits of the integer part. Keeps the sign and the
/// fractional part untouched.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };

    let (integer_part, fraction) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let grouped = integer_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");

    match fraction {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Trims trailing fractional zeros, then groups thousands.
pub fn display_formatted_string(formatted: &str) -> String {
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted
    };
    group_thousands(trimmed)
}
