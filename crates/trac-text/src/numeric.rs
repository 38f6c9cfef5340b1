//! Integer literal parsing shared by `CN` and the arithmetic primitives.
//!
//! TRAC numbers are `(prefix)(sign)(digits)` where `digits` is a run of
//! ASCII `0`-`9` at the very end of the string and `sign` is an optional
//! `+`/`-` immediately before it. Everything before the sign is an opaque
//! prefix that is preserved by the arithmetic primitives (`ad(x12,3)` =>
//! `x15`). A bare `-` with no digits is "negative zero": distinct from `0`
//! for `CN`'s direction selection even though both parse to the value `0`.

/// Result of splitting a TRAC numeral into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNum {
    pub value: i64,
    pub prefix: String,
    pub negative_zero: bool,
}

/// Parse `arg` as `(prefix)(sign)(digits)`, matching the original's
/// `^(.*?)([+-]?)([0-9]*)\z` with a non-greedy prefix.
pub fn parsenum(arg: &str) -> ParsedNum {
    let bytes = arg.as_bytes();
    let mut digits_start = bytes.len();
    while digits_start > 0 && bytes[digits_start - 1].is_ascii_digit() {
        digits_start -= 1;
    }
    let digits = &arg[digits_start..];
    let mut sign_end = digits_start;
    let mut sign = None;
    if sign_end > 0 && (bytes[sign_end - 1] == b'+' || bytes[sign_end - 1] == b'-') {
        sign = Some(bytes[sign_end - 1] as char);
        sign_end -= 1;
    }
    let prefix = arg[..sign_end].to_string();
    let unsigned: i64 = if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(i64::MAX)
    };
    let negative = sign == Some('-');
    let value = if negative { -unsigned } else { unsigned };
    ParsedNum {
        value,
        prefix,
        negative_zero: negative && digits.is_empty(),
    }
}

/// The numeric value alone, discarding prefix and sign bookkeeping.
pub fn tracint(arg: &str) -> i64 {
    parsenum(arg).value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_digits() {
        let p = parsenum("42");
        assert_eq!(p.value, 42);
        assert_eq!(p.prefix, "");
        assert!(!p.negative_zero);
    }

    #[test]
    fn prefixed_positive() {
        let p = parsenum("x12");
        assert_eq!(p.value, 12);
        assert_eq!(p.prefix, "x");
    }

    #[test]
    fn negative_zero_is_distinct() {
        let neg0 = parsenum("-");
        let zero = parsenum("0");
        assert_eq!(neg0.value, 0);
        assert_eq!(zero.value, 0);
        assert!(neg0.negative_zero);
        assert!(!zero.negative_zero);
    }

    #[test]
    fn empty_string_is_zero() {
        let p = parsenum("");
        assert_eq!(p.value, 0);
        assert!(!p.negative_zero);
    }

    #[test]
    fn tracint_discards_prefix() {
        assert_eq!(tracint("foo-7"), -7);
    }
}
