//! Raw rows and field alias resolution.
//!
//! Third-party data names the same logical field in many ways (`firstName`,
//! `first_name`, `First Name`, `First`). Each semantic field owns a
//! [`FieldAliases`] entry listing the accepted keys in priority order, and
//! [`FieldAliases::resolve`] returns the first one present with a value.
//!
//! Lookups are exact and case-sensitive. There is no fuzzy matching.

use serde_json::{Map, Value};

/// One loosely-typed input record prior to mapping.
///
/// Keys are caller-supplied header cells or JSON property names.
pub type RawRow = Map<String, Value>;

/// Ordered list of accepted spellings for one semantic field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAliases {
    /// Semantic field name, used in logs and docs.
    pub field: &'static str,
    /// Accepted keys, checked in order; the first present value wins.
    pub keys: &'static [&'static str],
}

impl FieldAliases {
    /// Creates an alias entry.
    #[must_use]
    pub const fn new(field: &'static str, keys: &'static [&'static str]) -> Self {
        Self { field, keys }
    }

    /// Returns the value of the first alias present in `row` with a value.
    ///
    /// A value counts as present when it [`is_present`]; an empty string
    /// under an earlier alias does not shadow a later one.
    #[must_use]
    pub fn resolve<'a>(&self, row: &'a RawRow) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|key| row.get(*key))
            .find(|value| is_present(value))
    }

    /// Resolves the field as text, or returns an empty string.
    #[must_use]
    pub fn text(&self, row: &RawRow) -> String {
        self.text_or(row, "")
    }

    /// Resolves the field as text, or returns `default`.
    #[must_use]
    pub fn text_or(&self, row: &RawRow, default: &str) -> String {
        self.resolve(row)
            .map_or_else(|| default.to_string(), value_text)
    }
}

/// Returns whether a raw value counts as supplied.
///
/// Null, `false`, zero, and the empty string are absent. Everything else,
/// including whitespace-only strings and empty arrays or objects, is present.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a raw value as text.
///
/// Strings are returned verbatim and null is empty. Floating-point numbers
/// drop a zero fraction, so a spreadsheet cell holding `5550100.0` reads as
/// `5550100`. Other values use their JSON spelling.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .map_or_else(|| n.to_string(), |f| f.to_string()),
        other => other.to_string(),
    }
}

/// Parses the leading number of a raw value.
///
/// Strings are parsed by their longest numeric prefix, so `"3 hrs"` yields
/// 3. Returns `None` for zero or when no number is found.
#[must_use]
pub fn leading_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_prefix(s.trim()),
        _ => None,
    };
    parsed.filter(|q| *q != 0.0 && q.is_finite())
}

fn parse_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        if fraction_end > fraction_start || end > digits_start {
            end = fraction_end;
        }
    }
    s.get(..end).and_then(|prefix| prefix.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    const FIRST_NAME: FieldAliases =
        FieldAliases::new("first name", &["firstName", "first_name", "First Name", "First"]);

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => RawRow::new(),
        }
    }

    #[test]
    fn test_first_alias_wins() {
        let r = row(json!({"First": "Second", "firstName": "Ada", "first_name": "Other"}));
        assert_eq!(FIRST_NAME.text(&r), "Ada");
    }

    #[test]
    fn test_empty_value_does_not_shadow_later_alias() {
        let r = row(json!({"firstName": "", "First Name": "Grace"}));
        assert_eq!(FIRST_NAME.text(&r), "Grace");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let r = row(json!({"FIRSTNAME": "Ada", "first name": "Ada"}));
        assert!(FIRST_NAME.resolve(&r).is_none());
        assert_eq!(FIRST_NAME.text_or(&r, "n/a"), "n/a");
    }

    #[test]
    fn test_numbers_render_as_text() {
        let r = row(json!({"First": 42}));
        assert_eq!(FIRST_NAME.text(&r), "42");
    }

    #[test_case(json!(5_550_100.0), "5550100" ; "integral float")]
    #[test_case(json!(1.0), "1" ; "one")]
    #[test_case(json!(2.5), "2.5" ; "fractional float")]
    #[test_case(json!(-3), "-3" ; "negative integer")]
    #[test_case(json!(true), "true" ; "boolean")]
    fn test_value_text(value: Value, expected: &str) {
        assert_eq!(value_text(&value), expected);
    }

    #[test_case(json!(null), false ; "null")]
    #[test_case(json!(false), false ; "false")]
    #[test_case(json!(0), false ; "zero")]
    #[test_case(json!(""), false ; "empty string")]
    #[test_case(json!(" "), true ; "whitespace string")]
    #[test_case(json!(true), true ; "true")]
    #[test_case(json!(1.5), true ; "number")]
    #[test_case(json!([]), true ; "empty array")]
    #[test_case(json!({}), true ; "empty object")]
    fn test_is_present(value: Value, expected: bool) {
        assert_eq!(is_present(&value), expected);
    }

    #[test_case(json!("3 hrs"), Some(3.0) ; "prefix of text")]
    #[test_case(json!(" 2.5"), Some(2.5) ; "padded decimal")]
    #[test_case(json!(".5"), Some(0.5) ; "leading dot")]
    #[test_case(json!("4."), Some(4.0) ; "trailing dot")]
    #[test_case(json!(7), Some(7.0) ; "json number")]
    #[test_case(json!("0"), None ; "zero is absent")]
    #[test_case(json!("abc"), None ; "no digits")]
    #[test_case(json!("."), None ; "lone dot")]
    #[test_case(json!(true), None ; "boolean")]
    fn test_leading_number(value: Value, expected: Option<f64>) {
        assert_eq!(leading_number(&value), expected);
    }
}
