//! Error-text cleaning for review rows.
//!
//! Transfer errors arrive as validator output with row prefixes, repeated
//! values and stray quoting. [`clean_error`] rewrites them into the short
//! phrases reviewers sort and filter on. The rules always run in the same
//! order and are compiled once per process; text that matches no rule passes
//! through unchanged.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::TransferError;

const ROW_ID: &str = r"(?i)\brow\.id\s*=\s*\d+,\s*";

const SENSOR_TYPE: &str =
    r"(?i)key\s+error\s+adding\s+sensor_type\s*:\s*(?P<stype>[^,|]+?)\s*error\s*:\s*";

const ORGANIZATION: &str = r#"(?i)key\s*\(organization\)\s*=\s*\((?P<org>[^)]+)\)\s*is\s*not\s*present\s*in\s*table\s*"?"?lexicon_term"?"?\."#;

const VALUE_ERROR: &str = r"(?i)^\s*value\s*error\s*[,:\-]\s*";

const WHITESPACE_RUN: &str = r"\s{2,}";

const TRAILING_JUNK: &str = r"[\s|,]+$";

/// The compiled cleaning rules.
struct Rules {
    row_id: Regex,
    sensor_type: Regex,
    organization: Regex,
    value_error: Regex,
    whitespace_run: Regex,
    trailing_junk: Regex,
}

/// Global cache for the compiled rules.
static RULES: OnceLock<Rules> = OnceLock::new();

/// Returns the compiled rules, compiling them on first use.
fn rules() -> Result<&'static Rules, TransferError> {
    if let Some(rules) = RULES.get() {
        return Ok(rules);
    }

    let rules = Rules {
        row_id: compile(ROW_ID)?,
        sensor_type: compile(SENSOR_TYPE)?,
        organization: compile(ORGANIZATION)?,
        value_error: compile(VALUE_ERROR)?,
        whitespace_run: compile(WHITESPACE_RUN)?,
        trailing_junk: compile(TRAILING_JUNK)?,
    };

    Ok(RULES.get_or_init(|| rules))
}

fn compile(pattern: &str) -> Result<Regex, TransferError> {
    Regex::new(pattern).map_err(|source| TransferError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })
}

/// Normalizes a transfer error message.
///
/// In order:
///
/// 1. drop `row.ID=<n>, ` prefixes
/// 2. `key error adding sensor_type: X error: 'X'` becomes `Invalid sensor_type: X`
/// 3. a missing `organization` in `lexicon_term` becomes `Invalid organization: <value>`
/// 4. drop a leading `value error` with its `,`, `:` or `-`
/// 5. remove straight and curly double quotes
/// 6. collapse whitespace runs, trim, drop trailing commas and pipes
///
/// # Examples
///
/// ```
/// use nmo_transfer::clean_error;
///
/// assert_eq!(
///     clean_error("row.ID=42, Value error, key error adding sensor_type: Foo error: 'Foo'")?,
///     "Invalid sensor_type: Foo"
/// );
/// assert_eq!(clean_error("")?, "");
/// # Ok::<(), nmo_transfer::TransferError>(())
/// ```
///
/// # Errors
///
/// Returns [`TransferError::Pattern`] if a rule fails to compile.
pub fn clean_error(raw: &str) -> Result<String, TransferError> {
    if raw.is_empty() {
        return Ok(String::new());
    }
    let rules = rules()?;
    let text = rules.row_id.replace_all(raw, "");
    let text = rewrite_sensor_type(&rules.sensor_type, &text);
    let text = rules.organization.replace_all(&text, |caps: &Captures<'_>| {
        format!("Invalid organization: {}", caps["org"].trim())
    });
    let text = rules.value_error.replace(&text, "");
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '"' | '\u{201c}' | '\u{201d}'))
        .collect();
    let text = rules.whitespace_run.replace_all(&text, " ");
    Ok(rules.trailing_junk.replace(text.trim(), "").into_owned())
}

/// Rule 2. The value after `error:` must repeat the sensor type, optionally
/// in single quotes; the comparison ignores case.
fn rewrite_sensor_type<'t>(rule: &Regex, text: &'t str) -> Cow<'t, str> {
    let mut out = String::new();
    let mut last = 0;
    for caps in rule.captures_iter(text) {
        let (Some(whole), Some(stype)) = (caps.get(0), caps.name("stype")) else {
            continue;
        };
        let Some(end) = repeated_value_end(text, whole.end(), stype.as_str()) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str("Invalid sensor_type: ");
        out.push_str(stype.as_str().trim());
        last = end;
    }
    if last == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

/// Returns the byte offset just past `'value'` (quotes optional) when the
/// text at `start` repeats `value`.
fn repeated_value_end(text: &str, start: usize, value: &str) -> Option<usize> {
    let rest = &text[start..];
    let quoted = rest.strip_prefix('\'');
    let body = quoted.unwrap_or(rest);
    let head = body.get(..value.len())?;
    if head.to_lowercase() != value.to_lowercase() {
        return None;
    }
    let mut end = start + usize::from(quoted.is_some()) + value.len();
    if text[end..].starts_with('\'') {
        end += 1;
    }
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_type_with_prefixes() {
        assert_eq!(
            clean_error("row.ID=42, Value error, key error adding sensor_type: Foo error: 'Foo'").unwrap(),
            "Invalid sensor_type: Foo"
        );
    }

    #[test]
    fn test_missing_organization() {
        assert_eq!(
            clean_error(r#"Key (organization)=(Bogus Org) is not present in table "lexicon_term"."#).unwrap(),
            "Invalid organization: Bogus Org"
        );
    }

    #[test]
    fn test_sensor_type_ignores_case_and_quotes() {
        assert_eq!(
            clean_error("key error adding sensor_type: Pressure Transducer error: PRESSURE TRANSDUCER").unwrap(),
            "Invalid sensor_type: Pressure Transducer"
        );
    }

    #[test]
    fn test_sensor_type_needs_repeated_value() {
        let raw = "key error adding sensor_type: Foo error: 'Bar'";
        assert_eq!(clean_error(raw).unwrap(), "key error adding sensor_type: Foo error: 'Bar'");
    }

    #[test]
    fn test_text_around_rewrites_is_kept() {
        assert_eq!(
            clean_error("W-1: key error adding sensor_type: Foo error: 'foo' | retry").unwrap(),
            "W-1: Invalid sensor_type: Foo | retry"
        );
    }

    #[test]
    fn test_every_row_id_is_removed() {
        assert_eq!(
            clean_error("row.id = 1, row.ID=22, depth must be positive").unwrap(),
            "depth must be positive"
        );
    }

    #[test]
    fn test_value_error_prefix_only_at_start() {
        assert_eq!(clean_error("Value error: bad date").unwrap(), "bad date");
        assert_eq!(clean_error("value error - bad date").unwrap(), "bad date");
        assert_eq!(clean_error("bad value error: x").unwrap(), "bad value error: x");
    }

    #[test]
    fn test_quotes_and_whitespace() {
        assert_eq!(
            clean_error("  \u{201c}Lat\u{201d}   is \"required\" ,| ").unwrap(),
            "Lat is required"
        );
    }

    #[test]
    fn test_rules_compile_once() {
        let first = rules().unwrap();
        let second = rules().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let err = compile(r"(?P<open").unwrap_err();
        assert!(matches!(err, TransferError::Pattern { .. }));
        assert!(err.to_string().starts_with("invalid pattern (?P<open"));
    }

    #[test]
    fn test_unmatched_text_passes_through() {
        assert_eq!(clean_error("depth out of range").unwrap(), "depth out of range");
        assert_eq!(clean_error("").unwrap(), "");
    }
}
