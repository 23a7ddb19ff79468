// 🔤 Command Grammar - dotted calls, canonical lines, update values
//
// Two surface syntaxes reach the console:
//   canonical:  update User 1234 first_name "Betty"
//   dotted:     User.update("1234", "first_name", "Betty")
// Dotted input is rewritten into the canonical form before dispatch.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static DOTTED_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\w+)\.(\w+)\((.*)\)\s*$").expect("dotted-call pattern is valid"));

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{.*\}").expect("object pattern is valid"));

static LEADING_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^["'](.*?)["']"#).expect("quoted-value pattern is valid"));

/// What a raw input line turns into before dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Nothing to do
    Blank,

    /// `Kind.count()`: answered directly, never dispatched
    Count(String),

    /// A canonical `<command> <args...>` line
    Canonical(String),
}

/// Rewrite one input line into its canonical form.
///
/// Only the first attribute/value pair of a dotted call survives; any further
/// arguments are dropped.
pub fn translate(line: &str) -> Translation {
    if line.trim().is_empty() {
        return Translation::Blank;
    }

    let Some(caps) = DOTTED_CALL.captures(line) else {
        return Translation::Canonical(line.to_string());
    };

    let kind = &caps[1];
    let method = &caps[2];
    let args = caps[3].trim();

    if args.is_empty() {
        if method == "count" {
            return Translation::Count(kind.to_string());
        }
        return Translation::Canonical(format!("{method} {kind}"));
    }

    let parts = split_call_args(args);
    let canonical = if parts.len() == 1 {
        format!("{method} {kind} {}", strip_quotes(args))
    } else if let Some(object) = json_object(args) {
        format!(
            "{method} {kind} {} {}",
            strip_quotes(parts[0]),
            object.replace('\'', "\"")
        )
    } else if parts.len() == 2 {
        format!("{method} {kind} {} {}", strip_quotes(parts[0]), strip_quotes(parts[1]))
    } else {
        // value stays verbatim so a quoted value is still a string after the rewrite
        format!(
            "{method} {kind} {} {} {}",
            strip_quotes(parts[0]),
            strip_quotes(parts[1]),
            parts[2]
        )
    };

    Translation::Canonical(canonical)
}

/// Split call arguments on commas that are outside quotes, braces and brackets
fn split_call_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in args.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{' | '[') => depth += 1,
            (None, '}' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts
}

fn strip_quotes(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
}

/// First `{ ... }` span of `text`, outermost braces included
pub fn json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Text between a leading quote and the next quote, if `text` starts quoted
pub fn leading_quoted(text: &str) -> Option<&str> {
    LEADING_QUOTED
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split a canonical line into the command word and the rest.
///
/// `?` is shorthand for `help`. The command word is the leading run of
/// alphanumerics and underscores.
pub fn parse_line(line: &str) -> (&str, &str) {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('?') {
        return ("help", rest.trim());
    }

    let end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    (&line[..end], line[end..].trim())
}

/// Whitespace split into at most `max` pieces; the last piece keeps the
/// remainder of the text, inner whitespace included.
pub fn split_args(text: &str, max: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        if parts.len() + 1 == max {
            parts.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                parts.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                parts.push(rest);
                break;
            }
        }
    }
    parts
}

/// Bare update value: integer, else float, else the token unchanged.
///
/// Double quotes are ignored while trying the numeric forms. Integer-shaped
/// tokens never become floats: past u64 they stay strings, as do non-finite
/// floats, since JSON can't hold either exactly.
pub fn coerce_value(token: &str) -> Value {
    let unquoted = token.replace('"', "");

    if let Ok(int) = unquoted.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(int) = unquoted.parse::<u64>() {
        return Value::from(int);
    }
    if is_integer_shaped(&unquoted) {
        return Value::String(token.to_string());
    }
    if let Ok(float) = unquoted.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    Value::String(token.to_string())
}

/// Optional sign followed by at least one ASCII digit
fn is_integer_shaped(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canonical(line: &str) -> String {
        match translate(line) {
            Translation::Canonical(text) => text,
            other => panic!("expected canonical form, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(translate(""), Translation::Blank);
        assert_eq!(translate("   \t"), Translation::Blank);
    }

    #[test]
    fn test_canonical_lines_pass_through() {
        assert_eq!(canonical("show User 42"), "show User 42");
        assert_eq!(canonical("update Place 1 name \"My house\""), "update Place 1 name \"My house\"");
    }

    #[test]
    fn test_dotted_without_arguments() {
        assert_eq!(canonical("User.all()"), "all User");
        assert_eq!(canonical("BaseModel.create()"), "create BaseModel");
        assert_eq!(translate("BaseModel.count()"), Translation::Count("BaseModel".into()));
    }

    #[test]
    fn test_dotted_single_argument_is_unquoted() {
        assert_eq!(canonical("User.show(\"1234\")"), "show User 1234");
        assert_eq!(canonical("User.destroy('1234')"), "destroy User 1234");
        assert_eq!(canonical("City.show(abc)"), "show City abc");
    }

    #[test]
    fn test_dotted_attribute_value() {
        assert_eq!(
            canonical("User.update(\"38f2\", \"first_name\", \"John\")"),
            "update User 38f2 first_name \"John\""
        );
        assert_eq!(canonical("Place.update(\"1\", \"max_guest\", 4)"), "update Place 1 max_guest 4");
    }

    #[test]
    fn test_dotted_extra_arguments_are_dropped() {
        assert_eq!(
            canonical("Review.update(\"1\", \"age\", 25, \"color\", \"green\")"),
            "update Review 1 age 25"
        );
    }

    #[test]
    fn test_dotted_two_arguments_leave_value_out() {
        assert_eq!(canonical("User.update(\"1\", \"email\")"), "update User 1 email");
    }

    #[test]
    fn test_dotted_json_payload() {
        assert_eq!(
            canonical("Review.update(\"1\", {\"age\": 25, \"color\": \"black\"})"),
            "update Review 1 {\"age\": 25, \"color\": \"black\"}"
        );
        assert_eq!(
            canonical("User.update('1', {'first_name': 'Ann'})"),
            "update User 1 {\"first_name\": \"Ann\"}"
        );
    }

    #[test]
    fn test_split_call_args_respects_quotes_and_braces() {
        assert_eq!(split_call_args("\"a, b\", c"), vec!["\"a, b\"", "c"]);
        assert_eq!(split_call_args("1, {\"x\": 1, \"y\": [1, 2]}"), vec!["1", "{\"x\": 1, \"y\": [1, 2]}"]);
        assert_eq!(split_call_args("a,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("create User"), ("create", "User"));
        assert_eq!(parse_line("  all  "), ("all", ""));
        assert_eq!(parse_line("? update"), ("help", "update"));
        assert_eq!(parse_line("?"), ("help", ""));
        assert_eq!(parse_line("!boom"), ("", "!boom"));
    }

    #[test]
    fn test_split_args_keeps_remainder() {
        assert_eq!(
            split_args("Place 1 name \"My  house\" extra", 4),
            vec!["Place", "1", "name", "\"My  house\" extra"]
        );
        assert_eq!(split_args("  User  ", 4), vec!["User"]);
        assert!(split_args("", 4).is_empty());
    }

    #[test]
    fn test_coercion_precedence() {
        assert_eq!(coerce_value("25"), json!(25));
        assert!(coerce_value("25").is_i64());
        assert_eq!(coerce_value("25.5"), json!(25.5));
        assert_eq!(coerce_value("-3"), json!(-3));
        assert_eq!(coerce_value("green"), json!("green"));
        assert_eq!(coerce_value("inf"), json!("inf"));
    }

    #[test]
    fn test_coercion_large_integers_never_become_floats() {
        assert_eq!(coerce_value("9223372036854775807"), json!(i64::MAX));
        assert_eq!(coerce_value("-9223372036854775808"), json!(i64::MIN));

        let past_i64 = coerce_value("9223372036854775808");
        assert!(past_i64.is_u64());
        assert_eq!(past_i64, json!(9223372036854775808u64));

        assert_eq!(coerce_value("18446744073709551616"), json!("18446744073709551616"));
        assert_eq!(coerce_value("-9223372036854775809"), json!("-9223372036854775809"));
        assert_eq!(coerce_value("1e3"), json!(1000.0));
    }

    #[test]
    fn test_leading_quoted() {
        assert_eq!(leading_quoted("\"John Smith\" rest"), Some("John Smith"));
        assert_eq!(leading_quoted("'25'"), Some("25"));
        assert_eq!(leading_quoted("25"), None);
    }
}
