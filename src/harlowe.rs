//! The narrow Harlowe macro surface recognized for variable extraction.
//!
//! Only `(set: $name to <value>)` is evaluated, with a value grammar of
//! string, number, boolean and flat `(datamap: ...)` literals. Anything
//! outside that grammar is skipped with a warning and contributes nothing;
//! the macro text itself stays part of the passage content either way.

use serde_json::{Map, Number, Value};

use crate::Warning;

/// Scans a passage body for `(set: $name to <value>)` macros.
///
/// Assignments come back in appearance order, so applying them in sequence
/// lets a later assignment of the same name overwrite an earlier one.
pub(crate) fn extract_assignments(
    body: &str,
    passage: &str,
    warnings: &mut Vec<Warning>,
) -> Vec<(String, Value)> {
    let mut sets = vec![];
    let mut from = 0;
    while let Some(i) = body[from..].find("(set:") {
        let open = from + i;
        let Some(len) = macro_span(&body[open..]) else {
            warnings.push(Warning::AssignmentMalformed(passage.to_string()));
            break;
        };
        match parse_set(&body[open + "(set:".len()..open + len - 1]) {
            Some(binding) => sets.push(binding),
            None => warnings.push(Warning::AssignmentMalformed(passage.to_string())),
        }
        from = open + len;
    }
    sets
}

/// Length of the balanced `( ... )` span at the start of `s`.
/// Tracks string literals so parentheses inside them don't count.
fn macro_span(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Parses the `$name to <value>` argument of a `set:` macro.
fn parse_set(args: &str) -> Option<(String, Value)> {
    let rest = args.trim().strip_prefix('$')?;
    let end = rest
        .find(|c: char| !c.is_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    let name = &rest[..end];
    if name.is_empty() {
        return None;
    }
    let rhs = rest[end..].trim_start().strip_prefix("to")?;
    if !rhs.starts_with(char::is_whitespace) {
        return None;
    }
    Some((name.to_string(), parse_value(rhs.trim())?))
}

/// Parses a value under the supported grammar. [None] means the value isn't
/// resolvable here and the whole assignment is dropped.
fn parse_value(s: &str) -> Option<Value> {
    if let Some(rest) = s.strip_prefix("(datamap:") {
        return parse_datamap(rest.strip_suffix(')')?);
    }
    parse_scalar(s)
}

/// String, number and boolean literals.
fn parse_scalar(s: &str) -> Option<Value> {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return Some(Value::String(s[1..s.len() - 1].to_string()));
        }
    }
    match s {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return s.parse::<i64>().ok().map(|n| Value::Number(n.into()));
    }
    if let Some((whole, frac)) = digits.split_once('.') {
        if !whole.is_empty()
            && !frac.is_empty()
            && whole.chars().all(|c| c.is_ascii_digit())
            && frac.chars().all(|c| c.is_ascii_digit())
        {
            return s.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number);
        }
    }
    None
}

/// Builds a flat datamap from a pairwise argument list. An odd argument
/// count, a non-string key or an unparsable entry drops the whole map.
fn parse_datamap(args: &str) -> Option<Value> {
    let parts = split_args(args);
    if parts.len() % 2 != 0 {
        return None;
    }
    let mut map = Map::new();
    for pair in parts.chunks(2) {
        let key = match parse_scalar(pair[0].trim())? {
            Value::String(k) => k,
            _ => return None,
        };
        map.insert(key, parse_scalar(pair[1].trim())?);
    }
    Some(Value::Object(map))
}

/// Splits a macro argument list on top-level commas, ignoring commas inside
/// string literals.
fn split_args(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return vec![];
    }
    let mut parts = vec![];
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                ',' => {
                    parts.push(&args[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(&args[start..]);
    parts
}
