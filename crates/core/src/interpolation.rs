//! Interpolation Engine
//!
//! Replaces placeholders with trimmed user values. A placeholder whose value
//! is missing or blank stays in the output verbatim so the preview shows
//! which inputs are still unfilled.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{CoreError, CoreResult};
use crate::fields::InputField;
use crate::placeholder::{tokenize, Token};

/// Interpolated text together with its validity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpolation {
    pub text: String,
    pub is_valid: bool,
}

fn filled<'a>(values: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    values
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Substitute every `{key}` whose key belongs to `fields` and has a
/// non-blank value. Escaped braces collapse to a single brace.
pub fn interpolate(
    content: &str,
    values: &HashMap<String, String>,
    fields: &[InputField],
) -> String {
    let known: HashSet<&str> = fields.iter().map(|f| f.key.as_str()).collect();
    let mut output = String::with_capacity(content.len());

    for token in tokenize(content) {
        match token {
            Token::Text(text) => output.push_str(text),
            Token::EscapedBrace(brace) => output.push(brace),
            Token::Placeholder { name, raw } => {
                match filled(values, name).filter(|_| known.contains(name)) {
                    Some(value) => output.push_str(value),
                    None => output.push_str(raw),
                }
            }
        }
    }
    output
}

/// Keys of required fields whose trimmed value is empty, in field order.
pub fn missing_required<'a>(
    fields: &'a [InputField],
    values: &HashMap<String, String>,
) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|f| f.required && filled(values, &f.key).is_none())
        .map(|f| f.key.as_str())
        .collect()
}

/// True iff every required field has a non-blank value.
pub fn is_valid(fields: &[InputField], values: &HashMap<String, String>) -> bool {
    missing_required(fields, values).is_empty()
}

/// Interpolate and compute validity in one pass over the inputs.
pub fn render(
    content: &str,
    values: &HashMap<String, String>,
    fields: &[InputField],
) -> Interpolation {
    Interpolation {
        text: interpolate(content, values, fields),
        is_valid: is_valid(fields, values),
    }
}

/// Like [`render`], but an invalid result is an error naming the missing keys.
pub fn render_strict(
    content: &str,
    values: &HashMap<String, String>,
    fields: &[InputField],
) -> CoreResult<String> {
    let missing = missing_required(fields, values);
    if !missing.is_empty() {
        return Err(CoreError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }
    Ok(interpolate(content, values, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::synthesize_fields;
    use crate::placeholder::parse_placeholders;

    fn setup(content: &str, pairs: &[(&str, &str)]) -> (HashMap<String, String>, Vec<InputField>) {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let fields = synthesize_fields(&parse_placeholders(content), &values, &[]);
        (values, fields)
    }

    #[test]
    fn test_simple_substitution() {
        let (values, fields) = setup("Hello {x}", &[("x", "World")]);
        let result = render("Hello {x}", &values, &fields);
        assert_eq!(result.text, "Hello World");
        assert!(result.is_valid);
    }

    #[test]
    fn test_empty_value_keeps_placeholder() {
        let (values, fields) = setup("Hello {x}", &[("x", "")]);
        let result = render("Hello {x}", &values, &fields);
        assert_eq!(result.text, "Hello {x}");
        assert!(!result.is_valid);
    }

    #[test]
    fn test_values_are_trimmed() {
        let (values, fields) = setup("[{x}]", &[("x", "  padded \n")]);
        assert_eq!(interpolate("[{x}]", &values, &fields), "[padded]");

        let (values, fields) = setup("[{x}]", &[("x", "   ")]);
        let result = render("[{x}]", &values, &fields);
        assert_eq!(result.text, "[{x}]");
        assert!(!result.is_valid);
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let content = "{a} and {b} and {a}";
        let (values, fields) = setup(content, &[("a", "alice"), ("b", "bob")]);
        assert_eq!(interpolate(content, &values, &fields), "alice and bob and alice");
    }

    #[test]
    fn test_unknown_keys_left_alone() {
        let content = "{a} {b}";
        let values = HashMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        let fields = vec![InputField::new("a")];
        assert_eq!(interpolate(content, &values, &fields), "1 {b}");
    }

    #[test]
    fn test_optional_fields_never_block() {
        let content = "{a} {b}";
        let (values, mut fields) = setup(content, &[("a", "1")]);
        fields[1].required = false;
        let result = render(content, &values, &fields);
        assert!(result.is_valid);
        assert_eq!(result.text, "1 {b}");
    }

    #[test]
    fn test_zero_placeholders_always_valid() {
        let (values, fields) = setup("static text", &[]);
        let result = render("static text", &values, &fields);
        assert!(result.is_valid);
        assert_eq!(result.text, "static text");
    }

    #[test]
    fn test_escaped_braces_render_literally() {
        let content = r#"Return {{"name": "{name}"}}"#;
        let (values, fields) = setup(content, &[("name", "Ada")]);
        assert_eq!(interpolate(content, &values, &fields), r#"Return {"name": "Ada"}"#);
    }

    #[test]
    fn test_value_containing_braces_is_not_reinterpolated() {
        let content = "{a}{b}";
        let (values, fields) = setup(content, &[("a", "{b}"), ("b", "x")]);
        assert_eq!(interpolate(content, &values, &fields), "{b}x");
    }

    #[test]
    fn test_missing_required_and_strict() {
        let content = "{a} {b} {c}";
        let (values, fields) = setup(content, &[("b", "ok")]);
        assert_eq!(missing_required(&fields, &values), vec!["a", "c"]);

        let err = render_strict(content, &values, &fields).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Missing required fields: a, c");
    }
}
