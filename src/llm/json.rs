//! JSON recovery from free-form model output.

use serde_json::Value;

use crate::llm::error::LlmError;

const PREVIEW_CHARS: usize = 80;

/// Slice from the first `{` to the last `}`, inclusive.
pub fn extract_json_object(text: &str) -> Result<&str, LlmError> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(LlmError::NoJsonObject {
            preview: preview(text),
        }),
    }
}

/// Extracts and parses a JSON object.
pub fn parse_json_object(text: &str) -> Result<Value, LlmError> {
    let raw = extract_json_object(text)?;
    let value: Value = serde_json::from_str(raw).map_err(|e| LlmError::InvalidJson {
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(LlmError::InvalidJson {
            reason: "top-level value is not an object".to_string(),
        });
    }
    Ok(value)
}

/// Reads a number that may also arrive as a numeric string.
pub fn loose_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}

/// Reads a string field, or joins an array of strings.
pub fn loose_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_object_from_prose() {
        let text = "Sure! Here is the result:\n```json\n{\"a\": 1}\n```\nHope it helps.";
        assert_eq!(extract_json_object(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_spans_first_open_to_last_close() {
        let text = "{\"outer\": {\"inner\": 2}} trailing }";
        assert_eq!(
            extract_json_object(text).unwrap(),
            "{\"outer\": {\"inner\": 2}} trailing }"
        );
        assert!(parse_json_object(text).is_err());
    }

    #[test]
    fn test_missing_braces() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(LlmError::NoJsonObject { .. })
        ));
        assert!(extract_json_object("} backwards {").is_err());
        assert!(extract_json_object("").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(
            parse_json_object("{not: valid}"),
            Err(LlmError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_parse_object() {
        let value = parse_json_object("result: {\"accuracy\": 80}").unwrap();
        assert_eq!(value, json!({"accuracy": 80}));
    }

    #[test]
    fn test_loose_numbers() {
        assert_eq!(loose_f64(&json!(85)), Some(85.0));
        assert_eq!(loose_f64(&json!("72.5")), Some(72.5));
        assert_eq!(loose_f64(&json!(" 90% ")), Some(90.0));
        assert_eq!(loose_f64(&json!("high")), None);
        assert_eq!(loose_f64(&json!(null)), None);
    }

    #[test]
    fn test_loose_string_list() {
        assert_eq!(
            loose_string_list(Some(&json!(["a", " ", "b"]))),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(loose_string_list(Some(&json!("single"))), vec!["single".to_string()]);
        assert!(loose_string_list(None).is_empty());
    }

    #[test]
    fn test_preview_is_truncated() {
        let err = extract_json_object(&"x".repeat(200)).unwrap_err();
        match err {
            LlmError::NoJsonObject { preview } => assert_eq!(preview.chars().count(), 81),
            other => panic!("unexpected {other:?}"),
        }
    }
}
