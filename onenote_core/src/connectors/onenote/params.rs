use serde_json::{Map, Value};

use crate::error::ConnectorError;

/// Walk the alias list and return the first non-empty string, trimmed.
/// Non-string values are skipped rather than coerced.
pub fn optional_string(args: &Map<String, Value>, names: &[&str]) -> Option<String> {
    for name in names {
        if let Some(Value::String(value)) = args.get(*name) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Like [`optional_string`] but the first alias is the canonical parameter
/// name reported when nothing usable was supplied.
pub fn required_string(
    args: &Map<String, Value>,
    names: &[&str],
) -> Result<String, ConnectorError> {
    optional_string(args, names)
        .ok_or_else(|| ConnectorError::InvalidParams(format!("Missing '{}' parameter", names[0])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn first_matching_alias_wins() {
        let args = args(json!({"id": "fallback", "notebookId": "primary"}));
        assert_eq!(
            optional_string(&args, &["notebookId", "id"]).as_deref(),
            Some("primary")
        );
    }

    #[test]
    fn later_alias_used_when_canonical_missing() {
        let args = args(json!({"accessToken": "  abc123  "}));
        assert_eq!(
            optional_string(&args, &["token", "accessToken", "random_string"]).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn blank_and_non_string_values_are_skipped() {
        let args = args(json!({"token": "   ", "accessToken": 42, "random_string": "real"}));
        assert_eq!(
            optional_string(&args, &["token", "accessToken", "random_string"]).as_deref(),
            Some("real")
        );
    }

    #[test]
    fn required_reports_the_canonical_name() {
        let args = args(json!({}));
        let err = required_string(&args, &["query", "searchTerm"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid params: Missing 'query' parameter");
    }
}
