//! JSON envelopes.
//!
//! Single entities are wrapped as `{"result": ...}`; lists as
//! `{"results": [...], "count": n, "meta": {...}}`.

use crate::error::{OpenAlexError, Result};
use crate::types::Meta;
use serde::Serialize;
use serde_json::{json, Value};

/// Wrap one entity.
pub fn entity(value: &Value, pretty: bool) -> Result<String> {
    render(&json!({ "result": value }), pretty)
}

/// Wrap a list of results (or group buckets) with an optional `meta` block.
pub fn list<T: Serialize>(items: &[T], meta: Option<&Meta>, pretty: bool) -> Result<String> {
    let mut out = json!({
        "results": items,
        "count": items.len(),
    });
    if let Some(meta) = meta {
        out["meta"] = serde_json::to_value(meta)?;
    }
    render(&out, pretty)
}

/// Error envelope for JSON output mode.
pub fn error(err: &OpenAlexError, pretty: bool) -> Result<String> {
    render(&err.to_json(), pretty)
}

fn render(value: &Value, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupEntry;

    #[test]
    fn test_single_result_wrapped() {
        let out = entity(&json!({"id": "W123"}), false).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["result"]["id"], "W123");
    }

    #[test]
    fn test_list_results_wrapped() {
        let out = list(&[json!({"id": "W1"}), json!({"id": "W2"})], None, false).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["count"], 2);
        assert_eq!(parsed["results"][1]["id"], "W2");
        assert!(parsed.get("meta").is_none());
    }

    #[test]
    fn test_meta_passed_through() {
        let meta: Meta = serde_json::from_value(json!({
            "count": 10, "page": 1, "per_page": 25, "db_response_time_ms": 12
        }))
        .unwrap();
        let out = list::<Value>(&[], Some(&meta), false).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["meta"]["page"], 1);
        assert_eq!(parsed["meta"]["db_response_time_ms"], 12);
    }

    #[test]
    fn test_meta_keeps_null_keys() {
        let meta: Meta = serde_json::from_value(json!({
            "count": 7, "page": null, "per_page": 25, "groups_count": null,
            "next_cursor": "IlsxNjA5"
        }))
        .unwrap();
        let out = list::<Value>(&[], Some(&meta), false).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["meta"].get("page"), Some(&Value::Null));
        assert_eq!(parsed["meta"].get("groups_count"), Some(&Value::Null));
        assert_eq!(parsed["meta"]["next_cursor"], "IlsxNjA5");
    }

    #[test]
    fn test_groups_serialized() {
        let groups = vec![GroupEntry {
            key: "article".into(),
            key_display_name: Some("article".into()),
            count: 42,
        }];
        let out = list(&groups, None, false).unwrap();
        assert!(out.contains(r#""key":"article""#));
        assert!(out.contains(r#""count":42"#));
    }

    #[test]
    fn test_pretty_and_unicode() {
        let out = entity(&json!({"title": "Über"}), true).unwrap();
        assert!(out.contains("\n  \"result\""));
        assert!(out.contains("Über"));
    }

    #[test]
    fn test_error_envelope() {
        let out = error(&OpenAlexError::NotFound, false).unwrap();
        assert!(out.contains(r#""status_code":404"#));
    }
}
