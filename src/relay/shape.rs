//! Relay response envelope handling.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::QuoteError;

/// How a relay wraps the upstream response.
///
/// Configured per endpoint; the decoder branches on this tag instead of
/// probing the body for envelope fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayShape {
    /// The upstream body is serialized into a `contents` string field and
    /// needs a second parse pass (allorigins `/get` style).
    Enveloped,
    /// The relay streams the upstream body through unchanged.
    Passthrough,
}

impl RelayShape {
    /// Decode a relay response body into the upstream JSON payload.
    pub fn decode(&self, body: &str) -> Result<Value, QuoteError> {
        match self {
            Self::Passthrough => {
                serde_json::from_str(body).map_err(|e| QuoteError::MalformedPayload {
                    detail: format!("invalid JSON body: {}", e),
                })
            }
            Self::Enveloped => {
                let outer: Value =
                    serde_json::from_str(body).map_err(|e| QuoteError::MalformedPayload {
                        detail: format!("invalid envelope: {}", e),
                    })?;
                let contents = outer
                    .get("contents")
                    .and_then(Value::as_str)
                    .ok_or_else(|| QuoteError::MalformedPayload {
                        detail: "envelope missing contents field".to_string(),
                    })?;
                serde_json::from_str(contents).map_err(|e| QuoteError::MalformedPayload {
                    detail: format!("invalid envelope contents: {}", e),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_passthrough_parses_body_directly() {
        let raw = RelayShape::Passthrough.decode(r#"{"price": 1.5}"#).unwrap();
        assert_eq!(raw, json!({"price": 1.5}));
    }

    #[test]
    fn test_enveloped_requires_second_parse() {
        let body = r#"{"contents": "{\"price\": 1.5}", "status": {"http_code": 200}}"#;
        let raw = RelayShape::Enveloped.decode(body).unwrap();
        assert_eq!(raw, json!({"price": 1.5}));
    }

    #[test]
    fn test_enveloped_missing_contents_is_malformed() {
        let err = RelayShape::Enveloped.decode(r#"{"status": "ok"}"#).unwrap_err();
        assert!(matches!(err, QuoteError::MalformedPayload { .. }));
    }

    #[test]
    fn test_shapes_do_not_probe() {
        // A passthrough body that happens to contain a contents field must
        // not be double-parsed.
        let body = r#"{"contents": "not json", "price": 2.0}"#;
        let raw = RelayShape::Passthrough.decode(body).unwrap();
        assert_eq!(raw["price"], json!(2.0));

        // And an enveloped relay never treats the outer body as payload.
        let err = RelayShape::Enveloped.decode(r#"{"price": 2.0}"#).unwrap_err();
        assert!(matches!(err, QuoteError::MalformedPayload { .. }));
    }

    #[test]
    fn test_garbage_body_is_malformed() {
        for shape in [RelayShape::Passthrough, RelayShape::Enveloped] {
            let err = shape.decode("<html>502 Bad Gateway</html>").unwrap_err();
            assert!(matches!(err, QuoteError::MalformedPayload { .. }));
        }
    }
}
