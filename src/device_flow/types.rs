use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Result of the device authorization initiation call.
///
/// `device_code` is opaque and only ever sent back to the token endpoint;
/// `user_code` and `verification_uri` are what the operator sees. The timing
/// hints are server-authoritative, with RFC 8628 defaults applied when the
/// server omits them.
#[derive(Debug, Clone)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    /// Minimum seconds between poll attempts (default 5).
    pub interval: u64,
    /// Validity window of the device code in seconds (default 600).
    pub expires_in: u64,
}

/// Outcome of a single token-exchange attempt.
#[derive(Debug, Clone)]
pub enum TokenPoll {
    /// Operator has not finished authorizing yet; sleep and retry.
    Pending,
    /// Server asked us to slow down; sleep and retry.
    SlowDown,
    /// Token issued. The full response object is kept so `--json` can pass it
    /// through unchanged.
    Authorized(Map<String, Value>),
}

/// Render a successful token response for output.
///
/// With `json_output` the whole object is pretty-printed, values untouched.
/// Otherwise the bare `access_token` string is extracted; a success response
/// without one is malformed and rejected.
pub fn render_token(response: &Map<String, Value>, json_output: bool) -> Result<String> {
    if json_output {
        return Ok(serde_json::to_string_pretty(response)?);
    }
    response
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(Error::MissingAccessToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn bare_output_extracts_access_token() {
        let response = map(json!({
            "access_token": "TOK123",
            "token_type": "Bearer"
        }));
        assert_eq!(render_token(&response, false).unwrap(), "TOK123");
    }

    #[test]
    fn bare_output_without_access_token_is_malformed() {
        let response = map(json!({"token_type": "Bearer"}));
        assert!(matches!(
            render_token(&response, false),
            Err(Error::MissingAccessToken)
        ));
    }

    #[test]
    fn bare_output_with_non_string_access_token_is_malformed() {
        let response = map(json!({"access_token": 42}));
        assert!(matches!(
            render_token(&response, false),
            Err(Error::MissingAccessToken)
        ));
    }

    #[test]
    fn json_output_round_trips_values_unchanged() {
        let original = json!({
            "access_token": "TOK123",
            "token_type": "Bearer",
            "expires_in": 300,
            "scope": "openid email",
            "nested": {"list": [1, 2, 3], "flag": true}
        });
        let rendered = render_token(&map(original.clone()), true).unwrap();
        let reparsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn json_output_does_not_require_access_token() {
        let original = json!({"id_token": "IDT"});
        let rendered = render_token(&map(original.clone()), true).unwrap();
        let reparsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(reparsed, original);
    }
}
