//! Request assembly and response decoding shared by every operation.
//!
//! Query strings are joined verbatim: keys and values are NOT
//! percent-encoded, so `&`, `=` or non-ASCII characters go out exactly as
//! given. Callers own the correctness of what they put there.

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Ordered query parameters; order of insertion is the order on the wire.
pub type QueryParams = Vec<(String, String)>;

/// `k1=v1&k2=v2`, no escaping.
pub fn query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn json_body<T: Serialize + ?Sized>(body: &T) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Assemble one authenticated request against `config`'s base URL.
///
/// `path` is appended to the base URL as-is; no slash normalization.
pub(crate) fn build_request(
    config: &ClientConfig,
    method: HttpMethod,
    path: &str,
    params: Option<&[(String, String)]>,
    body: Option<String>,
) -> HttpRequest {
    let mut url = format!("{}{path}", config.base_url());
    if let Some(params) = params {
        url.push('?');
        url.push_str(&query_string(params));
    }

    let credentials = config.credentials();
    let headers = vec![
        ("Client-Id".to_string(), credentials.account_id.clone()),
        ("Api-Key".to_string(), credentials.api_key.clone()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ];

    tracing::debug!(
        method = method.as_str(),
        %url,
        body_bytes = body.as_ref().map_or(0, String::len),
        "seller api request"
    );

    HttpRequest {
        method,
        url,
        headers,
        body,
    }
}

/// Parse the response body as JSON. The status code is not inspected.
pub(crate) fn parse_json(response: &HttpResponse) -> Result<Value, ApiError> {
    tracing::debug!(
        status = response.status,
        body_bytes = response.body.len(),
        "seller api response"
    );
    serde_json::from_str(&response.body).map_err(|e| ApiError::InvalidJson {
        status: response.status,
        message: e.to_string(),
    })
}

/// Take the `result` member out of a decoded response.
///
/// A provider error envelope in its place becomes `ApiError::Provider`;
/// anything else is `UnexpectedResponseShape`.
pub(crate) fn take_result(mut value: Value, status: u16) -> Result<Value, ApiError> {
    if let Some(result) = value.get_mut("result") {
        return Ok(result.take());
    }
    Err(provider_error(&value, status).unwrap_or_else(|| {
        ApiError::UnexpectedResponseShape("response has no `result` field".to_string())
    }))
}

fn provider_error(value: &Value, status: u16) -> Option<ApiError> {
    let envelope = match value.get("error") {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    };
    let code = envelope.get("code")?;
    let message = envelope.get("message")?;
    Some(ApiError::Provider {
        status,
        code: scalar_text(code),
        message: scalar_text(message),
    })
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::{ClientOptions, TestProfile};

    fn config() -> ClientConfig {
        ClientConfig::resolve(ClientOptions::test(TestProfile::new("836", "test-key"))).unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn query_string_preserves_order_without_escaping() {
        let params: QueryParams = vec![
            ("a".to_string(), 1.to_string()),
            ("b".to_string(), "two".to_string()),
        ];
        let req = build_request(&config(), HttpMethod::Get, "v1/x", Some(&params), None);
        assert_eq!(req.url, "http://cb-api.ozonru.me/v1/x?a=1&b=two");

        let raw: QueryParams = vec![("q".to_string(), "a&b=c д".to_string())];
        assert_eq!(query_string(&raw), "q=a&b=c д");
    }

    #[test]
    fn path_is_appended_without_normalization() {
        let req = build_request(&config(), HttpMethod::Post, "/v1/x", None, None);
        assert_eq!(req.url, "http://cb-api.ozonru.me//v1/x");
    }

    #[test]
    fn headers_carry_credentials_and_content_type() {
        let req = build_request(&config(), HttpMethod::Post, "v1/x", None, Some("{}".to_string()));
        assert_eq!(
            req.headers,
            vec![
                ("Client-Id".to_string(), "836".to_string()),
                ("Api-Key".to_string(), "test-key".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ]
        );
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn parse_json_ignores_status() {
        let value = parse_json(&response(500, r#"{"result":[]}"#)).unwrap();
        assert_eq!(value, json!({"result": []}));
    }

    #[test]
    fn parse_json_rejects_non_json() {
        let err = parse_json(&response(502, "<html>bad gateway</html>")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson { status: 502, .. }));
    }

    #[test]
    fn take_result_surfaces_provider_errors() {
        let err = take_result(
            json!({"error": {"code": "BAD_REQUEST", "message": "invalid page_size"}}),
            400,
        )
        .unwrap_err();
        match err {
            ApiError::Provider {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "BAD_REQUEST");
                assert_eq!(message, "invalid page_size");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = take_result(json!({"code": 16, "message": "unauthenticated"}), 401).unwrap_err();
        assert!(matches!(err, ApiError::Provider { ref code, .. } if code == "16"));
    }

    #[test]
    fn take_result_without_result_or_envelope_is_unexpected() {
        let err = take_result(json!({"items": []}), 200).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponseShape(_)));
    }
}
