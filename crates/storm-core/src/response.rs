//! Response interpretation.
//!
//! Turns a raw status and body into an [`ApiResponse`] or a typed [`Error`].
//! Both dispatchers route their output through [`interpret`], so the live
//! client and the in-memory one fail in exactly the same shapes.

use crate::http::ApiResponse;
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;

/// Key the API uses to report an application failure inside a response body.
pub const FULL_ERROR_KEY: &str = "full_error";

/// Interpret a raw response for the operation at `path`.
///
/// - 404 becomes [`Error::NotFound`] whatever the body holds.
/// - Any other status but 200 becomes [`Error::Status`] with the raw body.
/// - A non-empty body is decoded as JSON; an empty body is left undecoded.
/// - A decoded object containing `full_error` becomes [`Error::Application`],
///   even under 200.
///
/// # Errors
///
/// See above; a body that is not valid JSON yields [`Error::ParseError`].
pub fn interpret(
    path: &str,
    status: StatusCode,
    headers: HeaderMap,
    body: &[u8],
) -> Result<ApiResponse> {
    if status == StatusCode::NOT_FOUND {
        let text = String::from_utf8_lossy(body);
        let message = if text.trim().is_empty() {
            path.to_string()
        } else {
            format!("{path}: {text}")
        };
        return Err(Error::NotFound(message));
    }

    if status != StatusCode::OK {
        return Err(Error::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }

    let body = decode_body(path, body)?;
    check_full_error(body.as_ref())?;

    Ok(ApiResponse {
        status,
        headers,
        body,
    })
}

fn decode_body(path: &str, body: &[u8]) -> Result<Option<Value>> {
    if body.is_empty() {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|err| Error::ParseError(format!("response for `{path}` is not JSON: {err}")))
}

/// Fail with [`Error::Application`] if `body` is an object carrying `full_error`.
///
/// # Errors
///
/// Returns the application error described above.
pub fn check_full_error(body: Option<&Value>) -> Result<()> {
    match body.filter(|value| value.get(FULL_ERROR_KEY).is_some()) {
        Some(value) => Err(Error::Application {
            body: value.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: &str) -> Result<ApiResponse> {
        interpret("/Server/list", StatusCode::OK, HeaderMap::new(), body.as_bytes())
    }

    #[test]
    fn decodes_successful_body() {
        let response = ok(r#"{"servers":[]}"#).unwrap();
        assert_eq!(response.body, Some(json!({"servers": []})));
    }

    #[test]
    fn empty_body_is_not_decoded() {
        assert_eq!(ok("").unwrap().body, None);
    }

    #[test]
    fn whitespace_body_is_decoded() {
        assert!(matches!(ok(" \n"), Err(Error::ParseError(_))));
        assert_eq!(ok(" {\"servers\":[]}\n").unwrap().body, Some(json!({"servers": []})));
    }

    #[test]
    fn full_error_under_200_is_application_error() {
        let err = ok(r#"{"full_error":"invalid param","error_class":"Validation"}"#).unwrap_err();
        assert_eq!(
            err,
            Error::Application {
                body: json!({"full_error": "invalid param", "error_class": "Validation"})
            }
        );
    }

    #[test]
    fn full_error_inside_array_is_ignored() {
        let response = ok(r#"[{"full_error":"nested"}]"#).unwrap();
        assert!(response.body.unwrap().is_array());
    }

    #[test]
    fn not_found_regardless_of_body() {
        let err = interpret("/Server/details", StatusCode::NOT_FOUND, HeaderMap::new(), b"")
            .unwrap_err();
        assert_eq!(err, Error::NotFound("/Server/details".to_string()));

        let err = interpret(
            "/Server/details",
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            br#"{"full_error":"x"}"#,
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn other_status_carries_raw_body() {
        let err = interpret(
            "/Server/list",
            StatusCode::INTERNAL_SERVER_ERROR,
            HeaderMap::new(),
            b"boom",
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::Status {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn created_is_not_success() {
        let err = interpret("/Server/create", StatusCode::CREATED, HeaderMap::new(), b"{}")
            .unwrap_err();
        assert!(matches!(err, Error::Status { status: 201, .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(ok("<html>"), Err(Error::ParseError(_))));
    }
}
