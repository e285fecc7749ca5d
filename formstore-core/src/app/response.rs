//! Response helpers
//!
//! Every response the server produces is JSON, built here so status codes,
//! headers and error shapes stay uniform.

use crate::schema::FieldErrors;
use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use hyper::Response;
use serde_json::{json, Value};

/// JSON response with the given status code.
pub fn json(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("valid HTTP response")
}

/// `{"error": message}`
pub fn error(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json(status, &json!({ "error": message }))
}

/// 400 with per-field messages
pub fn field_errors(errors: &FieldErrors) -> Response<Full<Bytes>> {
    json(StatusCode::BAD_REQUEST, &json!({ "error": "validation failed", "fieldErrors": errors }))
}

pub fn not_found() -> Response<Full<Bytes>> {
    error(StatusCode::NOT_FOUND, "not found")
}

/// 405 with the `Allow` header listing what the resource accepts
pub fn method_not_allowed(allowed: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .header("Allow", allowed)
        .body(Full::new(Bytes::from(json!({ "error": "method not allowed" }).to_string())))
        .expect("valid HTTP response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_allowed_sets_allow() {
        let resp = method_not_allowed("GET, POST");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["allow"], "GET, POST");
    }

    #[test]
    fn test_error_is_json() {
        let resp = error(StatusCode::NOT_FOUND, "gone");
        assert_eq!(resp.headers()["content-type"], "application/json");
    }
}
