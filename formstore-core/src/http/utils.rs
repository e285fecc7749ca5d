//! HTTP utility functions for the hyper server
//!
//! Path and query parsing, bounded body reading and access logging.

use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Body;
use hyper::Response;

/// Parse API path segments after a prefix
///
/// Example: `/api/todo9/12` with prefix `/api/todo9` returns `vec!["12"]`.
/// Returns `None` when the path is not under the prefix (`/api/todo10` is not
/// under `/api/todo1`).
pub fn parse_api_path_segments<'a>(path: &'a str, prefix: &str) -> Option<Vec<&'a str>> {
    let rest = path.strip_prefix(prefix)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    Some(rest.split('/').filter(|s| !s.is_empty()).collect())
}

/// First value of a query parameter, percent-decoded (`+` is a space)
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Why a request body could not be read
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Collect a request body, refusing more than `limit` bytes
pub async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() => {
            Err(BodyError::TooLarge(limit))
        }
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

/// Log one access line: `method path status elapsed`
pub fn log_access<B>(method: &str, path: &str, resp: &Response<B>, start: std::time::Instant) {
    let elapsed = start.elapsed();
    log::info!(
        "{} {} {} {:.1}ms",
        method,
        path,
        resp.status().as_u16(),
        elapsed.as_secs_f64() * 1000.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[test]
    fn test_parse_api_path_segments() {
        assert_eq!(parse_api_path_segments("/api/todo9", "/api/todo9"), Some(vec![]));
        assert_eq!(parse_api_path_segments("/api/todo9/", "/api/todo9"), Some(vec![]));
        assert_eq!(parse_api_path_segments("/api/todo9/12", "/api/todo9"), Some(vec!["12"]));
        assert_eq!(parse_api_path_segments("/api/todo10/1", "/api/todo1"), None);
        assert_eq!(parse_api_path_segments("/health", "/api/todo8"), None);
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param(Some("search=milk"), "search"), Some("milk".to_string()));
        assert_eq!(query_param(Some("a=1&searchQuery=big+red%20box"), "searchQuery"), Some("big red box".to_string()));
        assert_eq!(query_param(Some("search"), "search"), Some(String::new()));
        assert_eq!(query_param(Some("search=1"), "searchQuery"), None);
        assert_eq!(query_param(None, "search"), None);
        assert_eq!(query_param(Some("q=100%25"), "q"), Some("100%".to_string()));
        assert_eq!(query_param(Some("q=a%26b&q=second"), "q"), Some("a&b".to_string()));
        assert_eq!(query_param(Some("search%51uery=x"), "searchQuery"), Some("x".to_string()));
    }

    #[tokio::test]
    async fn test_read_body_limit() {
        let ok = read_body(Full::new(Bytes::from_static(b"{}")), 16).await.unwrap();
        assert_eq!(&ok[..], b"{}");

        let err = read_body(Full::new(Bytes::from(vec![b'x'; 32])), 16).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge(16)));
    }
}
