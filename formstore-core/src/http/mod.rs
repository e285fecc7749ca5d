//! Server side of the transport adapter
//!
//! - [`handler`] - per-variant REST handler over a [`crate::gateway::Gateway`]
//! - [`error`] - gateway outcome to status code and JSON error body
//! - [`utils`] - path, query and body helpers

pub mod error;
pub mod handler;
pub mod utils;

pub use error::{gateway_error_response, status_for};
pub use handler::RecordHandler;

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;

/// Response type produced by every handler
pub type Resp = Response<Full<Bytes>>;
