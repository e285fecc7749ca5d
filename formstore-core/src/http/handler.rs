//! REST handler for one variant
//!
//! Maps the verbs on `/api/<variant>` and `/api/<variant>/:id` onto the
//! variant's [`Gateway`] and turns each outcome into a JSON response.

use super::error::gateway_error_response;
use super::utils::{query_param, read_body, BodyError};
use super::Resp;
use crate::app::response;
use crate::gateway::{Gateway, GatewayResult};
use bytes::Bytes;
use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use serde_json::{json, Value};

/// Segment under the variant base path that serves the field table
pub const SCHEMA_SEGMENT: &str = "_schema";

pub struct RecordHandler {
    gateway: Gateway,
    max_body_size: usize,
}

impl RecordHandler {
    pub fn new(gateway: Gateway, max_body_size: usize) -> Self {
        Self { gateway, max_body_size }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Handle a request whose path has already been split after the base path
    pub async fn handle_request<B>(&self, req: Request<B>, segments: &[&str]) -> Resp
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        match segments {
            [] => match method {
                Method::GET => {
                    let filter = query_param(req.uri().query(), self.gateway.schema().search_param());
                    let outcome = self.gateway.list(filter.as_deref()).await;
                    self.respond(outcome, |records| {
                        (StatusCode::OK, self.gateway.schema().envelope().wrap_list(&records))
                    })
                }
                Method::POST => {
                    let payload = match self.read_json(req).await {
                        Ok(payload) => payload,
                        Err(resp) => return resp,
                    };
                    let outcome = self.gateway.create(&payload).await;
                    self.respond(outcome, |record| {
                        (StatusCode::CREATED, self.gateway.schema().envelope().wrap_item(&record))
                    })
                }
                _ => response::method_not_allowed("GET, POST"),
            },
            [SCHEMA_SEGMENT] => match method {
                Method::GET => response::json(StatusCode::OK, &self.gateway.schema().describe()),
                _ => response::method_not_allowed("GET"),
            },
            [raw_id] => {
                if !matches!(method, Method::GET | Method::PUT | Method::DELETE) {
                    return response::method_not_allowed("GET, PUT, DELETE");
                }
                let id = match self.gateway.parse_id(raw_id) {
                    Ok(id) => id,
                    Err(e) => return gateway_error_response(&e),
                };
                match method {
                    Method::GET => {
                        let outcome = self.gateway.get(id).await;
                        self.respond(outcome, |record| {
                            (StatusCode::OK, self.gateway.schema().envelope().wrap_item(&record))
                        })
                    }
                    Method::PUT => {
                        let payload = match self.read_json(req).await {
                            Ok(payload) => payload,
                            Err(resp) => return resp,
                        };
                        let outcome = self.gateway.update(id, &payload).await;
                        self.respond(outcome, |record| {
                            (StatusCode::OK, self.gateway.schema().envelope().wrap_item(&record))
                        })
                    }
                    _ => {
                        let outcome = self.gateway.delete(id).await;
                        self.respond(outcome, |()| {
                            let message = format!("{} record {} deleted", self.gateway.schema().variant(), id);
                            (StatusCode::OK, json!({ "message": message }))
                        })
                    }
                }
            }
            _ => response::not_found(),
        }
    }

    async fn read_json<B>(&self, req: Request<B>) -> Result<Value, Resp>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let body = read_body(req.into_body(), self.max_body_size).await.map_err(|e| match e {
            BodyError::TooLarge(_) => response::error(StatusCode::PAYLOAD_TOO_LARGE, &e.to_string()),
            BodyError::Read(_) => response::error(StatusCode::BAD_REQUEST, &e.to_string()),
        })?;
        Gateway::decode_body(&body).map_err(|e| gateway_error_response(&e))
    }

    fn respond<T>(&self, outcome: GatewayResult<T>, ok: impl FnOnce(T) -> (StatusCode, Value)) -> Resp {
        match outcome {
            Ok(value) => {
                let (status, body) = ok(value);
                response::json(status, &body)
            }
            Err(e) => gateway_error_response(&e),
        }
    }
}
