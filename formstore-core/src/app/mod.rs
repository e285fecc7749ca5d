//! Formstore server - one HTTP server for every mounted variant
//!
//! The [`FormstoreServer`] mounts one [`RecordHandler`](crate::http::RecordHandler) per variant at
//! `/api/<variant>` and adds:
//! - `GET /api` - the mounted variants
//! - `GET /health` - liveness
//! - a per-request timeout on reads and an access log line per request
//!
//! # Example
//!
//! ```no_run
//! use formstore_core::app::FormstoreServer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! FormstoreServer::builder()
//!     .with_port(8080)
//!     .with_database("./data/formstore.db")
//!     .build()
//!     .await?
//!     .serve()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::config::FormstoreConfig;
use crate::http::{utils, Resp};
use anyhow::{Context, Result};
use bytes::Bytes;
use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

pub mod builder;
pub mod response;
pub mod router;

pub use builder::FormstoreServerBuilder;
pub use router::{Router, API_PREFIX};

/// Multi-variant record server
pub struct FormstoreServer {
    config: FormstoreConfig,
    router: Router,
}

impl std::fmt::Debug for FormstoreServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormstoreServer")
            .field("address", &self.config.server.address())
            .field("variants", &self.variants())
            .finish_non_exhaustive()
    }
}

impl FormstoreServer {
    pub fn builder() -> FormstoreServerBuilder {
        FormstoreServerBuilder::new()
    }

    pub(crate) fn new(config: FormstoreConfig, router: Router) -> Self {
        Self { config, router }
    }

    pub fn config(&self) -> &FormstoreConfig {
        &self.config
    }

    /// Names of the mounted variants, in mount order
    pub fn variants(&self) -> Vec<&str> {
        self.router.routes().iter().map(|r| r.handler.gateway().schema().variant()).collect()
    }

    /// Bind the configured address and serve until the task is dropped
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.address();
        let listener =
            TcpListener::bind(&addr).await.with_context(|| format!("Failed to bind to {}", addr))?;
        self.serve_with_listener(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_with_listener(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr().context("Failed to read listener address")?;

        log::info!("🚀 Starting formstore server");
        log::info!("   Database: {}", self.config.storage.database);
        log::info!("   Variants: {}", self.variants().join(", "));
        log::info!("   Request timeout: {}s", self.config.server.request_timeout);
        log::info!("✅ Server listening on http://{}", addr);

        let server = Arc::new(self);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let server = server.clone();

            tokio::spawn(async move {
                let io = hyper_util::rt::TokioIo::new(stream);

                let service = hyper::service::service_fn(move |req| {
                    let server = server.clone();
                    async move { Ok::<_, Infallible>(server.handle(req).await) }
                });

                if let Err(err) = hyper::server::conn::http1::Builder::new().serve_connection(io, service).await {
                    log::error!("Connection error from {}: {}", remote_addr, err);
                }
            });
        }
    }

    /// Handle one request: route it (reads under the request timeout), then log it
    pub async fn handle<B>(&self, req: Request<B>) -> Resp
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        // writes run to completion: an abandoned write still commits
        let resp = if is_mutating(&method) {
            self.route(req).await
        } else {
            match tokio::time::timeout(self.config.server.timeout(), self.route(req)).await {
                Ok(resp) => resp,
                Err(_) => {
                    log::error!("⏱️  {} {} timed out", method, path);
                    response::error(StatusCode::INTERNAL_SERVER_ERROR, "request timed out")
                }
            }
        };

        utils::log_access(method.as_str(), &path, &resp, start);
        resp
    }

    async fn route<B>(&self, req: Request<B>) -> Resp
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let path = req.uri().path().to_string();

        match path.trim_end_matches('/') {
            "/health" => {
                return match *req.method() {
                    Method::GET => response::json(StatusCode::OK, &json!({ "status": "ok" })),
                    _ => response::method_not_allowed("GET"),
                }
            }
            API_PREFIX => {
                return match *req.method() {
                    Method::GET => response::json(StatusCode::OK, &self.index()),
                    _ => response::method_not_allowed("GET"),
                }
            }
            _ => {}
        }

        match self.router.match_route(&path) {
            Some((route, segments)) => route.handler.handle_request(req, &segments).await,
            None => response::not_found(),
        }
    }

    fn index(&self) -> serde_json::Value {
        let variants: Vec<_> = self
            .router
            .routes()
            .iter()
            .map(|route| {
                let schema = route.handler.gateway().schema();
                json!({
                    "name": schema.variant(),
                    "path": route.base_path,
                    "searchParam": schema.search_param(),
                })
            })
            .collect();
        json!({ "variants": variants })
    }
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::DELETE)
}
