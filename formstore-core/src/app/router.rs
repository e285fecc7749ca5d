//! Router for FormstoreServer

use crate::http::utils::parse_api_path_segments;
use crate::http::RecordHandler;
use std::sync::Arc;

/// Prefix under which every variant is mounted
pub const API_PREFIX: &str = "/api";

/// Base-path router over the mounted variants
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

/// Single mounted variant
pub struct Route {
    pub base_path: String,
    pub handler: Arc<RecordHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a handler at `/api/<variant>`
    pub fn add_variant(&mut self, handler: Arc<RecordHandler>) {
        let base_path = format!("{}/{}", API_PREFIX, handler.gateway().schema().variant());
        self.routes.push(Route { base_path, handler });
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.routes.iter().any(|r| r.handler.gateway().schema().variant() == variant)
    }

    /// Route for a request path, plus the segments after its base path
    pub fn match_route<'a>(&self, path: &'a str) -> Option<(&Route, Vec<&'a str>)> {
        self.routes
            .iter()
            .find_map(|route| parse_api_path_segments(path, &route.base_path).map(|segments| (route, segments)))
    }
}
