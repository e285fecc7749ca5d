//! Formstore - Core
//!
//! Schema-driven record forms with a validating CRUD gateway over SQLite.
//!
//! # Overview
//!
//! One field-definition table per variant ([`schema::RecordSchema`]) drives
//! the whole validate-and-persist cycle:
//!
//! - a client-side [`form::Draft`] coerces input events, validates, and guards
//!   submission with an explicit state machine,
//! - the [`gateway::Gateway`] re-validates every payload server-side and runs
//!   List/Get/Create/Update/Delete against a [`store::RecordStore`],
//! - the [`http`] handler and [`app::FormstoreServer`] expose it as JSON over
//!   REST, and [`client::RecordClient`] / [`client::FormSession`] consume it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use formstore_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     FormstoreServer::builder()
//!         .with_port(3000)
//!         .with_database("./data/formstore.db")
//!         .build()
//!         .await?
//!         .serve()
//!         .await
//! }
//! ```
//!
//! # Architecture
//!
//! - [`schema`] - field tables and the built-in `todo8` / `todo9` / `todo10` variants
//! - [`form`] - drafts and input coercion
//! - [`store`] - persistence trait and its SQLite implementation
//! - [`gateway`] - server-side validation and the five record operations
//! - [`http`] - REST handler, status mapping
//! - [`app`] - server builder, routing, serve loop
//! - [`client`] - HTTP client and form session
//! - [`config`] / [`logging`] - TOML + env configuration, log backend

pub mod app;
pub mod client;
pub mod config;
pub mod form;
pub mod gateway;
pub mod http;
pub mod logging;
pub mod record;
pub mod schema;
pub mod store;

// Prelude module for convenient imports
pub mod prelude;

// Re-exports of main types
pub use app::{FormstoreServer, FormstoreServerBuilder};
pub use gateway::{Gateway, GatewayError};
pub use record::Record;
pub use schema::{FieldDef, FieldErrors, FieldValue, RecordSchema, Values};
pub use store::{RecordStore, SqliteStore, StoreError};
