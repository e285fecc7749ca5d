//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use formstore_core::prelude::*;
//! ```

// === Server builder ===
pub use crate::app::{FormstoreServer, FormstoreServerBuilder};

// === Configuration ===
pub use crate::config::{FormstoreConfig, LoggingConfig};
pub use crate::logging::init_logging;

// === Schemas and records ===
pub use crate::record::Record;
pub use crate::schema::variants;
pub use crate::schema::{Envelope, FieldDef, FieldErrors, FieldKind, FieldValue, RecordSchema, Values};

// === Forms ===
pub use crate::form::{Draft, DraftError, DraftState, InputType, RawInput};

// === Server side ===
pub use crate::gateway::{Gateway, GatewayError};
pub use crate::store::{RecordStore, SqliteStore, StoreError};

// === Client side ===
pub use crate::client::{ClientError, FormMode, FormSession, RecordClient, SubmitError};

// === HTTP essentials (re-exported from the `http` crate) ===
pub use http::{Method, StatusCode};
