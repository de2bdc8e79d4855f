#![forbid(unsafe_code)]
//! mangarank-core library.
//!
//! Domain model, request validation, configuration, and error codes shared by
//! the ranking engine. No search logic lives here.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at every seam; each variant maps to a
//!   machine-readable [`error::ErrorCode`].
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod model;
pub mod request;

pub use config::SearchConfig;
pub use error::ErrorCode;
pub use model::{Candidate, CandidateFilter, CandidateId, FieldId};
pub use request::{SearchRequest, ValidationError};
