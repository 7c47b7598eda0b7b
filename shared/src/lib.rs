//! Shared types for the POS workspace
//!
//! Domain enums, entity models, request/response DTOs and the unified
//! error system used by both `pos-server` and `pos-client`.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::Role;
