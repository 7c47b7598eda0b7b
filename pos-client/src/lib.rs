//! POS Client - HTTP client for the POS server
//!
//! - [`PosClient`] - REST calls with bearer auth; a 401 surfaces as
//!   [`ClientError::Unauthorized`] so callers can force a fresh login
//! - [`guard`] - route guard deciding between access, login and the role's
//!   landing page
//! - [`kitchen`] - kitchen display poller publishing the latest queue

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod kitchen;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use guard::{GuardDecision, ProfileSource, RouteGuard, Session};
pub use http::PosClient;
pub use kitchen::{KitchenPoller, KitchenSnapshot, KitchenSource};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, UserResponse};
pub use shared::models::{Role, User};
pub use shared::util::{INVALID_DATE, display_date, display_millis};
