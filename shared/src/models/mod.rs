//! Data models
//!
//! Shared between pos-server and pos-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.
//! Money is `Decimal` on the wire (JSON number) and integer cents in storage.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod payment;
pub mod report;
pub mod role;
pub mod user;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use payment::*;
pub use report::*;
pub use role::*;
pub use user::*;

/// Error returned when a wire string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
