//! Shared domain types for TenantCore.
//!
//! Holds the session and setting models, the workspace-wide error type,
//! runtime configuration, and structured trace events. Feature crates
//! (`tc-storage`, `tc-sessions`, `tc-settings`) build on these.

pub mod config;
pub mod error;
pub mod session;
pub mod setting;
pub mod trace;

pub use error::{Error, Result};
pub use session::{Principal, Session, SessionStatus};
pub use setting::{Setting, ValueType};
