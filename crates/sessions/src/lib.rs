//! Session lifecycle for TenantCore.
//!
//! Token issuance, validity checks against the TTL window, and explicit or
//! bulk status transitions over the shared SQLite store. Every write runs
//! inside a caller-held `UnitOfWork` from `tc-storage`.

pub mod lifecycle;
pub mod store;
pub mod token;

pub use lifecycle::SessionLifecycle;
pub use token::{generate, TokenDigest, DEFAULT_TOKEN_BYTES};
