//! Domain crate for aclstack: the merged policy document, shared type
//! aliases, and the error taxonomy.
//!
//! Deliberately dependency-light so that both the persistence layer and the
//! sync engine can build on it without pulling in sqlx or tokio.

pub mod error;
pub mod policy;
pub mod types;

pub use error::CoreError;
pub use policy::{Policy, PushStatus};
