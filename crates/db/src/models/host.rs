use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `hosts` table. Unique per (stack, name); the
/// highest-precedence stack's definition wins at merge time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Host {
    pub id: DbId,
    pub stack_id: DbId,
    pub name: String,
    pub address: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a host alias in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHost {
    pub name: String,
    pub address: String,
}

/// DTO for updating a host's address.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHost {
    pub address: Option<String>,
}
