use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ip_sets` table. Unique per (stack, name); the
/// highest-precedence stack's definition wins at merge time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IpSet {
    pub id: DbId,
    pub stack_id: DbId,
    pub name: String,
    pub addresses: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an IP set in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIpSet {
    pub name: String,
    pub addresses: Vec<String>,
}

/// DTO for updating an IP set's addresses.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIpSet {
    pub addresses: Option<Vec<String>>,
}
