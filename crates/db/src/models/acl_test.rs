use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `acl_tests` table: an assertion the remote service checks
/// against the pushed policy.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AclTest {
    pub id: DbId,
    pub stack_id: DbId,
    pub rule_order: i32,
    pub source: String,
    pub accept: Option<Vec<String>>,
    pub deny: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an ACL test in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAclTest {
    pub rule_order: i32,
    pub source: String,
    pub accept: Option<Vec<String>>,
    pub deny: Option<Vec<String>>,
}

/// DTO for updating an ACL test. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAclTest {
    pub rule_order: Option<i32>,
    pub source: Option<String>,
    pub accept: Option<Vec<String>>,
    pub deny: Option<Vec<String>>,
}
