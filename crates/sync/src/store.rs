//! The resource-store interface the merge engine reads from, and its
//! Postgres implementation.
//!
//! Every `list_all_*` returns rows pre-ordered by (stack priority, stack
//! name, intra-stack key) — that ordering is part of the contract, not an
//! implementation detail: first-writer-wins and rule concatenation both
//! depend on it.

use async_trait::async_trait;

use aclstack_core::CoreError;
use aclstack_db::models::{
    AclRule, AclTest, AutoApprover, Grant, Group, Host, IpSet, NodeAttr, Posture, SshRule,
    TagOwner,
};
use aclstack_db::repositories::{
    AclRuleRepo, AclTestRepo, AutoApproverRepo, GrantRepo, GroupRepo, HostRepo, IpSetRepo,
    NodeAttrRepo, PostureRepo, SshRuleRepo, TagOwnerRepo,
};
use aclstack_db::DbPool;

/// Read access to every resource type across all stacks.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn list_all_groups(&self) -> Result<Vec<Group>, CoreError>;
    async fn list_all_tag_owners(&self) -> Result<Vec<TagOwner>, CoreError>;
    async fn list_all_hosts(&self) -> Result<Vec<Host>, CoreError>;
    async fn list_all_acl_rules(&self) -> Result<Vec<AclRule>, CoreError>;
    async fn list_all_ssh_rules(&self) -> Result<Vec<SshRule>, CoreError>;
    async fn list_all_grants(&self) -> Result<Vec<Grant>, CoreError>;
    async fn list_all_auto_approvers(&self) -> Result<Vec<AutoApprover>, CoreError>;
    async fn list_all_node_attrs(&self) -> Result<Vec<NodeAttr>, CoreError>;
    async fn list_all_postures(&self) -> Result<Vec<Posture>, CoreError>;
    async fn list_all_ip_sets(&self) -> Result<Vec<IpSet>, CoreError>;
    async fn list_all_acl_tests(&self) -> Result<Vec<AclTest>, CoreError>;
}

/// [`ResourceStore`] backed by the Postgres repositories.
pub struct PgResourceStore {
    pool: DbPool,
}

impl PgResourceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {e}"))
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn list_all_groups(&self) -> Result<Vec<Group>, CoreError> {
        GroupRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_tag_owners(&self) -> Result<Vec<TagOwner>, CoreError> {
        TagOwnerRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_hosts(&self) -> Result<Vec<Host>, CoreError> {
        HostRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_acl_rules(&self) -> Result<Vec<AclRule>, CoreError> {
        AclRuleRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_ssh_rules(&self) -> Result<Vec<SshRule>, CoreError> {
        SshRuleRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_grants(&self) -> Result<Vec<Grant>, CoreError> {
        GrantRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_auto_approvers(&self) -> Result<Vec<AutoApprover>, CoreError> {
        AutoApproverRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_node_attrs(&self) -> Result<Vec<NodeAttr>, CoreError> {
        NodeAttrRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_postures(&self) -> Result<Vec<Posture>, CoreError> {
        PostureRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_ip_sets(&self) -> Result<Vec<IpSet>, CoreError> {
        IpSetRepo::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_all_acl_tests(&self) -> Result<Vec<AclTest>, CoreError> {
        AclTestRepo::list_all(&self.pool).await.map_err(db_err)
    }
}
