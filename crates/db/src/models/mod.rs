//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod acl_rule;
pub mod acl_test;
pub mod auto_approver;
pub mod grant;
pub mod group;
pub mod host;
pub mod ip_set;
pub mod node_attr;
pub mod policy_version;
pub mod posture;
pub mod ssh_rule;
pub mod stack;
pub mod tag_owner;

pub use acl_rule::{AclRule, CreateAclRule, UpdateAclRule};
pub use acl_test::{AclTest, CreateAclTest, UpdateAclTest};
pub use auto_approver::{
    AutoApprover, CreateAutoApprover, UpdateAutoApprover, APPROVER_TYPE_EXIT_NODE,
    APPROVER_TYPE_ROUTES,
};
pub use grant::{CreateGrant, Grant, UpdateGrant};
pub use group::{CreateGroup, Group, UpdateGroup};
pub use host::{CreateHost, Host, UpdateHost};
pub use ip_set::{CreateIpSet, IpSet, UpdateIpSet};
pub use node_attr::{CreateNodeAttr, NodeAttr, UpdateNodeAttr};
pub use policy_version::{NewPolicyVersion, PolicyVersion};
pub use posture::{CreatePosture, Posture, UpdatePosture};
pub use ssh_rule::{CreateSshRule, SshRule, UpdateSshRule};
pub use stack::{CreateStack, Stack, UpdateStack};
pub use tag_owner::{CreateTagOwner, TagOwner, UpdateTagOwner};
