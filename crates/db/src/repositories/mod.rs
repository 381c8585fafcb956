//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument.
//!
//! Every resource repository exposes `list_all`, which joins `stacks` and
//! orders rows by `(stack priority, stack name, intra-stack key)`. The merge
//! engine depends on that ordering: it is what makes first-writer-wins and
//! rule concatenation deterministic.

pub mod acl_rule_repo;
pub mod acl_test_repo;
pub mod auto_approver_repo;
pub mod grant_repo;
pub mod group_repo;
pub mod host_repo;
pub mod ip_set_repo;
pub mod node_attr_repo;
pub mod policy_version_repo;
pub mod posture_repo;
pub mod ssh_rule_repo;
pub mod stack_repo;
pub mod tag_owner_repo;

pub use acl_rule_repo::AclRuleRepo;
pub use acl_test_repo::AclTestRepo;
pub use auto_approver_repo::AutoApproverRepo;
pub use grant_repo::GrantRepo;
pub use group_repo::GroupRepo;
pub use host_repo::HostRepo;
pub use ip_set_repo::IpSetRepo;
pub use node_attr_repo::NodeAttrRepo;
pub use policy_version_repo::PolicyVersionRepo;
pub use posture_repo::PostureRepo;
pub use ssh_rule_repo::SshRuleRepo;
pub use stack_repo::StackRepo;
pub use tag_owner_repo::TagOwnerRepo;
