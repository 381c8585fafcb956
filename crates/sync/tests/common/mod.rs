//! In-memory fakes for the three consumed interfaces, plus a small test
//! harness wiring them into an orchestrator.
//!
//! `MemoryStore` reproduces the store-side ordering contract — rows come
//! back sorted by (stack priority, stack name, intra-stack key) — so merge
//! behaviour can be tested independently of insertion order, exactly as
//! with the Postgres implementation.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use aclstack_core::types::{DbId, Timestamp};
use aclstack_core::{CoreError, PushStatus};
use aclstack_db::models::{
    AclRule, AclTest, AutoApprover, Grant, Group, Host, IpSet, NewPolicyVersion, NodeAttr,
    PolicyVersion, Posture, SshRule, TagOwner,
};
use aclstack_sync::{
    PolicyClient, PolicyClientError, PushOutcome, ResourceStore, SyncConfig, SyncOrchestrator,
    VersionLedger,
};

fn now() -> Timestamp {
    Utc::now()
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreData {
    /// (id, priority, name) per stack.
    stacks: Vec<(DbId, i32, String)>,
    groups: Vec<Group>,
    tag_owners: Vec<TagOwner>,
    hosts: Vec<Host>,
    acl_rules: Vec<AclRule>,
    ssh_rules: Vec<SshRule>,
    grants: Vec<Grant>,
    auto_approvers: Vec<AutoApprover>,
    node_attrs: Vec<NodeAttr>,
    postures: Vec<Posture>,
    ip_sets: Vec<IpSet>,
    acl_tests: Vec<AclTest>,
}

impl StoreData {
    /// Sort key matching the SQL `ORDER BY s.priority, s.name`.
    fn stack_key(&self, stack_id: DbId) -> (i32, String) {
        self.stacks
            .iter()
            .find(|(id, _, _)| *id == stack_id)
            .map(|(_, priority, name)| (*priority, name.clone()))
            .unwrap_or((i32::MAX, String::new()))
    }
}

/// In-memory [`ResourceStore`] honouring the ordering contract.
#[derive(Default)]
pub struct MemoryStore {
    next_id: AtomicI64,
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn next_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    pub fn add_stack(&self, name: &str, priority: i32) -> DbId {
        let id = self.next_id();
        let mut data = self.data.lock().unwrap();
        data.stacks.push((id, priority, name.to_string()));
        id
    }

    pub fn add_group(&self, stack_id: DbId, name: &str, members: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().groups.push(Group {
            id,
            stack_id,
            name: name.to_string(),
            members: Self::strings(members),
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_tag_owner(&self, stack_id: DbId, tag: &str, owners: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().tag_owners.push(TagOwner {
            id,
            stack_id,
            tag: tag.to_string(),
            owners: Self::strings(owners),
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_host(&self, stack_id: DbId, name: &str, address: &str) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().hosts.push(Host {
            id,
            stack_id,
            name: name.to_string(),
            address: address.to_string(),
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_acl_rule(&self, stack_id: DbId, rule_order: i32, src: &[&str], dst: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().acl_rules.push(AclRule {
            id,
            stack_id,
            rule_order,
            action: "accept".to_string(),
            protocol: None,
            sources: Self::strings(src),
            destinations: Self::strings(dst),
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_ssh_rule(&self, stack_id: DbId, rule_order: i32, src: &[&str], dst: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().ssh_rules.push(SshRule {
            id,
            stack_id,
            rule_order,
            action: "accept".to_string(),
            sources: Self::strings(src),
            destinations: Self::strings(dst),
            users: vec!["autogroup:nonroot".to_string()],
            check_period: None,
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_grant(&self, stack_id: DbId, rule_order: i32, src: &[&str], dst: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().grants.push(Grant {
            id,
            stack_id,
            rule_order,
            sources: Self::strings(src),
            destinations: Self::strings(dst),
            ip: None,
            app: None,
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_auto_approver(
        &self,
        stack_id: DbId,
        approver_type: &str,
        match_expr: &str,
        approvers: &[&str],
    ) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().auto_approvers.push(AutoApprover {
            id,
            stack_id,
            approver_type: approver_type.to_string(),
            match_expr: match_expr.to_string(),
            approvers: Self::strings(approvers),
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_node_attr(&self, stack_id: DbId, rule_order: i32, target: &[&str], attr: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().node_attrs.push(NodeAttr {
            id,
            stack_id,
            rule_order,
            target: Self::strings(target),
            attr: Some(Self::strings(attr)),
            app: None,
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_posture(&self, stack_id: DbId, name: &str, rules: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().postures.push(Posture {
            id,
            stack_id,
            name: name.to_string(),
            rules: Self::strings(rules),
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_ip_set(&self, stack_id: DbId, name: &str, addresses: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().ip_sets.push(IpSet {
            id,
            stack_id,
            name: name.to_string(),
            addresses: Self::strings(addresses),
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_acl_test(&self, stack_id: DbId, rule_order: i32, source: &str, accept: &[&str]) -> DbId {
        let id = self.next_id();
        self.data.lock().unwrap().acl_tests.push(AclTest {
            id,
            stack_id,
            rule_order,
            source: source.to_string(),
            accept: Some(Self::strings(accept)),
            deny: None,
            created_at: now(),
            updated_at: now(),
        });
        id
    }
}

macro_rules! sorted_list {
    ($self:ident, $field:ident, $key:expr) => {{
        let data = $self.data.lock().unwrap();
        let mut rows = data.$field.clone();
        rows.sort_by_key(|row| {
            let stack = data.stack_key(row.stack_id);
            (stack, $key(row))
        });
        Ok(rows)
    }};
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_all_groups(&self) -> Result<Vec<Group>, CoreError> {
        sorted_list!(self, groups, |r: &Group| r.name.clone())
    }

    async fn list_all_tag_owners(&self) -> Result<Vec<TagOwner>, CoreError> {
        sorted_list!(self, tag_owners, |r: &TagOwner| r.tag.clone())
    }

    async fn list_all_hosts(&self) -> Result<Vec<Host>, CoreError> {
        sorted_list!(self, hosts, |r: &Host| r.name.clone())
    }

    async fn list_all_acl_rules(&self) -> Result<Vec<AclRule>, CoreError> {
        sorted_list!(self, acl_rules, |r: &AclRule| (r.rule_order, r.id))
    }

    async fn list_all_ssh_rules(&self) -> Result<Vec<SshRule>, CoreError> {
        sorted_list!(self, ssh_rules, |r: &SshRule| (r.rule_order, r.id))
    }

    async fn list_all_grants(&self) -> Result<Vec<Grant>, CoreError> {
        sorted_list!(self, grants, |r: &Grant| (r.rule_order, r.id))
    }

    async fn list_all_auto_approvers(&self) -> Result<Vec<AutoApprover>, CoreError> {
        sorted_list!(self, auto_approvers, |r: &AutoApprover| (
            r.approver_type.clone(),
            r.match_expr.clone()
        ))
    }

    async fn list_all_node_attrs(&self) -> Result<Vec<NodeAttr>, CoreError> {
        sorted_list!(self, node_attrs, |r: &NodeAttr| (r.rule_order, r.id))
    }

    async fn list_all_postures(&self) -> Result<Vec<Posture>, CoreError> {
        sorted_list!(self, postures, |r: &Posture| r.name.clone())
    }

    async fn list_all_ip_sets(&self) -> Result<Vec<IpSet>, CoreError> {
        sorted_list!(self, ip_sets, |r: &IpSet| r.name.clone())
    }

    async fn list_all_acl_tests(&self) -> Result<Vec<AclTest>, CoreError> {
        sorted_list!(self, acl_tests, |r: &AclTest| (r.rule_order, r.id))
    }
}

// ---------------------------------------------------------------------------
// MemoryLedger
// ---------------------------------------------------------------------------

/// In-memory [`VersionLedger`]. Set `fail_create` to simulate a ledger
/// outage.
#[derive(Default)]
pub struct MemoryLedger {
    next_id: AtomicI64,
    rows: Mutex<Vec<PolicyVersion>>,
    pub fail_create: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<PolicyVersion> {
        self.rows.lock().unwrap().clone()
    }

    pub fn version(&self, id: DbId) -> Option<PolicyVersion> {
        self.rows.lock().unwrap().iter().find(|v| v.id == id).cloned()
    }
}

#[async_trait]
impl VersionLedger for MemoryLedger {
    async fn create(&self, input: NewPolicyVersion) -> Result<PolicyVersion, CoreError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("ledger unavailable".to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let version = PolicyVersion {
            id,
            version_number: input.version_number,
            rendered_policy: input.rendered_policy,
            remote_tag: None,
            push_status: PushStatus::Pending.as_str().to_string(),
            push_error: None,
            created_at: now(),
            pushed_at: None,
        };
        self.rows.lock().unwrap().push(version.clone());
        Ok(version)
    }

    async fn get(&self, id: DbId) -> Result<Option<PolicyVersion>, CoreError> {
        Ok(self.version(id))
    }

    async fn latest(&self) -> Result<Option<PolicyVersion>, CoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .max_by_key(|v| v.version_number)
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PolicyVersion>, CoreError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(|v| std::cmp::Reverse(v.version_number));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn record_outcome(&self, id: DbId, outcome: PushOutcome) -> Result<(), CoreError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|v| v.id == id) else {
            return Err(CoreError::not_found("policy version", id));
        };
        match outcome {
            PushOutcome::Success { remote_tag } => {
                row.push_status = PushStatus::Success.as_str().to_string();
                row.remote_tag = Some(remote_tag);
            }
            PushOutcome::Failed { error } => {
                row.push_status = PushStatus::Failed.as_str().to_string();
                row.push_error = Some(error);
            }
        }
        row.pushed_at = Some(now());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FakePolicyClient
// ---------------------------------------------------------------------------

/// Scriptable [`PolicyClient`]: toggle `fail_get` / `fail_set` to simulate
/// an unreachable tag fetch or a rejected push. Records every push attempt.
#[derive(Default)]
pub struct FakePolicyClient {
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
    tag_counter: AtomicU64,
    remote_tag: Mutex<Option<String>>,
    pushes: Mutex<Vec<(String, Option<String>)>>,
}

impl FakePolicyClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of push attempts (including rejected ones).
    pub fn push_count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }

    /// All push attempts as (body, expected tag).
    pub fn pushes(&self) -> Vec<(String, Option<String>)> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl PolicyClient for FakePolicyClient {
    async fn get_policy(&self) -> Result<(String, Option<String>), PolicyClientError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(PolicyClientError::Rejected {
                status: 503,
                body: "policy service unavailable".to_string(),
            });
        }
        Ok(("{}".to_string(), self.remote_tag.lock().unwrap().clone()))
    }

    async fn set_policy(
        &self,
        body: &str,
        expected_tag: Option<&str>,
    ) -> Result<String, PolicyClientError> {
        self.pushes
            .lock()
            .unwrap()
            .push((body.to_string(), expected_tag.map(|t| t.to_string())));
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(PolicyClientError::Rejected {
                status: 412,
                body: "policy tag mismatch".to_string(),
            });
        }
        let tag = format!("tag-{}", self.tag_counter.fetch_add(1, Ordering::SeqCst) + 1);
        *self.remote_tag.lock().unwrap() = Some(tag.clone());
        Ok(tag)
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub ledger: Arc<MemoryLedger>,
    pub client: Arc<FakePolicyClient>,
    pub orchestrator: SyncOrchestrator,
}

/// Wire an orchestrator over fresh fakes.
pub fn harness(config: SyncConfig) -> TestHarness {
    let store = MemoryStore::new();
    let ledger = MemoryLedger::new();
    let client = FakePolicyClient::new();
    let orchestrator = SyncOrchestrator::new(
        store.clone(),
        ledger.clone(),
        client.clone(),
        config,
    );
    TestHarness {
        store,
        ledger,
        client,
        orchestrator,
    }
}

/// Debounced config with auto-sync on.
pub fn debounced(debounce: Duration) -> SyncConfig {
    SyncConfig {
        debounce,
        auto_sync_enabled: true,
    }
}

/// Config with auto-sync off: every wait/force runs immediately.
pub fn manual() -> SyncConfig {
    SyncConfig {
        debounce: Duration::from_millis(0),
        auto_sync_enabled: false,
    }
}

/// Let spawned tasks run without advancing the (paused) clock.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
