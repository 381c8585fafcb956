//! The policy merge engine.
//!
//! Folds every stack's resources into one [`Policy`] document. Three merge
//! strategies, chosen per resource type:
//!
//! - **Union** (groups, tag owners): group by key across all stacks and
//!   union the value sets; stack precedence is irrelevant.
//! - **First-writer-wins** (hosts, postures, IP sets): the first definition
//!   of a key in the store's (priority, stack name, resource name) ordering
//!   is kept; later definitions are silently discarded.
//! - **Ordered concatenation** (ACL rules, SSH rules, grants, node attrs,
//!   ACL tests): every rule from every stack, in (priority, stack name,
//!   rule order) order, no deduplication.
//!
//! Auto-approvers are a fourth, additive shape: per-route approver unions
//! plus one global exit-node union.
//!
//! All fold functions are pure over the store's pre-ordered row lists; a
//! section with no contributing rows is `None`, never an empty collection.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use aclstack_core::policy::{
    AclEntry, AclTestEntry, AutoApproverPolicy, GrantEntry, NodeAttrEntry, SshEntry,
};
use aclstack_core::{CoreError, Policy};
use aclstack_db::models::auto_approver::{APPROVER_TYPE_EXIT_NODE, APPROVER_TYPE_ROUTES};
use aclstack_db::models::{
    AclRule, AclTest, AutoApprover, Grant, Group, Host, IpSet, NodeAttr, Posture, SshRule,
    TagOwner,
};

use crate::store::ResourceStore;

/// Builds the merged policy document from the current store state.
///
/// Deterministic for a given store state, read-only, and side-effect free;
/// fails only if a store read fails.
pub struct PolicyMerger {
    store: Arc<dyn ResourceStore>,
}

impl PolicyMerger {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Read all resource types and fold them into one policy document.
    pub async fn merge(&self) -> Result<Policy, CoreError> {
        let groups = self.store.list_all_groups().await?;
        let tag_owners = self.store.list_all_tag_owners().await?;
        let hosts = self.store.list_all_hosts().await?;
        let acl_rules = self.store.list_all_acl_rules().await?;
        let ssh_rules = self.store.list_all_ssh_rules().await?;
        let grants = self.store.list_all_grants().await?;
        let auto_approvers = self.store.list_all_auto_approvers().await?;
        let node_attrs = self.store.list_all_node_attrs().await?;
        let postures = self.store.list_all_postures().await?;
        let ip_sets = self.store.list_all_ip_sets().await?;
        let acl_tests = self.store.list_all_acl_tests().await?;

        Ok(Policy {
            groups: merge_groups(&groups),
            tag_owners: merge_tag_owners(&tag_owners),
            hosts: merge_hosts(&hosts),
            acls: merge_acl_rules(&acl_rules),
            ssh: merge_ssh_rules(&ssh_rules),
            grants: merge_grants(&grants)?,
            auto_approvers: merge_auto_approvers(&auto_approvers),
            node_attrs: merge_node_attrs(&node_attrs),
            postures: merge_postures(&postures),
            ip_sets: merge_ip_sets(&ip_sets),
            tests: merge_acl_tests(&acl_tests),
        })
    }
}

// ---------------------------------------------------------------------------
// Union merges
// ---------------------------------------------------------------------------

fn merge_groups(rows: &[Group]) -> Option<BTreeMap<String, Vec<String>>> {
    if rows.is_empty() {
        return None;
    }
    let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        merged
            .entry(row.name.clone())
            .or_default()
            .extend(row.members.iter().cloned());
    }
    Some(collect_sets(merged))
}

fn merge_tag_owners(rows: &[TagOwner]) -> Option<BTreeMap<String, Vec<String>>> {
    if rows.is_empty() {
        return None;
    }
    let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        merged
            .entry(row.tag.clone())
            .or_default()
            .extend(row.owners.iter().cloned());
    }
    Some(collect_sets(merged))
}

fn collect_sets(sets: BTreeMap<String, BTreeSet<String>>) -> BTreeMap<String, Vec<String>> {
    sets.into_iter()
        .map(|(key, values)| (key, values.into_iter().collect()))
        .collect()
}

// ---------------------------------------------------------------------------
// First-writer-wins merges
// ---------------------------------------------------------------------------

fn merge_hosts(rows: &[Host]) -> Option<BTreeMap<String, String>> {
    if rows.is_empty() {
        return None;
    }
    let mut merged = BTreeMap::new();
    for row in rows {
        // Rows arrive in precedence order; the first definition wins.
        merged
            .entry(row.name.clone())
            .or_insert_with(|| row.address.clone());
    }
    Some(merged)
}

fn merge_postures(rows: &[Posture]) -> Option<BTreeMap<String, Vec<String>>> {
    if rows.is_empty() {
        return None;
    }
    let mut merged = BTreeMap::new();
    for row in rows {
        merged
            .entry(row.name.clone())
            .or_insert_with(|| row.rules.clone());
    }
    Some(merged)
}

fn merge_ip_sets(rows: &[IpSet]) -> Option<BTreeMap<String, Vec<String>>> {
    if rows.is_empty() {
        return None;
    }
    let mut merged = BTreeMap::new();
    for row in rows {
        merged
            .entry(row.name.clone())
            .or_insert_with(|| row.addresses.clone());
    }
    Some(merged)
}

// ---------------------------------------------------------------------------
// Ordered concatenation merges
// ---------------------------------------------------------------------------

fn merge_acl_rules(rows: &[AclRule]) -> Option<Vec<AclEntry>> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .map(|row| AclEntry {
                action: row.action.clone(),
                proto: row.protocol.clone(),
                src: row.sources.clone(),
                dst: row.destinations.clone(),
            })
            .collect(),
    )
}

fn merge_ssh_rules(rows: &[SshRule]) -> Option<Vec<SshEntry>> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .map(|row| SshEntry {
                action: row.action.clone(),
                src: row.sources.clone(),
                dst: row.destinations.clone(),
                users: row.users.clone(),
                check_period: row.check_period.clone(),
            })
            .collect(),
    )
}

fn merge_grants(rows: &[Grant]) -> Result<Option<Vec<GrantEntry>>, CoreError> {
    if rows.is_empty() {
        return Ok(None);
    }
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let app = match &row.app {
            Some(value) => Some(serde_json::from_value(value.clone()).map_err(|e| {
                CoreError::Internal(format!("grant {} has a malformed app payload: {e}", row.id))
            })?),
            None => None,
        };
        entries.push(GrantEntry {
            src: row.sources.clone(),
            dst: row.destinations.clone(),
            ip: row.ip.clone(),
            app,
        });
    }
    Ok(Some(entries))
}

fn merge_node_attrs(rows: &[NodeAttr]) -> Option<Vec<NodeAttrEntry>> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .map(|row| NodeAttrEntry {
                target: row.target.clone(),
                attr: row.attr.clone(),
                app: row.app.clone(),
            })
            .collect(),
    )
}

fn merge_acl_tests(rows: &[AclTest]) -> Option<Vec<AclTestEntry>> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .map(|row| AclTestEntry {
                src: row.source.clone(),
                accept: row.accept.clone(),
                deny: row.deny.clone(),
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Auto-approver merge
// ---------------------------------------------------------------------------

fn merge_auto_approvers(rows: &[AutoApprover]) -> Option<AutoApproverPolicy> {
    let mut routes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut exit_node: BTreeSet<String> = BTreeSet::new();

    for row in rows {
        match row.approver_type.as_str() {
            APPROVER_TYPE_ROUTES => {
                routes
                    .entry(row.match_expr.clone())
                    .or_default()
                    .extend(row.approvers.iter().cloned());
            }
            // Exit-node approval is one global set; the match is ignored.
            APPROVER_TYPE_EXIT_NODE => {
                exit_node.extend(row.approvers.iter().cloned());
            }
            other => {
                tracing::warn!(
                    auto_approver_id = row.id,
                    approver_type = other,
                    "Skipping auto-approver with unknown type"
                );
            }
        }
    }

    if routes.is_empty() && exit_node.is_empty() {
        return None;
    }
    Some(AutoApproverPolicy {
        routes: (!routes.is_empty()).then(|| collect_sets(routes)),
        exit_node: (!exit_node.is_empty()).then(|| exit_node.into_iter().collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn group(stack_id: i64, name: &str, members: &[&str]) -> Group {
        Group {
            id: stack_id * 100,
            stack_id,
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn host(stack_id: i64, name: &str, address: &str) -> Host {
        Host {
            id: stack_id * 100,
            stack_id,
            name: name.to_string(),
            address: address.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn acl_rule(stack_id: i64, rule_order: i32, src: &str) -> AclRule {
        AclRule {
            id: stack_id * 100 + rule_order as i64,
            stack_id,
            rule_order,
            action: "accept".to_string(),
            protocol: None,
            sources: vec![src.to_string()],
            destinations: vec!["*:*".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn approver(stack_id: i64, kind: &str, match_expr: &str, approvers: &[&str]) -> AutoApprover {
        AutoApprover {
            id: stack_id * 100,
            stack_id,
            approver_type: kind.to_string(),
            match_expr: match_expr.to_string(),
            approvers: approvers.iter().map(|a| a.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn group_union_collapses_duplicates() {
        let rows = vec![
            group(1, "group:eng", &["alice@example.com", "bob@example.com"]),
            group(2, "group:eng", &["bob@example.com", "carol@example.com"]),
        ];
        let merged = merge_groups(&rows).unwrap();
        assert_eq!(
            merged["group:eng"],
            vec!["alice@example.com", "bob@example.com", "carol@example.com"]
        );
    }

    #[test]
    fn group_union_is_idempotent() {
        let rows = vec![
            group(1, "group:eng", &["alice@example.com"]),
            group(2, "group:eng", &["bob@example.com"]),
        ];
        let once = merge_groups(&rows);
        // Merging the same contributions again adds nothing.
        let mut doubled = rows.clone();
        doubled.extend(rows.clone());
        assert_eq!(merge_groups(&doubled), once);
    }

    #[test]
    fn host_first_definition_wins() {
        // Rows arrive pre-ordered by stack precedence: stack 1 outranks 2.
        let rows = vec![
            host(1, "internal", "10.0.0.1"),
            host(2, "internal", "192.168.0.1"),
            host(2, "external", "203.0.113.7"),
        ];
        let merged = merge_hosts(&rows).unwrap();
        assert_eq!(merged["internal"], "10.0.0.1");
        assert_eq!(merged["external"], "203.0.113.7");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn acl_rules_concatenate_in_store_order() {
        // Store order is (priority, stack name, rule order): stack 2 has the
        // lower priority value here, so its rule comes first.
        let rows = vec![
            acl_rule(2, 0, "group:b0"),
            acl_rule(1, 0, "group:a0"),
            acl_rule(1, 1, "group:a1"),
        ];
        let merged = merge_acl_rules(&rows).unwrap();
        let sources: Vec<_> = merged.iter().map(|e| e.src[0].as_str()).collect();
        assert_eq!(sources, vec!["group:b0", "group:a0", "group:a1"]);
    }

    #[test]
    fn acl_rules_are_not_deduplicated() {
        let rows = vec![acl_rule(1, 0, "group:a"), acl_rule(2, 0, "group:a")];
        assert_eq!(merge_acl_rules(&rows).unwrap().len(), 2);
    }

    #[test]
    fn route_approvers_union_without_duplicates() {
        let rows = vec![
            approver(1, APPROVER_TYPE_ROUTES, "10.0.0.0/8", &["tag:infra"]),
            approver(2, APPROVER_TYPE_ROUTES, "10.0.0.0/8", &["tag:infra", "group:net"]),
        ];
        let merged = merge_auto_approvers(&rows).unwrap();
        assert_eq!(
            merged.routes.unwrap()["10.0.0.0/8"],
            vec!["group:net", "tag:infra"]
        );
        assert!(merged.exit_node.is_none());
    }

    #[test]
    fn exit_node_approvers_ignore_match() {
        let rows = vec![
            approver(1, APPROVER_TYPE_EXIT_NODE, "", &["tag:relay"]),
            approver(2, APPROVER_TYPE_EXIT_NODE, "anything", &["group:ops"]),
        ];
        let merged = merge_auto_approvers(&rows).unwrap();
        assert_eq!(merged.exit_node.unwrap(), vec!["group:ops", "tag:relay"]);
        assert!(merged.routes.is_none());
    }

    #[test]
    fn auto_approvers_with_no_rows_are_omitted() {
        assert!(merge_auto_approvers(&[]).is_none());
    }

    #[test]
    fn grant_app_payload_is_typed() {
        let rows = vec![Grant {
            id: 1,
            stack_id: 1,
            rule_order: 0,
            sources: vec!["group:dev".to_string()],
            destinations: vec!["tag:ci".to_string()],
            ip: None,
            app: Some(serde_json::json!({
                "example.com/cap/ci": [{"role": "builder"}]
            })),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }];
        let merged = merge_grants(&rows).unwrap().unwrap();
        let app = merged[0].app.as_ref().unwrap();
        assert_eq!(app["example.com/cap/ci"][0]["role"], "builder");
    }

    #[test]
    fn malformed_grant_app_payload_is_an_error() {
        let rows = vec![Grant {
            id: 7,
            stack_id: 1,
            rule_order: 0,
            sources: vec![],
            destinations: vec![],
            ip: None,
            // A capability map must be object -> array.
            app: Some(serde_json::json!("not-a-map")),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }];
        assert!(merge_grants(&rows).is_err());
    }

    #[test]
    fn empty_inputs_produce_absent_sections() {
        assert!(merge_groups(&[]).is_none());
        assert!(merge_tag_owners(&[]).is_none());
        assert!(merge_hosts(&[]).is_none());
        assert!(merge_postures(&[]).is_none());
        assert!(merge_ip_sets(&[]).is_none());
        assert!(merge_acl_rules(&[]).is_none());
        assert!(merge_ssh_rules(&[]).is_none());
        assert!(merge_grants(&[]).unwrap().is_none());
        assert!(merge_node_attrs(&[]).is_none());
        assert!(merge_acl_tests(&[]).is_none());
    }
}
