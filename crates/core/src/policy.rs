//! The merged access-control policy document.
//!
//! This is the exact shape pushed to the remote network-policy service.
//! Every section is optional: the remote schema treats an absent section
//! differently from an empty one, so a section with no content must be
//! `None` (omitted from the JSON), never an empty map or array.
//!
//! All maps are `BTreeMap` so the rendered document is deterministic for a
//! given store state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The merged policy document, aggregated across all stacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Group name -> union of members across all stacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, Vec<String>>>,

    /// Tag -> union of owners across all stacks.
    #[serde(default, rename = "tagOwners", skip_serializing_if = "Option::is_none")]
    pub tag_owners: Option<BTreeMap<String, Vec<String>>>,

    /// Host name -> address; first (highest-precedence) definition wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<BTreeMap<String, String>>,

    /// Network ACL rules, in (stack precedence, rule order) order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acls: Option<Vec<AclEntry>>,

    /// SSH access rules, in (stack precedence, rule order) order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh: Option<Vec<SshEntry>>,

    /// Grants, in (stack precedence, rule order) order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grants: Option<Vec<GrantEntry>>,

    /// Route / exit-node auto-approvers, unioned across stacks.
    #[serde(default, rename = "autoApprovers", skip_serializing_if = "Option::is_none")]
    pub auto_approvers: Option<AutoApproverPolicy>,

    /// Node attributes, in (stack precedence, rule order) order.
    #[serde(default, rename = "nodeAttrs", skip_serializing_if = "Option::is_none")]
    pub node_attrs: Option<Vec<NodeAttrEntry>>,

    /// Posture name -> rules; first (highest-precedence) definition wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postures: Option<BTreeMap<String, Vec<String>>>,

    /// IP set name -> addresses; first (highest-precedence) definition wins.
    #[serde(default, rename = "ipsets", skip_serializing_if = "Option::is_none")]
    pub ip_sets: Option<BTreeMap<String, Vec<String>>>,

    /// ACL assertion tests, in (stack precedence, test order) order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<AclTestEntry>>,
}

/// One network ACL rule in the merged document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclEntry {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto: Option<String>,
    pub src: Vec<String>,
    pub dst: Vec<String>,
}

/// One SSH rule in the merged document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshEntry {
    pub action: String,
    pub src: Vec<String>,
    pub dst: Vec<String>,
    pub users: Vec<String>,
    #[serde(default, rename = "checkPeriod", skip_serializing_if = "Option::is_none")]
    pub check_period: Option<String>,
}

/// One grant in the merged document.
///
/// `app` maps an application capability name to a list of opaque permission
/// objects the remote service interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantEntry {
    pub src: Vec<String>,
    pub dst: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<BTreeMap<String, Vec<serde_json::Value>>>,
}

/// The auto-approver section: per-route approver unions plus one global
/// exit-node approver set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoApproverPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, rename = "exitNode", skip_serializing_if = "Option::is_none")]
    pub exit_node: Option<Vec<String>>,
}

/// One node-attribute entry in the merged document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttrEntry {
    pub target: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<serde_json::Value>,
}

/// One ACL assertion test in the merged document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclTestEntry {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// PushStatus
// ---------------------------------------------------------------------------

/// Lifecycle of one recorded push attempt.
///
/// A policy version is created as `Pending` and transitions exactly once to
/// `Success` or `Failed` when the push outcome is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushStatus {
    Pending,
    Success,
    Failed,
}

impl PushStatus {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// Parse the database representation back into the enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PushStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A default (empty) policy serializes to `{}` — no section may appear
    /// as an empty map/array or as `null`.
    #[test]
    fn empty_policy_serializes_to_empty_object() {
        let json = serde_json::to_string(&Policy::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn populated_sections_use_remote_field_names() {
        let policy = Policy {
            tag_owners: Some(BTreeMap::from([(
                "tag:web".to_string(),
                vec!["group:ops".to_string()],
            )])),
            auto_approvers: Some(AutoApproverPolicy {
                routes: None,
                exit_node: Some(vec!["group:ops".to_string()]),
            }),
            ..Default::default()
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&policy).unwrap()).unwrap();
        assert_eq!(value["tagOwners"]["tag:web"][0], "group:ops");
        assert_eq!(value["autoApprovers"]["exitNode"][0], "group:ops");
        // Absent sections are absent keys, not nulls.
        assert!(value.get("groups").is_none());
        assert!(value.get("acls").is_none());
    }

    #[test]
    fn policy_roundtrips_through_rendered_form() {
        let policy = Policy {
            acls: Some(vec![AclEntry {
                action: "accept".to_string(),
                proto: Some("tcp".to_string()),
                src: vec!["group:dev".to_string()],
                dst: vec!["tag:staging:443".to_string()],
            }]),
            ..Default::default()
        };

        let rendered = serde_json::to_string(&policy).unwrap();
        let parsed: Policy = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, policy);
    }

    #[test]
    fn push_status_parse_matches_as_str() {
        for status in [PushStatus::Pending, PushStatus::Success, PushStatus::Failed] {
            assert_eq!(PushStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PushStatus::parse("unknown"), None);
    }
}
