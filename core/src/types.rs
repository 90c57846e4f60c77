//! Wire entities and their declared forms.
//!
//! # Design
//! Wire types mirror the backend's JSON. Groups embed full engineers and
//! pairings embed full groups on read, but on write only the `id` of an
//! embedded object matters, so nested lists always go out as id-only stubs
//! (`{"id":"…"}`). Top-level scalars and reference lists are always written,
//! so clearing a list sends `[]` rather than leaving the field out. Only the
//! top-level `id` is skipped when empty, which keeps it out of create bodies.
//! Every field defaults on decode because the backend does not always echo
//! complete objects.
//!
//! The `*Decl` types are what a caller declares (references as id lists, no
//! id of its own). The `*State` types are the canonical declared form after
//! the backend has assigned an id.

use serde::{Deserialize, Serialize, Serializer};

use crate::codec::Reference;

#[derive(Serialize)]
struct Stub<'a> {
    id: &'a str,
}

/// Serialize embedded entities as `{"id": ...}` objects, dropping every
/// other field.
#[allow(clippy::ptr_arg)]
fn as_stubs<T, S>(items: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Reference,
    S: Serializer,
{
    serializer.collect_seq(items.iter().map(|item| Stub { id: item.id() }))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Engineer {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A development group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dev {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, serialize_with = "as_stubs")]
    pub engineers: Vec<Engineer>,
}

/// An operations group. Same shape as `Dev`, different collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ops {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, serialize_with = "as_stubs")]
    pub engineers: Vec<Engineer>,
}

/// Many-to-many pairing of dev groups with ops groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevOps {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, serialize_with = "as_stubs")]
    pub dev: Vec<Dev>,
    #[serde(default, serialize_with = "as_stubs")]
    pub ops: Vec<Ops>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineerDecl {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevDecl {
    pub name: String,
    /// Ids of engineers that already exist.
    #[serde(default)]
    pub engineers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpsDecl {
    pub name: String,
    #[serde(default)]
    pub engineers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevOpsDecl {
    /// Ids of dev groups that already exist.
    pub dev: Vec<String>,
    /// Ids of ops groups that already exist.
    pub ops: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineerState {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevState {
    pub id: String,
    pub name: String,
    pub engineers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpsState {
    pub id: String,
    pub name: String,
    pub engineers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevOpsState {
    pub id: String,
    pub dev: Vec<String>,
    pub ops: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_engineer_serializes_to_id_only() {
        let dev = Dev {
            id: "D1".to_string(),
            name: "Team1".to_string(),
            engineers: vec![Engineer {
                id: "E1".to_string(),
                name: "Colin".to_string(),
                email: "colin@x.com".to_string(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&dev).unwrap(),
            serde_json::json!({"id": "D1", "name": "Team1", "engineers": [{"id": "E1"}]})
        );
    }

    #[test]
    fn new_entity_omits_id_but_keeps_empty_list() {
        let dev = Dev {
            name: "Team1".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&dev).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json, serde_json::json!({"name": "Team1", "engineers": []}));
    }

    #[test]
    fn empty_scalars_are_still_sent() {
        let engineer = Engineer::default();
        assert_eq!(
            serde_json::to_value(&engineer).unwrap(),
            serde_json::json!({"name": "", "email": ""})
        );
    }

    #[test]
    fn group_stub_inside_pairing_carries_only_id() {
        let devops = DevOps {
            dev: vec![Dev {
                id: "D1".to_string(),
                name: "Team1".to_string(),
                engineers: vec![Engineer {
                    id: "E1".to_string(),
                    ..Default::default()
                }],
            }],
            ops: vec![Ops {
                id: "O1".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&devops).unwrap(),
            serde_json::json!({"dev": [{"id": "D1"}], "ops": [{"id": "O1"}]})
        );
    }

    #[test]
    fn cleared_pairing_sends_empty_lists() {
        assert_eq!(
            serde_json::to_value(DevOps::default()).unwrap(),
            serde_json::json!({"dev": [], "ops": []})
        );
    }

    #[test]
    fn dev_decodes_nested_engineers() {
        let dev: Dev = serde_json::from_str(
            r#"{"id":"D1","name":"Team1","engineers":[{"id":"E1","name":"Colin","email":"colin@x.com"}]}"#,
        )
        .unwrap();
        assert_eq!(dev.engineers.len(), 1);
        assert_eq!(dev.engineers[0].email, "colin@x.com");
    }

    #[test]
    fn partial_devops_echo_decodes() {
        let devops: DevOps = serde_json::from_str(r#"{"id":"P1"}"#).unwrap();
        assert_eq!(devops.id, "P1");
        assert!(devops.dev.is_empty());
        assert!(devops.ops.is_empty());
    }

    #[test]
    fn null_reference_list_is_rejected() {
        let result: Result<Dev, _> = serde_json::from_str(r#"{"id":"D1","engineers":null}"#);
        assert!(result.is_err());
    }
}
