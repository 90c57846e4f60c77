//! Conversions between declarations, wire entities and declared state.
//!
//! Outbound, reference id lists become id-only stub objects. Inbound, nested
//! objects are flattened back to id lists in the order the backend returned
//! them.

use crate::types::{
    Dev, DevDecl, DevOps, DevOpsDecl, DevOpsState, DevState, Engineer, EngineerDecl,
    EngineerState, Ops, OpsDecl, OpsState,
};

/// An entity that can be embedded in another one by id.
pub trait Reference: Sized {
    fn id(&self) -> &str;

    /// Minimal object carrying only `id`.
    fn stub(id: &str) -> Self;
}

impl Reference for Engineer {
    fn id(&self) -> &str {
        &self.id
    }

    fn stub(id: &str) -> Self {
        Engineer {
            id: id.to_string(),
            ..Default::default()
        }
    }
}

impl Reference for Dev {
    fn id(&self) -> &str {
        &self.id
    }

    fn stub(id: &str) -> Self {
        Dev {
            id: id.to_string(),
            ..Default::default()
        }
    }
}

impl Reference for Ops {
    fn id(&self) -> &str {
        &self.id
    }

    fn stub(id: &str) -> Self {
        Ops {
            id: id.to_string(),
            ..Default::default()
        }
    }
}

pub fn stubs<T: Reference>(ids: &[String]) -> Vec<T> {
    ids.iter().map(|id| T::stub(id)).collect()
}

pub fn ids_of<T: Reference>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

/// Order-insensitive equality of two reference lists. Duplicates count, so
/// `[a, a, b]` and `[a, b, b]` differ.
pub fn same_members(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<&str> = a.iter().map(String::as_str).collect();
    let mut right: Vec<&str> = b.iter().map(String::as_str).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

pub fn encode_engineer(decl: &EngineerDecl) -> Engineer {
    Engineer {
        id: String::new(),
        name: decl.name.clone(),
        email: decl.email.clone(),
    }
}

pub fn encode_dev(decl: &DevDecl) -> Dev {
    Dev {
        id: String::new(),
        name: decl.name.clone(),
        engineers: stubs(&decl.engineers),
    }
}

pub fn encode_ops(decl: &OpsDecl) -> Ops {
    Ops {
        id: String::new(),
        name: decl.name.clone(),
        engineers: stubs(&decl.engineers),
    }
}

pub fn encode_devops(decl: &DevOpsDecl) -> DevOps {
    DevOps {
        id: String::new(),
        dev: stubs(&decl.dev),
        ops: stubs(&decl.ops),
    }
}

pub fn project_engineer(wire: Engineer) -> EngineerState {
    EngineerState {
        id: wire.id,
        name: wire.name,
        email: wire.email,
    }
}

pub fn project_dev(wire: Dev) -> DevState {
    DevState {
        engineers: ids_of(&wire.engineers),
        id: wire.id,
        name: wire.name,
    }
}

pub fn project_ops(wire: Ops) -> OpsState {
    OpsState {
        engineers: ids_of(&wire.engineers),
        id: wire.id,
        name: wire.name,
    }
}

pub fn project_devops(wire: DevOps) -> DevOpsState {
    DevOpsState {
        dev: ids_of(&wire.dev),
        ops: ids_of(&wire.ops),
        id: wire.id,
    }
}
