//! Persisted layout form.
//!
//! A [`LayoutSnapshot`] is the canonical serialized shape of a [`PaneTree`]:
//! nodes sorted by id, plus the schema version and id watermark. Loading a
//! snapshot runs the full tree validation, so a corrupted layout is rejected
//! instead of producing a half-valid model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{InvariantViolation, LayoutError};
use crate::ids::PaneId;
use crate::tree::{validate_tree, PaneNode, PaneTree};

/// Current persisted layout schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

/// Canonical serialized tree shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub schema_version: u16,
    pub root: PaneId,
    pub next_id: PaneId,
    pub nodes: Vec<PaneNode>,
}

impl LayoutSnapshot {
    /// Sort nodes by id for deterministic serialization.
    pub fn canonicalize(&mut self) {
        self.nodes.sort_by_key(|node| node.id);
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        serde_json::to_string(self).map_err(|err| LayoutError::Decode {
            message: err.to_string(),
        })
    }

    /// Decode from JSON without validating the tree.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(json).map_err(|err| LayoutError::Decode {
            message: err.to_string(),
        })
    }
}

impl PaneTree {
    /// Construct and validate from a snapshot.
    pub fn from_snapshot(mut snapshot: LayoutSnapshot) -> Result<Self, LayoutError> {
        if snapshot.schema_version != LAYOUT_SCHEMA_VERSION {
            return Err(LayoutError::UnsupportedSchemaVersion {
                version: snapshot.schema_version,
            });
        }
        snapshot.canonicalize();
        let mut nodes = BTreeMap::new();
        for node in snapshot.nodes {
            let node_id = node.id;
            if nodes.insert(node_id, node).is_some() {
                return Err(InvariantViolation::DuplicateNodeId { node_id }.into());
            }
        }
        validate_tree(snapshot.root, snapshot.next_id, &nodes)?;
        Ok(Self {
            root: snapshot.root,
            next_id: snapshot.next_id,
            nodes,
        })
    }

    /// Export to canonical snapshot form.
    #[must_use]
    pub fn to_snapshot(&self) -> LayoutSnapshot {
        let mut snapshot = LayoutSnapshot {
            schema_version: LAYOUT_SCHEMA_VERSION,
            root: self.root,
            next_id: self.next_id,
            nodes: self.nodes.values().cloned().collect(),
        };
        snapshot.canonicalize();
        snapshot
    }

    /// Serialize the tree as a JSON layout document.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        self.to_snapshot().to_json()
    }

    /// Parse and validate a JSON layout document.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Self::from_snapshot(LayoutSnapshot::from_json(json)?)
    }
}
