use serde::{Deserialize, Serialize};

use crate::error::GraphResult;

/// Construction-time settings shared by every storage backend.
///
/// All fields are optional in the serialized form; missing fields take the
/// defaults below, unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Number of vertex records to pre-allocate.
    pub vertex_capacity: usize,
    /// Number of edge records to pre-allocate.
    pub edge_capacity: usize,
    /// Run a full integrity check after every mutating operation.
    ///
    /// This is O(V + E) per mutation, intended for tests and debugging.
    pub verify_integrity: bool,
}

impl GraphConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(text: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build a configuration from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> GraphResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(mut self, vertex_capacity: usize, edge_capacity: usize) -> Self {
        self.vertex_capacity = vertex_capacity;
        self.edge_capacity = edge_capacity;
        self
    }

    pub fn with_verify_integrity(mut self, verify: bool) -> Self {
        self.verify_integrity = verify;
        self
    }
}
