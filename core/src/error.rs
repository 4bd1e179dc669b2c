//! Error types for graph operations.
//!
//! Most of the engine reports failure through sentinels (null handles,
//! `inserted` flags, removal counts). `GraphError` covers the places where a
//! caller needs to know *why* something failed: typed attribute reads,
//! configuration parsing, integrity verification and tools that require an
//! existing vertex.

use thiserror::Error;

use crate::graph::{EdgeId, VertexId};

/// Errors that can occur in graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A vertex was not found.
    #[error("vertex not found: {0}")]
    VertexNotFound(VertexId),

    /// An edge was not found.
    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// The requested attribute key is not present.
    #[error("attribute not found: {key}")]
    AttributeNotFound {
        /// The missing key.
        key: String,
    },

    /// The attribute exists but does not deserialize into the requested type.
    #[error("attribute {key} has an unexpected type: {source}")]
    AttributeType {
        /// The attribute key.
        key: String,
        /// The underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The primary tables and the adjacency or label indices disagree.
    #[error("integrity violation: {0}")]
    Integrity(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
