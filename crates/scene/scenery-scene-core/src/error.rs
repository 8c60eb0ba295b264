use std::fmt;

use thiserror::Error;

use scenery_api_core::{NodeId, NodePath};

/// Fatal failure while decoding one document. No tree is produced.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed document buffer: {0}")]
    Malformed(#[from] bincode::Error),
    #[error("root record has kind {found}, expected a scene or prefab")]
    UnexpectedRoot { found: &'static str },
    #[error("{kind} node is missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("prefab document has no content node")]
    EmptyPrefab,
    #[error("node hierarchy is nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("node {0} is not in the tree")]
    UnknownNode(NodeId),
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] bincode::Error),
}

/// A named thing that was not found. Never fatal; callers log it and degrade.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupMiss {
    Node(NodeId),
    Path { root: NodeId, path: NodePath },
    SpriteFrame(String),
    Clip { target: NodeId, name: String },
}

impl fmt::Display for LookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMiss::Node(id) => write!(f, "node {id} no longer exists"),
            LookupMiss::Path { root, path } => write!(f, "no node at '{path}' below {root}"),
            LookupMiss::SpriteFrame(name) => write!(f, "sprite frame '{name}' is not registered"),
            LookupMiss::Clip { target, name } => write!(f, "no clip '{name}' on {target}"),
        }
    }
}

impl std::error::Error for LookupMiss {}
