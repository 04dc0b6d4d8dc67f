//! Error types for the canopy rendering core.
//!
//! Context resolution itself never fails; these cover the host engine and
//! configuration loading.

use crate::types::NodeId;
use thiserror::Error;

/// Tree and renderer errors
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {id} is not a mounted `{expected}` component")]
    ComponentMismatch { id: NodeId, expected: &'static str },

    #[error("Node {0} is not a provider")]
    NotAProvider(NodeId),

    #[error("Node {0} is not a consumer")]
    NotAConsumer(NodeId),

    #[error("Render depth exceeded the configured limit of {limit}")]
    DepthExceeded { limit: usize },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}
