use thiserror::Error;

use crate::core::types::{ItemId, MobId};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Mob not found: {0}")]
    MobNotFound(MobId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Unknown use action: {0}")]
    UnknownUseAction(String),

    #[error("Unknown on-tick action: {0}")]
    UnknownOnTickAction(String),

    #[error("Unknown mob template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown item type: {0}")]
    UnknownItemType(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("No applicable behavior for {0}")]
    NoApplicableBehavior(MobId),

    #[error("World registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Broad class of a failure, deciding how far it may propagate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad keys, templates or files; fatal and never retried
    Configuration,
    /// Broken internal state detected at the point of use
    Invariant,
    /// A collaborator is down; contained at its boundary
    Transient,
}

impl SimError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SimError::UnknownUseAction(_)
            | SimError::UnknownOnTickAction(_)
            | SimError::UnknownTemplate(_)
            | SimError::UnknownItemType(_)
            | SimError::Config(_)
            | SimError::IoError(_)
            | SimError::SerdeError(_)
            | SimError::TomlError(_) => ErrorCategory::Configuration,
            SimError::RegistryUnavailable(_) => ErrorCategory::Transient,
            SimError::MobNotFound(_)
            | SimError::ItemNotFound(_)
            | SimError::Invariant(_)
            | SimError::NoApplicableBehavior(_) => ErrorCategory::Invariant,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
