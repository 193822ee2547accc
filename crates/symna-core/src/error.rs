//! Error types for symna-core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("component not found: {0}")]
    ComponentNotFound(String),

    #[error("no value symbol for component {0}")]
    MissingParameter(String),

    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),

    #[error("component {0} must be linearized before equations are assembled")]
    NotLinearized(String),

    #[error(transparent)]
    Algebra(#[from] symna_algebra::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
