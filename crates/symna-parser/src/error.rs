//! Error types for symna-parser.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("line {line}: malformed component `{text}`: {message}")]
    Malformed {
        line: usize,
        text: String,
        message: String,
    },

    #[error("line {line}: unknown component kind `{text}`")]
    UnknownKind { line: usize, text: String },

    #[error("line {line}: AC sources are not supported: `{text}`")]
    UnsupportedAcSource { line: usize, text: String },

    #[error("line {line}: invalid value `{value}` in `{text}`")]
    InvalidValue {
        line: usize,
        text: String,
        value: String,
    },

    #[error("line {line}: duplicate component name {name}")]
    DuplicateName { line: usize, name: String },

    #[error("line {line}: voltage source {name} duplicates {existing} between the same nodes: `{text}`")]
    DuplicateVoltageSource {
        line: usize,
        text: String,
        name: String,
        existing: String,
    },

    #[error("line {line}: current sources {name} and {existing} are in series at node {node}: `{text}`")]
    SeriesCurrentSources {
        line: usize,
        text: String,
        name: String,
        existing: String,
        node: String,
    },

    #[error(transparent)]
    Core(#[from] symna_core::Error),
}

impl Error {
    /// True for errors about how sources are placed rather than how a line is written.
    pub fn is_topology(&self) -> bool {
        matches!(
            self,
            Error::DuplicateVoltageSource { .. } | Error::SeriesCurrentSources { .. }
        )
    }

    /// Line of the netlist the error refers to.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Malformed { line, .. }
            | Error::UnknownKind { line, .. }
            | Error::UnsupportedAcSource { line, .. }
            | Error::InvalidValue { line, .. }
            | Error::DuplicateName { line, .. }
            | Error::DuplicateVoltageSource { line, .. }
            | Error::SeriesCurrentSources { line, .. } => Some(*line),
            Error::Core(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
