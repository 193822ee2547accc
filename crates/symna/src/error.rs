//! Error type spanning the whole pipeline.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] symna_parser::Error),

    #[error(transparent)]
    Core(#[from] symna_core::Error),

    #[error(transparent)]
    Solver(#[from] symna_solver::Error),

    #[error("no circuit stored under id {id}")]
    UnknownCircuit { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
