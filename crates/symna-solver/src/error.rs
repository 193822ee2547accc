//! Error types for symna-solver.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("equation system is inconsistent: {equation}")]
    Inconsistent { equation: String },

    #[error("equation system is underdetermined, free unknowns: {}", .unknowns.join(", "))]
    Underdetermined { unknowns: Vec<String> },

    #[error("equation is not linear in the unknowns: {equation}")]
    Nonlinear { equation: String },

    #[error("node {node} is not part of the solved circuit")]
    NodeReference { node: String },

    #[error("potential of input node {node} is identically zero")]
    ZeroInput { node: String },

    #[error("no numeric value for: {}", .symbols.join(", "))]
    MissingValue { symbols: Vec<String> },

    #[error("invalid denominator: {0}")]
    InvalidDenominator(String),

    #[error("improper transfer function: numerator degree {numerator} exceeds denominator degree {denominator}")]
    ImproperSystem { numerator: usize, denominator: usize },

    #[error("degenerate response: {0}")]
    DegenerateResponse(String),

    #[error(transparent)]
    Algebra(#[from] symna_algebra::Error),

    #[error(transparent)]
    Core(#[from] symna_core::Error),
}

impl Error {
    /// True when the symbolic linear system could not be solved.
    pub fn is_solve_failure(&self) -> bool {
        matches!(
            self,
            Error::Inconsistent { .. }
                | Error::Underdetermined { .. }
                | Error::Nonlinear { .. }
                | Error::Algebra(_)
        )
    }

    /// True when a time or frequency response could not be computed.
    pub fn is_simulation_failure(&self) -> bool {
        matches!(
            self,
            Error::InvalidDenominator(_)
                | Error::ImproperSystem { .. }
                | Error::DegenerateResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
