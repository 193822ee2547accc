//! Error types for symna-algebra.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("integer coefficient overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("polynomial division is not exact")]
    NotExact,
}

pub type Result<T> = std::result::Result<T, Error>;
