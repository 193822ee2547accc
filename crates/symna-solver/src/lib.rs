//! Symbolic MNA solver for symna.
//!
//! This crate provides:
//! - Equation assembly (node laws plus constitutive equations)
//! - Exact fraction-free solution of the symbolic linear system
//! - Symbolic and numeric transfer-function extraction
//! - Step and Bode responses of the resulting LTI system

pub mod analysis;
pub mod config;
pub mod equations;
pub mod error;
pub mod lti;
pub mod response;
pub mod solve;
pub mod transfer;

pub use analysis::Analysis;
pub use config::{SimulationConfig, SolverConfig};
pub use equations::{EquationBuilder, EquationSystem, build_equations};
pub use error::{Error, Result};
pub use lti::StateSpace;
pub use response::{
    FrequencyResponse, StepResponse, frequency_response, frequency_response_with,
    generate_frequencies, step_response, step_response_with,
};
pub use solve::{SymbolicSolution, solve, solve_system};
pub use transfer::{
    ParameterValues, TransferFunction, numeric_transfer_function, symbolic_transfer_function,
};
