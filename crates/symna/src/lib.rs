//! # symna
//!
//! Symbolic Modified Nodal Analysis of linear circuits.
//!
//! symna provides:
//! - Netlist parsing with engineering-unit values and symbolic components
//! - Ideal op-amp linearization
//! - Exact symbolic solution of the MNA equations in the Laplace variable `p`
//! - Symbolic and numeric transfer functions
//! - Step and Bode responses
//!
//! ## Quick Start
//!
//! ```rust
//! use symna::prelude::*;
//!
//! let netlist = "Vin 1 0 Symbolic\nR1 1 2 Symbolic\nR2 2 0 Symbolic\n";
//! let analysis = symna::build(netlist, SolverConfig::default()).unwrap();
//!
//! let h = analysis.transfer_function("1", "2").unwrap();
//! assert_eq!(h.to_string(), "R2/(R1 + R2)");
//! ```
//!
//! ## Responses
//!
//! ```rust
//! use symna::prelude::*;
//!
//! let netlist = "V1 1 0 DC 1\nR1 1 2 1k\nC1 2 0 1u\n";
//! let analysis = symna::build(netlist, SolverConfig::default()).unwrap();
//! let tf = analysis.numeric_transfer_function("1", "2").unwrap();
//!
//! let step = step_response(&tf.numerator, &tf.denominator).unwrap();
//! assert_eq!(step.output[0], 0.0);
//!
//! let bode = frequency_response(&tf.numerator, &tf.denominator).unwrap();
//! assert_eq!(bode.len(), 100);
//! ```

pub mod cache;
pub mod error;

pub use symna_algebra as algebra;
pub use symna_core as core;
pub use symna_parser as parser;
pub use symna_solver as solver;

pub use cache::AnalysisCache;
pub use error::{Error, Result};

pub use symna_algebra::{Error as AlgebraError, Expr, Poly, Symbol};

pub use symna_core::{
    Circuit, Component, ComponentKind, Equation, EquationKind, Error as CoreError, NodeId,
    SymbolTable,
    units::{format_value, parse_value},
};

pub use symna_parser::{Error as ParseError, ParseResult, parse};

pub use symna_solver::{
    Analysis, EquationSystem, Error as SolverError, FrequencyResponse, ParameterValues,
    SimulationConfig, SolverConfig, StepResponse, SymbolicSolution, TransferFunction,
    build_equations, frequency_response, frequency_response_with, numeric_transfer_function,
    solve, step_response, step_response_with, symbolic_transfer_function,
};

pub use num_complex::Complex;

/// Parse `netlist`, build and linearize the circuit.
///
/// Nothing is solved yet; the returned [`Analysis`] solves on first use.
pub fn build(netlist: &str, config: SolverConfig) -> Result<Analysis> {
    let (components, nodes) = parse(netlist)?.into_parts();
    let circuit = Circuit::new(components, nodes)?;
    Ok(Analysis::with_config(circuit, config))
}

/// Prelude module containing commonly used types and functions.
///
/// ```rust
/// use symna::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Circuit, Component, ComponentKind, Expr, NodeId, Symbol};

    pub use crate::{ParseResult, parse};

    pub use crate::{
        Analysis, SimulationConfig, SolverConfig, SymbolicSolution, TransferFunction, solve,
    };

    pub use crate::{FrequencyResponse, StepResponse, frequency_response, step_response};

    pub use crate::{AnalysisCache, build};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_divider() {
        let analysis = build(
            "Vin 1 0 Symbolic\nR1 1 2 Symbolic\nR2 2 0 Symbolic\n",
            SolverConfig::default(),
        )
        .unwrap();
        let tap = analysis.solution().unwrap().potential("2").unwrap();

        let r1 = Expr::symbol(Symbol::parameter("R1"));
        let r2 = Expr::symbol(Symbol::parameter("R2"));
        let vin = Expr::symbol(Symbol::parameter("Vin"));
        let expected = vin
            .checked_mul(&r2)
            .and_then(|num| num.checked_div(&r1.checked_add(&r2)?))
            .unwrap();
        assert_eq!(tap, expected);
    }

    #[test]
    fn test_errors_are_wrapped() {
        let err = build("Q1 1 2 3\n", SolverConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {err:?}");

        let err = build("V1 1 0 DC 1\nV2 0 1 DC 2\n", SolverConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Parse(ref e) if e.is_topology()), "got {err:?}");
    }

    #[test]
    fn test_solver_errors_surface_through_facade() {
        let analysis = build("I1 0 1 1m\nR1 1 0 1k\n", SolverConfig::default()).unwrap();
        let err: Error = analysis.solution().unwrap_err().into();
        assert!(matches!(err, Error::Solver(ref e) if e.is_solve_failure()));
    }
}
