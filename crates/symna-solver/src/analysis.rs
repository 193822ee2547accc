//! Per-circuit analysis with memoized equations and solution.

use std::sync::OnceLock;

use log::debug;
use symna_algebra::Expr;
use symna_core::Circuit;

use crate::config::SolverConfig;
use crate::equations::{EquationSystem, build_equations};
use crate::error::Result;
use crate::solve::{SymbolicSolution, solve_system};
use crate::transfer::{
    ParameterValues, TransferFunction, numeric_transfer_function, symbolic_transfer_function,
};

/// Owns one circuit and solves it at most once.
///
/// Transfer functions are derived from the memoized solution on every call;
/// caching them per node pair is left to the caller.
#[derive(Debug)]
pub struct Analysis {
    circuit: Circuit,
    config: SolverConfig,
    system: OnceLock<EquationSystem>,
    solution: OnceLock<SymbolicSolution>,
}

impl Analysis {
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SolverConfig::default())
    }

    pub fn with_config(circuit: Circuit, config: SolverConfig) -> Self {
        Self {
            circuit,
            config,
            system: OnceLock::new(),
            solution: OnceLock::new(),
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The assembled equations, built on first use.
    pub fn equations(&self) -> Result<&EquationSystem> {
        if let Some(system) = self.system.get() {
            return Ok(system);
        }
        let system = build_equations(&self.circuit, &self.config)?;
        Ok(self.system.get_or_init(|| system))
    }

    /// The symbolic solution, computed on first use.
    pub fn solution(&self) -> Result<&SymbolicSolution> {
        if let Some(solution) = self.solution.get() {
            debug!("reusing memoized solution");
            return Ok(solution);
        }
        let solution = solve_system(self.equations()?)?;
        Ok(self.solution.get_or_init(|| solution))
    }

    pub fn is_solved(&self) -> bool {
        self.solution.get().is_some()
    }

    /// Reduced `V(output) / V(input)`.
    pub fn transfer_function(&self, input: &str, output: &str) -> Result<Expr> {
        symbolic_transfer_function(self.solution()?, input, output)
    }

    /// Numeric values of every component that has one.
    pub fn parameter_values(&self) -> ParameterValues {
        ParameterValues::from_components(self.circuit.components())
    }

    /// Transfer function with the circuit's own component values substituted.
    pub fn numeric_transfer_function(&self, input: &str, output: &str) -> Result<TransferFunction> {
        let h = self.transfer_function(input, output)?;
        numeric_transfer_function(&h, &self.parameter_values())
    }
}
