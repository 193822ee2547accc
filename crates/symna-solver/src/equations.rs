//! Modified Nodal Analysis equation assembly.

use log::{debug, info};
use symna_algebra::{Expr, Symbol};
use symna_core::{Circuit, Equation, SymbolTable};

use crate::config::SolverConfig;
use crate::error::Result;

/// The assembled equations of one circuit with their unknowns.
#[derive(Debug, Clone)]
pub struct EquationSystem {
    equations: Vec<Equation>,
    unknowns: Vec<Symbol>,
    symbols: SymbolTable,
}

impl EquationSystem {
    /// Node laws first, in node order, then constitutive equations in
    /// component order.
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Node potentials of non-ground nodes, then branch currents.
    pub fn unknowns(&self) -> &[Symbol] {
        &self.unknowns
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }
}

/// Builds the MNA equations of a linearized circuit.
pub struct EquationBuilder<'a> {
    circuit: &'a Circuit,
    config: SolverConfig,
}

impl<'a> EquationBuilder<'a> {
    pub fn new(circuit: &'a Circuit, config: SolverConfig) -> Self {
        Self { circuit, config }
    }

    pub fn build(&self) -> Result<EquationSystem> {
        let symbols = SymbolTable::new(self.circuit, self.config.pin_current_sources);
        let mut equations = Vec::new();

        for node in self.circuit.non_ground_nodes() {
            let currents = self
                .circuit
                .connections(node)
                .map(|component| component.branch_current(node, &symbols))
                .collect::<symna_core::Result<Vec<Expr>>>()?;
            let equation = Equation::node_law(node.clone(), Expr::sum(&currents)?);
            debug!("{}: {}", equation.label(), equation);
            equations.push(equation);
        }

        for component in self.circuit.linear_components() {
            if let Some(equation) = component.constitutive_equation(&symbols)? {
                debug!("{}: {}", equation.label(), equation);
                equations.push(equation);
            }
        }

        let unknowns = symbols.unknowns();
        info!(
            "assembled {} equations in {} unknowns",
            equations.len(),
            unknowns.len()
        );
        Ok(EquationSystem {
            equations,
            unknowns,
            symbols,
        })
    }
}

/// Assemble the equations of `circuit`.
pub fn build_equations(circuit: &Circuit, config: &SolverConfig) -> Result<EquationSystem> {
    EquationBuilder::new(circuit, *config).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use symna_core::{Component, EquationKind, NodeId};

    fn divider() -> Circuit {
        Circuit::new(
            vec![
                Component::voltage_source("V1", "1", "0", Some(10.0)),
                Component::resistor("R1", "1", "2", Some(1e3)),
                Component::resistor("R2", "2", "0", Some(1e3)),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_node_laws_then_constitutive() {
        let system = build_equations(&divider(), &SolverConfig::default()).unwrap();
        let labels: Vec<_> = system.equations().iter().map(|e| e.label()).collect();
        assert_eq!(
            labels,
            vec![
                "node law for node 1",
                "node law for node 2",
                "value of voltage source V1"
            ]
        );
        assert_eq!(
            system.equations()[0].kind(),
            &EquationKind::NodeLaw(NodeId::new("1"))
        );
        let unknowns: Vec<_> = system.unknowns().iter().map(|s| s.to_string()).collect();
        assert_eq!(unknowns, vec!["v_1", "v_2", "i_V1"]);
    }

    #[test]
    fn test_node_law_content() {
        let system = build_equations(&divider(), &SolverConfig::default()).unwrap();
        let v = |n: &str| Expr::symbol(Symbol::potential(n));
        let r = |n: &str| Expr::symbol(Symbol::parameter(n));
        // (v_2 - v_1)/R1 + v_2/R2
        let expected = v("2")
            .checked_sub(&v("1"))
            .unwrap()
            .checked_div(&r("R1"))
            .unwrap()
            .checked_add(&v("2").checked_div(&r("R2")).unwrap())
            .unwrap();
        assert_eq!(system.equations()[1].lhs(), &expected);
        assert!(system.equations()[1].rhs().is_zero());
    }

    #[test]
    fn test_auxiliary_count_matches_flags() {
        let circuit = Circuit::new(
            vec![
                Component::voltage_source("Vin", "3", "0", None),
                Component::resistor("R1", "1", "3", None),
                Component::resistor("R2", "2", "1", None),
                Component::opamp("O1", "0", "1", "2"),
            ],
            Vec::new(),
        )
        .unwrap();
        let system = build_equations(&circuit, &SolverConfig::default()).unwrap();
        let flagged = circuit
            .linear_components()
            .filter(|c| c.needs_auxiliary_equation())
            .count();
        let auxiliary = system
            .equations()
            .iter()
            .filter(|e| matches!(e.kind(), EquationKind::Constitutive(_)))
            .count();
        assert_eq!(flagged, 2);
        assert_eq!(auxiliary, flagged);
        assert_eq!(system.len(), system.unknowns().len());
    }

    #[test]
    fn test_pinned_current_source_adds_equation() {
        let circuit = Circuit::new(
            vec![
                Component::current_source("I1", "0", "1", Some(1e-3)),
                Component::resistor("R1", "1", "0", Some(1e3)),
            ],
            Vec::new(),
        )
        .unwrap();
        let free = build_equations(&circuit, &SolverConfig::default()).unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free.unknowns().len(), 2);

        let config = SolverConfig {
            pin_current_sources: true,
        };
        let pinned = build_equations(&circuit, &config).unwrap();
        assert_eq!(pinned.len(), 2);
        assert_eq!(pinned.equations()[1].label(), "value of current source I1");
    }
}
