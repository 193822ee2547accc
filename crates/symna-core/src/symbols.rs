//! Symbol tables mapping circuit entities to expression symbols.

use indexmap::IndexMap;
use symna_algebra::{Expr, Symbol};

use crate::circuit::Circuit;
use crate::component::ComponentKind;
use crate::error::{Error, Result};
use crate::node::NodeId;

/// Known parameters and unknowns of one circuit.
///
/// Ground maps to the literal `0`; every other node gets a potential
/// unknown `v_<node>`. Voltage and current sources get a branch-current
/// unknown `i_<name>`. Each non-virtual component with a value gets a
/// parameter symbol named after it; current sources only do when
/// `pin_current_sources` is set.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    potentials: IndexMap<NodeId, Expr>,
    currents: IndexMap<String, Expr>,
    parameters: IndexMap<String, Expr>,
    frequency: Expr,
}

impl SymbolTable {
    pub fn new(circuit: &Circuit, pin_current_sources: bool) -> Self {
        let potentials = circuit
            .nodes()
            .iter()
            .map(|node| {
                let potential = if node.is_ground() {
                    Expr::zero()
                } else {
                    Expr::symbol(Symbol::potential(node.as_str()))
                };
                (node.clone(), potential)
            })
            .collect();

        let currents = circuit
            .linear_components()
            .filter(|c| c.kind().is_source())
            .map(|c| (c.name().to_string(), Expr::symbol(Symbol::current(c.name()))))
            .collect();

        let parameters = circuit
            .linear_components()
            .filter(|c| !c.is_virtual() && c.kind().has_value())
            .filter(|c| pin_current_sources || c.kind() != ComponentKind::CurrentSource)
            .map(|c| {
                (
                    c.name().to_string(),
                    Expr::symbol(Symbol::parameter(c.name())),
                )
            })
            .collect();

        Self {
            potentials,
            currents,
            parameters,
            frequency: Expr::symbol(Symbol::Frequency),
        }
    }

    pub fn potential(&self, node: &NodeId) -> Result<&Expr> {
        self.potentials
            .get(node)
            .ok_or_else(|| Error::NodeNotFound(node.to_string()))
    }

    pub fn current(&self, component: &str) -> Result<&Expr> {
        self.currents
            .get(component)
            .ok_or_else(|| Error::ComponentNotFound(component.to_string()))
    }

    pub fn parameter(&self, component: &str) -> Option<&Expr> {
        self.parameters.get(component)
    }

    /// Every node of the circuit, ground included.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.potentials.keys()
    }

    /// The Laplace variable `p`.
    pub fn frequency(&self) -> &Expr {
        &self.frequency
    }

    /// Names of the components whose values are known parameters.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    /// Unknowns in solving order: node potentials, then branch currents.
    pub fn unknowns(&self) -> Vec<Symbol> {
        let potentials = self
            .potentials
            .keys()
            .filter(|node| !node.is_ground())
            .map(|node| Symbol::potential(node.as_str()));
        let currents = self.currents.keys().map(|name| Symbol::current(name.as_str()));
        potentials.chain(currents).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    fn inverter() -> Circuit {
        Circuit::new(
            vec![
                Component::voltage_source("Vin", "3", "0", None),
                Component::resistor("R1", "1", "3", Some(1e3)),
                Component::resistor("R2", "2", "1", Some(1e4)),
                Component::opamp("O1", "0", "1", "2"),
                Component::current_source("I1", "3", "0", Some(1.0)),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_order() {
        let symbols = SymbolTable::new(&inverter(), false);
        let names: Vec<_> = symbols.unknowns().iter().map(Symbol::to_string).collect();
        assert_eq!(
            names,
            vec!["v_1", "v_2", "v_3", "i_Vin", "i_I1", "i_O1_voltage"]
        );
    }

    #[test]
    fn test_ground_is_zero() {
        let symbols = SymbolTable::new(&inverter(), false);
        assert!(symbols.potential(&NodeId::ground()).unwrap().is_zero());
        assert!(symbols.potential(&NodeId::new("9")).is_err());
    }

    #[test]
    fn test_parameters_skip_virtual_components() {
        let symbols = SymbolTable::new(&inverter(), false);
        let names: Vec<_> = symbols.parameter_names().collect();
        assert_eq!(names, vec!["Vin", "R1", "R2"]);
        assert!(symbols.parameter("O1_voltage").is_none());

        let pinned = SymbolTable::new(&inverter(), true);
        assert!(pinned.parameter("I1").is_some());
    }
}
