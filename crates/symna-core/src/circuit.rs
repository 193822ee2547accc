//! Circuit graph representation.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::debug;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::node::NodeId;

/// A circuit: its components, nodes, and node-to-component adjacency.
///
/// Construction linearizes every op-amp and then builds the adjacency,
/// which only lists linear components. Both steps run at most once.
#[derive(Debug, Clone)]
pub struct Circuit {
    components: Vec<Component>,
    /// Sorted, distinct node ids.
    nodes: Vec<NodeId>,
    /// Node to indices into `components`, one entry per terminal.
    connections: IndexMap<NodeId, Vec<usize>>,
    linearized: bool,
    connections_built: bool,
}

impl Circuit {
    /// Build a linearized circuit from parsed components and nodes.
    pub fn new(components: Vec<Component>, nodes: Vec<NodeId>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for component in &components {
            if !seen.insert(component.name()) {
                return Err(Error::InvalidCircuit(format!(
                    "duplicate component name {}",
                    component.name()
                )));
            }
        }

        let mut circuit = Self {
            components,
            nodes,
            connections: IndexMap::new(),
            linearized: false,
            connections_built: false,
        };
        circuit.linearize()?;
        circuit.build_connections();
        debug!(
            "circuit built: {} components, {} nodes",
            circuit.components.len(),
            circuit.nodes.len()
        );
        Ok(circuit)
    }

    /// Append the virtual replacements of every non-linear component.
    ///
    /// Idempotent: a second call leaves the component list unchanged.
    pub fn linearize(&mut self) -> Result<()> {
        if self.linearized {
            return Ok(());
        }
        let generated: Vec<Component> = self
            .components
            .iter()
            .flat_map(Component::linearize)
            .collect();
        for component in &generated {
            if self.component(component.name()).is_some() {
                return Err(Error::InvalidCircuit(format!(
                    "generated component {} clashes with an existing name",
                    component.name()
                )));
            }
            debug!(
                "linearized {} into {}",
                component.origin().unwrap_or_default(),
                component
            );
        }
        self.components.extend(generated);
        self.linearized = true;
        Ok(())
    }

    /// Index linear components by node. Runs once.
    pub fn build_connections(&mut self) {
        if self.connections_built {
            return;
        }
        let mut nodes: BTreeSet<NodeId> = self.nodes.drain(..).collect();
        let mut connections: IndexMap<NodeId, Vec<usize>> = IndexMap::new();
        for (index, component) in self.components.iter().enumerate() {
            nodes.extend(component.nodes().iter().cloned());
            if !component.is_linear() {
                continue;
            }
            for node in component.nodes() {
                connections.entry(node.clone()).or_default().push(index);
            }
        }
        self.nodes = nodes.into_iter().collect();
        connections.sort_keys();
        self.connections = connections;
        self.connections_built = true;
    }

    pub fn is_linearized(&self) -> bool {
        self.linearized
    }

    /// All components, including non-linear originals and virtual ones.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn linear_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.is_linear())
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    /// The component a virtual component was generated from.
    pub fn origin_of(&self, component: &Component) -> Option<&Component> {
        component.origin().and_then(|name| self.component(name))
    }

    /// Sorted, distinct node ids, ground included when present.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn non_ground_nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().filter(|n| !n.is_ground())
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n.as_str() == node)
    }

    /// Linear components touching `node`, once per touching terminal.
    pub fn connections(&self, node: &NodeId) -> impl Iterator<Item = &Component> {
        self.connections
            .get(node)
            .into_iter()
            .flatten()
            .map(|&index| &self.components[index])
    }
}

/// Build a circuit from the parser's output.
pub fn build_circuit(components: Vec<Component>, nodes: Vec<NodeId>) -> Result<Circuit> {
    Circuit::new(components, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    fn inverter() -> Circuit {
        Circuit::new(
            vec![
                Component::voltage_source("Vin", "3", "0", Some(1.0)),
                Component::resistor("R1", "1", "3", Some(1e3)),
                Component::resistor("R2", "2", "1", Some(1e4)),
                Component::opamp("O1", "0", "1", "2"),
            ],
            vec![NodeId::new("1"), NodeId::new("2"), NodeId::new("3")],
        )
        .unwrap()
    }

    #[test]
    fn test_linearization_appends_virtual_components() {
        let circuit = inverter();
        assert!(circuit.is_linearized());
        assert_eq!(circuit.components().len(), 6);
        let virtuals: Vec<_> = circuit
            .components()
            .iter()
            .filter(|c| c.is_virtual())
            .map(|c| c.name())
            .collect();
        assert_eq!(virtuals, vec!["O1_wire", "O1_voltage"]);
        let wire = circuit.component("O1_wire").unwrap();
        assert_eq!(circuit.origin_of(wire).map(|c| c.kind()), Some(ComponentKind::Opamp));
    }

    #[test]
    fn test_linearize_is_idempotent() {
        let mut circuit = inverter();
        circuit.linearize().unwrap();
        circuit.linearize().unwrap();
        circuit.build_connections();
        assert_eq!(circuit.components().len(), 6);
        assert_eq!(circuit.connections(&NodeId::new("1")).count(), 3);
    }

    #[test]
    fn test_nodes_include_generated_ground() {
        let circuit = inverter();
        let names: Vec<_> = circuit.nodes().iter().map(NodeId::as_str).collect();
        assert_eq!(names, vec!["0", "1", "2", "3"]);
        assert_eq!(circuit.non_ground_nodes().count(), 3);
    }

    #[test]
    fn test_connections_exclude_opamp() {
        let circuit = inverter();
        let at_2: Vec<_> = circuit
            .connections(&NodeId::new("2"))
            .map(|c| c.name())
            .collect();
        assert_eq!(at_2, vec!["R2", "O1_voltage"]);
        assert!(circuit.connections(&NodeId::new("2")).all(|c| c.is_linear()));
        assert_eq!(circuit.connections(&NodeId::new("42")).count(), 0);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Circuit::new(
            vec![
                Component::resistor("R1", "1", "0", None),
                Component::resistor("R1", "2", "0", None),
            ],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidCircuit(_)));
    }
}
