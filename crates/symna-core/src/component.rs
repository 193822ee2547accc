//! Circuit components and their branch relations.

use std::fmt;

use symna_algebra::Expr;

use crate::equation::{Equation, EquationKind};
use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::symbols::SymbolTable;

/// The kinds of component a netlist can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Resistor,
    Inductor,
    Capacitor,
    VoltageSource,
    CurrentSource,
    /// Zero-impedance connection, only produced by op-amp linearization.
    Wire,
    /// Ideal operational amplifier with terminals `(+, -, out)`.
    Opamp,
}

impl ComponentKind {
    /// Kind selected by the first letter of a netlist component name.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'R' => Some(ComponentKind::Resistor),
            'L' => Some(ComponentKind::Inductor),
            'C' => Some(ComponentKind::Capacitor),
            'V' => Some(ComponentKind::VoltageSource),
            'I' => Some(ComponentKind::CurrentSource),
            'O' => Some(ComponentKind::Opamp),
            _ => None,
        }
    }

    pub fn terminal_count(self) -> usize {
        match self {
            ComponentKind::Opamp => 3,
            _ => 2,
        }
    }

    /// Whether this kind can be stamped directly into node laws.
    pub fn is_linear(self) -> bool {
        self != ComponentKind::Opamp
    }

    /// Whether this kind carries a value parameter.
    pub fn has_value(self) -> bool {
        !matches!(self, ComponentKind::Wire | ComponentKind::Opamp)
    }

    /// Sources carry an explicit branch-current unknown.
    pub fn is_source(self) -> bool {
        matches!(
            self,
            ComponentKind::VoltageSource | ComponentKind::CurrentSource
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::Inductor => "inductor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::VoltageSource => "voltage source",
            ComponentKind::CurrentSource => "current source",
            ComponentKind::Wire => "wire",
            ComponentKind::Opamp => "op-amp",
        };
        write!(f, "{name}")
    }
}

/// A component instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    kind: ComponentKind,
    nodes: Vec<NodeId>,
    /// Numeric value; `None` leaves the component symbolic.
    value: Option<f64>,
    is_virtual: bool,
    needs_auxiliary_equation: bool,
    /// Name of the component this one was derived from.
    origin: Option<String>,
}

impl Component {
    /// Create a component, checking the terminal count for its kind.
    pub fn new(
        kind: ComponentKind,
        name: impl Into<String>,
        nodes: Vec<NodeId>,
        value: Option<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if nodes.len() != kind.terminal_count() {
            return Err(Error::InvalidCircuit(format!(
                "{kind} {name} needs {} nodes, got {}",
                kind.terminal_count(),
                nodes.len()
            )));
        }
        Ok(Self {
            needs_auxiliary_equation: matches!(
                kind,
                ComponentKind::VoltageSource | ComponentKind::Wire
            ),
            name,
            kind,
            nodes,
            value: if kind.has_value() { value } else { None },
            is_virtual: false,
            origin: None,
        })
    }

    fn two_terminal(
        kind: ComponentKind,
        name: &str,
        a: &str,
        b: &str,
        value: Option<f64>,
    ) -> Self {
        Self {
            needs_auxiliary_equation: matches!(
                kind,
                ComponentKind::VoltageSource | ComponentKind::Wire
            ),
            name: name.to_string(),
            kind,
            nodes: vec![NodeId::new(a), NodeId::new(b)],
            value,
            is_virtual: false,
            origin: None,
        }
    }

    pub fn resistor(name: &str, a: &str, b: &str, value: Option<f64>) -> Self {
        Self::two_terminal(ComponentKind::Resistor, name, a, b, value)
    }

    pub fn inductor(name: &str, a: &str, b: &str, value: Option<f64>) -> Self {
        Self::two_terminal(ComponentKind::Inductor, name, a, b, value)
    }

    pub fn capacitor(name: &str, a: &str, b: &str, value: Option<f64>) -> Self {
        Self::two_terminal(ComponentKind::Capacitor, name, a, b, value)
    }

    pub fn voltage_source(name: &str, a: &str, b: &str, value: Option<f64>) -> Self {
        Self::two_terminal(ComponentKind::VoltageSource, name, a, b, value)
    }

    pub fn current_source(name: &str, a: &str, b: &str, value: Option<f64>) -> Self {
        Self::two_terminal(ComponentKind::CurrentSource, name, a, b, value)
    }

    /// Ideal op-amp with terminals `(+, -, out)`.
    pub fn opamp(name: &str, plus: &str, minus: &str, out: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ComponentKind::Opamp,
            nodes: vec![NodeId::new(plus), NodeId::new(minus), NodeId::new(out)],
            value: None,
            is_virtual: false,
            needs_auxiliary_equation: false,
            origin: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_linear(&self) -> bool {
        self.kind.is_linear()
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn needs_auxiliary_equation(&self) -> bool {
        self.needs_auxiliary_equation
    }

    /// Name of the component this one was generated from, if virtual.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_connected_to(&self, node: &NodeId) -> bool {
        self.nodes.contains(node)
    }

    /// Replace a non-linear component by linear virtual ones.
    ///
    /// An ideal op-amp `(+, -, out)` becomes a wire `<name>_wire` forcing
    /// `V+ = V-`, and a voltage source `<name>_voltage` from `out` to ground
    /// whose current is an unknown and whose value is left free. Linear
    /// components return nothing.
    pub fn linearize(&self) -> Vec<Component> {
        if self.kind != ComponentKind::Opamp {
            return Vec::new();
        }
        let (plus, minus, out) = (&self.nodes[0], &self.nodes[1], &self.nodes[2]);
        let wire = Component {
            name: format!("{}_wire", self.name),
            kind: ComponentKind::Wire,
            nodes: vec![plus.clone(), minus.clone()],
            value: None,
            is_virtual: true,
            needs_auxiliary_equation: true,
            origin: Some(self.name.clone()),
        };
        let output = Component {
            name: format!("{}_voltage", self.name),
            kind: ComponentKind::VoltageSource,
            nodes: vec![out.clone(), NodeId::ground()],
            value: None,
            is_virtual: true,
            needs_auxiliary_equation: false,
            origin: Some(self.name.clone()),
        };
        vec![wire, output]
    }

    /// Current leaving `node` through this component.
    pub fn branch_current(&self, node: &NodeId, symbols: &SymbolTable) -> Result<Expr> {
        if !self.is_connected_to(node) {
            return Err(Error::InvalidCircuit(format!(
                "{} is not connected to node {node}",
                self.name
            )));
        }
        let at_first = *node == self.nodes[0];
        let other = if at_first {
            &self.nodes[1]
        } else {
            &self.nodes[0]
        };
        let across = || -> Result<Expr> {
            Ok(symbols
                .potential(node)?
                .checked_sub(symbols.potential(other)?)?)
        };

        let current = match self.kind {
            ComponentKind::Resistor => across()?.checked_div(self.parameter(symbols)?)?,
            ComponentKind::Inductor => across()?
                .checked_div(&self.parameter(symbols)?.checked_mul(symbols.frequency())?)?,
            ComponentKind::Capacitor => across()?
                .checked_mul(self.parameter(symbols)?)?
                .checked_mul(symbols.frequency())?,
            ComponentKind::VoltageSource | ComponentKind::CurrentSource => {
                let current = symbols.current(&self.name)?;
                if at_first {
                    current.clone()
                } else {
                    current.checked_neg()?
                }
            }
            ComponentKind::Wire => Expr::zero(),
            ComponentKind::Opamp => return Err(Error::NotLinearized(self.name.clone())),
        };
        Ok(current)
    }

    /// The equation fixing this component's own unknown, if it has one.
    ///
    /// Voltage sources pin the potential difference across them, wires
    /// short their terminals, and a current source pins its branch current
    /// when the symbol table treats its value as a known parameter.
    pub fn constitutive_equation(&self, symbols: &SymbolTable) -> Result<Option<Equation>> {
        let (lhs, rhs, label) = match self.kind {
            ComponentKind::VoltageSource if self.needs_auxiliary_equation => (
                self.voltage_across(symbols)?,
                self.parameter(symbols)?.clone(),
                format!("value of voltage source {}", self.name),
            ),
            ComponentKind::Wire if self.needs_auxiliary_equation => (
                self.voltage_across(symbols)?,
                Expr::zero(),
                format!(
                    "ideal op-amp {}: V+ = V-",
                    self.origin.as_deref().unwrap_or(&self.name)
                ),
            ),
            ComponentKind::CurrentSource => match symbols.parameter(&self.name) {
                Some(value) => (
                    symbols.current(&self.name)?.clone(),
                    value.clone(),
                    format!("value of current source {}", self.name),
                ),
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(Equation::new(
            lhs,
            rhs,
            label,
            EquationKind::Constitutive(self.name.clone()),
        )))
    }

    fn voltage_across(&self, symbols: &SymbolTable) -> Result<Expr> {
        Ok(symbols
            .potential(&self.nodes[0])?
            .checked_sub(symbols.potential(&self.nodes[1])?)?)
    }

    fn parameter<'a>(&self, symbols: &'a SymbolTable) -> Result<&'a Expr> {
        symbols
            .parameter(&self.name)
            .ok_or_else(|| Error::MissingParameter(self.name.clone()))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)?;
        for node in &self.nodes {
            write!(f, " {node}")?;
        }
        if let Some(value) = self.value {
            write!(f, " = {}", crate::units::format_value(value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;
    use symna_algebra::Symbol;

    fn sym(name: &str) -> Expr {
        Expr::symbol(Symbol::parameter(name))
    }

    fn v(node: &str) -> Expr {
        Expr::symbol(Symbol::potential(node))
    }

    fn table(components: Vec<Component>) -> (Circuit, SymbolTable) {
        let circuit = Circuit::new(components, Vec::new()).unwrap();
        let symbols = SymbolTable::new(&circuit, false);
        (circuit, symbols)
    }

    #[test]
    fn test_kind_from_prefix() {
        assert_eq!(ComponentKind::from_prefix('r'), Some(ComponentKind::Resistor));
        assert_eq!(ComponentKind::from_prefix('O'), Some(ComponentKind::Opamp));
        assert_eq!(ComponentKind::from_prefix('Q'), None);
        assert_eq!(ComponentKind::Opamp.terminal_count(), 3);
        assert!(!ComponentKind::Opamp.is_linear());
    }

    #[test]
    fn test_terminal_count_checked() {
        let err = Component::new(
            ComponentKind::Opamp,
            "O1",
            vec![NodeId::new("1"), NodeId::new("2")],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidCircuit(_)));
    }

    #[test]
    fn test_resistor_relation() {
        let (circuit, symbols) = table(vec![Component::resistor("R1", "1", "2", Some(1e3))]);
        let r1 = circuit.component("R1").unwrap();
        let at_1 = r1.branch_current(&NodeId::new("1"), &symbols).unwrap();
        let expected = v("1")
            .checked_sub(&v("2"))
            .unwrap()
            .checked_div(&sym("R1"))
            .unwrap();
        assert_eq!(at_1, expected);
        let at_2 = r1.branch_current(&NodeId::new("2"), &symbols).unwrap();
        assert_eq!(at_2, expected.checked_neg().unwrap());
    }

    #[test]
    fn test_reactive_relations_to_ground() {
        let (circuit, symbols) = table(vec![
            Component::capacitor("C1", "1", "0", None),
            Component::inductor("L1", "1", "0", None),
        ]);
        let p = Expr::symbol(Symbol::Frequency);
        let node = NodeId::new("1");

        let c1 = circuit.component("C1").unwrap().branch_current(&node, &symbols).unwrap();
        let expected_c = v("1").checked_mul(&sym("C1")).unwrap().checked_mul(&p).unwrap();
        assert_eq!(c1, expected_c);

        let l1 = circuit.component("L1").unwrap().branch_current(&node, &symbols).unwrap();
        let expected_l = v("1")
            .checked_div(&sym("L1").checked_mul(&p).unwrap())
            .unwrap();
        assert_eq!(l1, expected_l);
    }

    #[test]
    fn test_source_relation_sign() {
        let (circuit, symbols) = table(vec![Component::voltage_source("V1", "1", "0", Some(5.0))]);
        let v1 = circuit.component("V1").unwrap();
        let i = Expr::symbol(Symbol::current("V1"));
        assert_eq!(v1.branch_current(&NodeId::new("1"), &symbols).unwrap(), i);
        assert_eq!(
            v1.branch_current(&NodeId::ground(), &symbols).unwrap(),
            i.checked_neg().unwrap()
        );
    }

    #[test]
    fn test_opamp_linearization() {
        let opamp = Component::opamp("O1", "0", "1", "2");
        let parts = opamp.linearize();
        assert_eq!(parts.len(), 2);

        let wire = &parts[0];
        assert_eq!(wire.name(), "O1_wire");
        assert_eq!(wire.kind(), ComponentKind::Wire);
        assert_eq!(wire.nodes(), &[NodeId::new("0"), NodeId::new("1")]);
        assert!(wire.is_virtual() && wire.needs_auxiliary_equation());
        assert_eq!(wire.origin(), Some("O1"));

        let output = &parts[1];
        assert_eq!(output.name(), "O1_voltage");
        assert_eq!(output.kind(), ComponentKind::VoltageSource);
        assert_eq!(output.nodes(), &[NodeId::new("2"), NodeId::ground()]);
        assert!(output.is_virtual() && !output.needs_auxiliary_equation());

        assert!(Component::resistor("R1", "1", "0", None).linearize().is_empty());
    }

    #[test]
    fn test_unlinearized_opamp_has_no_relation() {
        let (circuit, symbols) = table(vec![
            Component::opamp("O1", "0", "1", "2"),
            Component::resistor("R1", "1", "2", None),
        ]);
        let err = circuit
            .component("O1")
            .unwrap()
            .branch_current(&NodeId::new("1"), &symbols)
            .unwrap_err();
        assert_eq!(err, Error::NotLinearized("O1".into()));
    }

    #[test]
    fn test_constitutive_equations() {
        let (circuit, symbols) = table(vec![
            Component::voltage_source("V1", "1", "0", Some(1.0)),
            Component::resistor("R1", "1", "2", None),
            Component::opamp("O1", "0", "2", "3"),
        ]);
        let eq = circuit
            .component("V1")
            .unwrap()
            .constitutive_equation(&symbols)
            .unwrap()
            .unwrap();
        assert_eq!(eq.label(), "value of voltage source V1");
        assert_eq!(eq.lhs(), &v("1"));
        assert_eq!(eq.rhs(), &sym("V1"));

        let wire = circuit
            .component("O1_wire")
            .unwrap()
            .constitutive_equation(&symbols)
            .unwrap()
            .unwrap();
        assert_eq!(wire.label(), "ideal op-amp O1: V+ = V-");
        assert_eq!(wire.lhs(), &v("2").checked_neg().unwrap());

        let output = circuit.component("O1_voltage").unwrap();
        assert!(output.constitutive_equation(&symbols).unwrap().is_none());
        let r1 = circuit.component("R1").unwrap();
        assert!(r1.constitutive_equation(&symbols).unwrap().is_none());
    }

    #[test]
    fn test_current_source_pinning_follows_symbol_table() {
        let circuit = Circuit::new(
            vec![
                Component::current_source("I1", "0", "1", Some(1e-3)),
                Component::resistor("R1", "1", "0", None),
            ],
            Vec::new(),
        )
        .unwrap();
        let i1 = circuit.component("I1").unwrap();

        let free = SymbolTable::new(&circuit, false);
        assert!(i1.constitutive_equation(&free).unwrap().is_none());

        let pinned = SymbolTable::new(&circuit, true);
        let eq = i1.constitutive_equation(&pinned).unwrap().unwrap();
        assert_eq!(eq.label(), "value of current source I1");
        assert_eq!(eq.lhs(), &Expr::symbol(Symbol::current("I1")));
        assert_eq!(eq.rhs(), &sym("I1"));
    }
}
