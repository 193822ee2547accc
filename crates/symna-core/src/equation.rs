//! Labelled symbolic equations.

use std::fmt;

use symna_algebra::Expr;

use crate::error::Result;
use crate::node::NodeId;

/// Where an equation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquationKind {
    /// Kirchhoff current law at a non-ground node.
    NodeLaw(NodeId),
    /// Constitutive equation of the named component.
    Constitutive(String),
}

/// `lhs = rhs` with a human-readable explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    lhs: Expr,
    rhs: Expr,
    label: String,
    kind: EquationKind,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr, label: impl Into<String>, kind: EquationKind) -> Self {
        Self {
            lhs,
            rhs,
            label: label.into(),
            kind,
        }
    }

    /// Current balance `sum = 0` at `node`.
    pub fn node_law(node: NodeId, sum: Expr) -> Self {
        Self {
            label: format!("node law for node {node}"),
            lhs: sum,
            rhs: Expr::zero(),
            kind: EquationKind::NodeLaw(node),
        }
    }

    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &EquationKind {
        &self.kind
    }

    /// `lhs - rhs`, which vanishes on every solution.
    pub fn residual(&self) -> Result<Expr> {
        Ok(self.lhs.checked_sub(&self.rhs)?)
    }

    pub fn to_latex(&self) -> String {
        format!("{} = {}", self.lhs.to_latex(), self.rhs.to_latex())
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
