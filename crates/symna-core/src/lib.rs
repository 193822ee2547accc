//! Circuit model for symbolic Modified Nodal Analysis.
//!
//! This crate provides nodes, components with their branch relations,
//! op-amp linearization, the [`Circuit`] graph and the [`SymbolTable`]
//! that maps circuit entities to expression symbols.

pub mod circuit;
pub mod component;
pub mod equation;
pub mod error;
pub mod node;
pub mod symbols;
pub mod units;

pub use circuit::{Circuit, build_circuit};
pub use component::{Component, ComponentKind};
pub use equation::{Equation, EquationKind};
pub use error::{Error, Result};
pub use node::NodeId;
pub use symbols::SymbolTable;
