//! Node identifiers.

use std::borrow::Borrow;
use std::fmt;

/// Identifier of a circuit node as written in the netlist.
///
/// The node named `"0"` is ground: its potential is the reference and it
/// never contributes a node law.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Name of the ground node.
    pub const GROUND_NAME: &'static str = "0";

    pub fn new(name: impl Into<String>) -> Self {
        NodeId(name.into())
    }

    /// The ground node.
    pub fn ground() -> Self {
        NodeId(Self::GROUND_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_ground(&self) -> bool {
        self.0 == Self::GROUND_NAME
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        NodeId::new(name)
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        NodeId(name)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
