//! Symbols appearing in circuit expressions.

use std::fmt;

/// A free symbol.
///
/// The variant order fixes the variable priority used by polynomial term
/// ordering: the Laplace variable is the most significant, then component
/// parameters, then the unknowns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// The Laplace variable `p`.
    Frequency,
    /// A component value, named after the component (`R1`).
    Parameter(String),
    /// Potential of a node (`v_<node>`).
    Potential(String),
    /// Branch current through a component (`i_<component>`).
    Current(String),
}

impl Symbol {
    pub fn parameter(name: impl Into<String>) -> Self {
        Symbol::Parameter(name.into())
    }

    pub fn potential(node: impl Into<String>) -> Self {
        Symbol::Potential(node.into())
    }

    pub fn current(component: impl Into<String>) -> Self {
        Symbol::Current(component.into())
    }

    /// True for symbols the linear solver treats as unknowns.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Symbol::Potential(_) | Symbol::Current(_))
    }

    /// LaTeX rendering; trailing digits of a name become a subscript.
    pub fn to_latex(&self) -> String {
        match self {
            Symbol::Frequency => "p".to_string(),
            Symbol::Parameter(name) => subscript_digits(name),
            Symbol::Potential(node) => format!("v_{{{node}}}"),
            Symbol::Current(name) => format!("i_{{{name}}}"),
        }
    }
}

fn subscript_digits(name: &str) -> String {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.is_empty() || stem.len() == name.len() {
        return name.to_string();
    }
    format!("{}_{{{}}}", stem, &name[stem.len()..])
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Frequency => write!(f, "p"),
            Symbol::Parameter(name) => write!(f, "{name}"),
            Symbol::Potential(node) => write!(f, "v_{node}"),
            Symbol::Current(name) => write!(f, "i_{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Symbol::Frequency.to_string(), "p");
        assert_eq!(Symbol::parameter("R1").to_string(), "R1");
        assert_eq!(Symbol::potential("3").to_string(), "v_3");
        assert_eq!(Symbol::current("V1").to_string(), "i_V1");
    }

    #[test]
    fn test_latex() {
        assert_eq!(Symbol::parameter("R12").to_latex(), "R_{12}");
        assert_eq!(Symbol::parameter("Vin").to_latex(), "Vin");
        assert_eq!(Symbol::potential("out").to_latex(), "v_{out}");
    }

    #[test]
    fn test_priority() {
        assert!(Symbol::Frequency < Symbol::parameter("A"));
        assert!(Symbol::parameter("Z") < Symbol::potential("0"));
        assert!(Symbol::potential("9") < Symbol::current("A"));
        assert!(Symbol::current("V1").is_unknown());
        assert!(!Symbol::parameter("R1").is_unknown());
    }
}
