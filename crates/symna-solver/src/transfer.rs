//! Transfer-function extraction.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use num_complex::Complex;
use serde::{Deserialize, Serialize};
use symna_algebra::{Expr, Symbol};
use symna_core::Component;

use crate::error::{Error, Result};
use crate::lti::polyval;
use crate::solve::SymbolicSolution;

/// Numeric rational transfer function in the Laplace variable.
///
/// Coefficients are ordered from the highest power of `p` down to the
/// constant term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    pub numerator: Vec<f64>,
    pub denominator: Vec<f64>,
}

impl TransferFunction {
    pub fn new(numerator: Vec<f64>, denominator: Vec<f64>) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `H(s)` at a complex frequency.
    pub fn evaluate(&self, s: Complex<f64>) -> Complex<f64> {
        polyval(&self.numerator, s) / polyval(&self.denominator, s)
    }

    /// `H(0)`, infinite when the denominator has a root at the origin.
    pub fn dc_gain(&self) -> f64 {
        self.evaluate(Complex::new(0.0, 0.0)).re
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) / ({})",
            format_polynomial(&self.numerator),
            format_polynomial(&self.denominator)
        )
    }
}

/// Renders descending coefficients as `a*p^n + ... + c`.
pub fn format_polynomial(coefficients: &[f64]) -> String {
    let degree = coefficients.len().saturating_sub(1);
    let terms: Vec<String> = coefficients
        .iter()
        .enumerate()
        .filter(|(_, c)| **c != 0.0)
        .map(|(i, c)| match degree - i {
            0 => format!("{c}"),
            1 => format!("{c}*p"),
            power => format!("{c}*p^{power}"),
        })
        .collect();
    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ")
    }
}

/// Numeric component values keyed by component name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterValues {
    values: BTreeMap<String, f64>,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of every non-virtual component that has one; symbolic
    /// components are left out.
    pub fn from_components<'a>(components: impl IntoIterator<Item = &'a Component>) -> Self {
        let values = components
            .into_iter()
            .filter(|c| !c.is_virtual())
            .filter_map(|c| c.value().map(|v| (c.name().to_string(), v)))
            .collect();
        Self { values }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `H = V(output) / V(input)`, reduced.
pub fn symbolic_transfer_function(
    solution: &SymbolicSolution,
    input: &str,
    output: &str,
) -> Result<Expr> {
    let potential = |node: &str| {
        solution.potential(node).ok_or_else(|| Error::NodeReference {
            node: node.to_string(),
        })
    };
    let v_in = potential(input)?;
    let v_out = potential(output)?;
    if v_in.is_zero() {
        return Err(Error::ZeroInput {
            node: input.to_string(),
        });
    }
    Ok(v_out.checked_div(&v_in)?)
}

/// Substitute numeric values into `h` and read off the polynomial
/// coefficients in `p`.
///
/// Leading exact zeros are stripped; an all-zero polynomial is `[0.0]`.
/// Every symbol other than `p` must have a value.
pub fn numeric_transfer_function(h: &Expr, values: &ParameterValues) -> Result<TransferFunction> {
    let lookup = |symbol: &Symbol| match symbol {
        Symbol::Parameter(name) => values.get(name),
        _ => None,
    };
    let numerator = h.numerator().evaluate_in(&Symbol::Frequency, lookup);
    let denominator = h.denominator().evaluate_in(&Symbol::Frequency, lookup);

    match (numerator, denominator) {
        (Ok(numerator), Ok(denominator)) => Ok(TransferFunction::new(
            descending(numerator),
            descending(denominator),
        )),
        (numerator, denominator) => {
            let mut missing = BTreeSet::new();
            missing.extend(numerator.err().unwrap_or_default());
            missing.extend(denominator.err().unwrap_or_default());
            Err(Error::MissingValue {
                symbols: missing.iter().map(Symbol::to_string).collect(),
            })
        }
    }
}

fn descending(mut ascending: Vec<f64>) -> Vec<f64> {
    while ascending.len() > 1 && ascending.last() == Some(&0.0) {
        ascending.pop();
    }
    ascending.reverse();
    ascending
}
