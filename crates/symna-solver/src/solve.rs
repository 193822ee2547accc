//! Fraction-free symbolic solution of the MNA system.
//!
//! Each equation is brought to the form `numerator(lhs - rhs) = 0`, which is
//! affine in the unknowns with polynomial coefficients. The resulting matrix
//! is reduced by Bareiss elimination so every intermediate entry stays a
//! polynomial, then back-substituted against the final pivot (the system
//! determinant). Each unknown ends up as one reduced rational expression.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::info;
use symna_algebra::{Expr, Poly, Symbol};
use symna_core::{Circuit, NodeId};

use crate::config::SolverConfig;
use crate::equations::{EquationSystem, build_equations};
use crate::error::{Error, Result};

/// Closed-form value of every unknown of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicSolution {
    values: IndexMap<Symbol, Expr>,
    nodes: BTreeSet<NodeId>,
}

impl SymbolicSolution {
    pub fn get(&self, unknown: &Symbol) -> Option<&Expr> {
        self.values.get(unknown)
    }

    /// Potential of `node`: zero for ground, `None` if the node is unknown.
    pub fn potential(&self, node: &str) -> Option<Expr> {
        if !self.nodes.contains(node) {
            return None;
        }
        if node == NodeId::GROUND_NAME {
            return Some(Expr::zero());
        }
        self.values.get(&Symbol::potential(node)).cloned()
    }

    /// Branch current of a voltage or current source.
    pub fn current(&self, component: &str) -> Option<&Expr> {
        self.values.get(&Symbol::current(component))
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    /// Unknowns with their values, in solving order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Expr)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One row of the augmented matrix `[A | b]`.
struct Row {
    label: String,
    entries: Vec<Poly>,
}

/// Assemble and solve the equations of `circuit`.
pub fn solve(circuit: &Circuit, config: &SolverConfig) -> Result<SymbolicSolution> {
    solve_system(&build_equations(circuit, config)?)
}

/// Solve an assembled equation system exactly.
///
/// Fails with [`Error::Inconsistent`] when an equation reduces to `0 = b`
/// with `b != 0`, and with [`Error::Underdetermined`] when some unknowns are
/// left free; a partial solution is never returned.
pub fn solve_system(system: &EquationSystem) -> Result<SymbolicSolution> {
    let unknowns = system.unknowns();
    let n = unknowns.len();
    let columns: IndexMap<&Symbol, usize> = unknowns
        .iter()
        .enumerate()
        .map(|(i, s)| (s, i))
        .collect();

    let mut rows = Vec::with_capacity(system.len());
    for equation in system.equations() {
        let residual = equation.residual()?;
        let (coefficients, constant) = residual
            .numerator()
            .split_linear(Symbol::is_unknown)?
            .ok_or_else(|| Error::Nonlinear {
                equation: format!("{} ({})", equation, equation.label()),
            })?;
        let mut entries = vec![Poly::zero(); n + 1];
        for (unknown, coefficient) in coefficients {
            let column = *columns.get(&unknown).ok_or_else(|| Error::Underdetermined {
                unknowns: vec![unknown.to_string()],
            })?;
            entries[column] = coefficient;
        }
        entries[n] = constant.checked_neg()?;
        rows.push(Row {
            label: equation.label().to_string(),
            entries,
        });
    }

    let (rank, determinant, free) = eliminate(&mut rows, n)?;

    if let Some(row) = rows[rank..].iter().find(|r| !r.entries[n].is_zero()) {
        return Err(Error::Inconsistent {
            equation: row.label.clone(),
        });
    }
    if !free.is_empty() {
        return Err(Error::Underdetermined {
            unknowns: free.iter().map(|&c| unknowns[c].to_string()).collect(),
        });
    }

    let numerators = back_substitute(&rows, n, &determinant)?;
    let mut values = IndexMap::with_capacity(n);
    for (unknown, numerator) in unknowns.iter().zip(numerators) {
        values.insert(unknown.clone(), Expr::ratio(numerator, determinant.clone())?);
    }
    info!("solved {} unknowns", values.len());

    Ok(SymbolicSolution {
        values,
        nodes: system.symbols().nodes().cloned().collect(),
    })
}

/// Bareiss elimination to row echelon form.
///
/// Returns the rank, the last pivot and the columns without a pivot.
fn eliminate(rows: &mut [Row], n: usize) -> Result<(usize, Poly, Vec<usize>)> {
    let mut rank = 0;
    let mut previous = Poly::one();
    let mut free = Vec::new();

    for column in 0..n {
        // Sparsest nonzero candidate keeps the products small.
        let candidate = (rank..rows.len())
            .filter(|&r| !rows[r].entries[column].is_zero())
            .min_by_key(|&r| rows[r].entries[column].len());
        let Some(pivot_index) = candidate else {
            free.push(column);
            continue;
        };
        rows.swap(rank, pivot_index);

        let (upper, lower) = rows.split_at_mut(rank + 1);
        let pivot = &upper[rank].entries;
        for row in lower.iter_mut() {
            let factor = std::mem::take(&mut row.entries[column]);
            for j in column + 1..=n {
                let scaled = pivot[column].checked_mul(&row.entries[j])?;
                let combined = if factor.is_zero() {
                    scaled
                } else {
                    scaled.checked_sub(&factor.checked_mul(&pivot[j])?)?
                };
                row.entries[j] = combined.div_exact(&previous)?;
            }
        }

        previous = upper[rank].entries[column].clone();
        rank += 1;
    }
    Ok((rank, previous, free))
}

/// Numerators `det * x_i` of the unique solution of a full-rank echelon system.
fn back_substitute(rows: &[Row], n: usize, determinant: &Poly) -> Result<Vec<Poly>> {
    let mut numerators = vec![Poly::zero(); n];
    for i in (0..n).rev() {
        let mut sum = determinant.checked_mul(&rows[i].entries[n])?;
        for j in i + 1..n {
            sum = sum.checked_sub(&rows[i].entries[j].checked_mul(&numerators[j])?)?;
        }
        numerators[i] = sum.div_exact(&rows[i].entries[i])?;
    }
    Ok(numerators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use symna_core::Component;

    fn s(name: &str) -> Expr {
        Expr::symbol(Symbol::parameter(name))
    }

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
    fn test_divider_solution() {
        let solution = solve(&divider(), &SolverConfig::default()).unwrap();
        assert_eq!(solution.len(), 3);
        assert_eq!(solution.potential("1").unwrap(), s("V1"));

        let expected = s("V1")
            .checked_mul(&s("R2"))
            .unwrap()
            .checked_div(&s("R1").checked_add(&s("R2")).unwrap())
            .unwrap();
        assert_eq!(solution.potential("2").unwrap(), expected);
        assert_eq!(solution.potential("0").unwrap(), Expr::zero());
        assert!(solution.potential("7").is_none());
    }

    #[test]
    fn test_source_current() {
        let solution = solve(&divider(), &SolverConfig::default()).unwrap();
        // Current leaving node 1 through V1 balances the resistor current.
        let expected = s("V1")
            .checked_div(&s("R1").checked_add(&s("R2")).unwrap())
            .unwrap()
            .checked_neg()
            .unwrap();
        assert_eq!(solution.current("V1").unwrap(), &expected);
    }

    #[test]
    fn test_free_current_source_is_underdetermined() {
        let circuit = Circuit::new(
            vec![
                Component::current_source("I1", "0", "1", Some(1e-3)),
                Component::resistor("R1", "1", "0", Some(1e3)),
            ],
            Vec::new(),
        )
        .unwrap();
        let err = solve(&circuit, &SolverConfig::default()).unwrap_err();
        assert!(err.is_solve_failure());
        assert!(matches!(err, Error::Underdetermined { ref unknowns } if unknowns == &["i_I1".to_string()]));

        let config = SolverConfig {
            pin_current_sources: true,
        };
        let solution = solve(&circuit, &config).unwrap();
        // I1 drives its current out of node 0 and into node 1.
        let expected = s("I1").checked_mul(&s("R1")).unwrap();
        assert_eq!(solution.potential("1").unwrap(), expected);
    }

    #[test]
    fn test_parallel_sources_are_inconsistent() {
        let circuit = Circuit::new(
            vec![
                Component::voltage_source("V1", "1", "0", Some(1.0)),
                Component::voltage_source("V2", "1", "0", Some(2.0)),
                Component::resistor("R1", "1", "0", Some(1.0)),
            ],
            Vec::new(),
        )
        .unwrap();
        let err = solve(&circuit, &SolverConfig::default()).unwrap_err();
        assert!(err.is_solve_failure(), "got {err:?}");
    }

    #[test]
    fn test_floating_node_is_underdetermined() {
        let circuit = Circuit::new(
            vec![
                Component::voltage_source("V1", "1", "0", Some(1.0)),
                Component::capacitor("C1", "2", "3", Some(1e-6)),
            ],
            Vec::new(),
        )
        .unwrap();
        let err = solve(&circuit, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Underdetermined { .. }), "got {err:?}");
    }
}
