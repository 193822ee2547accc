//! Power products of symbols.

use std::cmp::Ordering;
use std::fmt;

use crate::symbol::Symbol;

/// A product of symbols raised to positive powers.
///
/// Factors are kept sorted by symbol with no zero exponents, so structural
/// equality is mathematical equality. Monomials are ordered lexicographically
/// with the smallest [`Symbol`] as the most significant variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Monomial {
    factors: Vec<(Symbol, u32)>,
}

impl Monomial {
    /// The empty product.
    pub fn one() -> Self {
        Self::default()
    }

    pub fn var(symbol: Symbol) -> Self {
        Self::power(symbol, 1)
    }

    pub fn power(symbol: Symbol, exponent: u32) -> Self {
        if exponent == 0 {
            return Self::one();
        }
        Self {
            factors: vec![(symbol, exponent)],
        }
    }

    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factors(&self) -> &[(Symbol, u32)] {
        &self.factors
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.factors.iter().map(|(s, _)| s)
    }

    pub fn exponent(&self, symbol: &Symbol) -> u32 {
        self.factors
            .binary_search_by(|(s, _)| s.cmp(symbol))
            .map(|i| self.factors[i].1)
            .unwrap_or(0)
    }

    pub fn total_degree(&self) -> u32 {
        self.factors.iter().map(|(_, e)| e).sum()
    }

    /// The monomial with `symbol` removed.
    pub fn without(&self, symbol: &Symbol) -> Self {
        Self {
            factors: self
                .factors
                .iter()
                .filter(|(s, _)| s != symbol)
                .cloned()
                .collect(),
        }
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut factors = Vec::with_capacity(self.factors.len() + other.factors.len());
        let (mut a, mut b) = (self.factors.iter().peekable(), other.factors.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some((sa, ea)), Some((sb, eb))) => match sa.cmp(sb) {
                    Ordering::Less => {
                        factors.push((sa.clone(), *ea));
                        a.next();
                    }
                    Ordering::Greater => {
                        factors.push((sb.clone(), *eb));
                        b.next();
                    }
                    Ordering::Equal => {
                        factors.push((sa.clone(), ea + eb));
                        a.next();
                        b.next();
                    }
                },
                (Some(_), None) => {
                    factors.extend(a.cloned());
                    break;
                }
                (None, Some(_)) => {
                    factors.extend(b.cloned());
                    break;
                }
                (None, None) => break,
            }
        }
        Monomial { factors }
    }

    /// `self / other`, or `None` when `other` does not divide `self`.
    pub fn checked_div(&self, other: &Monomial) -> Option<Monomial> {
        let mut factors = Vec::with_capacity(self.factors.len());
        let mut b = other.factors.iter().peekable();
        for (sa, ea) in &self.factors {
            match b.peek() {
                Some((sb, eb)) if sb == sa => {
                    if eb > ea {
                        return None;
                    }
                    if ea > eb {
                        factors.push((sa.clone(), ea - eb));
                    }
                    b.next();
                }
                Some((sb, _)) if sb < sa => return None,
                _ => factors.push((sa.clone(), *ea)),
            }
        }
        if b.peek().is_some() {
            return None;
        }
        Some(Monomial { factors })
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, latex: bool) -> fmt::Result {
        // Parameters first, the Laplace variable last: `C1*R1*p^2`.
        let ordered = self
            .factors
            .iter()
            .filter(|(s, _)| *s != Symbol::Frequency)
            .chain(self.factors.iter().filter(|(s, _)| *s == Symbol::Frequency));
        for (i, (symbol, exponent)) in ordered.enumerate() {
            if i > 0 {
                write!(f, "{}", if latex { " " } else { "*" })?;
            }
            if latex {
                write!(f, "{}", symbol.to_latex())?;
                if *exponent > 1 {
                    write!(f, "^{{{exponent}}}")?;
                }
            } else {
                write!(f, "{symbol}")?;
                if *exponent > 1 {
                    write!(f, "^{exponent}")?;
                }
            }
        }
        Ok(())
    }

    pub fn to_latex(&self) -> String {
        struct Latex<'a>(&'a Monomial);
        impl fmt::Display for Latex<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_with(f, true)
            }
        }
        Latex(self).to_string()
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        let (mut a, mut b) = (self.factors.iter().peekable(), other.factors.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some((sa, ea)), Some((sb, eb))) => match sa.cmp(sb) {
                    // `sa` is more significant and absent from `other`.
                    Ordering::Less => return Ordering::Greater,
                    Ordering::Greater => return Ordering::Less,
                    Ordering::Equal => match ea.cmp(eb) {
                        Ordering::Equal => {
                            a.next();
                            b.next();
                        }
                        unequal => return unequal,
                    },
                },
            }
        }
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }
        self.fmt_with(f, false)
    }
}
