//! Multivariate polynomials with exact integer coefficients.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{Error, Result};
use crate::monomial::Monomial;
use crate::symbol::Symbol;

/// A sparse polynomial in [`Symbol`]s over the integers.
///
/// Zero coefficients are never stored. All arithmetic is checked and reports
/// [`Error::Overflow`] instead of wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Poly {
    terms: BTreeMap<Monomial, i128>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::constant(1)
    }

    pub fn constant(value: i128) -> Self {
        Self::term(Monomial::one(), value)
    }

    pub fn symbol(symbol: Symbol) -> Self {
        Self::term(Monomial::var(symbol), 1)
    }

    pub fn term(monomial: Monomial, coefficient: i128) -> Self {
        let mut terms = BTreeMap::new();
        if coefficient != 0 {
            terms.insert(monomial, coefficient);
        }
        Self { terms }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.constant_value() == Some(1)
    }

    /// The value of a polynomial without variables.
    pub fn constant_value(&self) -> Option<i128> {
        match self.terms.len() {
            0 => Some(0),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(m, _)| m.is_one())
                .map(|(_, c)| *c),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.constant_value().is_some()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms from the leading one down.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, i128)> {
        self.terms.iter().rev().map(|(m, c)| (m, *c))
    }

    pub fn leading_term(&self) -> Option<(&Monomial, i128)> {
        self.terms.iter().next_back().map(|(m, c)| (m, *c))
    }

    pub fn leading_coefficient(&self) -> i128 {
        self.leading_term().map_or(0, |(_, c)| c)
    }

    pub fn variables(&self) -> BTreeSet<Symbol> {
        self.terms
            .keys()
            .flat_map(|m| m.symbols().cloned())
            .collect()
    }

    pub fn degree_in(&self, symbol: &Symbol) -> u32 {
        self.terms
            .keys()
            .map(|m| m.exponent(symbol))
            .max()
            .unwrap_or(0)
    }

    /// Coefficients of `symbol`, indexed by power.
    pub fn coefficients_in(&self, symbol: &Symbol) -> Result<Vec<Poly>> {
        let mut coefficients = vec![Poly::zero(); self.degree_in(symbol) as usize + 1];
        for (monomial, c) in &self.terms {
            let slot = &mut coefficients[monomial.exponent(symbol) as usize];
            slot.add_term(monomial.without(symbol), *c)?;
        }
        Ok(coefficients)
    }

    /// Coefficient of `symbol^power`.
    pub fn coefficient_of(&self, symbol: &Symbol, power: u32) -> Result<Poly> {
        let mut coefficient = Poly::zero();
        for (monomial, c) in &self.terms {
            if monomial.exponent(symbol) == power {
                coefficient.add_term(monomial.without(symbol), *c)?;
            }
        }
        Ok(coefficient)
    }

    fn add_term(&mut self, monomial: Monomial, coefficient: i128) -> Result<()> {
        if coefficient == 0 {
            return Ok(());
        }
        let entry = self.terms.entry(monomial);
        match entry {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(coefficient);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                let sum = slot
                    .get()
                    .checked_add(coefficient)
                    .ok_or(Error::Overflow)?;
                if sum == 0 {
                    slot.remove();
                } else {
                    *slot.get_mut() = sum;
                }
            }
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Poly) -> Result<Poly> {
        let mut sum = self.clone();
        for (m, c) in &other.terms {
            sum.add_term(m.clone(), *c)?;
        }
        Ok(sum)
    }

    pub fn checked_sub(&self, other: &Poly) -> Result<Poly> {
        let mut difference = self.clone();
        for (m, c) in &other.terms {
            difference.add_term(m.clone(), c.checked_neg().ok_or(Error::Overflow)?)?;
        }
        Ok(difference)
    }

    pub fn checked_neg(&self) -> Result<Poly> {
        self.checked_scale(-1)
    }

    pub fn checked_scale(&self, factor: i128) -> Result<Poly> {
        if factor == 0 {
            return Ok(Poly::zero());
        }
        let mut terms = BTreeMap::new();
        for (m, c) in &self.terms {
            terms.insert(m.clone(), c.checked_mul(factor).ok_or(Error::Overflow)?);
        }
        Ok(Poly { terms })
    }

    /// Multiplies by `coefficient * monomial`.
    pub fn mul_term(&self, monomial: &Monomial, coefficient: i128) -> Result<Poly> {
        if coefficient == 0 {
            return Ok(Poly::zero());
        }
        let mut terms = BTreeMap::new();
        for (m, c) in &self.terms {
            terms.insert(
                m.mul(monomial),
                c.checked_mul(coefficient).ok_or(Error::Overflow)?,
            );
        }
        Ok(Poly { terms })
    }

    pub fn checked_mul(&self, other: &Poly) -> Result<Poly> {
        let mut product = Poly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                product.add_term(ma.mul(mb), ca.checked_mul(*cb).ok_or(Error::Overflow)?)?;
            }
        }
        Ok(product)
    }

    pub fn checked_pow(&self, exponent: u32) -> Result<Poly> {
        let mut result = Poly::one();
        for _ in 0..exponent {
            result = result.checked_mul(self)?;
        }
        Ok(result)
    }

    /// Exact quotient `self / divisor`.
    ///
    /// Fails with [`Error::NotExact`] when a nonzero remainder would be left.
    pub fn div_exact(&self, divisor: &Poly) -> Result<Poly> {
        let (lead_monomial, lead_coefficient) = match divisor.leading_term() {
            Some((m, c)) => (m.clone(), c),
            None => return Err(Error::DivisionByZero),
        };
        if divisor.is_one() {
            return Ok(self.clone());
        }
        let mut remainder = self.clone();
        let mut quotient = Poly::zero();
        while let Some((monomial, coefficient)) = remainder.leading_term() {
            let factor = monomial.checked_div(&lead_monomial).ok_or(Error::NotExact)?;
            if coefficient % lead_coefficient != 0 {
                return Err(Error::NotExact);
            }
            let scale = coefficient / lead_coefficient;
            remainder = remainder.checked_sub(&divisor.mul_term(&factor, scale)?)?;
            quotient.add_term(factor, scale)?;
        }
        Ok(quotient)
    }

    /// The same polynomial with a positive leading coefficient.
    pub fn normalized_sign(&self) -> Result<Poly> {
        if self.leading_coefficient() < 0 {
            self.checked_neg()
        } else {
            Ok(self.clone())
        }
    }

    /// Splits a polynomial that is affine in the symbols selected by
    /// `is_unknown` into per-unknown coefficients and the remaining part.
    ///
    /// Returns `None` if some term has degree above one in the unknowns.
    pub fn split_linear(
        &self,
        is_unknown: impl Fn(&Symbol) -> bool,
    ) -> Result<Option<(BTreeMap<Symbol, Poly>, Poly)>> {
        let mut coefficients: BTreeMap<Symbol, Poly> = BTreeMap::new();
        let mut rest = Poly::zero();
        for (monomial, c) in &self.terms {
            let mut unknowns = monomial.factors().iter().filter(|(s, _)| is_unknown(s));
            match (unknowns.next(), unknowns.next()) {
                (None, _) => rest.add_term(monomial.clone(), *c)?,
                (Some((symbol, 1)), None) => coefficients
                    .entry(symbol.clone())
                    .or_default()
                    .add_term(monomial.without(symbol), *c)?,
                _ => return Ok(None),
            }
        }
        Ok(Some((coefficients, rest)))
    }

    /// Evaluates every symbol except `keep` and returns the coefficients of
    /// `keep` in ascending powers.
    ///
    /// Fails with the set of symbols that `value_of` could not resolve.
    pub fn evaluate_in(
        &self,
        keep: &Symbol,
        value_of: impl Fn(&Symbol) -> Option<f64>,
    ) -> std::result::Result<Vec<f64>, BTreeSet<Symbol>> {
        let mut coefficients = vec![0.0; self.degree_in(keep) as usize + 1];
        let mut missing = BTreeSet::new();
        for (monomial, c) in &self.terms {
            let mut value = *c as f64;
            for (symbol, exponent) in monomial.factors() {
                if symbol == keep {
                    continue;
                }
                match value_of(symbol) {
                    Some(v) => value *= v.powi(*exponent as i32),
                    None => {
                        missing.insert(symbol.clone());
                    }
                }
            }
            coefficients[monomial.exponent(keep) as usize] += value;
        }
        if missing.is_empty() {
            Ok(coefficients)
        } else {
            Err(missing)
        }
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, latex: bool) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, (monomial, c)) in self.terms().enumerate() {
            let magnitude = c.unsigned_abs();
            match (i, c < 0) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            let body = if latex {
                monomial.to_latex()
            } else {
                monomial.to_string()
            };
            match (monomial.is_one(), magnitude) {
                (true, _) => write!(f, "{magnitude}")?,
                (false, 1) => write!(f, "{body}")?,
                (false, _) if latex => write!(f, "{magnitude} {body}")?,
                (false, _) => write!(f, "{magnitude}*{body}")?,
            }
        }
        Ok(())
    }

    pub fn to_latex(&self) -> String {
        struct Latex<'a>(&'a Poly);
        impl fmt::Display for Latex<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_with(f, true)
            }
        }
        Latex(self).to_string()
    }
}

impl From<Symbol> for Poly {
    fn from(symbol: Symbol) -> Self {
        Poly::symbol(symbol)
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Poly {
        Poly::symbol(Symbol::parameter(name))
    }

    fn p() -> Poly {
        Poly::symbol(Symbol::Frequency)
    }

    #[test]
    fn test_arithmetic() {
        let a = s("R1").checked_add(&s("R2")).unwrap();
        let b = s("R1").checked_sub(&s("R2")).unwrap();
        let product = a.checked_mul(&b).unwrap();
        let expected = s("R1")
            .checked_pow(2)
            .unwrap()
            .checked_sub(&s("R2").checked_pow(2).unwrap())
            .unwrap();
        assert_eq!(product, expected);
        assert!(a.checked_sub(&a).unwrap().is_zero());
    }

    #[test]
    fn test_display_orders_by_frequency() {
        let rc = s("C1").checked_mul(&s("R1")).unwrap().checked_mul(&p()).unwrap();
        let den = rc.checked_add(&Poly::one()).unwrap();
        assert_eq!(den.to_string(), "C1*R1*p + 1");
        let negated = den.checked_scale(-2).unwrap();
        assert_eq!(negated.to_string(), "-2*C1*R1*p - 2");
        assert_eq!(den.to_latex(), "C_{1} R_{1} p + 1");
    }

    #[test]
    fn test_exact_division() {
        let a = s("R1").checked_add(&s("R2")).unwrap();
        let b = s("C1").checked_mul(&p()).unwrap().checked_sub(&Poly::constant(3)).unwrap();
        let product = a.checked_mul(&b).unwrap();
        assert_eq!(product.div_exact(&a).unwrap(), b);
        assert_eq!(product.div_exact(&b).unwrap(), a);
        assert_eq!(a.div_exact(&b), Err(Error::NotExact));
        assert_eq!(a.div_exact(&Poly::zero()), Err(Error::DivisionByZero));
        assert_eq!(
            Poly::constant(3).div_exact(&Poly::constant(2)),
            Err(Error::NotExact)
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let big = Poly::constant(i128::MAX);
        assert_eq!(big.checked_add(&Poly::one()), Err(Error::Overflow));
        assert_eq!(big.checked_scale(2), Err(Error::Overflow));
    }

    #[test]
    fn test_coefficients_in() {
        // R1*p^2 + 2*p + R2
        let poly = s("R1")
            .checked_mul(&p().checked_pow(2).unwrap())
            .unwrap()
            .checked_add(&p().checked_scale(2).unwrap())
            .unwrap()
            .checked_add(&s("R2"))
            .unwrap();
        let coefficients = poly.coefficients_in(&Symbol::Frequency).unwrap();
        assert_eq!(coefficients, vec![s("R2"), Poly::constant(2), s("R1")]);
        assert_eq!(poly.coefficient_of(&Symbol::Frequency, 1).unwrap(), Poly::constant(2));
    }

    #[test]
    fn test_split_linear() {
        let v1 = Poly::symbol(Symbol::potential("1"));
        let v2 = Poly::symbol(Symbol::potential("2"));
        // R2*v1 - R1*v2 + V1
        let poly = s("R2")
            .checked_mul(&v1)
            .unwrap()
            .checked_sub(&s("R1").checked_mul(&v2).unwrap())
            .unwrap()
            .checked_add(&s("V1"))
            .unwrap();
        let (coefficients, rest) = poly.split_linear(Symbol::is_unknown).unwrap().unwrap();
        assert_eq!(coefficients[&Symbol::potential("1")], s("R2"));
        assert_eq!(coefficients[&Symbol::potential("2")], s("R1").checked_neg().unwrap());
        assert_eq!(rest, s("V1"));

        let quadratic = v1.checked_mul(&v2).unwrap();
        assert!(quadratic.split_linear(Symbol::is_unknown).unwrap().is_none());
    }

    #[test]
    fn test_evaluate_in() {
        // C1*R1*p + 1
        let poly = s("C1")
            .checked_mul(&s("R1"))
            .unwrap()
            .checked_mul(&p())
            .unwrap()
            .checked_add(&Poly::one())
            .unwrap();
        let values = |sym: &Symbol| match sym {
            Symbol::Parameter(n) if n == "R1" => Some(1e3),
            Symbol::Parameter(n) if n == "C1" => Some(1e-6),
            _ => None,
        };
        let coefficients = poly.evaluate_in(&Symbol::Frequency, values).unwrap();
        assert_eq!(coefficients.len(), 2);
        assert!((coefficients[0] - 1.0).abs() < 1e-15);
        assert!((coefficients[1] - 1e-3).abs() < 1e-15);

        let missing = s("L1").evaluate_in(&Symbol::Frequency, values).unwrap_err();
        assert!(missing.contains(&Symbol::parameter("L1")));
    }
}
