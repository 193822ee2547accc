//! Reduced rational expressions.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::gcd::gcd;
use crate::poly::Poly;
use crate::symbol::Symbol;

/// A quotient of two polynomials kept in lowest terms.
///
/// The numerator and denominator share no common factor and the
/// denominator's leading coefficient is positive, so two expressions are
/// mathematically equal exactly when they are structurally equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    numerator: Poly,
    denominator: Poly,
}

impl Expr {
    pub fn zero() -> Self {
        Self::from_poly(Poly::zero())
    }

    pub fn one() -> Self {
        Self::from_poly(Poly::one())
    }

    pub fn constant(value: i128) -> Self {
        Self::from_poly(Poly::constant(value))
    }

    pub fn symbol(symbol: Symbol) -> Self {
        Self::from_poly(Poly::symbol(symbol))
    }

    pub fn from_poly(numerator: Poly) -> Self {
        Self {
            numerator,
            denominator: Poly::one(),
        }
    }

    /// Builds `numerator / denominator` and cancels their common factors.
    pub fn ratio(numerator: Poly, denominator: Poly) -> Result<Self> {
        if denominator.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if numerator.is_zero() {
            return Ok(Self::zero());
        }
        if denominator.is_one() {
            return Ok(Self::from_poly(numerator));
        }
        let common = gcd(&numerator, &denominator)?;
        let mut numerator = numerator.div_exact(&common)?;
        let mut denominator = denominator.div_exact(&common)?;
        if denominator.leading_coefficient() < 0 {
            numerator = numerator.checked_neg()?;
            denominator = denominator.checked_neg()?;
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> &Poly {
        &self.numerator
    }

    pub fn denominator(&self) -> &Poly {
        &self.denominator
    }

    pub fn into_parts(self) -> (Poly, Poly) {
        (self.numerator, self.denominator)
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_polynomial(&self) -> bool {
        self.denominator.is_one()
    }

    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = self.numerator.variables();
        symbols.extend(self.denominator.variables());
        symbols
    }

    pub fn checked_add(&self, other: &Expr) -> Result<Expr> {
        if self.denominator == other.denominator {
            return Expr::ratio(
                self.numerator.checked_add(&other.numerator)?,
                self.denominator.clone(),
            );
        }
        let numerator = self
            .numerator
            .checked_mul(&other.denominator)?
            .checked_add(&other.numerator.checked_mul(&self.denominator)?)?;
        Expr::ratio(numerator, self.denominator.checked_mul(&other.denominator)?)
    }

    pub fn checked_sub(&self, other: &Expr) -> Result<Expr> {
        self.checked_add(&other.checked_neg()?)
    }

    pub fn checked_neg(&self) -> Result<Expr> {
        Ok(Expr {
            numerator: self.numerator.checked_neg()?,
            denominator: self.denominator.clone(),
        })
    }

    pub fn checked_mul(&self, other: &Expr) -> Result<Expr> {
        Expr::ratio(
            self.numerator.checked_mul(&other.numerator)?,
            self.denominator.checked_mul(&other.denominator)?,
        )
    }

    pub fn checked_div(&self, other: &Expr) -> Result<Expr> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Expr::ratio(
            self.numerator.checked_mul(&other.denominator)?,
            self.denominator.checked_mul(&other.numerator)?,
        )
    }

    pub fn recip(&self) -> Result<Expr> {
        Expr::one().checked_div(self)
    }

    /// Sum of several expressions; an empty sum is zero.
    pub fn sum<'a>(terms: impl IntoIterator<Item = &'a Expr>) -> Result<Expr> {
        terms
            .into_iter()
            .try_fold(Expr::zero(), |acc, term| acc.checked_add(term))
    }

    pub fn to_latex(&self) -> String {
        if self.is_polynomial() {
            return self.numerator.to_latex();
        }
        format!(
            "\\frac{{{}}}{{{}}}",
            self.numerator.to_latex(),
            self.denominator.to_latex()
        )
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::symbol(symbol)
    }
}

impl From<Poly> for Expr {
    fn from(poly: Poly) -> Self {
        Expr::from_poly(poly)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_polynomial() {
            return write!(f, "{}", self.numerator);
        }
        let wrap = |poly: &Poly| {
            if poly.len() > 1 {
                format!("({poly})")
            } else {
                poly.to_string()
            }
        };
        write!(f, "{}/{}", wrap(&self.numerator), wrap(&self.denominator))
    }
}
