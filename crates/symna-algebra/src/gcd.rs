//! Greatest common divisors of multivariate polynomials.
//!
//! Most GCDs met while solving circuits are trivial, so each variable the
//! operands share is first tested on a modular image; a pair that is
//! coprime in every shared variable only has an integer GCD. Otherwise the
//! work recurses on the shared variable of lowest degree. When one operand
//! is linear in it, its primitive part either divides the other operand or
//! contributes nothing. Higher degrees fall back to a primitive
//! pseudo-remainder sequence.

use crate::error::{Error, Result};
use crate::modular;
use crate::monomial::Monomial;
use crate::poly::Poly;
use crate::symbol::Symbol;

/// GCD of two integers, always non-negative.
pub fn integer_gcd(a: i128, b: i128) -> Result<i128> {
    let (mut a, mut b) = (
        a.checked_abs().ok_or(Error::Overflow)?,
        b.checked_abs().ok_or(Error::Overflow)?,
    );
    while b != 0 {
        (a, b) = (b, a % b);
    }
    Ok(a)
}

/// GCD of the integer coefficients of `p`.
pub fn integer_content(p: &Poly) -> Result<i128> {
    p.terms().try_fold(0, |content, (_, c)| integer_gcd(content, c))
}

/// GCD of two polynomials, normalized to a positive leading coefficient.
///
/// `gcd(0, 0)` is `0`.
pub fn gcd(a: &Poly, b: &Poly) -> Result<Poly> {
    if a.is_zero() {
        return b.normalized_sign();
    }
    if b.is_zero() {
        return a.normalized_sign();
    }
    if let (Some(x), Some(y)) = (a.constant_value(), b.constant_value()) {
        return Ok(Poly::constant(integer_gcd(x, y)?));
    }
    if a == b {
        return a.normalized_sign();
    }
    if a.len() == 1 {
        return term_gcd(a, b);
    }
    if b.len() == 1 {
        return term_gcd(b, a);
    }

    let shared = a.variables();
    let var = b
        .variables()
        .into_iter()
        .filter(|x| shared.contains(x) && !modular::coprime_in(a, b, x))
        .min_by_key(|x| a.degree_in(x).min(b.degree_in(x)));
    let Some(var) = var else {
        return Ok(Poly::constant(integer_gcd(
            integer_content(a)?,
            integer_content(b)?,
        )?));
    };

    let (high, low) = if a.degree_in(&var) >= b.degree_in(&var) {
        (a, b)
    } else {
        (b, a)
    };
    if low.degree_in(&var) == 1 {
        linear_gcd(high, low, &var)
    } else {
        prs_gcd(high, low, &var)
    }
}

/// GCD of a single term with an arbitrary polynomial.
fn term_gcd(term: &Poly, other: &Poly) -> Result<Poly> {
    let Some((monomial, coefficient)) = term.leading_term() else {
        return other.normalized_sign();
    };
    let coefficient = integer_gcd(coefficient, integer_content(other)?)?;
    let mut common = Monomial::one();
    for (symbol, exponent) in monomial.factors() {
        let shared = other
            .terms()
            .map(|(m, _)| m.exponent(symbol))
            .min()
            .unwrap_or(0)
            .min(*exponent);
        common = common.mul(&Monomial::power(symbol.clone(), shared));
    }
    Ok(Poly::term(common, coefficient))
}

/// GCD when `low` has degree one in `var`.
fn linear_gcd(high: &Poly, low: &Poly, var: &Symbol) -> Result<Poly> {
    let content = content_in(low, var)?;
    let primitive = low.div_exact(&content)?;
    if modular::may_divide(&primitive, high, var) {
        match high.div_exact(&primitive) {
            Ok(cofactor) => {
                return gcd(&cofactor, &content)?
                    .checked_mul(&primitive)?
                    .normalized_sign();
            }
            Err(Error::NotExact) => {}
            Err(e) => return Err(e),
        }
    }
    gcd(high, &content)
}

/// GCD by a primitive pseudo-remainder sequence in `var`.
fn prs_gcd(a: &Poly, b: &Poly, var: &Symbol) -> Result<Poly> {
    let content_a = content_in(a, var)?;
    let content_b = content_in(b, var)?;
    let content = gcd(&content_a, &content_b)?;

    let mut u = a.div_exact(&content_a)?;
    let mut v = b.div_exact(&content_b)?;
    if u.degree_in(var) < v.degree_in(var) {
        std::mem::swap(&mut u, &mut v);
    }
    while !v.is_zero() {
        let remainder = pseudo_remainder(&u, &v, var)?;
        u = v;
        v = if remainder.is_zero() {
            remainder
        } else {
            primitive_part(&remainder, var)?
        };
    }

    primitive_part(&u, var)?
        .checked_mul(&content)?
        .normalized_sign()
}

/// GCD of the coefficients of `p` viewed as a polynomial in `var`.
pub fn content_in(p: &Poly, var: &Symbol) -> Result<Poly> {
    let mut content = Poly::zero();
    for coefficient in p.coefficients_in(var)? {
        if coefficient.is_zero() {
            continue;
        }
        content = gcd(&content, &coefficient)?;
        if content.is_one() {
            break;
        }
    }
    Ok(content)
}

/// `p` divided by its content in `var`.
pub fn primitive_part(p: &Poly, var: &Symbol) -> Result<Poly> {
    if p.is_zero() {
        return Ok(Poly::zero());
    }
    p.div_exact(&content_in(p, var)?)
}

/// Remainder of `u` by `v` in `var`, scaled so no division is needed.
///
/// The scaling factor is a power of the leading coefficient of `v`, which is
/// free of `var`; callers that take primitive parts afterwards can ignore it.
fn pseudo_remainder(u: &Poly, v: &Poly, var: &Symbol) -> Result<Poly> {
    let degree_v = v.degree_in(var);
    let lead_v = v.coefficient_of(var, degree_v)?;
    let mut remainder = u.clone();
    while !remainder.is_zero() {
        let degree_r = remainder.degree_in(var);
        if degree_r < degree_v {
            break;
        }
        let lead_r = remainder.coefficient_of(var, degree_r)?;
        let shift = Monomial::power(var.clone(), degree_r - degree_v);
        let cancel = lead_r.checked_mul(&v.mul_term(&shift, 1)?)?;
        remainder = lead_v.checked_mul(&remainder)?.checked_sub(&cancel)?;
    }
    Ok(remainder)
}
