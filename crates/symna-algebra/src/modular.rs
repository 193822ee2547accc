//! Univariate images of polynomials modulo the prime `2^61 - 1`.
//!
//! Every variable but one is replaced by a pseudo-random residue, which
//! turns a multivariate polynomial into a dense univariate one over a
//! finite field. A GCD of degree zero between two images, taken where the
//! leading coefficient survives, proves the polynomials have no common
//! factor in that variable; a nonzero remainder proves a division is not
//! exact. Positive answers are only likely, never proved.

use std::collections::BTreeMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::poly::Poly;
use crate::symbol::Symbol;

const MODULUS: u64 = (1 << 61) - 1;

/// Evaluation points tried before a test gives up.
const ATTEMPTS: u64 = 3;

fn reduce(value: u128) -> u64 {
    (value % MODULUS as u128) as u64
}

fn from_integer(value: i128) -> u64 {
    value.rem_euclid(MODULUS as i128) as u64
}

fn add(a: u64, b: u64) -> u64 {
    reduce(a as u128 + b as u128)
}

fn sub(a: u64, b: u64) -> u64 {
    add(a, MODULUS - b)
}

fn mul(a: u64, b: u64) -> u64 {
    reduce(a as u128 * b as u128)
}

fn pow(mut base: u64, mut exponent: u64) -> u64 {
    let mut result = 1;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul(result, base);
        }
        base = mul(base, base);
        exponent >>= 1;
    }
    result
}

fn inverse(a: u64) -> u64 {
    pow(a, MODULUS - 2)
}

/// SplitMix64 finalizer.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

/// Nonzero residue for `symbol` at evaluation point `seed`.
fn residue(symbol: &Symbol, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    symbol.hash(&mut hasher);
    let mixed = splitmix64(hasher.finish() ^ seed.wrapping_mul(0x517cc1b727220a95));
    match mixed % MODULUS {
        0 => 1,
        r => r,
    }
}

/// Residues for every variable of `polys` except `keep`.
fn point(polys: &[&Poly], keep: &Symbol, seed: u64) -> BTreeMap<Symbol, u64> {
    polys
        .iter()
        .flat_map(|p| p.variables())
        .filter(|s| s != keep)
        .map(|s| {
            let r = residue(&s, seed);
            (s, r)
        })
        .collect()
}

/// Coefficients in ascending powers of `keep`, without trailing zeros.
fn image(poly: &Poly, keep: &Symbol, values: &BTreeMap<Symbol, u64>) -> Vec<u64> {
    let mut coefficients = vec![0; poly.degree_in(keep) as usize + 1];
    for (monomial, c) in poly.terms() {
        let mut value = from_integer(c);
        for (symbol, exponent) in monomial.factors() {
            if let Some(&r) = values.get(symbol) {
                value = mul(value, pow(r, u64::from(*exponent)));
            }
        }
        let slot = &mut coefficients[monomial.exponent(keep) as usize];
        *slot = add(*slot, value);
    }
    trim(coefficients)
}

fn trim(mut coefficients: Vec<u64>) -> Vec<u64> {
    while coefficients.last() == Some(&0) {
        coefficients.pop();
    }
    coefficients
}

/// Remainder of `a` by a nonzero trimmed `b`.
fn remainder(mut a: Vec<u64>, b: &[u64]) -> Vec<u64> {
    let Some(&lead) = b.last() else {
        return a;
    };
    let lead_inverse = inverse(lead);
    while a.len() >= b.len() {
        let Some(&top) = a.last() else { break };
        if top != 0 {
            let factor = mul(top, lead_inverse);
            let shift = a.len() - b.len();
            for (i, &c) in b.iter().enumerate() {
                a[shift + i] = sub(a[shift + i], mul(factor, c));
            }
        }
        a.pop();
    }
    trim(a)
}

/// Degree of the GCD of two images; `None` when both are zero.
fn gcd_degree(mut a: Vec<u64>, mut b: Vec<u64>) -> Option<usize> {
    while !b.is_empty() {
        let r = remainder(a, &b);
        a = b;
        b = r;
    }
    a.len().checked_sub(1)
}

/// True when `a` and `b` certainly share no factor involving `var`.
pub(crate) fn coprime_in(a: &Poly, b: &Poly, var: &Symbol) -> bool {
    let degree = a.degree_in(var) as usize;
    for seed in 0..ATTEMPTS {
        let values = point(&[a, b], var, seed);
        let image_a = image(a, var, &values);
        if image_a.len() != degree + 1 {
            continue;
        }
        return gcd_degree(image_a, image(b, var, &values)) == Some(0);
    }
    false
}

/// False when `divisor` certainly does not divide `dividend`.
pub(crate) fn may_divide(divisor: &Poly, dividend: &Poly, var: &Symbol) -> bool {
    let degree = divisor.degree_in(var) as usize;
    for seed in 0..ATTEMPTS {
        let values = point(&[divisor, dividend], var, seed);
        let image_divisor = image(divisor, var, &values);
        if image_divisor.len() != degree + 1 {
            continue;
        }
        return remainder(image(dividend, var, &values), &image_divisor).is_empty();
    }
    true
}
