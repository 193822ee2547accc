//! State-space realization of rational transfer functions.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;

use crate::error::{Error, Result};

/// Evaluate a polynomial with descending coefficients by Horner's rule.
pub fn polyval(coefficients: &[f64], s: Complex<f64>) -> Complex<f64> {
    coefficients
        .iter()
        .fold(Complex::new(0.0, 0.0), |acc, &c| acc * s + c)
}

/// Roots of a polynomial with descending coefficients.
///
/// Leading zeros are ignored and trailing zeros give roots at the origin;
/// the rest are the eigenvalues of the companion matrix.
pub fn roots(coefficients: &[f64]) -> Vec<Complex<f64>> {
    let Some(first) = coefficients.iter().position(|&c| c != 0.0) else {
        return Vec::new();
    };
    let last = coefficients
        .iter()
        .rposition(|&c| c != 0.0)
        .unwrap_or(first);
    let trimmed = &coefficients[first..=last];
    let at_origin = coefficients.len() - 1 - last;

    let degree = trimmed.len() - 1;
    let mut result: Vec<Complex<f64>> = match degree {
        0 => Vec::new(),
        1 => vec![Complex::new(-trimmed[1] / trimmed[0], 0.0)],
        _ => {
            let companion = DMatrix::from_fn(degree, degree, |i, j| {
                if i == 0 {
                    -trimmed[j + 1] / trimmed[0]
                } else if i == j + 1 {
                    1.0
                } else {
                    0.0
                }
            });
            companion.complex_eigenvalues().iter().copied().collect()
        }
    };
    result.extend(std::iter::repeat_n(Complex::new(0.0, 0.0), at_origin));
    result
}

/// Controllable canonical form `x' = A x + B u`, `y = C x + D u`.
#[derive(Debug, Clone)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DVector<f64>,
    d: f64,
    /// Monic denominator, kept for the poles.
    denominator: Vec<f64>,
}

impl StateSpace {
    /// Realize `numerator / denominator` (descending coefficients).
    ///
    /// The denominator must be non-empty with a nonzero leading
    /// coefficient, and the transfer function must be proper.
    pub fn from_transfer_function(numerator: &[f64], denominator: &[f64]) -> Result<Self> {
        if numerator
            .iter()
            .chain(denominator)
            .any(|c| !c.is_finite())
        {
            return Err(Error::DegenerateResponse(
                "non-finite transfer function coefficient".to_string(),
            ));
        }
        let Some(&lead) = denominator.first() else {
            return Err(Error::InvalidDenominator("empty denominator".to_string()));
        };
        if lead == 0.0 {
            return Err(Error::InvalidDenominator(
                "leading coefficient is zero".to_string(),
            ));
        }

        let first = numerator
            .iter()
            .position(|&c| c != 0.0)
            .unwrap_or(numerator.len().saturating_sub(1));
        let numerator = numerator.get(first..).unwrap_or_default();
        if numerator.len() > denominator.len() {
            return Err(Error::ImproperSystem {
                numerator: numerator.len() - 1,
                denominator: denominator.len() - 1,
            });
        }

        let n = denominator.len() - 1;
        let a_coeffs: Vec<f64> = denominator.iter().map(|c| c / lead).collect();
        let mut b_coeffs = vec![0.0; n + 1 - numerator.len()];
        b_coeffs.extend(numerator.iter().map(|c| c / lead));

        let d = b_coeffs[0];
        let a = DMatrix::from_fn(n, n, |i, j| {
            if i == 0 {
                -a_coeffs[j + 1]
            } else if i == j + 1 {
                1.0
            } else {
                0.0
            }
        });
        let b = DVector::from_fn(n, |i, _| if i == 0 { 1.0 } else { 0.0 });
        let c = DVector::from_fn(n, |i, _| b_coeffs[i + 1] - d * a_coeffs[i + 1]);

        Ok(Self {
            a,
            b,
            c,
            d,
            denominator: a_coeffs,
        })
    }

    /// Number of states.
    pub fn order(&self) -> usize {
        self.b.len()
    }

    pub fn poles(&self) -> Vec<Complex<f64>> {
        roots(&self.denominator)
    }

    /// Output for a unit step applied at `t = 0` from rest, sampled at
    /// uniformly spaced `times` starting at zero.
    ///
    /// Uses the exact zero-order-hold discretization
    /// `exp([[A, B], [0, 0]] * dt)`, which is exact for a constant input.
    pub fn step(&self, times: &[f64]) -> Vec<f64> {
        let n = self.order();
        if n == 0 || times.is_empty() {
            return vec![self.d; times.len()];
        }
        let dt = if times.len() > 1 {
            times[1] - times[0]
        } else {
            0.0
        };

        let augmented = DMatrix::from_fn(n + 1, n + 1, |i, j| {
            if i == n {
                0.0
            } else if j == n {
                self.b[i] * dt
            } else {
                self.a[(i, j)] * dt
            }
        });
        let transition = augmented.exp();
        let phi = DMatrix::from_fn(n, n, |i, j| transition[(i, j)]);
        let gamma = DVector::from_fn(n, |i, _| transition[(i, n)]);

        let mut state = DVector::<f64>::zeros(n);
        let mut output = Vec::with_capacity(times.len());
        for _ in times {
            output.push(self.c.dot(&state) + self.d);
            state = &phi * &state + &gamma;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_real(mut values: Vec<Complex<f64>>) -> Vec<f64> {
        values.sort_by(|a, b| a.re.total_cmp(&b.re));
        values.iter().map(|z| z.re).collect()
    }

    #[test]
    fn test_polyval() {
        // p^2 + 2p + 3 at p = 1 + i: (2i) + (2 + 2i) + 3
        let value = polyval(&[1.0, 2.0, 3.0], Complex::new(1.0, 1.0));
        assert!((value - Complex::new(5.0, 4.0)).norm() < 1e-12);
    }

    #[test]
    fn test_roots_real() {
        // (p + 1)(p + 2)(p + 3)
        let r = sorted_real(roots(&[1.0, 6.0, 11.0, 6.0]));
        for (got, want) in r.iter().zip([-3.0, -2.0, -1.0]) {
            assert!((got - want).abs() < 1e-9, "root {got} != {want}");
        }
    }

    #[test]
    fn test_roots_complex_pair() {
        // p^2 + 2p + 5 has roots -1 +- 2i
        let r = roots(&[1.0, 2.0, 5.0]);
        assert_eq!(r.len(), 2);
        for z in &r {
            assert!((z.re + 1.0).abs() < 1e-9);
            assert!((z.im.abs() - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_roots_leading_and_trailing_zeros() {
        let r = roots(&[0.0, 2.0, 4.0, 0.0]);
        assert_eq!(r.len(), 2);
        let re = sorted_real(r);
        assert!((re[0] + 2.0).abs() < 1e-12);
        assert_eq!(re[1], 0.0);
        assert!(roots(&[0.0, 0.0]).is_empty());
        assert!(roots(&[3.0]).is_empty());
    }

    #[test]
    fn test_canonical_form() {
        // (p + 3) / (p^2 + 3p + 2)
        let ss = StateSpace::from_transfer_function(&[1.0, 3.0], &[1.0, 3.0, 2.0]).unwrap();
        assert_eq!(ss.order(), 2);
        assert_eq!(ss.a[(0, 0)], -3.0);
        assert_eq!(ss.a[(0, 1)], -2.0);
        assert_eq!(ss.a[(1, 0)], 1.0);
        assert_eq!(ss.c[0], 1.0);
        assert_eq!(ss.c[1], 3.0);
        assert_eq!(ss.d, 0.0);
    }

    #[test]
    fn test_biproper_feedthrough() {
        // (2p + 1) / (p + 1): D = 2, C = 1 - 2 = -1
        let ss = StateSpace::from_transfer_function(&[2.0, 1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(ss.d, 2.0);
        assert_eq!(ss.c[0], -1.0);
    }

    #[test]
    fn test_invalid_systems() {
        assert!(matches!(
            StateSpace::from_transfer_function(&[1.0], &[]),
            Err(Error::InvalidDenominator(_))
        ));
        assert!(matches!(
            StateSpace::from_transfer_function(&[1.0], &[0.0, 1.0]),
            Err(Error::InvalidDenominator(_))
        ));
        assert!(matches!(
            StateSpace::from_transfer_function(&[1.0, 0.0, 0.0], &[1.0, 1.0]),
            Err(Error::ImproperSystem {
                numerator: 2,
                denominator: 1
            })
        ));
        assert!(matches!(
            StateSpace::from_transfer_function(&[f64::NAN], &[1.0]),
            Err(Error::DegenerateResponse(_))
        ));
    }

    #[test]
    fn test_first_order_step_is_exact() {
        // 1 / (p + 1): y(t) = 1 - exp(-t)
        let ss = StateSpace::from_transfer_function(&[1.0], &[1.0, 1.0]).unwrap();
        let times: Vec<f64> = (0..11).map(|i| i as f64 * 0.5).collect();
        let y = ss.step(&times);
        for (t, y) in times.iter().zip(&y) {
            let exact = 1.0 - (-t).exp();
            assert!((y - exact).abs() < 1e-9, "y({t}) = {y}, expected {exact}");
        }
    }
}
