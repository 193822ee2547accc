//! Exact symbolic arithmetic for circuit analysis.
//!
//! Expressions are reduced quotients of multivariate polynomials with
//! integer coefficients over [`Symbol`]s (component parameters, node
//! potentials, branch currents and the Laplace variable `p`). Every
//! operation is exact; overflow of the `i128` coefficients is reported as
//! an error rather than silently wrapping.

pub mod error;
pub mod expr;
pub mod gcd;
mod modular;
pub mod monomial;
pub mod poly;
pub mod symbol;

pub use error::{Error, Result};
pub use expr::Expr;
pub use monomial::Monomial;
pub use poly::Poly;
pub use symbol::Symbol;
