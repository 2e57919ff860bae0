//! Rayo: dense linear-algebra kernels
//!
//! **Rayo** (Spanish: "ray", as in a lightning bolt) provides the low-level
//! layer dense decompositions are built from:
//!
//! 1. **Kernel primitives** - AXPY, dot products, copy/fill/transpose,
//!    plane rotations, Hermitian rank-2 updates, symmetric mat-vec,
//!    matrix multiplication, Householder reflectors, triangular
//!    substitution and `tred2`
//! 2. **Dispatch policy** - per-primitive thresholds choosing between
//!    unrolled small kernels and divide-and-conquer parallel kernels
//! 3. **Reductions** - Householder bidiagonalisation, tridiagonalisation
//!    and QR composed from the primitives
//! 4. **Equations** - single rows of a linear system with relaxed
//!    Gauss-Seidel updates
//!
//! Every kernel is generic over [`Scalar`], implemented for `f64`, `f32`,
//! `Complex64`, `Complex32`, exact `BigRational` and arbitrary-precision
//! `BigDecimal`.
//!
//! # Design Principles
//!
//! - **Column-major, in place**: kernels take a flat buffer plus its row
//!   dimension and never allocate or resize it
//! - **Size-dependent dispatch**: work is split across the rayon pool only
//!   above a tunable threshold ([`DispatchConfig`], [`ThresholdTable`])
//! - **No unsafe**: parallel leaves own disjoint `split_at_mut` chunks
//! - **Validated edges**: [`Matrix`] and the decompositions check shapes and
//!   return [`RayoError`]; the kernels below them trust their indices
//!
//! # Quick Start
//!
//! ```rust
//! use rayo::{Matrix, Tridiagonal};
//!
//! let a = Matrix::from_rows(&[
//!     [4.0, 1.0, 2.0],
//!     [1.0, 3.0, 0.5],
//!     [2.0, 0.5, 5.0],
//! ])
//! .unwrap();
//!
//! let t = Tridiagonal::decompose(&a, true).unwrap();
//! let rebuilt = t.reconstruct().unwrap();
//! assert!(rebuilt.max_abs_difference(&a).unwrap() < 1e-12);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default): divide-and-conquer kernels on rayon
//! - `tracing`: spans on decomposition entry points and debug events on
//!   threshold changes

pub mod access;
pub mod config;
pub mod dispatch;
pub mod equation;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod reduction;
pub mod scalar;

pub use access::{Access2D, ColumnMajor};
pub use config::{worker_count, DispatchConfig, Primitive, ThresholdTable};
pub use dispatch::MultiplyKernel;
pub use equation::{gauss_seidel, Equation, IterativeConfig, IterativeReport};
pub use error::{RayoError, Result};
pub use kernels::{Householder, Rotation, SubstitutionOptions};
pub use matrix::Matrix;
pub use reduction::{Bidiagonal, HouseholderQr, Tridiagonal};
pub use scalar::{Real, Scalar, Tolerance};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let a = Matrix::from_rows(&[[2.0, 0.0], [0.0, 3.0]]).unwrap();
        let qr = HouseholderQr::decompose(&a, true).unwrap();
        assert!(qr.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-15);
    }

    #[test]
    fn test_global_config_snapshot_is_independent() {
        let snapshot = DispatchConfig::global();
        let changed = snapshot.clone().with_all_thresholds(1);
        assert_ne!(snapshot, changed);
        assert!(worker_count() >= 1);
    }
}
