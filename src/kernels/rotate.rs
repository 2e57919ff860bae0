//! Plane (Givens) rotations across a row pair or a column pair
//!
//! A rotation with real cosine `c` and sine `s` is the unitary 2x2 matrix
//!
//! ```text
//! G = [  c        s ]
//!     [ -conj(s)  c ]
//! ```
//!
//! [`rotate_rows`] replaces rows `low`/`high` with `G` applied from the
//! left, [`rotate_columns`] replaces columns `low`/`high` with `Gᴴ` applied
//! from the right, so the pair performs the similarity `G A Gᴴ`.

use crate::scalar::Scalar;

/// A plane rotation `(cos, sin)` with real `cos`
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation<T> {
    /// Cosine, always real and non-negative for [`Rotation::givens`]
    pub cos: T,
    /// Sine
    pub sin: T,
}

impl<T: Scalar> Rotation<T> {
    /// The identity rotation
    pub fn identity() -> Self {
        Self {
            cos: T::one(),
            sin: T::zero(),
        }
    }

    /// Rotation annihilating `b` against `a`
    ///
    /// Returns the rotation together with the new leading value `r`, so that
    /// `G [a, b]ᵀ = [r, 0]ᵀ`.
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::kernels::Rotation;
    ///
    /// let (g, r) = Rotation::givens(3.0_f64, 4.0);
    /// assert!((r - 5.0).abs() < 1e-15);
    /// assert!((g.cos - 0.6).abs() < 1e-15);
    /// assert!((g.sin - 0.8).abs() < 1e-15);
    /// ```
    pub fn givens(a: T, b: T) -> (Self, T) {
        if b.is_zero() {
            return (Self::identity(), a);
        }
        let abs_a = a.norm();
        let abs_b = b.norm();
        if abs_a == 0.0 {
            let rotation = Self {
                cos: T::zero(),
                sin: b.conjugate() / T::from_f64(abs_b),
            };
            return (rotation, T::from_f64(abs_b));
        }
        let radius = abs_a.hypot(abs_b);
        let phase = a.signum();
        let rotation = Self {
            cos: T::from_f64(abs_a / radius),
            sin: phase.clone() * b.conjugate() / T::from_f64(radius),
        };
        (rotation, phase * T::from_f64(radius))
    }

    /// Applies `G` to rows `low`/`high` over columns `first_col..col_limit`
    pub fn apply_rows(
        &self,
        data: &mut [T],
        row_dim: usize,
        low: usize,
        high: usize,
        first_col: usize,
        col_limit: usize,
    ) {
        rotate_rows(
            data,
            row_dim,
            low,
            high,
            self.cos.clone(),
            self.sin.clone(),
            first_col,
            col_limit,
        );
    }

    /// Applies `Gᴴ` to columns `low`/`high` over rows `first_row..row_limit`
    pub fn apply_columns(
        &self,
        data: &mut [T],
        row_dim: usize,
        low: usize,
        high: usize,
        first_row: usize,
        row_limit: usize,
    ) {
        rotate_columns(
            data,
            row_dim,
            low,
            high,
            self.cos.clone(),
            self.sin.clone(),
            first_row,
            row_limit,
        );
    }
}

/// `row_low' = c*row_low + s*row_high`, `row_high' = c*row_high - conj(s)*row_low`
#[allow(clippy::too_many_arguments)]
pub fn rotate_rows<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    low: usize,
    high: usize,
    cos: T,
    sin: T,
    first_col: usize,
    col_limit: usize,
) {
    let sin_conj = sin.conjugate();
    for j in first_col..col_limit {
        let base = j * row_dim;
        let a = data[base + low].clone();
        let b = data[base + high].clone();
        data[base + low] = cos.clone() * a.clone() + sin.clone() * b.clone();
        data[base + high] = cos.clone() * b - sin_conj.clone() * a;
    }
}

/// `col_low' = c*col_low + conj(s)*col_high`, `col_high' = c*col_high - s*col_low`
#[allow(clippy::too_many_arguments)]
pub fn rotate_columns<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    low: usize,
    high: usize,
    cos: T,
    sin: T,
    first_row: usize,
    row_limit: usize,
) {
    let sin_conj = sin.conjugate();
    let low_base = low * row_dim;
    let high_base = high * row_dim;
    for i in first_row..row_limit {
        let a = data[low_base + i].clone();
        let b = data[high_base + i].clone();
        data[low_base + i] = cos.clone() * a.clone() + sin_conj.clone() * b.clone();
        data[high_base + i] = cos.clone() * b - sin.clone() * a;
    }
}
