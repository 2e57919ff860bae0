//! Householder reductions: bidiagonal, tridiagonal and QR
//!
//! Each decomposition copies its input, then walks the diagonal index `k`
//! strictly in order. Step `k` generates a reflector from the current
//! column (or row) and immediately applies it to the unreduced block; step
//! `k + 1` only starts once that update has completed, even when the
//! update itself runs on several workers.
//!
//! A generation step that finds nothing to annihilate contributes the
//! identity: nothing is applied and nothing is accumulated. A tail that is
//! negligible but not exactly zero is discarded, so the working copy holds
//! the same zeros the reduced form reports.
//!
//! With `accumulate` set the reflectors are kept and folded into the
//! orthogonal factors, so the original matrix can be reconstructed.
//!
//! # Example
//!
//! ```
//! use rayo::{Bidiagonal, Matrix};
//!
//! let a = Matrix::from_rows(&[[4.0, 1.0], [2.0, 3.0], [0.0, 1.0]]).unwrap();
//! let bidiagonal = Bidiagonal::decompose(&a, true).unwrap();
//!
//! assert!(bidiagonal.is_upper());
//! assert_eq!(bidiagonal.diagonal().len(), 2);
//! let rebuilt = bidiagonal.reconstruct().unwrap();
//! assert!(rebuilt.max_abs_difference(&a).unwrap() < 1e-12);
//! ```

use crate::config::DispatchConfig;
use crate::error::{RayoError, Result};
use crate::kernels::{
    generate_apply_and_copy_column, generate_apply_and_copy_row, householder_hermitian,
    householder_left, householder_right, tred2, Householder,
};
use crate::matrix::Matrix;
use crate::scalar::{Real, Scalar};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// `H_1 H_2 ... H_p` as a dense `dim x dim` matrix
fn accumulate_reflectors<T: Scalar>(
    dim: usize,
    reflectors: &[Householder<T>],
    config: &DispatchConfig,
) -> Matrix<T> {
    let mut q = Matrix::identity(dim);
    for reflector in reflectors.iter().rev() {
        householder_left(q.as_mut_slice(), dim, 0, dim, reflector, config);
    }
    q
}

/// Zeroes `data[first_row.., col]` after a skipped column step
fn discard_column_tail<T: Scalar>(data: &mut [T], row_dim: usize, first_row: usize, col: usize) {
    if first_row < row_dim {
        data[first_row + col * row_dim..(col + 1) * row_dim].fill(T::zero());
    }
}

/// Zeroes `data[row, first_col..col_limit]` after a skipped row step
fn discard_row_tail<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    row: usize,
    first_col: usize,
    col_limit: usize,
) {
    for j in first_col..col_limit {
        data[row + j * row_dim] = T::zero();
    }
}

fn require_accumulated<'a, T>(factor: Option<&'a Matrix<T>>) -> Result<&'a Matrix<T>> {
    factor.ok_or_else(|| {
        RayoError::InvalidInput("orthogonal factors were not accumulated".to_string())
    })
}

fn require_non_empty<T: Scalar>(matrix: &Matrix<T>) -> Result<()> {
    if matrix.rows() == 0 || matrix.cols() == 0 {
        return Err(RayoError::EmptyMatrix);
    }
    Ok(())
}

/// `A = Q1 B Q2ᴴ` with `B` bidiagonal
///
/// Tall and square input (`rows >= cols`) gives an upper bidiagonal `B`,
/// fat input a lower bidiagonal one.
#[derive(Debug, Clone)]
pub struct Bidiagonal<T> {
    rows: usize,
    cols: usize,
    upper: bool,
    diagonal: Vec<T>,
    off_diagonal: Vec<T>,
    q1: Option<Matrix<T>>,
    q2: Option<Matrix<T>>,
}

impl<T: Scalar> Bidiagonal<T> {
    /// Bidiagonalises `matrix` with the global dispatch thresholds
    ///
    /// # Errors
    ///
    /// Returns `EmptyMatrix` for a matrix with no rows or no columns
    pub fn decompose(matrix: &Matrix<T>, accumulate: bool) -> Result<Self> {
        Self::decompose_with(matrix, accumulate, &DispatchConfig::global())
    }

    /// Bidiagonalises `matrix` with explicit dispatch thresholds
    ///
    /// # Arguments
    ///
    /// * `matrix` - Input, copied before reduction
    /// * `accumulate` - Keep the reflectors and build `Q1` and `Q2`
    /// * `config` - Parallel thresholds and, optionally, the tolerance
    ///   below which a column or row tail counts as already reduced
    ///
    /// # Returns
    ///
    /// The bidiagonal `B` (upper when `rows >= cols`) and, with
    /// `accumulate`, the unitary factors satisfying `A = Q1 B Q2ᴴ` up to
    /// the discarded negligible tails
    ///
    /// # Errors
    ///
    /// Returns `EmptyMatrix` for a matrix with no rows or no columns
    #[cfg_attr(feature = "tracing", instrument(skip(matrix, config), fields(dims = %format!("{}x{}", matrix.rows(), matrix.cols()))))]
    pub fn decompose_with(
        matrix: &Matrix<T>,
        accumulate: bool,
        config: &DispatchConfig,
    ) -> Result<Self> {
        require_non_empty(matrix)?;
        let (m, n) = matrix.shape();
        let tolerance = config.tolerance_for::<T>();
        let mut data = matrix.clone().into_vec();

        let mut column = Householder::new(m);
        let mut row = Householder::new(n);
        let mut worker = vec![T::zero(); m];
        let mut left = Vec::new();
        let mut right = Vec::new();

        let upper = m >= n;
        if upper {
            for k in 0..n {
                if generate_apply_and_copy_column(&mut data, m, k, k, &mut column, &tolerance) {
                    householder_left(&mut data, m, k + 1, n, &column, config);
                    if accumulate {
                        left.push(column.clone());
                    }
                } else {
                    discard_column_tail(&mut data, m, k + 1, k);
                }
                if k + 1 < n {
                    if generate_apply_and_copy_row(&mut data, m, k, k + 1, &mut row, &tolerance) {
                        householder_right(&mut data, m, k + 1, m, &row, &mut worker, config);
                        if accumulate {
                            right.push(row.clone());
                        }
                    } else {
                        discard_row_tail(&mut data, m, k, k + 2, n);
                    }
                }
            }
        } else {
            for k in 0..m {
                if generate_apply_and_copy_row(&mut data, m, k, k, &mut row, &tolerance) {
                    householder_right(&mut data, m, k + 1, m, &row, &mut worker, config);
                    if accumulate {
                        right.push(row.clone());
                    }
                } else {
                    discard_row_tail(&mut data, m, k, k + 1, n);
                }
                if k + 1 < m {
                    if generate_apply_and_copy_column(&mut data, m, k + 1, k, &mut column, &tolerance) {
                        householder_left(&mut data, m, k + 1, n, &column, config);
                        if accumulate {
                            left.push(column.clone());
                        }
                    } else {
                        discard_column_tail(&mut data, m, k + 2, k);
                    }
                }
            }
        }

        let p = m.min(n);
        let diagonal = (0..p).map(|k| data[k + k * m].clone()).collect();
        let off_diagonal = (0..p.saturating_sub(1))
            .map(|k| {
                if upper {
                    data[k + (k + 1) * m].clone()
                } else {
                    data[k + 1 + k * m].clone()
                }
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            left = left.len(),
            right = right.len(),
            upper,
            "bidiagonalisation finished"
        );

        let (q1, q2) = if accumulate {
            (
                Some(accumulate_reflectors(m, &left, config)),
                Some(accumulate_reflectors(n, &right, config)),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            rows: m,
            cols: n,
            upper,
            diagonal,
            off_diagonal,
            q1,
            q2,
        })
    }

    /// Shape of the decomposed matrix
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `true` for an upper bidiagonal `B` (`rows >= cols`)
    pub fn is_upper(&self) -> bool {
        self.upper
    }

    /// Main diagonal of `B`, `min(rows, cols)` entries
    pub fn diagonal(&self) -> &[T] {
        &self.diagonal
    }

    /// Super- (upper) or sub-diagonal (lower) of `B`
    pub fn off_diagonal(&self) -> &[T] {
        &self.off_diagonal
    }

    /// Left factor, `rows x rows`; `None` without accumulation
    pub fn q1(&self) -> Option<&Matrix<T>> {
        self.q1.as_ref()
    }

    /// Right factor, `cols x cols`; `None` without accumulation
    pub fn q2(&self) -> Option<&Matrix<T>> {
        self.q2.as_ref()
    }

    /// Dense `B`, `rows x cols`
    pub fn to_matrix(&self) -> Matrix<T> {
        let mut b = Matrix::zeros(self.rows, self.cols);
        let data = b.as_mut_slice();
        for (k, value) in self.diagonal.iter().enumerate() {
            data[k + k * self.rows] = value.clone();
        }
        for (k, value) in self.off_diagonal.iter().enumerate() {
            if self.upper {
                data[k + (k + 1) * self.rows] = value.clone();
            } else {
                data[k + 1 + k * self.rows] = value.clone();
            }
        }
        b
    }

    /// `Q1 B Q2ᴴ`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the factors were not accumulated
    pub fn reconstruct(&self) -> Result<Matrix<T>> {
        let q1 = require_accumulated(self.q1())?;
        let q2 = require_accumulated(self.q2())?;
        q1.multiply(&self.to_matrix())?
            .multiply(&q2.conjugate_transpose())
    }
}

/// `A = Q T Qᴴ` with `T` Hermitian tridiagonal
///
/// Only the lower triangle of the input is read.
#[derive(Debug, Clone)]
pub struct Tridiagonal<T> {
    dim: usize,
    diagonal: Vec<T>,
    sub_diagonal: Vec<T>,
    q: Option<Matrix<T>>,
}

impl<T: Scalar> Tridiagonal<T> {
    /// Tridiagonalises a Hermitian matrix with the global dispatch
    /// thresholds
    ///
    /// # Errors
    ///
    /// Returns `NotSquare` or `EmptyMatrix` for unsuitable input
    pub fn decompose(matrix: &Matrix<T>, accumulate: bool) -> Result<Self> {
        Self::decompose_with(matrix, accumulate, &DispatchConfig::global())
    }

    /// Tridiagonalises a Hermitian matrix with explicit dispatch thresholds
    ///
    /// Every step is one fused two-sided update of the trailing lower
    /// triangle ([`householder_hermitian`]). A column whose tail below the
    /// sub-diagonal is negligible under `config`'s tolerance is zeroed and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `NotSquare` or `EmptyMatrix` for unsuitable input
    #[cfg_attr(feature = "tracing", instrument(skip(matrix, config), fields(n = matrix.rows())))]
    pub fn decompose_with(
        matrix: &Matrix<T>,
        accumulate: bool,
        config: &DispatchConfig,
    ) -> Result<Self> {
        let n = validate_square(matrix)?;
        let tolerance = config.tolerance_for::<T>();
        let mut data = matrix.clone().into_vec();

        let mut reflector = Householder::new(n);
        let mut worker = vec![T::zero(); n];
        let mut reflectors = Vec::new();

        for k in 0..n.saturating_sub(2) {
            if generate_apply_and_copy_column(&mut data, n, k + 1, k, &mut reflector, &tolerance) {
                householder_hermitian(&mut data, n, &reflector, &mut worker, config);
                if accumulate {
                    reflectors.push(reflector.clone());
                }
            } else {
                discard_column_tail(&mut data, n, k + 2, k);
            }
        }

        let diagonal = (0..n).map(|k| data[k + k * n].clone()).collect();
        let sub_diagonal = (0..n - 1).map(|k| data[k + 1 + k * n].clone()).collect();
        let q = accumulate.then(|| accumulate_reflectors(n, &reflectors, config));

        Ok(Self {
            dim: n,
            diagonal,
            sub_diagonal,
            q,
        })
    }

    /// Dimension of the decomposed matrix
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Main diagonal of `T`
    pub fn diagonal(&self) -> &[T] {
        &self.diagonal
    }

    /// Sub-diagonal of `T` (`dim - 1` entries); the super-diagonal is its
    /// conjugate
    pub fn sub_diagonal(&self) -> &[T] {
        &self.sub_diagonal
    }

    /// Unitary factor; `None` without accumulation
    pub fn q(&self) -> Option<&Matrix<T>> {
        self.q.as_ref()
    }

    /// Dense Hermitian `T`
    pub fn to_matrix(&self) -> Matrix<T> {
        let n = self.dim;
        let mut t = Matrix::zeros(n, n);
        let data = t.as_mut_slice();
        for (k, value) in self.diagonal.iter().enumerate() {
            data[k + k * n] = value.clone();
        }
        for (k, value) in self.sub_diagonal.iter().enumerate() {
            data[k + 1 + k * n] = value.clone();
            data[k + (k + 1) * n] = value.conjugate();
        }
        t
    }

    /// `Q T Qᴴ`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `Q` was not accumulated
    pub fn reconstruct(&self) -> Result<Matrix<T>> {
        let q = require_accumulated(self.q())?;
        q.multiply(&self.to_matrix())?
            .multiply(&q.conjugate_transpose())
    }
}

impl<T: Real> Tridiagonal<T> {
    /// Tridiagonalises a real symmetric matrix with [`tred2`]
    ///
    /// # Errors
    ///
    /// Returns `NotSquare` or `EmptyMatrix` for unsuitable input
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::{Matrix, Tridiagonal};
    ///
    /// let a = Matrix::from_rows(&[[4.0, 1.0, 2.0], [1.0, 3.0, 0.0], [2.0, 0.0, 5.0]]).unwrap();
    /// let t = Tridiagonal::tred2(&a, true).unwrap();
    /// assert!(t.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-12);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(skip(matrix), fields(n = matrix.rows())))]
    pub fn tred2(matrix: &Matrix<T>, accumulate: bool) -> Result<Self> {
        let n = validate_square(matrix)?;
        let mut data = matrix.clone().into_vec();
        let mut diagonal = vec![T::zero(); n];
        let mut sub_diagonal = vec![T::zero(); n];
        tred2(&mut data, n, &mut diagonal, &mut sub_diagonal, accumulate);
        sub_diagonal.truncate(n - 1);

        let q = if accumulate {
            Some(Matrix::from_vec(n, n, data)?)
        } else {
            None
        };
        Ok(Self {
            dim: n,
            diagonal,
            sub_diagonal,
            q,
        })
    }
}

fn validate_square<T: Scalar>(matrix: &Matrix<T>) -> Result<usize> {
    require_non_empty(matrix)?;
    if !matrix.is_square() {
        return Err(RayoError::NotSquare {
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }
    Ok(matrix.rows())
}

/// `A = Q R` from column reflectors only
#[derive(Debug, Clone)]
pub struct HouseholderQr<T> {
    r: Matrix<T>,
    q: Option<Matrix<T>>,
}

impl<T: Scalar> HouseholderQr<T> {
    /// QR-decomposes `matrix` with the global dispatch thresholds
    ///
    /// # Errors
    ///
    /// Returns `EmptyMatrix` for a matrix with no rows or no columns
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::{HouseholderQr, Matrix};
    ///
    /// let a = Matrix::from_rows(&[[3.0_f64, 1.0], [4.0, 2.0]]).unwrap();
    /// let qr = HouseholderQr::decompose(&a, true).unwrap();
    /// assert!((qr.r().get(0, 0).unwrap().abs() - 5.0).abs() < 1e-12);
    /// assert_eq!(qr.r().get(1, 0), Some(&0.0));
    /// ```
    pub fn decompose(matrix: &Matrix<T>, accumulate: bool) -> Result<Self> {
        Self::decompose_with(matrix, accumulate, &DispatchConfig::global())
    }

    /// QR-decomposes `matrix` with explicit dispatch thresholds
    ///
    /// # Arguments
    ///
    /// * `matrix` - Input, `rows x cols`, any shape
    /// * `accumulate` - Keep the reflectors and build `Q`
    /// * `config` - Parallel thresholds and optional tolerance override
    ///
    /// # Errors
    ///
    /// Returns `EmptyMatrix` for a matrix with no rows or no columns
    #[cfg_attr(feature = "tracing", instrument(skip(matrix, config), fields(dims = %format!("{}x{}", matrix.rows(), matrix.cols()))))]
    pub fn decompose_with(
        matrix: &Matrix<T>,
        accumulate: bool,
        config: &DispatchConfig,
    ) -> Result<Self> {
        require_non_empty(matrix)?;
        let (m, n) = matrix.shape();
        let tolerance = config.tolerance_for::<T>();
        let mut r = matrix.clone();

        let mut reflector = Householder::new(m);
        let mut reflectors = Vec::new();
        for k in 0..m.min(n) {
            let data = r.as_mut_slice();
            if generate_apply_and_copy_column(data, m, k, k, &mut reflector, &tolerance) {
                householder_left(data, m, k + 1, n, &reflector, config);
                if accumulate {
                    reflectors.push(reflector.clone());
                }
            } else {
                discard_column_tail(data, m, k + 1, k);
            }
        }

        let q = accumulate.then(|| accumulate_reflectors(m, &reflectors, config));
        Ok(Self { r, q })
    }

    /// Upper-trapezoidal factor, `rows x cols`
    pub fn r(&self) -> &Matrix<T> {
        &self.r
    }

    /// Unitary factor, `rows x rows`; `None` without accumulation
    pub fn q(&self) -> Option<&Matrix<T>> {
        self.q.as_ref()
    }

    /// `Q R`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `Q` was not accumulated
    pub fn reconstruct(&self) -> Result<Matrix<T>> {
        require_accumulated(self.q())?.multiply(&self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Primitive;
    use bigdecimal::BigDecimal;
    use num_bigint::BigInt;
    use num_complex::Complex64;
    use num_rational::BigRational;

    fn sample(rows: usize, cols: usize, salt: f64) -> Matrix<f64> {
        let data = (0..rows * cols)
            .map(|i| ((i as f64 + 1.0) * salt).sin() * 3.0)
            .collect();
        Matrix::from_vec(rows, cols, data).unwrap()
    }

    /// [[4, 1, 2], [2, 3, 1], [1, 5, 7]] in any domain
    fn reference<T: Scalar>() -> Matrix<T> {
        let value = |x: f64| T::from_f64(x);
        Matrix::from_rows(&[
            [value(4.0), value(1.0), value(2.0)],
            [value(2.0), value(3.0), value(1.0)],
            [value(1.0), value(5.0), value(7.0)],
        ])
        .unwrap()
    }

    fn assert_unitary<T: Scalar>(q: &Matrix<T>) {
        let product = q.conjugate_transpose().multiply(q).unwrap();
        let identity = Matrix::identity(q.rows());
        assert!(product.max_abs_difference(&identity).unwrap() < 1e-12);
    }

    #[test]
    fn test_bidiagonal_square_tall_fat() {
        for (rows, cols) in [(4, 4), (6, 3), (3, 6), (1, 5), (5, 1)] {
            let a = sample(rows, cols, 0.7);
            let b = Bidiagonal::decompose(&a, true).unwrap();
            assert_eq!(b.is_upper(), rows >= cols);
            assert_unitary(b.q1().unwrap());
            assert_unitary(b.q2().unwrap());
            let rebuilt = b.reconstruct().unwrap();
            assert!(rebuilt.max_abs_difference(&a).unwrap() < 1e-12, "{rows}x{cols}");
        }
    }

    #[test]
    fn test_bidiagonal_identity() {
        let a = Matrix::<f64>::identity(4);
        let b = Bidiagonal::decompose(&a, true).unwrap();
        assert_eq!(b.diagonal(), &[1.0; 4]);
        assert_eq!(b.off_diagonal(), &[0.0; 3]);
        assert_eq!(b.q1(), Some(&Matrix::identity(4)));
        assert_eq!(b.q2(), Some(&Matrix::identity(4)));
    }

    #[test]
    fn test_bidiagonal_without_accumulation() {
        let a = sample(5, 3, 1.1);
        let b = Bidiagonal::decompose(&a, false).unwrap();
        assert!(b.q1().is_none());
        assert!(matches!(b.reconstruct(), Err(RayoError::InvalidInput(_))));

        // singular values are invariant: compare Frobenius norms
        let frobenius: f64 = a.as_slice().iter().map(|x| x * x).sum();
        let reduced: f64 = b
            .diagonal()
            .iter()
            .chain(b.off_diagonal())
            .map(|x| x * x)
            .sum();
        assert!((frobenius - reduced).abs() < 1e-10);
    }

    #[test]
    fn test_bidiagonal_complex() {
        let data: Vec<Complex64> = (0..12)
            .map(|i| Complex64::new((i as f64 * 0.3).cos(), (i as f64 * 0.7).sin()))
            .collect();
        let a = Matrix::from_vec(4, 3, data).unwrap();
        let b = Bidiagonal::decompose(&a, true).unwrap();
        assert_unitary(b.q1().unwrap());
        assert!(b.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-12);
    }

    #[test]
    fn test_parallel_reduction_matches_serial() {
        let a = sample(12, 9, 0.45);
        let serial = Bidiagonal::decompose_with(&a, true, &DispatchConfig::serial()).unwrap();
        let parallel = Bidiagonal::decompose_with(
            &a,
            true,
            &DispatchConfig::new().with_all_thresholds(2),
        )
        .unwrap();
        assert_eq!(serial.diagonal(), parallel.diagonal());
        assert_eq!(serial.off_diagonal(), parallel.off_diagonal());
    }

    #[test]
    fn test_degenerate_column_is_skipped() {
        // first column already reduced: the step contributes the identity
        let a = Matrix::from_rows(&[[2.0, 1.0], [0.0, 3.0], [0.0, 4.0]]).unwrap();
        let b = Bidiagonal::decompose(&a, true).unwrap();
        assert_eq!(b.diagonal()[0], 2.0);
        assert!(b.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-12);
    }

    #[test]
    fn test_tridiagonal_hermitian() {
        let n = 6;
        let mut a = Matrix::<Complex64>::zeros(n, n);
        for j in 0..n {
            for i in j..n {
                let value = if i == j {
                    Complex64::new(i as f64 + 1.0, 0.0)
                } else {
                    Complex64::new((i * j) as f64 * 0.1, (i + j) as f64 * 0.05)
                };
                a.set(i, j, value).unwrap();
                a.set(j, i, value.conj()).unwrap();
            }
        }
        let t = Tridiagonal::decompose(&a, true).unwrap();
        assert_eq!(t.sub_diagonal().len(), n - 1);
        assert_unitary(t.q().unwrap());
        assert!(t.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-12);
    }

    #[test]
    fn test_tridiagonal_parallel_thresholds() {
        let a = sample(10, 10, 0.2);
        let symmetric = a.multiply(&a.transpose()).unwrap();
        let config = DispatchConfig::new()
            .with_threshold(Primitive::HouseholderHermitian, 1)
            .with_threshold(Primitive::SymmetricMatrixVector, 2)
            .with_threshold(Primitive::Rank2Update, 2);
        let t = Tridiagonal::decompose_with(&symmetric, true, &config).unwrap();
        let rebuilt = t.reconstruct().unwrap();
        assert!(rebuilt.max_abs_difference(&symmetric).unwrap() < 1e-10);
    }

    #[test]
    fn test_tred2_matches_hermitian_spectrum_invariants() {
        let a = sample(5, 5, 0.9);
        let symmetric = a.multiply(&a.transpose()).unwrap();
        let householder = Tridiagonal::decompose(&symmetric, false).unwrap();
        let classic = Tridiagonal::tred2(&symmetric, true).unwrap();

        let trace = |t: &Tridiagonal<f64>| t.diagonal().iter().sum::<f64>();
        assert!((trace(&householder) - trace(&classic)).abs() < 1e-10);
        assert!(classic.reconstruct().unwrap().max_abs_difference(&symmetric).unwrap() < 1e-10);
    }

    #[test]
    fn test_tridiagonal_rejects_rectangular() {
        let a = Matrix::<f64>::zeros(2, 3);
        assert_eq!(
            Tridiagonal::decompose(&a, false).unwrap_err(),
            RayoError::NotSquare { rows: 2, cols: 3 }
        );
        assert_eq!(
            Tridiagonal::tred2(&Matrix::<f64>::zeros(0, 0), false).unwrap_err(),
            RayoError::EmptyMatrix
        );
    }

    #[test]
    fn test_qr_tall_and_fat() {
        for (rows, cols) in [(5, 3), (3, 5), (4, 4)] {
            let a = sample(rows, cols, 0.33);
            let qr = HouseholderQr::decompose(&a, true).unwrap();
            let r = qr.r();
            for j in 0..cols {
                for i in j + 1..rows {
                    assert_eq!(r.get(i, j), Some(&0.0));
                }
            }
            assert_unitary(qr.q().unwrap());
            assert!(qr.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-12);
        }
    }

    #[test]
    fn test_negligible_tail_is_discarded_bidiagonal() {
        let a = Matrix::from_rows(&[[1.0, 0.0], [1e-9, 1.0]]).unwrap();
        let config = DispatchConfig::new().with_tolerance(1e-6);
        let b = Bidiagonal::decompose_with(&a, true, &config).unwrap();
        assert_eq!(b.to_matrix(), Matrix::identity(2));
        assert_eq!(b.q1(), Some(&Matrix::identity(2)));
        let error = b.reconstruct().unwrap().max_abs_difference(&a).unwrap();
        assert!((error - 1e-9).abs() < 1e-15);

        // fat input takes the lower path; the row tail goes the same way
        let fat = Matrix::from_rows(&[[1.0, 1e-9, 0.0], [0.0, 1.0, 0.0]]).unwrap();
        let b = Bidiagonal::decompose_with(&fat, true, &config).unwrap();
        assert!(!b.is_upper());
        assert_eq!(b.diagonal(), &[1.0, 1.0]);
        assert_eq!(b.off_diagonal(), &[0.0]);
        assert_eq!(b.q2(), Some(&Matrix::identity(3)));
    }

    #[test]
    fn test_negligible_tail_is_discarded_tridiagonal() {
        let a = Matrix::from_rows(&[[2.0, 1.0, 1e-9], [1.0, 2.0, 0.0], [1e-9, 0.0, 2.0]]).unwrap();
        let config = DispatchConfig::new().with_tolerance(1e-6);
        let t = Tridiagonal::decompose_with(&a, true, &config).unwrap();
        let expected = Matrix::from_rows(&[[2.0, 1.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 2.0]]).unwrap();
        assert_eq!(t.to_matrix(), expected);
        assert_eq!(t.q(), Some(&Matrix::identity(3)));
        let error = t.reconstruct().unwrap().max_abs_difference(&a).unwrap();
        assert!((error - 1e-9).abs() < 1e-15);
    }

    #[test]
    fn test_rational_reductions_do_not_overflow() {
        let a = reference::<BigRational>();

        let qr = HouseholderQr::decompose(&a, true).unwrap();
        let q = qr.q().unwrap();
        // every reflector is exactly unitary, so their product is too
        assert_eq!(q.conjugate_transpose().multiply(q).unwrap(), Matrix::identity(3));
        let zero = BigRational::from_integer(BigInt::from(0));
        for j in 0..3 {
            for i in j + 1..3 {
                assert_eq!(qr.r().get(i, j), Some(&zero));
            }
        }
        assert!(qr.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-20);

        let b = Bidiagonal::decompose(&a, true).unwrap();
        assert!(b.is_upper());
        let q1 = b.q1().unwrap();
        assert_eq!(q1.conjugate_transpose().multiply(q1).unwrap(), Matrix::identity(3));
        assert!(b.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-20);
    }

    #[test]
    fn test_rational_tridiagonal() {
        let a = reference::<BigRational>();
        let symmetric = a.multiply(&a.transpose()).unwrap();
        let t = Tridiagonal::decompose(&symmetric, true).unwrap();
        let q = t.q().unwrap();
        assert_eq!(q.conjugate_transpose().multiply(q).unwrap(), Matrix::identity(3));
        assert!(t.reconstruct().unwrap().max_abs_difference(&symmetric).unwrap() < 1e-20);
    }

    #[test]
    fn test_decimal_reductions() {
        let a = reference::<BigDecimal>();

        let qr = HouseholderQr::decompose(&a, true).unwrap();
        let q = qr.q().unwrap();
        let identity = Matrix::identity(3);
        assert!(q.conjugate_transpose().multiply(q).unwrap().max_abs_difference(&identity).unwrap() < 1e-80);
        assert!(qr.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-80);

        let b = Bidiagonal::decompose(&a, true).unwrap();
        assert!(b.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-80);
    }

    #[test]
    fn test_empty_input_rejected() {
        let a = Matrix::<f64>::zeros(0, 3);
        assert_eq!(
            Bidiagonal::decompose(&a, true).unwrap_err(),
            RayoError::EmptyMatrix
        );
        assert_eq!(
            HouseholderQr::decompose(&a, true).unwrap_err(),
            RayoError::EmptyMatrix
        );
    }
}
