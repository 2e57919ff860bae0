//! Owned column-major matrices
//!
//! [`Matrix`] is the validating layer over the kernels: constructors and
//! binary operations check shapes and return [`RayoError`] instead of
//! relying on the caller's index contract.
//!
//! # Example
//!
//! ```
//! use rayo::Matrix;
//!
//! // Create a 2x3 matrix
//! let m = Matrix::<f64>::zeros(2, 3);
//! assert_eq!(m.rows(), 2);
//! assert_eq!(m.cols(), 3);
//! ```

use crate::access::Access2D;
use crate::config::DispatchConfig;
use crate::error::{RayoError, Result};
use crate::kernels;
use crate::scalar::Scalar;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A 2D matrix with column-major storage
///
/// Consecutive elements in memory belong to the same column, which is the
/// layout every kernel in [`kernels`](crate::kernels) operates on.
///
/// # Storage Layout
///
/// For a 2x3 matrix:
/// ```text
/// [[a, b, c],
///  [d, e, f]]
/// ```
/// Data is stored as: [a, d, b, e, c, f]
///
/// # Example
///
/// ```
/// use rayo::Matrix;
///
/// let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(m.get(0, 0), Some(&1.0));
/// assert_eq!(m.get(1, 0), Some(&2.0));
/// assert_eq!(m.get(0, 1), Some(&3.0));
/// assert_eq!(m.get(1, 1), Some(&4.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Scalar> Matrix<T> {
    /// Creates a `rows x cols` matrix of zeros
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::Matrix;
    ///
    /// let m = Matrix::<f64>::new(3, 4);
    /// assert_eq!(m.shape(), (3, 4));
    /// ```
    pub fn new(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// Creates a matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix::new(rows, cols)
    }

    /// Creates an identity matrix (square matrix with 1s on diagonal)
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::Matrix;
    ///
    /// let m = Matrix::<f64>::identity(3);
    /// assert_eq!(m.get(0, 0), Some(&1.0));
    /// assert_eq!(m.get(0, 1), Some(&0.0));
    /// assert_eq!(m.get(1, 1), Some(&1.0));
    /// ```
    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::new(n, n);
        for i in 0..n {
            m.data[i + i * n] = T::one();
        }
        m
    }

    /// Creates a matrix from column-major data
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows
    /// * `cols` - Number of columns
    /// * `data` - Matrix elements, column by column
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` if `data.len() != rows * cols`
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(RayoError::SizeMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Creates a matrix from a slice of rows
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the rows have different lengths
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::Matrix;
    ///
    /// let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m.get(1, 0), Some(&4.0));
    /// assert_eq!(m.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut m = Matrix::new(row_count, cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(RayoError::InvalidInput(format!(
                    "Row {} has {} elements, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            for (j, value) in row.iter().enumerate() {
                m.data[i + j * row_count] = value.clone();
            }
        }
        Ok(m)
    }

    /// Returns the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `true` when `rows == cols`
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Gets a reference to an element at (row, col)
    ///
    /// Returns `None` if indices are out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            None
        } else {
            self.data.get(row + col * self.rows)
        }
    }

    /// Gets a mutable reference to an element at (row, col)
    ///
    /// Returns `None` if indices are out of bounds
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row >= self.rows || col >= self.cols {
            None
        } else {
            self.data.get_mut(row + col * self.rows)
        }
    }

    /// Sets the element at (row, col)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if indices are out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.get_mut(row, col) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RayoError::InvalidInput(format!(
                "Index ({row}, {col}) out of bounds for {rows}x{cols} matrix"
            ))),
        }
    }

    /// Returns a reference to the underlying column-major data
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable reference to the underlying column-major data
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the matrix, returning its column-major data
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Matrix multiplication using the global dispatch thresholds
    ///
    /// Computes `C = A × B` where A is `m×n`, B is `n×p`, and C is `m×p`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the inner dimensions differ
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::Matrix;
    ///
    /// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// let b = Matrix::from_rows(&[[5.0, 6.0], [7.0, 8.0]]).unwrap();
    /// let c = a.multiply(&b).unwrap();
    ///
    /// // [[1, 2],   [[5, 6],   [[19, 22],
    /// //  [3, 4]] ×  [7, 8]] =  [43, 50]]
    /// assert_eq!(c.get(0, 0), Some(&19.0));
    /// assert_eq!(c.get(0, 1), Some(&22.0));
    /// assert_eq!(c.get(1, 0), Some(&43.0));
    /// assert_eq!(c.get(1, 1), Some(&50.0));
    /// ```
    pub fn multiply(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        self.multiply_with(other, &DispatchConfig::global())
    }

    /// Matrix multiplication with explicit dispatch thresholds
    ///
    /// # Arguments
    ///
    /// * `other` - The matrix to multiply with (right operand)
    /// * `config` - Per-primitive thresholds deciding the serial/parallel split
    ///
    /// # Returns
    ///
    /// A new `self.rows() x other.cols()` matrix holding the product
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the inner dimensions differ
    #[cfg_attr(feature = "tracing", instrument(skip(self, other, config), fields(dims = %format!("{}x{} @ {}x{}", self.rows, self.cols, other.rows, other.cols))))]
    pub fn multiply_with(&self, other: &Matrix<T>, config: &DispatchConfig) -> Result<Matrix<T>> {
        if self.cols != other.rows {
            return Err(RayoError::DimensionMismatch {
                operation: "multiply",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut product = Matrix::new(self.rows, other.cols);
        kernels::multiply(
            &mut product.data,
            self.rows,
            &self.data,
            self.cols,
            &other.data,
            config,
        );
        Ok(product)
    }

    /// Transposes the matrix (swap rows and columns)
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::Matrix;
    ///
    /// let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// let t = m.transpose();
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t.get(2, 1), Some(&6.0));
    /// ```
    pub fn transpose(&self) -> Matrix<T> {
        let mut t = Matrix::new(self.cols, self.rows);
        kernels::transpose(
            &mut t.data,
            &self.data,
            self.rows,
            self.cols,
            &DispatchConfig::global(),
        );
        t
    }

    /// Transposes and conjugates every element
    pub fn conjugate_transpose(&self) -> Matrix<T> {
        let mut t = Matrix::new(self.cols, self.rows);
        kernels::conjugate_transpose(
            &mut t.data,
            &self.data,
            self.rows,
            self.cols,
            &DispatchConfig::global(),
        );
        t
    }

    /// Largest element-wise `|self - other|`
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the shapes differ
    pub fn max_abs_difference(&self, other: &Matrix<T>) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(RayoError::DimensionMismatch {
                operation: "max_abs_difference",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a.clone() - b.clone()).norm())
            .fold(0.0, f64::max))
    }
}

impl<T: Clone> Access2D<T> for Matrix<T> {
    #[inline]
    fn count_rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn count_columns(&self) -> usize {
        self.cols
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        self.data[row + col * self.rows].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Primitive;
    use num_complex::Complex64;
    use proptest::prelude::*;

    #[test]
    fn test_new_matrix() {
        let m = Matrix::<f64>::new(3, 4);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 4);
        assert_eq!(m.as_slice().len(), 12);
    }

    #[test]
    fn test_from_vec_invalid_size() {
        let result = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            result,
            Err(RayoError::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            Matrix::from_rows(&rows),
            Err(RayoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_rows_empty() {
        let rows: [[f64; 0]; 0] = [];
        let m = Matrix::from_rows(&rows).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let m = Matrix::<f64>::zeros(2, 2);
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn test_set_and_get_mut() {
        let mut m = Matrix::<f64>::zeros(2, 3);
        m.set(1, 2, 7.0).unwrap();
        assert_eq!(m.as_slice()[5], 7.0);
        *m.get_mut(0, 1).unwrap() = -1.0;
        assert_eq!(m.get(0, 1), Some(&-1.0));
        assert!(m.set(2, 0, 1.0).is_err());
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(2, 3);
        assert_eq!(
            a.multiply(&b),
            Err(RayoError::DimensionMismatch {
                operation: "multiply",
                left: (2, 3),
                right: (2, 3)
            })
        );
    }

    #[test]
    fn test_multiply_identity() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let i = Matrix::identity(3);
        assert_eq!(a.multiply(&i).unwrap(), a);
    }

    #[test]
    fn test_conjugate_transpose() {
        let m = Matrix::from_rows(&[[Complex64::new(1.0, 2.0), Complex64::new(0.0, -1.0)]]).unwrap();
        let h = m.conjugate_transpose();
        assert_eq!(h.shape(), (2, 1));
        assert_eq!(h.get(0, 0), Some(&Complex64::new(1.0, -2.0)));
        assert_eq!(h.get(1, 0), Some(&Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn test_max_abs_difference() {
        let a = Matrix::from_rows(&[[1.0, 2.0]]).unwrap();
        let b = Matrix::from_rows(&[[1.5, 1.0]]).unwrap();
        assert_eq!(a.max_abs_difference(&b), Ok(1.0));
        assert!(a.max_abs_difference(&Matrix::zeros(2, 1)).is_err());
    }

    #[test]
    fn test_access2d() {
        let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(m.count_rows(), 3);
        assert_eq!(m.count_columns(), 2);
        assert_eq!(m.at(2, 1), 6.0);
        assert_eq!(m.clone().into_vec(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// (A B)ᵀ == Bᵀ Aᵀ
        #[test]
        fn test_transpose_of_product(
            m in 1usize..8,
            k in 1usize..8,
            n in 1usize..8,
            seed in proptest::collection::vec(-4.0f64..4.0, 128)
        ) {
            let a = Matrix::from_vec(m, k, seed[..m * k].to_vec()).unwrap();
            let b = Matrix::from_vec(k, n, seed[64..64 + k * n].to_vec()).unwrap();
            let config = DispatchConfig::new().with_threshold(Primitive::Multiply, 2);
            let left = a.multiply_with(&b, &config).unwrap().transpose();
            let right = b.transpose().multiply_with(&a.transpose(), &config).unwrap();
            prop_assert!(left.max_abs_difference(&right).unwrap() < 1e-10);
        }
    }
}
