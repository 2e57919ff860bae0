//! Symmetric/Hermitian matrix-vector product from the lower triangle
//!
//! The strictly upper triangle is never read; `A[r, c]` for `r < c` is
//! reconstructed as `conj(A[c, r])`. Entries of `x` before
//! `first_non_zero` are treated as zero.

use crate::config::{DispatchConfig, Primitive};
use crate::dispatch::divide;
use crate::kernels::dot::dot_conjugated;
use crate::scalar::Scalar;

/// `result[i] = (A x)[i]` for `i in first_row..row_limit`, serial
///
/// # Example
///
/// ```
/// use rayo::kernels::symmetric_matrix_vector;
///
/// // lower triangle of [[2, 1], [1, 3]]; the upper entry is garbage
/// let a = [2.0, 1.0, 99.0, 3.0];
/// let mut y = [0.0; 2];
/// symmetric_matrix_vector(&mut y, 0, 2, &a, 2, &[1.0, 1.0], 0);
/// assert_eq!(y, [3.0, 4.0]);
/// ```
pub fn symmetric_matrix_vector<T: Scalar>(
    result: &mut [T],
    first_row: usize,
    row_limit: usize,
    data: &[T],
    dim: usize,
    x: &[T],
    first_non_zero: usize,
) {
    if first_row >= row_limit {
        return;
    }
    product_rows(
        &mut result[first_row..row_limit],
        first_row,
        row_limit,
        data,
        dim,
        x,
        first_non_zero,
    );
}

/// Same product with result rows split across workers above the
/// [`Primitive::SymmetricMatrixVector`] threshold
#[allow(clippy::too_many_arguments)]
pub fn symmetric_matrix_vector_parallel<T: Scalar>(
    result: &mut [T],
    first_row: usize,
    row_limit: usize,
    data: &[T],
    dim: usize,
    x: &[T],
    first_non_zero: usize,
    config: &DispatchConfig,
) {
    if first_row >= row_limit {
        return;
    }
    if !config.is_parallel(Primitive::SymmetricMatrixVector, row_limit - first_row) {
        symmetric_matrix_vector(result, first_row, row_limit, data, dim, x, first_non_zero);
        return;
    }
    divide(
        &mut result[first_row..row_limit],
        1,
        first_row,
        row_limit,
        config.threshold(Primitive::SymmetricMatrixVector),
        &|rows: &mut [T], first: usize, limit: usize| {
            product_rows(rows, first, limit, data, dim, x, first_non_zero)
        },
    );
}

fn product_rows<T: Scalar>(
    rows: &mut [T],
    first: usize,
    limit: usize,
    data: &[T],
    dim: usize,
    x: &[T],
    first_non_zero: usize,
) {
    for i in first..limit {
        let mut sum = T::zero();
        for c in first_non_zero..i {
            sum += data[i + c * dim].clone() * x[c].clone();
        }
        // column i below (and on) the diagonal, conjugated
        let start = i.max(first_non_zero);
        sum += dot_conjugated(data, i * dim, x, 0, start, dim);
        rows[i - first] = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use proptest::prelude::*;

    fn full_product(a: &[f64], n: usize, x: &[f64]) -> Vec<f64> {
        (0..n)
            .map(|i| (0..n).map(|c| a[i + c * n] * x[c]).sum())
            .collect()
    }

    fn symmetric(seed: &[f64], n: usize) -> Vec<f64> {
        let mut a = vec![0.0; n * n];
        for j in 0..n {
            for i in j..n {
                a[i + j * n] = seed[i + j * n];
                a[j + i * n] = seed[i + j * n];
            }
        }
        a
    }

    #[test]
    fn test_hermitian_reconstruction() {
        // A = [[2, 1-i], [1+i, 3]], lower stored
        let a = [
            Complex64::new(2.0, 0.0),
            Complex64::new(1.0, 1.0),
            Complex64::new(f64::NAN, f64::NAN),
            Complex64::new(3.0, 0.0),
        ];
        let x = [Complex64::new(0.0, 1.0), Complex64::new(1.0, 0.0)];
        let mut y = [Complex64::new(0.0, 0.0); 2];
        symmetric_matrix_vector(&mut y, 0, 2, &a, 2, &x, 0);
        // row 0: 2i + (1-i) = 1+i ; row 1: (1+i)i + 3 = 2+i
        assert_eq!(y[0], Complex64::new(1.0, 1.0));
        assert_eq!(y[1], Complex64::new(2.0, 1.0));
    }

    #[test]
    fn test_first_non_zero_skips_leading_entries() {
        let a = symmetric(&[1.0; 9], 3);
        let x = [100.0, 1.0, 1.0];
        let mut y = [0.0; 3];
        symmetric_matrix_vector(&mut y, 1, 3, &a, 3, &x, 1);
        assert_eq!(y, [0.0, 2.0, 2.0]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(60))]

        /// Lower-triangle product equals the full symmetric product, n = 1..=10
        #[test]
        fn test_matches_full_product(
            n in 1usize..=10,
            seed in proptest::collection::vec(-3.0f64..3.0, 110)
        ) {
            let a = symmetric(&seed, n);
            let x = &seed[100..100 + n];
            let expected = full_product(&a, n, x);

            let mut y = vec![0.0; n];
            symmetric_matrix_vector(&mut y, 0, n, &a, n, x, 0);
            for (got, want) in y.iter().zip(&expected) {
                prop_assert!((got - want).abs() < 1e-12);
            }

            let mut y_parallel = vec![0.0; n];
            let config = DispatchConfig::new().with_threshold(Primitive::SymmetricMatrixVector, 1);
            symmetric_matrix_vector_parallel(&mut y_parallel, 0, n, &a, n, x, 0, &config);
            prop_assert_eq!(y, y_parallel);
        }
    }
}
