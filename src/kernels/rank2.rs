//! Hermitian rank-2 update of a lower triangle
//!
//! `A[i, j] -= v2[i] * conj(v1[j]) + v1[i] * conj(v2[j])` for `i >= j`.
//! Only the lower triangle (diagonal included) of the square `dim x dim`
//! buffer is read or written.

use crate::config::{DispatchConfig, Primitive};
use crate::dispatch::divide;
use crate::scalar::Scalar;

/// Serial rank-2 update over columns `first_col..col_limit`
///
/// # Example
///
/// ```
/// use rayo::kernels::rank2_update;
///
/// let mut a = vec![0.0; 4];
/// rank2_update(&mut a, 2, 0, 2, &[1.0, 2.0], &[1.0, 0.0]);
/// // -(v2 v1ᵀ + v1 v2ᵀ), lower triangle
/// assert_eq!(a, vec![-2.0, -2.0, 0.0, 0.0]);
/// ```
pub fn rank2_update<T: Scalar>(
    data: &mut [T],
    dim: usize,
    first_col: usize,
    col_limit: usize,
    v1: &[T],
    v2: &[T],
) {
    if first_col >= col_limit {
        return;
    }
    let chunk = &mut data[first_col * dim..col_limit * dim];
    update_columns(chunk, dim, first_col, col_limit, v1, v2);
}

/// Rank-2 update splitting columns across workers above the
/// [`Primitive::Rank2Update`] threshold
pub fn rank2_update_parallel<T: Scalar>(
    data: &mut [T],
    dim: usize,
    first_col: usize,
    col_limit: usize,
    v1: &[T],
    v2: &[T],
    config: &DispatchConfig,
) {
    if first_col >= col_limit {
        return;
    }
    if !config.is_parallel(Primitive::Rank2Update, col_limit - first_col) {
        rank2_update(data, dim, first_col, col_limit, v1, v2);
        return;
    }
    let chunk = &mut data[first_col * dim..col_limit * dim];
    divide(
        chunk,
        dim,
        first_col,
        col_limit,
        config.threshold(Primitive::Rank2Update),
        &|columns: &mut [T], first: usize, limit: usize| {
            update_columns(columns, dim, first, limit, v1, v2)
        },
    );
}

fn update_columns<T: Scalar>(
    columns: &mut [T],
    dim: usize,
    first: usize,
    limit: usize,
    v1: &[T],
    v2: &[T],
) {
    for j in first..limit {
        let conj_v1 = v1[j].conjugate();
        let conj_v2 = v2[j].conjugate();
        let column = &mut columns[(j - first) * dim..(j - first + 1) * dim];
        for i in j..dim {
            column[i] -= v2[i].clone() * conj_v1.clone() + v1[i].clone() * conj_v2.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use proptest::prelude::*;

    #[test]
    fn test_upper_triangle_untouched() {
        let mut a = vec![1.0; 9];
        rank2_update(&mut a, 3, 0, 3, &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]);
        // strictly upper entries: (0,1), (0,2), (1,2)
        assert_eq!(a[3], 1.0);
        assert_eq!(a[6], 1.0);
        assert_eq!(a[7], 1.0);
        assert_eq!(a[0], -1.0);
    }

    #[test]
    fn test_column_range_respected() {
        let mut a = vec![0.0; 9];
        rank2_update(&mut a, 3, 1, 2, &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]);
        assert_eq!(a, vec![0.0, 0.0, 0.0, 0.0, -2.0, -2.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_complex_diagonal_stays_real() {
        let v1 = [Complex64::new(1.0, 2.0), Complex64::new(0.5, -1.0)];
        let v2 = [Complex64::new(-1.0, 0.5), Complex64::new(2.0, 1.0)];
        let mut a = vec![Complex64::new(0.0, 0.0); 4];
        rank2_update(&mut a, 2, 0, 2, &v1, &v2);
        assert!(a[0].im.abs() < 1e-15);
        assert!(a[3].im.abs() < 1e-15);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        #[test]
        fn test_parallel_matches_serial(
            dim in 1usize..24,
            seed in proptest::collection::vec(-1.0f64..1.0, 24 * 24 + 48)
        ) {
            let a: Vec<f64> = seed[..dim * dim].to_vec();
            let v1 = &seed[576..576 + dim];
            let v2 = &seed[600..600 + dim];

            let mut serial = a.clone();
            rank2_update(&mut serial, dim, 0, dim, v1, v2);

            let mut parallel = a;
            let config = DispatchConfig::new().with_threshold(Primitive::Rank2Update, 2);
            rank2_update_parallel(&mut parallel, dim, 0, dim, v1, v2, &config);

            prop_assert_eq!(serial, parallel);
        }
    }
}
