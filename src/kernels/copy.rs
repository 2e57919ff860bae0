//! Element relocation: row/column extraction, fill and transposition
//!
//! Transposition turns a column-major `rows x cols` buffer into a
//! column-major `cols x rows` one, which is the same bytes as reading the
//! source row-major.

use crate::config::{DispatchConfig, Primitive};
use crate::dispatch::divide;
use crate::scalar::Scalar;

/// `destination[i] = data[i, col]` for `i in first..limit`
#[inline]
pub fn copy_column<T: Scalar>(
    data: &[T],
    row_dim: usize,
    col: usize,
    destination: &mut [T],
    first: usize,
    limit: usize,
) {
    if first >= limit {
        return;
    }
    let base = col * row_dim;
    destination[first..limit].clone_from_slice(&data[base + first..base + limit]);
}

/// `destination[j] = data[row, j]` for `j in first..limit`
#[inline]
pub fn copy_row<T: Scalar>(
    data: &[T],
    row_dim: usize,
    row: usize,
    destination: &mut [T],
    first: usize,
    limit: usize,
) {
    for j in first..limit {
        destination[j] = data[row + j * row_dim].clone();
    }
}

/// Sets every element of the buffer to `value`
///
/// # Example
///
/// ```
/// use rayo::kernels::fill;
/// use rayo::DispatchConfig;
///
/// let mut data = vec![0.0; 6];
/// fill(&mut data, 2, 1.5, &DispatchConfig::new());
/// assert!(data.iter().all(|&x| x == 1.5));
/// ```
pub fn fill<T: Scalar>(data: &mut [T], row_dim: usize, value: T, config: &DispatchConfig) {
    if row_dim == 0 {
        return;
    }
    let cols = data.len() / row_dim;
    fill_columns(data, row_dim, 0, cols, value, config);
}

/// Sets columns `first_col..col_limit` to `value`, splitting the column
/// range across workers above the [`Primitive::Fill`] threshold
pub fn fill_columns<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    first_col: usize,
    col_limit: usize,
    value: T,
    config: &DispatchConfig,
) {
    if first_col >= col_limit {
        return;
    }
    let chunk = &mut data[first_col * row_dim..col_limit * row_dim];
    let leaf = |columns: &mut [T], _: usize, _: usize| columns.fill(value.clone());
    if config.is_parallel(Primitive::Fill, col_limit - first_col) {
        divide(
            chunk,
            row_dim,
            first_col,
            col_limit,
            config.threshold(Primitive::Fill),
            &leaf,
        );
    } else {
        leaf(chunk, first_col, col_limit);
    }
}

/// Writes the transpose of the `rows x cols` buffer `source` into
/// `destination` (`cols x rows`)
///
/// # Example
///
/// ```
/// use rayo::kernels::transpose;
/// use rayo::DispatchConfig;
///
/// // [[1, 2, 3], [4, 5, 6]] column-major
/// let source = [1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
/// let mut destination = [0.0; 6];
/// transpose(&mut destination, &source, 2, 3, &DispatchConfig::new());
/// assert_eq!(destination, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// ```
pub fn transpose<T: Scalar>(
    destination: &mut [T],
    source: &[T],
    rows: usize,
    cols: usize,
    config: &DispatchConfig,
) {
    relocate(destination, source, rows, cols, false, config);
}

/// Like [`transpose`] but conjugates every element
pub fn conjugate_transpose<T: Scalar>(
    destination: &mut [T],
    source: &[T],
    rows: usize,
    cols: usize,
    config: &DispatchConfig,
) {
    relocate(destination, source, rows, cols, T::IS_COMPLEX, config);
}

fn relocate<T: Scalar>(
    destination: &mut [T],
    source: &[T],
    rows: usize,
    cols: usize,
    conjugate: bool,
    config: &DispatchConfig,
) {
    if rows == 0 || cols == 0 {
        return;
    }
    let destination = &mut destination[..rows * cols];
    // destination column `i` is source row `i`
    let leaf = |chunk: &mut [T], first: usize, limit: usize| {
        for i in first..limit {
            let column = &mut chunk[(i - first) * cols..(i - first + 1) * cols];
            for (j, target) in column.iter_mut().enumerate() {
                let value = &source[i + j * rows];
                *target = if conjugate {
                    value.conjugate()
                } else {
                    value.clone()
                };
            }
        }
    };
    if config.is_parallel(Primitive::Transpose, rows) {
        divide(
            destination,
            cols,
            0,
            rows,
            config.threshold(Primitive::Transpose),
            &leaf,
        );
    } else {
        leaf(destination, 0, rows);
    }
}
