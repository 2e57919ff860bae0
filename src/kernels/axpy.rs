//! AXPY family: `y += a * x` over strided ranges
//!
//! Index arithmetic is the caller's responsibility; these loops are the
//! innermost step of every other kernel and perform no bounds validation
//! beyond Rust's own slice checks. A zero `a` still runs the loop, so
//! non-finite entries of `x` reach `y` exactly as `y + 0 * x` would.

use crate::scalar::Scalar;

/// `y[offset_y + i*stride_y] += a * x[offset_x + i*stride_x]` for `i in 0..count`
///
/// # Example
///
/// ```
/// use rayo::kernels::axpy;
///
/// let x = [1.0, 2.0, 3.0];
/// let mut y = [10.0, 0.0, 20.0, 0.0, 30.0];
/// axpy(&mut y, 0, 2, 2.0, &x, 0, 1, 3);
/// assert_eq!(y, [12.0, 0.0, 24.0, 0.0, 36.0]);
/// ```
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn axpy<T: Scalar>(
    y: &mut [T],
    offset_y: usize,
    stride_y: usize,
    a: T,
    x: &[T],
    offset_x: usize,
    stride_x: usize,
    count: usize,
) {
    if stride_x == 1 && stride_y == 1 {
        let y = &mut y[offset_y..offset_y + count];
        let x = &x[offset_x..offset_x + count];
        for (yi, xi) in y.iter_mut().zip(x) {
            *yi += a.clone() * xi.clone();
        }
    } else {
        for i in 0..count {
            y[offset_y + i * stride_y] += a.clone() * x[offset_x + i * stride_x].clone();
        }
    }
}

/// `y[offset_y + i*stride_y] -= a * x[offset_x + i*stride_x]` for `i in 0..count`
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn subtract_scaled<T: Scalar>(
    y: &mut [T],
    offset_y: usize,
    stride_y: usize,
    a: T,
    x: &[T],
    offset_x: usize,
    stride_x: usize,
    count: usize,
) {
    if stride_x == 1 && stride_y == 1 {
        let y = &mut y[offset_y..offset_y + count];
        let x = &x[offset_x..offset_x + count];
        for (yi, xi) in y.iter_mut().zip(x) {
            *yi -= a.clone() * xi.clone();
        }
    } else {
        for i in 0..count {
            y[offset_y + i * stride_y] -= a.clone() * x[offset_x + i * stride_x].clone();
        }
    }
}

/// Scaled column AXPY: `data[i, col] += a * x[i]` for `i in first..limit`
#[inline]
pub fn axpy_column<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    col: usize,
    a: T,
    x: &[T],
    first: usize,
    limit: usize,
) {
    if first >= limit {
        return;
    }
    axpy(
        data,
        first + col * row_dim,
        1,
        a,
        x,
        first,
        1,
        limit - first,
    );
}

/// Scaled row AXPY: `data[row, j] += a * x[j]` for `j in first..limit`
#[inline]
pub fn axpy_row<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    row: usize,
    a: T,
    x: &[T],
    first: usize,
    limit: usize,
) {
    if first >= limit {
        return;
    }
    axpy(
        data,
        row + first * row_dim,
        row_dim,
        a,
        x,
        first,
        1,
        limit - first,
    );
}
