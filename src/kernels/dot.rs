//! Inner products over index ranges

use crate::scalar::Scalar;

/// `Σ x[offset_x + i] * y[offset_y + i]` for `i in first..limit`
///
/// # Example
///
/// ```
/// use rayo::kernels::dot;
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [1.0, 1.0, 1.0, 1.0];
/// assert_eq!(dot(&x, 0, &y, 0, 1, 3), 5.0);
/// ```
#[inline]
pub fn dot<T: Scalar>(
    x: &[T],
    offset_x: usize,
    y: &[T],
    offset_y: usize,
    first: usize,
    limit: usize,
) -> T {
    if first >= limit {
        return T::zero();
    }
    let x = &x[offset_x + first..offset_x + limit];
    let y = &y[offset_y + first..offset_y + limit];
    x.iter().zip(y).fold(T::zero(), |mut sum, (xi, yi)| {
        sum += xi.clone() * yi.clone();
        sum
    })
}

/// `Σ conj(x[offset_x + i]) * y[offset_y + i]` for `i in first..limit`
#[inline]
pub fn dot_conjugated<T: Scalar>(
    x: &[T],
    offset_x: usize,
    y: &[T],
    offset_y: usize,
    first: usize,
    limit: usize,
) -> T {
    if !T::IS_COMPLEX {
        return dot(x, offset_x, y, offset_y, first, limit);
    }
    if first >= limit {
        return T::zero();
    }
    let x = &x[offset_x + first..offset_x + limit];
    let y = &y[offset_y + first..offset_y + limit];
    x.iter().zip(y).fold(T::zero(), |mut sum, (xi, yi)| {
        sum += xi.conjugate() * yi.clone();
        sum
    })
}

/// `Σ x[offset_x + i*stride_x] * y[offset_y + i*stride_y]` for `i in 0..count`
#[inline]
pub fn dot_strided<T: Scalar>(
    x: &[T],
    offset_x: usize,
    stride_x: usize,
    y: &[T],
    offset_y: usize,
    stride_y: usize,
    count: usize,
) -> T {
    let mut sum = T::zero();
    for i in 0..count {
        sum += x[offset_x + i * stride_x].clone() * y[offset_y + i * stride_y].clone();
    }
    sum
}
