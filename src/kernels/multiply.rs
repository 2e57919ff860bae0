//! Matrix-matrix multiplication: `product = left * right`
//!
//! `left` is `rows x complexity`, `right` is `complexity x cols`, `product`
//! is `rows x cols`; all column-major. The product is overwritten, never
//! accumulated into.
//!
//! Three entry points cover the operand combinations that show up in
//! practice: [`multiply`] (raw × raw), [`multiply_both`] (accessor ×
//! accessor) and [`multiply_left`] (raw × accessor). All of them funnel
//! into one dispatcher that picks a [`MultiplyKernel`]:
//!
//! - `Fixed(n)`: the `n x n` case with `n` row accumulators held in a
//!   fixed-size array (fully unrolled by the compiler)
//! - `TenRows`: the same scheme for exactly ten product rows
//! - `Generic`: column-by-column AXPY accumulation
//! - `Parallel`: divide-and-conquer over product columns, each leaf running
//!   the best serial kernel for its block

use crate::access::{Access2D, ColumnMajor};
use crate::config::{DispatchConfig, Primitive};
use crate::dispatch::{divide, MultiplyKernel};
use crate::scalar::Scalar;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Raw × raw multiplication
///
/// `rows` is the product's (and `left`'s) row count; the column count is
/// taken from `product.len() / rows`.
///
/// # Example
///
/// ```
/// use rayo::kernels::multiply;
/// use rayo::DispatchConfig;
///
/// // [[1, 2], [3, 4]] x [[5, 6], [7, 8]], column-major
/// let left = [1.0, 3.0, 2.0, 4.0];
/// let right = [5.0, 7.0, 6.0, 8.0];
/// let mut product = [0.0; 4];
/// multiply(&mut product, 2, &left, 2, &right, &DispatchConfig::new());
/// assert_eq!(product, [19.0, 43.0, 22.0, 50.0]);
/// ```
pub fn multiply<T: Scalar>(
    product: &mut [T],
    rows: usize,
    left: &[T],
    complexity: usize,
    right: &[T],
    config: &DispatchConfig,
) {
    multiply_dispatch(
        product,
        rows,
        complexity,
        &ColumnMajor::new(left, rows),
        &ColumnMajor::new(right, complexity),
        config,
    );
}

/// Accessor × accessor multiplication
pub fn multiply_both<T, L, R>(
    product: &mut [T],
    rows: usize,
    left: &L,
    right: &R,
    config: &DispatchConfig,
) where
    T: Scalar,
    L: Access2D<T> + Sync,
    R: Access2D<T> + Sync,
{
    multiply_dispatch(product, rows, left.count_columns(), left, right, config);
}

/// Raw × accessor multiplication
pub fn multiply_left<T, R>(
    product: &mut [T],
    rows: usize,
    left: &[T],
    complexity: usize,
    right: &R,
    config: &DispatchConfig,
) where
    T: Scalar,
    R: Access2D<T> + Sync,
{
    multiply_dispatch(
        product,
        rows,
        complexity,
        &ColumnMajor::new(left, rows),
        right,
        config,
    );
}

#[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(rows = rows, complexity = complexity)))]
fn multiply_dispatch<T, L, R>(
    product: &mut [T],
    rows: usize,
    complexity: usize,
    left: &L,
    right: &R,
    config: &DispatchConfig,
) where
    T: Scalar,
    L: Access2D<T> + Sync,
    R: Access2D<T> + Sync,
{
    if rows == 0 {
        return;
    }
    let cols = product.len() / rows;
    let product = &mut product[..rows * cols];
    if complexity == 0 {
        product.fill(T::zero());
        return;
    }

    let threshold = config.threshold(Primitive::Multiply);
    match MultiplyKernel::select(rows, complexity, cols, threshold) {
        MultiplyKernel::Parallel => {
            let serial = MultiplyKernel::select(rows, complexity, cols, usize::MAX);
            divide(
                product,
                rows,
                0,
                cols,
                threshold,
                &|columns: &mut [T], first: usize, limit: usize| {
                    run_serial(serial, columns, first, limit, rows, complexity, left, right)
                },
            );
        }
        kernel => run_serial(kernel, product, 0, cols, rows, complexity, left, right),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_serial<T, L, R>(
    kernel: MultiplyKernel,
    columns: &mut [T],
    first: usize,
    limit: usize,
    rows: usize,
    complexity: usize,
    left: &L,
    right: &R,
) where
    T: Scalar,
    L: Access2D<T>,
    R: Access2D<T>,
{
    match kernel {
        MultiplyKernel::Fixed(1) => fixed_rows::<T, L, R, 1>(columns, first, limit, complexity, left, right),
        MultiplyKernel::Fixed(2) => fixed_rows::<T, L, R, 2>(columns, first, limit, complexity, left, right),
        MultiplyKernel::Fixed(3) => fixed_rows::<T, L, R, 3>(columns, first, limit, complexity, left, right),
        MultiplyKernel::Fixed(4) => fixed_rows::<T, L, R, 4>(columns, first, limit, complexity, left, right),
        MultiplyKernel::Fixed(5) => fixed_rows::<T, L, R, 5>(columns, first, limit, complexity, left, right),
        MultiplyKernel::Fixed(6) => fixed_rows::<T, L, R, 6>(columns, first, limit, complexity, left, right),
        MultiplyKernel::Fixed(7) => fixed_rows::<T, L, R, 7>(columns, first, limit, complexity, left, right),
        MultiplyKernel::Fixed(8) => fixed_rows::<T, L, R, 8>(columns, first, limit, complexity, left, right),
        MultiplyKernel::Fixed(9) => fixed_rows::<T, L, R, 9>(columns, first, limit, complexity, left, right),
        MultiplyKernel::TenRows => fixed_rows::<T, L, R, 10>(columns, first, limit, complexity, left, right),
        _ => generic(columns, first, limit, rows, complexity, left, right),
    }
}

/// `N` product rows accumulated in registers, one column at a time
#[inline]
fn fixed_rows<T, L, R, const N: usize>(
    columns: &mut [T],
    first: usize,
    limit: usize,
    complexity: usize,
    left: &L,
    right: &R,
) where
    T: Scalar,
    L: Access2D<T>,
    R: Access2D<T>,
{
    for j in first..limit {
        let mut accumulators: [T; N] = std::array::from_fn(|_| T::zero());
        for c in 0..complexity {
            let factor = right.at(c, j);
            for (i, accumulator) in accumulators.iter_mut().enumerate() {
                *accumulator += left.at(i, c) * factor.clone();
            }
        }
        let offset = (j - first) * N;
        for (target, value) in columns[offset..offset + N].iter_mut().zip(accumulators) {
            *target = value;
        }
    }
}

fn generic<T, L, R>(
    columns: &mut [T],
    first: usize,
    limit: usize,
    rows: usize,
    complexity: usize,
    left: &L,
    right: &R,
) where
    T: Scalar,
    L: Access2D<T>,
    R: Access2D<T>,
{
    for j in first..limit {
        let column = &mut columns[(j - first) * rows..(j - first + 1) * rows];
        column.fill(T::zero());
        for c in 0..complexity {
            let factor = right.at(c, j);
            for (i, value) in column.iter_mut().enumerate() {
                *value += left.at(i, c) * factor.clone();
            }
        }
    }
}
