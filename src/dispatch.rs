//! Size-dependent kernel selection and divide-and-conquer execution
//!
//! Parallel kernels never share mutable state between leaves: the output
//! buffer is split with `split_at_mut` along the outer index range, so each
//! leaf owns a disjoint chunk. Leaves run on rayon's global pool (sized to
//! the number of cores) and the call returns only after every leaf joined.

/// Implementation chosen for one matrix-matrix multiplication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplyKernel {
    /// Unrolled `n x n` times `n x n` kernel, `1 <= n <= 9`
    Fixed(usize),
    /// Unrolled ten-row kernel for any complexity and column count
    TenRows,
    /// Column-by-column generic kernel
    Generic,
    /// Divide-and-conquer over product columns
    Parallel,
}

impl MultiplyKernel {
    /// Largest square size with an unrolled kernel
    pub const MAX_FIXED: usize = 9;

    /// Picks a kernel for a `rows x complexity` by `complexity x cols` product
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::MultiplyKernel;
    ///
    /// assert_eq!(MultiplyKernel::select(3, 3, 3, 64), MultiplyKernel::Fixed(3));
    /// assert_eq!(MultiplyKernel::select(10, 4, 7, 64), MultiplyKernel::TenRows);
    /// assert_eq!(MultiplyKernel::select(5, 2, 8, 64), MultiplyKernel::Generic);
    /// assert_eq!(MultiplyKernel::select(5, 2, 100, 64), MultiplyKernel::Parallel);
    /// ```
    pub fn select(rows: usize, complexity: usize, cols: usize, threshold: usize) -> Self {
        if cols > threshold && cols > 1 {
            MultiplyKernel::Parallel
        } else if rows == complexity && complexity == cols && (1..=Self::MAX_FIXED).contains(&rows)
        {
            MultiplyKernel::Fixed(rows)
        } else if rows == 10 {
            MultiplyKernel::TenRows
        } else {
            MultiplyKernel::Generic
        }
    }
}

/// Runs `leaf` over `[first, limit)`, halving the range while it exceeds
/// `threshold`
///
/// `data` holds the elements of the range only: index `k` of the range
/// starts at `(k - first) * stride`. Each leaf receives its own sub-slice
/// together with the absolute bounds it covers.
///
/// With the `parallel` feature disabled the leaf is called once with the
/// whole range.
pub fn divide<T, F>(
    data: &mut [T],
    stride: usize,
    first: usize,
    limit: usize,
    threshold: usize,
    leaf: &F,
) where
    T: Send,
    F: Fn(&mut [T], usize, usize) + Sync,
{
    #[cfg(feature = "parallel")]
    {
        let count = limit - first;
        if count > threshold.max(1) {
            let middle = first + count / 2;
            let (low, high) = data.split_at_mut((middle - first) * stride);
            rayon::join(
                || divide(low, stride, first, middle, threshold, leaf),
                || divide(high, stride, middle, limit, threshold, leaf),
            );
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = (stride, threshold);

    leaf(data, first, limit);
}
