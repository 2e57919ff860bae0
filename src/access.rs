//! Read-only 2-D element access
//!
//! Kernels that only read an operand (multiplication factors, triangular
//! substitution bodies) take it through [`Access2D`], so raw column-major
//! slices and [`Matrix`](crate::Matrix) values can be mixed freely.

/// Random read access to a 2-D structure
pub trait Access2D<T> {
    /// Number of rows
    fn count_rows(&self) -> usize;

    /// Number of columns
    fn count_columns(&self) -> usize;

    /// Owned copy of the element at `(row, col)`; callers keep indices in
    /// bounds
    fn at(&self, row: usize, col: usize) -> T;
}

/// Borrowed view of a flat column-major buffer
///
/// # Example
///
/// ```
/// use rayo::{Access2D, ColumnMajor};
///
/// // 2x3, column-major: [[1, 3, 5], [2, 4, 6]]
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let view = ColumnMajor::new(&data, 2);
/// assert_eq!(view.count_columns(), 3);
/// assert_eq!(view.at(1, 2), 6.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColumnMajor<'a, T> {
    data: &'a [T],
    rows: usize,
}

impl<'a, T> ColumnMajor<'a, T> {
    /// Wraps `data` with the given row dimension
    pub fn new(data: &'a [T], rows: usize) -> Self {
        Self { data, rows }
    }

    /// Underlying buffer
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

impl<T: Clone> Access2D<T> for ColumnMajor<'_, T> {
    #[inline]
    fn count_rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn count_columns(&self) -> usize {
        if self.rows == 0 {
            0
        } else {
            self.data.len() / self.rows
        }
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        self.data[row + col * self.rows].clone()
    }
}

impl<T, A: Access2D<T> + ?Sized> Access2D<T> for &A {
    #[inline]
    fn count_rows(&self) -> usize {
        (**self).count_rows()
    }

    #[inline]
    fn count_columns(&self) -> usize {
        (**self).count_columns()
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        (**self).at(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_major_indexing() {
        let data = [1, 2, 3, 4, 5, 6];
        let view = ColumnMajor::new(&data, 3);
        assert_eq!(view.count_rows(), 3);
        assert_eq!(view.count_columns(), 2);
        assert_eq!(view.at(0, 1), 4);
        assert_eq!(view.at(2, 0), 3);
    }

    #[test]
    fn test_empty_view() {
        let data: [f64; 0] = [];
        let view = ColumnMajor::new(&data, 0);
        assert_eq!(view.count_columns(), 0);
    }

    #[test]
    fn test_reference_forwarding() {
        let data = [7.0, 8.0];
        let view = ColumnMajor::new(&data, 1);
        let by_ref: &ColumnMajor<'_, f64> = &view;
        assert_eq!(Access2D::at(&by_ref, 0, 1), 8.0);
    }
}
