//! Triangular substitution, in place on a block of right-hand sides
//!
//! The triangular body is only read, through [`Access2D`], and is never the
//! right-hand-side buffer itself. Each right-hand-side column is solved
//! independently, so columns are split across workers above the
//! [`Primitive::Substitute`] threshold.

use crate::access::Access2D;
use crate::config::{DispatchConfig, Primitive};
use crate::dispatch::divide;
use crate::scalar::Scalar;

/// How the triangular body and the right-hand sides are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionOptions {
    /// Diagonal is implicitly one; no division takes place
    pub unit_diagonal: bool,
    /// Solve with the conjugate transpose of the body
    pub conjugated: bool,
    /// Right-hand sides are lower triangular (forward solves only)
    pub zeros_above_diagonal: bool,
    /// Right-hand sides are upper triangular (backward solves only)
    pub zeros_below_diagonal: bool,
}

impl SubstitutionOptions {
    /// Plain substitution
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat the diagonal as all ones
    pub fn with_unit_diagonal(mut self) -> Self {
        self.unit_diagonal = true;
        self
    }

    /// Use the conjugate transpose of the body
    pub fn with_conjugated(mut self) -> Self {
        self.conjugated = true;
        self
    }

    /// Right-hand sides have zeros above the diagonal
    pub fn with_zeros_above_diagonal(mut self) -> Self {
        self.zeros_above_diagonal = true;
        self
    }

    /// Right-hand sides have zeros below the diagonal
    pub fn with_zeros_below_diagonal(mut self) -> Self {
        self.zeros_below_diagonal = true;
        self
    }
}

/// Solves `L X = B` in place, `L` lower triangular
///
/// `data` holds `B` (`row_dim x col_dim`, column-major) and receives `X`.
/// With [`SubstitutionOptions::conjugated`] the body is read as `Uᴴ`.
///
/// # Arguments
///
/// * `data` - Right-hand sides, overwritten by the solutions
/// * `row_dim` - Rows of `data`, equal to the dimension of the body
/// * `body` - Triangular matrix, only its lower (or, conjugated, upper)
///   triangle is read
/// * `options` - Diagonal, conjugation and right-hand-side shape flags
/// * `config` - Column split threshold ([`Primitive::Substitute`])
///
/// # Example
///
/// ```
/// use rayo::kernels::{substitute_forwards, SubstitutionOptions};
/// use rayo::{ColumnMajor, DispatchConfig};
///
/// // L = [[2, 0], [1, 1]]
/// let body = [2.0, 1.0, 0.0, 1.0];
/// let mut rhs = [4.0, 5.0];
/// substitute_forwards(
///     &mut rhs,
///     2,
///     &ColumnMajor::new(&body, 2),
///     SubstitutionOptions::new(),
///     &DispatchConfig::new(),
/// );
/// assert_eq!(rhs, [2.0, 3.0]);
/// ```
pub fn substitute_forwards<T, B>(
    data: &mut [T],
    row_dim: usize,
    body: &B,
    options: SubstitutionOptions,
    config: &DispatchConfig,
) where
    T: Scalar,
    B: Access2D<T> + Sync,
{
    solve_columns(data, row_dim, config, &|columns: &mut [T], first: usize, limit: usize| {
        forwards(columns, row_dim, first, limit, body, options)
    });
}

/// Solves `U X = B` in place, `U` upper triangular
///
/// With [`SubstitutionOptions::conjugated`] the body is read as `Lᴴ`.
pub fn substitute_backwards<T, B>(
    data: &mut [T],
    row_dim: usize,
    body: &B,
    options: SubstitutionOptions,
    config: &DispatchConfig,
) where
    T: Scalar,
    B: Access2D<T> + Sync,
{
    solve_columns(data, row_dim, config, &|columns: &mut [T], first: usize, limit: usize| {
        backwards(columns, row_dim, first, limit, body, options)
    });
}

fn solve_columns<T, F>(data: &mut [T], row_dim: usize, config: &DispatchConfig, leaf: &F)
where
    T: Scalar,
    F: Fn(&mut [T], usize, usize) + Sync,
{
    if row_dim == 0 {
        return;
    }
    let col_dim = data.len() / row_dim;
    let data = &mut data[..row_dim * col_dim];
    if config.is_parallel(Primitive::Substitute, col_dim) {
        divide(
            data,
            row_dim,
            0,
            col_dim,
            config.threshold(Primitive::Substitute),
            leaf,
        );
    } else {
        leaf(data, 0, col_dim);
    }
}

#[inline]
fn element<T: Scalar, B: Access2D<T>>(body: &B, row: usize, col: usize, conjugated: bool) -> T {
    if conjugated {
        body.at(col, row).conjugate()
    } else {
        body.at(row, col)
    }
}

fn forwards<T: Scalar, B: Access2D<T>>(
    columns: &mut [T],
    row_dim: usize,
    first: usize,
    limit: usize,
    body: &B,
    options: SubstitutionOptions,
) {
    for s in first..limit {
        let column = &mut columns[(s - first) * row_dim..(s - first + 1) * row_dim];
        for i in 0..row_dim {
            let start = if options.zeros_above_diagonal { s.min(i) } else { 0 };
            let mut value = column[i].clone();
            for j in start..i {
                value -= element(body, i, j, options.conjugated) * column[j].clone();
            }
            if !options.unit_diagonal {
                value = value / element(body, i, i, options.conjugated);
            }
            column[i] = value;
        }
    }
}

fn backwards<T: Scalar, B: Access2D<T>>(
    columns: &mut [T],
    row_dim: usize,
    first: usize,
    limit: usize,
    body: &B,
    options: SubstitutionOptions,
) {
    for s in first..limit {
        let column = &mut columns[(s - first) * row_dim..(s - first + 1) * row_dim];
        let end = if options.zeros_below_diagonal {
            row_dim.min(s + 1)
        } else {
            row_dim
        };
        for i in (0..row_dim).rev() {
            let mut value = column[i].clone();
            for j in i + 1..end {
                value -= element(body, i, j, options.conjugated) * column[j].clone();
            }
            if !options.unit_diagonal {
                value = value / element(body, i, i, options.conjugated);
            }
            column[i] = value;
        }
    }
}
