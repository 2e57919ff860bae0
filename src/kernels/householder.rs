//! Householder reflectors: generation, one- and two-sided application
//!
//! A reflector is `H = I - β v vᴴ` with `v[first] == 1` and every entry
//! before `first` implicitly zero. Generation reads a column (or row) of a
//! column-major buffer, writes the reflected pivot back and zeroes the
//! entries the reflector annihilates, so the buffer holds the reduced
//! matrix as soon as the remaining block has been updated with
//! [`householder_left`], [`householder_right`] or
//! [`householder_hermitian`].
//!
//! The sign of the reflection follows the pivot (`u0 = x0 + sign(x0)‖x‖`),
//! which keeps `|u0| >= ‖x‖` and avoids cancellation.

use crate::config::{DispatchConfig, Primitive};
use crate::dispatch::divide;
use crate::kernels::rank2::rank2_update_parallel;
use crate::kernels::symv::symmetric_matrix_vector_parallel;
use crate::scalar::{Scalar, Tolerance};

/// Householder reflector `I - β v vᴴ`
#[derive(Debug, Clone, PartialEq)]
pub struct Householder<T> {
    vector: Vec<T>,
    first: usize,
    beta: T,
}

impl<T: Scalar> Householder<T> {
    /// Identity reflector of dimension `dim` (`β = 0`)
    pub fn new(dim: usize) -> Self {
        Self {
            vector: vec![T::zero(); dim],
            first: 0,
            beta: T::zero(),
        }
    }

    /// Full dimension
    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// Index of the first (unit) entry
    pub fn first(&self) -> usize {
        self.first
    }

    /// Reflection coefficient, real-valued
    pub fn beta(&self) -> T {
        self.beta.clone()
    }

    /// Stored vector; entries before [`first`](Self::first) are meaningless
    pub fn vector(&self) -> &[T] {
        &self.vector
    }

    /// `x -= β (vᴴ x) v`
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::kernels::{generate_apply_and_copy_column, Householder};
    /// use rayo::Tolerance;
    ///
    /// let mut data: Vec<f64> = vec![3.0, 4.0];
    /// let mut reflector = Householder::new(2);
    /// assert!(generate_apply_and_copy_column(&mut data, 2, 0, 0, &mut reflector, &Tolerance::of::<f64>()));
    /// assert_eq!(data, vec![-5.0, 0.0]);
    ///
    /// let mut x = vec![3.0, 4.0];
    /// reflector.apply(&mut x);
    /// assert!((x[0] + 5.0).abs() < 1e-12 && x[1].abs() < 1e-12);
    /// ```
    pub fn apply(&self, x: &mut [T]) {
        if self.beta.is_zero() {
            return;
        }
        let mut scale = T::zero();
        for i in self.first..self.vector.len() {
            scale += self.vector[i].conjugate() * x[i].clone();
        }
        scale *= self.beta.clone();
        for i in self.first..self.vector.len() {
            x[i] -= scale.clone() * self.vector[i].clone();
        }
    }

    /// Dense column-major `dim x dim` matrix of the reflector
    pub fn to_matrix(&self) -> Vec<T> {
        let dim = self.vector.len();
        let mut matrix = vec![T::zero(); dim * dim];
        for j in 0..dim {
            matrix[j + j * dim] = T::one();
            if j < self.first {
                continue;
            }
            let factor = self.beta.clone() * self.vector[j].conjugate();
            for i in self.first..dim {
                matrix[i + j * dim] -= self.vector[i].clone() * factor.clone();
            }
        }
        matrix
    }
}

/// Generates the reflector annihilating `data[row+1.., col]`
///
/// On success the reflected pivot is written to `data[row, col]`, the
/// entries below it are zeroed and `destination` holds the reflector with
/// `first == row`. Returns `false`, leaving `data` untouched, when the
/// column is zero from `row` down or already aligned with its first axis.
pub fn generate_apply_and_copy_column<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    row: usize,
    col: usize,
    destination: &mut Householder<T>,
    tolerance: &Tolerance,
) -> bool {
    let base = col * row_dim;
    let vector = &mut destination.vector;

    let mut largest = T::zero();
    let mut amax = 0.0;
    for i in row..row_dim {
        let value = data[base + i].clone();
        let magnitude = value.norm();
        if magnitude > amax {
            amax = magnitude;
            largest = value.clone();
        }
        vector[i] = value;
    }

    let Some(pivot) = reflect(vector, row, row_dim, largest, amax, tolerance) else {
        return false;
    };

    data[base + row] = pivot.value;
    for i in row + 1..row_dim {
        data[base + i] = T::zero();
    }
    destination.first = row;
    destination.beta = pivot.beta;
    true
}

/// Generates the reflector annihilating `data[row, col+1..]`
///
/// Mirror of [`generate_apply_and_copy_column`]: the reflector is built
/// from the conjugated row, so applying it from the right with
/// [`householder_right`] reduces the row. `destination` must have the
/// column dimension.
pub fn generate_apply_and_copy_row<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    row: usize,
    col: usize,
    destination: &mut Householder<T>,
    tolerance: &Tolerance,
) -> bool {
    let col_dim = destination.vector.len();
    let vector = &mut destination.vector;

    let mut largest = T::zero();
    let mut amax = 0.0;
    for j in col..col_dim {
        let value = data[row + j * row_dim].conjugate();
        let magnitude = value.norm();
        if magnitude > amax {
            amax = magnitude;
            largest = value.clone();
        }
        vector[j] = value;
    }

    let Some(pivot) = reflect(vector, col, col_dim, largest, amax, tolerance) else {
        return false;
    };

    data[row + col * row_dim] = pivot.value.conjugate();
    for j in col + 1..col_dim {
        data[row + j * row_dim] = T::zero();
    }
    destination.first = col;
    destination.beta = pivot.beta;
    true
}

struct Pivot<T> {
    value: T,
    beta: T,
}

/// Turns `vector[first..limit]` into a normalised reflector in place
fn reflect<T: Scalar>(
    vector: &mut [T],
    first: usize,
    limit: usize,
    largest: T,
    amax: f64,
    tolerance: &Tolerance,
) -> Option<Pivot<T>> {
    if amax == 0.0 {
        return None;
    }
    let scale = largest.modulus();

    let mut tail = T::zero();
    let mut tail_norm = 0.0;
    for value in &mut vector[first + 1..limit] {
        let scaled = value.clone() / scale.clone();
        tail += scaled.conjugate() * scaled.clone();
        let magnitude = scaled.norm();
        tail_norm += magnitude * magnitude;
        *value = scaled;
    }
    if tolerance.is_small(1.0, tail_norm) {
        return None;
    }

    let head = vector[first].clone() / scale.clone();
    let norm2 = (tail.clone() + head.conjugate() * head.clone()).sqrt();
    let phase = head.signum();
    let u0 = head + phase.clone() * norm2.clone();

    for value in &mut vector[first + 1..limit] {
        *value = value.clone() / u0.clone();
    }
    vector[first] = T::one();

    // β = 2 / vᴴv with vᴴv = 1 + tail / |u0|², exact whenever the domain is,
    // even if the square root above is not.
    let u0_squared = u0.conjugate() * u0;
    let two = T::one() + T::one();
    Some(Pivot {
        value: -(phase * norm2 * scale),
        beta: two * u0_squared.clone() / (u0_squared + tail),
    })
}

/// Applies `H` from the left to columns `first_col..col_limit`
///
/// `data[i, j] -= β (Σ conj(v[i]) data[i, j]) v[i]` over the reflector's
/// row range; columns are split across workers above the
/// [`Primitive::HouseholderLeft`] threshold.
pub fn householder_left<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    first_col: usize,
    col_limit: usize,
    reflector: &Householder<T>,
    config: &DispatchConfig,
) {
    if first_col >= col_limit || reflector.beta.is_zero() {
        return;
    }
    let chunk = &mut data[first_col * row_dim..col_limit * row_dim];
    let leaf = |columns: &mut [T], first: usize, limit: usize| {
        left_columns(columns, row_dim, first, limit, reflector)
    };
    if config.is_parallel(Primitive::HouseholderLeft, col_limit - first_col) {
        divide(
            chunk,
            row_dim,
            first_col,
            col_limit,
            config.threshold(Primitive::HouseholderLeft),
            &leaf,
        );
    } else {
        leaf(chunk, first_col, col_limit);
    }
}

fn left_columns<T: Scalar>(
    columns: &mut [T],
    row_dim: usize,
    first: usize,
    limit: usize,
    reflector: &Householder<T>,
) {
    let start = reflector.first;
    let vector = &reflector.vector[start..row_dim];
    for j in first..limit {
        let column = &mut columns[(j - first) * row_dim + start..(j - first + 1) * row_dim];
        let mut scale = T::zero();
        for (v, a) in vector.iter().zip(column.iter()) {
            scale += v.conjugate() * a.clone();
        }
        scale *= reflector.beta.clone();
        for (a, v) in column.iter_mut().zip(vector) {
            *a -= scale.clone() * v.clone();
        }
    }
}

/// Applies `H` from the right to rows `first_row..row_limit`
///
/// Column-oriented in two passes: `worker[i] = Σ_j data[i, j] v[j]`, then
/// `data[i, j] -= β worker[i] conj(v[j])`. `worker` needs `row_limit`
/// elements; both passes split across workers above the
/// [`Primitive::HouseholderRight`] threshold.
pub fn householder_right<T: Scalar>(
    data: &mut [T],
    row_dim: usize,
    first_row: usize,
    row_limit: usize,
    reflector: &Householder<T>,
    worker: &mut [T],
    config: &DispatchConfig,
) {
    if first_row >= row_limit || reflector.beta.is_zero() {
        return;
    }
    let start = reflector.first;
    let col_dim = reflector.vector.len();
    let parallel = config.is_parallel(Primitive::HouseholderRight, row_limit - first_row);
    let threshold = config.threshold(Primitive::HouseholderRight);

    {
        let source: &[T] = data;
        let gather = |rows: &mut [T], first: usize, limit: usize| {
            rows.fill(T::zero());
            for j in start..col_dim {
                let v = &reflector.vector[j];
                let column = &source[j * row_dim..];
                for i in first..limit {
                    rows[i - first] += column[i].clone() * v.clone();
                }
            }
        };
        let rows = &mut worker[first_row..row_limit];
        if parallel {
            divide(rows, 1, first_row, row_limit, threshold, &gather);
        } else {
            gather(rows, first_row, row_limit);
        }
    }

    let beta = &reflector.beta;
    let products: &[T] = worker;
    let scatter = |columns: &mut [T], first: usize, limit: usize| {
        for j in first..limit {
            let factor = beta.clone() * reflector.vector[j].conjugate();
            let column = &mut columns[(j - first) * row_dim..(j - first + 1) * row_dim];
            for i in first_row..row_limit {
                column[i] -= products[i].clone() * factor.clone();
            }
        }
    };
    let chunk = &mut data[start * row_dim..col_dim * row_dim];
    if config.is_parallel(Primitive::HouseholderRight, col_dim - start) {
        divide(chunk, row_dim, start, col_dim, threshold, &scatter);
    } else {
        scatter(chunk, start, col_dim);
    }
}

/// Two-sided step `A <- H A H` on a Hermitian matrix stored as its lower
/// triangle
///
/// Only rows and columns from `reflector.first()` onwards are touched.
/// `worker` needs `dim` elements.
///
/// ```text
/// worker = A v                      (lower-triangle mat-vec)
/// worker = β (worker - β/2 (vᴴ worker) v)
/// A     -= v workerᴴ + worker vᴴ    (lower triangle only)
/// ```
pub fn householder_hermitian<T: Scalar>(
    data: &mut [T],
    dim: usize,
    reflector: &Householder<T>,
    worker: &mut [T],
    config: &DispatchConfig,
) {
    let first = reflector.first;
    if first >= dim || reflector.beta.is_zero() {
        return;
    }
    let vector = &reflector.vector;
    let beta = &reflector.beta;

    // Both inner kernels split their own ranges; the active dimension
    // decides whether they are allowed to.
    let inner = if config.is_parallel(Primitive::HouseholderHermitian, dim - first) {
        config.clone()
    } else {
        DispatchConfig::serial()
    };

    symmetric_matrix_vector_parallel(worker, first, dim, data, dim, vector, first, &inner);

    let mut projection = T::zero();
    for i in first..dim {
        projection += vector[i].conjugate() * worker[i].clone();
    }
    let half = beta.clone() / (T::one() + T::one()) * projection;
    for i in first..dim {
        worker[i] = beta.clone() * (worker[i].clone() - half.clone() * vector[i].clone());
    }

    rank2_update_parallel(data, dim, first, dim, vector, worker, &inner);
}
