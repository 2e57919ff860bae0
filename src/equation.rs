//! One row of a linear system, with relaxed Gauss-Seidel updates
//!
//! An [`Equation`] owns a body vector (dense or sparse), a right-hand side
//! and the index of its pivot. The pivot value is always read from the
//! body, so mutators never have to keep a cached copy in sync.
//!
//! Equations order and compare by pivot index only, so a system can be kept
//! sorted in row order.
//!
//! # Example
//!
//! ```
//! use rayo::{gauss_seidel, Equation, IterativeConfig};
//!
//! // 4x + y = 9, x + 3y = 5  ->  x = 2, y = 1
//! let system = vec![
//!     Equation::of(9.0, 0, [4.0, 1.0]),
//!     Equation::of(5.0, 1, [1.0, 3.0]),
//! ];
//! let mut x: Vec<f64> = vec![0.0; 2];
//! let report = gauss_seidel(&system, &mut x, &IterativeConfig::new()).unwrap();
//!
//! assert!(report.converged);
//! assert!((x[0] - 2.0).abs() < 1e-9);
//! assert!((x[1] - 1.0).abs() < 1e-9);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{RayoError, Result};
use crate::scalar::Scalar;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(Debug, Clone)]
enum Body<T> {
    Dense(Vec<T>),
    Sparse {
        width: usize,
        entries: BTreeMap<usize, T>,
    },
}

/// A single equation `body · x = rhs` with a designated pivot
#[derive(Debug, Clone)]
pub struct Equation<T> {
    index: usize,
    body: Body<T>,
    rhs: T,
}

impl<T: Scalar> Equation<T> {
    /// Zero equation over `width` unknowns with dense storage
    pub fn dense(index: usize, width: usize) -> Self {
        Self {
            index,
            body: Body::Dense(vec![T::zero(); width]),
            rhs: T::zero(),
        }
    }

    /// Zero equation over `width` unknowns storing only non-zero entries
    pub fn sparse(index: usize, width: usize) -> Self {
        Self {
            index,
            body: Body::Sparse {
                width,
                entries: BTreeMap::new(),
            },
            rhs: T::zero(),
        }
    }

    /// Equation with the given right-hand side and dense body
    pub fn of(rhs: T, index: usize, body: impl Into<Vec<T>>) -> Self {
        Self {
            index,
            body: Body::Dense(body.into()),
            rhs,
        }
    }

    /// Replaces the right-hand side
    pub fn with_rhs(mut self, rhs: T) -> Self {
        self.rhs = rhs;
        self
    }

    /// Pivot (row) index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of unknowns
    pub fn count(&self) -> usize {
        match &self.body {
            Body::Dense(values) => values.len(),
            Body::Sparse { width, .. } => *width,
        }
    }

    /// Right-hand side
    pub fn rhs(&self) -> T {
        self.rhs.clone()
    }

    /// Overwrites the right-hand side
    pub fn set_rhs(&mut self, rhs: T) {
        self.rhs = rhs;
    }

    /// Body coefficient at `index` (zero outside the body)
    pub fn get(&self, index: usize) -> T {
        match &self.body {
            Body::Dense(values) => values.get(index).cloned().unwrap_or_else(T::zero),
            Body::Sparse { entries, .. } => entries.get(&index).cloned().unwrap_or_else(T::zero),
        }
    }

    /// Coefficient at the pivot index
    pub fn pivot(&self) -> T {
        self.get(self.index)
    }

    /// `body[index] += value`; out-of-range indices are ignored
    pub fn add(&mut self, index: usize, value: T) {
        if index >= self.count() {
            return;
        }
        let current = self.get(index);
        self.store(index, current + value);
    }

    /// `body[index] = value`; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, value: T) {
        if index >= self.count() {
            return;
        }
        self.store(index, value);
    }

    fn store(&mut self, index: usize, value: T) {
        match &mut self.body {
            Body::Dense(values) => values[index] = value,
            Body::Sparse { entries, .. } => {
                if value.is_zero() {
                    entries.remove(&index);
                } else {
                    entries.insert(index, value);
                }
            }
        }
    }

    /// `Σ body[i] * x[i]`
    pub fn dot(&self, x: &[T]) -> T {
        match &self.body {
            Body::Dense(values) => values.iter().zip(x).fold(T::zero(), |mut sum, (a, b)| {
                sum += a.clone() * b.clone();
                sum
            }),
            Body::Sparse { entries, .. } => entries
                .iter()
                .filter_map(|(&i, a)| x.get(i).map(|b| a.clone() * b.clone()))
                .fold(T::zero(), |sum, term| sum + term),
        }
    }

    /// One relaxed Gauss-Seidel step for this row
    ///
    /// Computes `error = rhs - body · x`, moves `x[index]` by
    /// `error * relaxation / pivot` and returns `error`. The pivot must be
    /// non-zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::Equation;
    ///
    /// let equation = Equation::of(5.0, 1, [2.0, 4.0, 1.0]);
    /// let mut x = vec![0.0; 3];
    /// assert_eq!(equation.adjust(&mut x, 1.0), 5.0);
    /// assert_eq!(x, vec![0.0, 1.25, 0.0]);
    /// ```
    pub fn adjust(&self, x: &mut [T], relaxation: T) -> T {
        self.step(x, self.rhs.clone(), relaxation)
    }

    /// Seeds `x[index]` from the row's own structure
    ///
    /// Same as [`adjust`](Self::adjust) with a zero right-hand side and no
    /// relaxation.
    pub fn initialise(&self, x: &mut [T]) -> T {
        self.step(x, T::zero(), T::one())
    }

    fn step(&self, x: &mut [T], rhs: T, relaxation: T) -> T {
        let error = rhs - self.dot(x);
        x[self.index] += error.clone() * relaxation / self.pivot();
        error
    }
}

impl<T> PartialEq for Equation<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Equation<T> {}

impl<T> PartialOrd for Equation<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Equation<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

/// Iteration control for [`gauss_seidel`]
#[derive(Debug, Clone, PartialEq)]
pub struct IterativeConfig {
    /// Relaxation factor, `0 < ω < 2` (1 is plain Gauss-Seidel)
    pub relaxation: f64,
    /// Maximum number of full sweeps
    pub max_iterations: usize,
    /// Sweep stops once every row's residual is at or below this
    pub tolerance: f64,
}

impl Default for IterativeConfig {
    fn default() -> Self {
        Self {
            relaxation: 1.0,
            max_iterations: 200,
            tolerance: 1e-12,
        }
    }
}

impl IterativeConfig {
    /// Default configuration (ω = 1, 200 sweeps, 1e-12)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relaxation factor
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Set the sweep limit
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the residual tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.relaxation > 0.0 && self.relaxation < 2.0) {
            return Err(RayoError::InvalidInput(format!(
                "relaxation must be in (0, 2), got {}",
                self.relaxation
            )));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(RayoError::InvalidInput(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Outcome of [`gauss_seidel`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterativeReport {
    /// Sweeps performed
    pub iterations: usize,
    /// Largest absolute row residual seen in the last sweep
    pub error: f64,
    /// Whether `error` reached the tolerance
    pub converged: bool,
}

/// Solves the system by repeated [`Equation::adjust`] sweeps, in place
///
/// `x` holds the initial guess and receives the solution. Running out of
/// sweeps is not an error; check [`IterativeReport::converged`].
///
/// # Arguments
///
/// * `equations` - One row per unknown, each with a non-zero pivot
/// * `x` - Initial guess, updated in place
/// * `config` - Relaxation, sweep limit and residual tolerance
///
/// # Returns
///
/// The number of sweeps, the last sweep's largest residual and whether it
/// reached the tolerance
///
/// # Errors
///
/// - [`RayoError::SizeMismatch`] if an equation's width differs from `x`
/// - [`RayoError::InvalidInput`] for an out-of-range or zero pivot, or an
///   invalid configuration
#[cfg_attr(feature = "tracing", instrument(skip(equations, x, config), fields(n = x.len())))]
pub fn gauss_seidel<T: Scalar>(
    equations: &[Equation<T>],
    x: &mut [T],
    config: &IterativeConfig,
) -> Result<IterativeReport> {
    config.validate()?;
    for equation in equations {
        if equation.count() != x.len() {
            return Err(RayoError::SizeMismatch {
                expected: x.len(),
                actual: equation.count(),
            });
        }
        if equation.index() >= x.len() {
            return Err(RayoError::InvalidInput(format!(
                "pivot index {} out of range for {} unknowns",
                equation.index(),
                x.len()
            )));
        }
        if equation.pivot().is_zero() {
            return Err(RayoError::InvalidInput(format!(
                "zero pivot in equation {}",
                equation.index()
            )));
        }
    }

    let relaxation = T::from_f64(config.relaxation);
    let mut report = IterativeReport {
        iterations: 0,
        error: 0.0,
        converged: equations.is_empty(),
    };

    while !report.converged && report.iterations < config.max_iterations {
        let mut largest: f64 = 0.0;
        for equation in equations {
            largest = largest.max(equation.adjust(x, relaxation.clone()).norm());
        }
        report.iterations += 1;
        report.error = largest;
        report.converged = largest <= config.tolerance;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        iterations = report.iterations,
        error = report.error,
        converged = report.converged,
        "gauss-seidel finished"
    );

    Ok(report)
}
