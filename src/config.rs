//! Dispatch thresholds and session configuration
//!
//! Every primitive that has a divide-and-conquer implementation owns one
//! integer threshold: while the active dimension stays at or below it the
//! single-threaded kernel runs, above it the work is split and handed to the
//! worker pool.
//!
//! Thresholds live in two places:
//!
//! - [`ThresholdTable::global()`]: the process-wide defaults, tuned once and
//!   shared by everything that does not pass its own configuration.
//! - [`DispatchConfig`]: an explicit value captured for one session or one
//!   decomposition, built from the global table or from scratch.
//!
//! # Examples
//!
//! ```
//! use rayo::{DispatchConfig, Primitive};
//!
//! // Force the parallel kernels for anything wider than 16 columns
//! let config = DispatchConfig::global()
//!     .with_max_threshold(16)
//!     .with_threshold(Primitive::Substitute, 4);
//!
//! assert!(config.threshold(Primitive::Multiply) <= 16);
//! assert_eq!(config.threshold(Primitive::Substitute), 4);
//!
//! // Everything single-threaded
//! let serial = DispatchConfig::serial();
//! assert_eq!(serial.threshold(Primitive::Rank2Update), usize::MAX);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::scalar::{Scalar, Tolerance};

/// Primitives with a size-dependent parallel implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// Column-range fill
    Fill,
    /// Transpose / conjugate transpose
    Transpose,
    /// Matrix-matrix multiplication (product columns)
    Multiply,
    /// Hermitian rank-2 update (columns)
    Rank2Update,
    /// Symmetric/Hermitian matrix-vector product (result rows)
    SymmetricMatrixVector,
    /// Householder reflector applied from the left (columns)
    HouseholderLeft,
    /// Householder reflector applied from the right (columns)
    HouseholderRight,
    /// Two-sided Hermitian Householder step (active dimension)
    HouseholderHermitian,
    /// Triangular substitution (right-hand-side columns)
    Substitute,
}

impl Primitive {
    /// Number of primitives in the table
    pub const COUNT: usize = 9;

    /// All primitives, in table order
    pub const ALL: [Primitive; Primitive::COUNT] = [
        Primitive::Fill,
        Primitive::Transpose,
        Primitive::Multiply,
        Primitive::Rank2Update,
        Primitive::SymmetricMatrixVector,
        Primitive::HouseholderLeft,
        Primitive::HouseholderRight,
        Primitive::HouseholderHermitian,
        Primitive::Substitute,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Fill => "fill",
            Primitive::Transpose => "transpose",
            Primitive::Multiply => "multiply",
            Primitive::Rank2Update => "rank2_update",
            Primitive::SymmetricMatrixVector => "symmetric_matrix_vector",
            Primitive::HouseholderLeft => "householder_left",
            Primitive::HouseholderRight => "householder_right",
            Primitive::HouseholderHermitian => "householder_hermitian",
            Primitive::Substitute => "substitute",
        }
    }

    /// Built-in threshold (empirical, x86_64 with 8+ cores)
    pub const fn default_threshold(self) -> usize {
        match self {
            Primitive::Fill => 512,
            Primitive::Transpose => 256,
            Primitive::Multiply => 64,
            Primitive::Rank2Update => 128,
            Primitive::SymmetricMatrixVector => 128,
            Primitive::HouseholderLeft => 128,
            Primitive::HouseholderRight => 128,
            Primitive::HouseholderHermitian => 256,
            Primitive::Substitute => 64,
        }
    }
}

/// Process-wide, lock-free threshold table
///
/// Each slot is updated independently. A reader racing a bulk update may
/// observe a mix of old and new values; thresholds only steer the
/// serial/parallel choice, so results are unaffected.
#[derive(Debug)]
pub struct ThresholdTable {
    slots: [AtomicUsize; Primitive::COUNT],
}

static GLOBAL_THRESHOLDS: ThresholdTable = ThresholdTable::with_defaults();

impl ThresholdTable {
    /// A table initialised with [`Primitive::default_threshold`]
    pub const fn with_defaults() -> Self {
        Self {
            slots: [
                AtomicUsize::new(Primitive::Fill.default_threshold()),
                AtomicUsize::new(Primitive::Transpose.default_threshold()),
                AtomicUsize::new(Primitive::Multiply.default_threshold()),
                AtomicUsize::new(Primitive::Rank2Update.default_threshold()),
                AtomicUsize::new(Primitive::SymmetricMatrixVector.default_threshold()),
                AtomicUsize::new(Primitive::HouseholderLeft.default_threshold()),
                AtomicUsize::new(Primitive::HouseholderRight.default_threshold()),
                AtomicUsize::new(Primitive::HouseholderHermitian.default_threshold()),
                AtomicUsize::new(Primitive::Substitute.default_threshold()),
            ],
        }
    }

    /// The process-wide table
    pub fn global() -> &'static ThresholdTable {
        &GLOBAL_THRESHOLDS
    }

    /// Current threshold for one primitive
    pub fn get(&self, primitive: Primitive) -> usize {
        self.slots[primitive.index()].load(Ordering::Relaxed)
    }

    /// Overrides one primitive's threshold
    pub fn set(&self, primitive: Primitive, threshold: usize) {
        self.slots[primitive.index()].store(threshold, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::debug!(primitive = primitive.name(), threshold, "threshold set");
    }

    /// Sets every threshold to `threshold`
    pub fn set_all(&self, threshold: usize) {
        for slot in &self.slots {
            slot.store(threshold, Ordering::Relaxed);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(threshold, "all thresholds set");
    }

    /// Lowers every threshold above `max` to `max`
    pub fn clamp_max(&self, max: usize) {
        for slot in &self.slots {
            slot.fetch_min(max, Ordering::Relaxed);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(max, "thresholds clamped from above");
    }

    /// Raises every threshold below `min` to `min`
    pub fn clamp_min(&self, min: usize) {
        for slot in &self.slots {
            slot.fetch_max(min, Ordering::Relaxed);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(min, "thresholds clamped from below");
    }

    /// Restores the built-in defaults
    pub fn reset(&self) {
        for primitive in Primitive::ALL {
            self.slots[primitive.index()]
                .store(primitive.default_threshold(), Ordering::Relaxed);
        }
    }

    /// Copies the table into a [`DispatchConfig`]
    pub fn snapshot(&self) -> DispatchConfig {
        let mut thresholds = [0; Primitive::COUNT];
        for primitive in Primitive::ALL {
            thresholds[primitive.index()] = self.get(primitive);
        }
        DispatchConfig {
            thresholds,
            tolerance: None,
        }
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Dispatch configuration for one session
///
/// A plain value: cloning it and changing the clone never affects other
/// callers. Kernels that may go parallel take a `&DispatchConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    thresholds: [usize; Primitive::COUNT],
    tolerance: Option<f64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let mut thresholds = [0; Primitive::COUNT];
        for primitive in Primitive::ALL {
            thresholds[primitive.index()] = primitive.default_threshold();
        }
        Self {
            thresholds,
            tolerance: None,
        }
    }
}

impl DispatchConfig {
    /// Built-in defaults, independent of the global table
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of [`ThresholdTable::global()`]
    pub fn global() -> Self {
        ThresholdTable::global().snapshot()
    }

    /// Never dispatches to a parallel kernel
    pub fn serial() -> Self {
        Self::new().with_all_thresholds(usize::MAX)
    }

    /// Threshold for one primitive
    #[inline]
    pub fn threshold(&self, primitive: Primitive) -> usize {
        self.thresholds[primitive.index()]
    }

    /// `true` when `size` is large enough for the parallel kernel
    #[inline]
    pub fn is_parallel(&self, primitive: Primitive, size: usize) -> bool {
        size > self.threshold(primitive)
    }

    /// Overrides one primitive's threshold
    pub fn with_threshold(mut self, primitive: Primitive, threshold: usize) -> Self {
        self.thresholds[primitive.index()] = threshold;
        self
    }

    /// Sets every threshold to `threshold`
    pub fn with_all_thresholds(mut self, threshold: usize) -> Self {
        self.thresholds = [threshold; Primitive::COUNT];
        self
    }

    /// Lowers every threshold above `max` to `max`
    pub fn with_max_threshold(mut self, max: usize) -> Self {
        for threshold in &mut self.thresholds {
            *threshold = (*threshold).min(max);
        }
        self
    }

    /// Raises every threshold below `min` to `min`
    pub fn with_min_threshold(mut self, min: usize) -> Self {
        for threshold in &mut self.thresholds {
            *threshold = (*threshold).max(min);
        }
        self
    }

    /// Overrides the Householder "is-small" epsilon for every scalar domain
    pub fn with_tolerance(mut self, epsilon: f64) -> Self {
        self.tolerance = Some(epsilon);
        self
    }

    /// Tolerance to use for scalar domain `T`
    pub fn tolerance_for<T: Scalar>(&self) -> Tolerance {
        match self.tolerance {
            Some(epsilon) => Tolerance::new(epsilon),
            None => Tolerance::of::<T>(),
        }
    }
}

/// Number of worker threads available to divide-and-conquer kernels
pub fn worker_count() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
