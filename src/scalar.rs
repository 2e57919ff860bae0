//! Numeric scalar contract shared by every kernel
//!
//! Kernels are written once against [`Scalar`] and monomorphized per
//! domain. Implementations are provided for `f64`, `f32`, [`Complex64`],
//! [`Complex32`], [`BigRational`] (exact rationals) and [`BigDecimal`]
//! (arbitrary-precision decimals).
//!
//! Values are only required to be `Clone`: primitive domains copy for free,
//! the big-number domains are cloned where a kernel needs an owned operand.
//!
//! # Example
//!
//! ```
//! use rayo::Scalar;
//! use num_complex::Complex64;
//!
//! let z = Complex64::new(3.0, 4.0);
//! assert_eq!(z.norm(), 5.0);
//! assert_eq!(Scalar::conjugate(&z), Complex64::new(3.0, -4.0));
//! assert_eq!(<f64 as Scalar>::signum(&-2.5), -1.0);
//! ```

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use bigdecimal::BigDecimal;
use num_complex::{Complex32, Complex64};
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

/// Binary digits carried by [`BigRational`] square roots
const RATIONAL_SQRT_BITS: usize = 128;

/// Arithmetic contract every kernel is generic over
pub trait Scalar:
    Clone
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    /// Whether conjugation is a non-trivial operation for this domain
    const IS_COMPLEX: bool;

    /// Additive identity
    fn zero() -> Self;

    /// Multiplicative identity
    fn one() -> Self;

    /// Nearest representable value to a real number
    fn from_f64(value: f64) -> Self;

    /// Complex conjugate (identity for real domains)
    fn conjugate(&self) -> Self;

    /// Absolute value / modulus as `f64`
    fn norm(&self) -> f64;

    /// Absolute value / modulus inside the domain
    fn modulus(&self) -> Self;

    /// Real part as `f64`
    fn real(&self) -> f64;

    /// `self / |self|`, or one when `self` is zero
    fn signum(&self) -> Self;

    /// Principal square root
    fn sqrt(&self) -> Self;

    /// Relative precision of the domain, zero for exact domains
    fn epsilon() -> f64;

    /// Exact comparison with zero
    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// Scalars with a total order along the real line
///
/// Required by algorithms that branch on sign (e.g. `tred2`).
pub trait Real: Scalar + PartialOrd {}

impl Real for f64 {}
impl Real for f32 {}
impl Real for BigRational {}
impl Real for BigDecimal {}

macro_rules! impl_float_scalar {
    ($float:ty) => {
        impl Scalar for $float {
            const IS_COMPLEX: bool = false;

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $float
            }

            #[inline]
            fn conjugate(&self) -> Self {
                *self
            }

            #[inline]
            fn norm(&self) -> f64 {
                self.abs() as f64
            }

            #[inline]
            fn modulus(&self) -> Self {
                self.abs()
            }

            #[inline]
            fn real(&self) -> f64 {
                *self as f64
            }

            #[inline]
            fn signum(&self) -> Self {
                if *self < 0.0 {
                    -1.0
                } else {
                    1.0
                }
            }

            #[inline]
            fn sqrt(&self) -> Self {
                <$float>::sqrt(*self)
            }

            #[inline]
            fn epsilon() -> f64 {
                <$float>::EPSILON as f64
            }
        }
    };
}

impl_float_scalar!(f64);
impl_float_scalar!(f32);

macro_rules! impl_complex_scalar {
    ($complex:ty, $float:ty) => {
        impl Scalar for $complex {
            const IS_COMPLEX: bool = true;

            #[inline]
            fn zero() -> Self {
                <$complex>::new(0.0, 0.0)
            }

            #[inline]
            fn one() -> Self {
                <$complex>::new(1.0, 0.0)
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                <$complex>::new(value as $float, 0.0)
            }

            #[inline]
            fn conjugate(&self) -> Self {
                self.conj()
            }

            #[inline]
            fn norm(&self) -> f64 {
                <$complex>::norm(*self) as f64
            }

            #[inline]
            fn modulus(&self) -> Self {
                <$complex>::new(<$complex>::norm(*self), 0.0)
            }

            #[inline]
            fn real(&self) -> f64 {
                self.re as f64
            }

            #[inline]
            fn signum(&self) -> Self {
                let norm = <$complex>::norm(*self);
                if norm == 0.0 {
                    <Self as Scalar>::one()
                } else {
                    *self / norm
                }
            }

            #[inline]
            fn sqrt(&self) -> Self {
                <$complex>::sqrt(*self)
            }

            #[inline]
            fn epsilon() -> f64 {
                <$float>::EPSILON as f64
            }
        }
    };
}

impl_complex_scalar!(Complex64, f64);
impl_complex_scalar!(Complex32, f32);

impl Scalar for BigRational {
    const IS_COMPLEX: bool = false;

    fn zero() -> Self {
        <BigRational as Zero>::zero()
    }

    fn one() -> Self {
        <BigRational as One>::one()
    }

    /// Exact value of a finite float; zero for NaN and infinities
    fn from_f64(value: f64) -> Self {
        BigRational::from_float(value).unwrap_or_else(<BigRational as Zero>::zero)
    }

    fn conjugate(&self) -> Self {
        self.clone()
    }

    fn norm(&self) -> f64 {
        Scalar::real(self).abs()
    }

    fn modulus(&self) -> Self {
        self.abs()
    }

    fn real(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    fn signum(&self) -> Self {
        if self.is_negative() {
            -<Self as Scalar>::one()
        } else {
            <Self as Scalar>::one()
        }
    }

    /// Square roots leave the rationals: `⌊√(p q 4^k)⌋ / (q 2^k)`, relative
    /// error below `2^-128`. Zero for non-positive input.
    fn sqrt(&self) -> Self {
        if !self.is_positive() {
            return <BigRational as Zero>::zero();
        }
        let scaled = (self.numer() * self.denom()) << (2 * RATIONAL_SQRT_BITS);
        BigRational::new(scaled.sqrt(), self.denom() << RATIONAL_SQRT_BITS)
    }

    fn epsilon() -> f64 {
        0.0
    }
}

impl Scalar for BigDecimal {
    const IS_COMPLEX: bool = false;

    fn zero() -> Self {
        <BigDecimal as Zero>::zero()
    }

    fn one() -> Self {
        <BigDecimal as One>::one()
    }

    /// Zero for NaN and infinities
    fn from_f64(value: f64) -> Self {
        <BigDecimal as FromPrimitive>::from_f64(value).unwrap_or_else(<BigDecimal as Zero>::zero)
    }

    fn conjugate(&self) -> Self {
        self.clone()
    }

    fn norm(&self) -> f64 {
        Scalar::real(self).abs()
    }

    fn modulus(&self) -> Self {
        self.abs()
    }

    fn real(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    fn signum(&self) -> Self {
        if self.is_negative() {
            -<Self as Scalar>::one()
        } else {
            <Self as Scalar>::one()
        }
    }

    /// Rounded to the crate's division precision; zero for negative input
    fn sqrt(&self) -> Self {
        BigDecimal::sqrt(self).unwrap_or_else(<BigDecimal as Zero>::zero)
    }

    /// Division and square roots round to 100 significant digits
    fn epsilon() -> f64 {
        1e-90
    }
}

/// Threshold below which a quantity counts as negligible
///
/// Used by Householder generation to decide that a vector is already
/// aligned with its first axis. Defaults to the domain's epsilon and can be
/// overridden per session through [`DispatchConfig::with_tolerance`].
///
/// [`DispatchConfig::with_tolerance`]: crate::DispatchConfig::with_tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    epsilon: f64,
}

impl Tolerance {
    /// Tolerance with an explicit relative epsilon
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    /// Default tolerance for a scalar domain
    pub fn of<T: Scalar>() -> Self {
        Self::new(T::epsilon())
    }

    /// Relative epsilon
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// `true` when `value` is negligible compared to `reference`
    ///
    /// # Example
    ///
    /// ```
    /// use rayo::Tolerance;
    ///
    /// let tol = Tolerance::new(1e-12);
    /// assert!(tol.is_small(1.0, 1e-14));
    /// assert!(!tol.is_small(1.0, 1e-6));
    /// ```
    #[inline]
    pub fn is_small(&self, reference: f64, value: f64) -> bool {
        value.abs() <= self.epsilon * reference.abs()
    }
}
