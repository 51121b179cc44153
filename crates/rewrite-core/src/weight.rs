// Weight semirings: the algebra every transducer algorithm is generic over.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Default comparison and quantization delta for float weights.
pub const DELTA: f32 = 1.0 / 1024.0;

/// A weight semiring.
///
/// `plus` combines alternative paths, `times` extends a path with another
/// segment. `zero` annihilates `times` and is the identity of `plus`; `one`
/// is the identity of `times`.
///
/// Weighted determinization additionally needs `divide` (the semiring must be
/// weakly left-divisible) and `quantize`, which maps nearly equal weights to
/// the same representative so they hash identically.
pub trait Semiring: Clone + fmt::Debug + fmt::Display + PartialEq + Eq + Hash + Send + Sync + 'static {
    fn zero() -> Self;
    fn one() -> Self;
    fn plus(&self, rhs: &Self) -> Self;
    fn times(&self, rhs: &Self) -> Self;

    /// Left division: the `x` with `rhs ⊗ x = self`. `None` when `rhs` is zero.
    fn divide(&self, rhs: &Self) -> Option<Self>;

    /// Approximate equality within `delta`.
    fn approx_eq(&self, rhs: &Self, delta: f32) -> bool;

    /// Round to a multiple of `delta`.
    fn quantize(&self, delta: f32) -> Self;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    fn is_one(&self) -> bool {
        *self == Self::one()
    }
}

/// Natural order of a semiring with the path property.
///
/// `a` is naturally less than `b` when `a ⊕ b = a` and `a ≠ b`; "less" means
/// "better". Only semirings whose `plus` selects one of its arguments (the
/// path property) have a total natural order, and shortest-path and
/// optimal-only determinization are only meaningful for them.
pub trait NaturalOrder: Semiring {
    fn natural_less(&self, rhs: &Self) -> bool;

    /// `self <= rhs` in the natural order, tolerating float noise.
    fn natural_less_or_close(&self, rhs: &Self, delta: f32) -> bool {
        self.natural_less(rhs) || self.approx_eq(rhs, delta)
    }
}

/// Tropical semiring over `f32`: `plus` is `min`, `times` is `+`,
/// zero is `+inf` and one is `0`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TropicalWeight(f32);

impl TropicalWeight {
    pub const INFINITY: Self = Self(f32::INFINITY);

    /// Create a weight. Negative zero is normalized so equal weights hash equally.
    #[inline]
    pub fn new(value: f32) -> Self {
        if value == 0.0 { Self(0.0) } else { Self(value) }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.0
    }
}

impl From<f32> for TropicalWeight {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl PartialEq for TropicalWeight {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

// NaN weights are not supported; archive decoding rejects them.
impl Eq for TropicalWeight {}

impl Hash for TropicalWeight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for TropicalWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_infinite() {
            write!(f, "Infinity")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Semiring for TropicalWeight {
    #[inline]
    fn zero() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn one() -> Self {
        Self(0.0)
    }

    #[inline]
    fn plus(&self, rhs: &Self) -> Self {
        if rhs.0 < self.0 { *rhs } else { *self }
    }

    #[inline]
    fn times(&self, rhs: &Self) -> Self {
        if self.0.is_infinite() || rhs.0.is_infinite() {
            Self::INFINITY
        } else {
            Self::new(self.0 + rhs.0)
        }
    }

    fn divide(&self, rhs: &Self) -> Option<Self> {
        if rhs.0.is_infinite() {
            None
        } else if self.0.is_infinite() {
            Some(Self::INFINITY)
        } else {
            Some(Self::new(self.0 - rhs.0))
        }
    }

    fn approx_eq(&self, rhs: &Self, delta: f32) -> bool {
        if self.0.is_infinite() || rhs.0.is_infinite() {
            return self.0 == rhs.0;
        }
        (self.0 - rhs.0).abs() <= delta
    }

    fn quantize(&self, delta: f32) -> Self {
        if self.0.is_infinite() {
            *self
        } else {
            Self::new((self.0 / delta + 0.5).floor() * delta)
        }
    }
}

impl NaturalOrder for TropicalWeight {
    #[inline]
    fn natural_less(&self, rhs: &Self) -> bool {
        self.0 < rhs.0
    }
}
