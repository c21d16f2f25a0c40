// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use regex::Regex;

use crate::error::AffineError;

/// A closed interval of reals `[lower, upper]`, possibly unbounded or empty.
///
/// This is the plain range type the affine forms project onto. Its arithmetic
/// uses the ambient rounding mode, just like [`AffineForm`](crate::AffineForm)
/// itself, so enclosures are tight but not rigorous at the last bit.
///
/// Every constructor normalises inverted or NaN bounds to [`Interval::EMPTY`],
/// so two empty intervals always compare equal.
/// Arithmetic results whose endpoints overflow are widened outward rather than
/// becoming empty: a lower bound of `+inf` is replaced by `f64::MAX` and an
/// upper bound of `-inf` by `-f64::MAX`.
#[derive(
    Copy, Clone, Debug, PartialEq, serde_with::DeserializeFromStr, serde_with::SerializeDisplay,
)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl Interval {
    /// The empty set.
    pub const EMPTY: Interval = Interval {
        lower: f64::INFINITY,
        upper: f64::NEG_INFINITY,
    };

    /// The whole real line `(-inf, +inf)`.
    pub const ALL_REALS: Interval = Interval {
        lower: f64::NEG_INFINITY,
        upper: f64::INFINITY,
    };

    /// The degenerate interval `[0, 0]`.
    pub const ZERO: Interval = Interval {
        lower: 0.0,
        upper: 0.0,
    };

    /// The degenerate interval `[1, 1]`.
    pub const ONE: Interval = Interval {
        lower: 1.0,
        upper: 1.0,
    };

    /// The range `[-1, 1]` of a single noise symbol.
    pub const PM_ONE: Interval = Interval {
        lower: -1.0,
        upper: 1.0,
    };

    /// Creates the interval `[lower, upper]`.
    ///
    /// Returns [`Interval::EMPTY`] if `lower > upper`, if either bound is NaN,
    /// or if the bounds lie entirely beyond the reals (`lower == +inf` or
    /// `upper == -inf`).
    ///
    /// # Example
    ///
    /// ```
    /// # use affine_form::Interval;
    /// #
    /// let x = Interval::new(2.0, 4.0);
    /// assert_eq!(x.mid(), 3.0);
    /// assert!(Interval::new(4.0, 2.0).is_empty());
    /// ```
    pub fn new(lower: f64, upper: f64) -> Self {
        if lower <= upper && lower != f64::INFINITY && upper != f64::NEG_INFINITY {
            Self { lower, upper }
        } else {
            Self::EMPTY
        }
    }

    /// Builds an arithmetic result, pulling overflowed endpoints back onto
    /// the largest finite value so the result stays non-empty.
    fn outward(lower: f64, upper: f64) -> Self {
        let lower = if lower == f64::INFINITY { f64::MAX } else { lower };
        let upper = if upper == f64::NEG_INFINITY { -f64::MAX } else { upper };
        Self::new(lower, upper)
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }

    /// Returns true if at least one endpoint is infinite.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        !self.is_empty() && (self.lower == f64::NEG_INFINITY || self.upper == f64::INFINITY)
    }

    /// Returns true if the interval extends to `-inf`.
    #[inline]
    pub fn is_unbounded_below(&self) -> bool {
        !self.is_empty() && self.lower == f64::NEG_INFINITY
    }

    /// Returns true if the interval extends to `+inf`.
    #[inline]
    pub fn is_unbounded_above(&self) -> bool {
        !self.is_empty() && self.upper == f64::INFINITY
    }

    /// Returns the midpoint.
    ///
    /// The midpoint of a one-sided interval is the largest finite value on
    /// the unbounded side, that of the real line is 0 and that of the empty
    /// set is NaN.
    pub fn mid(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        match (self.is_unbounded_below(), self.is_unbounded_above()) {
            (true, true) => 0.0,
            (true, false) => -f64::MAX,
            (false, true) => f64::MAX,
            (false, false) => {
                let mid = 0.5 * (self.lower + self.upper);
                if mid.is_finite() {
                    mid
                } else {
                    0.5 * self.lower + 0.5 * self.upper
                }
            }
        }
    }

    /// Returns the radius, i.e. the largest distance from the midpoint to an
    /// endpoint. The radius of the empty set is 0.
    pub fn rad(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else if self.is_unbounded() {
            f64::INFINITY
        } else {
            let mid = self.mid();
            (mid - self.lower).max(self.upper - mid)
        }
    }

    /// Returns the width `upper - lower`. The diameter of the empty set is 0.
    pub fn diam(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.upper - self.lower
        }
    }

    /// Returns the magnitude, the largest absolute value in the interval.
    /// The magnitude of the empty set is NaN.
    pub fn mag(&self) -> f64 {
        if self.is_empty() {
            f64::NAN
        } else {
            self.lower.abs().max(self.upper.abs())
        }
    }

    /// Returns the mignitude, the smallest absolute value in the interval.
    pub fn mig(&self) -> f64 {
        if self.is_empty() {
            f64::NAN
        } else if self.contains(0.0) {
            0.0
        } else {
            self.lower.abs().min(self.upper.abs())
        }
    }

    /// Returns `{ |x| : x in self }`.
    pub fn abs(&self) -> Self {
        if self.is_empty() {
            Self::EMPTY
        } else {
            Self::new(self.mig(), self.mag())
        }
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    /// Returns true if every point of `self` lies in `other`.
    /// The empty set is a subset of everything.
    pub fn is_subset(&self, other: &Interval) -> bool {
        self.is_empty() || (other.lower <= self.lower && self.upper <= other.upper)
    }

    /// Raises the interval to a non-negative integer power.
    ///
    /// Even powers of an interval straddling zero start at zero, which makes
    /// this tighter than repeated multiplication.
    ///
    /// # Example
    ///
    /// ```
    /// # use affine_form::Interval;
    /// #
    /// assert_eq!(Interval::new(-2.0, 3.0).powi(2), Interval::new(0.0, 9.0));
    /// assert_eq!(Interval::new(-2.0, 3.0).powi(3), Interval::new(-8.0, 27.0));
    /// ```
    pub fn powi(&self, n: u32) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        match n {
            0 => Self::ONE,
            1 => *self,
            n if n % 2 == 0 => Self::outward(pow(self.mig(), n), pow(self.mag(), n)),
            n => Self::outward(pow(self.lower, n), pow(self.upper, n)),
        }
    }
}

fn pow(x: f64, n: u32) -> f64 {
    match i32::try_from(n) {
        Ok(n) => x.powi(n),
        Err(_) => x.powf(f64::from(n)),
    }
}

/// Product of two endpoints, taking `0 * inf` as 0.
#[inline]
fn mul_endpoints(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

impl Default for Interval {
    /// The real line, the interval that assumes nothing.
    fn default() -> Self {
        Self::ALL_REALS
    }
}

impl From<f64> for Interval {
    /// Converts a scalar to a point interval.
    ///
    /// An infinite scalar lies beyond every real, so it becomes the one-sided
    /// interval between the largest finite value and that infinity; NaN
    /// carries no information and becomes the real line.
    fn from(x: f64) -> Self {
        if x.is_finite() {
            Self { lower: x, upper: x }
        } else if x == f64::INFINITY {
            Self::new(f64::MAX, f64::INFINITY)
        } else if x == f64::NEG_INFINITY {
            Self::new(f64::NEG_INFINITY, -f64::MAX)
        } else {
            Self::ALL_REALS
        }
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        if self.is_empty() {
            self
        } else {
            Interval {
                lower: -self.upper,
                upper: -self.lower,
            }
        }
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            Self::EMPTY
        } else {
            Self::outward(self.lower + rhs.lower, self.upper + rhs.upper)
        }
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        self + (-rhs)
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Self::EMPTY;
        }
        let products = [
            mul_endpoints(self.lower, rhs.lower),
            mul_endpoints(self.lower, rhs.upper),
            mul_endpoints(self.upper, rhs.lower),
            mul_endpoints(self.upper, rhs.upper),
        ];
        let lower = products.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = products.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self::outward(lower, upper)
    }
}

macro_rules! impl_arithmetic_scalar {
    ($Op:ident, $op:ident) => {
        impl $Op<f64> for Interval {
            type Output = Interval;

            fn $op(self, rhs: f64) -> Interval {
                <Interval as $Op<Interval>>::$op(self, Interval::from(rhs))
            }
        }

        impl $Op<Interval> for f64 {
            type Output = Interval;

            fn $op(self, rhs: Interval) -> Interval {
                <Interval as $Op<Interval>>::$op(Interval::from(self), rhs)
            }
        }
    };
}

impl_arithmetic_scalar!(Add, add);
impl_arithmetic_scalar!(Sub, sub);
impl_arithmetic_scalar!(Mul, mul);

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[empty]")
        } else {
            write!(f, "[{}, {}]", self.lower, self.upper)
        }
    }
}

impl FromStr for Interval {
    type Err = AffineError;

    /// Parses `[lower, upper]`, `[x]` or `[empty]`.
    ///
    /// Bounds are anything `f64::from_str` accepts, so `inf` and `-inf` mark
    /// unbounded ends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let re = Regex::new(r"^\s*\[\s*(?:(empty)|([^,\s\]]+)\s*(?:,\s*([^,\s\]]+)\s*)?)\]\s*$")
            .map_err(|e| AffineError::Parse(e.to_string()))?;
        let caps = re.captures(s).ok_or(AffineError::Parse(s.into()))?;
        if caps.get(1).is_some() {
            return Ok(Self::EMPTY);
        }
        let lower_str = caps.get(2).ok_or(AffineError::Parse(s.into()))?.as_str();
        let lower = f64::from_str(lower_str).map_err(|_e| AffineError::Parse(s.into()))?;
        let upper = caps
            .get(3)
            .map_or(Ok(lower), |m| f64::from_str(m.as_str()))
            .map_err(|_e| AffineError::Parse(s.into()))?;
        let parsed = Self::new(lower, upper);
        if parsed.is_empty() {
            // Only the literal `[empty]` denotes the empty set
            Err(AffineError::Parse(s.into()))
        } else {
            Ok(parsed)
        }
    }
}
