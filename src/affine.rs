// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::{fmt, ops::Index};

use tracing::trace;

use crate::{
    Enclosure, Interval,
    error::{AffineError, Result},
};

/// The kind of enclosure an [`AffineForm`] currently holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AffineState {
    /// A linear form over the given number of noise symbols.
    Active(usize),
    /// The empty set.
    Empty,
    /// The whole real line.
    AllReals,
    /// `[bound, +inf)`.
    BoundedBelow,
    /// `(-inf, bound]`.
    BoundedAbove,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Repr {
    /// `values[0]` is the central value, `values[i]` the coefficient of noise
    /// symbol `i`. Never empty, and every entry and `error` are finite.
    Active { values: Vec<f64>, error: f64 },
    Empty,
    AllReals,
    BoundedBelow(f64),
    BoundedAbove(f64),
}

/// An affine form enclosing a real quantity.
///
/// Represents `x0 + x1·ε1 + … + xn·εn ± e`, where every noise symbol `εi`
/// ranges over [-1, 1] and `e ≥ 0` bounds everything the linear part does not
/// capture. Forms that share noise symbols stay correlated through arithmetic,
/// which is what makes their enclosures tighter than interval arithmetic on
/// expressions like `x - x` or `x * (1 - x)`.
///
/// When an exact linear description is impossible the form degrades to one of
/// four symbol-free states (see [`AffineState`]). Operations never fail: any
/// step that would produce a non-finite coefficient turns the form into the
/// whole real line instead.
///
/// This variant does no rounding control, so enclosures can miss the true
/// range by a few ulps.
#[derive(Debug, PartialEq)]
pub struct AffineForm {
    pub(crate) repr: Repr,
}

impl AffineForm {
    /// Creates a form over `n` noise symbols enclosing `itv`, attaching the
    /// whole width of `itv` to noise symbol `m`.
    ///
    /// With `m == 0` the width goes into the error term instead, so the form
    /// is uncorrelated with everything. An empty or unbounded `itv` gives the
    /// same degenerate form as `AffineForm::from(itv)`.
    ///
    /// This is how each input variable of a problem gets its own noise symbol.
    ///
    /// # Panics
    ///
    /// Panics if `m > n`. See [`AffineForm::try_with_symbol`] for a checked
    /// version.
    ///
    /// # Example
    ///
    /// ```
    /// # use affine_form::{AffineForm, Interval};
    /// #
    /// let x = AffineForm::with_symbol(1, 1, Interval::new(2.0, 4.0));
    /// assert_eq!(x.mid(), 3.0);
    /// assert_eq!(x[1], 1.0);
    /// assert_eq!(x.err(), 0.0);
    /// assert_eq!(x.itv(), Interval::new(2.0, 4.0));
    /// ```
    pub fn with_symbol(n: usize, m: usize, itv: Interval) -> Self {
        assert!(m <= n, "noise symbol position {m} is out of range for a form with {n} symbols");
        if itv.is_empty() || itv.is_unbounded() {
            return Self::from(itv);
        }
        let mut values = vec![0.0; n + 1];
        values[0] = itv.mid();
        let error = if m == 0 {
            itv.rad()
        } else {
            values[m] = itv.rad();
            0.0
        };
        Self {
            repr: Repr::Active { values, error },
        }
    }

    /// Like [`AffineForm::with_symbol`] but returns an error instead of
    /// panicking when `m > n`.
    pub fn try_with_symbol(n: usize, m: usize, itv: Interval) -> Result<Self> {
        if m > n {
            Err(AffineError::SymbolOutOfRange { position: m, size: n })
        } else {
            Ok(Self::with_symbol(n, m, itv))
        }
    }

    /// Returns the state tag of the form.
    pub fn state(&self) -> AffineState {
        match &self.repr {
            Repr::Active { values, .. } => AffineState::Active(values.len() - 1),
            Repr::Empty => AffineState::Empty,
            Repr::AllReals => AffineState::AllReals,
            Repr::BoundedBelow(_) => AffineState::BoundedBelow,
            Repr::BoundedAbove(_) => AffineState::BoundedAbove,
        }
    }

    /// Returns true if the form carries a linear part.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.repr, Repr::Active { .. })
    }

    /// Returns the number of noise symbols of an active form.
    #[inline]
    pub fn size(&self) -> Option<usize> {
        match &self.repr {
            Repr::Active { values, .. } => Some(values.len() - 1),
            _ => None,
        }
    }

    /// Returns the central value followed by the noise symbol coefficients.
    #[inline]
    pub fn values(&self) -> Option<&[f64]> {
        match &self.repr {
            Repr::Active { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Returns entry `i` of an active form, or `None` if there is no such entry.
    #[inline]
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values().and_then(|values| values.get(i).copied())
    }

    /// Returns the error term.
    ///
    /// For one-sided forms this is the finite bound, for the empty form 0 and
    /// for the real line `+inf`.
    pub fn err(&self) -> f64 {
        match self.repr {
            Repr::Active { error, .. } => error,
            Repr::BoundedBelow(bound) | Repr::BoundedAbove(bound) => bound,
            Repr::Empty => 0.0,
            Repr::AllReals => f64::INFINITY,
        }
    }

    /// Returns the interval `[x0 - w, x0 + w]` with `w` the sum of the
    /// absolute coefficients and the error.
    pub fn itv(&self) -> Interval {
        match &self.repr {
            Repr::Active { values, error } => {
                let center = values[0];
                let radius = values[1..].iter().map(|v| v.abs()).sum::<f64>() + error;
                Interval::new(center - radius, center + radius)
            }
            Repr::Empty => Interval::EMPTY,
            Repr::AllReals => Interval::ALL_REALS,
            Repr::BoundedBelow(bound) => Interval::new(*bound, f64::INFINITY),
            Repr::BoundedAbove(bound) => Interval::new(f64::NEG_INFINITY, *bound),
        }
    }

    /// Returns the central value of an active form, or the midpoint of the
    /// projected interval otherwise.
    pub fn mid(&self) -> f64 {
        match &self.repr {
            Repr::Active { values, .. } => values[0],
            _ => self.itv().mid(),
        }
    }

    /// Replaces the form by the one built from `itv`.
    ///
    /// The coefficient buffer is kept if the form already has no noise
    /// symbols.
    pub fn assign_interval(&mut self, itv: Interval) {
        if itv.is_empty() {
            self.repr = Repr::Empty;
        } else if itv.is_unbounded_below() && itv.is_unbounded_above() {
            self.repr = Repr::AllReals;
        } else if itv.is_unbounded_above() {
            self.repr = Repr::BoundedBelow(itv.lower());
        } else if itv.is_unbounded_below() {
            self.repr = Repr::BoundedAbove(itv.upper());
        } else {
            self.set_constant(itv.mid(), itv.rad());
        }
    }

    /// Replaces the form by the one built from the scalar `d`.
    pub fn assign_scalar(&mut self, d: f64) {
        if d.is_finite() {
            self.set_constant(d, 0.0);
        } else if d == f64::INFINITY {
            self.repr = Repr::BoundedBelow(f64::MAX);
        } else if d == f64::NEG_INFINITY {
            self.repr = Repr::BoundedAbove(-f64::MAX);
        } else {
            self.repr = Repr::AllReals;
        }
    }

    /// Makes the form `center ± error` with no noise symbols.
    fn set_constant(&mut self, center: f64, error: f64) {
        match &mut self.repr {
            Repr::Active { values, error: e } if values.len() == 1 => {
                values[0] = center;
                *e = error;
            }
            repr => {
                *repr = Repr::Active {
                    values: vec![center],
                    error,
                }
            }
        }
    }

    /// Degrades the form to the real line if any coefficient or the error is
    /// no longer finite.
    pub(crate) fn ensure_finite(&mut self) {
        let overflowed = match &self.repr {
            Repr::Active { values, error } => {
                debug_assert!(
                    error.is_nan() || *error >= 0.0,
                    "negative affine error term {error}"
                );
                !error.is_finite() || values.iter().any(|v| !v.is_finite())
            }
            _ => false,
        };
        if overflowed {
            trace!(state = ?self.state(), "affine form overflowed, degrading to all reals");
            self.repr = Repr::AllReals;
        }
    }
}

impl Default for AffineForm {
    /// The real line, the form that assumes nothing.
    fn default() -> Self {
        Self {
            repr: Repr::AllReals,
        }
    }
}

impl Clone for AffineForm {
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
        }
    }

    /// Copies `source` into `self`, reusing the coefficient buffer when both
    /// forms are active.
    fn clone_from(&mut self, source: &Self) {
        match (&mut self.repr, &source.repr) {
            (
                Repr::Active { values, error },
                Repr::Active {
                    values: source_values,
                    error: source_error,
                },
            ) => {
                values.clone_from(source_values);
                *error = *source_error;
            }
            (repr, source_repr) => *repr = source_repr.clone(),
        }
    }
}

impl From<f64> for AffineForm {
    /// Converts a scalar to an exact form with no noise symbols.
    ///
    /// `+inf` and `-inf` become the one-sided forms bounded by `f64::MAX` and
    /// `-f64::MAX` respectively, and NaN becomes the real line.
    fn from(d: f64) -> Self {
        let mut form = Self::default();
        form.assign_scalar(d);
        form
    }
}

impl From<Interval> for AffineForm {
    /// Converts an interval to a form with no noise symbols, its midpoint as
    /// central value and its radius as error.
    ///
    /// Empty and unbounded intervals become the matching degenerate form,
    /// keeping the finite endpoint of one-sided intervals.
    fn from(itv: Interval) -> Self {
        let mut form = Self::default();
        form.assign_interval(itv);
        form
    }
}

impl From<&AffineForm> for Interval {
    fn from(x: &AffineForm) -> Interval {
        x.itv()
    }
}

impl Enclosure for AffineForm {
    #[inline]
    fn itv(&self) -> Interval {
        AffineForm::itv(self)
    }

    #[inline]
    fn mid(&self) -> f64 {
        AffineForm::mid(self)
    }
}

impl Index<usize> for AffineForm {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        match self.values().and_then(|values| values.get(i)) {
            Some(value) => value,
            None => panic!(
                "index {i} is out of range for an affine form in state {:?}",
                self.state()
            ),
        }
    }
}

impl fmt::Display for AffineForm {
    /// Formats an active form as `x0 + x1·ε1 - x2·ε2 ± e` and a degenerate one
    /// as its interval.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Active { values, error } => {
                write!(f, "{}", values[0])?;
                for (i, v) in values.iter().enumerate().skip(1) {
                    if v.is_sign_negative() {
                        write!(f, " - {}·ε{i}", -v)?;
                    } else {
                        write!(f, " + {v}·ε{i}")?;
                    }
                }
                write!(f, " ± {error}")
            }
            _ => write!(f, "{}", self.itv()),
        }
    }
}
