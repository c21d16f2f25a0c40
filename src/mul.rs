// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use num_traits::{One, Pow};
use tracing::trace;

use crate::{AffineForm, Interval, affine::Repr, saxpy::Reconciled};

/// Width below which [`AffineForm::sqr`] squares the projected interval
/// instead of the linear part: there is no correlation left worth keeping.
pub const SQR_TIGHTNESS: f64 = 2.7755575615628914e-17; // 2^-55

impl AffineForm {
    /// Multiplies the form by an interval.
    ///
    /// The linear part is scaled by the midpoint of `y`. The error is scaled
    /// by the magnitude of `y` and grows by the radius of `y` times the
    /// magnitude of the linear part, which covers the deviation of `y` from
    /// its midpoint. A degenerate form or an empty or unbounded `y` is handled
    /// by interval multiplication.
    ///
    /// # Example
    ///
    /// ```
    /// # use affine_form::{AffineForm, Interval};
    /// #
    /// let mut x = AffineForm::with_symbol(1, 1, Interval::new(2.0, 4.0));
    /// x.mul_interval(Interval::new(0.0, 0.0));
    /// assert_eq!(x.values(), Some(&[0.0, 0.0][..]));
    /// assert_eq!(x.itv(), Interval::new(0.0, 0.0));
    /// ```
    pub fn mul_interval(&mut self, y: Interval) -> &mut Self {
        if !self.is_active() || y.is_empty() || y.is_unbounded() {
            let itv = self.itv() * y;
            self.assign_interval(itv);
            return self;
        }
        if let Repr::Active { values, error } = &mut self.repr {
            let (mid, rad) = (y.mid(), y.rad());
            let linear = values.iter().map(|v| v.abs()).sum::<f64>();
            values.iter_mut().for_each(|v| *v *= mid);
            *error = *error * y.mag() + rad * linear;
        }
        self.ensure_finite();
        self
    }

    /// Multiplies the form by another one.
    ///
    /// For forms over the same noise symbols the product is linearised
    /// around the central values:
    ///
    /// - central value `x0·y0 + ½·Σ xi·yi`,
    /// - coefficients `x0·yi + y0·xi`,
    /// - error `|y0|·ex + |x0|·ey + (ex + Σ|xi|)·(ey + Σ|yi|) - ½·Σ|xi·yi|`.
    ///
    /// The ½ terms use that `εi²` lies in [0, 1], so its midpoint ½ is exact
    /// and only half of each diagonal product counts as error.
    /// Forms over different symbols are reconciled as for addition, and a
    /// degenerate operand falls back to interval multiplication.
    pub fn mul_form(&mut self, y: &AffineForm) -> &mut Self {
        if !self.is_active() || !y.is_active() {
            let itv = self.itv() * y.itv();
            self.assign_interval(itv);
            return self;
        }
        match self.reconcile(y) {
            Reconciled::Aligned(y_values, y_error) => {
                if let Repr::Active { values, error } = &mut self.repr {
                    *error = mul_aligned(values, *error, y_values, y_error);
                }
                self.ensure_finite();
            }
            Reconciled::Folded(r) => {
                self.mul_interval(r);
            }
        }
        self
    }

    /// Squares the form.
    ///
    /// Tighter than multiplying the form by itself whenever the fallback to
    /// interval squaring applies, and identical in the linear case, where the
    /// diagonal terms `xi²·εi²` are known to be non-negative:
    ///
    /// - central value `x0² + ½·Σ xi²`,
    /// - coefficients `2·x0·xi`,
    /// - error `2·|x0|·e - ½·Σ xi² + (e + Σ|xi|)²`.
    ///
    /// Degenerate, unbounded or nearly exact forms (width below
    /// [`SQR_TIGHTNESS`]) are squared as intervals.
    ///
    /// # Example
    ///
    /// ```
    /// # use affine_form::{AffineForm, Interval};
    /// #
    /// let mut x = AffineForm::with_symbol(1, 1, Interval::new(-1.0, 3.0));
    /// x.sqr();
    /// // 1 + 2ε1 squared is 1 + 4ε1 + 4ε1², with 4ε1² in 2 ± 2
    /// assert_eq!(x.values(), Some(&[3.0, 4.0][..]));
    /// assert_eq!(x.err(), 2.0);
    /// ```
    pub fn sqr(&mut self) -> &mut Self {
        let itv = self.itv();
        if !self.is_active() || itv.is_unbounded() || itv.diam() < SQR_TIGHTNESS {
            trace!(state = ?self.state(), "squaring as an interval");
            self.assign_interval(itv.powi(2));
            return self;
        }
        if let Repr::Active { values, error } = &mut self.repr {
            let x0 = values[0];
            let (sx, sx2) = values[1..]
                .iter()
                .fold((0.0, 0.0), |(sx, sx2), v| (sx + v.abs(), sx2 + v * v));
            values[0] = x0 * x0 + 0.5 * sx2;
            values[1..].iter_mut().for_each(|v| *v *= 2.0 * x0);
            // Non-negative since (e + Σ|xi|)² ≥ Σ xi²
            *error = 2.0 * x0.abs() * *error - 0.5 * sx2 + (*error + sx).powi(2);
        }
        self.ensure_finite();
        self
    }
}

/// Overwrites `values` with the linearised product and returns the new error.
fn mul_aligned(values: &mut [f64], error: f64, y_values: &[f64], y_error: f64) -> f64 {
    let (x0, y0) = (values[0], y_values[0]);
    let (mut sx, mut sy, mut sz, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for (x, y) in values[1..].iter().zip(&y_values[1..]) {
        let product = x * y;
        sz += product;
        sxy += product.abs();
        sx += x.abs();
        sy += y.abs();
    }
    values[0] = x0 * y0 + 0.5 * sz;
    for (x, y) in values[1..].iter_mut().zip(&y_values[1..]) {
        *x = x0 * y + y0 * *x;
    }
    y0.abs() * error + x0.abs() * y_error + (error + sx) * (y_error + sy) - 0.5 * sxy
}

impl Pow<u32> for &AffineForm {
    type Output = AffineForm;

    /// Raises the form to a non-negative integer power by repeated squaring.
    ///
    /// `x⁰` is exactly 1 unless `x` is empty.
    fn pow(self, n: u32) -> AffineForm {
        if n == 0 {
            return if matches!(self.repr, Repr::Empty) {
                self.clone()
            } else {
                AffineForm::one()
            };
        }
        let mut base = self.clone();
        let mut result: Option<AffineForm> = None;
        let mut n = n;
        loop {
            if n & 1 == 1 {
                result = Some(match result {
                    None => base.clone(),
                    Some(mut acc) => {
                        acc.mul_form(&base);
                        acc
                    }
                });
            }
            n >>= 1;
            if n == 0 {
                break;
            }
            base.sqr();
        }
        result.unwrap_or_else(AffineForm::one)
    }
}

impl Pow<u32> for AffineForm {
    type Output = AffineForm;

    #[inline]
    fn pow(self, n: u32) -> AffineForm {
        (&self).pow(n)
    }
}
