// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use crate::{AffineForm, Interval, affine::Repr};

/// Outcome of bringing two active forms into one noise symbol space.
pub(crate) enum Reconciled<'a> {
    /// Both forms have the same symbols; holds the other form's entries and
    /// error.
    Aligned(&'a [f64], f64),
    /// The form with fewer symbols was folded into this interval, and `self`
    /// now carries the symbols of the larger one.
    Folded(Interval),
}

impl AffineForm {
    /// Prepares a binary operation between `self` and `other`, both active.
    ///
    /// Forms over different symbol spaces share no correspondence between
    /// their symbols, so the one with fewer symbols is only kept as its
    /// interval. If that is `self`, it takes over a copy of `other` first.
    /// The caller then applies the operation either entry-wise or as an
    /// interval operation on `self`.
    pub(crate) fn reconcile<'a>(&mut self, other: &'a AffineForm) -> Reconciled<'a> {
        match (self.size(), &other.repr) {
            (Some(n), Repr::Active { values, error }) if n + 1 == values.len() => {
                Reconciled::Aligned(values, *error)
            }
            (Some(n), Repr::Active { values, .. }) if n + 1 > values.len() => {
                Reconciled::Folded(other.itv())
            }
            _ => {
                let folded = self.itv();
                self.clone_from(other);
                Reconciled::Folded(folded)
            }
        }
    }

    /// Applies up to four linear steps in one pass, in this order:
    ///
    /// 1. `alpha`: multiply the form by a scalar,
    /// 2. `y`: add another form,
    /// 3. `beta`: add a constant,
    /// 4. `delta`: widen the error by `|delta|`.
    ///
    /// Steps passed as `None` are skipped. Whenever a step cannot be expressed
    /// on the linear part (a degenerate form, an infinite scalar) it is applied
    /// to the projected interval instead and the result reclassified. If any
    /// coefficient ends up non-finite the form becomes the real line.
    ///
    /// # Example
    ///
    /// ```
    /// # use affine_form::{AffineForm, Interval};
    /// #
    /// let x = AffineForm::with_symbol(2, 1, Interval::new(0.0, 2.0));
    /// let y = AffineForm::with_symbol(2, 2, Interval::new(1.0, 3.0));
    /// // z = 2x + y - 1 ± 0.5
    /// let mut z = x.clone();
    /// z.saxpy(Some(2.0), Some(&y), Some(-1.0), Some(0.5));
    /// assert_eq!(z.values(), Some(&[3.0, 2.0, 1.0][..]));
    /// assert_eq!(z.err(), 0.5);
    /// assert_eq!(z.itv(), Interval::new(-0.5, 6.5));
    /// ```
    pub fn saxpy(
        &mut self,
        alpha: Option<f64>,
        y: Option<&AffineForm>,
        beta: Option<f64>,
        delta: Option<f64>,
    ) -> &mut Self {
        if let Some(alpha) = alpha {
            self.scale_step(alpha);
        }
        if let Some(y) = y {
            self.add_form_step(y);
        }
        if let Some(beta) = beta {
            self.add_constant_step(beta);
        }
        if let Some(delta) = delta {
            self.add_error_step(delta);
        }
        self.ensure_finite();
        self
    }

    /// Adds an interval: its midpoint as a constant and its radius as error.
    pub(crate) fn add_interval(&mut self, r: Interval) -> &mut Self {
        if self.is_active() && !r.is_empty() && !r.is_unbounded() {
            self.add_constant_step(r.mid());
            self.add_error_step(r.rad());
        } else {
            let itv = self.itv() + r;
            self.assign_interval(itv);
        }
        self.ensure_finite();
        self
    }

    /// Negates the form in place; one-sided forms swap direction.
    pub(crate) fn negate(&mut self) -> &mut Self {
        self.repr = match std::mem::replace(&mut self.repr, Repr::Empty) {
            Repr::Active { mut values, error } => {
                values.iter_mut().for_each(|v| *v = -*v);
                Repr::Active { values, error }
            }
            Repr::BoundedBelow(bound) => Repr::BoundedAbove(-bound),
            Repr::BoundedAbove(bound) => Repr::BoundedBelow(-bound),
            repr => repr,
        };
        self
    }

    /// Computes `self - y` as `-(-self + y)`, which is exact in the negations
    /// and needs no temporary form.
    pub(crate) fn sub_form(&mut self, y: &AffineForm) -> &mut Self {
        self.saxpy(Some(-1.0), Some(y), None, None);
        self.negate()
    }

    fn scale_step(&mut self, alpha: f64) {
        if !self.is_active() || !alpha.is_finite() {
            let itv = self.itv() * alpha;
            self.assign_interval(itv);
        } else if let Repr::Active { values, error } = &mut self.repr {
            if alpha == 0.0 {
                // Exact zero, also for coefficients that are about to overflow
                values.fill(0.0);
                *error = 0.0;
            } else {
                values.iter_mut().for_each(|v| *v *= alpha);
                *error *= alpha.abs();
            }
        }
    }

    fn add_form_step(&mut self, y: &AffineForm) {
        if !self.is_active() || !y.is_active() {
            let itv = self.itv() + y.itv();
            self.assign_interval(itv);
            return;
        }
        match self.reconcile(y) {
            Reconciled::Aligned(y_values, y_error) => {
                if let Repr::Active { values, error } = &mut self.repr {
                    values.iter_mut().zip(y_values).for_each(|(v, w)| *v += w);
                    *error += y_error;
                }
            }
            Reconciled::Folded(r) => {
                self.add_interval(r);
            }
        }
    }

    fn add_constant_step(&mut self, beta: f64) {
        match &mut self.repr {
            Repr::Active { values, .. } if beta.is_finite() => values[0] += beta,
            _ => {
                let itv = self.itv() + beta;
                self.assign_interval(itv);
            }
        }
    }

    fn add_error_step(&mut self, delta: f64) {
        match &mut self.repr {
            Repr::Active { error, .. } if delta.is_finite() => *error += delta.abs(),
            _ => {
                let itv = self.itv() + Interval::PM_ONE * delta;
                self.assign_interval(itv);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AffineState;

    fn x() -> AffineForm {
        AffineForm::with_symbol(2, 1, Interval::new(0.0, 2.0))
    }

    fn y() -> AffineForm {
        AffineForm::with_symbol(2, 2, Interval::new(1.0, 3.0))
    }

    #[test]
    fn identity() {
        let mut z = x();
        z.saxpy(Some(1.0), None, None, None);
        assert_eq!(z, x());
        z.saxpy(None, None, None, None);
        assert_eq!(z, x());
    }

    #[test]
    fn scale() {
        let mut z = x();
        z.saxpy(Some(-3.0), None, None, None);
        assert_eq!(z.values(), Some(&[-3.0, -3.0, 0.0][..]));
        assert_eq!(z.err(), 0.0);
        assert_eq!(z.itv(), Interval::new(-6.0, 0.0));
    }

    #[test]
    fn scale_error_by_magnitude() {
        let mut z = AffineForm::with_symbol(1, 0, Interval::new(1.0, 3.0));
        z.saxpy(Some(-2.0), None, None, None);
        assert_eq!(z.mid(), -4.0);
        assert_eq!(z.err(), 2.0);
    }

    #[test]
    fn scale_by_zero_is_exact() {
        let mut z = x();
        z.saxpy(Some(0.0), None, None, None);
        assert_eq!(z.state(), AffineState::Active(2));
        assert_eq!(z.itv(), Interval::ZERO);
    }

    #[test]
    fn scale_by_infinity() {
        let mut z = AffineForm::with_symbol(1, 1, Interval::new(1.0, 2.0));
        z.saxpy(Some(f64::INFINITY), None, None, None);
        assert_eq!(z.state(), AffineState::BoundedBelow);
    }

    #[test]
    fn add_same_symbols() {
        let mut z = x();
        z.saxpy(None, Some(&y()), None, None);
        assert_eq!(z.values(), Some(&[3.0, 1.0, 1.0][..]));
        assert_eq!(z.itv(), Interval::new(1.0, 5.0));
    }

    #[test]
    fn correlated_difference_cancels() {
        let mut z = x();
        z.sub_form(&x());
        assert_eq!(z.itv(), Interval::ZERO);
    }

    #[test]
    fn add_fewer_symbols_folds_other() {
        let mut z = x();
        let w = AffineForm::with_symbol(1, 1, Interval::new(10.0, 12.0));
        z.saxpy(None, Some(&w), None, None);
        assert_eq!(z.state(), AffineState::Active(2));
        assert_eq!(z.values(), Some(&[12.0, 1.0, 0.0][..]));
        assert_eq!(z.err(), 1.0);
        assert_eq!(z.itv(), Interval::new(10.0, 14.0));
    }

    #[test]
    fn add_more_symbols_adopts_other() {
        let mut z = AffineForm::with_symbol(1, 1, Interval::new(10.0, 12.0));
        z.saxpy(None, Some(&x()), None, None);
        assert_eq!(z.state(), AffineState::Active(2));
        assert_eq!(z.values(), Some(&[12.0, 1.0, 0.0][..]));
        assert_eq!(z.err(), 1.0);
    }

    #[test]
    fn add_degenerate() {
        let mut z = x();
        z.saxpy(None, Some(&AffineForm::from(Interval::new(1.0, f64::INFINITY))), None, None);
        assert_eq!(z.state(), AffineState::BoundedBelow);
        assert_eq!(z.itv(), Interval::new(1.0, f64::INFINITY));

        let mut empty = x();
        empty.saxpy(None, Some(&AffineForm::from(Interval::EMPTY)), None, None);
        assert_eq!(empty.state(), AffineState::Empty);
    }

    #[test]
    fn add_constant_and_error() {
        let mut z = x();
        z.saxpy(None, None, Some(2.5), Some(-0.5));
        assert_eq!(z.values(), Some(&[3.5, 1.0, 0.0][..]));
        assert_eq!(z.err(), 0.5);
        assert_eq!(z.itv(), Interval::new(2.0, 5.0));
    }

    #[test]
    fn infinite_constant() {
        let mut z = x();
        z.saxpy(None, None, Some(f64::NEG_INFINITY), None);
        assert_eq!(z.state(), AffineState::BoundedAbove);
    }

    #[test]
    fn infinite_error() {
        let mut z = x();
        z.saxpy(None, None, None, Some(f64::INFINITY));
        assert_eq!(z.state(), AffineState::AllReals);
    }

    #[test]
    fn degenerate_on_entry() {
        let mut z = AffineForm::from(Interval::new(1.0, f64::INFINITY));
        z.saxpy(Some(-2.0), None, Some(1.0), None);
        assert_eq!(z.state(), AffineState::BoundedAbove);
        assert_eq!(z.itv(), Interval::new(f64::NEG_INFINITY, -1.0));

        let mut z = AffineForm::from(Interval::new(1.0, f64::INFINITY));
        z.saxpy(Some(0.0), None, None, None);
        assert_eq!(z.itv(), Interval::ZERO);
    }

    #[test]
    fn steps_after_degradation() {
        // The scale step leaves the linear representation, the later steps
        // must still apply
        let mut z = x();
        z.saxpy(Some(f64::INFINITY), Some(&y()), Some(1.0), Some(1.0));
        assert!(!z.is_active());
        assert!(z.itv().is_unbounded_above());
    }

    #[test]
    fn overflow_degrades_to_all_reals() {
        let mut z = AffineForm::with_symbol(1, 1, Interval::new(0.0, 1e300));
        z.saxpy(Some(1e300), None, None, None);
        assert_eq!(z.state(), AffineState::AllReals);
        assert_eq!(z.itv(), Interval::ALL_REALS);
    }

    #[test]
    fn add_interval() {
        let mut z = x();
        z.add_interval(Interval::new(1.0, 3.0));
        assert_eq!(z.values(), Some(&[3.0, 1.0, 0.0][..]));
        assert_eq!(z.err(), 1.0);

        z.add_interval(Interval::new(f64::NEG_INFINITY, 0.0));
        assert_eq!(z.state(), AffineState::BoundedAbove);
        assert_eq!(z.err(), 5.0);
    }

    #[test]
    fn negate() {
        let mut z = x();
        z.negate();
        assert_eq!(z.values(), Some(&[-1.0, -1.0, -0.0][..]));
        assert_eq!(z.itv(), Interval::new(-2.0, 0.0));

        let mut above = AffineForm::from(Interval::new(3.0, f64::INFINITY));
        above.negate();
        assert_eq!(above.itv(), Interval::new(f64::NEG_INFINITY, -3.0));
    }
}
