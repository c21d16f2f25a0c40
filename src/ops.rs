// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

use crate::{AffineForm, Interval, affine::Repr};

impl Neg for AffineForm {
    type Output = AffineForm;

    fn neg(mut self) -> AffineForm {
        self.negate();
        self
    }
}

impl Neg for &AffineForm {
    type Output = AffineForm;

    fn neg(self) -> AffineForm {
        -self.clone()
    }
}

impl AddAssign<&AffineForm> for AffineForm {
    fn add_assign(&mut self, rhs: &AffineForm) {
        self.saxpy(None, Some(rhs), None, None);
    }
}

impl SubAssign<&AffineForm> for AffineForm {
    fn sub_assign(&mut self, rhs: &AffineForm) {
        self.sub_form(rhs);
    }
}

impl MulAssign<&AffineForm> for AffineForm {
    fn mul_assign(&mut self, rhs: &AffineForm) {
        self.mul_form(rhs);
    }
}

impl AddAssign<f64> for AffineForm {
    fn add_assign(&mut self, rhs: f64) {
        self.saxpy(None, None, Some(rhs), None);
    }
}

impl SubAssign<f64> for AffineForm {
    fn sub_assign(&mut self, rhs: f64) {
        self.saxpy(None, None, Some(-rhs), None);
    }
}

impl MulAssign<f64> for AffineForm {
    fn mul_assign(&mut self, rhs: f64) {
        self.saxpy(Some(rhs), None, None, None);
    }
}

impl AddAssign<Interval> for AffineForm {
    fn add_assign(&mut self, rhs: Interval) {
        self.add_interval(rhs);
    }
}

impl SubAssign<Interval> for AffineForm {
    fn sub_assign(&mut self, rhs: Interval) {
        self.add_interval(-rhs);
    }
}

impl MulAssign<Interval> for AffineForm {
    fn mul_assign(&mut self, rhs: Interval) {
        self.mul_interval(rhs);
    }
}

macro_rules! impl_assign_by_value {
    ($OpAssign:ident, $op_assign:ident) => {
        impl $OpAssign<AffineForm> for AffineForm {
            fn $op_assign(&mut self, rhs: AffineForm) {
                $OpAssign::$op_assign(self, &rhs);
            }
        }
    };
}

impl_assign_by_value!(AddAssign, add_assign);
impl_assign_by_value!(SubAssign, sub_assign);
impl_assign_by_value!(MulAssign, mul_assign);

macro_rules! impl_binary_op {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $($Rhs:ty),+) => {
        $(
            impl $Op<$Rhs> for AffineForm {
                type Output = AffineForm;

                fn $op(mut self, rhs: $Rhs) -> AffineForm {
                    $OpAssign::$op_assign(&mut self, rhs);
                    self
                }
            }

            impl $Op<$Rhs> for &AffineForm {
                type Output = AffineForm;

                fn $op(self, rhs: $Rhs) -> AffineForm {
                    let mut result = self.clone();
                    $OpAssign::$op_assign(&mut result, rhs);
                    result
                }
            }
        )+
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, AffineForm, &AffineForm, f64, Interval);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, AffineForm, &AffineForm, f64, Interval);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, AffineForm, &AffineForm, f64, Interval);

macro_rules! impl_arithmetic_lhs {
    ($Lhs:ty) => {
        impl Add<AffineForm> for $Lhs {
            type Output = AffineForm;

            fn add(self, rhs: AffineForm) -> AffineForm {
                rhs + self
            }
        }

        impl Add<&AffineForm> for $Lhs {
            type Output = AffineForm;

            fn add(self, rhs: &AffineForm) -> AffineForm {
                rhs + self
            }
        }

        impl Sub<AffineForm> for $Lhs {
            type Output = AffineForm;

            fn sub(self, rhs: AffineForm) -> AffineForm {
                -rhs + self
            }
        }

        impl Sub<&AffineForm> for $Lhs {
            type Output = AffineForm;

            fn sub(self, rhs: &AffineForm) -> AffineForm {
                -rhs + self
            }
        }

        impl Mul<AffineForm> for $Lhs {
            type Output = AffineForm;

            fn mul(self, rhs: AffineForm) -> AffineForm {
                rhs * self
            }
        }

        impl Mul<&AffineForm> for $Lhs {
            type Output = AffineForm;

            fn mul(self, rhs: &AffineForm) -> AffineForm {
                rhs * self
            }
        }
    };
}

impl_arithmetic_lhs!(f64);
impl_arithmetic_lhs!(Interval);

impl Zero for AffineForm {
    #[inline]
    fn zero() -> Self {
        AffineForm::from(0.0)
    }

    /// Returns true if the form is exactly zero: no spread and a zero
    /// central value.
    fn is_zero(&self) -> bool {
        match &self.repr {
            Repr::Active { values, error } => *error == 0.0 && values.iter().all(|v| *v == 0.0),
            _ => false,
        }
    }
}

impl One for AffineForm {
    #[inline]
    fn one() -> Self {
        AffineForm::from(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AffineState;

    fn x() -> AffineForm {
        AffineForm::with_symbol(2, 1, Interval::new(1.0, 3.0))
    }

    fn y() -> AffineForm {
        AffineForm::with_symbol(2, 2, Interval::new(-1.0, 1.0))
    }

    #[test]
    fn negation() {
        let z = -x();
        assert_eq!(z.values(), Some(&[-2.0, -1.0, -0.0][..]));
        assert_eq!(z.itv(), Interval::new(-3.0, -1.0));
        assert_eq!(-&z, x());
        let above = -AffineForm::from(Interval::new(f64::NEG_INFINITY, 2.0));
        assert_eq!(above.state(), AffineState::BoundedBelow);
        assert_eq!(above.itv(), Interval::new(-2.0, f64::INFINITY));
    }

    #[test]
    fn addition() {
        let z = x() + y();
        assert_eq!(z.values(), Some(&[2.0, 1.0, 1.0][..]));
        let z = &x() + &y();
        assert_eq!(z.itv(), Interval::new(0.0, 4.0));
        let z = x() + 1.5;
        assert_eq!(z.mid(), 3.5);
        let z = 1.5 + &x();
        assert_eq!(z.mid(), 3.5);
    }

    #[test]
    fn subtraction() {
        let z = x() - y();
        assert_eq!(z.values(), Some(&[2.0, 1.0, -1.0][..]));
        let z = &x() - &x();
        assert_eq!(z.itv(), Interval::ZERO);
        let z = 10.0 - x();
        assert_eq!(z.values(), Some(&[8.0, -1.0, -0.0][..]));
        let z = x() - 1.0;
        assert_eq!(z.itv(), Interval::new(0.0, 2.0));
    }

    #[test]
    fn multiplication() {
        let z = x() * 2.0;
        assert_eq!(z.itv(), Interval::new(2.0, 6.0));
        let z = -1.0 * &x();
        assert_eq!(z.itv(), Interval::new(-3.0, -1.0));
        let z = x() * y();
        assert_eq!(z.values(), Some(&[0.0, 0.0, 2.0][..]));
        assert_eq!(z.err(), 1.0);
        assert_eq!(z.itv(), Interval::new(-3.0, 3.0));
    }

    #[test]
    fn with_interval() {
        let mut z = x();
        z += Interval::new(0.0, 2.0);
        assert_eq!(z.values(), Some(&[3.0, 1.0, 0.0][..]));
        assert_eq!(z.err(), 1.0);
        z -= Interval::new(0.0, 2.0);
        assert_eq!(z.mid(), 2.0);
        assert_eq!(z.err(), 2.0);

        let z = Interval::new(1.0, 2.0) * x();
        assert!(Interval::new(1.0, 6.0).is_subset(&z.itv()));
        let z = Interval::new(0.0, 1.0) - &x();
        assert!(Interval::new(-3.0, 0.0).is_subset(&z.itv()));
    }

    #[test]
    fn compound_assignment() {
        let mut z = x();
        z += &y();
        z -= y();
        assert_eq!(z, x());
        z *= 3.0;
        z -= 3.0;
        z *= AffineForm::from(2.0);
        assert_eq!(z.itv(), Interval::new(0.0, 12.0));
    }

    #[test]
    fn correlation_beats_intervals() {
        // x * (4 - x) on [1, 3] is within [3, 4]
        let x = x();
        let affine = &x * (4.0 - &x);
        let naive = x.itv() * (4.0 - x.itv());
        assert!(affine.itv().diam() < naive.diam());
        assert!(Interval::new(3.0, 4.0).is_subset(&affine.itv()));
    }

    #[test]
    fn zero_and_one() {
        assert!(AffineForm::zero().is_zero());
        assert!(!x().is_zero());
        assert!((x() - x()).is_zero());
        assert!(!AffineForm::from(Interval::EMPTY).is_zero());
        assert_eq!(AffineForm::one().itv(), Interval::ONE);
        assert_eq!(x() * AffineForm::one(), x());
    }
}
