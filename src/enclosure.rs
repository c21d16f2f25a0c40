// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use crate::Interval;

/// A trait for values that describe a set of reals by projecting onto an
/// [`Interval`].
///
/// Propagation code written against `Enclosure` works unchanged with plain
/// intervals, with [`AffineForm`](crate::AffineForm), and with any other
/// enclosure built on the same interface.
pub trait Enclosure {
    /// Returns the interval hull of the enclosed set.
    fn itv(&self) -> Interval;

    /// Returns a representative point of the enclosed set.
    fn mid(&self) -> f64 {
        self.itv().mid()
    }

    /// Returns true if `x` may be the enclosed value.
    fn contains(&self, x: f64) -> bool {
        self.itv().contains(x)
    }
}

impl Enclosure for Interval {
    #[inline]
    fn itv(&self) -> Interval {
        *self
    }

    #[inline]
    fn mid(&self) -> f64 {
        Interval::mid(self)
    }

    #[inline]
    fn contains(&self, x: f64) -> bool {
        Interval::contains(self, x)
    }
}
