mod error;
mod affine;
mod enclosure;
mod interval;
mod mul;
mod ops;
mod saxpy;

#[cfg(test)]
mod tests;

pub use affine::{AffineForm, AffineState};
pub use enclosure::Enclosure;
pub use error::{AffineError, Result};
pub use interval::Interval;
pub use mul::SQR_TIGHTNESS;
