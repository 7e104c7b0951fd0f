//! Unit newtypes for topology quantities.
//!
//! Nominal voltages are carried as [`Kilovolts`] rather than raw `f64` so a
//! voltage bound cannot be confused with any other numeric attribute of a
//! filter. The wrapper is `#[repr(transparent)]` and has no runtime cost.
//!
//! ```
//! use ctg_core::units::Kilovolts;
//!
//! let v = Kilovolts(225.0);
//! assert!(v > Kilovolts(90.0));
//! assert!(v.approx_eq(Kilovolts(225.0 + 1e-12)));
//! ```

use serde::{Deserialize, Serialize};

/// Tolerance used when two voltages are compared for equality.
pub const VOLTAGE_EPSILON: f64 = 1e-9;

/// Nominal voltage in kilovolts (kV)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl Kilovolts {
    /// Get the raw numeric value
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Equality within [`VOLTAGE_EPSILON`]
    #[inline]
    pub fn approx_eq(self, other: Self) -> bool {
        (self.0 - other.0).abs() <= VOLTAGE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(Kilovolts(90.0).approx_eq(Kilovolts(90.0 + 1e-12)));
        assert!(!Kilovolts(90.0).approx_eq(Kilovolts(90.1)));
    }

    #[test]
    fn test_finite() {
        assert!(Kilovolts(63.0).is_finite());
        assert!(!Kilovolts(f64::NAN).is_finite());
        assert_eq!(Kilovolts(63.0).value(), 63.0);
    }
}
