// bigfloat: an arbitrary-precision binary float for Rust
//
// bigfloat/math.rs
//
// Roots, inverse, and logarithm queries

use std::cmp::Ordering;

use num_traits::Zero;
use rug::Integer;

use crate::bigfloat::number::{BigFloat, GUARD_BITS};
use crate::bigint::{iroot, isqrt, rounding_right_shift};
use crate::error::Error;

impl BigFloat {
    /// Absolute value.
    pub fn abs(&self) -> Self {
        if self.mantissa.cmp0() == Ordering::Less {
            -self
        } else {
            self.clone()
        }
    }

    /// Multiplicative inverse at this value's working precision.
    ///
    /// A strictly zero value is [`Error::DivisionByZero`].
    pub fn inverse(&self) -> Result<Self, Error> {
        let numerator = Self::from_integer(1, 0, self.size().max(1));
        numerator.try_div(self)
    }

    /// Square root with `wanted_precision` working bits.
    ///
    /// The mantissa is shifted so the value becomes an integer with twice
    /// the wanted working bits and an even total exponent, the integer
    /// square root is taken, and the result re-wrapped at half the
    /// exponent. Negative inputs are a domain error; a strict zero
    /// returns zero with the input's accuracy.
    pub fn sqrt(&self, wanted_precision: u32) -> Result<Self, Error> {
        if self.mantissa.cmp0() == Ordering::Less {
            return Err(Error::Domain("square root of a negative value"));
        }
        if self.mantissa.is_zero() {
            return Ok(Self::zero_with_accuracy(self.accuracy()));
        }

        let total = self.scale as i64 + self.size as i64 - GUARD_BITS as i64;
        let working = self.size as i64 - GUARD_BITS as i64;
        let parity = total.rem_euclid(2);
        let up_shift = 2 * wanted_precision as i64 - working - parity + GUARD_BITS as i64;
        let shifted = if up_shift >= 0 {
            Integer::from(&self.mantissa << up_shift as u32)
        } else {
            rounding_right_shift(&self.mantissa, (-up_shift) as u32)
        };
        let root = isqrt(&shifted);
        let scale = (total + parity) / 2 - wanted_precision as i64;
        Ok(Self::raw(root, scale as i32))
    }

    /// The nth root with `wanted_precision` working bits.
    ///
    /// Even roots of negative values are a domain error; odd roots of
    /// negative values negate the root of the magnitude. The driver
    /// mirrors [`BigFloat::sqrt`] with the exponent padded to a multiple
    /// of `n` before the integer root.
    pub fn nth_root(&self, n: u32, wanted_precision: u32) -> Result<Self, Error> {
        if n == 0 {
            return Err(Error::InvalidArgument("zeroth root"));
        }
        if n == 1 {
            return Ok(self.clone());
        }
        let negative = self.mantissa.cmp0() == Ordering::Less;
        if negative && n % 2 == 0 {
            return Err(Error::Domain("even root of a negative value"));
        }
        if self.mantissa.is_zero() {
            return Ok(Self::zero_with_accuracy(self.accuracy()));
        }

        let nn = n as i64;
        let total = self.scale as i64 + self.size as i64 - GUARD_BITS as i64;
        let pad = (-total).rem_euclid(nn);
        // n guard regions go in so one comes back out of the nth root
        let up_shift =
            nn * (wanted_precision as i64 + GUARD_BITS as i64) - self.size as i64 - pad;
        let mag = self.mantissa.clone().abs();
        let shifted = if up_shift >= 0 {
            mag << up_shift as u32
        } else {
            rounding_right_shift(&mag, (-up_shift) as u32)
        };
        let root = iroot(&shifted, n);
        let scale = (total + pad) / nn - wanted_precision as i64;
        Ok(Self::raw(
            if negative { -root } else { root },
            scale as i32,
        ))
    }

    /// Cube root with `wanted_precision` working bits.
    pub fn cube_root(&self, wanted_precision: u32) -> Result<Self, Error> {
        self.nth_root(3, wanted_precision)
    }

    /// Base-2 logarithm as a hardware double: NaN for negative values,
    /// negative infinity for zero.
    pub fn log2(&self) -> f64 {
        match self.mantissa.cmp0() {
            Ordering::Less => f64::NAN,
            Ordering::Equal => f64::NEG_INFINITY,
            Ordering::Greater => {
                let (top, dropped) = if self.size > 53 {
                    (Integer::from(&self.mantissa >> (self.size - 53)), self.size - 53)
                } else {
                    (self.mantissa.clone(), 0)
                };
                top.to_f64().log2()
                    + (dropped as i64 + self.scale as i64 - GUARD_BITS as i64) as f64
            }
        }
    }

    /// Integer base-2 logarithm of the magnitude: the position of the most
    /// significant working bit relative to the unit place
    /// (`floor(log2(|x|))` for non-zero values). Meaningless for zero.
    pub fn log2_int(&self) -> i32 {
        self.binary_exponent()
    }
}
