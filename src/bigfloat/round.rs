// bigfloat: an arbitrary-precision binary float for Rust
//
// bigfloat/round.rs
//
// Integer-direction rounding and the precision-plumbing API

use std::cmp::Ordering;

use num_traits::Zero;
use rug::Integer;

use crate::bigfloat::number::{BigFloat, GUARD_BITS};
use crate::bigint::{rounding_right_shift, rounding_right_shift_with_size};
use crate::util::bitmask;

impl BigFloat {
    /// Bit position of the unit place within the mantissa, as a signed
    /// offset. Bits strictly below it weigh less than one.
    fn unit_place(&self) -> i64 {
        GUARD_BITS as i64 - self.scale as i64
    }

    /// True when the value has fraction bits above the guard region.
    /// Fraction bits confined to the guard are rounding residue and do
    /// not count.
    fn has_working_fraction(&self) -> bool {
        if self.scale >= 0 {
            return false;
        }
        let frac = (self.mantissa.clone().abs() >> GUARD_BITS)
            .keep_bits((-(self.scale as i64)) as u32);
        !frac.is_zero()
    }

    /// Sticky-integer test for ceiling and floor: the value counts as an
    /// integer when its working fraction is empty or when the slop window
    /// of [`BigFloat::is_integer`] says the fraction is rounding residue
    /// (uniformly 0 or uniformly 1).
    fn rounds_to_integer(&self) -> bool {
        !self.has_working_fraction() || self.is_integer()
    }

    /// Rounds toward zero to an integer, preserving the caller's scale.
    ///
    /// Every bit below the unit place is cleared, the working fraction
    /// and the guard tail alike, so the decomposition
    /// `truncate(x) + fractional_part(x)` reassembles `x` exactly.
    pub fn truncate(&self) -> Self {
        let unit = self.unit_place();
        if unit <= 0 {
            return self.clone();
        }
        if unit >= self.size as i64 {
            return Self::zero_with_accuracy(self.accuracy());
        }
        let negative = self.mantissa.cmp0() == Ordering::Less;
        let kept = (self.mantissa.clone().abs() >> unit as u32) << unit as u32;
        Self::raw(if negative { -kept } else { kept }, self.scale)
    }

    /// The fractional part: the integer region is masked out, the sign
    /// and scale kept. Zero or the sign of the value.
    pub fn fractional_part(&self) -> Self {
        let unit = self.unit_place();
        if unit <= 0 {
            return Self::zero_with_accuracy(self.accuracy());
        }
        if unit >= self.size as i64 {
            return self.clone();
        }
        let negative = self.mantissa.cmp0() == Ordering::Less;
        let frac = self.mantissa.clone().abs() & bitmask(unit as u32);
        Self::raw(if negative { -frac } else { frac }, self.scale)
    }

    /// Rounds toward positive infinity to an integer-scaled value
    /// (result scale 0).
    ///
    /// Fraction bits confined to the guard region are sticky and do not
    /// push the value up: a value one guard-ulp short of an integer
    /// ceilings to that integer, not past it.
    pub fn ceiling(&self) -> Self {
        if self.mantissa.is_zero() {
            return Self::zero();
        }
        if self.scale >= 0 {
            // integer-valued at working precision already; rescale only
            return Self::with_size(
                Integer::from(&self.mantissa << self.scale as u32),
                0,
                self.size + self.scale as u32,
            );
        }
        let unit = self.unit_place() as u32;
        let negative = self.mantissa.cmp0() == Ordering::Less;
        let mag = self.mantissa.clone().abs();
        let int_part = if self.rounds_to_integer() {
            // fraction is rounding residue; land on the integer it
            // represents instead of stepping past it
            rounding_right_shift(&mag, unit)
        } else {
            let mut q = Integer::from(&mag >> unit);
            if !negative {
                q += 1u32;
            }
            q
        };
        let mantissa = int_part << GUARD_BITS;
        Self::raw(if negative { -mantissa } else { mantissa }, 0)
    }

    /// Rounds toward negative infinity to an integer-scaled value
    /// (result scale 0). `floor(x) = -ceiling(-x)`.
    pub fn floor(&self) -> Self {
        -(-self).ceiling()
    }

    /// Rounds toward positive infinity while keeping the caller's scale,
    /// so that accuracy bookkeeping survives. Values with no working
    /// fraction bits are returned unchanged (sticky).
    pub fn ceiling_preserving_accuracy(&self) -> Self {
        if self.scale >= 0 || self.rounds_to_integer() {
            return self.clone();
        }
        let unit = self.unit_place() as u32;
        let negative = self.mantissa.cmp0() == Ordering::Less;
        let cleared = (self.mantissa.clone().abs() >> unit) << unit;
        let mantissa = if negative {
            -cleared
        } else {
            cleared + (Integer::from(1) << unit)
        };
        Self::raw(mantissa, self.scale)
    }

    /// Rounds toward negative infinity while keeping the caller's scale.
    pub fn floor_preserving_accuracy(&self) -> Self {
        -(-self).ceiling_preserving_accuracy()
    }

    /// Shifts the mantissa by `delta` bits and rescales so the value is
    /// unchanged: positive deltas pad zero bits below the guard
    /// (increasing accuracy), negative deltas drop bits with rounding.
    pub fn adjust_precision(&self, delta: i32) -> Self {
        if delta >= 0 {
            Self::with_size(
                Integer::from(&self.mantissa << delta as u32),
                (self.scale as i64 - delta as i64) as i32,
                if self.size == 0 { 0 } else { self.size + delta as u32 },
            )
        } else {
            let (mantissa, size) = rounding_right_shift_with_size(&self.mantissa, delta.unsigned_abs());
            Self::with_size(mantissa, (self.scale as i64 - delta as i64) as i32, size)
        }
    }

    /// Forces the working precision to exactly `bits`, padding with zeros
    /// or truncating without rounding.
    pub fn set_precision(&self, bits: u32) -> Self {
        let shift = bits as i64 - self.precision() as i64;
        if shift >= 0 {
            Self::raw(
                Integer::from(&self.mantissa << shift as u32),
                (self.scale as i64 - shift) as i32,
            )
        } else {
            Self::raw(
                Integer::from(&self.mantissa >> (-shift) as u32),
                (self.scale as i64 - shift) as i32,
            )
        }
    }

    /// Forces the working precision to exactly `bits`, rounding when bits
    /// are dropped. A round-up carry can leave the result one bit wider.
    pub fn set_precision_with_round(&self, bits: u32) -> Self {
        let shift = bits as i64 - self.precision() as i64;
        if shift >= 0 {
            self.set_precision(bits)
        } else {
            let mantissa = rounding_right_shift(&self.mantissa, (-shift) as u32);
            Self::raw(mantissa, (self.scale as i64 - shift) as i32)
        }
    }

    /// Appends `bits` zero bits of accuracy below the current least bit.
    /// The value is unchanged.
    pub fn extend_precision(&self, bits: u32) -> Self {
        self.adjust_precision(bits as i32)
    }

    /// Drops the low `bits` bits without rounding.
    pub fn reduce_precision(&self, bits: u32) -> Self {
        Self::raw(
            Integer::from(&self.mantissa >> bits),
            (self.scale as i64 + bits as i64) as i32,
        )
    }

    /// Drops the low `bits` bits with a rounding shift. A round-up carry
    /// can bump the size by one; callers must tolerate that.
    pub fn truncate_by_and_round(&self, bits: u32) -> Self {
        let (mantissa, size) = rounding_right_shift_with_size(&self.mantissa, bits);
        Self::with_size(mantissa, (self.scale as i64 + bits as i64) as i32, size)
    }

    /// Adds one unit in the last working place (`1` at the guard
    /// boundary).
    pub fn bit_increment(&self) -> Self {
        Self::raw(
            self.mantissa.clone() + (Integer::from(1) << GUARD_BITS),
            self.scale,
        )
    }

    /// Subtracts one unit in the last working place.
    pub fn bit_decrement(&self) -> Self {
        Self::raw(
            self.mantissa.clone() - (Integer::from(1) << GUARD_BITS),
            self.scale,
        )
    }

    /// Adds one unit in the very last guard place.
    pub fn guard_bit_increment(&self) -> Self {
        Self::raw(self.mantissa.clone() + 1u32, self.scale)
    }

    /// Subtracts one unit in the very last guard place.
    pub fn guard_bit_decrement(&self) -> Self {
        Self::raw(self.mantissa.clone() - 1u32, self.scale)
    }
}
