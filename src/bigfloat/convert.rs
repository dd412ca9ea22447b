/*!
Lossy conversions between [`BigFloat`] and the host-native numeric types.

The IEEE 754 paths construct and dissect the binary32/binary64 bit layouts
directly; there is no intermediate textual form. The decimal endpoint is a
96-bit coefficient with a power-of-ten scale, converted through the
factorization `10^k = 5^k * 2^k` so only an integer division by a power of
five is ever needed. Integer conversions come in wrapping, saturating, and
checked flavors; only the checked flavor can fail.
*/

use std::cmp::Ordering;

use rug::ops::Pow;
use rug::Integer;

use crate::bigfloat::number::{BigFloat, GUARD_BITS};
use crate::bigint::rounding_right_shift;
use crate::error::Error;

/// A decimal value `(-1)^sign * coefficient * 10^(-scale)` with a 96-bit
/// unsigned coefficient and a scale in `[0, 28]`, kept purely as a
/// conversion endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decimal96 {
    negative: bool,
    coefficient: u128,
    scale: u8,
}

impl Decimal96 {
    /// Largest representable power-of-ten scale.
    pub const MAX_SCALE: u8 = 28;

    /// Builds a decimal value, rejecting coefficients wider than 96 bits
    /// and scales beyond [`Decimal96::MAX_SCALE`].
    pub fn new(negative: bool, coefficient: u128, scale: u8) -> Result<Self, Error> {
        if scale > Self::MAX_SCALE {
            return Err(Error::InvalidArgument("decimal scale above 28"));
        }
        if coefficient >> 96 != 0 {
            return Err(Error::InvalidArgument("decimal coefficient wider than 96 bits"));
        }
        Ok(Self {
            negative,
            coefficient,
            scale,
        })
    }

    /// True when the sign flag is set.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The unsigned 96-bit coefficient.
    pub fn coefficient(&self) -> u128 {
        self.coefficient
    }

    /// The power-of-ten scale.
    pub fn scale(&self) -> u8 {
        self.scale
    }
}

// binary64 layout
const F64_FRACTION_BITS: u32 = 52;
const F64_EXPONENT_BIAS: i64 = 1023;
const F64_MAX_BIASED_EXPONENT: i64 = 2046;

// binary32 layout
const F32_FRACTION_BITS: u32 = 23;
const F32_EXPONENT_BIAS: i64 = 127;
const F32_MAX_BIASED_EXPONENT: i64 = 254;

impl BigFloat {
    /// Converts to a hardware binary64 value.
    ///
    /// Sticky zeros become `+0.0`. A binary exponent past the top of the
    /// binary64 range returns a signed infinity. Inside the normal range
    /// the top 53 mantissa bits are extracted and the implicit leading one
    /// stripped; below it the subnormal window keeps whatever bits still
    /// fit, and anything past the bottom of the window collapses to a
    /// signed zero.
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let negative = self.mantissa.cmp0() == Ordering::Less;
        let be = self.binary_exponent() as i64;
        let biased = be + F64_EXPONENT_BIAS;
        if biased > F64_MAX_BIASED_EXPONENT {
            return if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        }

        let mag = self.mantissa.clone().abs();
        let fraction_mask = (1u64 << F64_FRACTION_BITS) - 1;
        let bits = if biased >= 1 {
            let top = if self.size >= 53 {
                (mag >> (self.size - 53)).to_u64_wrapping()
            } else {
                (mag << (53 - self.size)).to_u64_wrapping()
            };
            ((biased as u64) << F64_FRACTION_BITS) | (top & fraction_mask)
        } else {
            // subnormal window
            let kept = be + (F64_EXPONENT_BIAS as i64 - 1) + F64_FRACTION_BITS as i64 + 1;
            if kept < 1 || kept > F64_FRACTION_BITS as i64 {
                0
            } else {
                let kept = kept as u32;
                let sub = if kept <= self.size {
                    (mag >> (self.size - kept)).to_u64_wrapping()
                } else {
                    (mag << (kept - self.size)).to_u64_wrapping()
                };
                sub & fraction_mask
            }
        };
        f64::from_bits(bits | ((negative as u64) << 63))
    }

    /// Converts to a hardware binary32 value. Same scheme as
    /// [`BigFloat::to_f64`] over the binary32 layout.
    pub fn to_f32(&self) -> f32 {
        if self.is_zero() {
            return 0.0;
        }
        let negative = self.mantissa.cmp0() == Ordering::Less;
        let be = self.binary_exponent() as i64;
        let biased = be + F32_EXPONENT_BIAS;
        if biased > F32_MAX_BIASED_EXPONENT {
            return if negative {
                f32::NEG_INFINITY
            } else {
                f32::INFINITY
            };
        }

        let mag = self.mantissa.clone().abs();
        let fraction_mask = (1u32 << F32_FRACTION_BITS) - 1;
        let bits = if biased >= 1 {
            let top = if self.size >= 24 {
                (mag >> (self.size - 24)).to_u32_wrapping()
            } else {
                (mag << (24 - self.size)).to_u32_wrapping()
            };
            ((biased as u32) << F32_FRACTION_BITS) | (top & fraction_mask)
        } else {
            let kept = be + (F32_EXPONENT_BIAS as i64 - 1) + F32_FRACTION_BITS as i64 + 1;
            if kept < 1 || kept > F32_FRACTION_BITS as i64 {
                0
            } else {
                let kept = kept as u32;
                let sub = if kept <= self.size {
                    (mag >> (self.size - kept)).to_u32_wrapping()
                } else {
                    (mag << (kept - self.size)).to_u32_wrapping()
                };
                sub & fraction_mask
            }
        };
        f32::from_bits(bits | ((negative as u32) << 31))
    }

    /// Builds a value from a finite binary64, with a binary scaler and an
    /// added-precision budget of extra low zero bits. NaN and infinities
    /// are rejected.
    pub fn from_f64_with(
        value: f64,
        binary_scaler: i32,
        added_precision: u32,
    ) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::Overflow("non-finite binary64 value"));
        }
        Ok(Self::from_f64_finite(value, binary_scaler, added_precision))
    }

    /// Infallible core of the binary64 conversion; callers must pass a
    /// finite value.
    pub(crate) fn from_f64_finite(value: f64, binary_scaler: i32, added_precision: u32) -> Self {
        debug_assert!(value.is_finite());
        if value == 0.0 {
            return Self::zero_with_accuracy(added_precision as i32 - binary_scaler);
        }
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let exponent_field = ((bits >> F64_FRACTION_BITS) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << F64_FRACTION_BITS) - 1);
        let (stored, true_exponent) = if exponent_field == 0 {
            (fraction, 1 - F64_EXPONENT_BIAS)
        } else {
            (fraction | (1u64 << F64_FRACTION_BITS), exponent_field - F64_EXPONENT_BIAS)
        };
        let mantissa = Integer::from(stored) << (GUARD_BITS + added_precision);
        let scale = true_exponent - F64_FRACTION_BITS as i64 + binary_scaler as i64
            - added_precision as i64;
        Self::raw(if negative { -mantissa } else { mantissa }, scale as i32)
    }

    /// Builds a value from a finite binary32. NaN and infinities are
    /// rejected.
    pub fn from_f32_with(
        value: f32,
        binary_scaler: i32,
        added_precision: u32,
    ) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::Overflow("non-finite binary32 value"));
        }
        if value == 0.0 {
            return Ok(Self::zero_with_accuracy(added_precision as i32 - binary_scaler));
        }
        let bits = value.to_bits();
        let negative = bits >> 31 == 1;
        let exponent_field = ((bits >> F32_FRACTION_BITS) & 0xff) as i64;
        let fraction = bits & ((1u32 << F32_FRACTION_BITS) - 1);
        let (stored, true_exponent) = if exponent_field == 0 {
            (fraction, 1 - F32_EXPONENT_BIAS)
        } else {
            (fraction | (1u32 << F32_FRACTION_BITS), exponent_field - F32_EXPONENT_BIAS)
        };
        let mantissa = Integer::from(stored) << (GUARD_BITS + added_precision);
        let scale = true_exponent - F32_FRACTION_BITS as i64 + binary_scaler as i64
            - added_precision as i64;
        Ok(Self::raw(
            if negative { -mantissa } else { mantissa },
            scale as i32,
        ))
    }

    /// Builds a value from a 96-bit decimal.
    ///
    /// The factor `10^(-scale)` splits into `5^(-scale) * 2^(-scale)`; the
    /// power of five is divided out of the coefficient (pre-shifted far
    /// enough that the quotient keeps the coefficient's precision plus the
    /// requested budget) and the power of two is folded into the scale.
    pub fn from_decimal96(value: Decimal96, binary_scaler: i32, added_precision: u32) -> Self {
        if value.coefficient == 0 {
            return Self::zero_with_accuracy(added_precision as i32 - binary_scaler);
        }
        let pow5 = Integer::from(5).pow(value.scale as u32);
        let shift = GUARD_BITS + added_precision + pow5.significant_bits();
        let numerator = Integer::from(value.coefficient) << shift;
        let (mut quotient, remainder) = numerator.div_rem(pow5.clone());
        if remainder * 2u32 >= pow5 {
            quotient += 1u32;
        }
        let scale = -(value.scale as i64) - shift as i64 + binary_scaler as i64
            + GUARD_BITS as i64;
        Self::raw(
            if value.negative { -quotient } else { quotient },
            scale as i32,
        )
    }

    /// Converts to a 96-bit decimal.
    ///
    /// The target decimal scale is the number of decimal digits needed to
    /// cover the binary fraction, clamped to the decimal's range; the
    /// mantissa is multiplied by that power of ten and rounding-shifted
    /// down by the binary fraction width. A coefficient spilling past 96
    /// bits sheds decimal digits (a single-bit spill is one rounded
    /// division by ten) until it fits or the scale is exhausted.
    pub fn to_decimal96(&self) -> Result<Decimal96, Error> {
        if self.is_zero() {
            return Ok(Decimal96 {
                negative: false,
                coefficient: 0,
                scale: 0,
            });
        }
        let negative = self.mantissa.cmp0() == Ordering::Less;
        let mag = self.mantissa.clone().abs();
        let exponent = self.scale as i64 - GUARD_BITS as i64;

        if exponent >= 0 {
            if mag.significant_bits() as i64 + exponent > 96 {
                return Err(Error::Overflow("value too large for a 96-bit decimal"));
            }
            let coefficient = mag << exponent as u32;
            return Ok(Decimal96 {
                negative,
                coefficient: coefficient.to_u128_wrapping(),
                scale: 0,
            });
        }

        let fraction_bits = (-exponent) as u32;
        let mut scale =
            ((fraction_bits as f64) * std::f64::consts::LOG10_2).ceil() as u32;
        if scale > Decimal96::MAX_SCALE as u32 {
            scale = Decimal96::MAX_SCALE as u32;
        }
        let mut coefficient = rounding_right_shift(
            &(mag * Integer::from(10).pow(scale)),
            fraction_bits,
        );
        while coefficient.significant_bits() > 96 {
            if scale == 0 {
                return Err(Error::Overflow("value too large for a 96-bit decimal"));
            }
            let (q, r) = coefficient.div_rem(Integer::from(10));
            coefficient = if r >= 5u32 { q + 1u32 } else { q };
            scale -= 1;
        }
        Ok(Decimal96 {
            negative,
            coefficient: coefficient.to_u128_wrapping(),
            scale: scale as u8,
        })
    }

    /// The value rounded to the nearest integer (ties away from zero),
    /// as a big integer.
    pub fn to_integer(&self) -> Integer {
        let shift = GUARD_BITS as i64 - self.scale as i64;
        if shift <= 0 {
            Integer::from(&self.mantissa << (-shift) as u32)
        } else {
            rounding_right_shift(&self.mantissa, shift as u32)
        }
    }
}

impl TryFrom<f64> for BigFloat {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Error> {
        Self::from_f64_with(value, 0, 0)
    }
}

impl TryFrom<f32> for BigFloat {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self, Error> {
        Self::from_f32_with(value, 0, 0)
    }
}

// Integer conversions for every bounded width: wrapping (round to integer,
// keep the low bits), saturating (clamp to the type's range), and checked
// (`TryFrom`, failing when out of range).
macro_rules! impl_int_conversions {
    ($($t:ty => $wrapping:ident, $saturating:ident, $checked:ident;)*) => {$(
        impl BigFloat {
            /// Rounds to the nearest integer and keeps the low bits of
            /// the result, wrapping on overflow.
            pub fn $wrapping(&self) -> $t {
                self.to_integer().$wrapping()
            }

            /// Rounds to the nearest integer and clamps to the target
            /// type's range.
            pub fn $saturating(&self) -> $t {
                let i = self.to_integer();
                if i > <$t>::MAX {
                    <$t>::MAX
                } else if i < <$t>::MIN {
                    <$t>::MIN
                } else {
                    i.$wrapping()
                }
            }
        }

        impl TryFrom<&BigFloat> for $t {
            type Error = Error;

            /// Rounds to the nearest integer, failing when the result is
            /// out of the target type's range.
            fn try_from(value: &BigFloat) -> Result<Self, Error> {
                value
                    .to_integer()
                    .$checked()
                    .ok_or(Error::Overflow("integer conversion out of range"))
            }
        }
    )*};
}

impl_int_conversions! {
    i8 => to_i8_wrapping, to_i8_saturating, to_i8;
    i16 => to_i16_wrapping, to_i16_saturating, to_i16;
    i32 => to_i32_wrapping, to_i32_saturating, to_i32;
    i64 => to_i64_wrapping, to_i64_saturating, to_i64;
    i128 => to_i128_wrapping, to_i128_saturating, to_i128;
    u8 => to_u8_wrapping, to_u8_saturating, to_u8;
    u16 => to_u16_wrapping, to_u16_saturating, to_u16;
    u32 => to_u32_wrapping, to_u32_saturating, to_u32;
    u64 => to_u64_wrapping, to_u64_saturating, to_u64;
    u128 => to_u128_wrapping, to_u128_saturating, to_u128;
}
