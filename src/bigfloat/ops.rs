// bigfloat: an arbitrary-precision binary float for Rust
//
// bigfloat/ops.rs
//
// Arithmetic operators

use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Not, Shl, Shr, Sub};

use num_traits::Zero;
use rug::Integer;

use crate::bigfloat::number::{BigFloat, GUARD_BITS};
use crate::bigint::rounding_right_shift;
use crate::error::Error;
use crate::util::bitmask;

/// Size gap below which multiplication runs straight and rounds afterward.
const MUL_SHIFT_SLACK: u32 = 32;

/// Extra low bits kept on the larger operand when multiplication
/// pre-shifts a lopsided pair.
const MUL_KEEP_EXTRA: u32 = 16;

impl BigFloat {
    /// Sum of two values.
    ///
    /// The lower-scale operand is aligned up to the higher scale with a
    /// rounding shift before the mantissas combine, so bits that fall
    /// below the result's least place are absorbed into the guard region
    /// rather than silently truncated. When the scale gap exceeds the
    /// smaller operand's bit length the smaller operand lies entirely
    /// beneath the larger's least bit and the larger is returned as is.
    pub(crate) fn add_impl(a: &Self, b: &Self) -> Self {
        if b.mantissa.is_zero() {
            return a.clone();
        }
        if a.mantissa.is_zero() {
            return b.clone();
        }

        let d = a.scale as i64 - b.scale as i64;
        match d.cmp(&0) {
            Ordering::Equal => Self::raw(Integer::from(&a.mantissa + &b.mantissa), a.scale),
            Ordering::Greater => {
                if d > b.size as i64 {
                    return a.clone();
                }
                let shifted = rounding_right_shift(&b.mantissa, d as u32);
                Self::raw(shifted + &a.mantissa, a.scale)
            }
            Ordering::Less => {
                if -d > a.size as i64 {
                    return b.clone();
                }
                let shifted = rounding_right_shift(&a.mantissa, (-d) as u32);
                Self::raw(shifted + &b.mantissa, b.scale)
            }
        }
    }

    /// Product of two values.
    ///
    /// The output carries the smaller operand's bit count: extra bits of
    /// the wider operand cannot be trusted past that width anyway. When the
    /// operand sizes are within [`MUL_SHIFT_SLACK`] bits the product is
    /// computed in full and rounded once; a more lopsided pair first
    /// shrinks the larger operand to the smaller's width plus
    /// [`MUL_KEEP_EXTRA`] slack bits so no work is spent on bits destined
    /// for the rounding shift.
    pub(crate) fn mul_impl(a: &Self, b: &Self) -> Self {
        if a.mantissa.is_zero() || b.mantissa.is_zero() {
            let scale = (a.scale as i64 + b.scale as i64).clamp(i32::MIN as i64, i32::MAX as i64);
            return Self {
                mantissa: Integer::new(),
                scale: scale as i32,
                size: 0,
            };
        }

        let diff = a.size.abs_diff(b.size);
        let (ma, mb, pre_shift) = if diff < MUL_SHIFT_SLACK {
            (a.mantissa.clone(), b.mantissa.clone(), 0)
        } else {
            let pre = diff - MUL_KEEP_EXTRA;
            if a.size > b.size {
                (rounding_right_shift(&a.mantissa, pre), b.mantissa.clone(), pre)
            } else {
                (a.mantissa.clone(), rounding_right_shift(&b.mantissa, pre), pre)
            }
        };

        let product = ma * mb;
        let target = a.size.min(b.size);
        let shrink = product.significant_bits().saturating_sub(target);
        let mantissa = rounding_right_shift(&product, shrink);
        let scale = a.scale as i64 + b.scale as i64 + shrink as i64 + pre_shift as i64
            - GUARD_BITS as i64;
        Self::raw(mantissa, scale as i32)
    }

    /// Squares the value. Same sizing policy as multiplication with both
    /// operands equal, so the output keeps this value's bit count.
    pub fn square(&self) -> Self {
        if self.mantissa.is_zero() {
            return Self::zero_with_accuracy(-self.scale.saturating_mul(2));
        }
        let product = self.mantissa.clone().square();
        let shrink = product.significant_bits().saturating_sub(self.size);
        let mantissa = rounding_right_shift(&product, shrink);
        let scale =
            2 * self.scale as i64 + shrink as i64 - GUARD_BITS as i64;
        Self::raw(mantissa, scale as i32)
    }

    /// Squares the value with a ceiling on the result's bit length,
    /// pre-shrinking the input when it would overshoot.
    pub(crate) fn square_bounded(&self, max_size: u32) -> Self {
        if self.size > max_size {
            let shrink = self.size - max_size;
            let mantissa = rounding_right_shift(&self.mantissa, shrink);
            Self::raw(mantissa, (self.scale as i64 + shrink as i64) as i32).square()
        } else {
            self.square()
        }
    }

    /// Quotient of two values, with output precision adapted to the
    /// operands: the result carries the smaller of the two working
    /// precisions. Dividing zero by a non-zero divisor yields zero with
    /// the divisor's accuracy.
    pub fn try_div(&self, divisor: &Self) -> Result<Self, Error> {
        if divisor.mantissa.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.mantissa.is_zero() {
            return Ok(Self::zero_with_accuracy(divisor.accuracy()));
        }

        let mut out_size = self.precision().min(divisor.precision()) as i64;
        // the quotient's leading bit lands one place lower when the
        // dividend's aligned magnitude is below the divisor's
        let mag_n = self.mantissa.clone().abs();
        let mag_d = divisor.mantissa.clone().abs();
        let smaller = if self.size >= divisor.size {
            mag_n < (mag_d << (self.size - divisor.size))
        } else {
            (mag_n << (divisor.size - self.size)) < mag_d
        };
        if smaller {
            out_size -= 1;
        }

        let wanted = divisor.size as i64 + out_size + GUARD_BITS as i64;
        let left_shift = wanted - self.size as i64;
        let numerator = if left_shift >= 0 {
            Integer::from(&self.mantissa << left_shift as u32)
        } else {
            rounding_right_shift(&self.mantissa, (-left_shift) as u32)
        };
        let quotient = numerator / &divisor.mantissa;
        let scale =
            self.scale as i64 - divisor.scale as i64 - left_shift + GUARD_BITS as i64;
        Ok(Self::raw(quotient, scale as i32))
    }

    /// Remainder of two values, carrying the sign of the dividend.
    /// The result's scale is the smaller of the operand scales.
    pub fn try_rem(&self, divisor: &Self) -> Result<Self, Error> {
        if divisor.mantissa.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let common = self.scale.min(divisor.scale);
        let ma = Integer::from(&self.mantissa << (self.scale as i64 - common as i64) as u32);
        let mb = Integer::from(&divisor.mantissa << (divisor.scale as i64 - common as i64) as u32);
        Ok(Self::raw(ma % mb, common))
    }

    /// Floored modulo: the remainder, with the divisor added whenever the
    /// remainder is non-zero and its sign differs from the divisor's.
    /// The result therefore carries the sign of the divisor.
    pub fn try_modulo(&self, divisor: &Self) -> Result<Self, Error> {
        let r = self.try_rem(divisor)?;
        if !r.mantissa.is_zero()
            && (r.mantissa.cmp0() == Ordering::Less)
                != (divisor.mantissa.cmp0() == Ordering::Less)
        {
            Ok(Self::add_impl(&r, divisor))
        } else {
            Ok(r)
        }
    }

    /// Multiplies by a machine integer. The product is renormalized to
    /// this value's bit count, consistent with the sizing policy of
    /// full multiplication.
    pub fn mul_int(&self, value: i64) -> Self {
        if value == 0 || self.mantissa.is_zero() {
            return Self::zero_with_accuracy(self.accuracy());
        }
        let product = Integer::from(&self.mantissa * value);
        let shrink = product.significant_bits().saturating_sub(self.size);
        let mantissa = rounding_right_shift(&product, shrink);
        Self::raw(mantissa, (self.scale as i64 + shrink as i64) as i32)
    }

    /// Divides by a machine integer.
    ///
    /// A power-of-two divisor is a bare scale adjustment. Otherwise the
    /// dividend magnitude is scaled up by `GUARD_BITS + 2` bits, divided,
    /// rounded half-up on the remainder, and renormalized back to the
    /// dividend's bit count. The sign is applied last.
    pub fn try_div_int(&self, divisor: i64) -> Result<Self, Error> {
        if divisor == 0 {
            return Err(Error::DivisionByZero);
        }
        if self.mantissa.is_zero() {
            return Ok(self.clone());
        }

        let negate = (divisor < 0) != (self.mantissa.cmp0() == Ordering::Less);
        let div_mag = divisor.unsigned_abs();
        if div_mag.is_power_of_two() {
            let k = div_mag.trailing_zeros() as i64;
            let mantissa = if negate {
                -self.mantissa.clone().abs()
            } else {
                self.mantissa.clone().abs()
            };
            return Ok(Self::with_size(
                mantissa,
                (self.scale as i64 - k) as i32,
                self.size,
            ));
        }

        let numerator = self.mantissa.clone().abs() << (GUARD_BITS + 2);
        let (mut quotient, remainder) = numerator.div_rem(Integer::from(div_mag));
        if remainder * 2u32 >= div_mag {
            quotient += 1u32;
        }
        let shrink = quotient.significant_bits().saturating_sub(self.size);
        let quotient = rounding_right_shift(&quotient, shrink);
        let scale =
            self.scale as i64 - (GUARD_BITS + 2) as i64 + shrink as i64;
        let mantissa = if negate { -quotient } else { quotient };
        Ok(Self::raw(mantissa, scale as i32))
    }

    /// Steps the value up by 1, the way `++` steps an integer.
    ///
    /// When the unit place lies below the stored least bit the step cannot
    /// be represented and the value is returned unchanged; a step landing
    /// exactly half a least bit below prefers the even neighbour.
    pub fn increment(&self) -> Self {
        self.step_by_one(1)
    }

    /// Steps the value down by 1. See [`BigFloat::increment`].
    pub fn decrement(&self) -> Self {
        self.step_by_one(-1)
    }

    /// Raises the value to an integer power.
    ///
    /// Exponents in `{0, ±1, ±2}` resolve directly. For small operands
    /// (working precision at most 52 bits and a result exponent inside
    /// the binary64 range) the binary exponent is stripped, the reduced value
    /// is raised with the host `powi`, and the exponent reapplied; this
    /// guarantees binary64-equivalent rounding for operands a double can
    /// carry. Everything else runs binary exponentiation over
    /// [`BigFloat::square`], multiplying the base in for every set bit of
    /// the exponent starting from the least significant, and inverts at
    /// the end for negative exponents.
    ///
    /// A negative exponent on a strictly zero base is
    /// [`Error::DivisionByZero`].
    pub fn pow(&self, exponent: i32) -> Result<Self, Error> {
        match exponent {
            0 => return Ok(Self::one()),
            1 => return Ok(self.clone()),
            -1 => return self.inverse(),
            2 => return Ok(self.square()),
            -2 => return self.square().inverse(),
            _ => {}
        }
        if self.mantissa.is_zero() {
            return if exponent > 0 {
                Ok(self.clone())
            } else {
                Err(Error::DivisionByZero)
            };
        }

        let e = exponent.unsigned_abs();
        let precision = self.precision();
        if precision > 0 && precision <= 52 {
            let be = self.binary_exponent() as i64;
            if (be.abs() + 1) * (e as i64) < 1020 {
                let reduced = self.clone() << (-(be as i32));
                let powed = reduced.to_f64().powi(exponent);
                return Ok(Self::from_f64_finite(powed, 0, 0) << (be as i32 * exponent));
            }
        }

        let cap = self.size + GUARD_BITS;
        let mut bits = e;
        let mut base = self.clone();
        while bits & 1 == 0 {
            base = base.square_bounded(cap);
            bits >>= 1;
        }
        let mut result = base.clone();
        bits >>= 1;
        while bits != 0 {
            base = base.square_bounded(cap);
            if bits & 1 == 1 {
                result = Self::mul_impl(&result, &base);
            }
            bits >>= 1;
        }

        if exponent < 0 {
            result.inverse()
        } else {
            Ok(result)
        }
    }

    fn step_by_one(&self, direction: i32) -> Self {
        let ones_place = GUARD_BITS as i64 - self.scale as i64;
        if ones_place < -1 {
            return self.clone();
        }
        if ones_place == -1 {
            // half of the least stored bit: keep the even neighbour
            return if self.mantissa.is_odd() {
                Self::raw(self.mantissa.clone() + direction, self.scale)
            } else {
                self.clone()
            };
        }
        let unit = Integer::from(1) << ones_place as u32;
        let mantissa = if direction > 0 {
            self.mantissa.clone() + unit
        } else {
            self.mantissa.clone() - unit
        };
        Self::raw(mantissa, self.scale)
    }
}

impl Neg for BigFloat {
    type Output = BigFloat;

    fn neg(self) -> Self::Output {
        BigFloat {
            mantissa: -self.mantissa,
            scale: self.scale,
            size: self.size,
        }
    }
}

impl Neg for &BigFloat {
    type Output = BigFloat;

    fn neg(self) -> Self::Output {
        BigFloat {
            mantissa: Integer::from(-&self.mantissa),
            scale: self.scale,
            size: self.size,
        }
    }
}

impl Add for BigFloat {
    type Output = BigFloat;

    fn add(self, rhs: Self) -> Self::Output {
        BigFloat::add_impl(&self, &rhs)
    }
}

impl Add for &BigFloat {
    type Output = BigFloat;

    fn add(self, rhs: Self) -> Self::Output {
        BigFloat::add_impl(self, rhs)
    }
}

impl Sub for BigFloat {
    type Output = BigFloat;

    fn sub(self, rhs: Self) -> Self::Output {
        BigFloat::add_impl(&self, &-rhs)
    }
}

impl Sub for &BigFloat {
    type Output = BigFloat;

    fn sub(self, rhs: Self) -> Self::Output {
        BigFloat::add_impl(self, &-rhs)
    }
}

impl Mul for BigFloat {
    type Output = BigFloat;

    fn mul(self, rhs: Self) -> Self::Output {
        BigFloat::mul_impl(&self, &rhs)
    }
}

impl Mul for &BigFloat {
    type Output = BigFloat;

    fn mul(self, rhs: Self) -> Self::Output {
        BigFloat::mul_impl(self, rhs)
    }
}

impl Mul<i64> for BigFloat {
    type Output = BigFloat;

    fn mul(self, rhs: i64) -> Self::Output {
        self.mul_int(rhs)
    }
}

impl Mul<i64> for &BigFloat {
    type Output = BigFloat;

    fn mul(self, rhs: i64) -> Self::Output {
        self.mul_int(rhs)
    }
}

/// Scale-only left shift: doubles the value `rhs` times without touching
/// the mantissa, so precision is preserved exactly.
impl Shl<i32> for BigFloat {
    type Output = BigFloat;

    fn shl(self, rhs: i32) -> Self::Output {
        BigFloat {
            scale: (self.scale as i64 + rhs as i64) as i32,
            ..self
        }
    }
}

/// Scale-only right shift: halves the value `rhs` times without touching
/// the mantissa, so precision is preserved exactly.
impl Shr<i32> for BigFloat {
    type Output = BigFloat;

    fn shr(self, rhs: i32) -> Self::Output {
        BigFloat {
            scale: (self.scale as i64 - rhs as i64) as i32,
            ..self
        }
    }
}

/// Bitwise complement of the mantissa magnitude over `[0, size)`.
/// The scale and sign are preserved; the size shrinks by at least one
/// because the most significant bit flips to zero.
impl Not for BigFloat {
    type Output = BigFloat;

    fn not(self) -> Self::Output {
        if self.mantissa.is_zero() {
            return self;
        }
        let negative = self.mantissa.cmp0() == Ordering::Less;
        let flipped = self.mantissa.clone().abs() ^ bitmask(self.size);
        BigFloat::raw(if negative { -flipped } else { flipped }, self.scale)
    }
}

impl Not for &BigFloat {
    type Output = BigFloat;

    fn not(self) -> Self::Output {
        !self.clone()
    }
}

impl num_traits::Zero for BigFloat {
    fn zero() -> Self {
        BigFloat::zero()
    }

    fn is_zero(&self) -> bool {
        BigFloat::is_zero(self)
    }
}

impl num_traits::One for BigFloat {
    /// The multiplicative one at the default 32-bit working precision.
    /// Multiplication narrows its result to the smaller operand's
    /// precision, so `one() * x` is `x` canonically at that precision
    /// rather than bit for bit.
    fn one() -> Self {
        BigFloat::one()
    }
}
