/*!
Big-integer primitives underlying every rounding decision in the crate.

The single load-bearing operation is [`rounding_right_shift`]: divide by a
power of two, rounding to nearest with ties away from zero. It is expressed
over sign-magnitude so that the host big integer's arithmetic-shift
convention for negative numbers never influences the result. Every operator
that drops bits (addition of misaligned operands, multiplication followed
by size-capping, division, truncation) funnels through it; keeping that
single rounding rule is what makes the comparison laws of the float type
provable.

The integer square root and nth root used by the root drivers live here as
well. Multiplication and division of the mantissas themselves are left to
the host big integer, which switches to subquadratic algorithms past its
own thresholds.
*/

use std::cmp::Ordering;

use num_traits::Zero;
use rug::ops::Pow;
use rug::Integer;

/// Returns the integer closest to `x / 2^shift`, resolving ties away
/// from zero. A zero shift is the identity.
///
/// On the magnitude this is `(|x| >> (shift - 1) + 1) >> 1`: the result is
/// the truncated quotient plus the bit just below the cut (the "half" bit).
/// Bits below the half bit cannot affect a nearest rounding and are never
/// inspected.
pub fn rounding_right_shift(x: &Integer, shift: u32) -> Integer {
    if shift == 0 {
        return x.clone();
    }
    let negative = x.cmp0() == Ordering::Less;
    let mut mag = x.clone().abs();
    mag >>= shift - 1;
    mag += 1u32;
    mag >>= 1;
    if negative {
        -mag
    } else {
        mag
    }
}

/// Size-tracking variant of [`rounding_right_shift`].
///
/// Also returns the bit length of the result, which is one more than
/// `bitlen(|x|) - shift` when the round-up carry propagates past the
/// previous most significant bit.
pub fn rounding_right_shift_with_size(x: &Integer, shift: u32) -> (Integer, u32) {
    let r = rounding_right_shift(x, shift);
    let size = r.significant_bits();
    (r, size)
}

/// Reports whether `rounding_right_shift(x, shift)` differs from the
/// truncated shift `|x| >> shift` (sign-magnitude).
///
/// Used when deciding whether a value straddles a power of two and
/// therefore needs an exponent correction after rounding.
pub fn would_round_up(x: &Integer, shift: u32) -> bool {
    shift > 0 && x.clone().abs().get_bit(shift - 1)
}

/// Floor square root of a non-negative integer.
///
/// Newton's method seeded from a floating-point estimate of the high bits.
/// The seed is biased upward so the iteration descends monotonically onto
/// `floor(sqrt(x))` and stops at the first non-decreasing step.
pub fn isqrt(x: &Integer) -> Integer {
    debug_assert!(x.cmp0() != Ordering::Less, "isqrt of a negative integer");
    if x.is_zero() {
        return Integer::new();
    }

    let bits = x.significant_bits();
    let mut r = if bits < 64 {
        Integer::from(x.to_f64().sqrt() as u64 + 2)
    } else {
        // seed from the top 52 bits, shifted back up by half the (even)
        // amount that was stripped
        let stripped = (bits - 52) & !1;
        let top = Integer::from(x >> stripped);
        Integer::from(top.to_f64().sqrt() as u64 + 2) << (stripped / 2)
    };

    loop {
        let next = (Integer::from(x / &r) + &r) >> 1;
        if next >= r {
            return r;
        }
        r = next;
    }
}

/// Floor nth root of a non-negative integer, `n >= 1`.
///
/// Same monotone Newton descent as [`isqrt`], with the derivative step
/// generalized to `((n - 1) * r + x / r^(n-1)) / n`.
pub fn iroot(x: &Integer, n: u32) -> Integer {
    debug_assert!(n >= 1, "iroot requires n >= 1");
    debug_assert!(x.cmp0() != Ordering::Less, "iroot of a negative integer");
    if n == 1 {
        return x.clone();
    }
    if x.is_zero() {
        return Integer::new();
    }

    let bits = x.significant_bits();
    let mut r = Integer::from(1) << (bits / n + 1);
    loop {
        let pow = r.clone().pow(n - 1);
        let next = (Integer::from(x / &pow) + Integer::from(&r * (n - 1))) / n;
        if next >= r {
            return r;
        }
        r = next;
    }
}
