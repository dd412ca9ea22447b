/*!
The equality and ordering lattice.

Six comparison operations with distinct contracts live here:

| operation | rounds guard bits | zero-extends | `2.5` vs `2.50` |
|---|---|---|---|
| canonical compare (`Ord`, `==`, hash) | yes | no | equal |
| [`BigFloat::cmp_total_order_bitwise`] | no | no | distinct |
| [`BigFloat::cmp_total_preorder`] | no | yes | equal |
| [`BigFloat::cmp_ulp`] | configurable | no | configurable |
| [`BigFloat::eq_bitwise`] | — | no | distinct |
| [`BigFloat::eq_zero_extended`] | — | yes | equal |

The canonical comparison defines value identity: it rounds the guard
region off both operands, then compares the rounded mantissas at a common
scale. The hash strips trailing zeros from the rounded mantissa and folds
the count into the scale so that every canonically equal encoding hashes
alike.
*/

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use num_traits::Zero;
use rug::Integer;

use crate::bigfloat::number::{BigFloat, GUARD_BITS};
use crate::bigint::rounding_right_shift;

/// Scale gap up to which the aligned compare shifts directly; larger gaps
/// use a high/low split with a sticky low part instead of materializing
/// the shifted mantissa.
const DIRECT_SHIFT_LIMIT: i64 = 512;

/// Compares two non-negative magnitudes positioned at (possibly
/// different) scales: `ma * 2^sa` against `mb * 2^sb`.
fn cmp_aligned_magnitudes(ma: &Integer, sa: i32, mb: &Integer, sb: i32) -> Ordering {
    let d = sa as i64 - sb as i64;
    if d < 0 {
        return cmp_aligned_magnitudes(mb, sb, ma, sa).reverse();
    }
    if d == 0 {
        return ma.cmp(mb);
    }
    if d <= DIRECT_SHIFT_LIMIT {
        return Integer::from(ma << d as u32).cmp(mb);
    }
    // high/low split: compare against the high part of `mb`, with any
    // non-zero low bit acting as a sticky tail
    let high = Integer::from(mb >> d as u32);
    match ma.cmp(&high) {
        Ordering::Equal => {
            if mb.clone().keep_bits(d as u32).is_zero() {
                Ordering::Equal
            } else {
                Ordering::Less
            }
        }
        ord => ord,
    }
}

impl BigFloat {
    /// Canonical value comparison: the comparison behind `==`, the
    /// relational operators, and the hash.
    ///
    /// In order: sticky-zero and sign classification; a fast exit when the
    /// binary exponents differ by two or more (guard rounding moves an
    /// exponent by at most one, so the ordering cannot flip); guard-region
    /// rounding of both mantissas; aligned magnitude comparison of the
    /// rounded mantissas at a common scale.
    pub fn cmp_canonical(&self, other: &Self) -> Ordering {
        let sa = self.signum();
        let sb = other.signum();
        if sa != sb {
            return sa.cmp(&sb);
        }
        if sa == 0 {
            return Ordering::Equal;
        }

        let ea = self.binary_exponent() as i64;
        let eb = other.binary_exponent() as i64;
        if (ea - eb).abs() >= 2 {
            return if sa > 0 { ea.cmp(&eb) } else { eb.cmp(&ea) };
        }

        let ra = rounding_right_shift(&self.mantissa, GUARD_BITS).abs();
        let rb = rounding_right_shift(&other.mantissa, GUARD_BITS).abs();
        let ord = cmp_aligned_magnitudes(&ra, self.scale, &rb, other.scale);
        if sa > 0 {
            ord
        } else {
            ord.reverse()
        }
    }

    /// Strict total order on encodings.
    ///
    /// Keys, in order: sign; effective exponent (`scale + size`, direction
    /// flipped for negatives); aligned magnitude with a single
    /// zero-extending shift; scale; raw mantissa. Returns
    /// [`Ordering::Equal`] only when mantissa and scale match bit for bit,
    /// which makes it suitable for deterministic sorting and
    /// de-duplication by encoding.
    pub fn cmp_total_order_bitwise(&self, other: &Self) -> Ordering {
        let sa = self.mantissa.cmp0();
        let sb = other.mantissa.cmp0();
        if sa != sb {
            return (sa as i32).cmp(&(sb as i32));
        }
        if sa == Ordering::Equal {
            // both strictly zero: ordered by scale so the order stays total
            return self.scale.cmp(&other.scale);
        }

        let ea = self.scale as i64 + self.size as i64;
        let eb = other.scale as i64 + other.size as i64;
        let mut ord = ea.cmp(&eb);
        if ord == Ordering::Equal {
            let ma = self.mantissa.clone().abs();
            let mb = other.mantissa.clone().abs();
            ord = if self.size >= other.size {
                ma.cmp(&(mb << (self.size - other.size)))
            } else {
                (ma << (other.size - self.size)).cmp(&mb)
            };
        }
        if ord == Ordering::Equal {
            ord = self.scale.cmp(&other.scale);
        }
        if ord == Ordering::Equal {
            ord = self.mantissa.cmp(&other.mantissa);
        }
        if sa == Ordering::Less {
            ord.reverse()
        } else {
            ord
        }
    }

    /// Total preorder that collapses zero-extensions.
    ///
    /// Identical to [`BigFloat::cmp_total_order_bitwise`] through the
    /// effective exponent; at equal exponent the wider mantissa is
    /// truncated down to the narrower width before comparing, so `2.5`
    /// and `2.50` tie while guard bits still participate.
    pub fn cmp_total_preorder(&self, other: &Self) -> Ordering {
        let sa = self.mantissa.cmp0();
        let sb = other.mantissa.cmp0();
        if sa != sb {
            return (sa as i32).cmp(&(sb as i32));
        }
        if sa == Ordering::Equal {
            return Ordering::Equal;
        }

        let ea = self.scale as i64 + self.size as i64;
        let eb = other.scale as i64 + other.size as i64;
        let mut ord = ea.cmp(&eb);
        if ord == Ordering::Equal {
            let ma = self.mantissa.clone().abs();
            let mb = other.mantissa.clone().abs();
            ord = if self.size >= other.size {
                (ma >> (self.size - other.size)).cmp(&mb)
            } else {
                ma.cmp(&(mb >> (other.size - self.size)))
            };
        }
        if sa == Ordering::Less {
            ord.reverse()
        } else {
            ord
        }
    }

    /// Tolerance comparison in units of the last place.
    ///
    /// The operands are brought to a common scale (the lower-scale side is
    /// rounding-shifted up), and the difference is rounding-shifted by
    /// `tolerance` bits, plus `GUARD_BITS - 1` more unless
    /// `include_guard` asks for guard bits to count. The sign of what
    /// survives is the answer; [`Ordering::Equal`] means the values agree
    /// within the tolerance.
    pub fn cmp_ulp(&self, other: &Self, tolerance: u32, include_guard: bool) -> Ordering {
        let d = self.scale as i64 - other.scale as i64;
        let diff = if d >= 0 {
            Integer::from(&self.mantissa - &rounding_right_shift(&other.mantissa, d as u32))
        } else {
            rounding_right_shift(&self.mantissa, (-d) as u32) - &other.mantissa
        };
        let shift = tolerance + if include_guard { 0 } else { GUARD_BITS - 1 };
        rounding_right_shift(&diff, shift).cmp0()
    }

    /// Exact encoding equality: mantissa and scale both match.
    pub fn eq_bitwise(&self, other: &Self) -> bool {
        self.scale == other.scale && self.mantissa == other.mantissa
    }

    /// Exact value equality up to zero-extension: the shorter mantissa is
    /// padded with low zero bits to the longer one's scale and the two
    /// must then match bit for bit.
    pub fn eq_zero_extended(&self, other: &Self) -> bool {
        let d = self.scale as i64 - other.scale as i64;
        if d >= 0 {
            Integer::from(&self.mantissa << d as u32) == other.mantissa
        } else {
            self.mantissa == Integer::from(&other.mantissa << (-d) as u32)
        }
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_canonical(other) == Ordering::Equal
    }
}

impl Eq for BigFloat {}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_canonical(other))
    }
}

impl Ord for BigFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_canonical(other)
    }
}

impl Hash for BigFloat {
    /// Hashes the canonical form: the guard-rounded mantissa with its
    /// trailing zeros stripped into the scale. Canonically equal values,
    /// including zero-extensions of one another and every flavor of zero,
    /// produce the same hash.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let rounded = rounding_right_shift(&self.mantissa, GUARD_BITS);
        if rounded.is_zero() {
            state.write_u8(0);
            return;
        }
        let negative = rounded.cmp0() == Ordering::Less;
        let mut mag = rounded.abs();
        let trailing = mag.find_one(0).unwrap_or(0);
        mag >>= trailing;
        negative.hash(state);
        (self.scale as i64 + trailing as i64).hash(state);
        mag.hash(state);
    }
}
