use std::cmp::Ordering;

use num_traits::Zero;
use rug::Integer;

use crate::bigint::rounding_right_shift;
use crate::util::bitmask;

/// Width of the guard region, in bits.
///
/// Every mantissa carries this many low-order sub-precision bits. They
/// soak up the rounding error of chained operations so that a final
/// rounding decision can be deferred instead of taken at every step.
/// The width is fixed for the whole process and must be a positive even
/// number (the square-root driver halves it).
pub const GUARD_BITS: u32 = 32;

const _: () = assert!(GUARD_BITS > 0 && GUARD_BITS % 2 == 0);

/// An arbitrary-precision binary floating-point number.
///
/// A [`BigFloat`] is the triple `(mantissa, scale, size)` encoding the
/// value `mantissa * 2^(scale - GUARD_BITS)`:
///
///  - `mantissa` is a signed big integer whose magnitude holds the
///    significant bits of the number, including the low [`GUARD_BITS`]
///    guard bits. The sign of the number is the sign of the mantissa;
///    there is no separate sign field and no signed zero.
///  - `scale` positions the mantissa: growing it by one doubles the value.
///  - `size` caches the bit length of the mantissa's magnitude (zero for a
///    zero mantissa) so exponent and precision queries are O(1).
///
/// Unlike a hardware float, precision is not clamped to a fixed significand
/// width: it grows and shrinks with the operands, and the guard region
/// tracks how many of the low bits are no longer trustworthy. Values are
/// immutable; every operator allocates its result.
///
/// There are no non-finite values. Operations whose mathematical result
/// would be undefined return an [`Error`][crate::Error]; the operations
/// that can fail are exposed as fallible methods rather than through the
/// infallible `std::ops` traits.
#[derive(Clone, Debug)]
pub struct BigFloat {
    pub(crate) mantissa: Integer,
    pub(crate) scale: i32,
    pub(crate) size: u32,
}

impl BigFloat {
    /// Builds a value from a mantissa and scale, computing the cached size.
    /// Every operator funnels its result through here, which is where the
    /// size invariant is (re-)established.
    pub(crate) fn raw(mantissa: Integer, scale: i32) -> Self {
        let size = mantissa.significant_bits();
        Self {
            mantissa,
            scale,
            size,
        }
    }

    /// Internal constructor for callers that already know the bit length.
    pub(crate) fn with_size(mantissa: Integer, scale: i32, size: u32) -> Self {
        debug_assert_eq!(
            size,
            mantissa.significant_bits(),
            "cached size must equal the mantissa bit length"
        );
        Self {
            mantissa,
            scale,
            size,
        }
    }

    /// Constructs a value directly from a raw mantissa (guard bits
    /// included) and scale. The represented value is
    /// `mantissa * 2^(scale - GUARD_BITS)`.
    pub fn from_raw_parts(mantissa: Integer, scale: i32) -> Self {
        Self::raw(mantissa, scale)
    }

    /// Constructs a value from an integer.
    ///
    /// The result is `value * 2^binary_scaler`, carrying
    /// `added_precision` extra low zero bits of working precision beyond
    /// the integer's own bits (all of them trustworthy, since an integer
    /// is exact).
    pub fn from_integer<T: Into<Integer>>(
        value: T,
        binary_scaler: i32,
        added_precision: u32,
    ) -> Self {
        let n: Integer = value.into();
        if n.is_zero() {
            return Self::zero_with_accuracy(added_precision as i32 - binary_scaler);
        }
        let mantissa = n << (GUARD_BITS + added_precision);
        Self::raw(mantissa, binary_scaler - added_precision as i32)
    }

    /// The canonical zero: zero mantissa at scale 0.
    pub fn zero() -> Self {
        Self {
            mantissa: Integer::new(),
            scale: 0,
            size: 0,
        }
    }

    /// Zero that remembers `accuracy` bits below the unit place.
    /// The mantissa is zero; the scale records the least-bit position.
    pub fn zero_with_accuracy(accuracy: i32) -> Self {
        Self {
            mantissa: Integer::new(),
            scale: accuracy.wrapping_neg(),
            size: 0,
        }
    }

    /// The value 1 with a default 32 bits of working precision.
    pub fn one() -> Self {
        Self::from_integer(1, 0, 32)
    }

    /// The value -1 with a default 32 bits of working precision.
    pub fn negative_one() -> Self {
        Self::from_integer(-1, 0, 32)
    }

    /// The value 1 carrying `accuracy` bits below the unit place.
    pub fn one_with_accuracy(accuracy: i32) -> Self {
        Self::int_with_accuracy(1, accuracy)
    }

    /// Builds the integer `value` with exactly `accuracy` bits kept to the
    /// right of the unit place (`scale = -accuracy`).
    ///
    /// An accuracy below `-(GUARD_BITS + bitlen(value))` pushes the whole
    /// mantissa off the bottom and collapses to zero with that accuracy.
    pub fn int_with_accuracy<T: Into<Integer>>(value: T, accuracy: i32) -> Self {
        let n: Integer = value.into();
        if n.is_zero() {
            return Self::zero_with_accuracy(accuracy);
        }
        let shift = GUARD_BITS as i64 + accuracy as i64;
        if shift + n.significant_bits() as i64 <= 0 {
            return Self::zero_with_accuracy(accuracy);
        }
        let mantissa = if shift >= 0 {
            n << shift as u32
        } else {
            rounding_right_shift(&n, (-shift) as u32)
        };
        Self::raw(mantissa, accuracy.wrapping_neg())
    }

    /// The signed mantissa, guard bits included.
    pub fn mantissa(&self) -> &Integer {
        &self.mantissa
    }

    /// The scale: the represented value is
    /// `mantissa * 2^(scale - GUARD_BITS)`.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Number of working (in-precision) bits: the mantissa bit length
    /// with the guard region excluded, clamped at zero.
    pub fn size(&self) -> u32 {
        self.size.saturating_sub(GUARD_BITS)
    }

    /// Full bit length of the mantissa magnitude, guard bits included.
    /// Zero exactly when the mantissa is zero.
    pub fn size_with_guard_bits(&self) -> u32 {
        self.size
    }

    /// Working precision as a signed count: `size_with_guard_bits - GUARD_BITS`.
    /// Negative or zero when the value is out of precision.
    pub fn precision(&self) -> i32 {
        self.size as i32 - GUARD_BITS as i32
    }

    /// Number of bits kept to the right of the unit place (`-scale`).
    pub fn accuracy(&self) -> i32 {
        self.scale.wrapping_neg()
    }

    /// Position of the most significant working bit relative to the unit
    /// place: `scale + size_with_guard_bits - GUARD_BITS - 1`.
    /// For non-zero values this is `floor(log2(|value|))`.
    pub fn binary_exponent(&self) -> i32 {
        (self.scale as i64 + self.size as i64 - GUARD_BITS as i64 - 1) as i32
    }

    /// Sign of the value: -1, 0, or 1. Sticky-zero aware, so a value whose
    /// bits sit entirely inside the guard region reports 0.
    pub fn signum(&self) -> i32 {
        if self.is_zero() {
            0
        } else {
            self.mantissa.cmp0() as i32
        }
    }

    /// True when the value is zero for comparison purposes.
    ///
    /// Zero is *sticky*: a mantissa is treated as zero not only when it is
    /// exactly zero but also when its top bit sits entirely within the
    /// guard region. Chained operations that cancel (`1.3 * 2 - 2.6`) leave
    /// sub-precision residue in the guard; that residue still compares
    /// equal to zero.
    pub fn is_zero(&self) -> bool {
        self.size == 0
            || (self.size < GUARD_BITS
                && (self.size as i64 + self.scale as i64) < GUARD_BITS as i64)
    }

    /// True only when the mantissa is exactly zero.
    pub fn is_strict_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// True when the value is positive (sticky-zero values excluded).
    pub fn is_positive(&self) -> bool {
        self.mantissa.cmp0() == Ordering::Greater && !self.is_zero()
    }

    /// True when the value is negative (sticky-zero values excluded).
    pub fn is_negative(&self) -> bool {
        self.mantissa.cmp0() == Ordering::Less && !self.is_zero()
    }

    /// True when every working bit has fallen into the guard region,
    /// i.e. no bit of the mantissa is trustworthy anymore.
    pub fn is_out_of_precision(&self) -> bool {
        self.size < GUARD_BITS
    }

    /// True when the value is an integer at working precision.
    ///
    /// The test allows a small slop window: fraction bits from the top
    /// half of the guard region upward must be uniformly 0 or uniformly 1.
    /// A value that reached integerhood through guard-bit cancellation
    /// (`2.9999...` with the nines produced by rounding residue) therefore
    /// still counts as an integer.
    pub fn is_integer(&self) -> bool {
        let unit = GUARD_BITS as i64 - self.scale as i64;
        let check_from = (GUARD_BITS / 2) as i64;
        if unit <= check_from {
            return true;
        }
        let width = (unit - check_from) as u32;
        let window = (self.mantissa.clone().abs() >> check_from as u32).keep_bits(width);
        window.is_zero() || window == bitmask(width)
    }

    /// True when the mantissa magnitude is a single set bit followed by
    /// zeros, i.e. the value is an exact power of two at full stored
    /// precision.
    pub fn is_one_bit_followed_by_zero_bits(&self) -> bool {
        self.size > 0 && self.mantissa.clone().abs().count_ones() == Some(1)
    }

    /// Low 64 working bits of the mantissa magnitude (guard excluded).
    pub fn lowest_64_bits(&self) -> u64 {
        (self.mantissa.clone().abs() >> GUARD_BITS).to_u64_wrapping()
    }

    /// Low 64 bits of the mantissa magnitude, guard included.
    pub fn lowest_64_bits_with_guard_bits(&self) -> u64 {
        self.mantissa.clone().abs().to_u64_wrapping()
    }

    /// Top 64 bits of the mantissa magnitude, MSB-aligned. Values shorter
    /// than 64 bits are padded on the right with zeros.
    pub fn highest_64_bits(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        let mag = self.mantissa.clone().abs();
        if self.size >= 64 {
            (mag >> (self.size - 64)).to_u64_wrapping()
        } else {
            (mag << (64 - self.size)).to_u64_wrapping()
        }
    }

    /// Top 128 bits of the mantissa magnitude, MSB-aligned. Values shorter
    /// than 128 bits are padded on the right with zeros.
    pub fn highest_128_bits(&self) -> u128 {
        if self.size == 0 {
            return 0;
        }
        let mag = self.mantissa.clone().abs();
        if self.size >= 128 {
            (mag >> (self.size - 128)).to_u128_wrapping()
        } else {
            (mag << (128 - self.size)).to_u128_wrapping()
        }
    }
}

impl Default for BigFloat {
    fn default() -> Self {
        Self::zero()
    }
}

// Widening conversions from the native integer types. The added precision
// budget defaults to the bit width of the source type.
macro_rules! impl_from_int {
    ($($t:ty => $bits:expr),* $(,)?) => {$(
        impl From<$t> for BigFloat {
            fn from(value: $t) -> Self {
                Self::from_integer(value, 0, $bits)
            }
        }
    )*};
}

impl_from_int! {
    i8 => 8, i16 => 16, i32 => 32, i64 => 64, i128 => 128,
    u8 => 8, u16 => 16, u32 => 32, u64 => 64, u128 => 128,
}

impl From<Integer> for BigFloat {
    fn from(value: Integer) -> Self {
        Self::from_integer(value, 0, 0)
    }
}
