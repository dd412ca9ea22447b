// bigfloat: an arbitrary-precision binary float for Rust
//
// number.rs
//
// Tests for the representation: constructors, accessors, predicates

use rug::Integer;

use bigfloat::{BigFloat, GUARD_BITS};

/// Sweeping the accessors over a representative set of values.
#[test]
fn accessors() {
    let vals = [
        BigFloat::zero(),                                    // 0
        BigFloat::one(),                                     // 1
        BigFloat::from(7i32),                                // 7
        BigFloat::from(-7i32),                               // -7
        BigFloat::from_raw_parts(Integer::from(7), -4),      // guard-only residue
        BigFloat::zero_with_accuracy(10),                    // 0 at accuracy 10
    ];

    // size (working bits)
    let expected = [0u32, 33, 35, 35, 0, 0];
    for (val, &want) in vals.iter().zip(expected.iter()) {
        assert_eq!(
            val.size(),
            want,
            "{:?} has unexpected working size; expected {}",
            val,
            want
        );
    }

    // size with guard bits
    let expected = [0u32, 65, 67, 67, 3, 0];
    for (val, &want) in vals.iter().zip(expected.iter()) {
        assert_eq!(
            val.size_with_guard_bits(),
            want,
            "{:?} has unexpected full size; expected {}",
            val,
            want
        );
    }

    // scale
    let expected = [0i32, -32, -32, -32, -4, -10];
    for (val, &want) in vals.iter().zip(expected.iter()) {
        assert_eq!(
            val.scale(),
            want,
            "{:?} has unexpected scale; expected {}",
            val,
            want
        );
    }

    // accuracy
    let expected = [0i32, 32, 32, 32, 4, 10];
    for (val, &want) in vals.iter().zip(expected.iter()) {
        assert_eq!(
            val.accuracy(),
            want,
            "{:?} has unexpected accuracy; expected {}",
            val,
            want
        );
    }

    // signum (sticky-zero aware)
    let expected = [0i32, 1, 1, -1, 0, 0];
    for (val, &want) in vals.iter().zip(expected.iter()) {
        assert_eq!(
            val.signum(),
            want,
            "{:?} has unexpected sign; expected {}",
            val,
            want
        );
    }

    // is_zero (sticky)
    let expected = [true, false, false, false, true, true];
    for (val, &want) in vals.iter().zip(expected.iter()) {
        assert_eq!(
            val.is_zero(),
            want,
            "{:?} has unexpected is_zero; expected {}",
            val,
            want
        );
    }

    // is_strict_zero
    let expected = [true, false, false, false, false, true];
    for (val, &want) in vals.iter().zip(expected.iter()) {
        assert_eq!(
            val.is_strict_zero(),
            want,
            "{:?} has unexpected is_strict_zero; expected {}",
            val,
            want
        );
    }

    // is_out_of_precision
    let expected = [true, false, false, false, true, true];
    for (val, &want) in vals.iter().zip(expected.iter()) {
        assert_eq!(
            val.is_out_of_precision(),
            want,
            "{:?} has unexpected is_out_of_precision; expected {}",
            val,
            want
        );
    }
}

#[test]
fn binary_exponent_is_floor_log2() {
    assert_eq!(BigFloat::from(1i32).binary_exponent(), 0);
    assert_eq!(BigFloat::from(2i32).binary_exponent(), 1);
    assert_eq!(BigFloat::from(7i32).binary_exponent(), 2);
    assert_eq!(BigFloat::from(8i32).binary_exponent(), 3);
    assert_eq!(BigFloat::from(-7i32).binary_exponent(), 2);
    let half = BigFloat::try_from(0.5f64).unwrap();
    assert_eq!(half.binary_exponent(), -1);
}

#[test]
fn precision_growth_with_scaler() {
    // value * 2^scaler, precision unchanged
    let x = BigFloat::from_integer(5, 20, 16);
    assert_eq!(x.precision(), 3 + 16);
    assert_eq!(x.binary_exponent(), 2 + 20);
    assert_eq!(x.accuracy(), 16 - 20);
}

#[test]
fn sticky_zero_requires_guard_confinement() {
    // small mantissa but large scale: well above the guard, not zero
    let big = BigFloat::from_raw_parts(Integer::from(3), 100);
    assert!(!big.is_zero(), "3 * 2^68 is not zero");
    assert!(big.is_out_of_precision());

    // same mantissa at a deeply negative scale: guard residue, zero
    let residue = BigFloat::from_raw_parts(Integer::from(3), -100);
    assert!(residue.is_zero());
    assert!(!residue.is_strict_zero());
}

#[test]
fn integer_predicate_with_slop_window() {
    assert!(BigFloat::from(7i32).is_integer());
    assert!(BigFloat::zero().is_integer());

    // 2.5 has a genuine working fraction bit
    let half_odd = BigFloat::from(5i32).try_div_int(2).unwrap();
    assert!(!half_odd.is_integer());

    // one guard-ulp below 3: fraction is uniform ones, still an integer
    let almost = BigFloat::from(3i32).guard_bit_decrement();
    assert!(almost.is_integer(), "3 - guard epsilon is an integer");

    // one guard-ulp above 2: fraction is uniform zeros in the window
    let barely = BigFloat::from(2i32).guard_bit_increment();
    assert!(barely.is_integer(), "2 + guard epsilon is an integer");
}

#[test]
fn power_of_two_mantissa_predicate() {
    assert!(BigFloat::from(8i32).is_one_bit_followed_by_zero_bits());
    assert!(BigFloat::from(-8i32).is_one_bit_followed_by_zero_bits());
    assert!(!BigFloat::from(7i32).is_one_bit_followed_by_zero_bits());
    assert!(!BigFloat::zero().is_one_bit_followed_by_zero_bits());
}

#[test]
fn bit_windows() {
    let seven = BigFloat::from(7i32);
    // mantissa is 0b111 followed by 64 zero bits
    assert_eq!(seven.highest_64_bits(), 0xE000_0000_0000_0000);
    assert_eq!(seven.lowest_64_bits(), 7u64 << 32);
    assert_eq!(seven.lowest_64_bits_with_guard_bits(), 0);
    assert_eq!(
        seven.highest_128_bits(),
        0xE000_0000_0000_0000_0000_0000_0000_0000
    );
    assert_eq!(BigFloat::zero().highest_64_bits(), 0);
}

#[test]
fn raw_parts_round_trip() {
    let x = BigFloat::from_raw_parts(Integer::from(12345) << GUARD_BITS, -3);
    assert_eq!(*x.mantissa(), Integer::from(12345) << GUARD_BITS);
    assert_eq!(x.scale(), -3);
    assert_eq!(x.size_with_guard_bits(), 14 + GUARD_BITS);
}

#[test]
fn int_with_accuracy_shapes() {
    let x = BigFloat::int_with_accuracy(5, 10);
    assert_eq!(x, BigFloat::from(5i32), "value must still be 5");
    assert_eq!(x.accuracy(), 10);
    assert_eq!(x.size_with_guard_bits(), 3 + GUARD_BITS + 10);

    // accuracy below the mantissa collapses to zero with that accuracy
    let collapsed = BigFloat::int_with_accuracy(5, -(GUARD_BITS as i32) - 3);
    assert!(collapsed.is_strict_zero());
    assert_eq!(collapsed.accuracy(), -(GUARD_BITS as i32) - 3);
}

#[test]
fn one_and_negative_one() {
    assert_eq!(BigFloat::one(), BigFloat::from(1i32));
    assert_eq!(BigFloat::negative_one(), BigFloat::from(-1i32));
    assert_eq!(BigFloat::one_with_accuracy(50).accuracy(), 50);
    assert_eq!(BigFloat::one_with_accuracy(50), BigFloat::one());
}

#[test]
fn num_traits_surface() {
    use num_traits::{One, Zero};

    let zero: BigFloat = Zero::zero();
    assert!(zero.is_strict_zero());
    assert_eq!(BigFloat::default(), zero);

    let one: BigFloat = One::one();
    assert_eq!(one, BigFloat::from(1i32));
    assert!(one.is_one());
}
