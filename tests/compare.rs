// bigfloat: an arbitrary-precision binary float for Rust
//
// compare.rs
//
// Tests for the comparison lattice and the hash

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rug::Integer;

use bigfloat::{BigFloat, GUARD_BITS};

fn hash_of(x: &BigFloat) -> u64 {
    let mut hasher = DefaultHasher::new();
    x.hash(&mut hasher);
    hasher.finish()
}

/// 2.5 encoded at two different accuracies: the classic zero-extension
/// pair that every operation in the lattice treats differently.
fn two_point_five() -> (BigFloat, BigFloat) {
    let short = BigFloat::from_raw_parts(Integer::from(5) << GUARD_BITS, -1);
    let long = BigFloat::from_raw_parts(Integer::from(10) << GUARD_BITS, -2);
    (short, long)
}

#[test]
fn lattice_on_zero_extensions() {
    let (short, long) = two_point_five();

    // canonical: equal, and the hash must agree
    assert_eq!(short, long);
    assert_eq!(hash_of(&short), hash_of(&long));

    // bitwise total order: distinct, ordered by scale
    assert_ne!(short.cmp_total_order_bitwise(&long), Ordering::Equal);
    assert_eq!(
        short.cmp_total_order_bitwise(&long),
        long.cmp_total_order_bitwise(&short).reverse()
    );

    // preorder: the extension collapses
    assert_eq!(short.cmp_total_preorder(&long), Ordering::Equal);

    // exact equalities
    assert!(!short.eq_bitwise(&long));
    assert!(short.eq_zero_extended(&long));
    assert!(long.eq_zero_extended(&short));

    // ulp tolerance at zero bits still ties
    assert_eq!(short.cmp_ulp(&long, 0, true), Ordering::Equal);
}

#[test]
fn canonical_compare_orders_values() {
    assert!(BigFloat::from(4i32) < BigFloat::from(5i32));
    assert!(BigFloat::from(-4i32) > BigFloat::from(-5i32));
    assert!(BigFloat::from(-1i32) < BigFloat::zero());
    assert!(BigFloat::zero() < BigFloat::from(1i32));
    assert!(BigFloat::from(1000i32) > BigFloat::from(1i32), "fast exponent exit");
    assert!(BigFloat::from(-1000i32) < BigFloat::from(-1i32));
}

/// A difference confined to the guard region is invisible to the
/// canonical comparison and to the hash.
#[test]
fn guard_only_difference_is_zero() {
    let x = BigFloat::from(97i32);
    let y = x.guard_bit_increment();
    assert_eq!(x, y);
    assert_eq!(x.cmp_canonical(&y), Ordering::Equal);
    assert_eq!(hash_of(&x), hash_of(&y));
    assert!(!x.eq_bitwise(&y));

    // but a working-bit difference is not
    let z = x.bit_increment();
    assert!(z > x);
}

#[test]
fn canonical_compare_handles_the_rounding_carry() {
    // 1 - 2^-128 at high accuracy rounds up to exactly 1 in canonical
    // form: the power-of-two carry must not break the comparison
    let almost_one = BigFloat::from_raw_parts(
        (Integer::from(1) << 128u32) - 1u32,
        -(128 - GUARD_BITS as i32),
    );
    assert_eq!(almost_one, BigFloat::from(1i32));
}

#[test]
fn total_order_is_a_strict_order() {
    let (short, long) = two_point_five();
    let mut vals = vec![
        BigFloat::from(-3i32),
        BigFloat::zero(),
        long.clone(),
        short.clone(),
        BigFloat::from(3i32),
        BigFloat::from(100i32),
    ];
    vals.sort_by(|a, b| a.cmp_total_order_bitwise(b));

    // strictly increasing by value, zero-extensions adjacent
    assert_eq!(vals[0], BigFloat::from(-3i32));
    assert_eq!(vals[1], BigFloat::zero());
    assert_eq!(vals[2], short);
    assert_eq!(vals[3], short);
    assert_eq!(vals[4], BigFloat::from(3i32));
    assert_eq!(vals[5], BigFloat::from(100i32));

    // reflexive zero, and zero only for identical encodings
    for v in &vals {
        assert_eq!(v.cmp_total_order_bitwise(v), Ordering::Equal);
    }
    assert_ne!(short.cmp_total_order_bitwise(&long), Ordering::Equal);
}

#[test]
fn total_order_flips_magnitude_for_negatives() {
    let a = BigFloat::from(-2i32);
    let b = BigFloat::from(-4i32);
    assert_eq!(a.cmp_total_order_bitwise(&b), Ordering::Greater);
    assert_eq!(b.cmp_total_order_bitwise(&a), Ordering::Less);
}

#[test]
fn preorder_collapses_only_extensions() {
    let (short, _) = two_point_five();
    // one extra low set bit: wider, but not a zero-extension
    let wider = BigFloat::from_raw_parts(
        (Integer::from(5) << (GUARD_BITS + 1)) + 1u32,
        -2,
    );
    assert_eq!(short.cmp_total_preorder(&wider), Ordering::Equal, "truncated to the narrow width they tie");
    assert_ne!(short.cmp_total_order_bitwise(&wider), Ordering::Equal);
    assert!(!short.eq_zero_extended(&wider));
}

#[test]
fn ulp_comparison_tolerance() {
    let x = BigFloat::from(1000i32);

    // guard noise is invisible unless asked for
    let noisy = x.guard_bit_increment();
    assert_eq!(x.cmp_ulp(&noisy, 0, false), Ordering::Equal);
    assert_eq!(x.cmp_ulp(&noisy, 0, true), Ordering::Less);

    // a working-ulp difference shows up at tolerance 0 and vanishes
    // under a wide enough tolerance
    let stepped = x.bit_increment();
    assert_eq!(x.cmp_ulp(&stepped, 0, false), Ordering::Less);
    assert_eq!(x.cmp_ulp(&stepped, 8, false), Ordering::Equal);
}

#[test]
fn sticky_zero_equals_zero() {
    let residue = BigFloat::from_raw_parts(Integer::from(3), -100);
    assert!(residue.is_zero());
    assert_eq!(residue, BigFloat::zero());
    assert_eq!(hash_of(&residue), hash_of(&BigFloat::zero()));
    assert_eq!(residue.cmp_canonical(&BigFloat::from(1i32)), Ordering::Less);
}

#[test]
fn equality_agrees_with_hash_across_precisions() {
    // the same value built four different ways
    let a = BigFloat::from(6i32);
    let b = BigFloat::from(3i32) * 2i64;
    let c = BigFloat::from_integer(6, 0, 100);
    let d = BigFloat::try_from(6.0f64).unwrap();
    for x in [&a, &b, &c, &d] {
        for y in [&a, &b, &c, &d] {
            assert_eq!(*x, *y, "all renditions of 6 are canonically equal");
            assert_eq!(hash_of(x), hash_of(y), "equal values must hash alike");
        }
    }
}

#[test]
fn relational_operators_follow_canonical_compare() {
    let (short, long) = two_point_five();
    assert!(short <= long && short >= long);
    assert!(BigFloat::from(2i32) < short);
    assert!(BigFloat::from(3i32) > long);

    let sorted = {
        let mut v = vec![BigFloat::from(5i32), BigFloat::from(-5i32), BigFloat::zero()];
        v.sort();
        v
    };
    assert_eq!(sorted[0], BigFloat::from(-5i32));
    assert_eq!(sorted[1], BigFloat::zero());
    assert_eq!(sorted[2], BigFloat::from(5i32));
}
