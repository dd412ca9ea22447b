// bigfloat: an arbitrary-precision binary float for Rust
//
// util.rs
//
// Utility functions

use rug::Integer;

/// Produces a bitmask (as an [`Integer`]) encoding `(1 << n) - 1`
/// which can be used to extract the first `n` binary digits.
pub(crate) fn bitmask(n: u32) -> Integer {
    (Integer::from(1) << n) - 1u32
}
