/*!
`bigfloat` is an arbitrary-precision binary floating-point library built
around one idea: precision should grow with the operands, and the library
should tell you *how many bits are actually trustworthy*.

A [`BigFloat`] is a big-integer mantissa paired with a base-2 scale. The
low [`GUARD_BITS`] bits of every mantissa form a guard region: sub-precision
bits that soak up rounding residue as operations chain, so a final rounding
decision is deferred instead of taken at every step. Arithmetic, rounding,
comparison, and conversion all maintain that bookkeeping:

  - the full arithmetic set with precision-aware output sizing: `+ - *
    << >> !` as operators, division, remainder, modulo, and inversion as
    fallible methods;
  - integer-direction rounding (floor, ceiling, truncate, fractional part)
    and an explicit precision-plumbing API;
  - a comparison lattice (canonical value comparison, a strict bitwise
    total order, a zero-extension-collapsing preorder, ULP tolerance, and
    two exact equalities), each operation with a distinct, documented
    contract;
  - square and nth roots over an in-crate integer Newton kernel;
  - lossy conversions to and from binary32/binary64 (normal, subnormal,
    and overflow paths), a 96-bit decimal endpoint, and every bounded
    integer width in wrapping, saturating, and checked flavors.

Values are immutable and the crate holds no global state, so every
operation is safe for concurrent use. There are no non-finite values: NaN
and infinity are rejected at conversion boundaries, and every undefined
result surfaces as an [`Error`] at the call site; partial operations are
fallible methods instead of `std::ops` traits, so nothing panics.
*/

pub mod bigfloat;
pub mod bigint;
pub mod error;

mod util;

pub use crate::bigfloat::{BigFloat, Decimal96, GUARD_BITS};
pub use crate::error::Error;
