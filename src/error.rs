use thiserror::Error;

/// Failure conditions surfaced by fallible operations.
///
/// The taxonomy is intentionally flat. Saturating and wrapping conversions
/// never fail and so never produce one of these; only the checked paths do.
/// Division, remainder, and inversion are exposed only through fallible
/// methods (`try_div`, `try_rem`, `try_modulo`, `try_div_int`, `inverse`,
/// `pow`), all of which report [`Error::DivisionByZero`] on a zero divisor
/// rather than panicking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Division (or inversion, or modulo) by a strictly zero value.
    #[error("division by zero")]
    DivisionByZero,

    /// An argument outside the mathematical domain of the operation.
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// A result (or argument) outside the representable range of the
    /// target type: checked integer conversions, non-finite IEEE 754
    /// sources, or a value too large for the 96-bit decimal endpoint.
    #[error("out of range: {0}")]
    Overflow(&'static str),

    /// A structurally invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
