//! Small helpers around [`UBig`].

use ibig::UBig;

use crate::error::{Error, Result};

#[inline]
pub(crate) fn zero() -> UBig {
    return UBig::from(0u8);
}

#[inline]
pub(crate) fn one() -> UBig {
    return UBig::from(1u8);
}

#[inline]
pub(crate) fn big(value: usize) -> UBig {
    return UBig::from(value);
}

/// Narrow a value that the tree layout guarantees is small (a leaf offset or
/// branch index).
#[inline]
pub(crate) fn small(value: &UBig) -> Result<usize> {
    return usize::try_from(value).map_err(|_| Error::internal(format!("{value} exceeds a native index")));
}

/// Narrow a user-supplied amount that must be materialized in memory.
#[inline]
pub(crate) fn materializable(value: &UBig) -> Result<usize> {
    return usize::try_from(value).map_err(|_| Error::TooLarge(value.clone()));
}

#[inline]
pub(crate) fn min(a: &UBig, b: &UBig) -> UBig {
    if a <= b {
        return a.clone();
    }
    return b.clone();
}
