//! Errors.
use std::collections::TryReserveError;

use thiserror::Error;

/// Result type used throughout permtable.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for fallible permutation operations.
///
/// Misuse that can only be a programming error, like passing a buffer of the wrong length to a
/// generator, panics instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A position outside of a permutation was accessed.
    #[error("index {index} out of range for permutation of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// The table of all permutations of this order does not fit in the address space.
    #[error("permutation table of order {order} is too large")]
    OrderTooLarge { order: usize },
    /// Memory for the table of all permutations of this order could not be reserved.
    #[error("failed to allocate permutation table of order {order}")]
    Allocation {
        order: usize,
        #[source]
        source: TryReserveError,
    },
}
