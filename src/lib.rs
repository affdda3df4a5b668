//! Cached enumeration of permutations
//!
//! This crate enumerates all permutations of {0, ..., n-1} by copying rows out of precomputed
//! tables, one table per order. Tables are built once, from the table of the next smaller order,
//! and kept for the lifetime of the [`PermCache`](cache::PermCache) owning them.
//!
//! Enumeration reuses a caller supplied buffer. Every step of a [`Generator`](generate::Generator)
//! overwrites that buffer and hands out a [`PermView`](perm::PermView) borrowing it, which provides
//! indexing, formatting and inversion counting.
//!
//! A naive backtracking generator without any cache is included as a baseline for comparison.
pub mod cache;
pub mod error;
pub mod generate;
pub mod perm;

use num_traits::{CheckedMul, FromPrimitive, One};

pub use crate::error::{Error, Result};

/// Set element.
///
/// Set elements are represented by non-negative integers (`u32`).
pub type El = u32;

/// The number of permutations of order `n`, or `None` on overflow of `T`.
pub fn checked_factorial<T>(n: usize) -> Option<T>
where
    T: CheckedMul + FromPrimitive + One,
{
    let mut acc = T::one();
    for i in 2..=n {
        acc = acc.checked_mul(&T::from_usize(i)?)?;
    }
    Some(acc)
}
