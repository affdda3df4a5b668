//! Enumeration of all permutations of an order.
//!
//! Generators write each permutation into a buffer owned by the caller instead of allocating. As
//! the buffer is overwritten on every step, [`Generator::advance`] hands out a view that borrows
//! the generator and thus ends before the next step. Copy the view's contents to keep them.
use std::sync::Arc;

use crate::cache::CacheTable;
use crate::perm::PermView;
use crate::El;

/// Step-wise enumeration of permutations into a reused buffer.
pub trait Generator {
    /// Write the next permutation into the buffer and return a view of it.
    ///
    /// Returns `None` once all permutations were produced, and on every call after that.
    fn advance(&mut self) -> Option<PermView<'_>>;

    /// Run to the end, returning the number of remaining steps.
    fn count(mut self) -> usize
    where
        Self: Sized,
    {
        let mut steps = 0;
        while self.advance().is_some() {
            steps += 1;
        }
        steps
    }

    /// Run to the end, calling `f` on every permutation.
    fn for_each<F>(mut self, mut f: F)
    where
        Self: Sized,
        F: FnMut(PermView<'_>),
    {
        while let Some(perm) = self.advance() {
            f(perm);
        }
    }
}

/// How to enumerate permutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Copy rows out of a cached table, see [`FromCache`].
    Cached,
    /// Search by backtracking without a cache, see [`Backtracking`].
    Backtracking,
}

/// Enumerates permutations by copying the rows of a [`CacheTable`].
///
/// Produces all n! permutations of the table's order n in table order. For n = 0 this is a single
/// empty permutation.
#[derive(Debug)]
pub struct FromCache<'b> {
    table: Arc<CacheTable>,
    buffer: &'b mut [El],
    next_row: usize,
}

impl<'b> FromCache<'b> {
    /// Enumerate the rows of `table` into `buffer`.
    ///
    /// Panics when the length of `buffer` differs from the table's order.
    pub fn new(table: Arc<CacheTable>, buffer: &'b mut [El]) -> FromCache<'b> {
        assert_eq!(
            buffer.len(),
            table.order(),
            "buffer length does not match permutation order"
        );
        FromCache {
            table,
            buffer,
            next_row: 0,
        }
    }

    /// The number of permutations not produced yet.
    pub fn remaining(&self) -> usize {
        self.table.len() - self.next_row
    }

    /// Stop enumerating and recover the buffer.
    pub fn into_buffer(self) -> &'b mut [El] {
        self.buffer
    }
}

impl<'b> Generator for FromCache<'b> {
    fn advance(&mut self) -> Option<PermView<'_>> {
        if self.next_row >= self.table.len() {
            return None;
        }
        self.buffer.copy_from_slice(self.table.row(self.next_row));
        self.next_row += 1;
        Some(PermView::new(self.buffer))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchState {
    Searching,
    Produced,
    Done,
}

/// Enumerates permutations by backtracking, without any cache.
///
/// Every position of the buffer is a counter running from 0 to n-1. Positions are filled from the
/// left, and a position's value is incremented until it differs from all values left of it. When
/// a position overflows it is reset to 0 and the search backtracks to the previous one. This
/// checks O(n) values per step and produces permutations in lexicographic order.
///
/// Unlike [`FromCache`], this produces nothing for n = 0, not even the empty permutation.
#[derive(Debug)]
pub struct Backtracking<'b> {
    digits: &'b mut [El],
    pos: usize,
    state: SearchState,
}

impl<'b> Backtracking<'b> {
    /// Enumerate all permutations of order `buffer.len()` into `buffer`.
    ///
    /// The buffer is cleared before the search starts.
    pub fn new(buffer: &'b mut [El]) -> Backtracking<'b> {
        assert!(
            buffer.len() <= El::MAX as usize,
            "permutation order does not fit in an element"
        );
        for digit in buffer.iter_mut() {
            *digit = 0;
        }
        let state = if buffer.is_empty() {
            SearchState::Done
        } else {
            SearchState::Searching
        };
        Backtracking {
            digits: buffer,
            pos: 0,
            state,
        }
    }

    /// Stop enumerating and recover the buffer.
    pub fn into_buffer(self) -> &'b mut [El] {
        self.digits
    }

    /// Propagate overflowing positions to the left.
    ///
    /// Returns false when the first position overflowed, i.e. the search space is exhausted.
    fn carry(&mut self) -> bool {
        let n = self.digits.len();
        while self.digits[self.pos] as usize >= n {
            self.digits[self.pos] = 0;
            if self.pos == 0 {
                return false;
            }
            self.pos -= 1;
            self.digits[self.pos] += 1;
        }
        true
    }
}

impl<'b> Generator for Backtracking<'b> {
    fn advance(&mut self) -> Option<PermView<'_>> {
        match self.state {
            SearchState::Done => return None,
            SearchState::Produced => {
                // Resume by incrementing the last position of the permutation produced before.
                self.pos -= 1;
                self.digits[self.pos] += 1;
                if !self.carry() {
                    self.state = SearchState::Done;
                    return None;
                }
            }
            SearchState::Searching => {}
        }

        loop {
            let pos = self.pos;
            if self.digits[..pos].contains(&self.digits[pos]) {
                self.digits[pos] += 1;
            } else {
                self.pos += 1;
                if self.pos == self.digits.len() {
                    self.state = SearchState::Produced;
                    return Some(PermView::new(self.digits));
                }
            }

            if !self.carry() {
                self.state = SearchState::Done;
                return None;
            }
        }
    }
}

/// A generator of either [`Strategy`].
#[derive(Debug)]
pub enum AnyGenerator<'b> {
    Cached(FromCache<'b>),
    Backtracking(Backtracking<'b>),
}

impl<'b> AnyGenerator<'b> {
    /// The strategy this generator enumerates with.
    pub fn strategy(&self) -> Strategy {
        match self {
            AnyGenerator::Cached(_) => Strategy::Cached,
            AnyGenerator::Backtracking(_) => Strategy::Backtracking,
        }
    }

    /// Stop enumerating and recover the buffer.
    pub fn into_buffer(self) -> &'b mut [El] {
        match self {
            AnyGenerator::Cached(generator) => generator.into_buffer(),
            AnyGenerator::Backtracking(generator) => generator.into_buffer(),
        }
    }
}

impl<'b> Generator for AnyGenerator<'b> {
    fn advance(&mut self) -> Option<PermView<'_>> {
        match self {
            AnyGenerator::Cached(generator) => generator.advance(),
            AnyGenerator::Backtracking(generator) => generator.advance(),
        }
    }
}
