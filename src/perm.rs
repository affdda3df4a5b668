//! Views of permutations stored in slices.
use std::fmt;
use std::ops::Index;

use num_integer::Integer;
use num_traits::Signed;

use crate::{El, Error, Result};

/// A view of a permutation of a finite set.
///
/// The viewed slice of length n is expected to contain the images of {0, ..., n-1}, i.e. each of
/// 0..n exactly once. This is not checked on construction, use [`PermView::is_permutation`] when
/// the contents are not known to be valid.
///
/// A view does not own or copy the elements. Views handed out by a
/// [`Generator`](crate::generate::Generator) borrow its working buffer and only stay valid until
/// the next step.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermView<'a> {
    perm: &'a [El],
}

impl<'a> PermView<'a> {
    /// View a slice containing the images of 0..n.
    pub fn new(perm: &'a [El]) -> PermView<'a> {
        PermView { perm }
    }

    /// The number of elements, n.
    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// The viewed slice.
    pub fn as_slice(&self) -> &'a [El] {
        self.perm
    }

    /// The image of position `index`, or `None` if it is out of range.
    pub fn get(&self, index: usize) -> Option<El> {
        self.perm.get(index).cloned()
    }

    /// The image of position `index`.
    ///
    /// Fails with [`Error::IndexOutOfRange`] if `index` is not below [`len`](PermView::len).
    pub fn at(&self, index: usize) -> Result<El> {
        self.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Whether the viewed slice contains each of 0..n exactly once.
    pub fn is_permutation(&self) -> bool {
        self.is_permutation_with_scratch(&mut vec![])
    }

    /// Whether the viewed slice contains each of 0..n exactly once. Use existing scratch space.
    pub fn is_permutation_with_scratch(&self, scratch: &mut Vec<bool>) -> bool {
        let seen = scratch;
        seen.clear();
        seen.resize(self.len(), false);

        for &p_i in self.perm {
            let p_i = p_i as usize;
            if p_i >= self.len() || seen[p_i] {
                return false;
            }
            seen[p_i] = true;
        }
        true
    }

    /// The number of inversions.
    ///
    /// An inversion is a pair of positions k < l where the image of k is not less than the image
    /// of l. This checks all pairs and takes quadratic time.
    pub fn count_inversions(&self) -> usize {
        let mut count = 0;
        for (k, &p_k) in self.perm.iter().enumerate() {
            for &p_l in &self.perm[k + 1..] {
                if p_k >= p_l {
                    count += 1;
                }
            }
        }
        count
    }

    /// The parity of the number of inversions.
    pub fn parity(&self) -> Parity {
        if self.count_inversions().is_even() {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// The sign of this permutation, `1` for even and `-1` for odd permutations.
    pub fn sign<T: Signed>(&self) -> T {
        self.parity().sign()
    }
}

/// The parity of a permutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// `1` for [`Parity::Even`] and `-1` for [`Parity::Odd`].
    pub fn sign<T: Signed>(self) -> T {
        match self {
            Parity::Even => T::one(),
            Parity::Odd => -T::one(),
        }
    }
}

impl<'a> Index<usize> for PermView<'a> {
    type Output = El;

    /// Panics when `index` is out of range.
    fn index(&self, index: usize) -> &El {
        &self.perm[index]
    }
}

impl<'a> From<&'a [El]> for PermView<'a> {
    fn from(perm: &'a [El]) -> PermView<'a> {
        PermView::new(perm)
    }
}

impl<'a> fmt::Display for PermView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("[")?;
        for (i, p_i) in self.perm.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(p_i, f)?;
        }
        f.write_str("]")
    }
}

impl<'a> fmt::Debug for PermView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
