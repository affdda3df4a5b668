//! Tables of all permutations of each order.
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, trace};

use crate::generate::{AnyGenerator, Backtracking, FromCache, Strategy};
use crate::{checked_factorial, El, Error, Result};

/// All permutations of {0, ..., n-1} for a fixed order n.
///
/// The n! permutations are stored back to back in a single allocation, each as a row of n images.
/// Rows are grouped by their first element in ascending order. Within a group the remaining
/// elements are ordered like the rows of the table of order n-1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheTable {
    order: usize,
    rows: usize,
    data: Box<[El]>,
}

impl CacheTable {
    /// The single, empty permutation of order 0.
    fn order_zero() -> CacheTable {
        CacheTable {
            order: 0,
            rows: 1,
            data: Box::new([]),
        }
    }

    fn order_one() -> CacheTable {
        CacheTable {
            order: 1,
            rows: 1,
            data: Box::new([0]),
        }
    }

    /// Build the table of the next larger order from this one.
    ///
    /// Each permutation of order n+1 is a choice of first element followed by a permutation of the
    /// n remaining elements. The remaining elements are taken from this table with every value at
    /// or above the chosen first element shifted up by one.
    fn extend(&self) -> Result<CacheTable> {
        let order = self.order + 1;

        if order > El::MAX as usize {
            return Err(Error::OrderTooLarge { order });
        }
        let len = checked_factorial::<usize>(order)
            .and_then(|rows| rows.checked_mul(order).map(|len| (rows, len)));
        let (rows, len) = len.ok_or(Error::OrderTooLarge { order })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|source| Error::Allocation { order, source })?;

        for first in 0..order as El {
            for row in self.rows() {
                data.push(first);
                data.extend(row.iter().map(|&p_i| if p_i < first { p_i } else { p_i + 1 }));
            }
        }

        debug_assert_eq!(data.len(), len);

        Ok(CacheTable {
            order,
            rows,
            data: data.into_boxed_slice(),
        })
    }

    /// The order n of the contained permutations.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The number of contained permutations, n!.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the table has no rows.
    ///
    /// Tables built by a [`PermCache`] always contain at least one permutation.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The permutation in row `index`.
    ///
    /// Panics when `index` is out of range.
    pub fn row(&self, index: usize) -> &[El] {
        assert!(index < self.rows, "row {} out of range", index);
        &self.data[index * self.order..(index + 1) * self.order]
    }

    /// Iterate over all rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = &[El]> + '_ {
        (0..self.rows).map(move |index| self.row(index))
    }

    /// All rows concatenated.
    pub fn as_slice(&self) -> &[El] {
        &self.data
    }
}

/// Permutation tables for all orders up to the largest order requested so far.
///
/// Tables are built on demand, in increasing order, each from the previous one. A built table is
/// never modified or dropped for the lifetime of the cache. Tables are reference counted so
/// generators don't borrow the cache.
///
/// Growing requires a mutable reference. To share a cache between threads use
/// [`SharedPermCache`].
#[derive(Clone, Debug)]
pub struct PermCache {
    tables: Vec<Arc<CacheTable>>,
}

impl Default for PermCache {
    fn default() -> PermCache {
        PermCache {
            tables: vec![
                Arc::new(CacheTable::order_zero()),
                Arc::new(CacheTable::order_one()),
            ],
        }
    }
}

impl PermCache {
    /// A cache holding the tables of order 0 and 1.
    pub fn new() -> PermCache {
        PermCache::default()
    }

    /// The largest order with a cached table.
    pub fn max_order(&self) -> usize {
        self.tables.len() - 1
    }

    /// The table for `order`, if it was built already.
    pub fn table(&self, order: usize) -> Option<&Arc<CacheTable>> {
        self.tables.get(order)
    }

    /// The number of elements stored across all tables.
    pub fn total_size(&self) -> usize {
        self.tables.iter().map(|table| table.as_slice().len()).sum()
    }

    /// Make sure the tables for all orders up to `order` are built.
    ///
    /// If building a table fails, all previously built tables are kept and nothing is added for
    /// the failing order or any larger one.
    pub fn try_ensure(&mut self, order: usize) -> Result<()> {
        while self.max_order() < order {
            let table = self.tables[self.max_order()].extend()?;
            debug!(
                "built permutation table of order {} ({} rows, {} elements)",
                table.order(),
                table.len(),
                table.as_slice().len()
            );
            self.tables.push(Arc::new(table));
        }
        Ok(())
    }

    /// Make sure the tables for all orders up to `order` are built.
    ///
    /// Panics if a table cannot be allocated. Table sizes grow factorially, so for anything beyond
    /// small orders this is an unrecoverable resource exhaustion. Use
    /// [`try_ensure`](PermCache::try_ensure) to handle it.
    pub fn ensure(&mut self, order: usize) {
        if let Err(err) = self.try_ensure(order) {
            panic!("{}", err);
        }
    }

    /// The table for `order`, building it if necessary.
    pub fn try_table(&mut self, order: usize) -> Result<Arc<CacheTable>> {
        self.try_ensure(order)?;
        Ok(self.tables[order].clone())
    }

    /// Enumerate all permutations of order `buffer.len()`, writing each into `buffer`.
    ///
    /// Fails if the table for this order cannot be built.
    pub fn try_generate<'b>(&mut self, buffer: &'b mut [El]) -> Result<FromCache<'b>> {
        let table = self.try_table(buffer.len())?;
        trace!("enumerating {} cached permutations of order {}", table.len(), table.order());
        Ok(FromCache::new(table, buffer))
    }

    /// Enumerate all permutations of order `buffer.len()`, writing each into `buffer`.
    ///
    /// Panics if the table for this order cannot be built, see [`ensure`](PermCache::ensure).
    pub fn generate<'b>(&mut self, buffer: &'b mut [El]) -> FromCache<'b> {
        self.try_generate(buffer).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Enumerate all permutations of order `buffer.len()` using the given strategy.
    ///
    /// [`Strategy::Backtracking`] does not use or grow the cache.
    pub fn try_generate_with<'b>(
        &mut self,
        strategy: Strategy,
        buffer: &'b mut [El],
    ) -> Result<AnyGenerator<'b>> {
        Ok(match strategy {
            Strategy::Cached => AnyGenerator::Cached(self.try_generate(buffer)?),
            Strategy::Backtracking => AnyGenerator::Backtracking(Backtracking::new(buffer)),
        })
    }
}

/// A [`PermCache`] that can be grown from multiple threads.
///
/// Building tables is serialized by a mutex. The lock is only held while looking up or building
/// tables, generators returned by this cache don't hold it.
#[derive(Debug, Default)]
pub struct SharedPermCache {
    cache: Mutex<PermCache>,
}

impl SharedPermCache {
    /// A shared cache holding the tables of order 0 and 1.
    pub fn new() -> SharedPermCache {
        SharedPermCache::default()
    }

    fn with_cache<R>(&self, f: impl FnOnce(&mut PermCache) -> R) -> R {
        // Tables are only appended once fully built, so a poisoned cache is still consistent.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cache)
    }

    /// The largest order with a cached table.
    pub fn max_order(&self) -> usize {
        self.with_cache(|cache| cache.max_order())
    }

    /// The table for `order`, building it if necessary.
    pub fn try_table(&self, order: usize) -> Result<Arc<CacheTable>> {
        self.with_cache(|cache| cache.try_table(order))
    }

    /// Enumerate all permutations of order `buffer.len()`, writing each into `buffer`.
    pub fn try_generate<'b>(&self, buffer: &'b mut [El]) -> Result<FromCache<'b>> {
        let table = self.try_table(buffer.len())?;
        trace!("enumerating {} shared cached permutations of order {}", table.len(), table.order());
        Ok(FromCache::new(table, buffer))
    }

    /// Enumerate all permutations of order `buffer.len()`, writing each into `buffer`.
    ///
    /// Panics if the table for this order cannot be built.
    pub fn generate<'b>(&self, buffer: &'b mut [El]) -> FromCache<'b> {
        self.try_generate(buffer).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Consume this and return the inner cache.
    pub fn into_inner(self) -> PermCache {
        self.cache.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<PermCache> for SharedPermCache {
    fn from(cache: PermCache) -> SharedPermCache {
        SharedPermCache {
            cache: Mutex::new(cache),
        }
    }
}
