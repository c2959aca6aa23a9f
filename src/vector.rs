use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace, warn};

use crate::error::{Result, SnapshotError, VectorError};
use crate::snapshot::VectorSnapshot;

pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_MULTIPLIER: usize = 2;

/// Largest capacity a `Vec<i64>` can address.
pub const MAX_CAPACITY: usize = isize::MAX as usize / std::mem::size_of::<i64>();

// =============================================================================
// Unlocked state: growth policy and index checks
// =============================================================================

struct Inner {
    items: Vec<i64>,
    // Logical capacity; physical storage is reserved up to it when possible.
    capacity: usize,
    multiplier: usize,
}

impl Inner {
    fn with_capacity(capacity: usize, multiplier: usize) -> Self {
        let mut items = Vec::new();
        if items.try_reserve_exact(capacity).is_err() {
            debug!(capacity, "deferring allocation for oversized capacity");
        }
        Inner {
            items,
            capacity,
            multiplier,
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    /// Grows to `capacity * multiplier`, or straight to `target` when the
    /// product still falls short (multiplier <= 1, capacity 0).
    fn ensure_capacity(&mut self, target: usize) {
        if target <= self.capacity {
            return;
        }

        let grown = self.capacity.saturating_mul(self.multiplier).max(target);
        if self.items.try_reserve_exact(grown - self.items.len()).is_err() {
            // Only what the caller is about to store has to fit.
            self.items.reserve_exact(target - self.items.len());
        }
        trace!(from = self.capacity, to = grown, required = target, "growing vector capacity");
        self.capacity = grown;
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(VectorError::InvalidIndex {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn append(&mut self, items: &[i64]) {
        self.ensure_capacity(self.len() + items.len());
        self.items.extend_from_slice(items);
    }
}

// =============================================================================
// Vector: lock discipline
// =============================================================================

/// A growable, thread-safe sequence of `i64`.
///
/// Every operation takes `&self` and runs under an internal `RwLock`:
/// mutators hold it exclusively, readers share it. Callbacks handed to
/// [`each`](Vector::each), [`any`](Vector::any), [`all`](Vector::all),
/// [`remove_if`](Vector::remove_if), [`accumulate`](Vector::accumulate) and
/// [`reduce`](Vector::reduce) run while the lock is held, so they must not
/// call back into the same vector.
pub struct Vector {
    inner: RwLock<Inner>,
}

impl Vector {
    fn from_inner(inner: Inner) -> Self {
        Vector {
            inner: RwLock::new(inner),
        }
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("vector lock poisoned, recovering for read");
            poisoned.into_inner()
        })
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| {
            warn!("vector lock poisoned, recovering for write");
            poisoned.into_inner()
        })
    }

    /// Runs `f` with both vectors read-locked. Locks are taken in address
    /// order so two threads pairing the same vectors cannot deadlock.
    fn with_pair<R>(&self, other: &Vector, f: impl FnOnce(&Inner, &Inner) -> R) -> R {
        if std::ptr::eq(self, other) {
            let inner = self.read_inner();
            return f(&inner, &inner);
        }

        if (self as *const Vector) < (other as *const Vector) {
            let left = self.read_inner();
            let right = other.read_inner();
            f(&left, &right)
        } else {
            let right = other.read_inner();
            let left = self.read_inner();
            f(&left, &right)
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Empty vector with capacity 10 and multiplier 2.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_MULTIPLIER)
    }

    /// Empty vector with the given capacity and growth multiplier. Neither
    /// value is validated.
    pub fn with_capacity(capacity: usize, multiplier: usize) -> Self {
        Self::from_inner(Inner::with_capacity(capacity, multiplier))
    }

    /// Builds a default vector and appends `items` in one batch. Capacity
    /// follows the normal growth policy rather than fitting the input.
    pub fn from_items(items: &[i64]) -> Self {
        let vector = Self::new();
        vector.append_all(items);
        vector
    }

    /// Restores a vector from a snapshot taken from outside data.
    pub(crate) fn from_snapshot(
        snapshot: VectorSnapshot,
    ) -> std::result::Result<Self, SnapshotError> {
        if snapshot.capacity > MAX_CAPACITY {
            return Err(SnapshotError::CapacityTooLarge {
                capacity: snapshot.capacity,
                max: MAX_CAPACITY,
            });
        }

        let capacity = snapshot.capacity.max(snapshot.items.len());
        let mut inner = Inner::with_capacity(capacity, snapshot.multiplier);
        inner.append(&snapshot.items);
        Ok(Self::from_inner(inner))
    }

    // =========================================================================
    // Mutating operations (exclusive lock)
    // =========================================================================

    /// Inserts `item` at `index`, shifting later elements right.
    ///
    /// `index` must be `< len()`; on an empty vector `add(0, _)` appends.
    pub fn add(&self, index: usize, item: i64) -> Result<()> {
        let mut inner = self.write_inner();
        if index == 0 && inner.items.is_empty() {
            inner.append(&[item]);
            return Ok(());
        }

        inner.check_index(index)?;
        let target = inner.len() + 1;
        inner.ensure_capacity(target);
        inner.items.insert(index, item);
        Ok(())
    }

    /// Overwrites the element at `index`. Never grows the vector.
    pub fn set(&self, index: usize, item: i64) -> Result<()> {
        let mut inner = self.write_inner();
        inner.check_index(index)?;
        inner.items[index] = item;
        Ok(())
    }

    pub fn append(&self, item: i64) {
        self.write_inner().append(&[item]);
    }

    /// Appends `items` in order, growing at most once for the whole batch.
    pub fn append_all(&self, items: &[i64]) {
        self.write_inner().append(items);
    }

    /// Removes and returns the element at `index`. Capacity is kept.
    pub fn remove(&self, index: usize) -> Result<i64> {
        let mut inner = self.write_inner();
        inner.check_index(index)?;
        Ok(inner.items.remove(index))
    }

    /// Removes every element matching `predicate`.
    ///
    /// Elements are visited from the back so earlier indices stay valid while
    /// removing; survivors keep their relative order.
    pub fn remove_if<F>(&self, mut predicate: F)
    where
        F: FnMut(i64) -> bool,
    {
        let mut inner = self.write_inner();
        let mut removed = 0usize;
        for index in (0..inner.len()).rev() {
            if predicate(inner.items[index]) {
                inner.items.remove(index);
                removed += 1;
            }
        }
        debug!(removed, remaining = inner.len(), "remove_if finished");
    }

    /// Drops all elements but keeps the allocated capacity.
    pub fn clear(&self) {
        let mut inner = self.write_inner();
        debug!(cleared = inner.len(), capacity = inner.capacity, "clearing vector");
        inner.items.clear();
    }

    // =========================================================================
    // Read-only operations (shared lock)
    // =========================================================================

    pub fn peek(&self, index: usize) -> Result<i64> {
        let inner = self.read_inner();
        inner.check_index(index)?;
        Ok(inner.items[index])
    }

    /// Lowest index holding `item`, or `None` when absent.
    pub fn index_of(&self, item: i64) -> Option<usize> {
        self.read_inner()
            .items
            .iter()
            .position(|&candidate| candidate == item)
    }

    pub fn len(&self) -> usize {
        self.read_inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_inner().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.read_inner().capacity
    }

    pub fn multiplier(&self) -> usize {
        self.read_inner().multiplier
    }

    /// Copies the elements out in order. An empty vector yields an
    /// unallocated `Vec`.
    pub fn to_vec(&self) -> Vec<i64> {
        let inner = self.read_inner();
        if inner.items.is_empty() {
            return Vec::new();
        }
        inner.items.clone()
    }

    /// Consistent copy of items, capacity and multiplier taken under one lock.
    pub fn snapshot(&self) -> VectorSnapshot {
        let inner = self.read_inner();
        VectorSnapshot {
            items: inner.items.to_vec(),
            capacity: inner.capacity,
            multiplier: inner.multiplier,
        }
    }

    /// True when both vectors hold the same elements in the same order.
    pub fn equal(&self, other: &Vector) -> bool {
        self.with_pair(other, |left, right| left.items == right.items)
    }

    /// Calls `visit(index, item)` in index order until it returns `false`.
    pub fn each<F>(&self, mut visit: F)
    where
        F: FnMut(usize, i64) -> bool,
    {
        let inner = self.read_inner();
        for (index, &item) in inner.items.iter().enumerate() {
            if !visit(index, item) {
                break;
            }
        }
    }

    /// `false` on an empty vector.
    pub fn any<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(i64) -> bool,
    {
        self.read_inner().items.iter().any(|&item| predicate(item))
    }

    /// Also `false` on an empty vector: there must be at least one element
    /// and every element must match.
    pub fn all<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(i64) -> bool,
    {
        let inner = self.read_inner();
        !inner.items.is_empty() && inner.items.iter().all(|&item| predicate(item))
    }

    /// Sum of elementwise products, with wrapping arithmetic.
    ///
    /// Both vectors are read-locked for the duration of the call.
    pub fn inner_product(&self, other: &Vector) -> Result<i64> {
        self.with_pair(other, |left, right| {
            if left.len() != right.len() {
                return Err(VectorError::SizeMismatch {
                    left: left.len(),
                    right: right.len(),
                });
            }

            Ok(left
                .items
                .iter()
                .zip(&right.items)
                .fold(0i64, |sum, (&a, &b)| sum.wrapping_add(a.wrapping_mul(b))))
        })
    }

    /// Running fold: `out[0] = items[0]`, `out[i] = combine(out[i - 1], items[i])`.
    ///
    /// The result is a fresh default vector grown by appends.
    pub fn accumulate<F>(&self, mut combine: F) -> Vector
    where
        F: FnMut(i64, i64) -> i64,
    {
        let inner = self.read_inner();
        let mut out = Inner::with_capacity(DEFAULT_CAPACITY, DEFAULT_MULTIPLIER);

        let mut items = inner.items.iter().copied();
        if let Some(first) = items.next() {
            let mut acc = first;
            out.append(&[acc]);
            for item in items {
                acc = combine(acc, item);
                out.append(&[acc]);
            }
        }

        Vector::from_inner(out)
    }

    /// Left fold seeded with the first element. Returns 0 when empty.
    pub fn reduce<F>(&self, combine: F) -> i64
    where
        F: FnMut(i64, i64) -> i64,
    {
        let inner = self.read_inner();
        let mut items = inner.items.iter().copied();
        match items.next() {
            Some(first) => items.fold(first, combine),
            None => 0,
        }
    }
}

// =============================================================================
// Standard trait surface
// =============================================================================

impl Default for Vector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Vector {
    /// Deep copy with the same capacity and multiplier.
    fn clone(&self) -> Self {
        let inner = self.read_inner();
        let mut copy = Inner::with_capacity(inner.capacity, inner.multiplier);
        copy.append(&inner.items);
        Vector::from_inner(copy)
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Vector {}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read_inner();
        f.debug_struct("Vector")
            .field("items", &inner.items)
            .field("capacity", &inner.capacity)
            .field("multiplier", &inner.multiplier)
            .finish()
    }
}

impl From<&[i64]> for Vector {
    fn from(items: &[i64]) -> Self {
        Self::from_items(items)
    }
}

impl From<Vec<i64>> for Vector {
    fn from(items: Vec<i64>) -> Self {
        Self::from_items(&items)
    }
}

impl FromIterator<i64> for Vector {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let items: Vec<i64> = iter.into_iter().collect();
        Self::from_items(&items)
    }
}

impl Extend<i64> for Vector {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        let items: Vec<i64> = iter.into_iter().collect();
        self.inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .append(&items);
    }
}

// =============================================================================
// Tests
// =============================================================================
