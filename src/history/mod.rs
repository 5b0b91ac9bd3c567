//! Fixed-capacity history of the most recent frame records.
//!
//! `RingBuffer` owns at most `capacity` records in a slot array allocated once
//! at construction. Records are addressed by their logical offset from the
//! oldest live entry; the physical slot is `(first + offset) % capacity`.
//! Pushing into a full buffer evicts the oldest record first, so the buffer
//! never grows and push/pop stay O(1).

mod iter;

use std::ops::{Index, IndexMut};

pub use iter::{IntoIter, Iter, IterMut};

use crate::util::{KptError, KptResult};

/// Bounded FIFO of owned records, oldest first.
#[derive(Clone)]
pub struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    first: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer with room for `capacity` records.
    ///
    /// A zero capacity is rejected with [`KptError::ZeroCapacity`].
    pub fn new(capacity: usize) -> KptResult<Self> {
        if capacity == 0 {
            return Err(KptError::ZeroCapacity);
        }
        let slots = std::iter::repeat_with(|| None).take(capacity).collect();
        Ok(Self {
            slots,
            first: 0,
            len: 0,
        })
    }

    /// Returns the maximum number of records the buffer holds.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of live records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the next push will evict the oldest record.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    fn slot(&self, offset: usize) -> usize {
        (self.first + offset) % self.capacity()
    }

    /// Appends `record` as the newest entry.
    ///
    /// When the buffer is full the oldest record is removed before the new
    /// one is stored and handed back to the caller; dropping the returned
    /// value destroys it.
    pub fn push_back(&mut self, record: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.pop_front()
        } else {
            None
        };
        let slot = self.slot(self.len);
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(record);
        self.len += 1;
        evicted
    }

    /// Removes and returns the oldest record, or `None` when empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let record = self.slots[self.first].take();
        self.first = (self.first + 1) % self.capacity();
        self.len -= 1;
        record
    }

    /// Removes and returns the newest record, or `None` when empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let slot = self.slot(self.len - 1);
        self.len -= 1;
        self.slots[slot].take()
    }

    /// Drops every live record, oldest first.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
        self.first = 0;
    }

    /// Returns the record at logical offset `index` from the oldest entry.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[self.slot(index)].as_ref()
    }

    /// Mutable counterpart of [`RingBuffer::get`].
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = self.slot(index);
        self.slots[slot].as_mut()
    }

    /// Like [`RingBuffer::get`] but reports out-of-range access as an error.
    pub fn try_get(&self, index: usize) -> KptResult<&T> {
        let len = self.len;
        self.get(index)
            .ok_or(KptError::IndexOutOfRange { index, len })
    }

    /// Mutable counterpart of [`RingBuffer::try_get`].
    pub fn try_get_mut(&mut self, index: usize) -> KptResult<&mut T> {
        let len = self.len;
        self.get_mut(index)
            .ok_or(KptError::IndexOutOfRange { index, len })
    }

    /// Returns the oldest record.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the newest record (`end() - 1`).
    pub fn back(&self) -> Option<&T> {
        self.get_back(0)
    }

    /// Returns the newest record mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.get_back_mut(0)
    }

    /// Returns the record `n` steps before the newest one.
    ///
    /// `get_back(0)` is the newest record and `get_back(1)` the one pushed
    /// just before it.
    pub fn get_back(&self, n: usize) -> Option<&T> {
        let index = self.len.checked_sub(n)?.checked_sub(1)?;
        self.get(index)
    }

    /// Mutable counterpart of [`RingBuffer::get_back`].
    pub fn get_back_mut(&mut self, n: usize) -> Option<&mut T> {
        let index = self.len.checked_sub(n)?.checked_sub(1)?;
        self.get_mut(index)
    }

    /// Returns `(previous, current)`: the second newest and the newest record.
    ///
    /// `None` until at least two records have been pushed.
    pub fn latest_pair(&self) -> Option<(&T, &T)> {
        Some((self.get_back(1)?, self.get_back(0)?))
    }

    /// Iterates over live records from oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Mutably iterates over live records from oldest to newest.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let len = self.len;
        let first = self.first;
        let (head, tail) = self.slots.split_at_mut(first);
        IterMut::new(tail, head, len)
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    /// Panics when `index >= len()`; use [`RingBuffer::try_get`] to recover.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(record) => record,
            None => panic!(
                "{}",
                KptError::IndexOutOfRange {
                    index,
                    len: self.len
                }
            ),
        }
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(record) => record,
            None => panic!("{}", KptError::IndexOutOfRange { index, len }),
        }
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, records: I) {
        for record in records {
            self.push_back(record);
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut RingBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for RingBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
