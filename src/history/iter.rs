//! Iterators over a [`RingBuffer`], oldest record first.

use std::iter::{Chain, FusedIterator};
use std::slice;

use super::RingBuffer;

/// Borrowing iterator that walks logical offsets `front..back`.
///
/// Offsets are relative to the oldest live record, not physical slots.
pub struct Iter<'a, T> {
    buf: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(buf: &'a RingBuffer<T>) -> Self {
        Self {
            buf,
            front: 0,
            back: buf.len(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.buf.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.buf.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

type SlotsMut<'a, T> = Chain<slice::IterMut<'a, Option<T>>, slice::IterMut<'a, Option<T>>>;

/// Mutable iterator over live records.
///
/// Walks the slots from `first` to the end of storage and then wraps to the
/// start; only live slots hold a record.
pub struct IterMut<'a, T> {
    slots: SlotsMut<'a, T>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(tail: &'a mut [Option<T>], head: &'a mut [Option<T>], len: usize) -> Self {
        Self {
            slots: tail.iter_mut().chain(head.iter_mut()),
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.slots.by_ref().find_map(Option::as_mut)?;
        self.remaining -= 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.slots.by_ref().rev().find_map(Option::as_mut)?;
        self.remaining -= 1;
        Some(record)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator that drains the buffer from the oldest record.
pub struct IntoIter<T> {
    buf: RingBuffer<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(buf: RingBuffer<T>) -> Self {
        Self { buf }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.buf.len(), Some(self.buf.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.buf.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
