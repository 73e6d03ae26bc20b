use std::collections::{VecDeque, vec_deque};
use std::num::NonZeroUsize;

use crate::error::RingError;

/// Fixed-capacity ring. Offset 0 is the front (most recently deposited),
/// `len() - 1` is the back (oldest).
///
/// Inserting at one end while full silently drops the item at the other end.
#[derive(Debug, Clone)]
pub struct Ring<T> {
    capacity: NonZeroUsize,
    items: VecDeque<T>,
}

impl<T> Ring<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity.get()),
        }
    }

    pub fn capacity(&self) -> usize { self.capacity.get() }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn is_full(&self) -> bool { self.items.len() == self.capacity.get() }

    /// Inserts at offset 0. Returns the back item if it had to be evicted.
    pub fn insert_front(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() { self.items.pop_back() } else { None };
        self.items.push_front(item);
        evicted
    }

    /// Inserts at the highest offset. Returns the front item if it had to be
    /// evicted.
    pub fn insert_back(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() { self.items.pop_front() } else { None };
        self.items.push_back(item);
        evicted
    }

    /// Removes the item at `offset`; later items shift down by one.
    pub fn remove_at(&mut self, offset: usize) -> Result<T, RingError> {
        let len = self.items.len();
        self.items.remove(offset).ok_or(RingError::OutOfRange { offset, len })
    }

    /// Removes the oldest item.
    pub fn remove_back(&mut self) -> Result<T, RingError> {
        match self.items.len() {
            0 => Err(RingError::OutOfRange { offset: 0, len: 0 }),
            len => self.remove_at(len - 1),
        }
    }

    pub fn peek_at(&self, offset: usize) -> Result<&T, RingError> {
        self.items.get(offset).ok_or(RingError::OutOfRange {
            offset,
            len: self.items.len(),
        })
    }

    /// Offset of the first item, front to back, matching `pred`.
    pub fn position(&self, pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(pred)
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, T> { self.items.iter() }
}
