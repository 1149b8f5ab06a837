// Copyright @yucwang 2026

use crate::core::storage::Storage;
use crate::math::constants::Float;

/// Collects the writes of a whole sample batch and applies them as one
/// addition per distinct storage cell.
#[derive(Debug, Default)]
pub struct Coalescer {
    pending: Vec<(usize, Float)>,
}

impl Coalescer {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { pending: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, index: usize, value: Float) {
        self.pending.push((index, value));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Sums pending writes per cell, adds each sum into `storage` and
    /// returns the number of cells written.
    pub fn flush(&mut self, storage: &Storage) -> usize {
        self.pending.sort_by_key(|&(index, _)| index);

        let mut written = 0;
        let mut iter = self.pending.drain(..).peekable();
        while let Some((index, mut sum)) = iter.next() {
            while let Some(&(next, value)) = iter.peek() {
                if next != index {
                    break;
                }
                sum += value;
                iter.next();
            }
            storage.cell(index).fetch_add(sum);
            written += 1;
        }
        written
    }
}
