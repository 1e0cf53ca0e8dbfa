use crate::search::prelude::*;

/// A fixed-capacity FIFO ring of combinations, stored back to back in one flat buffer.
///
/// Each slot holds `width` cell indices. The batch never grows: `push` refuses once `capacity` combinations are
/// queued, which is what keeps the hot loop free of allocation.
#[derive(Clone, Debug)]
pub struct WorkBatch {
    cells: Box<[CellIndex]>,
    width: usize,
    capacity: usize,
    head: usize,
    len: usize,
}

impl WorkBatch {
    /// An empty batch of `capacity` combinations of `width` clicks each.
    pub fn new(capacity: usize, width: usize) -> WorkBatch {
        WorkBatch {
            cells: vec![0; capacity * width].into_boxed_slice(),
            width,
            capacity,
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Drops every queued combination.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    #[inline]
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity * self.width
    }

    /// Appends a combination if there is room; returns whether it was stored.
    #[inline]
    pub fn push(&mut self, combination: &[CellIndex]) -> bool {
        debug_assert_eq!(combination.len(), self.width);
        if self.is_full() {
            return false;
        }
        let at = self.slot(self.len);
        self.cells[at..at + self.width].copy_from_slice(combination);
        self.len += 1;
        true
    }

    /// The oldest combination, if any.
    pub fn front(&self) -> Option<&[CellIndex]> {
        if self.is_empty() {
            return None;
        }
        let at = self.slot(0);
        Some(&self.cells[at..at + self.width])
    }

    /// Takes the oldest combination into `out`, if one is present.
    #[inline]
    pub fn pop_into(&mut self, out: &mut [CellIndex]) -> bool {
        debug_assert_eq!(out.len(), self.width);
        if self.is_empty() {
            return false;
        }
        let at = self.slot(0);
        out.copy_from_slice(&self.cells[at..at + self.width]);
        self.head = (self.head + 1) % self.capacity;
        self.len -= 1;
        if self.len == 0 {
            self.head = 0;
        }
        true
    }

    /// Moves as many combinations as fit from the front of this batch to the back of `other`, preserving order.
    /// Returns how many were moved; anything left over stays here.
    pub fn drain_to(&mut self, other: &mut WorkBatch) -> usize {
        debug_assert_eq!(self.width, other.width);
        let mut moved = 0;
        while !self.is_empty() && !other.is_full() {
            let from = self.slot(0);
            let to = other.slot(other.len);
            other.cells[to..to + self.width].copy_from_slice(&self.cells[from..from + self.width]);
            other.len += 1;
            self.head = (self.head + 1) % self.capacity;
            self.len -= 1;
            moved += 1;
        }
        if self.len == 0 {
            self.head = 0;
        }
        moved
    }

    /// Iterates the queued combinations oldest first, without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &[CellIndex]> {
        (0..self.len).map(move |offset| {
            let at = self.slot(offset);
            &self.cells[at..at + self.width]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_refuses_when_full() {
        let mut batch = WorkBatch::new(2, 3);
        assert!(batch.push(&[1, 2, 3]));
        assert!(batch.push(&[4, 5, 6]));
        assert!(batch.is_full());
        assert!(!batch.push(&[7, 8, 9]));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn ring_wraps_in_fifo_order() {
        let mut batch = WorkBatch::new(3, 2);
        let mut out = [0; 2];
        batch.push(&[0, 1]);
        batch.push(&[2, 3]);
        assert!(batch.pop_into(&mut out));
        assert_eq!(out, [0, 1]);
        batch.push(&[4, 5]);
        batch.push(&[6, 7]); // wraps around the end of the buffer
        assert_eq!(batch.iter().collect::<Vec<_>>(), vec![&[2, 3][..], &[4, 5], &[6, 7]]);
        while batch.pop_into(&mut out) {}
        assert_eq!(out, [6, 7]);
        assert!(batch.is_empty());
        assert!(!batch.pop_into(&mut out));
        assert_eq!(batch.front(), None);
    }

    #[test]
    fn drain_keeps_leftovers() {
        let mut source = WorkBatch::new(4, 1);
        let mut target = WorkBatch::new(4, 1);
        target.push(&[9]);
        target.push(&[8]);
        for i in 0..4 {
            source.push(&[i]);
        }

        assert_eq!(source.drain_to(&mut target), 2);
        assert_eq!(source.len(), 2);
        assert_eq!(source.front(), Some(&[2][..]));
        assert_eq!(target.iter().map(|c| c[0]).collect::<Vec<_>>(), vec![9, 8, 0, 1]);

        let mut empty = WorkBatch::new(4, 1);
        assert_eq!(source.drain_to(&mut empty), 2);
        assert!(source.is_empty());
    }
}
