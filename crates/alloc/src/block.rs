//! Block metadata for the simulated address space

use serde::Serialize;

/// A contiguous byte range of the simulated address space.
///
/// A block lives in exactly one of the allocator's two lists and has no
/// identity beyond its position there; list moves copy the record by value.
/// `ref_count` is only meaningful while the block sits on the used list — a
/// released block keeps whatever count it reached, and nothing reads it again
/// until the range is re-allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Offset of the first byte, counted from the start of the space.
    pub start: usize,
    /// Length in bytes. Never zero for a stored block.
    pub size: usize,
    /// Outstanding references. Allocation hands out a block with count 1.
    pub ref_count: u32,
}

impl Block {
    /// Create a free-list record. The count is a placeholder until the range
    /// is allocated.
    pub(crate) fn free(start: usize, size: usize) -> Self {
        Self {
            start,
            size,
            ref_count: 0,
        }
    }

    /// One past the last byte covered by this block.
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    /// True when `other` begins exactly where this block ends.
    #[inline]
    #[must_use]
    pub fn precedes(&self, other: &Block) -> bool {
        self.end() == other.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_is_exclusive() {
        let block = Block::free(10, 5);
        assert_eq!(block.end(), 15);
    }

    #[test]
    fn adjacency_requires_exact_touch() {
        let a = Block::free(0, 10);
        let b = Block::free(10, 5);
        let c = Block::free(16, 4);
        assert!(a.precedes(&b));
        assert!(!b.precedes(&c));
        assert!(!b.precedes(&a));
    }
}
