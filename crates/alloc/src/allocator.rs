//! The block-list allocator
//!
//! Two ordered lists partition the simulated space: `free` and `used`.
//! Allocation is first-fit over the free list *in its stored order* — the
//! list is never re-sorted for the search, so the scan order is whatever
//! history of splits and releases produced. Compaction is the one place
//! addresses are rewritten: free blocks are sorted and coalesced, used
//! blocks are repacked from address 0 in their current list order.
//!
//! Two properties of this policy are deliberate, inherited from the system
//! being simulated, and pinned by tests rather than "fixed":
//!
//! - Used blocks are repacked in list order, not address order, so after a
//!   free/reuse cycle the packed layout can differ from address order.
//! - Compaction does not rewrite free-list addresses to trail the repacked
//!   used region; a snapshot taken right after `compact` can show free
//!   ranges that overlap the new used layout. The lists partition the space
//!   between every other pair of operations.

use tracing::{debug, trace};

use crate::block::Block;
use crate::error::{AllocError, AllocResult};
use crate::snapshot::Snapshot;

/// Default simulated address space: 64 MiB, matching the reference run.
pub const DEFAULT_SPACE_SIZE: usize = 64 * 1024 * 1024;

/// Result of a [`Allocator::deallocate`] call.
///
/// Deallocation never fails; every case is an ordinary outcome the caller
/// can report. An address with no matching block yields [`NotFound`]
/// explicitly rather than being silently swallowed.
///
/// [`NotFound`]: DeallocOutcome::NotFound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeallocOutcome {
    /// The count reached zero and the block moved to the free list.
    Released { start: usize, size: usize },
    /// The count was decremented but other references remain; the block
    /// stays on the used list and its memory is not reclaimed.
    StillReferenced { start: usize, remaining: u32 },
    /// No used block starts at this address. Addresses that fall *inside*
    /// a block do not match; only exact starts do.
    NotFound { address: usize },
}

impl DeallocOutcome {
    /// True when the call actually returned memory to the free list.
    #[must_use]
    pub fn released(&self) -> bool {
        matches!(self, Self::Released { .. })
    }
}

/// A simulated first-fit allocator over a fixed contiguous address space.
///
/// The allocator exclusively owns both block lists; callers interact only
/// through the four operations and the read-only [`snapshot`]. Construct
/// with an explicit size so tests can hold several independent instances.
///
/// # Example
/// ```
/// use blocksim_alloc::Allocator;
///
/// let mut heap = Allocator::new(100);
/// let addr = heap.allocate(30)?;
/// assert_eq!(addr, 0);
/// assert!(heap.deallocate(addr).released());
/// # Ok::<(), blocksim_alloc::AllocError>(())
/// ```
///
/// [`snapshot`]: Allocator::snapshot
#[derive(Debug, Clone)]
pub struct Allocator {
    free: Vec<Block>,
    used: Vec<Block>,
    total_size: usize,
}

impl Allocator {
    /// Create an allocator whose space is one free block `[0, total_size)`.
    pub fn new(total_size: usize) -> Self {
        let free = if total_size == 0 {
            Vec::new()
        } else {
            vec![Block::free(0, total_size)]
        };
        Self {
            free,
            used: Vec::new(),
            total_size,
        }
    }

    /// Size of the simulated space in bytes.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Allocate `size` bytes and return the starting address.
    ///
    /// Scans the free list in stored order and takes the first block large
    /// enough. An exact fit removes the free record; a larger block is
    /// split in place, keeping the tail on the free list at the same list
    /// position. On failure the state is untouched and the error carries
    /// the largest free block for diagnostics.
    pub fn allocate(&mut self, size: usize) -> AllocResult<usize> {
        if size == 0 {
            return Err(AllocError::InvalidSize { size });
        }

        let Some(index) = self.free.iter().position(|block| block.size >= size) else {
            let largest_free = self.free.iter().map(|block| block.size).max().unwrap_or(0);
            return Err(AllocError::out_of_memory(size, largest_free));
        };

        let start = self.free[index].start;
        self.used.push(Block {
            start,
            size,
            ref_count: 1,
        });

        if self.free[index].size == size {
            // Exact fit: no zero-size remnant is ever kept.
            self.free.remove(index);
        } else {
            let remainder = &mut self.free[index];
            remainder.start += size;
            remainder.size -= size;
        }

        debug!(start, size, "allocated block");
        Ok(start)
    }

    /// Drop one reference to the block starting at `address`.
    ///
    /// Only an exact start-address match counts. When the count reaches
    /// zero the record moves, start and size unchanged, to the back of the
    /// free list — which is what makes the free list insertion-ordered
    /// rather than address-ordered.
    pub fn deallocate(&mut self, address: usize) -> DeallocOutcome {
        let Some(index) = self.used.iter().position(|block| block.start == address) else {
            trace!(address, "deallocate: no used block at address");
            return DeallocOutcome::NotFound { address };
        };

        self.used[index].ref_count -= 1;
        if self.used[index].ref_count == 0 {
            let block = self.used.remove(index);
            self.free.push(block);
            debug!(start = block.start, size = block.size, "released block");
            DeallocOutcome::Released {
                start: block.start,
                size: block.size,
            }
        } else {
            let remaining = self.used[index].ref_count;
            debug!(address, remaining, "dropped reference, block still held");
            DeallocOutcome::StillReferenced {
                start: address,
                remaining,
            }
        }
    }

    /// Coalesce adjacent free blocks and repack used blocks from address 0.
    ///
    /// The free list is sorted by start address first, so every adjacency
    /// ends up next to its neighbour and a single pass suffices: the cursor
    /// stays on a block while it keeps absorbing its successor, which is
    /// what lets a run of three or more touching blocks collapse into one.
    /// Used blocks are then assigned new starts cumulatively *in list
    /// order* — see the module docs for the two layout caveats this policy
    /// carries. Compaction cannot fail.
    pub fn compact(&mut self) {
        self.free.sort_by_key(|block| block.start);

        let mut index = 0;
        while index + 1 < self.free.len() {
            if self.free[index].precedes(&self.free[index + 1]) {
                let absorbed = self.free.remove(index + 1);
                self.free[index].size += absorbed.size;
            } else {
                index += 1;
            }
        }

        let mut cursor = 0;
        for block in &mut self.used {
            block.start = cursor;
            cursor += block.size;
        }

        debug!(
            free_blocks = self.free.len(),
            used_blocks = self.used.len(),
            "compacted"
        );
    }

    /// Read-only view of both lists in their current order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            free: self.free.clone(),
            used: self.used.clone(),
            total_size: self.total_size,
        }
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(DEFAULT_SPACE_SIZE)
    }
}
