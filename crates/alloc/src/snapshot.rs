//! Read-only views of allocator state
//!
//! A [`Snapshot`] is the structured report the core hands to whatever sink
//! the caller chose. Formatting lives here (a `Display` impl in the
//! reference report layout, plus `serde::Serialize` for machine output);
//! writing bytes anywhere is the caller's job.

use core::fmt;

use serde::Serialize;

use crate::block::Block;

/// Point-in-time copy of both block lists, in their current list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Free blocks, in free-list order.
    pub free: Vec<Block>,
    /// Used blocks, in used-list order.
    pub used: Vec<Block>,
    /// Size of the simulated space in bytes.
    pub total_size: usize,
}

impl Snapshot {
    /// Total bytes across all free blocks.
    #[must_use]
    pub fn free_bytes(&self) -> usize {
        self.free.iter().map(|block| block.size).sum()
    }

    /// Total bytes across all used blocks.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.used.iter().map(|block| block.size).sum()
    }

    /// Size of the largest free block, or 0 when nothing is free.
    #[must_use]
    pub fn largest_free(&self) -> usize {
        self.free.iter().map(|block| block.size).max().unwrap_or(0)
    }

    /// External fragmentation ratio: `1 - largest_free / free_bytes`.
    ///
    /// Purely observational. 0.0 when the free space is one block (or there
    /// is none at all), approaching 1.0 as the free space shatters.
    #[must_use]
    pub fn fragmentation(&self) -> f64 {
        let total = self.free_bytes();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.largest_free() as f64 / total as f64)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Free Memory Blocks:")?;
        for block in &self.free {
            writeln!(f, "Start: {}, Size: {}", block.start, block.size)?;
        }
        writeln!(f, "Used Memory Blocks:")?;
        for block in &self.used {
            writeln!(
                f,
                "Start: {}, Size: {}, RefCount: {}",
                block.start, block.size, block.ref_count
            )?;
        }
        Ok(())
    }
}
