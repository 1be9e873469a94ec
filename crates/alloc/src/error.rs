//! Error types for blocksim-alloc
//!
//! Uses thiserror for clean, idiomatic Rust error definitions. Both
//! conditions are recoverable and local to a single command; nothing in the
//! core aborts a run.

use thiserror::Error;

use tracing::warn;

/// Errors produced by [`Allocator`](crate::Allocator) operations.
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// No free block is large enough for the request. State is unchanged.
    #[error("allocation failed: requested {requested} bytes, largest free block is {largest_free}")]
    OutOfMemory {
        requested: usize,
        largest_free: usize,
    },

    /// Zero-sized requests are rejected before the free list is consulted.
    #[error("invalid allocation size: {size}")]
    InvalidSize { size: usize },
}

impl AllocError {
    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfMemory { .. } => "SIM:ALLOC:OOM",
            Self::InvalidSize { .. } => "SIM:ALLOC:SIZE",
        }
    }

    /// Check if error is retryable
    ///
    /// An out-of-memory failure may succeed later, after blocks are released
    /// or the space is compacted. An invalid size never will.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }

    /// Create an out-of-memory error
    pub(crate) fn out_of_memory(requested: usize, largest_free: usize) -> Self {
        warn!(requested, largest_free, "allocation failed");
        Self::OutOfMemory {
            requested,
            largest_free,
        }
    }
}

/// Result type alias for allocator operations
pub type AllocResult<T> = core::result::Result<T, AllocError>;
