//! # blocksim-alloc
//!
//! Core of a simulated dynamic memory allocator over a single contiguous
//! address space. Two ordered block lists — free and used — partition the
//! space; the allocator exposes exactly four operations:
//!
//! - [`Allocator::allocate`] — first-fit search with block splitting
//! - [`Allocator::deallocate`] — reference-counted release
//! - [`Allocator::compact`] — coalesce free blocks, repack used blocks
//! - [`Allocator::snapshot`] — read-only report of both lists
//!
//! The crate does no I/O. A front end (see the `blocksim` binary) feeds it
//! a parsed command stream and formats the [`CommandOutcome`]s and the
//! final [`Snapshot`] however it likes.
//!
//! ## Policy caveats
//!
//! The simulated policy has two intentionally unusual corners, preserved
//! from the system being modelled and pinned by tests: first-fit scans the
//! free list in insertion order rather than address order, and compaction
//! repacks used blocks in list order while leaving free-list addresses
//! untouched (so a post-compact snapshot can show free ranges overlapping
//! the repacked used region). The [`allocator`] module docs spell both out.
//!
//! ## Quick start
//!
//! ```
//! use blocksim_alloc::{parse_stream, Allocator};
//!
//! let mut heap = Allocator::new(100);
//! for command in parse_stream("allocate 30 allocate 50 deallocate 0") {
//!     let _outcome = heap.execute(command);
//! }
//! let snapshot = heap.snapshot();
//! assert_eq!(snapshot.used_bytes(), 50);
//! ```

pub mod allocator;
pub mod block;
pub mod command;
pub mod error;
pub mod snapshot;

pub use crate::allocator::{Allocator, DeallocOutcome, DEFAULT_SPACE_SIZE};
pub use crate::block::Block;
pub use crate::command::{parse_stream, Command, CommandOutcome};
pub use crate::error::{AllocError, AllocResult};
pub use crate::snapshot::Snapshot;
