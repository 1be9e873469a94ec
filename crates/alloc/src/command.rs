//! Command grammar for the transaction stream
//!
//! The stream is one whitespace-separated token sequence: a keyword,
//! optionally followed by an integer argument. Unrecognized keywords are
//! skipped without error. A keyword whose argument is missing or
//! non-numeric simply never forms a command — the offending token is left
//! in place and considered as the next keyword, mirroring how the
//! reference reader behaves when an integer extraction fails.

use tracing::trace;

use crate::allocator::{Allocator, DeallocOutcome};
use crate::error::AllocError;

/// One parsed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `allocate <size>`
    Allocate(usize),
    /// `deallocate <address>`
    Deallocate(usize),
    /// `compact`
    Compact,
}

/// Structured result of applying one [`Command`], ready for a front end to
/// format. Failure outcomes are ordinary values; the stream always
/// continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Allocation succeeded at `address`.
    Allocated { address: usize, size: usize },
    /// No block could satisfy the request; state unchanged.
    AllocationFailed { size: usize, error: AllocError },
    /// Whatever [`Allocator::deallocate`] reported.
    Deallocated(DeallocOutcome),
    /// Compaction ran to completion (it cannot fail).
    Compacted,
}

/// Parse an entire token stream into commands.
pub fn parse_stream(input: &str) -> Vec<Command> {
    let mut tokens = input.split_whitespace().peekable();
    let mut commands = Vec::new();

    while let Some(token) = tokens.next() {
        match token {
            "allocate" => {
                if let Some(size) = int_arg(&mut tokens) {
                    commands.push(Command::Allocate(size));
                }
            }
            "deallocate" => {
                if let Some(address) = int_arg(&mut tokens) {
                    commands.push(Command::Deallocate(address));
                }
            }
            "compact" => commands.push(Command::Compact),
            other => trace!(token = other, "ignoring unrecognized token"),
        }
    }

    commands
}

/// Consume the next token only if it parses as an integer. A non-numeric
/// token stays put, to be read as the next keyword.
fn int_arg<'a, I>(tokens: &mut core::iter::Peekable<I>) -> Option<usize>
where
    I: Iterator<Item = &'a str>,
{
    let value = tokens.peek()?.parse().ok()?;
    tokens.next();
    Some(value)
}

impl Allocator {
    /// Apply one command and return the structured outcome.
    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Allocate(size) => match self.allocate(size) {
                Ok(address) => CommandOutcome::Allocated { address, size },
                Err(error) => CommandOutcome::AllocationFailed { size, error },
            },
            Command::Deallocate(address) => CommandOutcome::Deallocated(self.deallocate(address)),
            Command::Compact => {
                self.compact();
                CommandOutcome::Compacted
            }
        }
    }
}
