//! # txsafe
//!
//! Replay-safe memory, string, and numeric-parsing primitives for code that
//! runs inside speculative, possibly-retried transactional regions, plus
//! deferred-commit registration for side effects that must wait until the
//! enclosing transaction's outcome is known.
//!
//! Ordinary library primitives (copy, compare, parse) can read or write
//! memory in ways that are unsafe to re-execute or that leak partial effects
//! before a transaction is known to have committed. This crate reimplements
//! the small subset a transactional cache server needs, with every operation
//! classified one of two ways:
//!
//! - **Replay-safe** — re-executable with no externally observable partial
//!   effects. Reads may repeat; writes land only in memory the current
//!   attempt owns. Everything in [`mem`], [`string`], and [`parse`]'s full
//!   reimplementation path.
//! - **Escape** — runs outside the speculative log, permitted only on
//!   memory the caller asserts is thread-private. Confined to [`escape`],
//!   behind the [`PrivateBytes`] conversion point.
//!
//! ## Components
//!
//! - [`mem`] — compare, copy, reallocate over raw byte ranges
//! - [`string`] — length, bounded compare/copy, search over terminated bytes
//! - [`parse`] — saturating integer parsing with consumption reporting
//! - [`staging`] — the stage-privately-then-publish copy pattern
//! - [`escape`] — the audited trust boundary out of the speculative log
//! - [`context`] — execution context and deferred-commit registration
//! - [`diag`] — fatal diagnostics for contract violations
//!
//! ## Deferring a side effect
//!
//! ```
//! use txsafe::TxContext;
//!
//! let mut ctx = TxContext::outside();
//! ctx.begin();
//! ctx.register_on_commit(|| println!("visible only after commit"));
//! ctx.commit(); // runs the action exactly once
//! ```
//!
//! No primitive here retains state across calls; the only cross-call state
//! is the commit-action queue, which the [`TxContext`] owner drains at
//! commit and discards at abort.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod diag;
pub mod error;
pub mod escape;
pub mod mem;
pub mod parse;
pub mod staging;
pub mod string;

pub use context::{TxContext, TxStatus};
pub use error::AllocFailed;
pub use escape::PrivateBytes;
pub use parse::{parse_long, parse_unsigned_long_long, to_int, ParseOutcome};
pub use staging::{StagingBuf, KEY_MAX_LEN, PARSE_STAGING, STAT_VAL_LEN, STR_STAGING};
