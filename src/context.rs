//! Execution context and deferred-commit registration.
//!
//! The external transactional runtime owns one [`TxContext`] per executing
//! attempt and threads it explicitly through calls — the ambient
//! "inside a transaction?" state is a value, never a global. This crate
//! reads that state and appends to the context's commit-action queue; the
//! runtime drives the state machine by calling [`TxContext::commit`],
//! [`TxContext::abort`], or [`TxContext::reset_for_retry`] as its protocol
//! resolves the attempt.
//!
//! ## Deferred actions
//!
//! An action registered inside an active transaction runs exactly once,
//! after commit, in registration order relative to the same transaction's
//! other actions. It never runs on abort and is never retried. Registered
//! outside any transaction, it runs immediately and synchronously.

use smallvec::SmallVec;
use std::fmt;

use crate::tx_assert;

/// A deferred side effect: the action plus whatever state it captured.
///
/// `FnOnce` makes at-most-once invocation structural — a drained action
/// cannot be called again.
type CommitAction = Box<dyn FnOnce() + Send>;

/// Typical transactions register zero or one action; inline capacity keeps
/// registration allocation-free for those.
const INLINE_ACTIONS: usize = 2;

/// Where an execution context stands in the transaction lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// No ambient transaction; side effects run immediately.
    Outside,
    /// Inside a speculative attempt; side effects are deferred.
    Active,
    /// The attempt committed; deferred actions have been drained.
    Committed,
    /// The attempt aborted; deferred actions were discarded.
    Aborted,
}

/// Per-attempt execution context: ambient transaction state plus the
/// ordered commit-action queue.
pub struct TxContext {
    status: TxStatus,
    on_commit: SmallVec<[CommitAction; INLINE_ACTIONS]>,
}

impl TxContext {
    /// A context outside any transaction.
    pub fn outside() -> Self {
        TxContext {
            status: TxStatus::Outside,
            on_commit: SmallVec::new(),
        }
    }

    /// Enter a transactional region.
    ///
    /// Contract: the context is not already inside an active transaction.
    /// A committed or aborted context may begin again; its queue is empty
    /// by then.
    pub fn begin(&mut self) {
        tx_assert!(self.status != TxStatus::Active);
        tx_assert!(self.on_commit.is_empty());
        self.status = TxStatus::Active;
        tracing::trace!("transaction begun");
    }

    /// Whether a transaction is currently active.
    pub fn in_transaction(&self) -> bool {
        self.status == TxStatus::Active
    }

    /// Current lifecycle state.
    pub fn status(&self) -> TxStatus {
        self.status
    }

    /// Number of actions waiting on commit.
    pub fn pending_actions(&self) -> usize {
        self.on_commit.len()
    }

    /// Defer `action` until this transaction commits, or run it now if no
    /// transaction is active.
    ///
    /// Inside an active transaction the action is appended to the commit
    /// queue and runs only if the transaction commits. Outside one, it runs
    /// immediately and synchronously, before this call returns.
    pub fn register_on_commit<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.in_transaction() {
            self.on_commit.push(Box::new(action));
            tracing::trace!(pending = self.on_commit.len(), "deferred commit action");
        } else {
            tracing::trace!("no active transaction; running action immediately");
            action();
        }
    }

    /// Commit the active transaction, draining deferred actions exactly
    /// once in registration order.
    ///
    /// Contract: a transaction is active.
    pub fn commit(&mut self) {
        tx_assert!(self.status == TxStatus::Active);
        self.status = TxStatus::Committed;
        let drained = self.on_commit.len();
        for action in self.on_commit.drain(..) {
            action();
        }
        tracing::debug!(actions = drained, "transaction committed");
    }

    /// Abort the active transaction, discarding deferred actions.
    ///
    /// Contract: a transaction is active.
    pub fn abort(&mut self) {
        tx_assert!(self.status == TxStatus::Active);
        self.status = TxStatus::Aborted;
        let discarded = self.on_commit.len();
        self.on_commit.clear();
        tracing::debug!(discarded, "transaction aborted");
    }

    /// Discard actions registered by a failed speculative attempt while the
    /// transaction stays active for re-execution.
    ///
    /// Contract: a transaction is active.
    pub fn reset_for_retry(&mut self) {
        tx_assert!(self.status == TxStatus::Active);
        let discarded = self.on_commit.len();
        self.on_commit.clear();
        tracing::debug!(discarded, "speculative attempt reset for retry");
    }
}

impl Default for TxContext {
    fn default() -> Self {
        Self::outside()
    }
}

impl fmt::Debug for TxContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxContext")
            .field("status", &self.status)
            .field("pending_actions", &self.on_commit.len())
            .finish()
    }
}
