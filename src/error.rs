//! Recoverable error surface.
//!
//! Only data-level failures appear here. Contract violations are fatal and go
//! through [`diag`](crate::diag) instead; parse overflow is reported in-band
//! via [`ParseOutcome::overflowed`](crate::parse::ParseOutcome).

use thiserror::Error;

/// Allocation failure during [`reallocate`](crate::mem::reallocate).
///
/// The original block is returned inside the error, untouched and unfreed, so
/// the caller keeps its data and can retry or degrade.
#[derive(Debug, Error)]
#[error("allocation of {requested} bytes failed")]
pub struct AllocFailed {
    /// Size of the allocation that failed.
    pub requested: usize,
    original: Box<[u8]>,
}

impl AllocFailed {
    pub(crate) fn new(requested: usize, original: Box<[u8]>) -> Self {
        AllocFailed { requested, original }
    }

    /// Borrow the surviving original block.
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// Recover ownership of the surviving original block.
    pub fn into_original(self) -> Box<[u8]> {
        self.original
    }
}
