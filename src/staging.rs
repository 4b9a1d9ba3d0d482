//! Private staging buffers.
//!
//! The staging pattern shields a bounded copy from writing into log-tracked
//! shared memory: stage into an owned, unshared buffer, transform there, then
//! release the result through an explicit publish step. The stage is
//! replay-safe (writes land only in the buffer, which is local to one
//! primitive invocation); the publish is the one escape write, and it only
//! accepts a destination the caller has asserted thread-private.

use crate::escape::{self, PrivateBytes};
use crate::string::copy_bounded;
use crate::tx_assert;

/// Longest key the calling cache accepts, in bytes.
pub const KEY_MAX_LEN: usize = 250;

/// Length bound of a status value rendered by the calling cache.
pub const STAT_VAL_LEN: usize = 128;

/// Staging capacity for string copies: the larger of the key and
/// status-value bounds, plus a terminator byte.
pub const STR_STAGING: usize = max_usize(KEY_MAX_LEN + 1, STAT_VAL_LEN) + 1;

/// Staging capacity for numeric-parse input. The widest 64-bit value needs
/// 20 digits, but inputs may carry arbitrary leading whitespace; anything
/// past this offset is truncated.
pub const PARSE_STAGING: usize = 4096;

const fn max_usize(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// A fixed-capacity, stack-allocated staging buffer.
///
/// Lives for exactly one primitive invocation and is never aliased beyond
/// the immediate publish step.
pub struct StagingBuf<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> StagingBuf<N> {
    /// A zeroed staging buffer.
    pub fn new() -> Self {
        StagingBuf { bytes: [0; N] }
    }

    /// Bounded-copy `n` bytes of `src` (with terminator padding) into
    /// private storage, returning the staged prefix.
    ///
    /// Contract: `n <= N`.
    pub fn stage_bounded(&mut self, src: &[u8], n: usize) -> &[u8] {
        tx_assert!(n <= N);
        copy_bounded(&mut self.bytes[..n], src, n);
        &self.bytes[..n]
    }

    /// Release the first `n` staged bytes to an asserted-private
    /// destination via the escape copy.
    ///
    /// Contract: `n <= N` and `n <= dst.len()`.
    pub fn publish(&self, dst: &mut PrivateBytes<'_>, n: usize) {
        tx_assert!(n <= N);
        escape::copy_out(dst, &self.bytes[..n]);
    }
}

impl<const N: usize> Default for StagingBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_constants() {
        // Key bound dominates the status-value bound at current limits.
        assert_eq!(STR_STAGING, KEY_MAX_LEN + 2);
        assert_eq!(PARSE_STAGING, 4096);
    }

    #[test]
    fn test_stage_bounded_pads() {
        let mut stage = StagingBuf::<8>::new();
        let staged = stage.stage_bounded(b"ab\0junk", 5);
        assert_eq!(staged, b"ab\0\0\0");
    }

    #[test]
    fn test_stage_then_publish() {
        let mut stage = StagingBuf::<8>::new();
        stage.stage_bounded(b"key", 5);
        let mut local = [0xffu8; 5];
        let mut dst = PrivateBytes::assert_thread_private(&mut local);
        stage.publish(&mut dst, 5);
        assert_eq!(&local, b"key\0\0");
    }
}
