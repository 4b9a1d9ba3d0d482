//! Replay-safe string primitives.
//!
//! Strings here are byte slices with `0x00` as terminator — the calling
//! cache speaks a byte protocol and carries C-style terminated keys. Unlike
//! their libc counterparts, every scan is additionally bounded by the slice
//! end: a missing terminator stops the scan at the boundary instead of
//! reading past it.

use crate::escape::PrivateBytes;
use crate::staging::{StagingBuf, STR_STAGING};
use crate::tx_assert;

/// The string terminator byte.
pub const TERMINATOR: u8 = 0;

/// Number of bytes before the first terminator.
///
/// A slice with no terminator yields its full length.
pub fn length(s: &[u8]) -> usize {
    s.iter().position(|&b| b == TERMINATOR).unwrap_or(s.len())
}

/// Compare at most `n` bytes of two terminated strings.
///
/// Stops early at a terminator; returns the signed difference of the first
/// differing byte pair, or 0 on match. Bytes past either slice end read as
/// the terminator.
pub fn compare_bounded(s1: &[u8], s2: &[u8], n: usize) -> i32 {
    for i in 0..n {
        let c1 = s1.get(i).copied().unwrap_or(TERMINATOR);
        let c2 = s2.get(i).copied().unwrap_or(TERMINATOR);
        if c1 != c2 {
            return c1 as i32 - c2 as i32;
        }
        if c1 == TERMINATOR {
            break;
        }
    }
    0
}

/// Bounded copy with terminator padding.
///
/// Copies up to `n` bytes of `src` into `dst`; once a terminator is copied
/// (or `src` ends), the remainder of the `n`-byte window is zero-filled.
/// Truncation leaves no terminator.
///
/// Contract: `dst` holds at least `n` bytes.
pub fn copy_bounded(dst: &mut [u8], src: &[u8], n: usize) {
    tx_assert!(n <= dst.len());
    let mut i = 0;
    while i < n {
        let c = src.get(i).copied().unwrap_or(TERMINATOR);
        dst[i] = c;
        i += 1;
        if c == TERMINATOR {
            break;
        }
    }
    while i < n {
        dst[i] = TERMINATOR;
        i += 1;
    }
}

/// Bounded copy with terminator padding, into a caller-private destination.
///
/// Same copy logic as [`copy_bounded`], but the bytes are first staged in a
/// buffer local to this call and then released to `dst` through the escape
/// copy. Use this when `dst` is a stack local of the immediate caller: the
/// staging keeps the speculative log from tracking writes into a destination
/// that needs no log protection.
///
/// Contract: `n <= STR_STAGING` and `dst` holds at least `n` bytes.
pub fn copy_bounded_to_private(dst: &mut PrivateBytes<'_>, src: &[u8], n: usize) {
    tx_assert!(n <= STR_STAGING);
    tx_assert!(n <= dst.len());
    let mut stage = StagingBuf::<STR_STAGING>::new();
    stage.stage_bounded(src, n);
    stage.publish(dst, n);
}

/// Position of the first occurrence of `c`, scanning up to the terminator.
///
/// Searching for the terminator itself finds its position. Returns `None`
/// when `c` does not occur before (or at) the terminator, or when the slice
/// ends first.
pub fn find_char(s: &[u8], c: u8) -> Option<usize> {
    for (i, &b) in s.iter().enumerate() {
        if b == c {
            return Some(i);
        }
        if b == TERMINATOR {
            return None;
        }
    }
    None
}

/// POSIX whitespace classification.
///
/// Pure and side-effect free; safe to call without any transactional
/// overhead. Spelled out rather than delegated to
/// `u8::is_ascii_whitespace`, which omits vertical tab.
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}
