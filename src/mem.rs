//! Replay-safe memory primitives.
//!
//! Substitutes for the raw byte operations a speculative region cannot call
//! through the ordinary library: each one either only reads, or writes only
//! to memory the borrow already proves exclusive to this call. Re-executing
//! any of them with the same inputs reproduces the same result and the same
//! final memory state.

use crate::error::AllocFailed;
use crate::tx_assert;

const WORD: usize = std::mem::size_of::<usize>();

/// Byte-wise lexicographic comparison of the first `n` bytes.
///
/// Returns 0 when the ranges match, otherwise the signed difference of the
/// first differing byte pair. Read-only; never touches bytes at or beyond
/// `n`.
///
/// Contract: both slices hold at least `n` bytes.
pub fn compare(a: &[u8], b: &[u8], n: usize) -> i32 {
    tx_assert!(n <= a.len() && n <= b.len());
    for i in 0..n {
        if a[i] != b[i] {
            return a[i] as i32 - b[i] as i32;
        }
    }
    0
}

/// Forward copy of `len` bytes from `src` to `dst`.
///
/// When both data pointers and `len` are word-aligned the copy moves a word
/// at a time, otherwise byte at a time; the two paths produce identical
/// bytes. Distinct `&mut`/`&` borrows make overlap unrepresentable, matching
/// the non-overlapping contract of a plain copy (this is not a `memmove`).
///
/// Contract: both slices hold at least `len` bytes.
#[allow(clippy::manual_memcpy, clippy::needless_range_loop)]
pub fn copy(dst: &mut [u8], src: &[u8], len: usize) {
    tx_assert!(len <= dst.len() && len <= src.len());

    let aligned = dst.as_ptr().align_offset(WORD) == 0
        && src.as_ptr().align_offset(WORD) == 0
        && len % WORD == 0;

    // Explicit loops on both paths: `copy_from_slice` lowers to the library
    // memcpy this routine exists to replace.
    if aligned {
        let dst_words = dst[..len].chunks_exact_mut(WORD);
        let src_words = src[..len].chunks_exact(WORD);
        for (d, s) in dst_words.zip(src_words) {
            let mut word = [0u8; WORD];
            for (w, b) in word.iter_mut().zip(s) {
                *w = *b;
            }
            let v = usize::from_ne_bytes(word);
            for (out, b) in d.iter_mut().zip(v.to_ne_bytes()) {
                *out = b;
            }
        }
    } else {
        for i in 0..len {
            dst[i] = src[i];
        }
    }
}

/// Resize a heap block, preserving `min(new_size, old.len())` bytes.
///
/// Allocates the new block fallibly, copies the surviving prefix with
/// [`copy`], then releases the old block. On allocation failure the original
/// block is returned untouched inside [`AllocFailed`] — nothing is freed,
/// nothing is partially written.
///
/// The old block's own length is the copy bound; there is no hidden size
/// header.
pub fn reallocate(old: Box<[u8]>, new_size: usize) -> Result<Box<[u8]>, AllocFailed> {
    let mut fresh: Vec<u8> = Vec::new();
    if fresh.try_reserve_exact(new_size).is_err() {
        return Err(AllocFailed::new(new_size, old));
    }
    fresh.resize(new_size, 0);

    let keep = new_size.min(old.len());
    if keep > 0 {
        copy(&mut fresh[..keep], &old[..keep], keep);
    }
    drop(old);
    Ok(fresh.into_boxed_slice())
}
