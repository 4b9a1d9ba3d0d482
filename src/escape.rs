//! Escape-call layer: operations that run outside the speculative log.
//!
//! Everything else in this crate is replay-safe — re-executable with no
//! externally observable partial effects. The two operations here are not:
//! they write (or read) memory directly, with none of the staging discipline
//! the rest of the crate maintains. They are sound only under a calling
//! convention the crate cannot verify dynamically: the memory they touch must
//! be private to the current thread at the time of the call — a stack local
//! of the immediate caller, never anything reachable from the transaction's
//! shared working set.
//!
//! That convention is made auditable through [`PrivateBytes`]: the only way
//! to hand this module a destination is to go through
//! [`PrivateBytes::assert_thread_private`], so every crossing of the boundary
//! is a named, greppable call site.

use crate::parse::ParseOutcome;
use crate::string::is_space;
use crate::tx_assert;

/// A byte destination the caller asserts is private to the current thread.
///
/// Constructing one is the explicit conversion step from possibly-shared to
/// known-private memory. The wrapper carries no runtime evidence — the
/// assertion is the caller's, and every construction site should be
/// reviewable on those terms.
pub struct PrivateBytes<'a> {
    buf: &'a mut [u8],
}

impl<'a> PrivateBytes<'a> {
    /// Assert that `buf` is private to the current thread and wrap it for
    /// use as an escape-copy destination.
    ///
    /// "Private" means no other thread, and no speculative attempt other
    /// than the current one, can observe the buffer before this call's
    /// enclosing operation returns. Stack locals of the immediate caller
    /// qualify; anything reachable from shared structures does not.
    pub fn assert_thread_private(buf: &'a mut [u8]) -> Self {
        PrivateBytes { buf }
    }

    /// Capacity of the wrapped destination.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the wrapped destination is zero-length.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Raw copy into a thread-private destination, outside the speculative log.
///
/// Contract: `src.len() <= dst.len()`.
pub fn copy_out(dst: &mut PrivateBytes<'_>, src: &[u8]) {
    tx_assert!(src.len() <= dst.buf.len());
    dst.buf[..src.len()].copy_from_slice(src);
}

/// Signed integer conversion on a staged, thread-private input.
///
/// Equivalent to `strtol`: leading-whitespace skip, optional sign, `0x`/`0X`
/// prefix for base 16 or auto base, auto base 0 resolving to octal on a
/// leading `0`. Overflow saturates to `i64::MAX` / `i64::MIN` and sets
/// [`ParseOutcome::overflowed`]. `consumed` is the offset of the first
/// unconsumed byte, or 0 if no digits were accepted.
///
/// Callers reach this through [`parse_long`](crate::parse::parse_long),
/// which stages the input privately first; the conversion itself is pure, so
/// running it outside the log is sound as long as its input is.
///
/// Contract: `base` is 0 or 2..=36.
pub fn convert_long(digits: &[u8], base: u32) -> ParseOutcome<i64> {
    tx_assert!(base == 0 || (2..=36).contains(&base));

    let mut i = 0;
    while i < digits.len() && is_space(digits[i]) {
        i += 1;
    }
    let mut neg = false;
    if i < digits.len() && (digits[i] == b'-' || digits[i] == b'+') {
        neg = digits[i] == b'-';
        i += 1;
    }
    let mut base = base;
    if (base == 0 || base == 16)
        && i + 1 < digits.len()
        && digits[i] == b'0'
        && (digits[i + 1] == b'x' || digits[i + 1] == b'X')
    {
        i += 2;
        base = 16;
    }
    if base == 0 {
        base = if i < digits.len() && digits[i] == b'0' { 8 } else { 10 };
    }

    // Accumulate in unsigned space; the negative range admits one more
    // magnitude step than the positive, so the cutoff depends on the sign.
    let bound: u64 = if neg {
        (i64::MAX as u64) + 1
    } else {
        i64::MAX as u64
    };
    let cutoff = bound / base as u64;
    let cutlim = (bound % base as u64) as u32;

    let mut acc: u64 = 0;
    let mut any: i32 = 0;
    while i < digits.len() {
        let c = digits[i];
        let d = match c {
            b'0'..=b'9' => (c - b'0') as u32,
            b'a'..=b'z' => (c - b'a') as u32 + 10,
            b'A'..=b'Z' => (c - b'A') as u32 + 10,
            _ => break,
        };
        if d >= base {
            break;
        }
        i += 1;
        if any < 0 {
            continue;
        }
        if acc > cutoff || (acc == cutoff && d > cutlim) {
            any = -1;
            acc = bound;
        } else {
            any = 1;
            acc = acc * base as u64 + d as u64;
        }
    }

    let value = if neg {
        acc.wrapping_neg() as i64
    } else {
        acc as i64
    };
    ParseOutcome {
        value,
        consumed: if any != 0 { i } else { 0 },
        overflowed: any < 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_out_prefix() {
        let mut local = [0u8; 8];
        let mut dst = PrivateBytes::assert_thread_private(&mut local);
        copy_out(&mut dst, b"abc");
        assert_eq!(&local[..4], b"abc\0");
    }

    #[test]
    fn test_private_bytes_len() {
        let mut local = [0u8; 4];
        let dst = PrivateBytes::assert_thread_private(&mut local);
        assert_eq!(dst.len(), 4);
        assert!(!dst.is_empty());
    }

    #[test]
    fn test_convert_long_decimal() {
        let out = convert_long(b"  -42 trailing", 10);
        assert_eq!(out.value, -42);
        assert_eq!(out.consumed, 5);
        assert!(!out.overflowed);
    }

    #[test]
    fn test_convert_long_auto_base() {
        assert_eq!(convert_long(b"0x1F", 0).value, 31);
        assert_eq!(convert_long(b"017", 0).value, 15);
        assert_eq!(convert_long(b"17", 0).value, 17);
    }

    #[test]
    fn test_convert_long_saturates() {
        let out = convert_long(b"9223372036854775808", 10);
        assert_eq!(out.value, i64::MAX);
        assert!(out.overflowed);

        let out = convert_long(b"-9223372036854775809", 10);
        assert_eq!(out.value, i64::MIN);
        assert!(out.overflowed);
    }

    #[test]
    fn test_convert_long_min_exact() {
        let out = convert_long(b"-9223372036854775808", 10);
        assert_eq!(out.value, i64::MIN);
        assert!(!out.overflowed);
    }

    #[test]
    fn test_convert_long_nothing_consumed() {
        let out = convert_long(b"  +", 10);
        assert_eq!(out.value, 0);
        assert_eq!(out.consumed, 0);
    }
}
