//! Replay-safe numeric parsing.
//!
//! Two strategies, matching how much of the result the call sites need:
//!
//! - [`parse_long`] marshals: it stages a bounded private copy of the input,
//!   then runs the pure conversion on that copy through the escape layer.
//!   The speculative log never tracks reads over the (possibly large,
//!   possibly shared) source string.
//! - [`parse_unsigned_long_long`] is a full replay-safe reimplementation —
//!   its callers need precise consumption reporting on the original input,
//!   so marshalling is not an option.
//!
//! Overflow is not an error: the value saturates to the maximum
//! representable magnitude and [`ParseOutcome::overflowed`] is set, with
//! consumption still reported.

use crate::escape::{self, PrivateBytes};
use crate::staging::{StagingBuf, PARSE_STAGING};
use crate::string::is_space;
use crate::tx_assert;

/// Result of one parse call.
///
/// The parse cursor — position, accumulated value, overflow flag — lives
/// only for the duration of the call and is returned by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOutcome<T> {
    /// Parsed value; saturated when `overflowed` is set.
    pub value: T,
    /// Offset of the first unconsumed byte, or 0 if nothing was accepted.
    pub consumed: usize,
    /// Whether accumulation exceeded the representable range.
    pub overflowed: bool,
}

/// Parse a signed 64-bit integer, `strtol`-equivalent.
///
/// Stages up to [`PARSE_STAGING`] bytes of `s` into a private buffer, then
/// converts on the private copy via the escape layer. Input with parseable
/// content past that offset is truncated — an accepted limitation given the
/// call sites' input sizes.
///
/// Contract: `base` is 0 or 2..=36.
pub fn parse_long(s: &[u8], base: u32) -> ParseOutcome<i64> {
    let n = s.len().min(PARSE_STAGING);
    let mut local = [0u8; PARSE_STAGING];
    let mut dst = PrivateBytes::assert_thread_private(&mut local);

    let mut stage = StagingBuf::<PARSE_STAGING>::new();
    stage.stage_bounded(&s[..n], n);
    stage.publish(&mut dst, n);

    escape::convert_long(&local[..n], base)
}

/// Parse an unsigned 64-bit integer, `strtoull`-equivalent.
///
/// Full replay-safe reimplementation: leading-whitespace skip, optional
/// sign (a negative result wraps two's-complement), `0x`/`0X` prefix for
/// base 16 or auto base, auto base 0 resolving to octal on a leading `0`,
/// saturating accumulation pinning to `u64::MAX` with the overflow flag
/// set. `consumed` is the offset of the first unconsumed byte, or 0 if no
/// digits were accepted.
///
/// Contract: `base` is 0 or 2..=36.
pub fn parse_unsigned_long_long(s: &[u8], base: u32) -> ParseOutcome<u64> {
    tx_assert!(base == 0 || (2..=36).contains(&base));

    let mut i = 0;
    while i < s.len() && is_space(s[i]) {
        i += 1;
    }
    let mut neg = false;
    if i < s.len() && (s[i] == b'-' || s[i] == b'+') {
        neg = s[i] == b'-';
        i += 1;
    }
    let mut base = base;
    if (base == 0 || base == 16)
        && i + 1 < s.len()
        && s[i] == b'0'
        && (s[i + 1] == b'x' || s[i + 1] == b'X')
    {
        i += 2;
        base = 16;
    }
    if base == 0 {
        base = if i < s.len() && s[i] == b'0' { 8 } else { 10 };
    }

    let cutoff = u64::MAX / base as u64;
    let cutlim = (u64::MAX % base as u64) as u32;

    let mut acc: u64 = 0;
    let mut any: i32 = 0;
    while i < s.len() {
        let c = s[i];
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
            // Already saturated; keep consuming digits so `consumed` still
            // reports the end of the numeral.
            continue;
        }
        if acc > cutoff || (acc == cutoff && d > cutlim) {
            any = -1;
            acc = u64::MAX;
        } else {
            any = 1;
            acc = acc * base as u64 + d as u64;
        }
    }

    // The sign applies only to a cleanly accumulated value; a saturated
    // result stays pinned at the maximum.
    if neg && any > 0 {
        acc = acc.wrapping_neg();
    }
    ParseOutcome {
        value: acc,
        consumed: if any != 0 { i } else { 0 },
        overflowed: any < 0,
    }
}

/// Parse a native-width integer in base 10.
///
/// [`parse_long`] truncated to `i32`, mirroring `atoi`.
pub fn to_int(s: &[u8]) -> i32 {
    parse_long(s, 10).value as i32
}
