//! Fatal diagnostics for contract violations.
//!
//! Contract violations (a false invariant, a bound the caller was required to
//! uphold) are never surfaced as recoverable errors: the process terminates
//! immediately, with no transactional unwinding. Both entry points are escape
//! operations — once the process is terminating, the consistency of the
//! speculative log no longer matters, so writing to stderr is tolerated.

/// Abort the process after reporting a failed assertion.
///
/// Called by [`tx_assert!`](crate::tx_assert); not intended to be called
/// directly. The diagnostic goes to stderr in `file:line: module` form, and a
/// `tracing` error event is emitted first so structured collectors see the
/// failure even when stderr is discarded.
pub fn assert_failed(file: &str, line: u32, module: &str, source: &str) -> ! {
    tracing::error!(file, line, module, "assertion '{}' failed", source);
    eprintln!("{file}:{line}: {module}: Assertion '{source}' failed.");
    std::process::abort();
}

/// Print a message to stderr and terminate the process.
///
/// For unrecoverable conditions detected outside an assertion, e.g. a null
/// result the caller's contract said could not happen.
pub fn die(msg: &str) -> ! {
    tracing::error!("{}", msg);
    eprintln!("{msg}");
    std::process::abort();
}

/// Assert a caller-facing contract, aborting the process on violation.
///
/// Unlike `assert!`, this is compiled into release builds: the conditions it
/// guards are calling-convention contracts whose violation inside a
/// speculative region would otherwise produce undefined transactional
/// behavior. Termination is the defined outcome.
#[macro_export]
macro_rules! tx_assert {
    ($cond:expr) => {
        if !($cond) {
            $crate::diag::assert_failed(file!(), line!(), module_path!(), stringify!($cond));
        }
    };
}
