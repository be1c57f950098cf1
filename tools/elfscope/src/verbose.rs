//! Diagnostic output levels.
//!
//! - **Quiet** (`-q`): the report and fatal errors only
//! - **Default**: adds warnings about partially decoded files
//! - **Verbose** (`-v`): adds table geometry and decode timings
//!
//! Diagnostics are written to stderr so they never mix with the report.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

/// Diagnostic verbosity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Default = 1,
    Verbose = 2,
}

/// Global verbosity level, set once at startup.
static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Default as u8);

/// Set the verbosity level for the current process.
pub fn init(quiet: bool, verbose: bool) {
    let level = if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Default
    };
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Returns the current verbosity level.
pub fn verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Default,
    }
}

/// Returns `true` if verbose mode is active.
pub fn is_verbose() -> bool {
    verbosity() == Verbosity::Verbose
}

/// Returns `true` if quiet mode is active.
pub fn is_quiet() -> bool {
    verbosity() == Verbosity::Quiet
}

/// Print to stderr only in verbose mode.
///
/// ```ignore
/// vprintln!("  section headers: {} x {} bytes", count, size);
/// ```
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// Print a `warning:` line to stderr unless quiet mode is active.
macro_rules! wprintln {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            eprintln!("warning: {}", format_args!($($arg)*));
        }
    };
}

pub(crate) use wprintln;

/// RAII timer that reports elapsed time on drop in verbose mode.
///
/// ```ignore
/// let _t = Timer::start("decode");
/// // ... work ...
/// // prints "  decode: 42.0µs" to stderr on drop
/// ```
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Begin timing a labeled operation.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if is_verbose() {
            eprintln!("  {}: {:.1?}", self.label, self.start.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_sets_level() {
        init(true, false);
        assert!(is_quiet() && !is_verbose());
        init(false, true);
        assert_eq!(verbosity(), Verbosity::Verbose);
        init(false, false);
        assert_eq!(verbosity(), Verbosity::Default);
    }
}
