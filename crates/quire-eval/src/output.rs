//! Scoped capture of the two standard text channels.
//!
//! `print` and `eprint` never touch `std::io` directly: they write
//! through [`write_stdout`] / [`write_stderr`], which route to the real
//! process streams unless a capture is installed on the current thread.
//!
//! A [`CaptureGuard`] installs a fresh pair of in-memory buffers and
//! remembers whatever was installed before; dropping the guard restores
//! the previous state on every exit path, fault and panic included.
//! The capture is thread-local, so an evaluation on one thread can never
//! observe another thread's output.

use std::cell::RefCell;
use std::io::Write;

thread_local! {
    static CAPTURE: RefCell<Option<CaptureBuffers>> = const { RefCell::new(None) };
}

#[derive(Debug, Default)]
struct CaptureBuffers {
    stdout: String,
    stderr: String,
}

/// Write to the standard output channel (captured if a guard is active).
pub fn write_stdout(text: &str) {
    CAPTURE.with(|capture| match capture.borrow_mut().as_mut() {
        Some(buffers) => buffers.stdout.push_str(text),
        None => {
            let _ = std::io::stdout().write_all(text.as_bytes());
        }
    });
}

/// Write to the standard error channel (captured if a guard is active).
pub fn write_stderr(text: &str) {
    CAPTURE.with(|capture| match capture.borrow_mut().as_mut() {
        Some(buffers) => buffers.stderr.push_str(text),
        None => {
            let _ = std::io::stderr().write_all(text.as_bytes());
        }
    });
}

/// Scoped redirection of both output channels into in-memory buffers.
///
/// The scope is exactly one evaluation: install before executing,
/// [`finish`](CaptureGuard::finish) afterwards to collect the captured
/// text. The previously installed destination (an outer capture, or the
/// real streams) is restored when the guard goes away, unconditionally.
#[derive(Debug)]
pub struct CaptureGuard {
    previous: Option<CaptureBuffers>,
}

impl CaptureGuard {
    /// Install fresh capture buffers on this thread.
    pub fn install() -> Self {
        let previous =
            CAPTURE.with(|capture| capture.borrow_mut().replace(CaptureBuffers::default()));
        Self { previous }
    }

    /// Collect the captured `(stdout, stderr)` text and restore the
    /// previous channel destinations.
    pub fn finish(self) -> (String, String) {
        let buffers = CAPTURE.with(|capture| capture.borrow_mut().take()).unwrap_or_default();
        // Dropping `self` restores the previous state.
        (buffers.stdout, buffers.stderr)
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CAPTURE.with(|capture| *capture.borrow_mut() = previous);
    }
}
