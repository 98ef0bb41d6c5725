//! Terminal plumbing: raw mode, timed byte reads, and window geometry.
//!
//! Everything here talks to the OS so the core stays testable. Raw mode is
//! a guard value that restores the original termios settings exactly once
//! when dropped, on both the normal and the error path.

use std::io::{self, Write};

use anyhow::Result;

use crate::input::ByteSource;

/// Errors from the terminal layer.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("failed to read terminal attributes: {0}")]
    GetAttr(#[source] io::Error),

    #[error("failed to set terminal attributes: {0}")]
    SetAttr(#[source] io::Error),

    #[error("unable to determine window size")]
    WindowSize,
}

/// Terminal dimensions as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

/// Raw-mode guard.
///
/// While alive, input bytes are delivered unbuffered, unechoed and
/// signal-free, and reads time out after roughly 100 ms (`VMIN = 0`,
/// `VTIME = 1`). Dropping the guard restores the saved settings.
pub struct RawMode {
    orig: libc::termios,
}

impl RawMode {
    pub fn enable() -> Result<RawMode, TermError> {
        let mut orig: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &mut orig) } == -1 {
            return Err(TermError::GetAttr(io::Error::last_os_error()));
        }

        let mut raw = orig;
        raw.c_iflag &= !(libc::IXON | libc::ICRNL | libc::BRKINT | libc::INPCK | libc::ISTRIP);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 1;

        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw) } == -1 {
            return Err(TermError::SetAttr(io::Error::last_os_error()));
        }

        tracing::trace!("raw mode enabled");
        Ok(RawMode { orig })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        // Best effort: there is nowhere left to report a failure to.
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &self.orig);
        }
        tracing::trace!("raw mode restored");
    }
}

/// Stdin as a [`ByteSource`].
///
/// Relies on the `VTIME` timeout set by [`RawMode`]: a read returning no
/// data within the timeout yields `Ok(None)` rather than blocking.
pub struct TtyInput;

impl ByteSource for TtyInput {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                &mut byte as *mut u8 as *mut libc::c_void,
                1,
            )
        };
        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                if err.raw_os_error() == Some(libc::EAGAIN) {
                    Ok(None)
                } else {
                    Err(err.into())
                }
            }
        }
    }
}

/// Query the terminal dimensions.
///
/// Asks the OS first; if that fails or reports a zero width, falls back to
/// pushing the cursor to the far corner and reading it back through the
/// terminal's own cursor-position report.
pub fn window_size(input: &mut impl ByteSource) -> Result<WindowSize, TermError> {
    if let Ok((cols, rows)) = crossterm::terminal::size() {
        if cols > 0 {
            return Ok(WindowSize { rows, cols });
        }
    }
    cursor_position_fallback(input)
}

/// Move the cursor to the bottom-right corner, then parse the
/// `ESC [ rows ; cols R` cursor-position report.
fn cursor_position_fallback(input: &mut impl ByteSource) -> Result<WindowSize, TermError> {
    let mut stdout = io::stdout();
    stdout
        .write_all(b"\x1b[999C\x1b[999B\x1b[6n")
        .and_then(|_| stdout.flush())
        .map_err(|_| TermError::WindowSize)?;

    let mut report = Vec::with_capacity(16);
    while report.len() < 32 {
        match input.read_byte() {
            Ok(Some(b'R')) => break,
            Ok(Some(b)) => report.push(b),
            _ => break,
        }
    }

    parse_cursor_report(&report).ok_or(TermError::WindowSize)
}

fn parse_cursor_report(report: &[u8]) -> Option<WindowSize> {
    let body = report.strip_prefix(b"\x1b[")?;
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    Some(WindowSize {
        rows: rows.parse().ok()?,
        cols: cols.parse().ok()?,
    })
}
