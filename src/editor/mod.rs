//! Editor state: buffer, cursor, viewport offsets, and key dispatch.
//!
//! All mutable state lives in one owned [`Editor`] value that is passed
//! explicitly into the render and dispatch entry points; there are no
//! globals. The dispatcher itself is stateless between keypresses.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::buffer::Buffer;
use crate::input::{ctrl, Key};
use crate::term::WindowSize;

/// Screen rows reserved below the text area: status bar + message bar.
pub const STATUS_LINES: u16 = 2;

/// Result of dispatching one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Continue the read-dispatch-render cycle.
    Continue,
    /// Exit the editor.
    Quit,
}

/// Cursor position.
///
/// `cx`/`cy` are logical coordinates: `cy` indexes the buffer
/// (`0..=row_count`, where `row_count` is the valid past-the-end
/// position) and `cx` indexes raw bytes of row `cy` (`0..=row len`).
/// `rx` is the rendered column derived from `cx`; it is recomputed by
/// [`Editor::scroll`] before every frame and never read stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub cx: usize,
    pub cy: usize,
    pub rx: usize,
}

/// A transient message for the bar below the status line.
///
/// Visible for five seconds after being set; any new message replaces the
/// old one wholesale.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    pub const TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_at(&self) -> Instant {
        self.set_at
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.set_at) < Self::TIMEOUT
    }
}

/// The whole editor context.
#[derive(Debug)]
pub struct Editor {
    pub buffer: Buffer,
    pub cursor: Cursor,
    /// Buffer row shown at the top of the window.
    pub row_offset: usize,
    /// Rendered column shown at the left edge of the window.
    pub col_offset: usize,
    /// Text-area height; the window height minus [`STATUS_LINES`].
    pub screen_rows: usize,
    pub screen_cols: usize,
    pub filename: Option<String>,
    pub status: Option<StatusMessage>,
}

impl Editor {
    /// Create an empty editor for a window of the given size.
    ///
    /// Dimensions are fixed for the session.
    pub fn new(size: WindowSize) -> Self {
        Editor {
            buffer: Buffer::new(),
            cursor: Cursor::default(),
            row_offset: 0,
            col_offset: 0,
            screen_rows: size.rows.saturating_sub(STATUS_LINES) as usize,
            screen_cols: size.cols as usize,
            filename: None,
            status: None,
        }
    }

    /// Load a file into the buffer and remember its name for the status bar.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        self.buffer = Buffer::load(path)?;
        self.filename = Some(path.display().to_string());
        Ok(())
    }

    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::new(text));
    }

    /// Keep the cursor inside the visible window.
    ///
    /// Recomputes `rx` from `cx`, then adjusts each offset independently,
    /// so a diagonal move can shift both in the same pass. Called before
    /// every frame.
    pub fn scroll(&mut self) {
        self.cursor.rx = match self.buffer.row(self.cursor.cy) {
            Some(row) => row.cx_to_rx(self.cursor.cx),
            None => 0,
        };

        if self.cursor.cy < self.row_offset {
            self.row_offset = self.cursor.cy;
        }
        if self.cursor.cy >= self.row_offset + self.screen_rows {
            self.row_offset = self.cursor.cy - self.screen_rows + 1;
        }
        if self.cursor.rx < self.col_offset {
            self.col_offset = self.cursor.rx;
        }
        if self.cursor.rx >= self.col_offset + self.screen_cols {
            self.col_offset = self.cursor.rx - self.screen_cols + 1;
        }
    }

    /// Dispatch one decoded key event.
    pub fn process_key(&mut self, key: Key) -> InputResult {
        match key {
            Key::Char(c) if c == ctrl(b'q') => {
                tracing::debug!("quit requested");
                return InputResult::Quit;
            }

            Key::Home => self.cursor.cx = 0,
            Key::End => {
                // Unchanged when the cursor rests past the last row.
                if self.cursor.cy < self.buffer.row_count() {
                    self.cursor.cx = self.buffer.row_len(self.cursor.cy);
                }
            }

            Key::PageUp => {
                self.cursor.cy = self.row_offset;
                for _ in 0..self.screen_rows {
                    self.move_cursor(Key::ArrowUp);
                }
            }
            Key::PageDown => {
                self.cursor.cy =
                    (self.row_offset + self.screen_rows.saturating_sub(1))
                        .min(self.buffer.row_count());
                for _ in 0..self.screen_rows {
                    self.move_cursor(Key::ArrowDown);
                }
            }

            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.move_cursor(key)
            }

            // No editing operations in scope; everything else is a no-op.
            _ => {}
        }
        InputResult::Continue
    }

    /// Single-step cursor movement with wrap-around and end-clamping.
    fn move_cursor(&mut self, key: Key) {
        let row_len = self.current_row_len();

        match key {
            Key::ArrowLeft => {
                if self.cursor.cx > 0 {
                    self.cursor.cx -= 1;
                } else if self.cursor.cy > 0 {
                    // Wrap to the end of the previous row.
                    self.cursor.cy -= 1;
                    self.cursor.cx = self.buffer.row_len(self.cursor.cy);
                }
            }
            Key::ArrowRight => {
                if self.cursor.cy < self.buffer.row_count() {
                    if self.cursor.cx < row_len {
                        self.cursor.cx += 1;
                    } else {
                        // Wrap to the start of the next row.
                        self.cursor.cy += 1;
                        self.cursor.cx = 0;
                    }
                }
            }
            Key::ArrowUp => {
                if self.cursor.cy > 0 {
                    self.cursor.cy -= 1;
                }
            }
            Key::ArrowDown => {
                // May land one past the last row, representing end of file.
                if self.cursor.cy < self.buffer.row_count() {
                    self.cursor.cy += 1;
                }
            }
            _ => {}
        }

        // Snap cx back when a vertical move landed on a shorter row.
        let row_len = self.current_row_len();
        if self.cursor.cx > row_len {
            self.cursor.cx = row_len;
        }
    }

    fn current_row_len(&self) -> usize {
        self.buffer.row_len(self.cursor.cy)
    }
}
