//! Frame composition and output.
//!
//! One frame per cycle: the visible slice of every buffer row (or a `~`
//! filler, or the welcome banner on an empty buffer), the inverse-video
//! status bar, the message bar, and the final cursor placement. The whole
//! frame is accumulated in one owned byte vector and written with a single
//! `write_all`, so a partially drawn frame never reaches the terminal.

use std::io::Write;
use std::time::Instant;

use anyhow::Result;

use crate::editor::Editor;

/// Version shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hide cursor, move home.
const FRAME_PROLOGUE: &[u8] = b"\x1b[?25l\x1b[H";
/// Erase from the cursor to the end of the line.
const CLEAR_LINE: &[u8] = b"\x1b[K";
/// Inverse video on / attributes off, bracketing the status bar.
const INVERT: &[u8] = b"\x1b[7m";
const RESET: &[u8] = b"\x1b[m";

/// Compose and write one frame.
///
/// `now` drives message-bar expiry; the run loop passes `Instant::now()`.
/// Any write failure is fatal to the caller, there is no partial retry.
pub fn refresh_screen(editor: &mut Editor, out: &mut impl Write, now: Instant) -> Result<()> {
    editor.scroll();

    let mut frame = Vec::with_capacity((editor.screen_rows + 2) * (editor.screen_cols + 8));
    frame.extend_from_slice(FRAME_PROLOGUE);

    draw_rows(editor, &mut frame);
    draw_status_bar(editor, &mut frame);
    draw_message_bar(editor, &mut frame, now);

    // Place the real cursor inside the window (both terms are 1-based).
    let place = format!(
        "\x1b[{};{}H",
        editor.cursor.cy - editor.row_offset + 1,
        editor.cursor.rx - editor.col_offset + 1
    );
    frame.extend_from_slice(place.as_bytes());
    frame.extend_from_slice(b"\x1b[?25h");

    out.write_all(&frame)?;
    out.flush()?;
    Ok(())
}

/// Clear the whole screen and home the cursor. Used on quit and, best
/// effort, before printing a fatal error.
pub fn clear_screen(out: &mut impl Write) -> Result<()> {
    out.write_all(b"\x1b[2J\x1b[H")?;
    out.flush()?;
    Ok(())
}

fn draw_rows(editor: &Editor, frame: &mut Vec<u8>) {
    for y in 0..editor.screen_rows {
        let filerow = y + editor.row_offset;

        if let Some(row) = editor.buffer.row(filerow) {
            let rendered = row.rendered();
            let start = editor.col_offset.min(rendered.len());
            let end = (start + editor.screen_cols).min(rendered.len());
            frame.extend_from_slice(&rendered[start..end]);
        } else if editor.buffer.is_empty() && y == editor.screen_rows / 3 {
            draw_welcome(editor, frame);
        } else {
            frame.push(b'~');
        }

        frame.extend_from_slice(CLEAR_LINE);
        frame.extend_from_slice(b"\r\n");
    }
}

/// Centered banner, shown only when no file content is loaded.
fn draw_welcome(editor: &Editor, frame: &mut Vec<u8>) {
    let welcome = format!("mote editor -- version {}", VERSION);
    let welcome = truncate_str(&welcome, editor.screen_cols);

    let mut padding = (editor.screen_cols - welcome.len()) / 2;
    if padding > 0 {
        frame.push(b'~');
        padding -= 1;
    }
    for _ in 0..padding {
        frame.push(b' ');
    }
    frame.extend_from_slice(welcome.as_bytes());
}

/// Filename and row count on the left, current line / total on the right,
/// space-padded and bracketed with inverse video.
fn draw_status_bar(editor: &Editor, frame: &mut Vec<u8>) {
    frame.extend_from_slice(INVERT);

    let name = editor.filename.as_deref().unwrap_or("[No Name]");
    let name: String = name.chars().take(20).collect();
    let left = format!("{} - {} lines", name, editor.buffer.row_count());
    let left = truncate_str(&left, editor.screen_cols);
    let right = format!("{}/{}", editor.cursor.cy + 1, editor.buffer.row_count());

    frame.extend_from_slice(left.as_bytes());
    let mut len = left.len();
    while len < editor.screen_cols {
        if editor.screen_cols - len == right.len() {
            frame.extend_from_slice(right.as_bytes());
            break;
        }
        frame.push(b' ');
        len += 1;
    }

    frame.extend_from_slice(RESET);
    frame.extend_from_slice(b"\r\n");
}

/// The transient message, while younger than its timeout.
fn draw_message_bar(editor: &Editor, frame: &mut Vec<u8>, now: Instant) {
    frame.extend_from_slice(CLEAR_LINE);
    if let Some(msg) = &editor.status {
        if !msg.text().is_empty() && msg.is_visible(now) {
            frame.extend_from_slice(truncate_str(msg.text(), editor.screen_cols).as_bytes());
        }
    }
}

/// Truncate to at most `max` bytes without splitting a character.
fn truncate_str(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
