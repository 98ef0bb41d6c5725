//! End-to-end sessions: raw input bytes through the decoder, dispatcher,
//! viewport, and render pipeline, over real files.

use std::time::Instant;

use anyhow::Result;

use mote::editor::{Editor, InputResult};
use mote::input::{read_key, ByteSource};
use mote::render;
use mote::term::WindowSize;

use crate::helpers::{fixture_file, numbered_lines};

/// Byte source fed from a canned keystroke transcript. Reads past the end
/// behave like timeouts.
struct Transcript {
    bytes: Vec<u8>,
    pos: usize,
}

impl Transcript {
    fn new(bytes: &[u8]) -> Self {
        Transcript {
            bytes: bytes.to_vec(),
            pos: 0,
        }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

impl ByteSource for Transcript {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.bytes.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }
}

/// Feed every key in the transcript through the dispatcher, rendering a
/// frame after each, like the real run loop. Returns the last frame.
fn drive(editor: &mut Editor, transcript: &mut Transcript) -> String {
    let mut frame = Vec::new();
    render::refresh_screen(editor, &mut frame, Instant::now()).unwrap();
    while !transcript.is_done() {
        let key = read_key(transcript).unwrap();
        if editor.process_key(key) == InputResult::Quit {
            break;
        }
        frame.clear();
        render::refresh_screen(editor, &mut frame, Instant::now()).unwrap();
    }
    String::from_utf8_lossy(&frame).into_owned()
}

#[test]
fn opening_a_file_renders_its_head() {
    let (_dir, path) = fixture_file(&numbered_lines(3));
    let mut editor = Editor::new(WindowSize { rows: 26, cols: 80 });
    editor.open(&path).unwrap();

    let frame = drive(&mut editor, &mut Transcript::new(b""));

    assert!(frame.contains("line 0"));
    assert!(frame.contains("line 2"));
    assert!(frame.contains("3 lines"));
}

#[test]
fn arrow_down_from_long_line_clamps_to_short_line() {
    let (_dir, path) = fixture_file(&[
        "the first line is long".to_string(),
        "short".to_string(),
        "the third line is also long".to_string(),
    ]);
    let mut editor = Editor::new(WindowSize { rows: 26, cols: 80 });
    editor.open(&path).unwrap();

    // End, then Down: ESC [ F, ESC [ B.
    drive(&mut editor, &mut Transcript::new(b"\x1b[F\x1b[B"));

    assert_eq!(editor.cursor.cy, 1);
    assert_eq!(editor.cursor.cx, 5);
}

#[test]
fn page_down_transcript_scrolls_through_a_long_file() {
    let (_dir, path) = fixture_file(&numbered_lines(100));
    let mut editor = Editor::new(WindowSize { rows: 26, cols: 80 }); // 24 text rows
    editor.open(&path).unwrap();

    // Three PageDown presses: ESC [ 6 ~ each.
    let frame = drive(&mut editor, &mut Transcript::new(b"\x1b[6~\x1b[6~\x1b[6~"));

    assert_eq!(editor.row_offset, 72);
    assert!(editor.row_offset <= editor.cursor.cy);
    assert!(editor.cursor.cy < editor.row_offset + editor.screen_rows);
    assert!(frame.contains("line 72"));
    assert!(!frame.contains("line 71"));

    // Keep paging; the offset stays bounded near the end of the file.
    drive(&mut editor, &mut Transcript::new(b"\x1b[6~\x1b[6~\x1b[6~\x1b[6~"));
    assert_eq!(editor.cursor.cy, 100);
    assert_eq!(editor.row_offset, 100 - editor.screen_rows + 1);
}

#[test]
fn page_up_after_page_down_restores_the_top() {
    let (_dir, path) = fixture_file(&numbered_lines(100));
    let mut editor = Editor::new(WindowSize { rows: 26, cols: 80 });
    editor.open(&path).unwrap();

    let frame = drive(
        &mut editor,
        &mut Transcript::new(b"\x1b[6~\x1b[6~\x1b[5~\x1b[5~\x1b[5~"),
    );

    assert_eq!(editor.row_offset, 0);
    assert_eq!(editor.cursor.cy, 0);
    assert!(frame.contains("line 0"));
    assert!(frame.contains("1/100"));
}

#[test]
fn quit_sequence_stops_the_session() {
    let (_dir, path) = fixture_file(&numbered_lines(5));
    let mut editor = Editor::new(WindowSize { rows: 26, cols: 80 });
    editor.open(&path).unwrap();

    // Down, Ctrl-Q, then input that must never be consumed.
    let mut transcript = Transcript::new(b"\x1b[B\x11\x1b[B\x1b[B");
    drive(&mut editor, &mut transcript);

    assert_eq!(editor.cursor.cy, 1);
    assert!(!transcript.is_done());
}

#[test]
fn stray_escape_sequences_are_absorbed() {
    let (_dir, path) = fixture_file(&numbered_lines(5));
    let mut editor = Editor::new(WindowSize { rows: 26, cols: 80 });
    editor.open(&path).unwrap();

    // An unknown CSI sequence is absorbed without moving anything.
    drive(&mut editor, &mut Transcript::new(b"\x1b[Z"));
    assert_eq!(editor.cursor.cy, 0);

    // A bare ESC: the transcript ends, so the lookahead times out.
    drive(&mut editor, &mut Transcript::new(b"\x1b"));
    assert_eq!(editor.cursor.cy, 0);

    // A real Down still works afterwards.
    drive(&mut editor, &mut Transcript::new(b"\x1b[B"));
    assert_eq!(editor.cursor.cy, 1);
    assert_eq!(editor.cursor.cx, 0);
}

#[test]
fn horizontal_scroll_follows_end_key_on_a_wide_line() {
    let wide = format!("prefix {}", "x".repeat(200));
    let (_dir, path) = fixture_file(&[wide]);
    let mut editor = Editor::new(WindowSize { rows: 12, cols: 40 });
    editor.open(&path).unwrap();

    let frame = drive(&mut editor, &mut Transcript::new(b"\x1b[F"));

    assert_eq!(editor.cursor.cx, 207);
    assert_eq!(editor.col_offset, 207 - editor.screen_cols + 1);
    assert!(!frame.contains("prefix"));

    // Home snaps the window back to the left edge.
    let frame = drive(&mut editor, &mut Transcript::new(b"\x1b[1~"));
    assert_eq!(editor.col_offset, 0);
    assert!(frame.contains("prefix"));
}
