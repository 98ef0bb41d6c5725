//! Keyboard input decoding.
//!
//! Converts the raw byte stream coming from the terminal into abstract
//! [`Key`] events. Escape sequences are resolved by a small explicit state
//! machine so the grammar, and its fall-back to a bare Escape, can be
//! tested without a terminal attached.
//!
//! Recognized sequences:
//! - `ESC [ <digit> ~` — Home (1/7), Delete (3), End (4/8), PageUp (5),
//!   PageDown (6)
//! - `ESC [ <letter>` — arrows (A/B/C/D), Home (H), End (F)
//! - `ESC O <letter>` — alternate Home (H) / End (F) encoding
//!
//! Anything else after an escape byte collapses to [`Key::Escape`]; the
//! unrecognized tail bytes are absorbed without raising an error.

use anyhow::Result;

/// The escape byte that opens a terminal control sequence.
const ESC: u8 = 0x1b;

/// Control-key transform: `ctrl(b'q')` is the byte Ctrl+Q produces.
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// Source of raw input bytes with a bounded read.
///
/// `read_byte` returns `Ok(None)` when no byte arrived before the read
/// timeout. The timeout is what keeps the escape lookahead from blocking
/// forever on a bare ESC press.
pub trait ByteSource {
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// A decoded key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable or control byte, delivered as-is.
    Char(u8),
    /// A bare ESC press, or any escape sequence we do not recognize.
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
}

/// Decoder states while inside an escape sequence.
///
/// The grammar needs at most three bytes of lookahead, so the machine has
/// no loops: every transition either advances one state or resolves to a
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    SawEscape,
    SawBracket,
    SawBracketDigit(u8),
    SawO,
}

/// Block until one key event is available.
///
/// Timed-out reads before the first byte are not errors; the loop simply
/// waits for the next byte. Once a byte arrives it is decoded in full.
pub fn read_key(src: &mut impl ByteSource) -> Result<Key> {
    let first = loop {
        if let Some(b) = src.read_byte()? {
            break b;
        }
    };

    if first == ESC {
        decode_escape(src)
    } else {
        Ok(Key::Char(first))
    }
}

/// Resolve the bytes following an ESC.
///
/// A timed-out lookahead read at any point means the sequence is over and
/// the whole thing was a bare Escape.
fn decode_escape(src: &mut impl ByteSource) -> Result<Key> {
    let mut state = DecodeState::SawEscape;

    loop {
        let Some(b) = src.read_byte()? else {
            return Ok(Key::Escape);
        };

        state = match (state, b) {
            (DecodeState::SawEscape, b'[') => DecodeState::SawBracket,
            (DecodeState::SawEscape, b'O') => DecodeState::SawO,

            (DecodeState::SawBracket, d @ b'0'..=b'9') => DecodeState::SawBracketDigit(d),
            (DecodeState::SawBracket, b'A') => return Ok(Key::ArrowUp),
            (DecodeState::SawBracket, b'B') => return Ok(Key::ArrowDown),
            (DecodeState::SawBracket, b'C') => return Ok(Key::ArrowRight),
            (DecodeState::SawBracket, b'D') => return Ok(Key::ArrowLeft),
            (DecodeState::SawBracket, b'H') => return Ok(Key::Home),
            (DecodeState::SawBracket, b'F') => return Ok(Key::End),

            (DecodeState::SawBracketDigit(d), b'~') => {
                return Ok(match d {
                    b'1' | b'7' => Key::Home,
                    b'3' => Key::Delete,
                    b'4' | b'8' => Key::End,
                    b'5' => Key::PageUp,
                    b'6' => Key::PageDown,
                    _ => Key::Escape,
                })
            }

            (DecodeState::SawO, b'H') => return Ok(Key::Home),
            (DecodeState::SawO, b'F') => return Ok(Key::End),

            // Unknown sequence: absorb this byte and report a plain Escape.
            _ => return Ok(Key::Escape),
        };
    }
}
