//! mote — a minimal screen-oriented text viewer.
//!
//! The crate is split so the whole core is testable without a terminal:
//!
//! - `input`: decodes raw bytes (including multi-byte escape sequences)
//!   into abstract key events
//! - `buffer`: the in-memory line buffer, with tab-expanded rendered rows
//! - `editor`: cursor state, viewport offsets, and key dispatch
//! - `render`: composes each frame as one buffered write
//! - `term`: the OS-facing edges (raw mode, timed reads, window geometry)

pub mod buffer;
pub mod editor;
pub mod input;
pub mod render;
pub mod term;

pub use editor::{Editor, InputResult};
pub use input::{read_key, ByteSource, Key};
