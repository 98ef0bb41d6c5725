//! The in-memory line buffer.
//!
//! A [`Buffer`] owns an ordered sequence of [`Row`]s, one per file line in
//! file order. An empty buffer is a valid state (no file, or an empty one).

mod row;

pub use row::{Row, TAB_STOP};

use std::path::Path;

use anyhow::{Context, Result};

/// Ordered sequence of rows with exclusive ownership.
#[derive(Debug, Default)]
pub struct Buffer {
    rows: Vec<Row>,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    /// Load a file into a fresh buffer.
    ///
    /// Splits on `\n` and strips trailing carriage returns, so the stored
    /// rows never carry line terminators. The file does not have to be
    /// valid UTF-8.
    pub fn load(path: &Path) -> Result<Buffer> {
        let contents = std::fs::read(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut buffer = Buffer::new();
        if contents.is_empty() {
            return Ok(buffer);
        }
        for mut line in contents.split(|&b| b == b'\n') {
            while line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            buffer.append_row(line.to_vec());
        }

        // A trailing newline terminates the last line rather than opening
        // an empty one.
        if contents.ends_with(b"\n") {
            buffer.rows.pop();
        }

        tracing::debug!(path = %path.display(), rows = buffer.row_count(), "loaded file");
        Ok(buffer)
    }

    /// Append a row at the end; its rendered form is computed immediately.
    /// The caller must already have stripped any newline bytes.
    pub fn append_row(&mut self, raw: Vec<u8>) {
        self.rows.push(Row::new(raw));
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Raw length of row `index`, or 0 when out of range. Used for
    /// end-of-line and end-of-file clamping.
    pub fn row_len(&self, index: usize) -> usize {
        self.rows.get(index).map_or(0, Row::len)
    }
}
