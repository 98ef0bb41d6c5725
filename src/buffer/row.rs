//! A single buffer row and its rendered form.
//!
//! Every row keeps two byte sequences: the raw content as loaded from the
//! file, and the rendered content used for display, in which each tab is
//! expanded to spaces up to the next multiple of [`TAB_STOP`]. The rendered
//! form is regenerated whenever the raw content changes, so the two are
//! never read out of sync.

/// Fixed tab width for rendering.
pub const TAB_STOP: usize = 8;

/// One logical line of the file, without its trailing newline.
#[derive(Debug, Clone, Default)]
pub struct Row {
    raw: Vec<u8>,
    rendered: Vec<u8>,
}

impl Row {
    pub fn new(raw: Vec<u8>) -> Self {
        let mut row = Row {
            raw,
            rendered: Vec::new(),
        };
        row.update_render();
        row
    }

    /// Raw content bytes.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Display bytes with tabs expanded.
    pub fn rendered(&self) -> &[u8] {
        &self.rendered
    }

    /// Raw length in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Replace the raw content, regenerating the rendered form in place.
    pub fn set_raw(&mut self, raw: Vec<u8>) {
        self.raw = raw;
        self.update_render();
    }

    /// Map a raw byte index to its rendered column.
    ///
    /// Replays the tab-expansion walk over `raw[..cx]`, so
    /// `cx_to_rx(row.len())` always equals `row.rendered().len()`.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &b in self.raw.iter().take(cx) {
            if b == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Rebuild `rendered` from `raw`.
    ///
    /// On a tab, emit spaces until the output length reaches the next
    /// multiple of [`TAB_STOP`] (always at least one); every other byte is
    /// copied unchanged.
    fn update_render(&mut self) {
        let tabs = self.raw.iter().filter(|&&b| b == b'\t').count();
        let mut rendered = Vec::with_capacity(self.raw.len() + tabs * (TAB_STOP - 1));

        for &b in &self.raw {
            if b == b'\t' {
                rendered.push(b' ');
                while rendered.len() % TAB_STOP != 0 {
                    rendered.push(b' ');
                }
            } else {
                rendered.push(b);
            }
        }

        self.rendered = rendered;
    }
}
