//! Scratchpad for inserting hoisted declarations (e.g. a `global x`
//! statement) once near the top of whichever function or class body is
//! currently being emitted, without inserting the same one twice.

use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct HeadingBuffer {
    /// Insert position within the owning buffer's token vector; reset by
    /// `mark` whenever emission enters a new function/class/method body.
    pos: usize,
    reg: FxHashMap<String, usize>,
    indent: String,
}

impl HeadingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the insertion point to `pos` (the current end of the owning
    /// buffer) and clears the dedup registry -- called once per
    /// function/class/method body before its statements are emitted.
    pub fn mark(&mut self, pos: usize, indent: &str) {
        self.reg.clear();
        self.pos = pos;
        self.indent = format!("\n{indent}");
    }

    /// Conditionally inserts `code` at this heading's position, identified
    /// by `key` so a repeated request for the same hoisted name is a
    /// no-op. Returns the two tokens to splice into the owning buffer at
    /// `self.pos`, advancing it past them, or `None` if `key` was already
    /// inserted.
    pub fn insert(&mut self, key: &str, code: &str) -> Option<(usize, [String; 2])> {
        if self.reg.contains_key(key) {
            return None;
        }
        let at = self.pos;
        self.reg.insert(key.to_string(), at);
        self.pos += 2;
        Some((at, [code.to_string(), self.indent.clone()]))
    }
}
