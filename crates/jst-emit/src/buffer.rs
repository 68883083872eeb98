//! The stateful emission buffer: a cursor over a [`Document`]'s flat entry
//! range, the token list it is accumulating, and the state shared by every
//! sub-buffer split off of the same translation unit (the running output,
//! the header insertion point, the heading scratchpad, and the import
//! map).

use std::cell::RefCell;
use std::rc::Rc;

use jst_common::{NoEditWarning, Span, NO_EDIT_MARKER};
use jst_entry::{Document, EntryId};
use jst_rules::{RuleBuffer, RuleTrie};

use crate::heading::HeadingBuffer;
use crate::import_map::ImportMap;

struct RootState {
    buf: Vec<String>,
    head_offs: usize,
    heading: HeadingBuffer,
    import_map: ImportMap,
    warnings: Vec<NoEditWarning>,
    no_edit_marked: bool,
    next_synth_id: usize,
}

impl RootState {
    fn new() -> Self {
        RootState {
            buf: Vec::new(),
            head_offs: 0,
            heading: HeadingBuffer::new(),
            import_map: ImportMap::new(),
            warnings: Vec::new(),
            no_edit_marked: false,
            next_synth_id: 0,
        }
    }
}

/// A translation buffer over `[pos, end)` of some `Document`'s entries.
/// Every buffer split off the same translation unit (via [`EmitBuffer::sub_buffer`]
/// or [`EmitBuffer::slice`]) shares one [`RootState`] -- the running
/// output, import bookkeeping, and header insertion point -- but keeps its
/// own local token list until explicitly spliced back with
/// [`EmitBuffer::append_buffer`].
pub struct EmitBuffer {
    doc: Rc<Document>,
    trie: Rc<RuleTrie>,
    root: Rc<RefCell<RootState>>,
    pos: EntryId,
    end: EntryId,
    buf: Vec<String>,
    inset: u32,
    inobject: bool,
    is_root: bool,
}

impl EmitBuffer {
    /// Builds the top-level buffer for an entire translation unit, scanning
    /// it up front for `import` statements so later rules can ask the
    /// import map whether a name is already bound.
    pub fn new(doc: Rc<Document>, trie: Rc<RuleTrie>) -> Self {
        let root_state = Rc::new(RefCell::new(RootState::new()));
        {
            let mut root = root_state.borrow_mut();
            for entry in doc.entries.iter() {
                if entry.kind == jst_entry::EntryKind::ImportBlock {
                    root.import_map.register_import_block(&doc, entry.id);
                }
            }
        }
        let end = doc.entries.len() as EntryId;
        EmitBuffer {
            doc,
            trie,
            root: root_state,
            pos: 1, // entry 0 is the synthetic Root, never itself emitted
            end,
            buf: Vec::new(),
            inset: 0,
            inobject: false,
            is_root: true,
        }
    }

    pub fn import_map(&self) -> std::cell::Ref<'_, ImportMap> {
        std::cell::Ref::map(self.root.borrow(), |r| &r.import_map)
    }

    pub fn inset(&self) -> u32 {
        self.inset
    }

    pub fn set_inobject(&mut self, value: bool) {
        self.inobject = value;
    }

    pub fn inobject(&self) -> bool {
        self.inobject
    }

    /// Drives translation across this buffer's whole range: at each step,
    /// tries the rule trie at the current position; if nothing claims it,
    /// copies the entry's source text through verbatim (marking it with
    /// the no-edit comment the first time this happens in the whole
    /// translation unit) and advances by one entry.
    pub fn run(&mut self) {
        while self.pos < self.end {
            let consumed = self.trie.clone().process(self);
            if consumed > 0 {
                self.pos += consumed as EntryId;
            } else {
                self.emit_no_edit_passthrough();
                self.pos += 1;
            }
        }
    }

    fn emit_no_edit_passthrough(&mut self) {
        let entry = self.doc.get(self.pos).clone();
        let mut first = false;
        {
            let mut root = self.root.borrow_mut();
            if !root.no_edit_marked {
                root.no_edit_marked = true;
                first = true;
            }
            root.warnings.push(NoEditWarning { span: entry.span, text: entry.text.clone() });
        }
        if first {
            self.add(NO_EDIT_MARKER);
            self.new_line(0);
        }
        self.add(entry.source_text(&self.doc.source));
    }

    /// A new buffer over `[start, end)` of the same document, sharing this
    /// one's root state, indent level, and object-literal context.
    pub fn slice(&self, start: EntryId, end: EntryId) -> EmitBuffer {
        EmitBuffer {
            doc: self.doc.clone(),
            trie: self.trie.clone(),
            root: self.root.clone(),
            pos: start,
            end,
            buf: Vec::new(),
            inset: self.inset,
            inobject: self.inobject,
            is_root: false,
        }
    }

    /// A buffer over every descendant of `start` (not including `start`
    /// itself), stopping where `start`'s subtree ends.
    pub fn sub_buffer(&self, start: EntryId) -> EmitBuffer {
        let range = self.doc.subtree_range(start);
        self.slice((range.start as EntryId) + 1, range.end as EntryId)
    }

    /// Fully translates `id`'s subtree (itself included) and appends the
    /// result to this buffer. Returns the number of entries consumed.
    pub fn append_entry(&mut self, id: EntryId) -> usize {
        let range = self.doc.subtree_range(id);
        self.append_range(range.start as EntryId, range.end as EntryId)
    }

    /// Translates the flat entry range `[start, end)` through the rule trie
    /// and appends the result. Unlike [`EmitBuffer::append_entry`], `start`
    /// is not necessarily a container -- this drives a run of sibling
    /// entries (a container's children, one segment of a `for`-head) rather
    /// than re-entering the trie at a single id.
    pub fn append_range(&mut self, start: EntryId, end: EntryId) -> usize {
        if start >= end {
            return 0;
        }
        let mut sub = self.slice(start, end);
        sub.run();
        self.with_buf_mut(|b| b.extend(sub.buf));
        (end - start) as usize
    }

    /// Fully translates `sub` and appends its output to this buffer.
    /// Returns the number of entries `sub` covered.
    pub fn append_buffer(&mut self, mut sub: EmitBuffer) -> usize {
        if sub.pos >= sub.end {
            return 0;
        }
        let count = (sub.end - sub.pos) as usize;
        sub.run();
        self.with_buf_mut(|b| b.extend(sub.buf));
        count
    }

    fn with_buf_mut<R>(&mut self, f: impl FnOnce(&mut Vec<String>) -> R) -> R {
        if self.is_root {
            f(&mut self.root.borrow_mut().buf)
        } else {
            f(&mut self.buf)
        }
    }

    fn with_buf<R>(&self, f: impl FnOnce(&Vec<String>) -> R) -> R {
        if self.is_root {
            f(&self.root.borrow().buf)
        } else {
            f(&self.buf)
        }
    }

    fn indent_string(&self) -> String {
        "    ".repeat(self.inset as usize)
    }

    /// Marks the current position in the heading scratchpad's owning
    /// buffer as the point where hoisted declarations for the
    /// function/class/method body now starting should be inserted.
    pub fn mark_heading(&mut self) {
        let len = self.with_buf(|b| b.len());
        let indent = self.indent_string();
        self.root.borrow_mut().heading.mark(len, &indent);
    }

    /// Conditionally hoists `code` (e.g. `global x`) once per heading
    /// scope, identified by `key`.
    pub fn insert_heading(&mut self, key: &str, code: &str) -> bool {
        let inserted = self.root.borrow_mut().heading.insert(key, code);
        match inserted {
            Some((at, tokens)) => {
                self.with_buf_mut(|b| {
                    b.insert(at, tokens[1].clone());
                    b.insert(at, tokens[0].clone());
                });
                true
            }
            None => false,
        }
    }

    fn find_newline_pos(buf: &[String]) -> Option<usize> {
        let mut i = buf.len();
        while i > 0 {
            i -= 1;
            if buf[i].starts_with('\n') && buf[i].trim().is_empty() {
                return Some(i + 1);
            }
        }
        None
    }

    /// A fresh, still-unused synthesized name (`_func_0`, `_func_1`, ...)
    /// for a hoisted helper function.
    pub fn next_synth_name(&mut self, prefix: &str) -> String {
        let mut root = self.root.borrow_mut();
        let id = root.next_synth_id;
        root.next_synth_id += 1;
        format!("{prefix}{id}")
    }

    pub fn warnings(&self) -> Vec<NoEditWarning> {
        self.root.borrow().warnings.clone()
    }

    pub fn into_output(self) -> String {
        debug_assert!(self.is_root);
        self.root.borrow().buf.concat()
    }
}

impl RuleBuffer for EmitBuffer {
    fn doc(&self) -> &Document {
        &self.doc
    }

    fn current(&self, offset: isize) -> Option<EntryId> {
        let idx = self.pos as isize + offset;
        if idx < 0 {
            return None;
        }
        let idx = idx as EntryId;
        if idx >= self.end {
            return None;
        }
        Some(idx)
    }

    fn add(&mut self, token: &str) {
        if token.is_empty() {
            return;
        }
        self.with_buf_mut(|b| b.push(token.to_string()));
    }

    fn space(&mut self) {
        let last_is_space = self.with_buf(|b| b.last().map(|t| t.ends_with(char::is_whitespace)).unwrap_or(false));
        if !last_is_space {
            self.add(" ");
        }
    }

    fn trim(&mut self) {
        self.with_buf_mut(|b| {
            while matches!(b.last(), Some(t) if t.trim().is_empty()) {
                b.pop();
            }
            if let Some(last) = b.last_mut() {
                *last = last.trim_end().to_string();
            }
        });
    }

    fn new_line(&mut self, tabs: i32) {
        if tabs != 0 {
            self.inset = (self.inset as i32 + tabs).max(0) as u32;
        }
        let indent = self.indent_string();
        self.with_buf_mut(|b| b.push(format!("\n{indent}")));
    }

    fn peek(&self) -> String {
        let local = self.with_buf(|b| b.last().cloned());
        local.or_else(|| self.root.borrow().buf.last().cloned()).unwrap_or_default()
    }

    fn append_entry(&mut self, id: EntryId) -> usize {
        EmitBuffer::append_entry(self, id)
    }

    fn append_range(&mut self, start: EntryId, end: EntryId) -> usize {
        EmitBuffer::append_range(self, start, end)
    }

    fn mark_heading(&mut self) {
        EmitBuffer::mark_heading(self)
    }

    fn insert_heading(&mut self, key: &str, code: &str) -> bool {
        EmitBuffer::insert_heading(self, key, code)
    }

    fn next_synth_name(&mut self, prefix: &str) -> String {
        EmitBuffer::next_synth_name(self, prefix)
    }

    fn insert_code(&mut self, code: &str) -> bool {
        let placed = self.with_buf_mut(|b| {
            Self::find_newline_pos(b).map(|pos| {
                let nl = b[pos - 1].clone();
                b.insert(pos, nl);
                b.insert(pos, code.to_string());
            })
        });
        if placed.is_some() || self.is_root {
            return placed.is_some();
        }
        let mut root = self.root.borrow_mut();
        match Self::find_newline_pos(&root.buf) {
            Some(pos) => {
                let nl = root.buf[pos - 1].clone();
                root.buf.insert(pos, nl);
                root.buf.insert(pos, code.to_string());
                true
            }
            None => false,
        }
    }

    fn insert_import_statement(&mut self, code: &str) -> bool {
        let mut root = self.root.borrow_mut();
        if root.import_map.already_inserted(code) {
            return false;
        }
        root.import_map.mark_inserted(code);
        let pos = root.head_offs.min(root.buf.len());
        root.buf.insert(pos, "\n".to_string());
        root.buf.insert(pos, code.to_string());
        root.head_offs = pos + 2;
        true
    }

    fn mark_header_offset(&mut self) {
        let len = self.with_buf(|b| b.len());
        self.root.borrow_mut().head_offs = len;
    }

    fn insert_function(&mut self, params: &[EntryId], body: EntryId) -> String {
        let name = self.next_synth_name("_func");
        let param_text =
            params.iter().map(|id| self.doc.get(*id).text.clone()).collect::<Vec<_>>().join(", ");
        let mut sub = self.sub_buffer(body);
        sub.new_line(1);
        if self.doc.children_of(body).next().is_some() {
            sub.run();
        } else {
            sub.add("pass");
        }
        sub.trim();
        let mut code = format!("def {name}({param_text}):");
        code.push_str(&sub.buf.concat());
        self.insert_code(&code);
        name
    }
}
