//! The `Rule` trait and the buffer surface it dispatches against.

use jst_entry::{Document, Entry, EntryId};

/// The minimal surface a rule needs from whatever buffer is driving
/// dispatch. Kept as a trait, rather than naming `EmitBuffer` directly, so
/// this crate doesn't have to depend on `jst-emit` -- `jst-emit` depends on
/// `jst-rules`, not the other way around; its `EmitBuffer` implements this
/// trait.
pub trait RuleBuffer {
    /// The document this buffer is translating.
    fn doc(&self) -> &Document;

    /// The entry id at the current dispatch position, offset forward or
    /// backward. `None` past either end of this buffer's range.
    fn current(&self, offset: isize) -> Option<EntryId>;

    /// Appends a literal token to the output.
    fn add(&mut self, token: &str);

    /// Appends a single space, collapsing into any trailing whitespace
    /// already at the end of the buffer.
    fn space(&mut self);

    /// Drops all trailing whitespace tokens from the buffer.
    fn trim(&mut self);

    /// Starts a new line, optionally adjusting the current indent by
    /// `tabs` levels (positive to indent, negative to dedent).
    fn new_line(&mut self, tabs: i32);

    /// The last token appended, or an empty string if nothing has been
    /// appended yet.
    fn peek(&self) -> String;

    /// Appends `id` and its whole subtree to the buffer, fully translating
    /// it first. Returns the number of entries consumed (the subtree size).
    fn append_entry(&mut self, id: EntryId) -> usize;

    /// Translates the contiguous entry range `[start, end)` through the
    /// rule trie, appending the result to this buffer, and returns
    /// `end - start`. This is the primitive `append_entry` and
    /// `append_children` are both built from: unlike `append_entry`
    /// (which re-enters the trie *at* `start`, so it can re-match a
    /// container's own kind), this is for driving a flat run of sibling
    /// entries -- a container's direct children, a `for`-head segment
    /// between two `;`, a comma-separated slice of a call's argument list
    /// -- none of which should be re-matched as a container themselves.
    fn append_range(&mut self, start: EntryId, end: EntryId) -> usize;

    /// Translates every descendant of `container` (not including
    /// `container` itself), bounded to its subtree, and appends the
    /// result. Returns the number of entries consumed (subtree size minus
    /// one). The shape every container rule (`StatementBlock`, `ObjectType`,
    /// `ArrayType`, ...) needs: emit the opening punctuation itself, call
    /// this to translate the body, then emit the closing punctuation.
    fn append_children(&mut self, container: EntryId) -> usize {
        let range = self.doc().subtree_range(container);
        self.append_range(range.start as EntryId + 1, range.end as EntryId)
    }

    /// Inserts `code` as a synthesized statement at this buffer's current
    /// insertion point (the start of the line holding the last `new_line`
    /// token) -- used for hoisted declarations like a synthetic
    /// loop/switch state variable. Returns `false` if there is no line to
    /// insert before.
    fn insert_code(&mut self, code: &str) -> bool;

    /// Registers `code` as an import statement at the top of the
    /// translation unit if it has not already been registered; returns
    /// `true` if it was newly inserted.
    fn insert_import_statement(&mut self, code: &str) -> bool;

    /// Marks the current buffer position as the insertion point for future
    /// header code (imports). Only meaningful while processing an
    /// `ImportBlock` entry.
    fn mark_header_offset(&mut self);

    /// Resets the per-function heading scratchpad to the current position
    /// -- called once when emission enters a function/method body, so a
    /// later `insert_heading` call (from a nested `global`-hoisting rule)
    /// knows where to splice.
    fn mark_heading(&mut self);

    /// Conditionally hoists `code` at the current heading position, keyed
    /// by `key` so a repeated request for the same name is a no-op.
    /// Returns whether it was newly inserted.
    fn insert_heading(&mut self, key: &str, code: &str) -> bool;

    /// A fresh, still-unused synthesized identifier with the given prefix
    /// (`_switch_0`, `_switch_1`, ...) -- for desugarings that need a
    /// temporary name no source identifier could collide with.
    fn next_synth_name(&mut self, prefix: &str) -> String;

    /// Synthesizes a standalone `def <name>(<params>):` from a Lambda's
    /// already-resolved parameter ids and its `StatementBlock` body,
    /// hoists it ahead of the current statement, and returns `<name>` --
    /// the block-bodied arrow function case, where the lambda can't be
    /// emitted as a Python expression in place. The default is a no-op
    /// returning an empty name; only `jst-emit::EmitBuffer` can actually
    /// translate and splice a hoisted definition.
    fn insert_function(&mut self, _params: &[EntryId], _body: EntryId) -> String {
        String::new()
    }

    /// Convenience over `current` + `doc` for rules that only need the
    /// entry, not its id.
    fn current_entry(&self, offset: isize) -> Option<&Entry> {
        self.current(offset).map(|id| self.doc().get(id))
    }

    /// Lexical scope info for the whole document, rebuilt on every call --
    /// simpler than threading a cached copy through every buffer split, at
    /// the cost of redoing an O(document size) walk each time a rule needs
    /// it (only the `global`-hoisting rule does). Fine for the source sizes
    /// this translator targets.
    fn scope_info(&self) -> jst_entry::ScopeInfo {
        jst_entry::ScopeInfo::build(self.doc())
    }
}

/// A single translation rule, matched against a path of entry-kind names
/// and applied against whatever entry sequence a [`RuleBuffer`] is
/// currently pointed at.
pub trait Rule {
    /// A name used only for diagnostics (`TranslateError::Rule`).
    fn name(&self) -> &str;

    /// The sequence of `EntryKind::trie_name()` path segments this rule is
    /// registered under. `"ANY"` as a segment fans out over every direct
    /// child of the entry at that point instead of matching one specific
    /// kind (see [`crate::trie::RuleTrie`]).
    fn path(&self) -> &[&'static str];

    /// Attempts to translate the entry (or entries) this rule was matched
    /// against. `offset` is the dispatch position, relative to the
    /// buffer's own cursor, that the trie walk has reached.
    ///
    /// Returns the number of entries consumed on success (at least 1);
    /// `0` declines the match (the rule's path matched structurally, but
    /// inspecting the entry's text or siblings ruled it out), and dispatch
    /// continues down the bucket's remaining rules.
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize;
}

/// Matches a single entry kind unconditionally and emits its source text
/// verbatim, followed by an optional fixed token (e.g. trailing `:`).
pub struct BasicRule {
    name: String,
    path: [&'static str; 1],
    token: &'static str,
}

impl BasicRule {
    pub fn new(kind_name: &'static str, token: &'static str) -> Self {
        BasicRule { name: format!("basic_{kind_name}"), path: [kind_name], token }
    }
}

impl Rule for BasicRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &[&'static str] {
        &self.path
    }

    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        let text = entry.text.clone();
        buf.add(&text);
        if !self.token.is_empty() {
            buf.add(self.token);
        }
        1
    }
}

/// Applies [`BasicRule`]'s behavior to any entry whose kind is one of a
/// fixed list, without being registered into the trie under a specific
/// path -- used for the "no more specific rule matched" fallback.
pub struct DefaultRule {
    name: String,
    kinds: Vec<&'static str>,
    token: &'static str,
}

impl DefaultRule {
    pub fn new(name: impl Into<String>, kinds: Vec<&'static str>, token: &'static str) -> Self {
        DefaultRule { name: name.into(), kinds, token }
    }
}

impl Rule for DefaultRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &[&'static str] {
        &[]
    }

    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        if !self.kinds.contains(&entry.kind.trie_name()) {
            return 0;
        }
        let text = entry.text.clone();
        buf.add(&text);
        if !self.token.is_empty() {
            buf.add(self.token);
        }
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jst_common::Span;
    use jst_entry::{EntryKind, NO_PARENT};

    struct FakeBuffer {
        doc: Document,
        pos: isize,
        out: Vec<String>,
    }

    impl RuleBuffer for FakeBuffer {
        fn doc(&self) -> &Document {
            &self.doc
        }
        fn current(&self, offset: isize) -> Option<EntryId> {
            let idx = self.pos + offset;
            if idx < 0 || idx as usize >= self.doc.entries.len() {
                return None;
            }
            Some(idx as u32)
        }
        fn add(&mut self, token: &str) {
            self.out.push(token.to_string());
        }
        fn space(&mut self) {
            self.out.push(" ".into());
        }
        fn trim(&mut self) {
            while matches!(self.out.last(), Some(s) if s.trim().is_empty()) {
                self.out.pop();
            }
        }
        fn new_line(&mut self, _tabs: i32) {
            self.out.push("\n".into());
        }
        fn peek(&self) -> String {
            self.out.last().cloned().unwrap_or_default()
        }
        fn append_entry(&mut self, _id: EntryId) -> usize {
            0
        }
        fn append_range(&mut self, _start: EntryId, _end: EntryId) -> usize {
            0
        }
        fn insert_code(&mut self, _code: &str) -> bool {
            false
        }
        fn insert_import_statement(&mut self, _code: &str) -> bool {
            false
        }
        fn mark_header_offset(&mut self) {}
        fn mark_heading(&mut self) {}
        fn insert_heading(&mut self, _key: &str, _code: &str) -> bool {
            false
        }
        fn next_synth_name(&mut self, prefix: &str) -> String {
            format!("{prefix}0")
        }
    }

    fn one_entry_doc(kind: EntryKind, text: &str) -> Document {
        Document {
            source: text.to_string(),
            entries: vec![Entry {
                id: 0,
                kind,
                span: Span::new(0, text.len() as u32),
                parent: NO_PARENT,
                inset: 0,
                extended: None,
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn basic_rule_emits_text_and_token() {
        let doc = one_entry_doc(EntryKind::NumberType, "42");
        let mut buf = FakeBuffer { doc, pos: 0, out: Vec::new() };
        let rule = BasicRule::new("NumberType", "");
        assert_eq!(rule.apply(&mut buf, 0), 1);
        assert_eq!(buf.out, vec!["42".to_string()]);
    }

    #[test]
    fn default_rule_declines_unlisted_kind() {
        let doc = one_entry_doc(EntryKind::NameType, "x");
        let mut buf = FakeBuffer { doc, pos: 0, out: Vec::new() };
        let rule = DefaultRule::new("defaults", vec!["NumberType"], "");
        assert_eq!(rule.apply(&mut buf, 0), 0);
        assert!(buf.out.is_empty());
    }
}
