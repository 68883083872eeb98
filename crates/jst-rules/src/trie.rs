//! The rule trie: a prefix tree over `EntryKind::trie_name()` path
//! segments. A rule's path is matched against the entry at the buffer's
//! current position and the entries immediately following it in document
//! order -- for a container, that is exactly its first few children, since
//! the entry arena is depth-first and contiguous. A reserved `"ANY"`
//! segment breaks that straight-line walk: instead of matching one more
//! consecutive entry, it fans the remaining path out over *every* direct
//! child of whatever entry the path matched up to that point.

use rustc_hash::FxHashMap;

use jst_entry::EntryId;

use crate::rule::{Rule, RuleBuffer};

const ANY: &str = "ANY";

/// Number of path segments after the last `"ANY"` (or the whole path, if it
/// has none) -- the count of segments that actually advanced `depth` by one
/// each since the last fan-out reset it to a specific child's position.
fn trailing_segments(path: &[&'static str]) -> usize {
    path.iter().rev().take_while(|seg| **seg != ANY).count()
}

#[derive(Default)]
pub struct RuleTrie {
    children: FxHashMap<&'static str, RuleTrie>,
    any: Option<Box<RuleTrie>>,
    rules: Vec<Box<dyn Rule>>,
}

impl RuleTrie {
    pub fn new() -> Self {
        RuleTrie::default()
    }

    /// Registers `rule` at the trie position its `path()` names, creating
    /// any intermediate nodes that don't exist yet.
    pub fn add(&mut self, rule: Box<dyn Rule>) {
        let mut node = self;
        for seg in rule.path() {
            node = if *seg == ANY {
                node.any.get_or_insert_with(|| Box::new(RuleTrie::default()))
            } else {
                node.children.entry(seg).or_insert_with(RuleTrie::default)
            };
        }
        node.rules.push(rule);
    }

    /// Attempts to translate the entry at `buf`'s current position.
    /// Returns the number of entries consumed by whichever rule matched
    /// first, or `0` if nothing in the whole trie claimed it -- callers
    /// then force the buffer's cursor forward by one entry themselves
    /// (the no-edit passthrough case).
    pub fn process(&self, buf: &mut dyn RuleBuffer) -> usize {
        self.process_at(buf, 0)
    }

    fn process_at(&self, buf: &mut dyn RuleBuffer, depth: isize) -> usize {
        if let Some(id) = buf.current(depth) {
            let kind_name = buf.doc().get(id).kind.trie_name();
            if let Some(child) = self.children.get(kind_name) {
                let n = child.process_at(buf, depth + 1);
                if n > 0 {
                    return n;
                }
            }
        }

        // The entry that matched the path segment leading to `self` (i.e.
        // the container an "ANY" step here should fan out over) sits one
        // position behind whatever `depth` is about to examine next.
        if let Some(any) = &self.any {
            if let Some(container) = buf.current(depth - 1) {
                let n = any.process_any(buf, container);
                if n > 0 {
                    return n;
                }
            }
        }

        // `depth` counts every path segment walked to reach this node,
        // including ones consumed by an "ANY" fan-out -- but `process_any`
        // re-bases `depth` onto the matched child's own position rather
        // than incrementing it, so only the segments *after* the last
        // "ANY" actually advanced `depth` by one each. A rule indexes
        // relative to the first entry its own path matched; that's this
        // node's `depth` minus that trailing, ANY-free segment count.
        for rule in &self.rules {
            let trailing = trailing_segments(rule.path());
            let n = rule.apply(buf, depth - trailing as isize);
            if n > 0 {
                return n;
            }
        }
        0
    }

    /// `container` is the entry the path matched up to this wildcard step.
    /// Tries the remaining path independently against each of its direct
    /// children, restarting the straight-line walk at each child in turn.
    fn process_any(&self, buf: &mut dyn RuleBuffer, container: EntryId) -> usize {
        let base = match buf.current(0) {
            Some(id) => id as isize,
            None => return 0,
        };
        let children: Vec<EntryId> = buf.doc().children_of(container).map(|e| e.id).collect();
        for child in children {
            let n = self.process_at(buf, child as isize - base);
            if n > 0 {
                return n;
            }
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jst_common::Span;
    use jst_entry::{Document, Entry, EntryKind, NO_PARENT};

    struct FakeBuffer {
        doc: Document,
        pos: usize,
        out: Vec<String>,
    }

    impl RuleBuffer for FakeBuffer {
        fn doc(&self) -> &Document {
            &self.doc
        }
        fn current(&self, offset: isize) -> Option<EntryId> {
            let idx = self.pos as isize + offset;
            if idx < 0 || idx as usize >= self.doc.entries.len() {
                return None;
            }
            Some(idx as u32)
        }
        fn add(&mut self, token: &str) {
            self.out.push(token.to_string());
        }
        fn space(&mut self) {}
        fn trim(&mut self) {}
        fn new_line(&mut self, _tabs: i32) {}
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

    fn e(id: u32, kind: EntryKind, parent: EntryId, inset: u32, text: &str) -> Entry {
        Entry { id, kind, span: Span::new(0, 0), parent, inset, extended: None, text: text.into() }
    }

    struct RecordingRule {
        path: Vec<&'static str>,
        label: &'static str,
    }

    impl Rule for RecordingRule {
        fn name(&self) -> &str {
            self.label
        }
        fn path(&self) -> &[&'static str] {
            &self.path
        }
        fn apply(&self, buf: &mut dyn RuleBuffer, _offset: isize) -> usize {
            buf.add(self.label);
            self.path.len().max(1)
        }
    }

    #[test]
    fn matches_consecutive_flat_path() {
        let doc = Document {
            source: String::new(),
            entries: vec![
                e(0, EntryKind::VariableType, NO_PARENT, 0, "var"),
                e(1, EntryKind::Declaration, 0, 1, "x"),
            ],
        };
        let mut trie = RuleTrie::new();
        trie.add(Box::new(RecordingRule { path: vec!["VariableType", "Declaration"], label: "var_decl" }));

        let mut buf = FakeBuffer { doc, pos: 0, out: Vec::new() };
        let consumed = trie.process(&mut buf);
        assert_eq!(consumed, 2);
        assert_eq!(buf.out, vec!["var_decl".to_string()]);
    }

    #[test]
    fn any_segment_fans_out_over_children() {
        // A container whose first child is a Comment (skipped by the
        // concrete path) and second child is the NameType the rule cares
        // about; the ANY wildcard must still find it.
        let doc = Document {
            source: String::new(),
            entries: vec![
                e(0, EntryKind::StatementBlock, NO_PARENT, 0, ""),
                e(1, EntryKind::Comment, 0, 1, "// hi"),
                e(2, EntryKind::NameType, 0, 1, "x"),
            ],
        };
        let mut trie = RuleTrie::new();
        let mut any_node = RuleTrie::new();
        any_node.add(Box::new(RecordingRule { path: vec!["NameType"], label: "found_name" }));
        trie.children.insert("StatementBlock", {
            let mut n = RuleTrie::new();
            n.any = Some(Box::new(any_node));
            n
        });

        let mut buf = FakeBuffer { doc, pos: 0, out: Vec::new() };
        let consumed = trie.process(&mut buf);
        assert_eq!(consumed, 1);
        assert_eq!(buf.out, vec!["found_name".to_string()]);
    }

    #[test]
    fn rule_offset_points_at_its_own_match_not_past_it() {
        // A path-based rule (not the offset-blind `RecordingRule`) must see
        // its own matched entry at the offset it's handed, the same way
        // `BasicRule` does when called directly (see jst-rules::rule tests).
        struct EchoRule {
            path: [&'static str; 1],
        }
        impl Rule for EchoRule {
            fn name(&self) -> &str {
                "echo"
            }
            fn path(&self) -> &[&'static str] {
                &self.path
            }
            fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
                let Some(entry) = buf.current_entry(offset) else { return 0 };
                buf.add(&entry.text);
                1
            }
        }
        let doc = Document {
            source: String::new(),
            entries: vec![e(0, EntryKind::NumberType, NO_PARENT, 0, "42"), e(1, EntryKind::End, 0, 1, ";")],
        };
        let mut trie = RuleTrie::new();
        trie.add(Box::new(EchoRule { path: ["NumberType"] }));
        let mut buf = FakeBuffer { doc, pos: 0, out: Vec::new() };
        assert_eq!(trie.process(&mut buf), 1);
        assert_eq!(buf.out, vec!["42".to_string()]);
    }

    #[test]
    fn unmatched_path_returns_zero() {
        let doc = Document { source: String::new(), entries: vec![e(0, EntryKind::NumberType, NO_PARENT, 0, "1")] };
        let trie = RuleTrie::new();
        let mut buf = FakeBuffer { doc, pos: 0, out: Vec::new() };
        assert_eq!(trie.process(&mut buf), 0);
    }
}
