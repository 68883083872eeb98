//! Per-container lexical scope bookkeeping: a stable tag for every
//! container's scope, and the set of names each container declares
//! directly.
//!
//! Grounded in the original implementation's `GlobalVar` rule, which needs
//! to tell whether a name assigned inside a nested function was already
//! declared at an enclosing scope, to decide whether the assignment needs
//! an explicit Python `global` statement ahead of it.

use rustc_hash::FxHashMap;

use crate::entry::{Document, EntryId, NO_PARENT};
use crate::kind::EntryKind;

/// A label for one container's scope built from its own ancestry, unique
/// per container (the trailing entry id breaks ties between same-named
/// siblings, e.g. two classes both called `Builder` in different blocks).
pub type ScopeTag = String;

#[derive(Debug, Default)]
pub struct ScopeInfo {
    tags: FxHashMap<EntryId, ScopeTag>,
    declared: FxHashMap<EntryId, Vec<String>>,
}

impl ScopeInfo {
    /// Walks the whole document once, recording a scope tag for every
    /// container and the names each container declares directly -- a
    /// nested function's parameters and locals don't count toward the
    /// enclosing scope's declared set.
    pub fn build(doc: &Document) -> Self {
        let mut tags = FxHashMap::default();
        for entry in &doc.entries {
            if entry.kind.is_container() {
                tags.insert(entry.id, Self::build_tag(doc, entry.id));
            }
        }

        let mut declared: FxHashMap<EntryId, Vec<String>> = FxHashMap::default();
        for entry in &doc.entries {
            if entry.kind != EntryKind::Declaration {
                continue;
            }
            let owner = Self::owning_container(doc, entry.parent);
            declared.entry(owner).or_default().push(entry.text.clone());
        }

        ScopeInfo { tags, declared }
    }

    fn build_tag(doc: &Document, id: EntryId) -> ScopeTag {
        let mut parts = Vec::new();
        let mut cur = id;
        loop {
            let entry = doc.get(cur);
            let label = if entry.text.is_empty() { entry.kind.trie_name() } else { entry.text.as_str() };
            parts.push(format!("{label}#{cur}"));
            if entry.parent == NO_PARENT {
                break;
            }
            cur = entry.parent;
        }
        parts.reverse();
        parts.join(">")
    }

    /// The nearest container that owns `id`: `id` itself if it is already a
    /// container, otherwise its nearest container ancestor.
    pub fn owning_container(doc: &Document, id: EntryId) -> EntryId {
        let mut cur = id;
        loop {
            let entry = doc.get(cur);
            if entry.kind.is_container() || entry.parent == NO_PARENT {
                return cur;
            }
            cur = entry.parent;
        }
    }

    /// The scope tag for a container, or `None` if `id` names a leaf entry.
    pub fn tag_of(&self, container: EntryId) -> Option<&str> {
        self.tags.get(&container).map(String::as_str)
    }

    /// Whether `container` directly declares `name` (not via an ancestor).
    pub fn declares(&self, container: EntryId, name: &str) -> bool {
        self.declared.get(&container).map(|names| names.iter().any(|n| n == name)).unwrap_or(false)
    }

    /// Walks from `container` up through enclosing containers looking for
    /// one that declares `name`. The condition the `global` hoisting
    /// heuristic keys off: a name assigned inside a nested function that
    /// resolves to a declaring ancestor *outside* that function's own
    /// container needs `global name` emitted ahead of the assignment.
    pub fn nearest_declaring_ancestor(&self, doc: &Document, container: EntryId, name: &str) -> Option<EntryId> {
        let mut cur = container;
        loop {
            if self.declares(cur, name) {
                return Some(cur);
            }
            let entry = doc.get(cur);
            if entry.parent == NO_PARENT {
                return None;
            }
            cur = Self::owning_container(doc, entry.parent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn declares_tracks_only_direct_children() {
        let doc = parse("function outer() { var a; function inner() { var b; } }");
        let info = ScopeInfo::build(&doc);

        let outer = doc.entries.iter().find(|e| e.kind == EntryKind::Method && e.text == "function").unwrap();
        let outer_body = doc.children_of(outer.id).find(|e| e.kind == EntryKind::StatementBlock).unwrap();

        assert!(info.declares(outer_body.id, "a"));
        assert!(!info.declares(outer_body.id, "b"));
    }

    #[test]
    fn nearest_declaring_ancestor_finds_enclosing_scope() {
        let doc = parse("function outer() { var a; function inner() { a = 1; } }");
        let info = ScopeInfo::build(&doc);

        let outer = doc.entries.iter().find(|e| e.kind == EntryKind::Method && e.text == "function").unwrap();
        let outer_body = doc.children_of(outer.id).find(|e| e.kind == EntryKind::StatementBlock).unwrap();
        let inner = doc.children_of(outer_body.id).find(|e| e.kind == EntryKind::Method).unwrap();
        let inner_body = doc.children_of(inner.id).find(|e| e.kind == EntryKind::StatementBlock).unwrap();

        assert_eq!(info.nearest_declaring_ancestor(&doc, inner_body.id, "a"), Some(outer_body.id));
        assert_eq!(info.nearest_declaring_ancestor(&doc, inner_body.id, "missing"), None);
    }

    #[test]
    fn scope_tags_are_unique_per_container() {
        let doc = parse("function a() {} function a() {}");
        let info = ScopeInfo::build(&doc);
        let fns: Vec<&crate::entry::Entry> = doc.entries.iter().filter(|e| e.kind == EntryKind::Method).collect();
        assert_eq!(fns.len(), 2);
        assert_ne!(info.tag_of(fns[0].id), info.tag_of(fns[1].id));
    }
}
