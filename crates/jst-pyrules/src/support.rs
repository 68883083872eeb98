//! Shared helpers used across this rule set's individual modules: flat
//! sibling navigation, comma-list emission, and the few spots where a
//! Python keyword needs to replace a JS one by name rather than being
//! generated structurally.

use jst_entry::{EntryId, EntryKind};
use jst_rules::RuleBuffer;

/// The entry id one past `id`'s whole subtree -- its next sibling, if any,
/// at the same nesting level `id` itself sits at.
pub fn next_sibling(buf: &dyn RuleBuffer, id: EntryId) -> EntryId {
    buf.doc().subtree_range(id).end as EntryId
}

/// Translates every direct child of `container` in place, with no
/// wrapping token before or after -- used to strip the JS parentheses off
/// an `if`/`while` header or a `for` clause segment, where Python doesn't
/// want them. Runs the whole child range through the trie in one pass
/// (not child-by-child) so multi-entry rules (a comparison looking at both
/// its operands, a `var` declaration's name) can still match across
/// siblings.
pub fn emit_children(buf: &mut dyn RuleBuffer, container: EntryId) {
    buf.append_children(container);
}

/// Translates every direct child of `container`, wrapped in `open`/`close`
/// -- the shape a call's argument list, a parenthesized expression, and an
/// array literal all share.
pub fn emit_wrapped(buf: &mut dyn RuleBuffer, container: EntryId, open: &str, close: &str) {
    buf.add(open);
    emit_children(buf, container);
    buf.add(close);
}

/// The id one past the end of `id`'s own subtree -- the correct upper
/// bound for an `append_range` call whose run ends at `id`, regardless of
/// whether `id` is a leaf or itself a container with descendants between
/// its id and its next sibling's.
pub fn subtree_end(buf: &dyn RuleBuffer, id: EntryId) -> EntryId {
    buf.doc().subtree_range(id).end as EntryId
}

/// Direct children of `container`, materialized as `(id, kind, text)`
/// triples -- used by rules that need to scan or split a flat child run
/// (a `for`-head's `;`-separated segments, a `switch` body's `case`
/// groups) before deciding how to translate it, rather than translating
/// children as they're visited.
pub fn child_list(buf: &dyn RuleBuffer, container: EntryId) -> Vec<(EntryId, EntryKind, String)> {
    buf.doc().children_of(container).map(|e| (e.id, e.kind, e.text.clone())).collect()
}

/// Whether `id` is immediately followed, in flat document order, by an
/// `Attribute` continuing a dot chain from it (`extended == Some(id)`) --
/// the condition every leaf/value rule needs to decide whether it ends
/// with a trailing `.` (more chain coming) or a trailing space (it's the
/// end of this expression).
pub fn is_chain_base(buf: &dyn RuleBuffer, id: EntryId) -> bool {
    let end = subtree_end(buf, id);
    let doc = buf.doc();
    if end as usize >= doc.entries.len() {
        return false;
    }
    let next = doc.get(end);
    next.kind == EntryKind::Attribute && next.extended == Some(id)
}

/// A bare JS identifier used as an object-literal key, quoted the way a
/// Python dict key needs to be (`a` -> `'a'`); an already-quoted string key
/// is left untouched.
pub fn quoted_key(kind: EntryKind, text: &str) -> String {
    match kind {
        EntryKind::NameType | EntryKind::Declaration => format!("'{text}'"),
        _ => text.to_string(),
    }
}

/// Walks `id`'s ancestors to find the nearest enclosing `ClassDecl`, then
/// reads its `extends` clause if it has one (the `Keyword("extends")`
/// child is always immediately followed by the base class `NameType`).
pub fn enclosing_base_class(buf: &dyn RuleBuffer, id: EntryId) -> Option<String> {
    let doc = buf.doc();
    let mut cur = doc.get(id).parent;
    while cur != jst_entry::NO_PARENT {
        let entry = doc.get(cur);
        if entry.kind == EntryKind::ClassDecl {
            let children: Vec<_> = doc.children_of(cur).map(|e| (e.kind, e.text.clone())).collect();
            for pair in children.windows(2) {
                if pair[0].0 == EntryKind::Keyword && pair[0].1 == "extends" {
                    return Some(pair[1].1.clone());
                }
            }
            return None;
        }
        cur = entry.parent;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use jst_entry::parse;
    use jst_rules::RuleTrie;

    struct NullBuf<'a> {
        doc: &'a jst_entry::Document,
    }
    impl<'a> RuleBuffer for NullBuf<'a> {
        fn doc(&self) -> &jst_entry::Document {
            self.doc
        }
        fn current(&self, _offset: isize) -> Option<EntryId> {
            None
        }
        fn add(&mut self, _token: &str) {}
        fn space(&mut self) {}
        fn trim(&mut self) {}
        fn new_line(&mut self, _tabs: i32) {}
        fn peek(&self) -> String {
            String::new()
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

    #[test]
    fn next_sibling_skips_a_whole_subtree() {
        let doc = parse("(1); 2;");
        let buf = NullBuf { doc: &doc };
        let expr = doc.entries.iter().find(|e| e.kind == EntryKind::Expression).unwrap();
        let sib = next_sibling(&buf, expr.id);
        assert_eq!(doc.get(sib).text, "2");
    }

    #[test]
    fn base_class_found_through_constructor_body() {
        let doc = parse("class Dog extends Animal { constructor(n) { super(n); } }");
        let buf = NullBuf { doc: &doc };
        let sup = doc.entries.iter().find(|e| e.kind == EntryKind::SuperType).unwrap();
        assert_eq!(enclosing_base_class(&buf, sup.id), Some("Animal".to_string()));
    }

    #[test]
    fn no_base_class_without_extends() {
        let doc = parse("class Dog { constructor(n) {} }");
        let buf = NullBuf { doc: &doc };
        let ctor = doc.entries.iter().find(|e| e.kind == EntryKind::Constructor).unwrap();
        assert_eq!(enclosing_base_class(&buf, ctor.id), None);
    }

    #[test]
    fn quoted_key_wraps_bare_names_only() {
        assert_eq!(quoted_key(EntryKind::NameType, "a"), "'a'");
        assert_eq!(quoted_key(EntryKind::StringType, "\"a\""), "\"a\"");
    }

    #[test]
    fn is_chain_base_true_only_for_the_immediate_dot_continuation() {
        let doc = parse("a.b; c;");
        let buf = NullBuf { doc: &doc };
        let a = doc.entries.iter().find(|e| e.text == "a").unwrap();
        let c = doc.entries.iter().find(|e| e.text == "c").unwrap();
        assert!(is_chain_base(&buf, a.id));
        assert!(!is_chain_base(&buf, c.id));
    }

    #[allow(dead_code)]
    fn unused(_: RuleTrie) {}
}
