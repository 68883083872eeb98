//! Function declarations, class methods, constructors, and arrow
//! (`Lambda`) expressions -- everything that becomes a Python `def` or
//! `lambda`.

use jst_entry::{EntryId, EntryKind, NO_PARENT};
use jst_rules::{Rule, RuleBuffer};

use crate::support::{child_list, subtree_end};

/// A `Constructor` parameter list's names (each already reclassified as
/// `Declaration` by the parser), or a `Lambda`'s parenthesized parameter
/// list (each still a bare `NameType`, since that `Expression`'s parent
/// isn't a `Constructor`) -- either shape yields the same flat name list.
fn declared_names(buf: &dyn RuleBuffer, container: EntryId) -> Vec<EntryId> {
    child_list(buf, container)
        .into_iter()
        .filter(|c| matches!(c.1, EntryKind::Declaration | EntryKind::NameType))
        .map(|c| c.0)
        .collect()
}

fn param_text(buf: &dyn RuleBuffer, params: &[EntryId]) -> String {
    params.iter().map(|id| buf.doc().get(*id).text.clone()).collect::<Vec<_>>().join(", ")
}

/// Whether `id` (a `Method`) sits directly in a class body -- its parent
/// is the class's `StatementBlock`, whose own parent is the `ClassDecl`.
fn is_class_method(buf: &dyn RuleBuffer, id: EntryId) -> bool {
    let doc = buf.doc();
    let parent = doc.get(id).parent;
    if parent == NO_PARENT || doc.get(parent).kind != EntryKind::StatementBlock {
        return false;
    }
    let grandparent = doc.get(parent).parent;
    grandparent != NO_PARENT && doc.get(grandparent).kind == EntryKind::ClassDecl
}

/// `function name(...) { ... }`, a class method `name(...) { ... }`, and
/// `constructor(...) { ... }` all land here: the only difference is where
/// the name comes from (a `Declaration` child for the `function` keyword
/// form, the `Method` entry's own text for the class-body form) and
/// whether a leading `self` parameter gets added.
pub struct MethodRule;

impl Rule for MethodRule {
    fn name(&self) -> &str {
        "method"
    }
    fn path(&self) -> &[&'static str] {
        &["Method"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        let entry_text = buf.doc().get(id).text.clone();
        let children = child_list(buf, id);

        let (name, rest): (Option<String>, &[_]) = if entry_text == "function" {
            match children.first() {
                Some(first) if first.1 == EntryKind::Declaration => (Some(first.2.clone()), &children[1..]),
                _ => (None, &children[..]),
            }
        } else {
            (Some(entry_text), &children[..])
        };

        let ctor_id = rest.iter().find(|c| c.1 == EntryKind::Constructor).map(|c| c.0);
        let body_id = rest.iter().find(|c| c.1 == EntryKind::StatementBlock).map(|c| c.0);
        let params = ctor_id.map(|c| declared_names(buf, c)).unwrap_or_default();

        let Some(name) = name else {
            // Anonymous `function(...) {...}` used as a value -- hoist it
            // exactly like a block-bodied arrow and reference it by the
            // synthesized name.
            let synth = buf.insert_function(&params, body_id.unwrap_or(id));
            buf.add(&synth);
            return buf.doc().subtree_range(id).len();
        };

        let py_name = if name == "constructor" { "__init__".to_string() } else { name };
        let in_class = is_class_method(buf, id);
        let params_rendered = param_text(buf, &params);

        buf.add("def ");
        buf.add(&py_name);
        buf.add("(");
        if in_class {
            buf.add("self");
            if !params.is_empty() {
                buf.add(", ");
            }
        }
        buf.add(&params_rendered);
        buf.add("):");
        buf.new_line(1);
        let consumed_body = body_id.map(|b| buf.append_children(b)).unwrap_or(0);
        if consumed_body == 0 {
            buf.add("pass");
        }
        buf.trim();
        buf.new_line(-1);

        buf.doc().subtree_range(id).len()
    }
}

/// `(params) => expr` (expression body, an implicit `return`) or
/// `(params) => { ... }` (block body, hoisted via `insert_function` since
/// Python has no statement-bodied expression form).
pub struct LambdaRule;

impl Rule for LambdaRule {
    fn name(&self) -> &str {
        "lambda"
    }
    fn path(&self) -> &[&'static str] {
        &["Lambda"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        let children = child_list(buf, id);
        let Some(head) = children.first() else { return 0 };

        let params = match head.1 {
            EntryKind::Expression => declared_names(buf, head.0),
            EntryKind::NameType => vec![head.0],
            _ => return 0,
        };
        let rest = &children[1..];

        if let [(block_id, EntryKind::StatementBlock, _)] = rest {
            let synth = buf.insert_function(&params, *block_id);
            buf.add(&synth);
        } else {
            buf.add("lambda ");
            buf.add(&param_text(buf, &params));
            buf.add(": ");
            if let (Some(first), Some(last)) = (rest.first(), rest.last()) {
                let end = subtree_end(buf, last.0);
                buf.append_range(first.0, end);
            }
        }

        buf.doc().subtree_range(id).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditionals::ReturnRule;
    use crate::containers::{ExpressionRule, StatementBlockRule};
    use crate::declarations::VariableDeclarationRule;
    use crate::leaves::{EndRule, NameRule, NumberRule, SeparatorRule};
    use crate::operators::{AssignmentRule, OperatorRule};
    use jst_emit::EmitBuffer;
    use jst_entry::parse;
    use jst_rules::RuleTrie;
    use std::rc::Rc;

    fn trie() -> RuleTrie {
        let mut t = RuleTrie::new();
        t.add(Box::new(VariableDeclarationRule));
        t.add(Box::new(ReturnRule));
        t.add(Box::new(MethodRule));
        t.add(Box::new(LambdaRule));
        t.add(Box::new(StatementBlockRule));
        t.add(Box::new(ExpressionRule));
        t.add(Box::new(OperatorRule));
        t.add(Box::new(AssignmentRule));
        t.add(Box::new(NameRule));
        t.add(Box::new(NumberRule));
        t.add(Box::new(EndRule));
        t.add(Box::new(SeparatorRule));
        t
    }

    fn translate(src: &str) -> String {
        let doc = Rc::new(parse(src));
        let mut buf = EmitBuffer::new(doc, Rc::new(trie()));
        buf.run();
        buf.into_output()
    }

    #[test]
    fn named_function_declaration() {
        assert_eq!(translate("function add(a, b) { return a + b; }"), "def add(a, b):\n    return a + b\n");
    }

    #[test]
    fn arrow_with_expression_body() {
        assert_eq!(translate("const f = (x) => x + 1;"), "f = lambda x: x + 1\n");
    }

    #[test]
    fn arrow_with_single_bare_param() {
        assert_eq!(translate("const f = x => x;"), "f = lambda x: x\n");
    }

    #[test]
    fn arrow_with_block_body_is_hoisted() {
        let out = translate("const f = (x) => { return x; };");
        assert_eq!(out, "def _func0(x):\n    return x\nf = _func0\n");
    }
}
