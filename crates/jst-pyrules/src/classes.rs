//! `class` declarations and the one expression shape unique to them:
//! `super(...)` used as a call, which delegates to the parent
//! constructor (`super().__init__(...)` in Python) rather than to the
//! bare `super()` value `SuperRule` (in `leaves.rs`) produces for
//! `super.method()` access chains.

use jst_entry::EntryKind;
use jst_rules::{Rule, RuleBuffer};

use crate::support::{child_list, subtree_end};

/// `class Name [extends Base] { ... }`.
pub struct ClassDeclRule;

impl Rule for ClassDeclRule {
    fn name(&self) -> &str {
        "class_decl"
    }
    fn path(&self) -> &[&'static str] {
        &["ClassDecl"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        let children = child_list(buf, id);
        let class_name = children.iter().find(|c| c.1 == EntryKind::Declaration).map(|c| c.2.clone()).unwrap_or_default();
        let mut base = None;
        for pair in children.windows(2) {
            if pair[0].1 == EntryKind::Keyword && pair[0].2 == "extends" {
                base = Some(pair[1].2.clone());
            }
        }
        let body_id = children.iter().find(|c| c.1 == EntryKind::StatementBlock).map(|c| c.0);

        buf.add("class ");
        buf.add(&class_name);
        buf.add("(");
        if let Some(base) = &base {
            buf.add(base);
        }
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

/// `super(args)` called directly (never `super.method(args)`, which is a
/// `SuperType` -> `Attribute` -> `Expression` chain `SuperRule`/
/// `AttributeRule`/`ExpressionRule` already handle without this rule's
/// help) -- the ES6 spelling of delegating to the parent constructor.
pub struct SuperCallRule;

impl Rule for SuperCallRule {
    fn name(&self) -> &str {
        "super_call"
    }
    fn path(&self) -> &[&'static str] {
        &["SuperType", "Expression"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(sup_id) = buf.current(offset) else { return 0 };
        let Some(args_id) = buf.current(offset + 1) else { return 0 };
        buf.add("super().__init__(");
        buf.append_children(args_id);
        buf.trim();
        buf.add(")");
        (subtree_end(buf, args_id) - sup_id) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{ExpressionRule, StatementBlockRule};
    use crate::functions::MethodRule;
    use crate::leaves::{EndRule, NameRule, NumberRule, SeparatorRule, ThisRule, AttributeRule};
    use crate::operators::AssignmentRule;
    use jst_emit::EmitBuffer;
    use jst_entry::parse;
    use jst_rules::RuleTrie;
    use std::rc::Rc;

    fn trie() -> RuleTrie {
        let mut t = RuleTrie::new();
        t.add(Box::new(SuperCallRule));
        t.add(Box::new(ClassDeclRule));
        t.add(Box::new(MethodRule));
        t.add(Box::new(StatementBlockRule));
        t.add(Box::new(ExpressionRule));
        t.add(Box::new(ThisRule));
        t.add(Box::new(AttributeRule));
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
    fn class_with_constructor_and_super_call() {
        let out = translate("class C extends B { constructor(x){ super(x); this.x = x; } }");
        assert_eq!(out, "class C(B):\n    def __init__(self, x):\n        super().__init__(x)\n        self.x = x\n");
    }

    #[test]
    fn class_without_base() {
        let out = translate("class Point { constructor(x){ this.x = x; } }");
        assert_eq!(out, "class Point():\n    def __init__(self, x):\n        self.x = x\n");
    }
}
