//! Binary/unary operators, assignment operators, and the one rule that
//! needs to look at both operands of a comparison before deciding what the
//! operator itself means: `===`/`!==` between two bare names is identity
//! comparison in this ruleset's target style (`is`/`is not`); anywhere
//! else it is ordinary value equality (`==`/`!=`).

use jst_entry::EntryKind;
use jst_rules::{Rule, RuleBuffer};

fn is_identifier_like(kind: EntryKind) -> bool {
    matches!(kind, EntryKind::NameType | EntryKind::ThisType | EntryKind::Declaration)
}

/// `a === b` / `a !== b`, where both sides are bare identifiers (or
/// `this`) -- translated as an identity comparison. Registered at a path
/// one segment longer than the generic operator rule, so the trie tries
/// this first and falls back to `OperatorRule` (`==`/`!=`) when the right
/// side isn't a simple name.
pub struct IdentityCompareRule;

impl Rule for IdentityCompareRule {
    fn name(&self) -> &str {
        "identity_compare"
    }
    fn path(&self) -> &[&'static str] {
        &["NameType", "Operator", "NameType"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(op) = buf.current_entry(offset + 1) else { return 0 };
        let translated = match op.text.as_str() {
            "===" => "is",
            "!==" => "is not",
            _ => return 0,
        };
        let Some(rhs_id) = buf.current(offset + 2) else { return 0 };
        if !is_identifier_like(buf.doc().get(rhs_id).kind) {
            return 0;
        }
        buf.append_entry(buf.current(offset).unwrap());
        buf.add(&format!(" {translated} "));
        buf.append_entry(rhs_id);
        3
    }
}

/// Every other operator token.
pub struct OperatorRule;

impl Rule for OperatorRule {
    fn name(&self) -> &str {
        "operator"
    }
    fn path(&self) -> &[&'static str] {
        &["Operator"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        match entry.text.as_str() {
            "!" => buf.add("not "),
            "&&" => {
                buf.space();
                buf.add("and ");
            }
            "||" => {
                buf.space();
                buf.add("or ");
            }
            "===" => {
                buf.space();
                buf.add("== ");
            }
            "!==" => {
                buf.space();
                buf.add("!= ");
            }
            "in" | "of" => {
                buf.space();
                buf.add("in ");
            }
            other => {
                buf.space();
                buf.add(other);
                buf.add(" ");
            }
        }
        1
    }
}

/// `i++` / `i--` on a bare name, the only increment/decrement shape the
/// end-to-end scenarios require -- desugared to Python's compound
/// assignment since `++`/`--` aren't operators there.
pub struct IncrementDecrementRule;

impl Rule for IncrementDecrementRule {
    fn name(&self) -> &str {
        "increment_decrement"
    }
    fn path(&self) -> &[&'static str] {
        &["NameType", "Operator"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(name) = buf.current_entry(offset) else { return 0 };
        let Some(op) = buf.current_entry(offset + 1) else { return 0 };
        let suffix = match op.text.as_str() {
            "++" => " += 1",
            "--" => " -= 1",
            _ => return 0,
        };
        let name_text = name.text.clone();
        buf.add(&name_text);
        buf.add(suffix);
        2
    }
}

/// `=` or a compound assignment (`+=`, `-=`, ...) -- same spelling in
/// Python, just re-spaced.
pub struct AssignmentRule;

impl Rule for AssignmentRule {
    fn name(&self) -> &str {
        "assignment"
    }
    fn path(&self) -> &[&'static str] {
        &["Assignment"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        buf.space();
        buf.add(&entry.text);
        buf.add(" ");
        1
    }
}

/// `cond ? then : else` -> a Python conditional expression.
pub struct TernaryRule;

impl Rule for TernaryRule {
    fn name(&self) -> &str {
        "ternary"
    }
    fn path(&self) -> &[&'static str] {
        &["TernaryExpression"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        let children: Vec<_> = buf.doc().children_of(id).map(|e| e.id).collect();
        // Children are [condition.., Separator("?"), then.., Separator(":"), else..].
        let q = children.iter().position(|c| {
            let e = buf.doc().get(*c);
            e.kind == EntryKind::Separator && e.text == "?"
        });
        let colon = children.iter().position(|c| {
            let e = buf.doc().get(*c);
            e.kind == EntryKind::Separator && e.text == ":"
        });
        let (Some(q), Some(colon)) = (q, colon) else { return 0 };
        let cond_end = buf.doc().subtree_range(children[q - 1]).end as u32;
        let then_end = buf.doc().subtree_range(children[colon - 1]).end as u32;
        let end = buf.doc().subtree_range(*children.last().unwrap()).end as u32;
        buf.append_range(children[q + 1], then_end);
        buf.add(" if ");
        buf.append_range(children[0], cond_end);
        buf.add(" else ");
        buf.append_range(children[colon + 1], end);
        buf.doc().subtree_range(id).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaves::{BooleanRule, NameRule, NumberRule};
    use jst_emit::EmitBuffer;
    use jst_entry::parse;
    use jst_rules::{BasicRule, DefaultRule, RuleTrie};
    use std::rc::Rc;

    fn trie() -> RuleTrie {
        let mut t = RuleTrie::new();
        t.add(Box::new(IdentityCompareRule));
        t.add(Box::new(IncrementDecrementRule));
        t.add(Box::new(OperatorRule));
        t.add(Box::new(AssignmentRule));
        t.add(Box::new(TernaryRule));
        t.add(Box::new(NameRule));
        t.add(Box::new(NumberRule));
        t.add(Box::new(BooleanRule));
        t.add(Box::new(BasicRule::new("StringType", "")));
        t.add(Box::new(DefaultRule::new("seps", vec!["Separator", "End"], "")));
        t
    }

    fn translate(src: &str) -> String {
        let doc = Rc::new(parse(src));
        let mut buf = EmitBuffer::new(doc, Rc::new(trie()));
        buf.run();
        buf.into_output()
    }

    #[test]
    fn identity_compare_between_bare_names_uses_is() {
        assert_eq!(translate("a === b;"), "a is b\n");
        assert_eq!(translate("a !== b;"), "a is not b\n");
    }

    #[test]
    fn value_equality_against_a_literal_uses_double_equals() {
        assert_eq!(translate("a === 1;"), "a == 1\n");
    }

    #[test]
    fn logical_operators_translate() {
        assert_eq!(translate("a && b;"), "a and b\n");
        assert_eq!(translate("a || b;"), "a or b\n");
    }

    #[test]
    fn postfix_increment_desugars_to_compound_assignment() {
        assert_eq!(translate("i++;"), "i += 1\n");
        assert_eq!(translate("i--;"), "i -= 1\n");
    }

    #[test]
    fn compound_assignment_passes_through() {
        assert_eq!(translate("s += i;"), "s += i\n");
    }

    #[test]
    fn ternary_becomes_conditional_expression() {
        assert_eq!(translate("a ? b : c;"), "b if a else c\n");
    }
}
