//! Control flow: `if`/`else if`/`else`, `while`, `do`-`while`, C-style and
//! `for`-`in`/`for`-`of` loops, `switch`, and the handful of bare
//! statement keywords (`return`, `break`, `continue`, `new`) that don't
//! need a container of their own.

use jst_entry::EntryKind;
use jst_rules::{Rule, RuleBuffer};

use crate::support::{child_list, subtree_end};

/// `if` / `else if` / `else`. `else` immediately followed by another
/// `Condition("if")` collapses the pair into a single `elif`.
pub struct ConditionRule;

impl Rule for ConditionRule {
    fn name(&self) -> &str {
        "condition"
    }
    fn path(&self) -> &[&'static str] {
        &["Condition"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        match entry.text.as_str() {
            "if" => {
                buf.add("if ");
                1
            }
            "else" => {
                if let Some(next) = buf.current_entry(offset + 1) {
                    if next.kind == EntryKind::Condition && next.text == "if" {
                        buf.add("elif ");
                        return 2;
                    }
                }
                buf.add("else");
                1
            }
            _ => 0,
        }
    }
}

/// `while (cond) { ... }`.
pub struct WhileRule;

impl Rule for WhileRule {
    fn name(&self) -> &str {
        "while"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        if entry.text != "while" {
            return 0;
        }
        buf.add("while ");
        1
    }
}

/// `do { ... } while (cond);` -> `while True:` with the loop body followed
/// by a negated-condition break, Python having no direct equivalent of a
/// post-tested loop.
pub struct DoWhileRule;

impl Rule for DoWhileRule {
    fn name(&self) -> &str {
        "do_while"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword", "StatementBlock", "Keyword", "Expression"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(do_kw) = buf.current_entry(offset) else { return 0 };
        if do_kw.text != "do" {
            return 0;
        }
        let Some(body_id) = buf.current(offset + 1) else { return 0 };
        let Some(while_kw) = buf.current_entry(offset + 2) else { return 0 };
        if while_kw.text != "while" {
            return 0;
        }
        let Some(cond_id) = buf.current(offset + 3) else { return 0 };

        buf.add("while True:");
        buf.new_line(1);
        let consumed = buf.append_children(body_id);
        if consumed == 0 {
            buf.add("pass");
        }
        buf.trim();
        buf.new_line(0);
        buf.add("if not (");
        buf.append_children(cond_id);
        buf.trim();
        buf.add("): break");
        buf.trim();
        buf.new_line(-1);

        let do_id = buf.current(offset).unwrap();
        let end = subtree_end(buf, cond_id);
        let consumed_total = (end - do_id) as usize;
        // A trailing `;` after `while (cond)` belongs to whoever dispatches
        // next and is consumed separately by `EndRule` -- not folded in here.
        consumed_total
    }
}

fn for_condition_segments(buf: &dyn RuleBuffer, fc_id: jst_entry::EntryId) -> Vec<Vec<(jst_entry::EntryId, EntryKind, String)>> {
    let children = child_list(buf, fc_id);
    let mut segments = vec![Vec::new()];
    for child in children {
        if child.1 == EntryKind::End {
            segments.push(Vec::new());
        } else {
            segments.last_mut().unwrap().push(child);
        }
    }
    segments
}

fn emit_segment(buf: &mut dyn RuleBuffer, seg: &[(jst_entry::EntryId, EntryKind, String)]) {
    if let (Some(first), Some(last)) = (seg.first(), seg.last()) {
        let end = subtree_end(buf, last.0);
        buf.append_range(first.0, end);
    }
}

/// The C-style, three-clause `for (init; cond; step) { ... }` -- desugared
/// to an explicit init statement, a `while cond:`, and the step folded in
/// as the loop body's last statement (spec §8 scenario 3). Declines (and
/// lets `ForOfInRule` try) when the head has no `;` segments at all.
pub struct ForRule;

impl Rule for ForRule {
    fn name(&self) -> &str {
        "for_c_style"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword", "ForCondition", "StatementBlock"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(kw) = buf.current_entry(offset) else { return 0 };
        if kw.text != "for" {
            return 0;
        }
        let Some(fc_id) = buf.current(offset + 1) else { return 0 };
        let Some(body_id) = buf.current(offset + 2) else { return 0 };
        let segments = for_condition_segments(buf, fc_id);
        if segments.len() != 3 {
            return 0;
        }

        if !segments[0].is_empty() {
            emit_segment(buf, &segments[0]);
            buf.new_line(0);
        }
        buf.add("while ");
        if segments[1].is_empty() {
            buf.add("True");
        } else {
            emit_segment(buf, &segments[1]);
        }
        buf.trim();
        buf.add(":");
        buf.new_line(1);
        let consumed_body = buf.append_children(body_id);
        if consumed_body == 0 && segments[2].is_empty() {
            buf.add("pass");
        }
        if !segments[2].is_empty() {
            buf.trim();
            buf.new_line(0);
            emit_segment(buf, &segments[2]);
        }
        buf.trim();
        buf.new_line(-1);

        let kw_id = buf.current(offset).unwrap();
        (subtree_end(buf, body_id) - kw_id) as usize
    }
}

/// `for (let x in obj) { ... }` / `for (const x of items) { ... }`.
pub struct ForOfInRule;

impl Rule for ForOfInRule {
    fn name(&self) -> &str {
        "for_of_in"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword", "ForCondition", "StatementBlock"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(kw) = buf.current_entry(offset) else { return 0 };
        if kw.text != "for" {
            return 0;
        }
        let Some(fc_id) = buf.current(offset + 1) else { return 0 };
        let Some(body_id) = buf.current(offset + 2) else { return 0 };
        let children = child_list(buf, fc_id);
        if children.iter().any(|c| c.1 == EntryKind::End) {
            return 0;
        }
        let Some(op_idx) = children
            .iter()
            .position(|c| c.1 == EntryKind::Operator && (c.2 == "in" || c.2 == "of"))
        else {
            return 0;
        };
        let lhs = &children[..op_idx];
        let rhs = &children[op_idx + 1..];
        let Some(var) = lhs.iter().find(|c| matches!(c.1, EntryKind::Declaration | EntryKind::NameType)) else {
            return 0;
        };
        if rhs.is_empty() {
            return 0;
        }

        buf.add("for ");
        buf.add(&var.2);
        buf.add(" in ");
        emit_segment(buf, rhs);
        buf.trim();
        buf.add(":");
        buf.new_line(1);
        let consumed_body = buf.append_children(body_id);
        if consumed_body == 0 {
            buf.add("pass");
        }
        buf.trim();
        buf.new_line(-1);

        let kw_id = buf.current(offset).unwrap();
        (subtree_end(buf, body_id) - kw_id) as usize
    }
}

/// `switch (k) { case 1: ...; break; default: ...; }` -> a synthesized
/// scrutinee assignment, `while True:` and a chained `if`/`elif`/`else`
/// keyed on equality with that scrutinee (spec §8 scenario 6). This is the
/// simplified form the scenario calls for: no fallthrough between case
/// bodies is modeled (see DESIGN.md).
pub struct SwitchRule;

impl Rule for SwitchRule {
    fn name(&self) -> &str {
        "switch"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword", "Expression", "StatementBlock"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(kw) = buf.current_entry(offset) else { return 0 };
        if kw.text != "switch" {
            return 0;
        }
        let Some(cond_id) = buf.current(offset + 1) else { return 0 };
        let Some(body_id) = buf.current(offset + 2) else { return 0 };

        let children = child_list(buf, body_id);
        let mut groups: Vec<(
            Option<(jst_entry::EntryId, jst_entry::EntryId)>,
            Option<(jst_entry::EntryId, jst_entry::EntryId)>,
            bool,
        )> = Vec::new();
        let mut i = 0;
        while i < children.len() {
            let is_case = children[i].1 == EntryKind::Keyword && children[i].2 == "case";
            let is_default = children[i].1 == EntryKind::Keyword && children[i].2 == "default";
            if !is_case && !is_default {
                i += 1;
                continue;
            }
            i += 1;
            let mut key_range = None;
            if is_case {
                let key_start = i;
                while i < children.len() && !(children[i].1 == EntryKind::Separator && children[i].2 == ":") {
                    i += 1;
                }
                if key_start < i {
                    key_range = Some((children[key_start].0, subtree_end(buf, children[i - 1].0)));
                }
                if i < children.len() {
                    i += 1; // skip ':'
                }
            } else if i < children.len() && children[i].1 == EntryKind::Separator && children[i].2 == ":" {
                i += 1;
            }
            let stmt_start = i;
            while i < children.len()
                && !((children[i].1 == EntryKind::Keyword) && (children[i].2 == "case" || children[i].2 == "default"))
            {
                i += 1;
            }
            let stmt_range =
                if stmt_start < i { Some((children[stmt_start].0, subtree_end(buf, children[i - 1].0))) } else { None };
            let ends_in_break = children[stmt_start..i]
                .iter()
                .rev()
                .find(|c| c.1 != EntryKind::End)
                .is_some_and(|c| c.1 == EntryKind::Keyword && c.2 == "break");
            groups.push((key_range, stmt_range, ends_in_break));
        }

        let synth = buf.next_synth_name("_switch_");
        buf.add(&synth);
        buf.add(" = ");
        buf.append_children(cond_id);
        buf.trim();
        buf.new_line(0);
        buf.add("while True:");
        buf.new_line(1);
        let mut any_if = false;
        for (key_range, stmt_range, ends_in_break) in &groups {
            match key_range {
                Some((ks, ke)) => {
                    buf.add(if any_if { "elif " } else { "if " });
                    any_if = true;
                    buf.add(&synth);
                    buf.add(" == ");
                    buf.append_range(*ks, *ke);
                }
                None => buf.add("else"),
            }
            buf.trim();
            buf.add(":");
            buf.new_line(1);
            match stmt_range {
                Some((ss, se)) => {
                    buf.append_range(*ss, *se);
                }
                None => buf.add("pass"),
            }
            buf.trim();
            if !ends_in_break {
                buf.new_line(0);
                buf.add("break");
            }
            buf.trim();
            buf.new_line(-1);
        }
        if groups.is_empty() {
            buf.add("pass");
            buf.new_line(0);
        }
        buf.trim();
        buf.new_line(-1);

        let kw_id = buf.current(offset).unwrap();
        (subtree_end(buf, body_id) - kw_id) as usize
    }
}

/// `return`, optionally with a trailing expression.
pub struct ReturnRule;

impl Rule for ReturnRule {
    fn name(&self) -> &str {
        "return"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        if entry.text != "return" {
            return 0;
        }
        let bare = matches!(buf.current_entry(offset + 1), None) || matches!(
            buf.current_entry(offset + 1).map(|e| e.kind),
            Some(EntryKind::End)
        );
        buf.add(if bare { "return" } else { "return " });
        1
    }
}

/// `break` / `continue`, unchanged.
pub struct BreakContinueRule;

impl Rule for BreakContinueRule {
    fn name(&self) -> &str {
        "break_continue"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        match entry.text.as_str() {
            "break" => buf.add("break"),
            "continue" => buf.add("continue"),
            _ => return 0,
        }
        1
    }
}

/// `new Foo(...)` -> `Foo(...)`: Python constructs an instance by calling
/// the class directly, no separate operator needed.
pub struct NewRule;

impl Rule for NewRule {
    fn name(&self) -> &str {
        "new"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        if entry.text != "new" {
            return 0;
        }
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{ExpressionRule, StatementBlockRule};
    use crate::leaves::{EndRule, NameRule, NumberRule, SeparatorRule};
    use crate::operators::{AssignmentRule, IdentityCompareRule, IncrementDecrementRule, OperatorRule};
    use jst_emit::EmitBuffer;
    use jst_entry::parse;
    use jst_rules::RuleTrie;
    use std::rc::Rc;

    fn trie() -> RuleTrie {
        let mut t = RuleTrie::new();
        t.add(Box::new(crate::declarations::VariableDeclarationRule));
        t.add(Box::new(ForOfInRule));
        t.add(Box::new(ForRule));
        t.add(Box::new(DoWhileRule));
        t.add(Box::new(SwitchRule));
        t.add(Box::new(ConditionRule));
        t.add(Box::new(WhileRule));
        t.add(Box::new(ReturnRule));
        t.add(Box::new(BreakContinueRule));
        t.add(Box::new(NewRule));
        t.add(Box::new(StatementBlockRule));
        t.add(Box::new(ExpressionRule));
        t.add(Box::new(IdentityCompareRule));
        t.add(Box::new(IncrementDecrementRule));
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
    fn if_with_identity_comparison() {
        assert_eq!(translate("if (a === b) { return a; }"), "if a is b:\n    return a\n");
    }

    #[test]
    fn else_if_collapses_to_elif() {
        let out = translate("if (a) { x; } else if (b) { y; } else { z; }");
        assert_eq!(out, "if a:\n    x\nelif b:\n    y\nelse:\n    z\n");
    }

    #[test]
    fn c_style_for_loop_desugars_to_while() {
        assert_eq!(
            translate("for (let i = 0; i < n; i++) { s += i; }"),
            "i = 0\nwhile i < n:\n    s += i\n    i += 1\n"
        );
    }

    #[test]
    fn for_of_loop() {
        assert_eq!(translate("for (const x of items) { y; }"), "for x in items:\n    y\n");
    }

    #[test]
    fn do_while_desugars_to_while_true_with_break() {
        assert_eq!(
            translate("do { x; } while (a);"),
            "while True:\n    x\n    if not (a): break\n"
        );
    }
}
