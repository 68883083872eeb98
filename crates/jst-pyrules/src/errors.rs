//! `try`/`catch`/`finally` and `throw`. Grounded in the original
//! transpiler's `CatchStm`/`CatchExceptStm`/`ThrowCmd` rules, which this
//! mirrors almost verbatim: JS's exception handling shape already lines
//! up with Python's, so these rules mostly just relabel keywords.

use jst_entry::EntryKind;
use jst_rules::{Rule, RuleBuffer};

use crate::support::{child_list, subtree_end};

/// `try { ... }`.
pub struct TryRule;

impl Rule for TryRule {
    fn name(&self) -> &str {
        "try"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword", "StatementBlock"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(kw) = buf.current_entry(offset) else { return 0 };
        if kw.text != "try" {
            return 0;
        }
        let Some(body_id) = buf.current(offset + 1) else { return 0 };
        buf.add("try:");
        buf.new_line(1);
        let consumed = buf.append_children(body_id);
        if consumed == 0 {
            buf.add("pass");
        }
        buf.trim();
        buf.new_line(-1);
        2 + consumed
    }
}

/// `finally { ... }`.
pub struct FinallyRule;

impl Rule for FinallyRule {
    fn name(&self) -> &str {
        "finally"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword", "StatementBlock"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(kw) = buf.current_entry(offset) else { return 0 };
        if kw.text != "finally" {
            return 0;
        }
        let Some(body_id) = buf.current(offset + 1) else { return 0 };
        buf.add("finally:");
        buf.new_line(1);
        let consumed = buf.append_children(body_id);
        if consumed == 0 {
            buf.add("pass");
        }
        buf.trim();
        buf.new_line(-1);
        2 + consumed
    }
}

/// `catch { ... }` with no bound variable (the ES2019 optional-binding
/// form) -> a bare `except Exception:`.
pub struct CatchNoBinderRule;

impl Rule for CatchNoBinderRule {
    fn name(&self) -> &str {
        "catch_no_binder"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword", "StatementBlock"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(kw) = buf.current_entry(offset) else { return 0 };
        if kw.text != "catch" {
            return 0;
        }
        let Some(body_id) = buf.current(offset + 1) else { return 0 };
        buf.add("except Exception:");
        buf.new_line(1);
        let consumed = buf.append_children(body_id);
        if consumed == 0 {
            buf.add("pass");
        }
        buf.trim();
        buf.new_line(-1);
        2 + consumed
    }
}

/// `catch (e) { ... }` -> `except Exception as e:`.
pub struct CatchRule;

impl Rule for CatchRule {
    fn name(&self) -> &str {
        "catch"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword", "Expression", "StatementBlock"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(kw_id) = buf.current(offset) else { return 0 };
        let kw = buf.doc().get(kw_id).text.clone();
        if kw != "catch" {
            return 0;
        }
        let Some(binder_id) = buf.current(offset + 1) else { return 0 };
        let Some(body_id) = buf.current(offset + 2) else { return 0 };
        let binder_name =
            child_list(buf, binder_id).into_iter().find(|c| c.1 == EntryKind::NameType).map(|c| c.2);

        buf.add("except Exception");
        if let Some(name) = &binder_name {
            buf.add(" as ");
            buf.add(name);
        }
        buf.add(":");
        buf.new_line(1);
        let consumed_body = buf.append_children(body_id);
        if consumed_body == 0 {
            buf.add("pass");
        }
        buf.trim();
        buf.new_line(-1);
        (subtree_end(buf, body_id) - kw_id) as usize
    }
}

/// `throw expr;` -> `raise expr`.
pub struct ThrowRule;

impl Rule for ThrowRule {
    fn name(&self) -> &str {
        "throw"
    }
    fn path(&self) -> &[&'static str] {
        &["Keyword"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        if entry.text != "throw" {
            return 0;
        }
        buf.add("raise ");
        1
    }
}
