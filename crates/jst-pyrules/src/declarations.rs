//! `var`/`let`/`const` declarations. Python has no declaration keyword, so
//! the keyword itself disappears and a bare `var x;` (no initializer)
//! becomes `x = None` since Python has no notion of an unbound name.
//!
//! Only the single-name form is handled here (`var x;`, `var x = 1;`) --
//! a comma-joined multi-name declaration (`var x, y;`) falls outside this
//! reference ruleset's scope (see DESIGN.md).

use jst_entry::EntryKind;
use jst_rules::{Rule, RuleBuffer};

pub struct VariableDeclarationRule;

impl Rule for VariableDeclarationRule {
    fn name(&self) -> &str {
        "variable_declaration"
    }
    fn path(&self) -> &[&'static str] {
        &["VariableType", "Declaration"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(decl) = buf.current_entry(offset + 1) else { return 0 };
        let name = decl.text.clone();
        buf.add(&name);
        let has_initializer = matches!(
            buf.current_entry(offset + 2).map(|e| e.kind),
            Some(EntryKind::Assignment)
        );
        if !has_initializer {
            buf.add(" = None");
        }
        2
    }
}
