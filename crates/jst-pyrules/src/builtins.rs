//! A small whitelist of JS built-ins with a direct Python equivalent:
//! `Math.max`/`Math.min`/`Math.abs`/`Math.round` (grounded in the
//! original transpiler's `pyrules/maths.py::MathFunc`, which recognizes
//! exactly this set) and `console.log` -> `print`. Anything else hanging
//! off `Math`/`console`/`Array`/`Object` falls through to ordinary
//! dot-chain emission untouched.

use jst_rules::{Rule, RuleBuffer};

const MATH_FUNCS: &[&str] = &["max", "min", "abs", "round"];

/// `Math.max`/`Math.min`/`Math.abs`/`Math.round` -> the bare Python
/// builtin of the same name; the call's own argument list is left for
/// the generic `Expression` rule to emit right after.
pub struct MathFuncRule;

impl Rule for MathFuncRule {
    fn name(&self) -> &str {
        "math_func"
    }
    fn path(&self) -> &[&'static str] {
        &["NameType", "Attribute"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(base) = buf.current_entry(offset) else { return 0 };
        if base.text != "Math" {
            return 0;
        }
        let Some(member) = buf.current_entry(offset + 1) else { return 0 };
        if !MATH_FUNCS.contains(&member.text.as_str()) {
            return 0;
        }
        buf.add(&member.text);
        2
    }
}

/// `console.log` -> `print`.
pub struct ConsoleLogRule;

impl Rule for ConsoleLogRule {
    fn name(&self) -> &str {
        "console_log"
    }
    fn path(&self) -> &[&'static str] {
        &["NameType", "Attribute"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(base) = buf.current_entry(offset) else { return 0 };
        if base.text != "console" {
            return 0;
        }
        let Some(member) = buf.current_entry(offset + 1) else { return 0 };
        if member.text != "log" {
            return 0;
        }
        buf.add("print");
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::ExpressionRule;
    use crate::leaves::{AttributeRule, EndRule, NameRule, NumberRule, SeparatorRule};
    use jst_emit::EmitBuffer;
    use jst_entry::parse;
    use jst_rules::RuleTrie;
    use std::rc::Rc;

    fn trie() -> RuleTrie {
        let mut t = RuleTrie::new();
        t.add(Box::new(MathFuncRule));
        t.add(Box::new(ConsoleLogRule));
        t.add(Box::new(ExpressionRule));
        t.add(Box::new(NameRule));
        t.add(Box::new(AttributeRule));
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
    fn math_max_drops_the_namespace() {
        assert_eq!(translate("Math.max(a,b);"), "max(a, b)\n");
    }

    #[test]
    fn console_log_becomes_print() {
        assert_eq!(translate("console.log(a);"), "print(a)\n");
    }

    #[test]
    fn unrelated_member_access_is_untouched() {
        assert_eq!(translate("Math.PI;"), "Math.PI\n");
    }
}
