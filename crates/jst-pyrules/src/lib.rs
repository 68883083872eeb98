//! The default Python 3 rule set: registers every translation rule into a
//! single [`RuleTrie`] and exposes the file-extension conventions the
//! `jstc` driver uses to discover and name translation units.
//!
//! Rule registration order matters for the handful of `Keyword`-kind
//! rules that all share the bare `["Keyword"]` path (`while`, `return`,
//! `break`/`continue`, `new`, `throw`, `try`, `finally`) -- each declines
//! (returns 0) on a text mismatch and the trie falls through to the next
//! one registered at that node, in order. More specific multi-segment
//! paths (`IdentityCompareRule`, `VariableDeclarationRule`, `ForRule`,
//! `SwitchRule`, ...) don't need this care: the trie always tries a
//! deeper matched child node before falling back to a shallower node's
//! own rules, regardless of registration order.

mod builtins;
mod classes;
mod conditionals;
mod containers;
mod declarations;
mod errors;
mod functions;
mod imports;
mod leaves;
mod operators;
mod support;

use jst_rules::RuleTrie;

/// The extension a source file must carry to be picked up for translation.
pub const INPUT_FILE_EXTENSION: &str = "js";
/// The extension written for a translated file's output.
pub const OUTPUT_FILE_EXTENSION: &str = "py";
/// The extension used for a dumped, pre-translation entry-tree snapshot
/// (diagnostic output only, never fed back into translation).
pub const DOM_FILE_EXTENSION: &str = "dom";

/// Builds the default rule set described in spec §8's six end-to-end
/// scenarios and this crate's module-level docs.
pub fn build() -> RuleTrie {
    let mut t = RuleTrie::new();

    // Declarations and identity/value-comparison specificity pair first,
    // ahead of the generic leaf/operator rules they override.
    t.add(Box::new(declarations::VariableDeclarationRule));
    t.add(Box::new(operators::IdentityCompareRule));
    t.add(Box::new(operators::IncrementDecrementRule));

    // Built-in whitelist, ahead of the generic dot-chain rules it overrides.
    t.add(Box::new(builtins::MathFuncRule));
    t.add(Box::new(builtins::ConsoleLogRule));

    // Class machinery: `super(...)` call form ahead of the generic
    // `SuperType` value rule it overrides.
    t.add(Box::new(classes::SuperCallRule));
    t.add(Box::new(classes::ClassDeclRule));
    t.add(Box::new(functions::MethodRule));
    t.add(Box::new(functions::LambdaRule));

    // Error handling.
    t.add(Box::new(errors::CatchRule));
    t.add(Box::new(errors::CatchNoBinderRule));
    t.add(Box::new(errors::TryRule));
    t.add(Box::new(errors::FinallyRule));
    t.add(Box::new(errors::ThrowRule));

    // Control flow: longer, more specific loop-head paths before the
    // bare `["Keyword"]` fallbacks registered later.
    t.add(Box::new(conditionals::DoWhileRule));
    t.add(Box::new(conditionals::ForOfInRule));
    t.add(Box::new(conditionals::ForRule));
    t.add(Box::new(conditionals::SwitchRule));
    t.add(Box::new(conditionals::ConditionRule));

    // Bare `["Keyword"]` statements, tried in this order at the same path.
    t.add(Box::new(conditionals::WhileRule));
    t.add(Box::new(conditionals::ReturnRule));
    t.add(Box::new(conditionals::BreakContinueRule));
    t.add(Box::new(conditionals::NewRule));

    // Imports.
    t.add(Box::new(imports::ImportBlockRule));

    // Containers.
    t.add(Box::new(containers::StatementBlockRule));
    t.add(Box::new(containers::ExpressionRule));
    t.add(Box::new(containers::ArrayTypeRule));
    t.add(Box::new(containers::ObjectTypeRule));
    t.add(Box::new(operators::TernaryRule));

    // Generic operators and leaves last -- every more specific rule above
    // has already had first refusal.
    t.add(Box::new(operators::OperatorRule));
    t.add(Box::new(operators::AssignmentRule));
    t.add(Box::new(leaves::NameRule));
    t.add(Box::new(leaves::NumberRule));
    t.add(Box::new(leaves::StringRule));
    t.add(Box::new(leaves::TemplateLiteralRule));
    t.add(Box::new(leaves::BooleanRule));
    t.add(Box::new(leaves::ThisRule));
    t.add(Box::new(leaves::SuperRule));
    t.add(Box::new(leaves::AttributeRule));
    t.add(Box::new(leaves::CommentRule));
    t.add(Box::new(leaves::EndRule));
    t.add(Box::new(leaves::SeparatorRule));
    t.add(Box::new(leaves::ModifierRule));

    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use jst_emit::EmitBuffer;
    use jst_entry::parse;
    use std::rc::Rc;

    fn translate(src: &str) -> String {
        let doc = Rc::new(parse(src));
        let mut buf = EmitBuffer::new(doc, Rc::new(build()));
        buf.run();
        buf.into_output()
    }

    // spec.md §8's six end-to-end acceptance scenarios.

    #[test]
    fn scenario_1_variable_declaration() {
        assert_eq!(translate("var x = 1;"), "x = 1\n");
    }

    #[test]
    fn scenario_2_if_with_identity_comparison() {
        assert_eq!(translate("if (a === b) { return a; }"), "if a is b:\n    return a\n");
    }

    #[test]
    fn scenario_3_c_style_for_loop() {
        assert_eq!(
            translate("for (let i = 0; i < n; i++) { s += i; }"),
            "i = 0\nwhile i < n:\n    s += i\n    i += 1\n"
        );
    }

    #[test]
    fn scenario_4_class_extends_with_super_call() {
        let out = translate("class C extends B { constructor(x){ super(x); this.x = x; } }");
        assert_eq!(out, "class C(B):\n    def __init__(self, x):\n        super().__init__(x)\n        self.x = x\n");
    }

    #[test]
    fn scenario_5_math_whitelist() {
        assert_eq!(translate("Math.max(a,b);"), "max(a, b)\n");
    }

    #[test]
    fn scenario_6_switch_desugars_to_while_true() {
        let out = translate("switch(k){case 1: a=1; break; default: a=0;}");
        assert_eq!(
            out,
            "_switch_0 = k\nwhile True:\n    if _switch_0 == 1:\n        a = 1\n        break\n    else:\n        a = 0\n        break\n"
        );
    }
}
