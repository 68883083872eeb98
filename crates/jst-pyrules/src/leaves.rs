//! Rules for entries with no children of their own: identifiers, literals,
//! `this`/`super`, dot-chain steps, and the handful of kinds that simply
//! vanish from the output (comments, statement terminators).

use jst_rules::{Rule, RuleBuffer};

use crate::support::is_chain_base;

/// A bare identifier. `null`/`undefined` are parsed as `NameType` too (see
/// `jst-entry::keyword`) and need the one name substitution Python has no
/// other way to express.
pub struct NameRule;

impl Rule for NameRule {
    fn name(&self) -> &str {
        "name"
    }
    fn path(&self) -> &[&'static str] {
        &["NameType"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        let text = match buf.doc().get(id).text.as_str() {
            "null" | "undefined" => "None".to_string(),
            other => other.to_string(),
        };
        buf.add(&text);
        if is_chain_base(buf, id) {
            buf.add(".");
        }
        1
    }
}

/// Number and string literals pass through verbatim -- JS and Python share
/// numeric literal syntax for the common cases, and a JS string's quote
/// character is already valid Python string syntax.
pub struct NumberRule;

impl Rule for NumberRule {
    fn name(&self) -> &str {
        "number"
    }
    fn path(&self) -> &[&'static str] {
        &["NumberType"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        buf.add(&entry.text);
        1
    }
}

pub struct StringRule;

impl Rule for StringRule {
    fn name(&self) -> &str {
        "string"
    }
    fn path(&self) -> &[&'static str] {
        &["StringType"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        buf.add(&entry.text);
        1
    }
}

/// A template literal, reserved as out-of-scope for v1 interpolation (spec
/// §9 "Open questions"): re-quoted as a plain Python string, switching to
/// an f-string only when it actually contains a `${...}` placeholder, so
/// at minimum the braces read correctly once pasted into Python source.
pub struct TemplateLiteralRule;

impl Rule for TemplateLiteralRule {
    fn name(&self) -> &str {
        "template_literal"
    }
    fn path(&self) -> &[&'static str] {
        &["TemplateLiteral"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        let inner = entry.text.trim_start_matches('`').trim_end_matches('`');
        let has_interp = inner.contains("${");
        let body = inner.replace("${", "{").replace('}', "}").replace('"', "\\\"");
        if has_interp {
            buf.add(&format!("f\"{body}\""));
        } else {
            buf.add(&format!("\"{body}\""));
        }
        1
    }
}

/// `true`/`false` -> `True`/`False`.
pub struct BooleanRule;

impl Rule for BooleanRule {
    fn name(&self) -> &str {
        "boolean"
    }
    fn path(&self) -> &[&'static str] {
        &["BooleanType"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        buf.add(if entry.text == "true" { "True" } else { "False" });
        1
    }
}

/// `this` -> `self`.
pub struct ThisRule;

impl Rule for ThisRule {
    fn name(&self) -> &str {
        "this"
    }
    fn path(&self) -> &[&'static str] {
        &["ThisType"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        buf.add("self");
        if is_chain_base(buf, id) {
            buf.add(".");
        }
        1
    }
}

/// A bare `super` used as a value (`super.method()`) -> `super()`. A call
/// (`super(...)`) is handled separately by `SuperCallRule` in
/// `classes.rs`, registered at a longer, more specific path that the trie
/// tries first.
pub struct SuperRule;

impl Rule for SuperRule {
    fn name(&self) -> &str {
        "super"
    }
    fn path(&self) -> &[&'static str] {
        &["SuperType"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        buf.add("super()");
        if is_chain_base(buf, id) {
            buf.add(".");
        }
        1
    }
}

/// `.member` continuing a dot chain. The leading `.` was already emitted
/// by the chain's previous step (see `NameRule`/`ThisRule`/`SuperRule`/
/// this same rule, all of which emit a trailing `.` exactly when
/// `is_chain_base` says another `Attribute` follows); this rule only ever
/// contributes the bare member name plus its own trailing `.` if the
/// chain continues past it.
pub struct AttributeRule;

impl Rule for AttributeRule {
    fn name(&self) -> &str {
        "attribute"
    }
    fn path(&self) -> &[&'static str] {
        &["Attribute"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        let text = buf.doc().get(id).text.clone();
        buf.add(&text);
        if is_chain_base(buf, id) {
            buf.add(".");
        }
        1
    }
}

/// `//` and `/* */` comments are stripped from emitted output.
pub struct CommentRule;

impl Rule for CommentRule {
    fn name(&self) -> &str {
        "comment"
    }
    fn path(&self) -> &[&'static str] {
        &["Comment"]
    }
    fn apply(&self, _buf: &mut dyn RuleBuffer, _offset: isize) -> usize {
        1
    }
}

/// `;` (or a synthetic statement terminator) becomes a plain newline --
/// Python's statement separator is indentation, not punctuation.
pub struct EndRule;

impl Rule for EndRule {
    fn name(&self) -> &str {
        "end"
    }
    fn path(&self) -> &[&'static str] {
        &["End"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, _offset: isize) -> usize {
        buf.new_line(0);
        1
    }
}

/// `,` between siblings (a call's arguments, an array/object literal, a
/// multi-name declaration). `:` and `?` reach their own dedicated rules
/// (`ObjectTypeRule`, `TernaryExpressionRule`) before ever falling here.
pub struct SeparatorRule;

impl Rule for SeparatorRule {
    fn name(&self) -> &str {
        "separator"
    }
    fn path(&self) -> &[&'static str] {
        &["Separator"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        match entry.text.as_str() {
            "," => buf.add(", "),
            other => buf.add(other),
        }
        1
    }
}

/// A reserved word with no specialized kind (`Modifier`) falls back to its
/// own text verbatim -- e.g. `export`, which this ruleset otherwise drops
/// silently since Python modules export every top-level name implicitly.
pub struct ModifierRule;

impl Rule for ModifierRule {
    fn name(&self) -> &str {
        "modifier"
    }
    fn path(&self) -> &[&'static str] {
        &["Modifier"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(entry) = buf.current_entry(offset) else { return 0 };
        if entry.text != "export" {
            buf.add(&entry.text);
        }
        1
    }
}
