//! Keyword registry: maps reserved-word text to an [`EntryKind`], resolving
//! the rare word that means two different things depending on context
//! (a `functional` keyword, e.g. `catch`, which is a control-flow clause
//! only when immediately followed by `(` and otherwise just a name).

use rustc_hash::FxHashMap;

use crate::kind::EntryKind;

/// Every word ES6 reserves. Anything not in this list is an ordinary
/// identifier (`NameType`), keyword-registry lookup aside.
pub const JS_KEYWORDS: &[&str] = &[
    "abstract", "arguments", "as", "await", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "constructor", "debugger", "default", "delete", "do", "double",
    "else", "enum", "eval", "export", "extends", "false", "final", "finally", "float", "for",
    "from", "function", "goto", "if", "implements", "import", "in", "instanceof", "int",
    "interface", "let", "long", "native", "new", "null", "of", "package", "private", "protected",
    "public", "return", "short", "static", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "typeof", "undefined", "var", "void", "volatile",
    "while", "with", "yield",
];

#[derive(Debug, Clone, Copy)]
struct Registration {
    kind: EntryKind,
    /// If true, this word only resolves to `kind` when the next
    /// non-whitespace character after it is `(`; otherwise it resolves to
    /// the registered alternate (or `Modifier` if none was registered).
    functional: bool,
}

pub struct KeywordRegistry {
    primary: FxHashMap<&'static str, Registration>,
    alt: FxHashMap<&'static str, EntryKind>,
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordRegistry {
    pub fn new() -> Self {
        let mut reg = KeywordRegistry { primary: FxHashMap::default(), alt: FxHashMap::default() };

        reg.add("var", EntryKind::VariableType, false);
        reg.add("let", EntryKind::VariableType, false);
        reg.add("const", EntryKind::VariableType, false);
        reg.add("if", EntryKind::Condition, false);
        reg.add("else", EntryKind::Condition, false);
        reg.add("for", EntryKind::Keyword, false);
        reg.add("while", EntryKind::Keyword, false);
        reg.add("do", EntryKind::Keyword, false);
        reg.add("switch", EntryKind::Keyword, false);
        reg.add("case", EntryKind::Keyword, false);
        reg.add("default", EntryKind::Keyword, false);
        reg.add("break", EntryKind::Keyword, false);
        reg.add("continue", EntryKind::Keyword, false);
        reg.add("return", EntryKind::Keyword, false);
        reg.add("throw", EntryKind::Keyword, false);
        reg.add("try", EntryKind::Keyword, false);
        reg.add("finally", EntryKind::Keyword, false);
        reg.add("function", EntryKind::Method, false);
        reg.add("class", EntryKind::ClassDecl, false);
        reg.add("extends", EntryKind::Keyword, false);
        reg.add("constructor", EntryKind::Method, false);
        reg.add("import", EntryKind::ImportBlock, false);
        reg.add("from", EntryKind::Keyword, false);
        reg.add("export", EntryKind::Modifier, false);
        reg.add("new", EntryKind::Keyword, false);
        reg.add("typeof", EntryKind::Keyword, false);
        reg.add("instanceof", EntryKind::Operator, false);
        reg.add("delete", EntryKind::Keyword, false);
        reg.add("void", EntryKind::Keyword, false);
        reg.add("in", EntryKind::Operator, false);
        reg.add("of", EntryKind::Operator, false);
        reg.add("this", EntryKind::ThisType, false);
        reg.add("super", EntryKind::SuperType, false);
        reg.add("true", EntryKind::BooleanType, false);
        reg.add("false", EntryKind::BooleanType, false);
        reg.add("null", EntryKind::NameType, false);
        reg.add("undefined", EntryKind::NameType, false);
        reg.add("static", EntryKind::Modifier, false);
        reg.add("yield", EntryKind::Keyword, false);
        reg.add("await", EntryKind::Keyword, false);

        // `catch` is the one word this corpus keeps two classes for: a
        // control-flow clause (`try { } catch (e) { }`, always followed by
        // its binder parens) versus a plain method/property name
        // (`promise.catch(onReject)` -- reached through an `Attribute`
        // step, not through keyword lookup, but still registered here so a
        // bare, unparenthesized `catch` used as an identifier falls back
        // cleanly instead of becoming a stray `Keyword`).
        reg.add_functional("catch", EntryKind::Keyword, EntryKind::NameType);

        reg
    }

    fn add(&mut self, word: &'static str, kind: EntryKind, functional: bool) {
        self.primary.insert(word, Registration { kind, functional });
    }

    fn add_functional(&mut self, word: &'static str, kind: EntryKind, alt: EntryKind) {
        self.primary.insert(word, Registration { kind, functional: true });
        self.alt.insert(word, alt);
    }

    /// Resolves `word` to the `EntryKind` it should parse as, given the
    /// next non-whitespace character following it in source (used only to
    /// break a `functional` keyword's ambiguity).
    pub fn classify(&self, word: &str, next_non_space: Option<char>) -> EntryKind {
        if let Some(reg) = self.primary.get(word) {
            if reg.functional && next_non_space != Some('(') {
                return self.alt.get(word).copied().unwrap_or(EntryKind::Modifier);
            }
            return reg.kind;
        }
        if JS_KEYWORDS.contains(&word) {
            return EntryKind::Modifier;
        }
        EntryKind::NameType
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifier_is_name_type() {
        let reg = KeywordRegistry::new();
        assert_eq!(reg.classify("widgetCount", None), EntryKind::NameType);
    }

    #[test]
    fn unregistered_reserved_word_falls_back_to_modifier() {
        let reg = KeywordRegistry::new();
        assert_eq!(reg.classify("volatile", None), EntryKind::Modifier);
    }

    #[test]
    fn var_let_const_are_variable_type() {
        let reg = KeywordRegistry::new();
        assert_eq!(reg.classify("var", Some(' ')), EntryKind::VariableType);
        assert_eq!(reg.classify("let", Some(' ')), EntryKind::VariableType);
        assert_eq!(reg.classify("const", Some(' ')), EntryKind::VariableType);
    }

    #[test]
    fn catch_resolves_to_keyword_only_when_followed_by_paren() {
        let reg = KeywordRegistry::new();
        assert_eq!(reg.classify("catch", Some('(')), EntryKind::Keyword);
        assert_eq!(reg.classify("catch", Some(' ')), EntryKind::NameType);
        assert_eq!(reg.classify("catch", None), EntryKind::NameType);
    }
}
