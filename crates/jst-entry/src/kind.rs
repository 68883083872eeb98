//! The closed set of entry kinds. A flat tagged-variant enum rather than a
//! class hierarchy: every rule path pattern names one of these.

/// Kind tag for one code entry. Mirrors the component taxonomy of the
/// original DOM model, collapsed from a class hierarchy into a sum type per
/// the "tagged variants over inheritance" design choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Synthetic root of a translation unit; never matched by rules.
    Root,
    /// `{ ... }` used as a statement (block), not an object literal.
    StatementBlock,
    /// `{ ... }` used as an object literal expression.
    ObjectType,
    /// `[ ... ]` array literal.
    ArrayType,
    /// `( ... )` parenthesized or call-argument expression group.
    Expression,
    /// `cond ? a : b`.
    TernaryExpression,
    /// `'...'`, `"..."`, or `` `...` `` (template literals parse as this
    /// too; interpolation segments are out of scope for v1, see
    /// `TemplateLiteral` below).
    StringType,
    NumberType,
    BooleanType,
    /// An identifier that is not a reserved word.
    NameType,
    /// `this`.
    ThisType,
    /// `super`.
    SuperType,
    /// `.member` following an extendable entry (dot-chain link).
    Attribute,
    /// `,` `;` `:` between sibling entries.
    Separator,
    /// A binary/unary operator token (`+`, `&&`, `===`, ...).
    Operator,
    /// `=` or a compound assignment (`+=`, ...).
    Assignment,
    /// `var` / `let` / `const` declaration keyword.
    VariableType,
    /// One bound name in a (possibly multi-name) declaration.
    Declaration,
    /// `import ... from '...'` or `import '...'`.
    ImportBlock,
    /// `class Name [extends Base] { ... }`.
    ClassDecl,
    /// `constructor(...) { ... }` inside a class body.
    Constructor,
    /// A named method or function (`function f() {}`, `f() {}` in a class).
    Method,
    /// The `init; cond; step` header of a C-style `for`.
    ForCondition,
    /// An arrow function's parameter list plus `=>`.
    Lambda,
    /// `if` / `else if` / `else`.
    Condition,
    /// `for`, `while`, `do`, `switch`, `try` and other control keywords not
    /// covered by a more specific kind.
    Keyword,
    /// A reserved word with no specialized kind (default fallback).
    Modifier,
    /// `;` or a synthetic statement terminator.
    End,
    /// `//` or `/* */` comment text, stripped from emitted output.
    Comment,
    /// Reserved for v1 template-literal interpolation; currently parsed as
    /// a plain `StringType` (see SPEC_FULL.md "Supplemented features").
    TemplateLiteral,
}

impl EntryKind {
    /// Name used as a path segment when building/matching the rule trie.
    /// Stable across releases: third-party rule sets key off these names.
    pub fn trie_name(self) -> &'static str {
        match self {
            EntryKind::Root => "Root",
            EntryKind::StatementBlock => "StatementBlock",
            EntryKind::ObjectType => "ObjectType",
            EntryKind::ArrayType => "ArrayType",
            EntryKind::Expression => "Expression",
            EntryKind::TernaryExpression => "TernaryExpression",
            EntryKind::StringType => "StringType",
            EntryKind::NumberType => "NumberType",
            EntryKind::BooleanType => "BooleanType",
            EntryKind::NameType => "NameType",
            EntryKind::ThisType => "ThisType",
            EntryKind::SuperType => "SuperType",
            EntryKind::Attribute => "Attribute",
            EntryKind::Separator => "Separator",
            EntryKind::Operator => "Operator",
            EntryKind::Assignment => "Assignment",
            EntryKind::VariableType => "VariableType",
            EntryKind::Declaration => "Declaration",
            EntryKind::ImportBlock => "ImportBlock",
            EntryKind::ClassDecl => "ClassDecl",
            EntryKind::Constructor => "Constructor",
            EntryKind::Method => "Method",
            EntryKind::ForCondition => "ForCondition",
            EntryKind::Lambda => "Lambda",
            EntryKind::Condition => "Condition",
            EntryKind::Keyword => "Keyword",
            EntryKind::Modifier => "Modifier",
            EntryKind::End => "End",
            EntryKind::Comment => "Comment",
            EntryKind::TemplateLiteral => "TemplateLiteral",
        }
    }

    /// Whether this kind opens a nested scope of child entries.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            EntryKind::Root
                | EntryKind::StatementBlock
                | EntryKind::ObjectType
                | EntryKind::ArrayType
                | EntryKind::Expression
                | EntryKind::TernaryExpression
                | EntryKind::ImportBlock
                | EntryKind::ClassDecl
                | EntryKind::Constructor
                | EntryKind::Method
                | EntryKind::ForCondition
                | EntryKind::Lambda
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trie_names_are_stable_identifiers() {
        assert_eq!(EntryKind::ClassDecl.trie_name(), "ClassDecl");
        assert_eq!(EntryKind::Lambda.trie_name(), "Lambda");
    }

    #[test]
    fn containers_vs_leaves() {
        assert!(EntryKind::StatementBlock.is_container());
        assert!(!EntryKind::NameType.is_container());
    }
}
