//! Recursive-descent parser producing a flat [`Document`] of entries.
//!
//! The grammar here is shallow on purpose: expressions are not built into a
//! precedence-climbed binary-operator tree, they're pushed as a flat run of
//! sibling entries (`NameType`, `Operator`, `NameType`, ...) at the same
//! nesting level, exactly as wide as the source's own parenthesisation.
//! Only two constructs change that shape after the fact -- the ternary
//! conditional and the arrow function -- and both use the same
//! forward-parent technique: parse the run first, then retroactively wrap
//! it in a container entry once the `?` or `=>` that demands the wrap is
//! seen. See [`Parser::lift_into`].

use jst_common::Span;
use jst_lexer::classify::{self, ASSIGN_OPS, COMPARISON_OPS};
use jst_lexer::Cursor;

use crate::entry::{Document, Entry, EntryId, NO_PARENT};
use crate::keyword::KeywordRegistry;
use crate::kind::EntryKind;

pub struct Parser<'src> {
    cursor: Cursor<'src>,
    keywords: KeywordRegistry,
    entries: Vec<Entry>,
}

/// Parses a full ES6 translation unit into a [`Document`].
pub fn parse(source: &str) -> Document {
    let mut p = Parser {
        cursor: Cursor::new(source),
        keywords: KeywordRegistry::new(),
        entries: Vec::new(),
    };
    p.entries.push(Entry {
        id: 0,
        kind: EntryKind::Root,
        span: Span::new(0, source.len() as u32),
        parent: NO_PARENT,
        inset: 0,
        extended: None,
        text: String::new(),
    });
    p.parse_block(0, None, true);
    Document { source: source.to_string(), entries: p.entries }
}

impl<'src> Parser<'src> {
    fn push(&mut self, parent: EntryId, kind: EntryKind, span: Span, text: String) -> EntryId {
        let inset = self.entries[parent as usize].inset + 1;
        let id = self.entries.len() as EntryId;
        self.entries.push(Entry { id, kind, span, parent, inset, extended: None, text });
        id
    }

    fn skip_trivia(&mut self, parent: EntryId) {
        loop {
            self.cursor.eat_while(|c| c.is_whitespace());
            match (self.cursor.peek(), self.cursor.peek_next()) {
                (Some('/'), Some('/')) => {
                    let start = self.cursor.pos();
                    self.cursor.eat_while(|c| c != '\n');
                    let span = Span::new(start, self.cursor.pos());
                    self.push(parent, EntryKind::Comment, span, self.cursor.slice(start, span.end).to_string());
                }
                (Some('/'), Some('*')) => {
                    let start = self.cursor.pos();
                    self.cursor.advance();
                    self.cursor.advance();
                    while !self.cursor.is_eof() {
                        if self.cursor.peek() == Some('*') && self.cursor.peek_next() == Some('/') {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        self.cursor.advance();
                    }
                    let span = Span::new(start, self.cursor.pos());
                    self.push(parent, EntryKind::Comment, span, self.cursor.slice(start, span.end).to_string());
                }
                _ => break,
            }
        }
    }

    /// The kind of a prior entry that makes the `/` which follows it mean
    /// division rather than the start of a regex literal, and that makes a
    /// following `.` mean a dot-chain step rather than something else.
    fn is_value_like(kind: EntryKind) -> bool {
        matches!(
            kind,
            EntryKind::NameType
                | EntryKind::NumberType
                | EntryKind::StringType
                | EntryKind::BooleanType
                | EntryKind::ThisType
                | EntryKind::SuperType
                | EntryKind::Attribute
                | EntryKind::Expression
                | EntryKind::ArrayType
                | EntryKind::ObjectType
                | EntryKind::Declaration
        )
    }

    fn last_sibling_kind(&self, parent: EntryId) -> Option<EntryKind> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.parent == parent)
            .map(|e| e.kind)
    }

    /// Parses entries until EOF (`close == None`) or the matching closer is
    /// consumed. `stmt_mode` selects `{` meaning a statement block instead
    /// of an object literal at this nesting level.
    fn parse_block(&mut self, parent: EntryId, close: Option<char>, mut stmt_mode: bool) {
        let mut run_start = self.entries.len();
        let mut expect_decl_name = false;
        let mut in_var_decl = false;
        loop {
            self.skip_trivia(parent);
            match self.cursor.peek() {
                None => break,
                Some(c) if Some(c) == close => {
                    self.cursor.advance();
                    break;
                }
                Some(c) if classify::is_closer(c) => break,
                Some(c) => {
                    let before = self.entries.len();
                    self.parse_one(parent, c, &mut stmt_mode, &mut expect_decl_name, run_start);
                    if self.entries.len() > before {
                        let kind = self.entries[before].kind;
                        if kind == EntryKind::VariableType {
                            in_var_decl = true;
                        }
                        if kind == EntryKind::End {
                            in_var_decl = false;
                            run_start = self.entries.len();
                        } else if kind == EntryKind::Separator && self.entries[before].text == "," {
                            run_start = self.entries.len();
                            if in_var_decl {
                                expect_decl_name = true;
                            }
                        }
                    }
                }
            }
        }
        if let Some(last) = self.entries.last_mut() {
            if last.parent == parent {
                last.span.end = self.cursor.pos();
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_one(
        &mut self,
        parent: EntryId,
        c: char,
        stmt_mode: &mut bool,
        expect_decl_name: &mut bool,
        run_start: usize,
    ) {
        if c.is_alphabetic() || c == '_' || c == '$' {
            self.parse_word(parent, expect_decl_name);
            return;
        }
        if c.is_ascii_digit() {
            self.parse_number(parent);
            return;
        }
        if c == '\'' || c == '"' || c == '`' {
            self.parse_string(parent, c);
            return;
        }
        if classify::is_opener(c) {
            self.parse_group(parent, c, *stmt_mode);
            return;
        }
        if c == '.' {
            if self.cursor.peek_next().map(|n| n.is_ascii_digit()).unwrap_or(false) {
                self.parse_number(parent);
            } else {
                self.parse_dot(parent);
            }
            return;
        }
        if c == ';' {
            let start = self.cursor.pos();
            self.cursor.advance();
            self.push(parent, EntryKind::End, Span::new(start, self.cursor.pos()), ";".into());
            return;
        }
        if classify::is_separator(c) {
            let start = self.cursor.pos();
            self.cursor.advance();
            self.push(parent, EntryKind::Separator, Span::new(start, self.cursor.pos()), c.to_string());
            return;
        }
        if c == '?' {
            self.parse_maybe_ternary(parent, run_start as EntryId);
            return;
        }
        if c == '/' {
            let prev = self.last_sibling_kind(parent);
            if prev.map(Self::is_value_like).unwrap_or(false) {
                self.parse_operator(parent, run_start);
            } else {
                self.parse_regex(parent);
            }
            return;
        }
        if classify::is_operator_char(c) {
            self.parse_operator(parent, run_start);
            return;
        }
        // Unrecognized character: consume one to guarantee progress and
        // record it as a comment-like passthrough token rather than
        // looping forever on malformed input.
        let start = self.cursor.pos();
        self.cursor.advance();
        self.push(parent, EntryKind::Modifier, Span::new(start, self.cursor.pos()), c.to_string());
    }

    /// True iff `parent` is the `StatementBlock` directly owned by a
    /// `ClassDecl` -- the context in which a bareword immediately followed
    /// by `(` names a method rather than a call to some outer function
    /// (spec §4.2 identifier dispatch).
    fn in_class_body(&self, parent: EntryId) -> bool {
        let p = &self.entries[parent as usize];
        if p.kind != EntryKind::StatementBlock || p.parent == NO_PARENT {
            return false;
        }
        self.entries[p.parent as usize].kind == EntryKind::ClassDecl
    }

    /// True iff the reserved word `word` begins at the cursor and is not
    /// itself a prefix of a longer identifier (`extends` must not match
    /// inside `extendsSomething`).
    fn peeks_word(&self, word: &str) -> bool {
        let src = self.cursor.source();
        let pos = self.cursor.pos() as usize;
        if pos + word.len() > src.len() || !src[pos..].starts_with(word) {
            return false;
        }
        match src[pos + word.len()..].chars().next() {
            Some(c) if c.is_alphanumeric() || c == '_' || c == '$' => false,
            _ => true,
        }
    }

    fn parse_word(&mut self, parent: EntryId, expect_decl_name: &mut bool) {
        let start = self.cursor.pos();
        self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
        let end = self.cursor.pos();
        let word = self.cursor.slice(start, end).to_string();
        let next = self.cursor.next_non_space(end);
        let kind = self.keywords.classify(&word, next);

        if kind == EntryKind::ClassDecl {
            let id = self.push(parent, EntryKind::ClassDecl, Span::new(start, end), word);
            self.parse_class_body(id);
            return;
        }

        if kind == EntryKind::ImportBlock {
            let id = self.push(parent, EntryKind::ImportBlock, Span::new(start, end), word);
            self.parse_import_clause(id);
            return;
        }

        // `for`'s parenthesized head is its own container, distinct from a
        // plain grouping or call-argument `Expression`: it is either a
        // `;`-separated init/condition/step triple (C-style) or a single
        // `in`/`of` binding, and a desugaring rule needs to tell which
        // without having to guess from an ordinary `Expression`'s shape.
        if kind == EntryKind::Keyword && word == "for" {
            self.push(parent, EntryKind::Keyword, Span::new(start, end), word);
            self.skip_trivia(parent);
            if self.cursor.peek() == Some('(') {
                self.cursor.advance();
                let head_start = self.cursor.pos();
                let fc_id = self.push(parent, EntryKind::ForCondition, Span::new(head_start, head_start), String::new());
                self.parse_block(fc_id, Some(')'), false);
                self.entries[fc_id as usize].span.end = self.cursor.pos();
            }
            return;
        }

        // `function` is a container in its own right: an optional name
        // child, a `Constructor` parameter-list child, and a
        // `StatementBlock` body child (the keyword entry doubles as the
        // function's own `name`, e.g. for anonymous function expressions).
        if kind == EntryKind::Method && word == "function" {
            let id = self.push(parent, EntryKind::Method, Span::new(start, end), word);
            self.skip_trivia(id);
            if matches!(self.cursor.peek(), Some(c) if c.is_alphabetic() || c == '_' || c == '$') {
                let nstart = self.cursor.pos();
                self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                let nend = self.cursor.pos();
                let text = self.cursor.slice(nstart, nend).to_string();
                self.push(id, EntryKind::Declaration, Span::new(nstart, nend), text);
            }
            self.parse_method_body(id);
            return;
        }

        // `constructor` (the reserved ES6 keyword form) and a class-body
        // bareword immediately followed by `(` both name a method: the
        // word itself becomes the `Method` container, no separate name
        // child (spec §4.2: "the word is being used as an identifier for
        // a function or class method -- rebind to Function or Method").
        let is_class_method_name = kind == EntryKind::NameType && next == Some('(') && self.in_class_body(parent);
        if kind == EntryKind::Method || is_class_method_name {
            let id = self.push(parent, EntryKind::Method, Span::new(start, end), word);
            self.parse_method_body(id);
            return;
        }

        let parent_is_ctor = self.entries[parent as usize].kind == EntryKind::Constructor;
        let resolved = if parent_is_ctor && kind == EntryKind::NameType {
            EntryKind::Declaration
        } else if *expect_decl_name && kind == EntryKind::NameType {
            *expect_decl_name = false;
            EntryKind::Declaration
        } else {
            kind
        };
        if kind == EntryKind::VariableType {
            *expect_decl_name = true;
        }
        self.push(parent, resolved, Span::new(start, end), word);
    }

    /// Parses an `import` statement's clause into children of `import_id`:
    /// a bare source-file string, a default binding, a braced named-import
    /// list with optional `as` aliases, and the trailing `from '...'`.
    fn parse_import_clause(&mut self, import_id: EntryId) {
        self.skip_trivia(import_id);
        if matches!(self.cursor.peek(), Some('\'') | Some('"')) {
            let q = self.cursor.peek().unwrap();
            self.parse_string(import_id, q);
        } else {
            if matches!(self.cursor.peek(), Some(c) if c.is_alphabetic() || c == '_' || c == '$') {
                let nstart = self.cursor.pos();
                self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                let nend = self.cursor.pos();
                let text = self.cursor.slice(nstart, nend).to_string();
                self.push(import_id, EntryKind::Declaration, Span::new(nstart, nend), text);
                self.skip_trivia(import_id);
                if self.cursor.peek() == Some(',') {
                    let sep_start = self.cursor.pos();
                    self.cursor.advance();
                    self.push(import_id, EntryKind::Separator, Span::new(sep_start, self.cursor.pos()), ",".into());
                    self.skip_trivia(import_id);
                }
            }

            if self.cursor.peek() == Some('{') {
                self.cursor.advance();
                loop {
                    self.skip_trivia(import_id);
                    match self.cursor.peek() {
                        Some('}') => {
                            self.cursor.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                    let nstart = self.cursor.pos();
                    self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                    let nend = self.cursor.pos();
                    let text = self.cursor.slice(nstart, nend).to_string();
                    self.push(import_id, EntryKind::Declaration, Span::new(nstart, nend), text);
                    self.skip_trivia(import_id);
                    if self.peeks_word("as") {
                        self.cursor.eat_while(|c| c.is_alphanumeric());
                        self.skip_trivia(import_id);
                        let astart = self.cursor.pos();
                        self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                        let aend = self.cursor.pos();
                        let atext = self.cursor.slice(astart, aend).to_string();
                        self.push(import_id, EntryKind::Attribute, Span::new(astart, aend), atext);
                        self.skip_trivia(import_id);
                    }
                    if self.cursor.peek() == Some(',') {
                        let sep_start = self.cursor.pos();
                        self.cursor.advance();
                        self.push(import_id, EntryKind::Separator, Span::new(sep_start, self.cursor.pos()), ",".into());
                    }
                }
            }

            self.skip_trivia(import_id);
            if self.peeks_word("from") {
                let kstart = self.cursor.pos();
                self.cursor.eat_while(|c| c.is_alphanumeric());
                self.push(import_id, EntryKind::Keyword, Span::new(kstart, self.cursor.pos()), "from".into());
                self.skip_trivia(import_id);
            }
            if matches!(self.cursor.peek(), Some('\'') | Some('"')) {
                let q = self.cursor.peek().unwrap();
                self.parse_string(import_id, q);
            }
        }

        self.skip_trivia(import_id);
        if self.cursor.peek() == Some(';') {
            let s = self.cursor.pos();
            self.cursor.advance();
            self.push(import_id, EntryKind::End, Span::new(s, self.cursor.pos()), ";".into());
        }
        self.entries[import_id as usize].span.end = self.cursor.pos();
    }

    /// Parses the `(params)` and `{ body }` that follow a `Method`
    /// container's own name (spec §4.2: `Method`/`Function` containers own
    /// a `Constructor` parameter list and a `StatementBlock` body).
    fn parse_method_body(&mut self, method_id: EntryId) {
        self.skip_trivia(method_id);
        if self.cursor.peek() == Some('(') {
            let start = self.cursor.pos();
            self.cursor.advance();
            let id = self.push(method_id, EntryKind::Constructor, Span::new(start, start), String::new());
            self.parse_block(id, Some(')'), false);
            self.entries[id as usize].span.end = self.cursor.pos();
        }
        self.skip_trivia(method_id);
        if self.cursor.peek() == Some('{') {
            let start = self.cursor.pos();
            self.cursor.advance();
            let id = self.push(method_id, EntryKind::StatementBlock, Span::new(start, start), String::new());
            self.parse_block(id, Some('}'), true);
            self.entries[id as usize].span.end = self.cursor.pos();
        }
        self.entries[method_id as usize].span.end = self.cursor.pos();
    }

    /// Parses a class's name, optional `extends` clause, and body into
    /// children of `class_id` (spec §4.3: `ClassDecl` is a container).
    fn parse_class_body(&mut self, class_id: EntryId) {
        self.skip_trivia(class_id);
        if matches!(self.cursor.peek(), Some(c) if c.is_alphabetic() || c == '_' || c == '$') {
            let nstart = self.cursor.pos();
            self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
            let nend = self.cursor.pos();
            let text = self.cursor.slice(nstart, nend).to_string();
            self.push(class_id, EntryKind::Declaration, Span::new(nstart, nend), text);
        }
        self.skip_trivia(class_id);
        if self.peeks_word("extends") {
            let kstart = self.cursor.pos();
            self.cursor.eat_while(|c| c.is_alphanumeric());
            self.push(class_id, EntryKind::Keyword, Span::new(kstart, self.cursor.pos()), "extends".into());
            self.skip_trivia(class_id);
            let bstart = self.cursor.pos();
            self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.');
            let bend = self.cursor.pos();
            let text = self.cursor.slice(bstart, bend).to_string();
            self.push(class_id, EntryKind::NameType, Span::new(bstart, bend), text);
        }
        self.skip_trivia(class_id);
        if self.cursor.peek() == Some('{') {
            let start = self.cursor.pos();
            self.cursor.advance();
            let id = self.push(class_id, EntryKind::StatementBlock, Span::new(start, start), String::new());
            self.parse_block(id, Some('}'), true);
            self.entries[id as usize].span.end = self.cursor.pos();
        }
        self.entries[class_id as usize].span.end = self.cursor.pos();
    }

    fn parse_number(&mut self, parent: EntryId) {
        let start = self.cursor.pos();
        if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_next(), Some('x') | Some('X')) {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
        } else if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_next(), Some('b') | Some('B')) {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c == '0' || c == '1');
        } else if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_next(), Some('o') | Some('O')) {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| ('0'..='7').contains(&c));
        } else {
            self.cursor.eat_while(|c| c.is_ascii_digit());
            if self.cursor.peek() == Some('.') {
                self.cursor.advance();
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
            if matches!(self.cursor.peek(), Some('e') | Some('E')) {
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end).to_string();
        self.push(parent, EntryKind::NumberType, Span::new(start, end), text);
    }

    fn parse_string(&mut self, parent: EntryId, quote: char) {
        let start = self.cursor.pos();
        self.cursor.advance();
        while let Some(c) = self.cursor.peek() {
            if c == '\\' {
                self.cursor.advance();
                self.cursor.advance();
                continue;
            }
            if c == quote {
                self.cursor.advance();
                break;
            }
            self.cursor.advance();
        }
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end).to_string();
        let kind = if quote == '`' { EntryKind::TemplateLiteral } else { EntryKind::StringType };
        self.push(parent, kind, Span::new(start, end), text);
    }

    fn parse_regex(&mut self, parent: EntryId) {
        let start = self.cursor.pos();
        self.cursor.advance();
        while let Some(c) = self.cursor.peek() {
            if c == '\\' {
                self.cursor.advance();
                self.cursor.advance();
                continue;
            }
            if c == '/' {
                self.cursor.advance();
                break;
            }
            if c == '\n' {
                break;
            }
            self.cursor.advance();
        }
        self.cursor.eat_while(|c| c.is_alphabetic());
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end).to_string();
        self.push(parent, EntryKind::StringType, Span::new(start, end), text);
    }

    fn parse_operator(&mut self, parent: EntryId, run_start: usize) {
        let start = self.cursor.pos() as usize;
        let src = self.cursor.source();
        if let Some(op) = classify::match_longest(src, start, &["=>"]) {
            for _ in 0..op.chars().count() {
                self.cursor.advance();
            }
            self.lift_arrow(parent, run_start as EntryId);
            return;
        }
        if let Some(op) = classify::match_longest(src, start, ASSIGN_OPS) {
            for _ in 0..op.chars().count() {
                self.cursor.advance();
            }
            let end = self.cursor.pos();
            self.push(parent, EntryKind::Assignment, Span::new(start as u32, end), op.to_string());
            return;
        }
        if let Some(op) = classify::match_longest(src, start, COMPARISON_OPS) {
            for _ in 0..op.chars().count() {
                self.cursor.advance();
            }
            let end = self.cursor.pos();
            self.push(parent, EntryKind::Operator, Span::new(start as u32, end), op.to_string());
            return;
        }
        // Generic multi-char operator runs (&&, ||, ++, --, **, etc.) --
        // greedily eat operator characters, longest run wins.
        let text_start = self.cursor.pos();
        self.cursor.eat_while(classify::is_operator_char);
        let end = self.cursor.pos();
        let text = self.cursor.slice(text_start, end).to_string();
        self.push(parent, EntryKind::Operator, Span::new(text_start, end), text);
    }

    fn parse_dot(&mut self, parent: EntryId) {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.cursor.eat_while(|c| c.is_whitespace());
        let name_start = self.cursor.pos();
        self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
        let end = self.cursor.pos();
        let text = self.cursor.slice(name_start, end).to_string();
        let base = self.entries.iter().rev().find(|e| e.parent == parent).map(|e| e.id);
        let id = self.push(parent, EntryKind::Attribute, Span::new(start, end), text);
        self.entries[id as usize].extended = base;
    }

    fn parse_group(&mut self, parent: EntryId, opener: char, stmt_mode: bool) {
        let start = self.cursor.pos();
        self.cursor.advance();
        let (kind, close) = match opener {
            '(' => (EntryKind::Expression, ')'),
            '[' => (EntryKind::ArrayType, ']'),
            '{' => {
                if stmt_mode_applies(&*self, parent, stmt_mode) {
                    (EntryKind::StatementBlock, '}')
                } else {
                    (EntryKind::ObjectType, '}')
                }
            }
            _ => unreachable!(),
        };
        let id = self.push(parent, kind, Span::new(start, start), String::new());
        let nested_stmt_mode = kind == EntryKind::StatementBlock;
        self.parse_block(id, Some(close), nested_stmt_mode);
        self.entries[id as usize].span.end = self.cursor.pos();

        fn stmt_mode_applies(p: &Parser<'_>, parent: EntryId, stmt_mode: bool) -> bool {
            if !stmt_mode {
                return false;
            }
            // `{` directly after an assignment/colon/arrow/return/comma in
            // expression position is an object literal even though the
            // enclosing block is statement-mode; only a `{` that opens a
            // fresh statement (or a class/function/control-flow body) is a
            // real block.
            match p.last_sibling_kind(parent) {
                Some(EntryKind::Assignment)
                | Some(EntryKind::Separator)
                | Some(EntryKind::Operator)
                | Some(EntryKind::TernaryExpression) => false,
                _ => true,
            }
        }
    }

    /// `=>` just finished. Retroactively wraps everything pushed since the
    /// current statement/expression run began into a `Lambda` entry, then
    /// parses the arrow body as the lambda's remaining children.
    fn lift_arrow(&mut self, _parent: EntryId, run_start: EntryId) {
        let lambda_id = self.lift_into(run_start, EntryKind::Lambda);
        self.skip_trivia(lambda_id);
        if self.cursor.peek() == Some('{') {
            // Block body: parse exactly one `{ ... }` group as the
            // lambda's body child, then return -- the statement boundary
            // after it (`;`, `,`, a closing paren) belongs to whoever
            // called us, not to the lambda.
            let mut stmt_mode = true;
            let mut expect_decl = false;
            self.parse_one(lambda_id, '{', &mut stmt_mode, &mut expect_decl, lambda_id as usize);
        } else {
            // Expression body: an implicit return, parsed inline as the
            // lambda's remaining children up to the statement boundary.
            self.parse_block_until_any(lambda_id, &[',', ';', ')', ']', '}']);
        }
    }

    /// `?` just seen. If it's actually `?.` or `??`, it's an operator, not
    /// a ternary. Otherwise wraps the condition parsed so far into a
    /// `TernaryExpression` and parses the `then`/`else` arms as its
    /// children.
    fn parse_maybe_ternary(&mut self, parent: EntryId, run_start: EntryId) {
        if self.cursor.peek_next() == Some('.') || self.cursor.peek_next() == Some('?') {
            self.parse_operator(parent, run_start as usize);
            return;
        }
        let start = self.cursor.pos();
        self.cursor.advance();
        let ternary_id = self.lift_into(run_start, EntryKind::TernaryExpression);
        self.push(ternary_id, EntryKind::Separator, Span::new(start, self.cursor.pos()), "?".into());
        self.parse_block_until_char(ternary_id, ':');
        self.skip_trivia(ternary_id);
        if self.cursor.peek() == Some(':') {
            let cs = self.cursor.pos();
            self.cursor.advance();
            self.push(ternary_id, EntryKind::Separator, Span::new(cs, self.cursor.pos()), ":".into());
        }
        self.parse_block_until_any(ternary_id, &[',', ';', ')', ']', '}']);
    }

    /// Parses children of `parent` until `stop` is seen at this nesting
    /// level (not consumed), or EOF.
    fn parse_block_until_char(&mut self, parent: EntryId, stop: char) {
        self.parse_block_until_any(parent, &[stop]);
    }

    fn parse_block_until_any(&mut self, parent: EntryId, stops: &[char]) {
        let mut stmt_mode = false;
        let mut expect_decl = false;
        let mut run_start = self.entries.len() as EntryId;
        loop {
            self.skip_trivia(parent);
            match self.cursor.peek() {
                None => break,
                Some(c) if stops.contains(&c) => break,
                Some(c) if classify::is_closer(c) => break,
                Some(c) => {
                    let before = self.entries.len();
                    self.parse_one(parent, c, &mut stmt_mode, &mut expect_decl, run_start as usize);
                    if self.entries.len() > before {
                        let kind = self.entries[before].kind;
                        if kind == EntryKind::Separator && self.entries[before].text == "," {
                            run_start = self.entries.len() as EntryId;
                        }
                    }
                }
            }
        }
    }

    /// Retroactively wraps the entries `[from, end)` -- everything pushed
    /// since `from` -- into a new container entry of kind `kind`, and
    /// re-parents `from`'s former direct siblings to the new wrapper. This
    /// is the flat-arena equivalent of a rowan-style `open_before` forward
    /// parent: instead of re-emitting events, we shift every stored index
    /// reference at or past the insertion point by one and splice the new
    /// entry in.
    fn lift_into(&mut self, from: EntryId, kind: EntryKind) -> EntryId {
        let from_idx = from as usize;
        let old_len = self.entries.len();
        let old_parent = self.entries[from_idx].parent;
        let base_inset = self.entries[from_idx].inset;
        let start_span = self.entries[from_idx].span;
        let end_span = self.entries[old_len - 1].span;

        let mut reparent = vec![false; old_len];
        for i in from_idx..old_len {
            reparent[i] = self.entries[i].parent == old_parent;
        }

        for e in self.entries.iter_mut() {
            if e.parent != NO_PARENT && e.parent as usize >= from_idx {
                e.parent += 1;
            }
            if let Some(x) = e.extended {
                if x as usize >= from_idx {
                    e.extended = Some(x + 1);
                }
            }
        }

        for i in from_idx..old_len {
            self.entries[i].inset += 1;
            if reparent[i] {
                self.entries[i].parent = from_idx as EntryId;
            }
        }

        let wrapper = Entry {
            id: from_idx as EntryId,
            kind,
            span: start_span.merge(end_span),
            parent: old_parent,
            inset: base_inset,
            extended: None,
            text: String::new(),
        };
        self.entries.insert(from_idx, wrapper);

        for (i, e) in self.entries.iter_mut().enumerate() {
            e.id = i as EntryId;
        }
        from_idx as EntryId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(EntryKind, String)> {
        parse(src)
            .entries
            .iter()
            .skip(1)
            .map(|e| (e.kind, e.text.clone()))
            .collect()
    }

    #[test]
    fn var_declaration_parses_kind_sequence() {
        let ks = kinds("var x = 1;");
        assert_eq!(
            ks,
            vec![
                (EntryKind::VariableType, "var".into()),
                (EntryKind::Declaration, "x".into()),
                (EntryKind::Assignment, "=".into()),
                (EntryKind::NumberType, "1".into()),
                (EntryKind::End, ";".into()),
            ]
        );
    }

    #[test]
    fn dot_chain_links_via_extended() {
        let doc = parse("a.b.c;");
        let b = &doc.entries[2];
        let c = &doc.entries[3];
        assert_eq!(b.kind, EntryKind::Attribute);
        assert_eq!(c.kind, EntryKind::Attribute);
        assert_eq!(b.extended, Some(1));
        assert_eq!(c.extended, Some(2));
        assert_eq!(doc.chain_root(3), 1);
    }

    #[test]
    fn division_vs_regex_disambiguation() {
        let doc = parse("a / b;");
        assert_eq!(doc.entries[2].kind, EntryKind::Operator);
        assert_eq!(doc.entries[2].text, "/");

        let doc2 = parse("x = /abc/;");
        let regex = doc2.entries.iter().find(|e| e.kind == EntryKind::StringType);
        assert!(regex.is_some());
    }

    #[test]
    fn ternary_lifts_condition_into_container() {
        let doc = parse("x ? a : b;");
        let ternary = doc.entries.iter().find(|e| e.kind == EntryKind::TernaryExpression).unwrap();
        let kids: Vec<EntryKind> = doc.children_of(ternary.id).map(|e| e.kind).collect();
        assert_eq!(
            kids,
            vec![
                EntryKind::NameType,
                EntryKind::Separator,
                EntryKind::NameType,
                EntryKind::Separator,
                EntryKind::NameType,
            ]
        );
    }

    #[test]
    fn arrow_function_lifts_params_into_lambda() {
        let doc = parse("(a) => a + 1;");
        let lambda = doc.entries.iter().find(|e| e.kind == EntryKind::Lambda).unwrap();
        let kids: Vec<EntryKind> = doc.children_of(lambda.id).map(|e| e.kind).collect();
        assert_eq!(kids[0], EntryKind::Expression);
        assert!(kids.contains(&EntryKind::NameType));
    }

    #[test]
    fn class_with_constructor_and_extends() {
        let ks = kinds("class Dog extends Animal { constructor(n) { super(n); } }");
        assert!(ks.iter().any(|(k, t)| *k == EntryKind::ClassDecl && t == "class"));
        assert!(ks.iter().any(|(k, _)| *k == EntryKind::Constructor));
        assert!(ks.iter().any(|(k, _)| *k == EntryKind::SuperType));
    }

    #[test]
    fn class_nests_name_extends_and_body_as_children() {
        let doc = parse("class Dog extends Animal { constructor(n) { super(n); } }");
        let class = doc.entries.iter().find(|e| e.kind == EntryKind::ClassDecl).unwrap();
        assert_eq!(class.text, "class");
        let kids: Vec<(EntryKind, String)> = doc.children_of(class.id).map(|e| (e.kind, e.text.clone())).collect();
        assert_eq!(
            kids,
            vec![
                (EntryKind::Declaration, "Dog".into()),
                (EntryKind::Keyword, "extends".into()),
                (EntryKind::NameType, "Animal".into()),
                (EntryKind::StatementBlock, String::new()),
            ]
        );

        let body = doc.entries.iter().find(|e| e.kind == EntryKind::StatementBlock && e.parent == class.id).unwrap();
        let method = doc.children_of(body.id).next().unwrap();
        assert_eq!(method.kind, EntryKind::Method);
        assert_eq!(method.text, "constructor");

        let ctor_kinds: Vec<EntryKind> = doc.children_of(method.id).map(|e| e.kind).collect();
        assert_eq!(ctor_kinds, vec![EntryKind::Constructor, EntryKind::StatementBlock]);

        let params = doc.entries.iter().find(|e| e.kind == EntryKind::Constructor).unwrap();
        let param_names: Vec<(EntryKind, String)> =
            doc.children_of(params.id).map(|e| (e.kind, e.text.clone())).collect();
        assert_eq!(param_names, vec![(EntryKind::Declaration, "n".into())]);
    }

    #[test]
    fn class_method_without_function_keyword_becomes_method_container() {
        let doc = parse("class Dog { bark() { return 1; } }");
        let method = doc.entries.iter().find(|e| e.kind == EntryKind::Method).unwrap();
        assert_eq!(method.text, "bark");
        let kids: Vec<EntryKind> = doc.children_of(method.id).map(|e| e.kind).collect();
        assert_eq!(kids, vec![EntryKind::Constructor, EntryKind::StatementBlock]);
    }

    #[test]
    fn function_declaration_nests_name_params_and_body() {
        let doc = parse("function add(a, b) { return a + b; }");
        let method = doc.entries.iter().find(|e| e.kind == EntryKind::Method).unwrap();
        assert_eq!(method.text, "function");
        let kids: Vec<EntryKind> = doc.children_of(method.id).map(|e| e.kind).collect();
        assert_eq!(kids, vec![EntryKind::Declaration, EntryKind::Constructor, EntryKind::StatementBlock]);
        let name = doc.children_of(method.id).next().unwrap();
        assert_eq!(name.text, "add");
    }

    #[test]
    fn named_import_nests_bindings_and_source_file() {
        let doc = parse("import { readFile as rf } from 'fs';");
        let block = doc.entries.iter().find(|e| e.kind == EntryKind::ImportBlock).unwrap();
        let kids: Vec<(EntryKind, String)> = doc.children_of(block.id).map(|e| (e.kind, e.text.clone())).collect();
        assert_eq!(
            kids,
            vec![
                (EntryKind::Declaration, "readFile".into()),
                (EntryKind::Attribute, "rf".into()),
                (EntryKind::Keyword, "from".into()),
                (EntryKind::StringType, "'fs'".into()),
                (EntryKind::End, ";".into()),
            ]
        );
    }

    #[test]
    fn object_literal_vs_block_disambiguation() {
        let doc = parse("var o = { a: 1 };");
        let obj = doc.entries.iter().find(|e| matches!(e.kind, EntryKind::ObjectType | EntryKind::StatementBlock));
        assert_eq!(obj.unwrap().kind, EntryKind::ObjectType);

        let doc2 = parse("if (x) { y(); }");
        let blk = doc2.entries.iter().find(|e| matches!(e.kind, EntryKind::ObjectType | EntryKind::StatementBlock));
        assert_eq!(blk.unwrap().kind, EntryKind::StatementBlock);
    }

    #[test]
    fn c_style_for_head_becomes_for_condition_container() {
        let doc = parse("for (let i = 0; i < n; i++) { s += i; }");
        let head = doc.entries.iter().find(|e| e.kind == EntryKind::ForCondition).unwrap();
        let kids: Vec<(EntryKind, String)> = doc.children_of(head.id).map(|e| (e.kind, e.text.clone())).collect();
        assert_eq!(
            kids,
            vec![
                (EntryKind::VariableType, "let".into()),
                (EntryKind::Declaration, "i".into()),
                (EntryKind::Assignment, "=".into()),
                (EntryKind::NumberType, "0".into()),
                (EntryKind::End, ";".into()),
                (EntryKind::NameType, "i".into()),
                (EntryKind::Operator, "<".into()),
                (EntryKind::NameType, "n".into()),
                (EntryKind::End, ";".into()),
                (EntryKind::NameType, "i".into()),
                (EntryKind::Operator, "++".into()),
            ]
        );
        let body = doc.entries.iter().find(|e| e.kind == EntryKind::StatementBlock).unwrap();
        assert_eq!(body.parent, head.parent);
    }

    #[test]
    fn for_of_head_has_no_semicolons() {
        let doc = parse("for (const x of items) { print(x); }");
        let head = doc.entries.iter().find(|e| e.kind == EntryKind::ForCondition).unwrap();
        let kids: Vec<(EntryKind, String)> = doc.children_of(head.id).map(|e| (e.kind, e.text.clone())).collect();
        assert_eq!(
            kids,
            vec![
                (EntryKind::VariableType, "const".into()),
                (EntryKind::Declaration, "x".into()),
                (EntryKind::Operator, "of".into()),
                (EntryKind::NameType, "items".into()),
            ]
        );
    }
}
