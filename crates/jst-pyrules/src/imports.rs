//! `import` statements -- default, named (`{ a, b as c }`), and bare
//! side-effect imports all land in one `ImportBlock` entry from the
//! parser; this collapses the original transpiler's three separate
//! rules (`ImportStm`/`ImportFromStm`/`ImportFrom`) into one, since the
//! flat child shape they each scan is the same run either way.

use jst_entry::EntryKind;
use jst_rules::{Rule, RuleBuffer};

use crate::support::child_list;

fn strip_quotes(text: &str) -> String {
    let t = text.trim();
    if t.len() >= 2 && (t.starts_with('\'') || t.starts_with('"')) {
        t[1..t.len() - 1].to_string()
    } else {
        t.to_string()
    }
}

/// Drops a `.js`/`.jsx` extension and rewrites a relative path's leading
/// `./`/`../` into Python's package-relative `.`/`..`, mirroring
/// `pyrules/components.py::_clean_import_package`. Any remaining `/` is
/// further flattened to `.`, since Python import paths are dotted, not
/// slashed.
fn clean_import_package(name: &str) -> String {
    let mut n = name.to_string();
    if let Some(stripped) = n.strip_suffix(".jsx") {
        n = stripped.to_string();
    } else if let Some(stripped) = n.strip_suffix(".js") {
        n = stripped.to_string();
    }
    if let Some(rest) = n.strip_prefix("../") {
        n = format!("..{rest}");
    } else if let Some(rest) = n.strip_prefix("./") {
        n = format!(".{rest}");
    }
    n.replace('/', ".")
}

pub struct ImportBlockRule;

impl Rule for ImportBlockRule {
    fn name(&self) -> &str {
        "import_block"
    }
    fn path(&self) -> &[&'static str] {
        &["ImportBlock"]
    }
    fn apply(&self, buf: &mut dyn RuleBuffer, offset: isize) -> usize {
        let Some(id) = buf.current(offset) else { return 0 };
        let children = child_list(buf, id);
        let has_from = children.iter().any(|c| c.1 == EntryKind::Keyword && c.2 == "from");
        let path_text = children.iter().rev().find(|c| c.1 == EntryKind::StringType).map(|c| strip_quotes(&c.2));
        let before = match children.iter().position(|c| c.1 == EntryKind::Keyword && c.2 == "from") {
            Some(idx) => &children[..idx],
            None => &children[..],
        };

        let mut parts = Vec::new();
        let mut i = 0;
        while i < before.len() {
            if before[i].1 == EntryKind::Declaration {
                let mut binding = before[i].2.clone();
                if i + 1 < before.len() && before[i + 1].1 == EntryKind::Attribute {
                    binding = format!("{binding} as {}", before[i + 1].2);
                    i += 1;
                }
                parts.push(binding);
            }
            i += 1;
        }
        let bindings = parts.join(", ");

        if has_from {
            buf.add("from ");
            buf.add(&clean_import_package(&path_text.unwrap_or_default()));
            buf.add(" import ");
            buf.add(&bindings);
        } else if let Some(path) = path_text {
            buf.add("import ");
            buf.add(&clean_import_package(&path));
        } else {
            buf.add("import ");
            buf.add(&bindings);
        }
        buf.mark_header_offset();
        buf.new_line(0);

        buf.doc().subtree_range(id).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaves::EndRule;
    use jst_emit::EmitBuffer;
    use jst_entry::parse;
    use jst_rules::RuleTrie;
    use std::rc::Rc;

    fn trie() -> RuleTrie {
        let mut t = RuleTrie::new();
        t.add(Box::new(ImportBlockRule));
        t.add(Box::new(EndRule));
        t
    }

    fn translate(src: &str) -> String {
        let doc = Rc::new(parse(src));
        let mut buf = EmitBuffer::new(doc, Rc::new(trie()));
        buf.run();
        buf.into_output()
    }

    #[test]
    fn default_import_from_relative_path() {
        assert_eq!(translate("import Foo from './foo.js';"), "from .foo import Foo\n");
    }

    #[test]
    fn named_import_with_alias() {
        assert_eq!(translate("import { a, b as c } from 'mod';"), "from mod import a, b as c\n");
    }

    #[test]
    fn bare_side_effect_import() {
        assert_eq!(translate("import './setup.js';"), "import .setup\n");
    }
}
