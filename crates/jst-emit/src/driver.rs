//! The Translator API (spec §6): the three entry points a driver (a CLI,
//! an editor plugin, a build script) calls into -- `to_dom_string`,
//! `format_code`, and `convert` -- plus the no-edit marker check they all
//! share. None of this is CLI; `jstc` is a thin prompt loop on top of it.

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::rc::Rc;

use jst_entry::{parse, Document, EntryKind};
use jst_rules::RuleTrie;

use crate::buffer::EmitBuffer;

/// The error taxonomy from spec §7, minus parse errors (the parser
/// swallows those itself and just hands back a truncated tree).
#[derive(Debug)]
pub enum ConvertError {
    /// A rule panicked while applying. Carries whatever message the panic
    /// payload yielded; the dispatcher has no way to recover the specific
    /// rule name or entry id once unwinding has already happened, so the
    /// message is the panic payload alone.
    RuleProcessing(String),
    /// The source's first entry is a `// no-edit` (or equivalent) comment;
    /// this is a cooperative refusal to overwrite, not a failure.
    NoEdit,
    /// Reading or writing a file failed. Outside the core per spec; kept
    /// here only because `convert` is the one entry point that touches
    /// the filesystem.
    Io(String),
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::RuleProcessing(msg) => write!(f, "rule processing failed: {msg}"),
            ConvertError::NoEdit => write!(f, "no-edit marker present, conversion skipped"),
            ConvertError::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}

/// True if `doc`'s first entry is a comment whose trimmed body is exactly
/// `no-edit` (spec §6's "No-edit marker").
pub fn has_no_edit_marker(doc: &Document) -> bool {
    let Some(first) = doc.entries.get(1) else { return false };
    if first.kind != EntryKind::Comment {
        return false;
    }
    strip_comment_markers(&first.text).trim() == "no-edit"
}

fn strip_comment_markers(text: &str) -> String {
    let t = text.trim();
    if let Some(rest) = t.strip_prefix("//") {
        rest.to_string()
    } else if let Some(rest) = t.strip_prefix("/*") {
        rest.strip_suffix("*/").unwrap_or(rest).to_string()
    } else {
        t.to_string()
    }
}

/// A human-readable dump of the parsed entry list, for debugging a rule
/// set against a tricky input. Never fed back into translation.
pub fn to_dom_string(src: &str) -> String {
    let doc = parse(src);
    let mut out = String::new();
    for entry in doc.entries.iter().skip(1) {
        let indent = "  ".repeat(entry.inset as usize);
        if entry.text.is_empty() {
            out.push_str(&format!("{indent}{:?}\n", entry.kind));
        } else {
            out.push_str(&format!("{indent}{:?} {:?}\n", entry.kind, entry.text));
        }
    }
    out
}

/// Translates one source string against `ruleset`, honoring the no-edit
/// marker. A rule panicking while applying is caught and reported as
/// [`ConvertError::RuleProcessing`] rather than unwinding into the caller.
pub fn format_code(src: &str, ruleset: &Rc<RuleTrie>) -> Result<String, ConvertError> {
    let doc = Rc::new(parse(src));
    if has_no_edit_marker(&doc) {
        return Err(ConvertError::NoEdit);
    }
    let trie = Rc::clone(ruleset);
    catch_unwind(AssertUnwindSafe(move || {
        let mut buf = EmitBuffer::new(doc, trie);
        buf.run();
        buf.into_output()
    }))
    .map_err(|payload| ConvertError::RuleProcessing(panic_message(payload)))
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked with a non-string payload".to_string()
    }
}

/// The outcome of [`convert`] for one file, reported back to a driver so
/// it can log without treating a no-edit skip as a failure.
pub enum ConvertOutcome {
    Written { output_path: String },
    Skipped { reason: ConvertError },
}

/// File entry point: reads `input`, translates it against `ruleset`, and
/// writes the result to `output` (unless the no-edit marker applies). If
/// `dump_dom` is set, a sibling `.dom` file (per `DOM_FILE_EXTENSION`
/// conventions -- the caller picks the actual path) is written alongside
/// it with [`to_dom_string`]'s output.
pub fn convert(
    input: &Path,
    output: &Path,
    ruleset: &Rc<RuleTrie>,
    dom_output: Option<&Path>,
) -> Result<ConvertOutcome, ConvertError> {
    let src = fs::read_to_string(input).map_err(|e| ConvertError::Io(format!("reading {}: {e}", input.display())))?;

    if let Some(dom_path) = dom_output {
        fs::write(dom_path, to_dom_string(&src))
            .map_err(|e| ConvertError::Io(format!("writing {}: {e}", dom_path.display())))?;
    }

    match format_code(&src, ruleset) {
        Ok(out) => {
            fs::write(output, out).map_err(|e| ConvertError::Io(format!("writing {}: {e}", output.display())))?;
            Ok(ConvertOutcome::Written { output_path: output.display().to_string() })
        }
        Err(ConvertError::NoEdit) => Ok(ConvertOutcome::Skipped { reason: ConvertError::NoEdit }),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jst_rules::Rule;

    struct PassthroughRule;
    impl Rule for PassthroughRule {
        fn name(&self) -> &str {
            "passthrough"
        }
        fn path(&self) -> &[&'static str] {
            &["Keyword"]
        }
        fn apply(&self, buf: &mut dyn jst_rules::RuleBuffer, offset: isize) -> usize {
            let Some(entry) = buf.current_entry(offset) else { return 0 };
            buf.add(&entry.text);
            1
        }
    }

    struct PanicRule;
    impl Rule for PanicRule {
        fn name(&self) -> &str {
            "panics"
        }
        fn path(&self) -> &[&'static str] {
            &["Keyword"]
        }
        fn apply(&self, _buf: &mut dyn jst_rules::RuleBuffer, _offset: isize) -> usize {
            panic!("boom");
        }
    }

    #[test]
    fn to_dom_string_lists_entry_kinds() {
        let dump = to_dom_string("var x;");
        assert!(dump.contains("Declaration"));
    }

    #[test]
    fn no_edit_marker_skips_conversion() {
        let mut t = RuleTrie::new();
        t.add(Box::new(PassthroughRule));
        let ruleset = Rc::new(t);
        let result = format_code("// no-edit\nvar x;", &ruleset);
        assert!(matches!(result, Err(ConvertError::NoEdit)));
    }

    #[test]
    fn ordinary_comment_does_not_trip_the_marker() {
        let doc = parse("// just a note\nvar x;");
        assert!(!has_no_edit_marker(&doc));
    }

    #[test]
    fn a_panicking_rule_is_reported_as_rule_processing_error() {
        let mut t = RuleTrie::new();
        t.add(Box::new(PanicRule));
        let ruleset = Rc::new(t);
        let result = format_code("while (true) {}", &ruleset);
        assert!(matches!(result, Err(ConvertError::RuleProcessing(_))));
    }
}
