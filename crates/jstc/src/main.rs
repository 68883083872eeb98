//! `jstc`: an interactive prompt loop over the translator core (spec §6).
//!
//! This binary is deliberately thin. Everything it calls into --
//! `format_code`, `convert`, `to_dom_string`, the no-edit check -- lives
//! in `jst-emit`, not here; `jstc` only owns the terminal interaction
//! (modeled on `mesh-repl`'s `rustyline`-based line reading) and the
//! file/directory bookkeeping around one `convert()` call per file.

mod config;
mod discovery;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use ariadne::{Color, Label, Report, ReportKind, Source};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use jst_emit::{convert, ConvertError, ConvertOutcome};
use jst_rules::RuleTrie;

use config::Config;
use discovery::discover_files;

const CONFIG_FILE: &str = "jstconvert.toml";

fn main() -> ExitCode {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("error: could not start input prompt: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = load_config();

    loop {
        let Some(input) = read_line(&mut rl, "Input path: ") else { break };
        let input = input.trim();
        if input.is_empty() {
            eprintln!("error: an input path is required");
            if !prompt_continue(&mut rl) {
                break;
            }
            continue;
        }
        let input_path = PathBuf::from(input);

        let output = read_line(&mut rl, "Output path (blank = alongside input): ");
        let output_path = output.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).map(PathBuf::from);

        let rule_module = read_line(&mut rl, "Rule module (blank = default py ruleset): ");
        let rule_module = rule_module.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let rule_module = rule_module.or_else(|| config.as_ref().and_then(|c| c.rule_set.clone()));

        let dump_dom = prompt_yes_no(&mut rl, "Dump DOM? (y/N): ", config.as_ref().map(|c| c.dump_dom).unwrap_or(false));

        match resolve_ruleset(rule_module.as_deref()) {
            Ok(ruleset) => run(&input_path, output_path.as_deref(), &ruleset, dump_dom),
            Err(msg) => eprintln!("error: {msg}"),
        }

        if !prompt_continue(&mut rl) {
            break;
        }
    }

    ExitCode::SUCCESS
}

fn load_config() -> Option<Config> {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        return None;
    }
    match Config::from_file(path) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!("warning: ignoring {CONFIG_FILE}: {e}");
            None
        }
    }
}

fn resolve_ruleset(name: Option<&str>) -> Result<Rc<RuleTrie>, String> {
    match name.map(str::to_lowercase).as_deref() {
        None | Some("") | Some("py") | Some("python") | Some("default") => Ok(Rc::new(jst_pyrules::build())),
        Some(other) => Err(format!("unknown rule module '{other}' -- only the built-in 'py' rule set ships with this binary")),
    }
}

/// Translates `input` (a file or a directory) against `ruleset`, writing
/// each result next to its source unless `output` redirects it, and
/// reports outcomes and failures per spec §7's propagation policy: one
/// file's rule failure aborts that file's output, not the whole run.
fn run(input: &Path, output: Option<&Path>, ruleset: &Rc<RuleTrie>, dump_dom: bool) {
    if input.is_dir() {
        let files = match discover_files(input, jst_pyrules::INPUT_FILE_EXTENSION) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("error: could not walk '{}': {e}", input.display());
                return;
            }
        };
        if files.is_empty() {
            eprintln!("no .{} files found under '{}'", jst_pyrules::INPUT_FILE_EXTENSION, input.display());
        }
        for relative in files {
            let src_path = input.join(&relative);
            let out_root = output.unwrap_or(input);
            let dst_path = out_root.join(&relative).with_extension(jst_pyrules::OUTPUT_FILE_EXTENSION);
            convert_one(&src_path, &dst_path, ruleset, dump_dom);
        }
    } else {
        let dst_path = match output {
            Some(p) => p.to_path_buf(),
            None => input.with_extension(jst_pyrules::OUTPUT_FILE_EXTENSION),
        };
        convert_one(input, &dst_path, ruleset, dump_dom);
    }
}

fn convert_one(input: &Path, output: &Path, ruleset: &Rc<RuleTrie>, dump_dom: bool) {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                report_error(&input.display().to_string(), &ConvertError::Io(e.to_string()));
                return;
            }
        }
    }
    let dom_path = dump_dom.then(|| output.with_extension(jst_pyrules::DOM_FILE_EXTENSION));

    match convert(input, output, ruleset, dom_path.as_deref()) {
        Ok(ConvertOutcome::Written { output_path }) => println!("{} -> {output_path}", input.display()),
        Ok(ConvertOutcome::Skipped { reason: ConvertError::NoEdit }) => {
            println!("{}: skipped (no-edit marker)", input.display())
        }
        Ok(ConvertOutcome::Skipped { reason }) => report_error(&input.display().to_string(), &reason),
        Err(e) => report_error(&input.display().to_string(), &e),
    }
}

fn report_error(file_label: &str, err: &ConvertError) {
    let message = err.to_string();
    let banner = format!("{file_label}: {message}");
    let len = banner.len().max(1);
    let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, 0..len)
        .with_message(&message)
        .with_label(Label::new(0..len).with_message(file_label).with_color(Color::Red))
        .finish()
        .eprint(Source::from(banner));
}

fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Option<String> {
    match rl.readline(prompt) {
        Ok(line) => Some(line),
        Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => None,
        Err(_) => None,
    }
}

fn prompt_yes_no(rl: &mut DefaultEditor, prompt: &str, default_if_blank: bool) -> bool {
    match read_line(rl, prompt) {
        Some(line) => {
            let t = line.trim();
            if t.is_empty() {
                default_if_blank
            } else {
                matches!(t.to_lowercase().as_str(), "y" | "yes")
            }
        }
        None => false,
    }
}

fn prompt_continue(rl: &mut DefaultEditor) -> bool {
    prompt_yes_no(rl, "Continue? (Y/N): ", true)
}
