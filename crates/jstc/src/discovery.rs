//! Recursive discovery of source files under a directory input path.
//!
//! `convert`'s file/directory entry point (spec §6) accepts either a
//! single file or a directory; when it's a directory, every file carrying
//! the rule set's `INPUT_FILE_EXTENSION` underneath it is a translation
//! unit.

use std::path::{Path, PathBuf};

/// Recursively discover files with the given extension under `root`.
/// Returns paths relative to `root`, sorted for determinism. Hidden
/// directories and files (names starting with `.`) are skipped.
pub fn discover_files(root: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    discover_recursive(root, root, extension, &mut files)?;
    files.sort();
    Ok(files)
}

fn discover_recursive(root: &Path, dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        let name_str = entry.file_name().to_string_lossy().into_owned();

        if name_str.starts_with('.') {
            continue;
        }

        if entry_path.is_dir() {
            discover_recursive(root, &entry_path, extension, files)?;
        } else if entry_path.extension().and_then(|e| e.to_str()) == Some(extension) {
            let relative = entry_path.strip_prefix(root).unwrap_or(&entry_path).to_path_buf();
            files.push(relative);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_extension_matches_and_skips_hidden() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();

        fs::write(root.join("main.js"), "").unwrap();
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::write(root.join("lib/helper.js"), "").unwrap();
        fs::write(root.join("readme.md"), "").unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.js"), "").unwrap();

        let files = discover_files(root, "js").unwrap();
        let strs: Vec<&str> = files.iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(strs, vec!["lib/helper.js", "main.js"]);
    }
}
