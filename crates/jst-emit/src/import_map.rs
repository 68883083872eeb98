//! Tracks names the source has already imported, to let rules avoid
//! re-declaring an imported binding and to resolve which source file a
//! dotted name came from.

use rustc_hash::{FxHashMap, FxHashSet};

use jst_entry::{Document, EntryId, EntryKind};

#[derive(Debug, Default)]
pub struct ImportMap {
    names: FxHashSet<String>,
    by_file: FxHashMap<String, FxHashMap<String, String>>,
    /// Literal Python import lines already inserted via
    /// [`crate::buffer::EmitBuffer::insert_import_statement`], so a second
    /// polyfill rule asking for the same runtime import is a no-op.
    inserted: FxHashSet<String>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_imported(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn imported_as(&self, name: &str, file: &str) -> Option<&str> {
        self.by_file.get(file)?.get(name).map(String::as_str)
    }

    pub fn already_inserted(&self, code: &str) -> bool {
        self.inserted.contains(code)
    }

    pub fn mark_inserted(&mut self, code: &str) {
        self.inserted.insert(code.to_string());
    }

    /// Scans one `ImportBlock` subtree (`import a, { b as c } from 'file'`)
    /// and registers every bound name it introduces.
    pub fn register_import_block(&mut self, doc: &Document, block: EntryId) {
        let mut file = None;
        let mut bound = Vec::new();

        for child in doc.children_of(block) {
            match child.kind {
                EntryKind::StringType => file = Some(child.text.trim_matches(|c| c == '\'' || c == '"').to_string()),
                EntryKind::Attribute | EntryKind::NameType | EntryKind::Declaration => {
                    bound.push(child.text.clone())
                }
                _ => {}
            }
        }

        if let Some(file) = file {
            let entry = self.by_file.entry(file).or_default();
            for name in &bound {
                entry.insert(name.clone(), name.clone());
            }
        }
        self.names.extend(bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jst_entry::parse;

    #[test]
    fn register_import_block_tracks_bound_names_and_source_file() {
        let doc = parse("import { readFile } from 'fs';");
        let block = doc.entries.iter().find(|e| e.kind == EntryKind::ImportBlock).unwrap();
        let mut map = ImportMap::new();
        map.register_import_block(&doc, block.id);

        assert!(map.is_imported("readFile"));
        assert_eq!(map.imported_as("readFile", "fs"), Some("readFile"));
        assert!(!map.is_imported("writeFile"));
    }

    #[test]
    fn insert_dedup_tracks_already_inserted_code() {
        let mut map = ImportMap::new();
        assert!(!map.already_inserted("import re"));
        map.mark_inserted("import re");
        assert!(map.already_inserted("import re"));
    }
}
