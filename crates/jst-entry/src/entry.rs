//! The flat entry arena: `Vec<Entry>` addressed by index, not a
//! pointer-based tree. Parent links and dot-chain ("extended") links are
//! stored as indices back into the same vector.

use jst_common::Span;

use crate::kind::EntryKind;

/// Index into a [`Document`]'s entry vector. `u32::MAX` is reserved as the
/// "no parent" sentinel for the root entry.
pub type EntryId = u32;

pub const NO_PARENT: EntryId = u32::MAX;

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub span: Span,
    pub parent: EntryId,
    /// Nesting depth, counted from the root (0). Used both for emission
    /// indentation and for `Document::children_of`'s range scan.
    pub inset: u32,
    /// For a dot-chain step (`Attribute`), the entry this one extends --
    /// e.g. in `a.b.c`, the second `Attribute` (`.c`) has `extended`
    /// pointing at the first (`.b`), which in turn points at the `NameType`
    /// for `a`. `None` for every other kind.
    pub extended: Option<EntryId>,
    /// Literal text for leaf kinds (identifier name, string contents,
    /// number/operator/separator text). Containers leave this empty; their
    /// text is reconstructed from their children.
    pub text: String,
}

impl Entry {
    pub fn source_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start as usize..self.span.end as usize]
    }
}

/// An entire parsed translation unit: the flat, ordered entry sequence plus
/// the source text it was parsed from.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub entries: Vec<Entry>,
}

impl Document {
    pub fn root(&self) -> &Entry {
        &self.entries[0]
    }

    pub fn get(&self, id: EntryId) -> &Entry {
        &self.entries[id as usize]
    }

    /// Entries that are direct children of `parent`, in document order.
    /// Children are exactly the run of entries immediately following
    /// `parent` whose inset is `parent.inset + 1`, ending at the first
    /// entry whose inset drops back to `parent.inset` or below.
    pub fn children_of(&self, parent: EntryId) -> impl Iterator<Item = &Entry> {
        let parent_inset = self.entries[parent as usize].inset;
        self.entries[parent as usize + 1..]
            .iter()
            .take_while(move |e| e.inset > parent_inset)
            .filter(move |e| e.inset == parent_inset + 1)
    }

    /// The index range `[start, end)` of `parent`'s full subtree,
    /// including `parent` itself.
    pub fn subtree_range(&self, parent: EntryId) -> std::ops::Range<usize> {
        let parent_inset = self.entries[parent as usize].inset;
        let start = parent as usize;
        let mut end = start + 1;
        while end < self.entries.len() && self.entries[end].inset > parent_inset {
            end += 1;
        }
        start..end
    }

    /// Walks `extended` links back to the root of a dot-chain (the
    /// left-most, non-`Attribute` entry a chain of `.member` accesses
    /// was built on).
    pub fn chain_root(&self, id: EntryId) -> EntryId {
        let mut cur = id;
        while let Some(next) = self.entries[cur as usize].extended {
            cur = next;
        }
        cur
    }
}
