//! Flat entry model and recursive-descent parser for ES6 source (spec §3, §4.2, §4.3).

pub mod entry;
pub mod keyword;
pub mod kind;
pub mod parser;
pub mod scope;

pub use entry::{Document, Entry, EntryId, NO_PARENT};
pub use keyword::KeywordRegistry;
pub use kind::EntryKind;
pub use parser::parse;
pub use scope::ScopeInfo;
