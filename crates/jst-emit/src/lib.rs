//! Stateful emission buffer that drives a [`jst_rules::RuleTrie`] across a
//! parsed [`jst_entry::Document`], plus the scratch structures it shares
//! across sub-buffers: hoisted-declaration headings and the import map.

pub mod buffer;
pub mod driver;
pub mod heading;
pub mod import_map;

pub use buffer::EmitBuffer;
pub use driver::{convert, format_code, has_no_edit_marker, to_dom_string, ConvertError, ConvertOutcome};
pub use heading::HeadingBuffer;
pub use import_map::ImportMap;
