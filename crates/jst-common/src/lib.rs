//! Shared types used across the transpiler workspace: source spans, line
//! lookup, and the translation error taxonomy.

pub mod error;
pub mod span;

pub use error::{NoEditWarning, TranslateError, NO_EDIT_MARKER};
pub use span::{LineIndex, Span};
