//! Source cursor and character classification shared by the entry parser.

pub mod classify;
pub mod cursor;

pub use cursor::Cursor;
