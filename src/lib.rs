//! Emmet editor adapter
//!
//! Inserts snippet-expansion output into an editor buffer: continuation lines
//! are re-indented to the insertion line, tab-stop markers are stripped, and
//! the caret lands on the first tab stop.

pub mod buffer;
pub mod config;
pub mod editor;
pub mod error;
pub mod indent;
pub mod logging;
pub mod placeholder;
pub mod snippet;
pub mod syntax;
