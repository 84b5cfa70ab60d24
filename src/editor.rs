//! Emmet editor adapter
//!
//! [`EmmetEditor`] wraps a [`TextBuffer`] and exposes the operations the
//! expansion engine needs: selection and line queries, syntax detection and,
//! most importantly, snippet insertion.
//!
//! Inserting a snippet is an all-or-nothing sequence:
//! 1. validate the target range
//! 2. re-indent continuation lines to match the line at the insertion point
//! 3. strip tab-stop markers and pick the primary caret target
//! 4. replace the range with the final text (the only buffer mutation)
//! 5. move the caret/selection to the primary target
//!
//! Any failure before step 4 leaves the buffer and selection untouched.

use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::buffer::TextBuffer;
use crate::config::Config;
use crate::error::{EmmetError, Result};
use crate::indent;
use crate::logging;
use crate::placeholder::{self, InsertionResult};
use crate::snippet::{SnippetParser, TabStop, TabStopParser};
use crate::syntax::Syntax;

/// A snippet that has been written into the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionOutcome {
    /// Buffer offset the text was inserted at
    pub start: usize,
    pub result: InsertionResult,
}

impl InsertionOutcome {
    /// Absolute caret/selection range of the primary target
    pub fn caret(&self) -> (usize, usize) {
        (
            self.start + self.result.primary.start,
            self.start + self.result.primary.end,
        )
    }

    /// Every tab stop translated to buffer offsets, in parse order
    pub fn absolute_tabstops(&self) -> Vec<TabStop> {
        self.result
            .tabstops
            .iter()
            .map(|stop| TabStop::new(self.start + stop.start, self.start + stop.end, stop.group))
            .collect()
    }
}

/// Snippet insertion over a [`TextBuffer`].
///
/// Owns the buffer, the placeholder grammar `P` and the user config. Each
/// insertion either applies one replace plus one selection change, or fails
/// with the buffer and selection untouched.
pub struct EmmetEditor<B, P = SnippetParser> {
    buffer: B,
    parser: P,
    config: Config,
}

impl<B: TextBuffer> EmmetEditor<B> {
    /// Create an editor over `buffer` using the default placeholder grammar
    pub fn new(buffer: B) -> Self {
        Self::with_parser(buffer, SnippetParser)
    }
}

impl<B: TextBuffer, P: TabStopParser> EmmetEditor<B, P> {
    pub fn with_parser(buffer: B, parser: P) -> Self {
        Self {
            buffer,
            parser,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn into_buffer(self) -> B {
        self.buffer
    }

    /// Selection as reported by the buffer; may be reversed
    pub fn selection_range(&self) -> (usize, usize) {
        (self.buffer.selection_start(), self.buffer.selection_end())
    }

    pub fn create_selection(&mut self, start: usize, end: usize) {
        self.buffer.set_selection(start, end);
    }

    /// Range of the line holding the caret, excluding its line break
    pub fn current_line_range(&self) -> (usize, usize) {
        let line = self.buffer.line_for_offset(self.caret_pos());
        (self.buffer.line_start(line), self.buffer.line_end(line))
    }

    pub fn current_line(&self) -> String {
        let line = self.buffer.line_for_offset(self.caret_pos());
        self.buffer.line_text(line)
    }

    pub fn caret_pos(&self) -> usize {
        self.buffer.selection_end()
    }

    pub fn set_caret_pos(&mut self, pos: usize) {
        self.buffer.set_caret(pos);
    }

    pub fn content(&self) -> String {
        self.buffer.full_text()
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.buffer.file_path()
    }

    pub fn syntax(&self) -> Syntax {
        Syntax::from_extension(self.buffer.file_extension().as_deref())
    }

    pub fn profile_name(&self) -> String {
        self.config.get_profile(self.syntax())
    }

    /// Selected text, with reversed selections normalized first
    pub fn selected_text(&self) -> String {
        let (start, end) = self.ordered_selection();
        self.buffer.slice(start, end)
    }

    fn ordered_selection(&self) -> (usize, usize) {
        let (start, end) = self.selection_range();
        if start > end {
            (end, start)
        } else {
            (start, end)
        }
    }

    /// Replace the current selection with `text`, re-indenting unless the
    /// config opts out.
    #[track_caller]
    pub fn insert_snippet(&mut self, text: &str) -> Result<InsertionOutcome> {
        let (start, end) = self.ordered_selection();
        let no_indent = self.config.get_no_indent();
        self.insert_snippet_in(text, start, end, no_indent)
    }

    /// Replace `[start, end)` with `text`.
    ///
    /// On error nothing in the buffer changes and the failure is logged with
    /// the caller's location before being returned.
    #[track_caller]
    pub fn insert_snippet_in(
        &mut self,
        text: &str,
        start: usize,
        end: usize,
        no_indent: bool,
    ) -> Result<InsertionOutcome> {
        let caller = std::panic::Location::caller();
        let result = match self.prepare(text, start, end, no_indent) {
            Ok(result) => result,
            Err(e) => {
                logging::log_error(
                    "SNIPPET",
                    &e.to_string(),
                    Some(&format!("insert {}..{} at {}", start, end, caller)),
                );
                return Err(e);
            }
        };

        self.buffer.replace_range(start, end, &result.text);

        let outcome = InsertionOutcome { start, result };
        let (caret_start, caret_end) = outcome.caret();
        self.buffer.set_selection(caret_start, caret_end);

        logging::log_insert_event(
            start,
            end,
            outcome.result.text.chars().count(),
            (caret_start, caret_end),
        );
        Ok(outcome)
    }

    /// Everything up to (not including) the buffer mutation
    #[instrument(level = "debug", skip(self, text), fields(len = text.len()))]
    fn prepare(
        &self,
        text: &str,
        start: usize,
        end: usize,
        no_indent: bool,
    ) -> Result<InsertionResult> {
        let len = self.buffer.len_chars();
        if start > end || end > len {
            return Err(EmmetError::Range { start, end, len });
        }

        let line = self.buffer.line_text(self.buffer.line_for_offset(start));
        debug!(no_indent, line_len = line.len(), "Preparing snippet");
        let indented = indent::indent_for_line(text, &line, no_indent);

        Ok(placeholder::resolve(&self.parser, &indented)?)
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod tests;
