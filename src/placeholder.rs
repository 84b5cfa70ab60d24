//! Placeholder resolution
//!
//! Runs a [`TabStopParser`] over indented snippet text and picks the primary
//! caret/selection target. Snippets without any placeholder get a synthetic
//! caret stop at the end of the inserted text so callers always have a target.

use tracing::{debug, instrument};

use crate::snippet::{SnippetParseError, TabStop, TabStopParser, TabStopStructure};

/// Final insertable text and where the caret goes inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionResult {
    /// Marker-free text to write into the buffer
    pub text: String,
    /// Primary target, relative to the insertion start
    pub primary: TabStop,
    /// Every stop (including a synthesized caret stop), for linked editing
    pub tabstops: TabStopStructure,
}

/// Strip markers from `indented` and resolve the primary target.
#[instrument(level = "debug", skip(parser, indented), fields(len = indented.len()))]
pub fn resolve<P>(parser: &P, indented: &str) -> Result<InsertionResult, SnippetParseError>
where
    P: TabStopParser + ?Sized,
{
    let extracted = parser.extract(indented)?;
    let text = extracted.text;
    let mut tabstops = extracted.tabstops;

    if tabstops.is_empty() {
        let end = text.chars().count();
        debug!(offset = end, "No tabstops found, adding caret at end");
        tabstops.push(TabStop::caret(end));
    }

    // Non-empty by construction above
    let primary = tabstops.first().unwrap_or(TabStop::caret(0));

    debug!(
        tabstops = tabstops.len(),
        groups = tabstops.group_ids().len(),
        primary_start = primary.start,
        primary_end = primary.end,
        "Resolved snippet placeholders"
    );

    Ok(InsertionResult {
        text,
        primary,
        tabstops,
    })
}
