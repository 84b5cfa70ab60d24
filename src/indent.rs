//! Re-indentation of multi-line snippet text
//!
//! Continuation lines of an inserted snippet are prefixed with the leading
//! whitespace of the line they are inserted into, so the snippet lines up
//! with the surrounding code. The first line is never touched because it
//! lands after the existing text on the target line.

use std::sync::LazyLock;

use regex::Regex;

/// Number of leading whitespace chars dropped from long paddings.
///
/// Kept for behavioural compatibility with the Emmet editor adapter this
/// mirrors. There is no known rationale for the value; treat it as suspect
/// rather than something to tune.
pub const PADDING_SKIP: usize = 6;

/// Line ending used when reassembling re-indented text
pub const LINE_ENDING: &str = "\n";

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n\r|\r|\n").expect("Invalid regex"));

/// Leading whitespace of `line` to apply to continuation lines.
///
/// When the whitespace run is at least [`PADDING_SKIP`] chars long, its first
/// [`PADDING_SKIP`] chars are dropped.
pub fn extract_padding(line: &str) -> &str {
    let prefix_end = line
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(line.len(), |(i, _)| i);
    let prefix = &line[..prefix_end];

    if prefix.chars().count() >= PADDING_SKIP {
        let skip_to = prefix
            .char_indices()
            .nth(PADDING_SKIP)
            .map_or(prefix.len(), |(i, _)| i);
        &prefix[skip_to..]
    } else {
        prefix
    }
}

/// Split text into lines on `\r\n`, `\n\r`, `\r` or `\n`.
///
/// A trailing line break yields a trailing empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    LINE_BREAK.split(text).collect()
}

/// Prefix every line after the first with `padding`.
///
/// Line breaks in the output are always [`LINE_ENDING`].
pub fn pad(text: &str, padding: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }

    let lines = split_lines(text);
    let mut result = String::with_capacity(text.len() + lines.len() * (padding.len() + 1));
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            result.push_str(LINE_ENDING);
            result.push_str(padding);
        }
        result.push_str(line);
    }

    tracing::trace!(
        lines = lines.len(),
        padding_len = padding.chars().count(),
        "Padded snippet text"
    );
    result
}

/// Re-indent `text` for insertion into `line`, unless `no_indent` is set.
pub fn indent_for_line(text: &str, line: &str, no_indent: bool) -> String {
    if no_indent {
        return text.to_string();
    }
    pad(text, extract_padding(line))
}
