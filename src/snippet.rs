//! Tab-stop extraction for expanded snippet text
//!
//! Turns raw snippet text into marker-free text plus a [`TabStopStructure`]
//! describing where the caret should go.
//!
//! Supported syntax:
//! - `$1`, `$2`, `$3` - Simple tabstops (numbered positions)
//! - `${1}` - Braced tabstop, same as `$1`
//! - `${1:default}` - Tabstops with placeholder text (may contain nested tabstops)
//! - `${1|a,b,c|}` - Choice tabstops (first choice is inserted)
//! - `$0` - Final cursor position
//! - `$$` or `\$` - Escaped literal dollar sign
//!
//! All offsets are char offsets into the marker-free text.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

/// Identifier shared by tab stops that are edited together.
///
/// Ordering is part of the contract: numeric groups sort numerically and the
/// reserved [`GroupId::Caret`] group sorts after all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupId {
    /// Explicit placeholder index (`$1`, `${2:name}`)
    Index(u32),
    /// Reserved group for synthesized caret-only stops
    Caret,
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{}", index),
            Self::Caret => f.write_str("carets"),
        }
    }
}

/// A single placeholder position within the final text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    pub start: usize,
    pub end: usize,
    pub group: GroupId,
}

impl TabStop {
    pub fn new(start: usize, end: usize, group: GroupId) -> Self {
        Self { start, end, group }
    }

    /// Zero-width stop in the reserved caret group
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset, GroupId::Caret)
    }

    /// True when the stop selects nothing (plain caret)
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Every tab stop found in one snippet, kept in parse order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabStopStructure {
    stops: Vec<TabStop>,
}

impl TabStopStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stop: TabStop) {
        self.stops.push(stop);
    }

    /// Total number of tab stops across all groups
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops in parse order
    pub fn iter(&self) -> impl Iterator<Item = &TabStop> {
        self.stops.iter()
    }

    /// Distinct group ids in sort order (numeric ascending, caret group last)
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups().into_keys().collect()
    }

    /// Stops belonging to `group`, in parse order
    pub fn group(&self, group: GroupId) -> Vec<TabStop> {
        self.stops
            .iter()
            .filter(|stop| stop.group == group)
            .copied()
            .collect()
    }

    /// All stops partitioned by group
    pub fn groups(&self) -> BTreeMap<GroupId, Vec<TabStop>> {
        let mut groups: BTreeMap<GroupId, Vec<TabStop>> = BTreeMap::new();
        for stop in &self.stops {
            groups.entry(stop.group).or_default().push(*stop);
        }
        groups
    }

    /// First stop in document order.
    ///
    /// Lowest start offset wins; ties go to the lower group id, then to
    /// whichever stop was parsed first.
    pub fn first(&self) -> Option<TabStop> {
        self.stops
            .iter()
            .min_by_key(|stop| (stop.start, stop.group))
            .copied()
    }
}

/// Marker-free text together with the tab stops found in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSnippet {
    pub text: String,
    pub tabstops: TabStopStructure,
}

/// Errors raised while extracting tab stops from malformed snippet text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnippetParseError {
    #[error("placeholder at offset {offset} has no numeric index (found {found:?})")]
    InvalidIndex { offset: usize, found: String },

    #[error("placeholder opened at offset {offset} is never closed")]
    Unterminated { offset: usize },

    #[error("{0}")]
    Other(String),
}

/// Pluggable placeholder grammar.
///
/// Implementations must report offsets relative to the returned marker-free
/// text, counted in chars.
pub trait TabStopParser {
    fn extract(&self, text: &str) -> Result<ExtractedSnippet, SnippetParseError>;
}

/// Default parser for the `$N` / `${N:placeholder}` / `${N|a,b|}` grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct SnippetParser;

impl SnippetParser {
    /// Parse a snippet template into marker-free text and tab stops
    ///
    /// # Examples
    ///
    /// ```
    /// use emmet_editor::snippet::SnippetParser;
    ///
    /// let snippet = SnippetParser::parse("Hello ${1:world}!").unwrap();
    /// assert_eq!(snippet.text, "Hello world!");
    /// assert_eq!(snippet.tabstops.len(), 1);
    /// ```
    pub fn parse(template: &str) -> Result<ExtractedSnippet, SnippetParseError> {
        let mut extractor = Extractor::new(template);
        extractor.parse_sequence()?;
        Ok(ExtractedSnippet {
            text: extractor.text,
            tabstops: extractor.tabstops,
        })
    }
}

impl TabStopParser for SnippetParser {
    fn extract(&self, text: &str) -> Result<ExtractedSnippet, SnippetParseError> {
        Self::parse(text)
    }
}

/// `${N:` whose closing `}` has not been seen yet
struct OpenPlaceholder {
    /// Index of its stop in `tabstops`
    slot: usize,
    open_offset: usize,
    /// Unmatched literal `{` inside the placeholder text
    brace_depth: usize,
}

/// Cursor over the raw template that writes marker-free output as it goes
struct Extractor<'a> {
    chars: Peekable<Chars<'a>>,
    /// Chars consumed from the raw template
    consumed: usize,
    text: String,
    /// Chars written to `text`
    text_len: usize,
    tabstops: TabStopStructure,
}

impl<'a> Extractor<'a> {
    fn new(template: &'a str) -> Self {
        Self {
            chars: template.chars().peekable(),
            consumed: 0,
            text: String::with_capacity(template.len()),
            text_len: 0,
            tabstops: TabStopStructure::new(),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.consumed += 1;
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn emit(&mut self, c: char) {
        self.text.push(c);
        self.text_len += 1;
    }

    /// Parse the whole template.
    ///
    /// Nested `${N:...}` placeholders are tracked on an explicit stack rather
    /// than by recursion, so nesting depth is bounded only by memory.
    fn parse_sequence(&mut self) -> Result<(), SnippetParseError> {
        // Innermost placeholder last
        let mut open: Vec<OpenPlaceholder> = Vec::new();

        while let Some(c) = self.advance() {
            match c {
                '$' => match self.peek() {
                    // Escaped dollar: $$ -> $
                    Some('$') => {
                        self.advance();
                        self.emit('$');
                    }
                    Some('{') => {
                        let open_offset = self.consumed - 1;
                        self.advance(); // consume '{'
                        if let Some(slot) = self.parse_braced(open_offset)? {
                            open.push(OpenPlaceholder {
                                slot,
                                open_offset,
                                brace_depth: 0,
                            });
                        }
                    }
                    Some(d) if d.is_ascii_digit() => {
                        let open_offset = self.consumed - 1;
                        let digits = self.take_digits();
                        let index = parse_index(&digits, open_offset)?;
                        self.tabstops
                            .push(TabStop::new(self.text_len, self.text_len, GroupId::Index(index)));
                    }
                    // Just a lone $ at end or followed by non-special char
                    _ => self.emit('$'),
                },
                '\\' => match self.peek() {
                    Some(escaped @ ('$' | '}')) => {
                        self.advance();
                        self.emit(escaped);
                    }
                    _ => self.emit('\\'),
                },
                '{' => {
                    if let Some(innermost) = open.last_mut() {
                        innermost.brace_depth += 1;
                    }
                    self.emit('{');
                }
                '}' => match open.last().map(|innermost| innermost.brace_depth) {
                    Some(0) => {
                        if let Some(closed) = open.pop() {
                            self.tabstops.stops[closed.slot].end = self.text_len;
                        }
                    }
                    Some(_) => {
                        if let Some(innermost) = open.last_mut() {
                            innermost.brace_depth -= 1;
                        }
                        self.emit('}');
                    }
                    None => self.emit('}'),
                },
                _ => self.emit(c),
            }
        }

        match open.pop() {
            Some(innermost) => Err(SnippetParseError::Unterminated {
                offset: innermost.open_offset,
            }),
            None => Ok(()),
        }
    }

    /// Parse the rest of a braced tabstop after `${`: `1}`, `1:text}` or `1|a,b|}`.
    ///
    /// For `1:` the outer stop is pushed with a zero-width span and its slot is
    /// returned; the caller closes it when the matching `}` arrives.
    fn parse_braced(&mut self, open_offset: usize) -> Result<Option<usize>, SnippetParseError> {
        let digits = self.take_digits();
        if digits.is_empty() {
            let found = self.take_until_close();
            return Err(SnippetParseError::InvalidIndex {
                offset: open_offset,
                found,
            });
        }
        let index = parse_index(&digits, open_offset)?;
        let group = GroupId::Index(index);

        match self.advance() {
            // Simple: ${1}
            Some('}') => {
                self.tabstops
                    .push(TabStop::new(self.text_len, self.text_len, group));
                Ok(None)
            }
            // Placeholder: ${1:text}
            Some(':') => {
                // Reserve the slot so the outer stop precedes nested ones in parse order
                let slot = self.tabstops.len();
                self.tabstops
                    .push(TabStop::new(self.text_len, self.text_len, group));
                Ok(Some(slot))
            }
            // Choices: ${1|a,b,c|}
            Some('|') => {
                let choices = self.parse_choices(open_offset)?;
                let start = self.text_len;
                if let Some(first) = choices.first() {
                    for c in first.chars() {
                        self.emit(c);
                    }
                }
                self.tabstops.push(TabStop::new(start, self.text_len, group));
                Ok(None)
            }
            Some(other) => {
                let mut found = digits;
                found.push(other);
                found.push_str(&self.take_until_close());
                Err(SnippetParseError::InvalidIndex {
                    offset: open_offset,
                    found,
                })
            }
            None => Err(SnippetParseError::Unterminated {
                offset: open_offset,
            }),
        }
    }

    /// Parse choice options: `a,b,c|}`
    fn parse_choices(&mut self, open_offset: usize) -> Result<Vec<String>, SnippetParseError> {
        let mut choices = Vec::new();
        let mut current = String::new();

        while let Some(c) = self.advance() {
            match c {
                ',' => choices.push(std::mem::take(&mut current)),
                '|' => {
                    if self.advance() != Some('}') {
                        break;
                    }
                    choices.push(current);
                    return Ok(choices);
                }
                '\\' => {
                    if let Some(escaped) = self.advance() {
                        current.push(escaped);
                    }
                }
                _ => current.push(c),
            }
        }

        Err(SnippetParseError::Unterminated {
            offset: open_offset,
        })
    }

    fn take_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(d) = self.peek().filter(char::is_ascii_digit) {
            digits.push(d);
            self.advance();
        }
        digits
    }

    /// Consume through the next `}` (or end of input), returning what was skipped
    fn take_until_close(&mut self) -> String {
        let mut skipped = String::new();
        while let Some(c) = self.advance() {
            if c == '}' {
                break;
            }
            skipped.push(c);
        }
        skipped
    }
}

fn parse_index(digits: &str, offset: usize) -> Result<u32, SnippetParseError> {
    digits
        .parse()
        .map_err(|_| SnippetParseError::InvalidIndex {
            offset,
            found: digits.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(template: &str) -> ExtractedSnippet {
        SnippetParser::parse(template).unwrap()
    }

    #[test]
    fn test_parse_simple_tabstop() {
        let snippet = parse("$1");
        assert_eq!(snippet.text, "");
        assert_eq!(
            snippet.tabstops.first(),
            Some(TabStop::new(0, 0, GroupId::Index(1)))
        );
    }

    #[test]
    fn test_parse_tabstop_with_placeholder() {
        let snippet = parse("${1:name}");
        assert_eq!(snippet.text, "name");
        assert_eq!(
            snippet.tabstops.group(GroupId::Index(1)),
            vec![TabStop::new(0, 4, GroupId::Index(1))]
        );
    }

    #[test]
    fn test_parse_tabstop_with_choices() {
        let snippet = parse("${1|a,b,c|}");
        // First choice is used as expanded text
        assert_eq!(snippet.text, "a");
        assert_eq!(
            snippet.tabstops.first(),
            Some(TabStop::new(0, 1, GroupId::Index(1)))
        );
    }

    #[test]
    fn test_parse_text_and_tabstop() {
        let snippet = parse("Hello $1!");
        assert_eq!(snippet.text, "Hello !");
        assert_eq!(
            snippet.tabstops.first(),
            Some(TabStop::new(6, 6, GroupId::Index(1)))
        );
    }

    #[test]
    fn test_parse_escaped_dollar() {
        assert_eq!(parse("$$100").text, "$100");
        assert_eq!(parse("\\$100").text, "$100");
        assert!(parse("$$1").tabstops.is_empty());
    }

    #[test]
    fn test_parse_linked_tabstops() {
        let snippet = parse("${1:foo} and ${1:bar}");
        assert_eq!(snippet.text, "foo and bar");
        assert_eq!(snippet.tabstops.group_ids(), vec![GroupId::Index(1)]);
        assert_eq!(
            snippet.tabstops.group(GroupId::Index(1)),
            vec![
                TabStop::new(0, 3, GroupId::Index(1)),
                TabStop::new(8, 11, GroupId::Index(1)),
            ]
        );
    }

    #[test]
    fn test_parse_empty_string() {
        let snippet = parse("");
        assert_eq!(snippet.text, "");
        assert!(snippet.tabstops.is_empty());
        assert_eq!(snippet.tabstops.first(), None);
    }

    #[test]
    fn test_group_ids_sorted_numerically() {
        let snippet = parse("$3 $10 $1 $2 $0");
        assert_eq!(
            snippet.tabstops.group_ids(),
            vec![
                GroupId::Index(0),
                GroupId::Index(1),
                GroupId::Index(2),
                GroupId::Index(3),
                GroupId::Index(10),
            ]
        );
    }

    #[test]
    fn test_caret_group_sorts_last() {
        let mut tabstops = parse("${2:b} $0").tabstops;
        tabstops.push(TabStop::caret(0));
        assert_eq!(
            tabstops.group_ids(),
            vec![GroupId::Index(0), GroupId::Index(2), GroupId::Caret]
        );
    }

    #[test]
    fn test_group_id_display() {
        assert_eq!(GroupId::Index(3).to_string(), "3");
        assert_eq!(GroupId::Caret.to_string(), "carets");
    }

    #[test]
    fn test_multiple_tabstops_with_text() {
        let snippet = parse("function ${1:name}(${2:args}) { $0 }");
        assert_eq!(snippet.text, "function name(args) {  }");
        assert_eq!(
            snippet.tabstops.iter().copied().collect::<Vec<_>>(),
            vec![
                TabStop::new(9, 13, GroupId::Index(1)),
                TabStop::new(14, 18, GroupId::Index(2)),
                TabStop::new(22, 22, GroupId::Index(0)),
            ]
        );
    }

    #[test]
    fn test_first_prefers_document_order_over_group() {
        let snippet = parse("$0abc$1");
        assert_eq!(
            snippet.tabstops.first(),
            Some(TabStop::new(0, 0, GroupId::Index(0)))
        );
    }

    #[test]
    fn test_first_breaks_ties_by_group() {
        let snippet = parse("x$2$1");
        assert_eq!(
            snippet.tabstops.first(),
            Some(TabStop::new(1, 1, GroupId::Index(1)))
        );
    }

    #[test]
    fn test_nested_placeholder() {
        let snippet = parse("${1:a ${2:b} c}");
        assert_eq!(snippet.text, "a b c");
        assert_eq!(
            snippet.tabstops.iter().copied().collect::<Vec<_>>(),
            vec![
                TabStop::new(0, 5, GroupId::Index(1)),
                TabStop::new(2, 3, GroupId::Index(2)),
            ]
        );
    }

    #[test]
    fn test_braces_inside_placeholder_are_literal() {
        let snippet = parse("${1:{a}}");
        assert_eq!(snippet.text, "{a}");
        assert_eq!(
            snippet.tabstops.first(),
            Some(TabStop::new(0, 3, GroupId::Index(1)))
        );
    }

    #[test]
    fn test_deeply_nested_placeholders() {
        let depth = 10_000;
        let template = format!("{}x{}", "${1:".repeat(depth), "}".repeat(depth));

        let snippet = parse(&template);

        assert_eq!(snippet.text, "x");
        assert_eq!(snippet.tabstops.len(), depth);
        assert!(snippet
            .tabstops
            .iter()
            .all(|stop| *stop == TabStop::new(0, 1, GroupId::Index(1))));
    }

    #[test]
    fn test_deeply_nested_unterminated_is_error() {
        let depth = 10_000;
        let template = format!("{}x{}", "${1:".repeat(depth), "}".repeat(depth - 1));

        assert_eq!(
            SnippetParser::parse(&template).unwrap_err(),
            SnippetParseError::Unterminated { offset: 0 }
        );
    }

    #[test]
    fn test_unterminated_reports_innermost_open() {
        assert_eq!(
            SnippetParser::parse("${1:a ${2:b").unwrap_err(),
            SnippetParseError::Unterminated { offset: 6 }
        );
        assert_eq!(
            SnippetParser::parse("${1:a ${2:b}").unwrap_err(),
            SnippetParseError::Unterminated { offset: 0 }
        );
    }

    #[test]
    fn test_offsets_count_chars_not_bytes() {
        let snippet = parse("héllo ${1:wörld}");
        assert_eq!(snippet.text, "héllo wörld");
        assert_eq!(
            snippet.tabstops.first(),
            Some(TabStop::new(6, 11, GroupId::Index(1)))
        );
    }

    #[test]
    fn test_lone_dollar_preserved() {
        assert_eq!(parse("$x").text, "$x");
        assert_eq!(parse("test$").text, "test$");
    }

    #[test]
    fn test_top_level_braces_are_literal() {
        let snippet = parse("import { ${1:Component} } from '${2:react}';");
        assert_eq!(snippet.text, "import { Component } from 'react';");
        assert_eq!(snippet.tabstops.len(), 2);
    }

    #[test]
    fn test_choices_with_escapes() {
        let snippet = parse("${1|a\\,b,c|}");
        assert_eq!(snippet.text, "a,b");
    }

    #[test]
    fn test_non_numeric_index_is_error() {
        let err = SnippetParser::parse("ab${name}").unwrap_err();
        assert_eq!(
            err,
            SnippetParseError::InvalidIndex {
                offset: 2,
                found: "name".to_string()
            }
        );
    }

    #[test]
    fn test_unterminated_placeholder_is_error() {
        assert_eq!(
            SnippetParser::parse("<a>${1:href").unwrap_err(),
            SnippetParseError::Unterminated { offset: 3 }
        );
        assert_eq!(
            SnippetParser::parse("${1").unwrap_err(),
            SnippetParseError::Unterminated { offset: 0 }
        );
        assert_eq!(
            SnippetParser::parse("${1|a,b").unwrap_err(),
            SnippetParseError::Unterminated { offset: 0 }
        );
    }

    #[test]
    fn test_index_overflow_is_error() {
        assert!(matches!(
            SnippetParser::parse("$99999999999"),
            Err(SnippetParseError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_trait_object_dispatch() {
        let parser: &dyn TabStopParser = &SnippetParser;
        let snippet = parser.extract("<p>$1</p>").unwrap();
        assert_eq!(snippet.text, "<p></p>");
    }
}
