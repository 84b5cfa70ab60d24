//! Text buffer abstraction consumed by the editor adapter
//!
//! [`TextBuffer`] is the seam between snippet insertion and whatever editor
//! widget owns the text. [`RopeBuffer`] is an in-memory implementation backed
//! by a ropey `Rope`, used by the CLI and tests.
//!
//! All offsets are char offsets. Selections may be reversed (start > end);
//! consumers normalize when they need an ordered range.

use std::io;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};

pub trait TextBuffer {
    /// Anchor of the selection (may be after [`TextBuffer::selection_end`])
    fn selection_start(&self) -> usize;

    /// Active end of the selection, where the caret sits
    fn selection_end(&self) -> usize;

    /// Buffer length in chars
    fn len_chars(&self) -> usize;

    fn line_for_offset(&self, offset: usize) -> usize;

    /// Offset of the first char of `line`
    fn line_start(&self, line: usize) -> usize;

    /// Offset just past the last char of `line`, excluding its line break
    fn line_end(&self, line: usize) -> usize;

    /// Text of `line` without its line break
    fn line_text(&self, line: usize) -> String;

    /// Replace `[start, end)` with `text`. Callers validate the range first.
    fn replace_range(&mut self, start: usize, end: usize, text: &str);

    fn set_selection(&mut self, start: usize, end: usize);

    fn set_caret(&mut self, pos: usize) {
        self.set_selection(pos, pos);
    }

    fn full_text(&self) -> String;

    /// Text in `[start, end)`
    fn slice(&self, start: usize, end: usize) -> String;

    /// Path of the file backing this buffer, if any
    fn file_path(&self) -> Option<PathBuf> {
        None
    }

    /// Extension of [`TextBuffer::file_path`], without the dot
    fn file_extension(&self) -> Option<String> {
        self.file_path()
            .and_then(|path| path.extension().map(|ext| ext.to_string_lossy().into_owned()))
    }
}

/// Rope-backed buffer with a single selection
#[derive(Debug, Clone, Default)]
pub struct RopeBuffer {
    rope: Rope,
    selection: (usize, usize),
    path: Option<PathBuf>,
}

impl RopeBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: (0, 0),
            path: None,
        }
    }

    /// Load a buffer from disk, remembering the path for syntax detection
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let rope = Rope::from_reader(io::BufReader::new(file))?;
        Ok(Self {
            rope,
            selection: (0, 0),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.set_selection(start, end);
        self
    }

    /// Write the buffer back to `path`
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.rope.write_to(io::BufWriter::new(file))
    }
}

/// Number of trailing chars of `line` that form its line break
fn line_break_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    match line.char(len - 1) {
        '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}' => 1,
        _ => 0,
    }
}

impl TextBuffer for RopeBuffer {
    fn selection_start(&self) -> usize {
        self.selection.0
    }

    fn selection_end(&self) -> usize {
        self.selection.1
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn line_for_offset(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    fn line_start(&self, line: usize) -> usize {
        self.rope.line_to_char(line.min(self.rope.len_lines()))
    }

    fn line_end(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let slice = self.rope.line(line);
        self.line_start(line) + slice.len_chars() - line_break_len(slice)
    }

    fn line_text(&self, line: usize) -> String {
        if line >= self.rope.len_lines() {
            return String::new();
        }
        let slice = self.rope.line(line);
        let content_len = slice.len_chars() - line_break_len(slice);
        slice.slice(..content_len).to_string()
    }

    fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        let len = self.rope.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.rope.len_chars();
        self.selection = (start.min(len), end.min(len));
    }

    fn full_text(&self) -> String {
        self.rope.to_string()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);
        self.rope.slice(start..end).to_string()
    }

    fn file_path(&self) -> Option<PathBuf> {
        self.path.clone()
    }
}
