//! emmet-insert - insert a snippet into a file the way the editor adapter does
//!
//! # Usage
//!
//! ```bash
//! emmet-insert index.html --at 42 --snippet '<li>${1:item}</li>'
//! echo '<p>$0</p>' | emmet-insert index.html --at 10 --end 14 --in-place
//! ```
//!
//! The resulting text goes to stdout (or back to the file with `--in-place`);
//! the caret range is reported on stderr.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use emmet_editor::buffer::{RopeBuffer, TextBuffer};
use emmet_editor::config;
use emmet_editor::editor::EmmetEditor;
use emmet_editor::error::{EmmetError, ErrorSeverity, Result};
use emmet_editor::logging;

#[derive(Debug, Parser)]
#[command(name = "emmet-insert", about = "Insert an expanded snippet into a file")]
struct Cli {
    /// File to insert into; an empty buffer is used when omitted
    file: Option<PathBuf>,

    /// Snippet text; read from stdin when omitted
    #[arg(short, long)]
    snippet: Option<String>,

    /// Char offset to insert at (default: end of file)
    #[arg(long)]
    at: Option<usize>,

    /// End of the char range to replace (default: same as --at)
    #[arg(long)]
    end: Option<usize>,

    /// Skip re-indentation of continuation lines
    #[arg(long)]
    no_indent: bool,

    /// Write the result back to FILE instead of stdout
    #[arg(long, requires = "file")]
    in_place: bool,

    /// Config file (default: ~/.emmet/config.json). Unlike the default file,
    /// an explicit one that cannot be parsed is reported as an error.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let _guard = logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let level = match e.severity() {
                ErrorSeverity::Warning => "warning",
                ErrorSeverity::Error => "error",
            };
            eprintln!("emmet-insert: {}: {}", level, e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => config::try_load_config_from(path)?,
        None => config::load_config(),
    };

    let snippet = match cli.snippet {
        Some(snippet) => snippet,
        None => read_stdin()?,
    };

    let buffer = match &cli.file {
        Some(path) => RopeBuffer::from_file(path).map_err(|source| EmmetError::Io {
            path: path.display().to_string(),
            source,
        })?,
        None => RopeBuffer::new(""),
    };

    let start = cli.at.unwrap_or_else(|| buffer.len_chars());
    let end = cli.end.unwrap_or(start);
    let no_indent = cli.no_indent || config.get_no_indent();

    let mut editor = EmmetEditor::new(buffer.with_selection(start, end)).with_config(config);
    logging::log(
        "CLI",
        &format!(
            "Inserting at {}..{} as {} (profile {})",
            start,
            end,
            editor.syntax(),
            editor.profile_name()
        ),
    );

    let outcome = editor.insert_snippet_in(&snippet, start, end, no_indent)?;
    let (caret_start, caret_end) = outcome.caret();
    eprintln!("caret: {}..{}", caret_start, caret_end);

    let buffer = editor.into_buffer();
    match (&cli.file, cli.in_place) {
        (Some(path), true) => buffer.save(path).map_err(|source| EmmetError::Io {
            path: path.display().to_string(),
            source,
        })?,
        _ => print!("{}", buffer.full_text()),
    }

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut snippet = String::new();
    std::io::stdin()
        .read_to_string(&mut snippet)
        .map_err(|source| EmmetError::Io {
            path: "<stdin>".to_string(),
            source,
        })?;
    Ok(snippet)
}
