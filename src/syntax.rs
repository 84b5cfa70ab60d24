//! Syntax identification from file extensions
//!
//! Emmet only distinguishes a handful of syntaxes. Anything it does not know
//! about is treated as HTML.

/// Syntaxes understood by the expansion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Syntax {
    #[default]
    Html,
    Xml,
    Css,
    Haml,
    Xsl,
}

impl Syntax {
    /// All supported syntaxes, in display order
    pub const ALL: [Syntax; 5] = [
        Syntax::Html,
        Syntax::Xml,
        Syntax::Css,
        Syntax::Haml,
        Syntax::Xsl,
    ];

    /// Map a file extension (without the dot) to a syntax.
    ///
    /// Matching is case-insensitive; unknown or missing extensions map to HTML.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension.map(str::to_lowercase).as_deref() {
            Some("xml") => Syntax::Xml,
            Some("css") => Syntax::Css,
            Some("haml") => Syntax::Haml,
            Some("xsl") => Syntax::Xsl,
            _ => Syntax::Html,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::Html => "html",
            Syntax::Xml => "xml",
            Syntax::Css => "css",
            Syntax::Haml => "haml",
            Syntax::Xsl => "xsl",
        }
    }

    /// Built-in output profile for this syntax
    pub fn default_profile(&self) -> &'static str {
        match self {
            Syntax::Xml | Syntax::Xsl => "xml",
            Syntax::Html | Syntax::Css | Syntax::Haml => "html",
        }
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
