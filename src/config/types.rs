//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::defaults::*;
use crate::syntax::Syntax;

/// User settings for snippet insertion.
///
/// Every field is optional in the JSON file; use the `get_*` accessors to read
/// values with defaults applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Skip re-indentation of inserted snippets (default: false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_indent: Option<bool>,
    /// Output profile per syntax, e.g. `{"xsl": "xml"}`. Keys are matched
    /// case-insensitively against syntax names; see [`Config::get_profile`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<HashMap<String, String>>,
}

impl Config {
    /// Returns whether snippets skip re-indentation, or DEFAULT_NO_INDENT if not configured
    pub fn get_no_indent(&self) -> bool {
        self.no_indent.unwrap_or(DEFAULT_NO_INDENT)
    }

    /// Returns the profile configured for `syntax`, or its built-in profile.
    ///
    /// When several keys differ only in case, the greatest one wins, which is
    /// the all-lowercase spelling if present.
    pub fn get_profile(&self, syntax: Syntax) -> String {
        self.profiles
            .as_ref()
            .and_then(|profiles| {
                profiles
                    .iter()
                    .filter(|(name, _)| name.eq_ignore_ascii_case(syntax.as_str()))
                    .max_by(|(a, _), (b, _)| a.cmp(b))
                    .map(|(_, profile)| profile.clone())
            })
            .unwrap_or_else(|| syntax.default_profile().to_string())
    }
}
