//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Re-indent inserted snippets by default
pub const DEFAULT_NO_INDENT: bool = false;

/// Location of the user config file (tilde-expanded at load time)
pub const DEFAULT_CONFIG_PATH: &str = "~/.emmet/config.json";
