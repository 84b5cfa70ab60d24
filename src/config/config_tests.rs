use super::*;
use crate::error::{EmmetError, ErrorSeverity};
use crate::syntax::Syntax;
use std::collections::HashMap;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.no_indent, None);
    assert_eq!(config.profiles, None);
    assert_eq!(config.get_no_indent(), DEFAULT_NO_INDENT);
}

#[test]
fn test_builtin_profiles_without_overrides() {
    let config = Config::default();
    assert_eq!(config.get_profile(Syntax::Html), "html");
    assert_eq!(config.get_profile(Syntax::Xml), "xml");
    assert_eq!(config.get_profile(Syntax::Xsl), "xml");
    assert_eq!(config.get_profile(Syntax::Css), "html");
}

#[test]
fn test_profile_override_is_case_insensitive() {
    let config = Config {
        no_indent: None,
        profiles: Some(HashMap::from([("HAML".to_string(), "xhtml".to_string())])),
    };
    assert_eq!(config.get_profile(Syntax::Haml), "xhtml");
    assert_eq!(config.get_profile(Syntax::Html), "html");
}

#[test]
fn test_profile_override_prefers_lowercase_spelling() {
    let json = r#"{"profiles": {"XSL": "upper", "xsl": "lower", "Xsl": "title"}}"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.get_profile(Syntax::Xsl), "lower");

    let config = Config {
        no_indent: None,
        profiles: Some(HashMap::from([
            ("CSS".to_string(), "upper".to_string()),
            ("Css".to_string(), "title".to_string()),
        ])),
    };
    assert_eq!(config.get_profile(Syntax::Css), "title");
}

#[test]
fn test_config_deserialization_camel_case() {
    let json = r#"{"noIndent": true, "profiles": {"xsl": "line"}}"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert!(config.get_no_indent());
    assert_eq!(config.get_profile(Syntax::Xsl), "line");
}

#[test]
fn test_config_serialization_skips_none() {
    let json = serde_json::to_string(&Config::default()).unwrap();
    assert_eq!(json, "{}");
}

#[test]
fn test_load_missing_file_returns_defaults() {
    let dir = tempdir().unwrap();
    let config = load_config_from(&dir.path().join("config.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_valid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"noIndent": true}"#).unwrap();

    let config = load_config_from(&path);
    assert_eq!(config.no_indent, Some(true));
}

#[test]
fn test_load_malformed_file_returns_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ noIndent: yes").unwrap();

    assert_eq!(load_config_from(&path), Config::default());
}

#[test]
fn test_try_load_malformed_file_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ noIndent: yes").unwrap();

    let err = try_load_config_from(&path).unwrap_err();
    assert!(matches!(err, EmmetError::Config(ref msg) if msg.contains("parsing")));
    assert_eq!(err.severity(), ErrorSeverity::Warning);
}

#[test]
fn test_try_load_missing_file_is_ok() {
    let dir = tempdir().unwrap();
    let config = try_load_config_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_path_is_expanded() {
    let path = config_path();
    assert!(!path.to_string_lossy().starts_with('~') || dirs::home_dir().is_none());
    assert!(path.ends_with(".emmet/config.json"));
}
