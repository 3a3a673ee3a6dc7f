//! Configuration file handling
//!
//! `tactile` reads an optional TOML file describing screen size, springs
//! and gesture budgets. Without one, the built-in defaults apply.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tactile_app::InteractionConfig;

/// Load the interaction config from `path`, or the defaults if `None`
pub fn load(path: Option<&Path>) -> Result<InteractionConfig> {
    let Some(path) = path else {
        return Ok(InteractionConfig::default());
    };

    if !path.exists() {
        anyhow::bail!(
            "No config found at {}. Run `tactile config > {}` to create one.",
            path.display(),
            path.display()
        );
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = InteractionConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// The default configuration rendered as TOML
pub fn default_toml() -> Result<String> {
    InteractionConfig::default()
        .to_toml_string()
        .context("Failed to serialize default config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_uses_defaults() {
        assert_eq!(load(None).unwrap(), InteractionConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load(Some(Path::new("/nonexistent/tactile.toml"))).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }

    #[test]
    fn test_default_toml_parses_back() {
        let text = default_toml().unwrap();
        assert!(text.contains("[modal]"));
        assert_eq!(
            InteractionConfig::from_toml_str(&text).unwrap(),
            InteractionConfig::default()
        );
    }
}
