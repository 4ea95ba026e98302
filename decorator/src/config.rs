//! Decorator configuration, loadable from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock behaviour:
//!
//! ```toml
//! inject_toggle_script = true
//!
//! [markers]
//! theorem = "math-theorem"
//! proof = "math-proof"
//! case = "math-case"
//! otherwise = "otherwise"
//! title_attr = "data-title"
//! rule_attr = "data-rule"
//!
//! [typeset]
//! delimiters = [
//!     { left = "$$", right = "$$", display = true },
//!     { left = "$", right = "$", display = false },
//!     { left = "\\(", right = "\\)", display = false },
//!     { left = "\\[", right = "\\]", display = true },
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::typeset::TypesetConfig;

/// Top-level decorator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorConfig {
    /// Marker classes and attributes identifying the blocks to decorate.
    pub markers: Markers,
    /// Delimiters handed to the typesetting routine.
    pub typeset: TypesetConfig,
    /// Append the browser-side proof toggle script to `<body>`.
    pub inject_toggle_script: bool,
}

impl Default for DecoratorConfig {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            typeset: TypesetConfig::default(),
            inject_toggle_script: true,
        }
    }
}

impl DecoratorConfig {
    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Marker classes and data attributes read from the input page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Class marking a theorem block.
    pub theorem: String,
    /// Class marking a proof block.
    pub proof: String,
    /// Class marking a case block.
    pub case: String,
    /// Class flagging a case block as the catch-all branch.
    pub otherwise: String,
    /// Attribute holding a theorem's title.
    pub title_attr: String,
    /// Attribute holding a case's rule label.
    pub rule_attr: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            theorem: "math-theorem".to_string(),
            proof: "math-proof".to_string(),
            case: "math-case".to_string(),
            otherwise: "otherwise".to_string(),
            title_attr: "data-title".to_string(),
            rule_attr: "data-rule".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config: DecoratorConfig = toml::from_str("").expect("parse");
        assert_eq!(config, DecoratorConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: DecoratorConfig = toml::from_str(
            r#"
inject_toggle_script = false

[markers]
theorem = "thm"
"#,
        )
        .expect("parse");
        assert!(!config.inject_toggle_script);
        assert_eq!(config.markers.theorem, "thm");
        assert_eq!(config.markers.proof, "math-proof");
        assert_eq!(config.typeset.delimiters.len(), 4);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = DecoratorConfig::load(Path::new("/nonexistent/bokuteki.toml"))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
