//! Error types for page decoration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decorating a page.
#[derive(Debug, Error)]
pub enum DecorateError {
    /// The parsed document has no `<body>` element to decorate.
    #[error("document has no <body> element")]
    MissingBody,

    /// The typesetting collaborator failed; decoration is aborted.
    #[error("typesetting failed: {0}")]
    Typeset(#[from] TypesetError),

    /// Serializing the decorated DOM back to HTML failed.
    #[error("cannot serialize decorated document: {0}")]
    Serialize(#[source] std::io::Error),
}

/// Errors raised by a [`MathRenderer`](crate::typeset::MathRenderer).
#[derive(Debug, Error)]
pub enum TypesetError {
    /// The renderer process could not be started or talked to.
    #[error("cannot run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited unsuccessfully.
    #[error("`{command}` rejected `{tex}`: {stderr}")]
    Rejected {
        /// Command line that was run.
        command: String,
        /// The math source that was rejected.
        tex: String,
        /// Captured standard error of the renderer.
        stderr: String,
    },

    /// The renderer produced output that is not UTF-8.
    #[error("`{command}` produced non UTF-8 output")]
    InvalidOutput {
        /// Command line that was run.
        command: String,
    },
}

/// Errors raised while loading a [`DecoratorConfig`](crate::config::DecoratorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}
