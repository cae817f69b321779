use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

use crate::platform::Platform;

/// Fatal, per-file loader failures. Advisory style problems never end up here, they are
/// collected in [`crate::diagnostics::Diagnostics`].
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("[{}] failed to compile component {}", platform.name(), resource.display())]
    Compile {
        platform: Platform,
        resource: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to process styles of {}", resource.display())]
    StyleProcess {
        resource: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid loader options: {0}")]
    InvalidOptions(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoaderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoaderError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Render an error and its whole `source()` chain, one cause per indented line.
pub fn render_error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = format!("Error: {}", err);
    let mut depth = 1;
    let mut current = err.source();
    while let Some(cause) = current {
        out.push('\n');
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        out.push_str(&cause.to_string());
        depth += 1;
        current = cause.source();
    }
    out
}
