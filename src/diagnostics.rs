//! Advisory messages collected while transforming styles.
//!
//! Nothing in here aborts a build: selector and declaration problems are recorded and
//! reported to the host once the file is done.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

/// Source position of a CSS node as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub start: LineColumn,
    #[serde(default)]
    pub end: Option<LineColumn>,
}

impl Position {
    pub fn at(line: u32, column: u32) -> Self {
        Position {
            start: LineColumn { line, column },
            end: None,
        }
    }
}

/// Sink for advisory messages.
pub trait MessageSink {
    fn push_error(&mut self, message: String);
    fn push_warning(&mut self, message: String);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

impl MessageSink for Diagnostics {
    fn push_error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn push_warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}
