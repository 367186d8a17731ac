//! Data models shared across the pipeline.
//!
//! This module contains the core data structures that flow between
//! the aggregator, the prompt builder, the strategies and the
//! demultiplexer.

use std::fmt;
use std::path::PathBuf;

/// Line prefix announcing a new output file in model responses.
///
/// The prompt instructs the model to emit it and the demultiplexer
/// scans for it, so both must use this constant.
pub const MARKER: &str = "#@";

/// A source file picked up by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the input root.
    pub path: PathBuf,
    /// Base file name, used as the aggregate header.
    pub name: String,
    /// Raw UTF-8 content.
    pub content: String,
}

impl FileRecord {
    /// Render the `"\n# {name}\n{content}"` block appended to the aggregate.
    pub fn as_block(&self) -> String {
        format!("\n# {}\n{}", self.name, self.content)
    }
}

/// A file reconstructed from a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Path taken verbatim from the marker line.
    pub path: String,
    /// Block lines joined with `\n`.
    pub content: String,
}

/// The prompt sent to a strategy.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Full instruction text, cleaned content included.
    pub text: String,
    /// The cleaned aggregate embedded in `text`.
    pub cleaned: String,
}

/// Outcome of invoking a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Text returned by a model (possibly empty).
    Response(String),
    /// The prompt went to the clipboard; there is nothing to unpack.
    Copied,
}

/// Which response-producing mechanism is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Clipboard,
    Local,
    Remote,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Clipboard => write!(f, "clipboard"),
            StrategyKind::Local => write!(f, "local LLM"),
            StrategyKind::Remote => write!(f, "remote API"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_record_block() {
        let record = FileRecord {
            path: PathBuf::from("src/lib.rs"),
            name: "lib.rs".to_string(),
            content: "fn a() {}\n".to_string(),
        };
        assert_eq!(record.as_block(), "\n# lib.rs\nfn a() {}\n");
    }

    #[test]
    fn test_strategy_kind_display() {
        assert_eq!(StrategyKind::Clipboard.to_string(), "clipboard");
        assert_eq!(StrategyKind::Local.to_string(), "local LLM");
        assert_eq!(StrategyKind::Remote.to_string(), "remote API");
    }
}
