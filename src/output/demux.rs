//! Response demultiplexer.
//!
//! Splits a flat model response into files using `#@{path}` marker
//! lines and writes them under an output root.
//!
//! Marker paths are joined to the root verbatim. `..` segments and
//! absolute paths are not rejected and can escape the output root.

use crate::models::{OutputFile, MARKER};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Scanner state.
#[derive(Debug, Default)]
enum State {
    /// No file open; non-marker lines are dropped.
    #[default]
    Idle,
    /// Accumulating lines for `path`.
    Open { path: String, lines: Vec<String> },
}

/// Line-oriented two-state splitter.
#[derive(Debug, Default)]
pub struct Demultiplexer {
    state: State,
    files: Vec<OutputFile>,
}

impl Demultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one response line.
    pub fn feed_line(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix(MARKER) {
            self.flush();
            let path = rest.trim();
            // An empty path opens nothing, so its block is dropped.
            if !path.is_empty() {
                self.state = State::Open {
                    path: path.to_string(),
                    lines: Vec::new(),
                };
            }
        } else if let State::Open { lines, .. } = &mut self.state {
            lines.push(line.to_string());
        }
    }

    /// Flush the open file, if any, and return every file seen.
    pub fn finish(mut self) -> Vec<OutputFile> {
        self.flush();
        self.files
    }

    fn flush(&mut self) {
        if let State::Open { path, lines } = std::mem::take(&mut self.state) {
            debug!("Closing block for {} ({} lines)", path, lines.len());
            self.files.push(OutputFile {
                path,
                content: lines.join("\n"),
            });
        }
    }
}

/// Split a response into output files without touching the filesystem.
pub fn parse(response: &str) -> Vec<OutputFile> {
    let mut demux = Demultiplexer::new();
    for line in response.lines() {
        demux.feed_line(line);
    }
    demux.finish()
}

/// Write files under `output_root`, creating parent directories and
/// overwriting existing files. Returns the written paths in order.
pub fn materialize(files: &[OutputFile], output_root: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let target = output_root.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&target, &file.content)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        debug!("Wrote {} ({} bytes)", target.display(), file.content.len());
        written.push(target);
    }

    Ok(written)
}

/// Parse `response` and write every file it announces under `output_root`.
pub fn save_results(response: &str, output_root: &Path) -> Result<Vec<PathBuf>> {
    let files = parse(response);
    if files.is_empty() {
        info!("No {} markers in response; nothing to write", MARKER);
    }
    materialize(&files, output_root)
}
