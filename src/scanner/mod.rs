//! Source file aggregation.
//!
//! This module walks the input directory, keeps the files whose names
//! end with one of the configured suffixes, and folds them into one
//! text blob annotated with filename headers.

use crate::models::FileRecord;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Scanned file information.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Relative path from the input root
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// File scanner for discovering and reading source files.
pub struct FileScanner {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(root: PathBuf, extensions: Vec<String>) -> Self {
        Self { root, extensions }
    }

    /// Check if a file name ends with one of the configured suffixes.
    pub fn is_code_file(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// List all matching files without reading them.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        let mut files = Vec::new();

        for entry in self.walk()? {
            let entry = entry?;
            let size = entry
                .metadata()
                .with_context(|| format!("Failed to stat {}", entry.path().display()))?
                .len();
            files.push(ScannedFile {
                path: self.relative(entry.path()),
                size,
            });
        }

        Ok(files)
    }

    /// Read every matching file in traversal order.
    ///
    /// A matched file that is not valid UTF-8 aborts the whole scan.
    pub fn collect_files(&self) -> Result<Vec<FileRecord>> {
        let mut records = Vec::new();

        for entry in self.walk()? {
            let entry = entry?;
            let path = entry.path();
            let bytes =
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            let content = String::from_utf8(bytes)
                .with_context(|| format!("File is not valid UTF-8: {}", path.display()))?;

            let record = FileRecord {
                path: self.relative(path),
                name: entry.file_name().to_string_lossy().into_owned(),
                content,
            };
            debug!(
                "Aggregating {} ({} bytes)",
                record.path.display(),
                record.content.len()
            );
            records.push(record);
        }

        Ok(records)
    }

    /// Concatenate all matching files into the aggregate text.
    pub fn aggregate(&self) -> Result<String> {
        let records = self.collect_files()?;
        info!(
            "Aggregated {} files from {}",
            records.len(),
            self.root.display()
        );

        Ok(records.iter().map(FileRecord::as_block).collect())
    }

    /// Walk the root depth-first, yielding matched files.
    ///
    /// Within a directory, files come before subdirectories and both are
    /// sorted by name.
    fn walk(&self) -> Result<impl Iterator<Item = Result<DirEntry>> + '_> {
        if !self.root.is_dir() {
            anyhow::bail!("Input directory not found: {}", self.root.display());
        }

        let walker = WalkDir::new(&self.root)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter();

        Ok(walker.filter_map(move |entry| match entry {
            Ok(entry) => {
                if entry.path().is_file() && self.is_code_file(&entry.file_name().to_string_lossy())
                {
                    Some(Ok(entry))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(anyhow::Error::new(e).context(format!(
                "Failed to walk input directory {}",
                self.root.display()
            )))),
        }))
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }
}

/// Collapse every run of whitespace, newlines included, into one space.
pub fn clean_whitespace(content: &str) -> String {
    WHITESPACE_RUN.replace_all(content, " ").into_owned()
}
