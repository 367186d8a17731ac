//! Results file handling.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Overwrite `path` with `content` and announce it.
pub fn save_to_file(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    println!("💾 Results saved to {}", path.display());
    Ok(())
}
