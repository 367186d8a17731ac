//! Clipboard strategy: no model call, the prompt is left for manual use.
//!
//! On Linux a selection lives only as long as the process that owns it, so
//! the text is handed to a detached copy of this binary that keeps serving
//! it until another program takes the clipboard. Other platforms copy the
//! text into the system clipboard directly.

use crate::models::Prompt;
use anyhow::{Context, Result};
use std::ffi::OsStr;
use tracing::info;

/// Set to `1` in the environment of the clipboard helper process.
pub const DAEMON_ENV: &str = "RECODE_CLIPBOARD_DAEMON";

/// Places the prompt on the system clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipboardSink;

impl ClipboardSink {
    pub fn copy(&self, prompt: &Prompt) -> Result<()> {
        let payload = payload(prompt);
        hand_off(&payload)?;
        info!("Copied {} bytes to the clipboard", payload.len());
        Ok(())
    }
}

/// Text placed on the clipboard: the prompt, a blank line, then the cleaned code again.
pub fn payload(prompt: &Prompt) -> String {
    format!("{}\n\n{}", prompt.text, prompt.cleaned)
}

/// Serve the clipboard if this process was started as the helper.
///
/// Returns `true` when the process ran as the helper and should exit.
pub fn run_daemon_if_requested() -> Result<bool> {
    if !daemon_requested(std::env::var_os(DAEMON_ENV).as_deref()) {
        return Ok(false);
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Read;

        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("Failed to read the clipboard payload")?;
        serve_until_replaced(&payload)?;
    }

    Ok(true)
}

fn daemon_requested(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| v == "1")
}

/// Own the selection and block until another program replaces it.
#[cfg(target_os = "linux")]
fn serve_until_replaced(payload: &str) -> Result<()> {
    use arboard::SetExtLinux;

    arboard::Clipboard::new()
        .context("Failed to access the system clipboard")?
        .set()
        .wait()
        .text(payload)
        .context("Failed to copy the prompt to the clipboard")
}

#[cfg(target_os = "linux")]
fn hand_off(payload: &str) -> Result<()> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    // The helper's stderr is discarded, so a missing display must fail here.
    drop(arboard::Clipboard::new().context("Failed to access the system clipboard")?);

    let exe = std::env::current_exe().context("Failed to locate the recode executable")?;
    let mut child = Command::new(exe)
        .env(DAEMON_ENV, "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Failed to start the clipboard helper")?;

    let mut stdin = child
        .stdin
        .take()
        .context("Clipboard helper has no stdin")?;
    stdin
        .write_all(payload.as_bytes())
        .context("Failed to hand the prompt to the clipboard helper")?;

    info!("Clipboard helper started (pid {})", child.id());
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn hand_off(payload: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().context("Failed to access the system clipboard")?;
    clipboard
        .set_text(payload)
        .context("Failed to copy the prompt to the clipboard")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::build_prompt;

    #[test]
    fn test_payload_appends_cleaned_content() {
        let prompt = build_prompt(" # a.py x = 1");
        let text = payload(&prompt);
        assert!(text.starts_with(&prompt.text));
        assert!(text.ends_with("x = 1\n\n # a.py x = 1"));
    }

    #[test]
    fn test_daemon_requested_only_for_exact_flag() {
        assert!(daemon_requested(Some(OsStr::new("1"))));
        assert!(!daemon_requested(Some(OsStr::new("0"))));
        assert!(!daemon_requested(Some(OsStr::new(""))));
        assert!(!daemon_requested(None));
    }

    #[test]
    fn test_normal_process_is_not_the_helper() {
        if std::env::var_os(DAEMON_ENV).is_none() {
            assert!(!run_daemon_if_requested().unwrap());
        }
    }
}
