//! Local model runner.
//!
//! Shells out to an installed Ollama binary. Every failure here is
//! recovered: the caller gets an empty response and the pipeline keeps
//! going.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Why a local run produced no output.
#[derive(Debug, Error)]
pub enum LocalRunError {
    #[error("{0} command-line tool is not installed. Please install it to proceed.")]
    NotInstalled(String),

    #[error("failed to start `{binary} {step}`: {source}")]
    Spawn {
        binary: String,
        step: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("`{binary} {step}` exited with {status}: {stderr}")]
    Failed {
        binary: String,
        step: &'static str,
        status: ExitStatus,
        stderr: String,
    },
}

/// Runs prompts through `<binary> run <model>`.
#[derive(Debug, Clone)]
pub struct LocalRunner {
    binary: String,
    model: String,
}

impl LocalRunner {
    pub fn new(binary: String, model: String) -> Self {
        Self { binary, model }
    }

    /// Run the prompt, returning an empty string on any failure.
    pub async fn invoke(&self, prompt: &str) -> String {
        match self.try_invoke(prompt).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Local model run failed: {}", e);
                println!("⚠️  Error running the Ollama model: {}", e);
                String::new()
            }
        }
    }

    /// Fetch the model if needed, then run the prompt through it.
    pub async fn try_invoke(&self, prompt: &str) -> Result<String, LocalRunError> {
        let binary = self.locate()?;

        info!("Ensuring model {} is available", self.model);
        self.run_step(&binary, "pull", &[]).await?;

        info!("Running prompt through {}", self.model);
        let stdout = self.run_step(&binary, "run", &[prompt]).await?;
        debug!("Local model returned {} bytes", stdout.len());

        Ok(stdout)
    }

    fn locate(&self) -> Result<PathBuf, LocalRunError> {
        which::which(&self.binary).map_err(|e| {
            debug!("Lookup of {} failed: {}", self.binary, e);
            LocalRunError::NotInstalled(self.binary.clone())
        })
    }

    async fn run_step(
        &self,
        binary: &Path,
        step: &'static str,
        extra: &[&str],
    ) -> Result<String, LocalRunError> {
        let output = Command::new(binary)
            .arg(step)
            .arg(&self.model)
            .args(extra)
            .output()
            .await
            .map_err(|source| LocalRunError::Spawn {
                binary: self.binary.clone(),
                step,
                source,
            })?;

        if !output.status.success() {
            return Err(LocalRunError::Failed {
                binary: self.binary.clone(),
                step,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
