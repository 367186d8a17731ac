//! Model invocation strategies.
//!
//! A run picks exactly one [`Strategy`] from the merged configuration.
//! When several mode flags are set, clipboard wins over local, and local
//! wins over remote.

pub mod clipboard;
pub mod local;
pub mod remote;

pub use clipboard::ClipboardSink;
pub use local::LocalRunner;
pub use remote::RemoteClient;

use crate::config::Config;
use crate::models::{Invocation, Prompt, StrategyKind};
use anyhow::Result;
use tracing::info;

/// Pick the strategy kind for a configuration.
pub fn select_kind(config: &Config) -> StrategyKind {
    if config.clipboard_mode {
        StrategyKind::Clipboard
    } else if config.local_llm {
        StrategyKind::Local
    } else {
        StrategyKind::Remote
    }
}

/// A response-producing mechanism.
pub enum Strategy {
    Clipboard(ClipboardSink),
    Local(LocalRunner),
    Remote(RemoteClient),
}

impl Strategy {
    /// Build the strategy selected by `config`.
    ///
    /// Only the remote strategy reads the credential file, so a missing
    /// key is an error only when it is actually needed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let kind = select_kind(config);
        info!("Selected {} strategy", kind);

        Ok(match kind {
            StrategyKind::Clipboard => Strategy::Clipboard(ClipboardSink),
            StrategyKind::Local => Strategy::Local(LocalRunner::new(
                config.ollama_binary.clone(),
                config.ollama_model.clone(),
            )),
            StrategyKind::Remote => {
                let api_key = config.load_api_key()?;
                Strategy::Remote(RemoteClient::new(config, api_key)?)
            }
        })
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Clipboard(_) => StrategyKind::Clipboard,
            Strategy::Local(_) => StrategyKind::Local,
            Strategy::Remote(_) => StrategyKind::Remote,
        }
    }

    /// Hand the prompt to the underlying mechanism.
    pub async fn invoke(&self, prompt: &Prompt) -> Result<Invocation> {
        match self {
            Strategy::Clipboard(sink) => {
                sink.copy(prompt)?;
                Ok(Invocation::Copied)
            }
            Strategy::Local(runner) => Ok(Invocation::Response(runner.invoke(&prompt.text).await)),
            Strategy::Remote(client) => {
                Ok(Invocation::Response(client.complete(&prompt.text).await?))
            }
        }
    }
}
