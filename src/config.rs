//! Configuration file handling.
//!
//! This module handles loading the persisted `recode.toml` document,
//! creating it with defaults when it is missing, and merging CLI
//! overrides on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "recode.toml";

/// Merged run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File-name suffixes to aggregate.
    pub code_extensions: Vec<String>,

    /// Root directory for files unpacked from the response.
    pub output_dir: PathBuf,

    /// Directory whose files are sent to the model.
    pub input_directory: PathBuf,

    /// Remote chat-completion model.
    pub model: String,

    /// Maximum tokens in the remote response.
    pub max_tokens: u32,

    /// Sampling temperature for the remote model.
    pub temperature: f64,

    /// JSON credential file holding `openai_api_key`.
    pub api_key_path: PathBuf,

    /// Copy the prompt to the clipboard instead of calling a model.
    pub clipboard_mode: bool,

    /// Run the prompt through a local Ollama model.
    pub local_llm: bool,

    /// Receives the prompt, then the raw response.
    pub results_file: PathBuf,

    /// Ollama model name for the local strategy.
    pub ollama_model: String,

    /// Ollama executable looked up on `PATH`.
    pub ollama_binary: String,

    /// Base URL of the OpenAI-compatible API.
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            code_extensions: default_extensions(),
            output_dir: PathBuf::from("output_directory"),
            input_directory: PathBuf::from("path_to_input_directory"),
            model: "gpt-4o-mini-2024-07-18".to_string(),
            max_tokens: 100_000,
            temperature: 0.7,
            api_key_path: PathBuf::from(".secret"),
            clipboard_mode: false,
            local_llm: true,
            results_file: PathBuf::from("results.txt"),
            ollama_model: "mistral".to_string(),
            ollama_binary: "ollama".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![
        ".py", ".js", ".java", ".cpp", ".cs", ".html", ".css", ".json", ".yaml", ".yml", ".xml",
        ".md", ".txt", ".go", ".rb", ".php", ".ts", ".tsx", ".vue", ".rs", ".swift", ".kt", ".sh",
        ".bat", ".pl", ".pm", ".r", ".sql", ".ini", ".toml",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Credential document for the remote API.
#[derive(Debug, Deserialize)]
struct Secrets {
    openai_api_key: String,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration, writing a default file first if none exists.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())
                .with_context(|| format!("Failed to write config file: {}", path.display()))?;
            println!(
                "⚙️  Configuration file created with default settings: {}",
                path.display()
            );
        }

        info!("Loading config from: {}", path.display());
        Self::load(path)
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only options the user actually supplied override the file values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref extensions) = args.code_extensions {
            self.code_extensions = extensions.clone();
        }
        if let Some(ref dir) = args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(ref dir) = args.input_directory {
            self.input_directory = dir.clone();
        }
        if let Some(ref model) = args.model {
            self.model = model.clone();
        }
        if let Some(max_tokens) = args.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = args.temperature {
            self.temperature = temperature;
        }
        if let Some(ref path) = args.api_key_path {
            self.api_key_path = path.clone();
        }
        if let Some(clipboard_mode) = args.clipboard_mode {
            self.clipboard_mode = clipboard_mode;
        }
        if let Some(local_llm) = args.local_llm {
            self.local_llm = local_llm;
        }
        if let Some(ref path) = args.results_file {
            self.results_file = path.clone();
        }
        if let Some(ref model) = args.ollama_model {
            self.ollama_model = model.clone();
        }

        debug!("Merged config: {:?}", self);
    }

    /// Check the merged configuration before it is used.
    ///
    /// An empty suffix would match every file, so it is rejected whether it
    /// came from the file or from `--code-extensions`.
    pub fn validate(&self) -> Result<()> {
        if self.code_extensions.iter().any(|ext| ext.is_empty()) {
            anyhow::bail!("Code extensions must not be empty strings");
        }
        Ok(())
    }

    /// Read the API key from the credential file.
    pub fn load_api_key(&self) -> Result<String> {
        let path = &self.api_key_path;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credential file: {}", path.display()))?;

        let secrets: Secrets = serde_json::from_str(&content)
            .with_context(|| format!("Malformed credential file: {}", path.display()))?;

        Ok(secrets.openai_api_key)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
