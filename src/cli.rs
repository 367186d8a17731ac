//! Command-line interface argument parsing.
//!
//! Every run option is optional here: a value given on the command line
//! overrides `recode.toml`, and an omitted one leaves the file alone.

use clap::Parser;
use std::path::PathBuf;

/// Recode - refactor a source tree with an LLM
///
/// Concatenates the files under the input directory into one prompt,
/// sends it to a remote API or a local Ollama model (or copies it to the
/// clipboard), and unpacks the reply into files using `#@{path}` markers.
///
/// Examples:
///   recode --input-directory ./my-project --output-dir ./refactored
///   recode --local-llm --ollama-model codellama
///   recode --local-llm false --model gpt-4o-mini-2024-07-18
///   recode --clipboard-mode
///   recode --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// File-name suffixes to include (comma-separated or repeated)
    ///
    /// Example: --code-extensions .rs,.toml
    #[arg(
        long,
        alias = "code_extensions",
        value_name = "SUFFIXES",
        num_args = 1..,
        value_delimiter = ','
    )]
    pub code_extensions: Option<Vec<String>>,

    /// Directory that receives the files unpacked from the response
    #[arg(long, alias = "output_dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory containing the code to refactor
    #[arg(long, alias = "input_directory", value_name = "DIR")]
    pub input_directory: Option<PathBuf>,

    /// Remote chat-completion model
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum number of tokens in the remote response
    #[arg(long, alias = "max_tokens", value_name = "COUNT")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature for the remote model
    #[arg(long)]
    pub temperature: Option<f64>,

    /// JSON file holding `openai_api_key`
    #[arg(long, alias = "api_key_path", value_name = "FILE")]
    pub api_key_path: Option<PathBuf>,

    /// Copy the prompt to the clipboard instead of calling a model
    #[arg(
        long,
        alias = "clipboard_mode",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub clipboard_mode: Option<bool>,

    /// Use a local Ollama model instead of the remote API
    #[arg(
        long,
        alias = "local_llm",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub local_llm: Option<bool>,

    /// File that receives the prompt and then the raw response
    #[arg(long, alias = "results_file", value_name = "FILE")]
    pub results_file: Option<PathBuf>,

    /// Ollama model for the local strategy
    #[arg(long, alias = "ollama_model")]
    pub ollama_model: Option<String>,

    /// Path to configuration file
    ///
    /// Created with default settings if it does not exist.
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = crate::config::CONFIG_FILE,
        env = "RECODE_CONFIG"
    )]
    pub config: PathBuf,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Aggregate the input and report what would be sent, without calling a model
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default configuration file and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(temperature) = self.temperature {
            if !temperature.is_finite() || temperature < 0.0 {
                return Err("Temperature must be a non-negative number".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
