// Command surface: clap subcommands mirroring the two flows the tool
// supports, plus the handlers that wire paths -> deriver -> API client.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{ApiClient, ApiError};
use crate::paths::{self, NamingMode};
use crate::token;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gistit")]
#[command(about = "Upload local files as a GitHub gist", long_about = None)]
pub struct Cli {
    /// Path to the token file.
    #[arg(long, short, global = true, value_name = "path")]
    pub token: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create a new gist from one or more files.
    Create {
        /// Files to upload.
        #[arg(value_name = "file", required = true)]
        file_paths: Vec<PathBuf>,

        /// Gist description.
        #[arg(long, short, default_value = "")]
        description: String,

        /// Create as a public gist.
        #[arg(long, short)]
        public: bool,

        /// Create anonymously, without the stored token.
        #[arg(long, short)]
        anonymous: bool,

        /// How remote filenames are derived from the local paths.
        #[arg(long, value_enum, default_value = "contextual")]
        naming: NamingMode,
    },

    /// Create a new gist access token and store it in the token file.
    Token {
        /// Github username or email.
        username: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let token_file = cli.token.unwrap_or_else(token::default_path);

        match cli.command {
            CliCommand::Create {
                file_paths,
                description,
                public,
                anonymous,
                naming,
            } => run_create(&token_file, &file_paths, &description, public, anonymous, naming),
            CliCommand::Token { username } => run_token(&token_file, &username),
        }
    }
}

/// Resolve the input paths, derive remote filenames, submit the gist and
/// print its URL to stdout.
fn run_create(
    token_file: &Path,
    file_paths: &[PathBuf],
    description: &str,
    public: bool,
    anonymous: bool,
    naming: NamingMode,
) -> Result<()> {
    let mut absolute = Vec::with_capacity(file_paths.len());
    for path in file_paths {
        let canonical = fs::canonicalize(path)
            .with_context(|| format!("cannot resolve {}", path.display()))?;
        let as_str = canonical
            .to_str()
            .with_context(|| format!("non-UTF-8 path {}", canonical.display()))?;
        absolute.push(as_str.to_string());
    }

    // Naming conflicts abort here, before any file content is read and
    // before anything goes over the wire.
    let items = paths::derive(&absolute, naming)?;
    for (path, gist_filename) in &items {
        tracing::info!("{} -> {}", path, gist_filename);
    }

    let token = if anonymous {
        None
    } else {
        Some(token::load(token_file)?)
    };
    let api = ApiClient::from_env(token)?;

    let spinner = spinner("Creating gist...");
    let result = api.new_gist(&items, description, public);
    spinner.finish_and_clear();

    match result {
        Ok(gist_url) => {
            println!("{}", gist_url);
            Ok(())
        }
        Err(err) => Err(report_api_error(err)),
    }
}

/// Prompt for the account password, request a gist-scoped token and store
/// it in the token file.
fn run_token(token_file: &Path, username: &str) -> Result<()> {
    let password = Password::new()
        .with_prompt(format!("Password for {}", username))
        .interact()?;

    let api = ApiClient::from_env(None)?;

    let spinner = spinner("Requesting token...");
    let result = api.new_gist_token(username, &password);
    spinner.finish_and_clear();

    let record = match result {
        Ok(record) => record,
        Err(err) => return Err(report_api_error(err)),
    };

    eprintln!("Saving token to {}", token_file.display());
    token::save(token_file, &record)?;
    Ok(())
}

/// Print the structured context of a remote failure to stderr before
/// handing the error up to `main`. The server's response body usually says
/// exactly what was wrong (bad credentials, validation failure, ...).
fn report_api_error(err: ApiError) -> anyhow::Error {
    if let ApiError::Remote { body, .. } = &err {
        let rendered =
            serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
        eprintln!("{}", rendered);
    }
    err.into()
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
