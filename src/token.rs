// Token persistence: a small JSON file holding the access token created by
// the `token` command, read back by the `create` command. Lives in the
// user's home directory by default so it survives between runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::TokenRecord;

const TOKEN_FILE_NAME: &str = ".gistit_token";

/// Shape written to disk by `save`.
#[derive(Serialize)]
struct TokenFile<'a> {
    token_id: &'a Value,
    token: &'a str,
    fingerprint: &'a str,
}

/// Only the `token` field is required when reading; files written by other
/// tools or older versions may carry extra fields.
#[derive(Deserialize)]
struct StoredToken {
    token: String,
}

/// Default token file path, `~/.gistit_token`.
pub fn default_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(TOKEN_FILE_NAME)
}

/// Read the access token out of the token file.
pub fn load(path: &Path) -> Result<String> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read token file {}", path.display()))?;
    let stored: StoredToken = serde_json::from_str(&data)
        .with_context(|| format!("malformed token file {}", path.display()))?;
    Ok(stored.token)
}

/// Write a freshly created authorization to the token file.
pub fn save(path: &Path, record: &TokenRecord) -> Result<()> {
    let file = TokenFile {
        token_id: &record.id,
        token: &record.token,
        fingerprint: &record.fingerprint,
    };
    let data = serde_json::to_string(&file).context("failed to encode token file")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write token file {}", path.display()))?;
    Ok(())
}
