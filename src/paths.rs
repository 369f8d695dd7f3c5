// Filename derivation: maps a batch of absolute filesystem paths to the
// flat remote filenames a gist can hold. Pure string manipulation, no
// filesystem access; callers resolve paths to absolute form first.

use std::collections::HashMap;

use clap::ValueEnum;
use thiserror::Error;

/// How remote filenames are derived from local paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NamingMode {
    /// Encode each path's position relative to the batch's common ancestor
    /// directory, so `sub1/spam` and `sub2/spam` become `sub1-spam` and
    /// `sub2-spam` instead of colliding.
    #[default]
    Contextual,
    /// Use only the last path component. Fails when two files share a
    /// basename.
    Flat,
}

#[derive(Debug, Error)]
pub enum DeriveError {
    /// Two input paths reduced to the same remote filename in flat mode.
    /// Aborts the whole batch before anything is read or submitted.
    #[error("duplicate remote filename {filename:?} from {first} and {second}")]
    DuplicateFilename {
        filename: String,
        first: String,
        second: String,
    },
}

/// Return a list of `(path, gist_filename)` pairs, one per input path, in
/// input order. All paths must already be absolute.
pub fn derive(
    paths: &[String],
    mode: NamingMode,
) -> Result<Vec<(String, String)>, DeriveError> {
    debug_assert!(!paths.is_empty());
    debug_assert!(paths.iter().all(|p| p.starts_with('/')));
    match mode {
        NamingMode::Contextual => Ok(derive_contextual(paths)),
        NamingMode::Flat => derive_flat(paths),
    }
}

/// Contextual names are the path relative to the batch's common ancestor,
/// with separators replaced by `-`. Distinct paths always produce distinct
/// relative paths, so this mode cannot collide.
fn derive_contextual(paths: &[String]) -> Vec<(String, String)> {
    let ancestor = common_ancestor(paths);
    paths
        .iter()
        .map(|path| {
            let gist_filename = path[ancestor.len()..].replace('/', "-");
            (path.clone(), gist_filename)
        })
        .collect()
}

/// Flat names are plain basenames. The first duplicate aborts the batch so
/// no file silently shadows another inside the gist.
fn derive_flat(paths: &[String]) -> Result<Vec<(String, String)>, DeriveError> {
    let mut seen: HashMap<String, &String> = HashMap::new();
    let mut pairs = Vec::with_capacity(paths.len());
    for path in paths {
        let gist_filename = basename(path).to_string();
        if let Some(first) = seen.get(&gist_filename) {
            return Err(DeriveError::DuplicateFilename {
                filename: gist_filename.clone(),
                first: (*first).clone(),
                second: path.clone(),
            });
        }
        seen.insert(gist_filename.clone(), path);
        pairs.push((path.clone(), gist_filename));
    }
    Ok(pairs)
}

/// Common ancestor directory of a non-empty batch of absolute paths,
/// always separator-terminated so relative paths are a plain substring.
///
/// A longest-common-prefix of the raw strings might stop mid-component
/// (`/foo/ba` for `/foo/bar` + `/foo/baz`), so the prefix is truncated back
/// to the last separator. Paths with no shared directory reduce to `/`.
pub fn common_ancestor(paths: &[String]) -> String {
    debug_assert!(!paths.is_empty());
    if let [only] = paths {
        // The "ancestor" of a single path is its parent directory, so the
        // relative path is exactly the basename.
        return parent_dir(only).to_string();
    }
    let prefix = longest_common_prefix(paths);
    if prefix.ends_with('/') {
        return prefix.to_string();
    }
    parent_dir(prefix).to_string()
}

/// Everything up to and including the last separator (`/` for a root-level
/// path).
fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx + 1],
        None => "/",
    }
}

fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

fn longest_common_prefix(paths: &[String]) -> &str {
    let mut prefix: &str = &paths[0];
    for path in &paths[1..] {
        let mut len = prefix
            .as_bytes()
            .iter()
            .zip(path.as_bytes())
            .take_while(|(a, b)| a == b)
            .count();
        // Byte comparison can stop inside a multi-byte character.
        while !prefix.is_char_boundary(len) {
            len -= 1;
        }
        prefix = &prefix[..len];
    }
    prefix
}
