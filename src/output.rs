//! Rendering and writing encoded passwords
//!
//! Output either goes to stdout or to a file. Files are written atomically
//! (tempfile in the target directory, fsync, rename) and are readable by
//! the owner only, since they contain the plaintext password.

use crate::error::{CryptpassError, ErrorCategory, ErrorKind, Result};
use crate::pipeline::EncodedOutput;
use clap::ValueEnum;
use std::io::Write;
use std::path::Path;
use zeroize::Zeroizing;

/// Which part of an [`EncodedOutput`] to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputField {
    /// JSON object with all four fields
    #[default]
    All,
    Base64,
    Crypt,
    Hash,
    Plaintext,
}

/// Render `output` as text, terminated by a newline.
pub fn render(output: &EncodedOutput, field: OutputField) -> Result<Zeroizing<String>> {
    let mut rendered = Zeroizing::new(match field {
        OutputField::All => serde_json::to_string_pretty(output).map_err(|e| {
            CryptpassError::with_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to serialize output",
                e,
            )
        })?,
        OutputField::Base64 => output.base64.clone(),
        OutputField::Crypt => output.crypt.clone(),
        OutputField::Hash => output.hash.clone(),
        OutputField::Plaintext => output.plaintext.clone(),
    });
    rendered.push('\n');
    Ok(rendered)
}

/// Atomically replace `path` with `contents`, mode 0o600 on Unix.
pub fn write_secure(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        CryptpassError::with_source(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("failed to create tempfile in {}", dir.display()),
            e,
        )
    })?;

    // The persisted file keeps the tempfile's mode.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))
            .map_err(|e| {
                CryptpassError::with_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to set tempfile permissions",
                    e,
                )
            })?;
    }

    temp_file.write_all(contents).map_err(|e| {
        CryptpassError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write to tempfile",
            e,
        )
    })?;
    temp_file.flush().map_err(|e| {
        CryptpassError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to flush tempfile",
            e,
        )
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        CryptpassError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        CryptpassError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", path.display()),
            e,
        )
    })?;

    tracing::debug!(path = %path.display(), "output written");
    Ok(())
}
