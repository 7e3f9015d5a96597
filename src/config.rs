//! Caller-facing configuration record
//!
//! Mirrors the knobs a host exposes: which crypt scheme and digest to use, an
//! optional explicit password, and the length of a generated one. Values can
//! come from a JSON file and be overridden field by field.

use crate::error::{CryptpassError, ErrorCategory, ErrorKind, Result};
use crate::input::InputReader;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use zeroize::Zeroizing;

pub const DEFAULT_CRYPT: &str = "sha512";
pub const DEFAULT_HASH: &str = "md5";
pub const DEFAULT_LENGTH: usize = 32;

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    /// crypt(3) scheme for the `crypt` output: md5, sha256 or sha512.
    pub crypt: String,
    /// Digest for the `hash` output: md5, sha256 or sha512.
    pub hash: String,
    /// Password to encode instead of generating one. Wiped on drop.
    #[serde(deserialize_with = "deserialize_input")]
    pub input: Option<Zeroizing<String>>,
    /// Length of a generated password. Ignored when `input` is set.
    pub length: Option<usize>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            crypt: DEFAULT_CRYPT.to_string(),
            hash: DEFAULT_HASH.to_string(),
            input: None,
            length: None,
        }
    }
}

fn deserialize_input<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Zeroizing<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(Zeroizing::new))
}

impl fmt::Debug for PasswordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordConfig")
            .field("crypt", &self.crypt)
            .field("hash", &self.hash)
            .field("input", &self.input.as_ref().map(|_| "<redacted>"))
            .field("length", &self.length)
            .finish()
    }
}

impl PasswordConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            CryptpassError::with_source(
                ErrorCategory::User,
                ErrorKind::Config,
                format!("invalid configuration: {}", e),
                e,
            )
        })?;
        Ok(config.normalized())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            let category = if e.kind() == io::ErrorKind::NotFound {
                ErrorCategory::User
            } else {
                ErrorCategory::Internal
            };
            CryptpassError::with_source(
                category,
                ErrorKind::Config,
                format!("failed to read config from {}", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
            .map_err(|e| e.with_context(format!("failed to load config from {}", path.display())))
    }

    /// Fill unset fields with their defaults.
    ///
    /// Empty algorithm names mean "use the default" and an empty input means
    /// no input. A length of zero is kept and rejected by the pipeline.
    pub fn normalized(mut self) -> Self {
        if self.crypt.is_empty() {
            tracing::debug!(crypt = DEFAULT_CRYPT, "overriding crypt");
            self.crypt = DEFAULT_CRYPT.to_string();
        }
        if self.hash.is_empty() {
            tracing::debug!(hash = DEFAULT_HASH, "overriding hash");
            self.hash = DEFAULT_HASH.to_string();
        }
        if self.explicit_input().is_none() {
            self.input = None;
        }
        self
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = Some(Zeroizing::new(input.into()));
    }

    /// Replace `input` with whatever `reader` produces.
    pub fn read_input_from(&mut self, reader: &mut dyn InputReader) -> Result<()> {
        self.input = Some(reader.read_input()?);
        Ok(())
    }

    pub fn explicit_input(&self) -> Option<&str> {
        self.input
            .as_deref()
            .map(String::as_str)
            .filter(|input| !input.is_empty())
    }

    /// Length the pipeline will work with: the input's byte length when an
    /// input is present, otherwise the requested or default length.
    pub fn effective_length(&self) -> usize {
        match self.explicit_input() {
            Some(input) => input.len(),
            None => self.length.unwrap_or(DEFAULT_LENGTH),
        }
    }
}
