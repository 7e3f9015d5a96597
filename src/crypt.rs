//! Salted crypt(3) encodings: MD5-crypt (`$1$`), SHA256-crypt (`$5$`) and
//! SHA512-crypt (`$6$`)
//!
//! Every call draws a fresh random salt, so the same password yields a
//! different string each time. Compare results with [`verify`], never by
//! equality.

use crate::error::{CryptpassError, ErrorCategory, ErrorKind, Result};
use crate::generator::PasswordMaterial;
use pwhash::{md5_crypt, sha256_crypt, sha512_crypt};
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptAlgorithm {
    Md5,
    Sha256,
    Sha512,
}

impl CryptAlgorithm {
    pub const ALL: [CryptAlgorithm; 3] = [Self::Md5, Self::Sha256, Self::Sha512];

    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// The `$id$` prefix that opens every encoding of this scheme.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Md5 => "$1$",
            Self::Sha256 => "$5$",
            Self::Sha512 => "$6$",
        }
    }

    /// Identify the scheme of an existing crypt string from its prefix.
    pub fn detect(encoded: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| encoded.starts_with(algorithm.prefix()))
    }
}

impl fmt::Display for CryptAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CryptAlgorithm {
    type Err = CryptpassError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(CryptpassError::new(
                ErrorCategory::User,
                ErrorKind::Algorithm,
                format!("crypt algorithm is not supported: {}", other),
            )),
        }
    }
}

/// Binds a resolved crypt scheme to the material it will encode.
#[derive(Debug, Clone, Copy)]
pub struct CryptInstruction<'a> {
    pub algorithm: CryptAlgorithm,
    pub material: &'a PasswordMaterial,
}

impl CryptInstruction<'_> {
    pub fn execute(&self) -> Result<String> {
        crypt(self.material, self.algorithm)
    }
}

/// Encode `material` with `algorithm` and a freshly generated salt.
// md5-crypt and sha256-crypt are deprecated upstream but required for crypt(3) compatibility.
#[allow(deprecated)]
pub fn crypt(material: &PasswordMaterial, algorithm: CryptAlgorithm) -> Result<String> {
    tracing::debug!(%algorithm, bytes = material.len(), "crypting password");

    let password = material.as_bytes();
    let encoded = match algorithm {
        CryptAlgorithm::Md5 => md5_crypt::hash(password),
        CryptAlgorithm::Sha256 => sha256_crypt::hash(password),
        CryptAlgorithm::Sha512 => sha512_crypt::hash(password),
    }
    .map_err(crypt_error)?;

    tracing::trace!(%algorithm, "crypt created");
    Ok(encoded)
}

/// Encode `material` using a caller-supplied setup string such as
/// `$6$saltstring` or `$5$rounds=10000$saltstring`.
///
/// The setup must name the same scheme as `algorithm`.
#[allow(deprecated)]
pub fn crypt_with_setup(
    material: &PasswordMaterial,
    algorithm: CryptAlgorithm,
    setup: &str,
) -> Result<String> {
    if !setup.starts_with(algorithm.prefix()) {
        return Err(CryptpassError::new(
            ErrorCategory::User,
            ErrorKind::Crypt,
            format!(
                "crypt generation failed: {} setup must start with {}",
                algorithm,
                algorithm.prefix()
            ),
        ));
    }

    let password = material.as_bytes();
    match algorithm {
        CryptAlgorithm::Md5 => md5_crypt::hash_with(setup, password),
        CryptAlgorithm::Sha256 => sha256_crypt::hash_with(setup, password),
        CryptAlgorithm::Sha512 => sha512_crypt::hash_with(setup, password),
    }
    .map_err(crypt_error)
}

/// Check `password` against an encoding produced by `algorithm`.
#[allow(deprecated)]
pub fn verify(algorithm: CryptAlgorithm, password: &[u8], encoded: &str) -> bool {
    match algorithm {
        CryptAlgorithm::Md5 => md5_crypt::verify(password, encoded),
        CryptAlgorithm::Sha256 => sha256_crypt::verify(password, encoded),
        CryptAlgorithm::Sha512 => sha512_crypt::verify(password, encoded),
    }
}

fn crypt_error<E>(err: E) -> CryptpassError
where
    E: StdError + Send + Sync + 'static,
{
    CryptpassError::with_source(
        ErrorCategory::Internal,
        ErrorKind::Crypt,
        "crypt generation failed",
        err,
    )
}
