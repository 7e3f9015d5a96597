//! Plain, unsalted digests of password material, hex encoded

use crate::error::{CryptpassError, ErrorCategory, ErrorKind, Result};
use crate::generator::PasswordMaterial;
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [Self::Md5, Self::Sha256, Self::Sha512];

    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Length of the lowercase hex encoding of this digest.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptpassError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(CryptpassError::new(
                ErrorCategory::User,
                ErrorKind::Algorithm,
                format!("hash algorithm is not supported: {}", other),
            )),
        }
    }
}

/// A resolved digest together with the hex length it must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashInstruction {
    pub algorithm: HashAlgorithm,
    pub expected_len: usize,
}

impl HashInstruction {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            expected_len: algorithm.hex_len(),
        }
    }

    pub fn execute(&self, material: &PasswordMaterial) -> Result<String> {
        tracing::debug!(algorithm = %self.algorithm, bytes = material.len(), "hashing password");

        let bytes = material.as_bytes();
        let encoded = match self.algorithm {
            HashAlgorithm::Md5 => hex::encode(Md5::digest(bytes)),
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
            HashAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
        };

        if encoded.len() != self.expected_len {
            tracing::debug!(
                got = encoded.len(),
                expected = self.expected_len,
                "invalid hash sum size"
            );
            return Err(CryptpassError::new(
                ErrorCategory::Internal,
                ErrorKind::Hash,
                "invalid digest length",
            ));
        }

        Ok(encoded)
    }
}

/// Hex digest of `material` under `algorithm`.
pub fn hash(material: &PasswordMaterial, algorithm: HashAlgorithm) -> Result<String> {
    HashInstruction::new(algorithm).execute(material)
}
