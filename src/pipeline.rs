//! Password derivation pipeline
//!
//! One run validates the request, resolves both algorithms, obtains password
//! material (generated or supplied) and derives four representations of it:
//!
//! - `base64`: URL-safe base64 of the raw bytes, without padding
//! - `crypt`: salted crypt(3) string for the selected scheme
//! - `hash`: lowercase hex digest for the selected algorithm
//! - `plaintext`: the password itself
//!
//! Any failure aborts the run and nothing is returned but the error.

use crate::alphabet::Alphabet;
use crate::config::PasswordConfig;
use crate::crypt::{CryptAlgorithm, CryptInstruction};
use crate::digest::{HashAlgorithm, HashInstruction};
use crate::error::{CryptpassError, ErrorCategory, ErrorKind, Result};
use crate::generator::{PasswordGenerator, PasswordMaterial};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Shortest password the pipeline will generate.
pub const MIN_LENGTH: usize = 8;

/// Longest password the pipeline will generate.
pub const MAX_LENGTH: usize = 128;

/// Reject generated-password lengths outside `[MIN_LENGTH, MAX_LENGTH]`.
pub fn validate_length(length: usize) -> Result<usize> {
    if length < MIN_LENGTH {
        return Err(CryptpassError::new(
            ErrorCategory::User,
            ErrorKind::Length,
            "password length below minimum threshold",
        ));
    }
    if length > MAX_LENGTH {
        return Err(CryptpassError::new(
            ErrorCategory::User,
            ErrorKind::Length,
            "password length above maximum threshold",
        ));
    }
    Ok(length)
}

/// A validated request: bounds checked and algorithms resolved.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    length: usize,
    explicit_input: Option<PasswordMaterial>,
    crypt: CryptAlgorithm,
    hash: HashAlgorithm,
}

impl GenerationRequest {
    /// Request a generated password of `length` characters.
    pub fn generated(length: usize, crypt: CryptAlgorithm, hash: HashAlgorithm) -> Result<Self> {
        Ok(Self {
            length: validate_length(length)?,
            explicit_input: None,
            crypt,
            hash,
        })
    }

    /// Request encodings of `input`. Its byte length becomes the request
    /// length and is not bounds checked.
    pub fn explicit(input: impl Into<Vec<u8>>, crypt: CryptAlgorithm, hash: HashAlgorithm) -> Self {
        let material = PasswordMaterial::new(input.into());
        Self {
            length: material.len(),
            explicit_input: Some(material),
            crypt,
            hash,
        }
    }

    /// Validate `config` in pipeline order: length first, then the crypt
    /// scheme, then the digest.
    pub fn from_config(config: &PasswordConfig) -> Result<Self> {
        let input = config.explicit_input();
        let length = match input {
            Some(input) => input.len(),
            None => validate_length(config.effective_length())?,
        };
        tracing::debug!(length, "detected password length");

        let crypt: CryptAlgorithm = config.crypt.parse()?;
        let hash: HashAlgorithm = config.hash.parse()?;
        tracing::debug!(%crypt, %hash, generated = input.is_none(), "resolved algorithms");

        Ok(Self {
            length,
            explicit_input: input.map(|input| PasswordMaterial::new(input.as_bytes().to_vec())),
            crypt,
            hash,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn crypt_algorithm(&self) -> CryptAlgorithm {
        self.crypt
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn is_generated(&self) -> bool {
        self.explicit_input.is_none()
    }
}

/// The four representations of one password.
///
/// Field contents are wiped from memory when the value is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct EncodedOutput {
    pub base64: String,
    pub crypt: String,
    pub hash: String,
    pub plaintext: String,
}

impl fmt::Debug for EncodedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedOutput")
            .field("base64", &"<redacted>")
            .field("crypt", &self.crypt)
            .field("hash", &self.hash)
            .field("plaintext", &"<redacted>")
            .finish()
    }
}

/// Drives generation and encoding. Cheap to clone; clones share the alphabet.
#[derive(Debug, Clone)]
pub struct Pipeline {
    generator: PasswordGenerator,
}

impl Pipeline {
    pub fn new(alphabet: Arc<Alphabet>) -> Self {
        Self {
            generator: PasswordGenerator::new(alphabet),
        }
    }

    pub fn generator(&self) -> &PasswordGenerator {
        &self.generator
    }

    /// Validate `config` and run it with OS randomness.
    pub fn execute(&self, config: &PasswordConfig) -> Result<EncodedOutput> {
        self.execute_with(&mut OsRng, config)
    }

    /// Validate `config` and run it, drawing password bytes from `rng`.
    ///
    /// Nothing is read from `rng` unless validation succeeds and no explicit
    /// input was supplied.
    pub fn execute_with<R: RngCore>(
        &self,
        rng: &mut R,
        config: &PasswordConfig,
    ) -> Result<EncodedOutput> {
        let request = GenerationRequest::from_config(config)?;
        self.run_with(rng, &request)
    }

    pub fn run(&self, request: &GenerationRequest) -> Result<EncodedOutput> {
        self.run_with(&mut OsRng, request)
    }

    pub fn run_with<R: RngCore>(
        &self,
        rng: &mut R,
        request: &GenerationRequest,
    ) -> Result<EncodedOutput> {
        let material = match &request.explicit_input {
            Some(material) => material.clone(),
            None => self.generator.generate_with(rng, request.length)?,
        };

        let hash = HashInstruction::new(request.hash).execute(&material)?;
        let crypt = CryptInstruction {
            algorithm: request.crypt,
            material: &material,
        }
        .execute()?;

        let output = EncodedOutput {
            base64: URL_SAFE_NO_PAD.encode(material.as_bytes()),
            crypt,
            hash,
            plaintext: String::from_utf8_lossy(material.as_bytes()).into_owned(),
        };
        tracing::debug!("password encodings assembled");
        Ok(output)
    }
}
