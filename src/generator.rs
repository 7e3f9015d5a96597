//! Password material and random password generation

use crate::alphabet::Alphabet;
use crate::error::{CryptpassError, ErrorCategory, ErrorKind, Result};
use rand::RngCore;
use rand::rngs::OsRng;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Raw password bytes, either generated or supplied by the caller.
///
/// The bytes are wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordMaterial {
    bytes: Zeroizing<Vec<u8>>,
}

impl PasswordMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for PasswordMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordMaterial")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Produces passwords from OS randomness mapped through a shared [`Alphabet`].
#[derive(Debug, Clone)]
pub struct PasswordGenerator {
    alphabet: Arc<Alphabet>,
}

impl PasswordGenerator {
    pub fn new(alphabet: Arc<Alphabet>) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Generate a password of exactly `length` characters.
    ///
    /// Length bounds are the caller's responsibility.
    pub fn generate(&self, length: usize) -> Result<PasswordMaterial> {
        self.generate_with(&mut OsRng, length)
    }

    /// Generate a password of exactly `length` characters, reading random
    /// bytes from `rng`. A failing source is reported immediately, without retry.
    pub fn generate_with<R: RngCore>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<PasswordMaterial> {
        tracing::debug!(length, "generating password");

        let mut raw = Zeroizing::new(vec![0u8; length]);
        rng.try_fill_bytes(&mut raw).map_err(|e| {
            CryptpassError::with_source(
                ErrorCategory::Internal,
                ErrorKind::Generation,
                "random source failure",
                e,
            )
        })?;

        // Radix-64 output is always at least as long as its input; every
        // symbol is ASCII so truncating by bytes stays on a char boundary.
        let mut encoded = Zeroizing::new(self.alphabet.encode(&raw));
        encoded.truncate(length);

        if encoded.len() != length {
            tracing::debug!(got = encoded.len(), expected = length, "invalid password size");
            return Err(CryptpassError::new(
                ErrorCategory::Internal,
                ErrorKind::Generation,
                "length mismatch",
            ));
        }

        tracing::trace!("password generated");
        Ok(PasswordMaterial::new(encoded.as_bytes().to_vec()))
    }
}
