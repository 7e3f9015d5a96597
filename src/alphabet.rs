//! Randomized radix-64 alphabet for generated passwords
//!
//! The alphabet is derived from a fixed superset of punctuation, letters and
//! digits. A Fisher-Yates pass shuffles positions `[0, 63]` of the superset
//! and the first 64 symbols become the encoding table. Positions past 63 are
//! never read or written, so the trailing symbols of the superset
//! (`wxyz0123456789`) never appear in a generated password.
//!
//! An [`Alphabet`] is immutable once built. Build it once at startup and
//! share it between generators.

use crate::error::{CryptpassError, ErrorCategory, ErrorKind, Result};
use base64::Engine;
use base64::alphabet::Alphabet as EncodingTable;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use rand::Rng;

/// Candidate symbols, in the order the shuffle sees them.
pub const SUPERSET: &str =
    "!@#$%^&*()_+-?./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Number of symbols in a built alphabet.
pub const ALPHABET_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: String,
    engine: GeneralPurpose,
}

impl Alphabet {
    /// Build a freshly shuffled alphabet using the thread-local PRNG.
    pub fn build() -> Result<Self> {
        Self::build_with_rng(&mut rand::thread_rng())
    }

    /// Build a shuffled alphabet drawing swap indices from `rng`.
    pub fn build_with_rng<R: Rng>(rng: &mut R) -> Result<Self> {
        tracing::debug!("shuffling password alphabet");

        let mut chars = SUPERSET.as_bytes().to_vec();
        for i in (1..ALPHABET_LEN).rev() {
            let j = rng.gen_range(0..=i);
            chars.swap(i, j);
        }
        chars.truncate(ALPHABET_LEN);

        // The superset is ASCII, so every symbol is one byte.
        let symbols = String::from_utf8_lossy(&chars).into_owned();
        Self::from_symbols(&symbols)
    }

    /// Use `symbols` verbatim as the encoding table.
    ///
    /// Fails unless `symbols` holds exactly 64 distinct printable ASCII
    /// characters, none of them `=`.
    pub fn from_symbols(symbols: &str) -> Result<Self> {
        let table = EncodingTable::new(symbols).map_err(|e| {
            CryptpassError::with_source(
                ErrorCategory::Internal,
                ErrorKind::Generation,
                "invalid password alphabet",
                e,
            )
        })?;
        let engine = GeneralPurpose::new(
            &table,
            GeneralPurposeConfig::new().with_encode_padding(false),
        );

        Ok(Self {
            symbols: symbols.to_owned(),
            engine,
        })
    }

    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(symbol)
    }

    /// Superset symbols the shuffle can never select.
    pub fn excluded_symbols() -> &'static str {
        &SUPERSET[ALPHABET_LEN..]
    }

    /// Radix-64 encode `bytes` with this table, without padding.
    pub(crate) fn encode(&self, bytes: &[u8]) -> String {
        self.engine.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_superset_composition() {
        assert_eq!(SUPERSET.len(), 78);
        assert!(SUPERSET.starts_with("!@#$%^&*()_+-?./"));
        let unique: HashSet<char> = SUPERSET.chars().collect();
        assert_eq!(unique.len(), SUPERSET.len());
    }

    #[test]
    fn test_excluded_symbols_are_the_superset_tail() {
        assert_eq!(Alphabet::excluded_symbols(), "wxyz0123456789");
    }

    #[test]
    fn test_built_alphabet_is_a_permutation_of_the_superset_head() {
        let expected: HashSet<char> = SUPERSET[..ALPHABET_LEN].chars().collect();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let alphabet = Alphabet::build_with_rng(&mut rng).unwrap();
            let actual: HashSet<char> = alphabet.symbols().chars().collect();

            assert_eq!(alphabet.symbols().len(), ALPHABET_LEN);
            assert_eq!(actual, expected, "seed {}", seed);
            for excluded in Alphabet::excluded_symbols().chars() {
                assert!(!alphabet.contains(excluded), "seed {} kept {}", seed, excluded);
            }
        }
    }

    #[test]
    fn test_same_seed_same_alphabet() {
        let a = Alphabet::build_with_rng(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = Alphabet::build_with_rng(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.symbols(), b.symbols());
    }

    #[test]
    fn test_shuffle_moves_symbols() {
        let alphabet = Alphabet::build_with_rng(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_ne!(alphabet.symbols(), &SUPERSET[..ALPHABET_LEN]);
    }

    #[test]
    fn test_from_symbols_rejects_short_table() {
        let err = Alphabet::from_symbols("abc").expect_err("expected invalid alphabet");
        assert_eq!(err.kind, ErrorKind::Generation);
        assert_eq!(err.message(), "invalid password alphabet");
    }

    #[test]
    fn test_from_symbols_rejects_duplicates() {
        let mut symbols = SUPERSET[..ALPHABET_LEN - 1].to_string();
        symbols.push('!');
        assert!(Alphabet::from_symbols(&symbols).is_err());
    }

    #[test]
    fn test_encode_has_no_padding() {
        let alphabet = Alphabet::from_symbols(&SUPERSET[..ALPHABET_LEN]).unwrap();
        let encoded = alphabet.encode(&[0u8; 10]);
        // 10 bytes -> ceil(80 / 6) symbols
        assert_eq!(encoded.len(), 14);
        assert!(!encoded.contains('='));
        // Zero bits map to the first table symbol.
        assert!(encoded.chars().all(|c| c == '!'));
    }
}
