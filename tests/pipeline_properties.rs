//! End-to-end properties of the password pipeline

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use cryptpass::crypt;
use cryptpass::pipeline::{MAX_LENGTH, MIN_LENGTH};
use cryptpass::{Alphabet, CryptAlgorithm, ErrorKind, HashAlgorithm, PasswordConfig, Pipeline};
use md5::{Digest, Md5};
use std::sync::Arc;

fn pipeline() -> Pipeline {
    Pipeline::new(Arc::new(Alphabet::build().unwrap()))
}

fn config(crypt: &str, hash: &str) -> PasswordConfig {
    let mut config = PasswordConfig::default();
    config.crypt = crypt.to_string();
    config.hash = hash.to_string();
    config
}

#[test]
fn test_every_valid_length_yields_exact_alphabet_password() {
    let pipeline = pipeline();
    let alphabet = pipeline.generator().alphabet();

    for length in MIN_LENGTH..=MAX_LENGTH {
        let mut config = config("md5", "md5");
        config.length = Some(length);

        let output = pipeline.execute(&config).unwrap();
        assert_eq!(output.plaintext.len(), length);
        for c in output.plaintext.chars() {
            assert!(alphabet.contains(c), "length {}: {} not in alphabet", length, c);
            assert!(
                !Alphabet::excluded_symbols().contains(c),
                "length {}: excluded symbol {}",
                length,
                c
            );
        }
    }
}

#[test]
fn test_out_of_bounds_lengths_rejected() {
    let pipeline = pipeline();
    for length in [0, 1, 2, MIN_LENGTH - 1, MAX_LENGTH + 1, 4096] {
        let mut config = config("sha512", "md5");
        config.length = Some(length);

        let err = pipeline.execute(&config).expect_err("expected length error");
        assert_eq!(err.kind, ErrorKind::Length, "length {}", length);
    }
}

#[test]
fn test_explicit_input_passes_through() {
    let pipeline = pipeline();
    for input in ["x", "hunter2", "a much longer passphrase with spaces", "ünïcødé ✓"] {
        let mut config = config("sha256", "sha512");
        config.set_input(input);
        config.length = Some(8);

        let output = pipeline.execute(&config).unwrap();
        assert_eq!(output.plaintext, input);
        assert_eq!(output.base64, URL_SAFE_NO_PAD.encode(input.as_bytes()));
        assert!(!output.base64.contains('='));
    }
}

#[test]
fn test_hash_lengths_per_algorithm() {
    let pipeline = pipeline();
    for algorithm in HashAlgorithm::ALL {
        let output = pipeline.execute(&config("md5", algorithm.name())).unwrap();
        assert_eq!(output.hash.len(), algorithm.hex_len());
        let expected = cryptpass::digest::hash(
            &cryptpass::PasswordMaterial::new(output.plaintext.as_bytes().to_vec()),
            algorithm,
        )
        .unwrap();
        assert_eq!(output.hash, expected);
    }
}

#[test]
fn test_crypt_verifies_and_is_salted() {
    let pipeline = pipeline();
    for algorithm in CryptAlgorithm::ALL {
        let mut config = config(algorithm.name(), "md5");
        config.set_input("hunter2");

        let first = pipeline.execute(&config).unwrap();
        let second = pipeline.execute(&config).unwrap();

        assert!(first.crypt.starts_with(algorithm.prefix()));
        assert!(crypt::verify(algorithm, b"hunter2", &first.crypt));
        assert!(crypt::verify(algorithm, b"hunter2", &second.crypt));
        assert_ne!(first.crypt, second.crypt);
    }
}

#[test]
fn test_unsupported_identifiers() {
    let pipeline = pipeline();

    let err = pipeline.execute(&config("sha1", "md5")).expect_err("expected error");
    assert_eq!(err.kind, ErrorKind::Algorithm);

    let err = pipeline.execute(&config("sha512", "sha1")).expect_err("expected error");
    assert_eq!(err.kind, ErrorKind::Algorithm);
}

#[test]
fn test_scenario_md5_crypt_sha256_hash() {
    let mut config = config("md5", "sha256");
    config.length = Some(16);

    let pipeline = pipeline();
    let output = pipeline.execute(&config).unwrap();

    assert_eq!(output.plaintext.len(), 16);
    assert!(
        output
            .plaintext
            .chars()
            .all(|c| pipeline.generator().alphabet().contains(c))
    );
    assert_eq!(output.hash.len(), 64);
    assert!(
        output
            .hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    );
    assert!(output.crypt.starts_with("$1$"));
    assert!(crypt::verify(CryptAlgorithm::Md5, output.plaintext.as_bytes(), &output.crypt));
}

#[test]
fn test_scenario_hunter2() {
    let mut config = PasswordConfig::default();
    config.set_input("hunter2");
    config.hash = "md5".to_string();

    let output = pipeline().execute(&config).unwrap();

    assert_eq!(output.plaintext, "hunter2");
    assert_eq!(output.base64, "aHVudGVyMg");
    assert_eq!(output.hash, hex::encode(Md5::digest(b"hunter2")));
    assert_eq!(output.hash.len(), 32);
    assert!(output.crypt.starts_with("$6$"));
    assert!(crypt::verify(CryptAlgorithm::Sha512, b"hunter2", &output.crypt));
}

#[test]
fn test_concurrent_runs_share_one_alphabet() {
    let pipeline = pipeline();
    std::thread::scope(|s| {
        for length in [8, 32, 64, 128] {
            let pipeline = pipeline.clone();
            s.spawn(move || {
                let mut config = config("md5", "sha256");
                config.length = Some(length);
                for _ in 0..10 {
                    let output = pipeline.execute(&config).unwrap();
                    assert_eq!(output.plaintext.len(), length);
                    assert!(
                        output
                            .plaintext
                            .chars()
                            .all(|c| pipeline.generator().alphabet().contains(c))
                    );
                }
            });
        }
    });
}
