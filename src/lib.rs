//! cryptpass - generate a password and derive its base64, crypt(3) and
//! digest representations

#![forbid(unsafe_code)]

pub mod alphabet;
pub mod config;
pub mod crypt;
pub mod digest;
pub mod error;
pub mod generator;
pub mod input;
pub mod output;
pub mod pipeline;

pub use alphabet::Alphabet;
pub use config::PasswordConfig;
pub use crypt::CryptAlgorithm;
pub use digest::HashAlgorithm;
pub use error::{CryptpassError, ErrorCategory, ErrorKind, Result};
pub use generator::{PasswordGenerator, PasswordMaterial};
pub use pipeline::{EncodedOutput, GenerationRequest, Pipeline};
