//! Sources of explicit password input

use crate::error::{CryptpassError, ErrorCategory, ErrorKind, Result};
use std::io::{self, IsTerminal, Read, Write};
use zeroize::Zeroizing;

/// Trait for reading an explicit password from various sources
pub trait InputReader {
    /// Read the password as UTF-8 text. An empty password is an error.
    ///
    /// Returns the password wrapped in `Zeroizing` so it is wiped from
    /// memory when dropped.
    fn read_input(&mut self) -> Result<Zeroizing<String>>;
}

/// Returns a fixed password (for testing)
pub struct ConstantInputReader {
    input: Zeroizing<String>,
}

impl ConstantInputReader {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: Zeroizing::new(input.into()),
        }
    }
}

impl InputReader for ConstantInputReader {
    fn read_input(&mut self) -> Result<Zeroizing<String>> {
        non_empty(self.input.clone())
    }
}

fn non_empty(input: Zeroizing<String>) -> Result<Zeroizing<String>> {
    if input.is_empty() {
        return Err(CryptpassError::new(
            ErrorCategory::User,
            ErrorKind::Input,
            "password input is empty",
        ));
    }
    Ok(input)
}

/// Reads a password from any io::Read source, such as a pipe on stdin.
///
/// A single trailing newline (`\n` or `\r\n`) is dropped so that
/// `echo secret | cryptpass --input-stdin` encodes `secret`.
pub struct ReaderInputReader {
    reader: Box<dyn Read>,
}

impl ReaderInputReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl InputReader for ReaderInputReader {
    fn read_input(&mut self) -> Result<Zeroizing<String>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            CryptpassError::with_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading password input: {}", e),
                e,
            )
        })?;

        if data.ends_with(b"\n") {
            data.pop();
            if data.ends_with(b"\r") {
                data.pop();
            }
        }

        let text = std::str::from_utf8(&data).map_err(|e| {
            CryptpassError::with_source(
                ErrorCategory::User,
                ErrorKind::Input,
                "password input is not valid UTF-8",
                e,
            )
        })?;
        non_empty(Zeroizing::new(text.to_owned()))
    }
}

/// Prompts on the terminal and reads a password with no echo
pub struct TerminalInputReader;

impl TerminalInputReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalInputReader {
    fn default() -> Self {
        Self::new()
    }
}

impl InputReader for TerminalInputReader {
    fn read_input(&mut self) -> Result<Zeroizing<String>> {
        if !io::stdin().is_terminal() {
            return Err(CryptpassError::new(
                ErrorCategory::User,
                ErrorKind::Input,
                "cannot prompt for password - stdin is not a terminal",
            ));
        }

        io::stderr()
            .write_all(b"Password (cryptpass): ")
            .and_then(|()| io::stderr().flush())
            .map_err(|e| {
                CryptpassError::with_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    format!("failed to write prompt: {}", e),
                    e,
                )
            })?;

        let input = rpassword::read_password().map_err(|e| {
            CryptpassError::with_source(
                ErrorCategory::Internal,
                ErrorKind::Input,
                format!("failure reading password: {}", e),
                e,
            )
        })?;

        non_empty(Zeroizing::new(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_reader() {
        let mut reader = ConstantInputReader::new("hunter2");
        assert_eq!(reader.read_input().unwrap().as_str(), "hunter2");
        assert_eq!(reader.read_input().unwrap().as_str(), "hunter2");
    }

    /// Tests the terminal reader. This is ignored by default and must be run
    /// explicitly and with human input:
    ///
    /// cargo test test_terminal_reader_interactive -- --ignored --nocapture
    #[test]
    #[ignore]
    fn test_terminal_reader_interactive() {
        let mut reader = TerminalInputReader::new();
        println!("\nPlease enter a test password:");
        let input = reader.read_input().unwrap();
        assert!(!input.is_empty(), "Expected non-empty password");
    }

    #[test]
    fn test_reader_strips_one_newline() {
        let data = b"hunter2\n";
        let mut reader = ReaderInputReader::new(Box::new(&data[..]));
        assert_eq!(reader.read_input().unwrap().as_str(), "hunter2");
    }

    #[test]
    fn test_reader_strips_crlf() {
        let data = b"hunter2\r\n";
        let mut reader = ReaderInputReader::new(Box::new(&data[..]));
        assert_eq!(reader.read_input().unwrap().as_str(), "hunter2");
    }

    #[test]
    fn test_reader_keeps_inner_whitespace() {
        let data = b" two words \n\n";
        let mut reader = ReaderInputReader::new(Box::new(&data[..]));
        assert_eq!(reader.read_input().unwrap().as_str(), " two words \n");
    }

    #[test]
    fn test_reader_empty() {
        for data in [&b""[..], &b"\n"[..], &b"\r\n"[..]] {
            let mut reader = ReaderInputReader::new(Box::new(data));
            let err = reader.read_input().expect_err("expected empty input error");
            assert_eq!(err.kind, ErrorKind::Input);
            assert_eq!(err.message(), "password input is empty");
        }
    }

    #[test]
    fn test_constant_reader_empty() {
        let err = ConstantInputReader::new("")
            .read_input()
            .expect_err("expected empty input error");
        assert_eq!(err.kind, ErrorKind::Input);
    }

    #[test]
    fn test_reader_rejects_non_utf8() {
        let data: &[u8] = &[0xff, 0xfe, 0x00, 0x01];
        let mut reader = ReaderInputReader::new(Box::new(data));
        let err = reader.read_input().expect_err("expected UTF-8 error");
        assert_eq!(err.kind, ErrorKind::Input);
    }
}
