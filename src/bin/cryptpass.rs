//! cryptpass CLI
//!
//! Generates (or accepts) a password and prints its base64, crypt(3),
//! digest and plaintext forms.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cryptpass::input::{InputReader, ReaderInputReader, TerminalInputReader};
use cryptpass::output::{self, OutputField};
use cryptpass::{Alphabet, PasswordConfig, Pipeline};

#[derive(Parser)]
#[command(name = "cryptpass")]
#[command(version)]
#[command(about = "Generate a password and its crypt, hash and base64 forms.", long_about = None)]
struct Cli {
    /// JSON file with crypt, hash, input and length settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// crypt(3) scheme: md5, sha256 or sha512 [default: sha512]
    #[arg(long, value_name = "ALGORITHM")]
    crypt: Option<String>,

    /// Digest algorithm: md5, sha256 or sha512 [default: md5]
    #[arg(long, value_name = "ALGORITHM")]
    hash: Option<String>,

    /// Length of the generated password, 8 to 128 [default: 32]
    #[arg(short, long)]
    length: Option<usize>,

    /// Encode this password instead of generating one
    #[arg(short, long, conflicts_with_all = ["input_stdin", "input_prompt"])]
    input: Option<String>,

    /// Read the password to encode from stdin
    #[arg(long, conflicts_with = "input_prompt")]
    input_stdin: bool,

    /// Prompt for the password to encode on the terminal
    #[arg(long)]
    input_prompt: bool,

    /// Part of the result to print
    #[arg(short, long, value_enum, default_value_t = OutputField::All)]
    field: OutputField,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => PasswordConfig::load(path)?,
        None => PasswordConfig::default(),
    };

    if let Some(crypt) = cli.crypt {
        config.crypt = crypt;
    }
    if let Some(hash) = cli.hash {
        config.hash = hash;
    }
    if let Some(length) = cli.length {
        config.length = Some(length);
    }
    if let Some(input) = cli.input {
        config.set_input(input);
    }
    if let Some(mut reader) = get_input_reader(cli.input_stdin, cli.input_prompt) {
        config.read_input_from(reader.as_mut())?;
    }
    let config = config.normalized();

    let pipeline = Pipeline::new(Arc::new(Alphabet::build()?));
    let encoded = pipeline.execute(&config)?;
    let rendered = output::render(&encoded, cli.field)?;

    match cli.output {
        Some(path) => output::write_secure(&path, rendered.as_bytes())?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn get_input_reader(use_stdin: bool, use_prompt: bool) -> Option<Box<dyn InputReader>> {
    if use_stdin {
        Some(Box::new(ReaderInputReader::new(Box::new(io::stdin()))))
    } else if use_prompt {
        Some(Box::new(TerminalInputReader::new()))
    } else {
        None
    }
}
