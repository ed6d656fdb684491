//! Command-line interface for `rijndael`.

#![forbid(unsafe_code)]

mod check;
mod kat;
mod reference;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rijndael_core::{Aes, BlockCipher, Rijndael};
use rijndael_modes::{CipherMode, CreateTransform, CryptoTransform, Direction, PaddingMode};

/// Rijndael/AES CLI.
#[derive(Parser)]
#[command(
    name = "rijndael",
    version,
    author,
    about = "Generalized Rijndael and AES with ECB/CBC/CFB/OFB modes"
)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

/// Cipher parameters shared by `enc` and `dec`.
#[derive(clap::Args)]
struct CipherArgs {
    /// Key as hex; 16 to 32 bytes in 4-byte steps.
    #[arg(long, value_name = "HEX")]
    key_hex: String,
    /// IV as hex; one block long. Not used by ECB.
    #[arg(long, value_name = "HEX")]
    iv_hex: Option<String>,
    /// Mode of operation (ECB, CBC, CFB, OFB).
    #[arg(long, default_value = "CBC")]
    mode: CipherMode,
    /// Padding (None, Zeros, PKCS7, ANSIX923, ISO10126).
    #[arg(long, default_value = "PKCS7")]
    padding: PaddingMode,
    /// CFB segment size in bits; defaults to the block size.
    #[arg(long)]
    feedback_bits: Option<usize>,
    /// Block size in bits (128, 160, 192, 224, 256).
    #[arg(long, default_value_t = 128)]
    block_bits: usize,
    /// Input file.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Output file.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file.
    Enc(CipherArgs),
    /// Decrypt a file.
    Dec(CipherArgs),
    /// Run NIST known-answer-test files (or directories of them).
    Kat {
        /// KAT `.txt` files or directories containing them.
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Compare chunked streaming against one-shot transforms on random data.
    Check {
        /// Random messages per mode/padding/key size combination.
        #[arg(long, default_value_t = 100)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Encrypt and decrypt a message with a random AES key.
    Demo {
        /// Message to encrypt.
        #[arg(long, default_value = "Rijndael is a block cipher")]
        message: String,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Enc(args) => cmd_transform(&args, Direction::Encrypt),
        Commands::Dec(args) => cmd_transform(&args, Direction::Decrypt),
        Commands::Kat { paths } => cmd_kat(&paths),
        Commands::Check { samples, seed } => check::run(samples, &mut seeded_rng(seed)),
        Commands::Demo { message, seed } => cmd_demo(&message, seed),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn cmd_transform(args: &CipherArgs, direction: Direction) -> Result<()> {
    if args.block_bits % 8 != 0 {
        bail!("block size must be a whole number of bytes");
    }
    let key = parse_hex("key", &args.key_hex)?;
    let cipher = Rijndael::with_block_size(&key, args.block_bits / 8).context("configure cipher")?;
    let iv = args
        .iv_hex
        .as_deref()
        .map(|hex_str| parse_hex("IV", hex_str))
        .transpose()?;
    let feedback_bits = args.feedback_bits.unwrap_or(args.block_bits);

    let mut transform = match direction {
        Direction::Encrypt => {
            cipher.create_encryptor(args.mode, iv.as_deref(), feedback_bits, args.padding)
        }
        Direction::Decrypt => {
            cipher.create_decryptor(args.mode, iv.as_deref(), feedback_bits, args.padding)
        }
    }
    .context("create transform")?;

    let data = read_file(&args.input)?;
    let out = transform
        .transform_final_block(&data)
        .with_context(|| format!("{direction} {}", args.input.display()))?;
    fs::write(&args.output, &out).with_context(|| format!("write {}", args.output.display()))?;
    info!(
        "{direction}ed {} bytes into {} bytes ({} {}, {}-bit block)",
        data.len(),
        out.len(),
        args.mode,
        args.padding,
        cipher.block_size() * 8
    );
    Ok(())
}

fn cmd_kat(paths: &[PathBuf]) -> Result<()> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = fs::read_dir(path).with_context(|| format!("list {}", path.display()))?;
            for entry in entries {
                let file = entry?.path();
                if file.extension().is_some_and(|ext| ext == "txt") {
                    files.push(file);
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();

    let mut total = 0;
    for file in &files {
        let Some(mode) = kat::mode_from_file_name(file) else {
            info!("skipping {}", file.display());
            continue;
        };
        let text = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
        let vectors =
            kat::parse(mode, &text).with_context(|| format!("parse {}", file.display()))?;
        for vector in &vectors {
            kat::verify(vector)
                .with_context(|| format!("{} COUNT = {}", file.display(), vector.count))?;
        }
        info!("{}: {} vectors passed", file.display(), vectors.len());
        total += vectors.len();
    }
    println!("{total} vectors passed!");
    Ok(())
}

fn cmd_demo(message: &str, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let aes = Aes::generate(&mut rng)?;
    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut iv);

    let mut enc = aes.create_encryptor(CipherMode::Cbc, Some(&iv), 128, PaddingMode::Pkcs7)?;
    let ciphertext = enc.transform_final_block(message.as_bytes())?;
    let mut dec = aes.create_decryptor(CipherMode::Cbc, Some(&iv), 128, PaddingMode::Pkcs7)?;
    let decrypted = dec.transform_final_block(&ciphertext)?;

    println!("demo key: {}", hex::encode(aes.key()));
    println!("iv: {}", hex::encode(iv));
    println!("plaintext: {message}");
    println!("ciphertext: {}", hex::encode(&ciphertext));
    println!("decrypted: {}", String::from_utf8_lossy(&decrypted));
    if decrypted != message.as_bytes() {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn parse_hex(what: &str, hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str.trim()).with_context(|| format!("decode {what} hex"))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
