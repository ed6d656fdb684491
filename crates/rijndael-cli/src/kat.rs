//! NIST known-answer-test (KAT) file parsing and verification.
//!
//! A file starts with `[ENCRYPT]` or `[DECRYPT]` and holds blank-line
//! separated records:
//!
//! ```text
//! COUNT = 0
//! KEY = 00000000000000000000000000000000
//! IV = f34481ec3cc627bacd5dc3fb08f273e6
//! PLAINTEXT = 00
//! CIPHERTEXT = 03
//! ```
//!
//! `IV` is absent for ECB. Decrypt files list `CIPHERTEXT` before
//! `PLAINTEXT`. A single hex digit is a 1-bit datum stored in the top bit.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use rijndael_core::Rijndael;
use rijndael_modes::{CipherMode, CreateTransform, CryptoTransform, Direction, PaddingMode};

/// One parsed test record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KatVector {
    pub operation: Direction,
    pub mode: CipherMode,
    pub count: u32,
    pub key: Vec<u8>,
    pub iv: Option<Vec<u8>>,
    pub bit_len: usize,
    pub plaintext: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// Mode named by the first three characters of the file name.
pub fn mode_from_file_name(path: &Path) -> Option<CipherMode> {
    let name = path.file_name()?.to_str()?;
    name.get(..3)?.parse().ok()
}

struct Field {
    name: String,
    bytes: Vec<u8>,
    bit_len: usize,
}

fn split_pair(line: &str) -> Result<(&str, &str)> {
    let mut parts = line.split([' ', '=']).filter(|part| !part.is_empty());
    match (parts.next(), parts.next()) {
        (Some(name), Some(value)) => Ok((name, value)),
        _ => bail!("expected NAME = VALUE, found {line:?}"),
    }
}

fn parse_field(line: Option<&str>) -> Result<Field> {
    let line = line.ok_or_else(|| anyhow!("unexpected end of file"))?;
    let (name, value) = split_pair(line)?;
    let (bytes, bit_len) = if value.len() == 1 {
        let byte = match value {
            "0" => 0x00,
            "1" => 0x80,
            _ => bail!("1-bit value must be 0 or 1, found {value:?}"),
        };
        (vec![byte], 1)
    } else {
        let bytes = hex::decode(value).with_context(|| format!("decode {name}"))?;
        let bits = bytes.len() * 8;
        (bytes, bits)
    };
    Ok(Field {
        name: name.to_ascii_uppercase(),
        bytes,
        bit_len,
    })
}

fn expect_field(field: Field, name: &str) -> Result<Field> {
    if field.name != name {
        bail!("expected {name}, found {}", field.name);
    }
    Ok(field)
}

/// Parses every record in a KAT file.
pub fn parse(mode: CipherMode, text: &str) -> Result<Vec<KatVector>> {
    let mut lines = text.lines();
    let operation = match lines.next().map(str::trim) {
        Some("[ENCRYPT]") => Direction::Encrypt,
        Some("[DECRYPT]") => Direction::Decrypt,
        other => bail!("unknown operation {other:?}"),
    };

    let mut vectors = Vec::new();
    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }
        let (name, value) = split_pair(line)?;
        if !name.eq_ignore_ascii_case("COUNT") {
            bail!("expected COUNT as first item, found {name}");
        }
        let count = value.parse().with_context(|| format!("parse COUNT {value:?}"))?;

        let key = expect_field(parse_field(lines.next())?, "KEY")?.bytes;
        let mut field = parse_field(lines.next())?;
        let iv = if field.name == "IV" {
            let iv = field.bytes;
            field = parse_field(lines.next())?;
            Some(iv)
        } else {
            None
        };

        let (first, second) = match operation {
            Direction::Encrypt => ("PLAINTEXT", "CIPHERTEXT"),
            Direction::Decrypt => ("CIPHERTEXT", "PLAINTEXT"),
        };
        let first = expect_field(field, first)?;
        let second = expect_field(parse_field(lines.next())?, second)?;
        let bit_len = second.bit_len;
        let (plaintext, ciphertext) = match operation {
            Direction::Encrypt => (first.bytes, second.bytes),
            Direction::Decrypt => (second.bytes, first.bytes),
        };

        vectors.push(KatVector {
            operation,
            mode,
            count,
            key,
            iv,
            bit_len,
            plaintext,
            ciphertext,
        });
    }
    Ok(vectors)
}

fn matches_masked(expected: &[u8], actual: &[u8], bit_len: usize) -> bool {
    if bit_len == 1 {
        return actual.first().map(|b| b & 0x80) == expected.first().map(|b| b & 0x80);
    }
    expected == actual
}

/// Runs one record through a fresh transform and compares the result.
pub fn verify(vector: &KatVector) -> Result<()> {
    let cipher = Rijndael::new(&vector.key)?;
    // Sub-block data is CFB8 or CFB1; the latter runs a byte at a time.
    let feedback_bits = if vector.bit_len < 128 { 8 } else { 128 };
    let iv = vector.iv.as_deref();

    let (input, expected) = match vector.operation {
        Direction::Encrypt => (&vector.plaintext, &vector.ciphertext),
        Direction::Decrypt => (&vector.ciphertext, &vector.plaintext),
    };
    let mut transform = match vector.operation {
        Direction::Encrypt => {
            cipher.create_encryptor(vector.mode, iv, feedback_bits, PaddingMode::None)?
        }
        Direction::Decrypt => {
            cipher.create_decryptor(vector.mode, iv, feedback_bits, PaddingMode::None)?
        }
    };
    let actual = transform.transform_final_block(input)?;

    if !matches_masked(expected, &actual, vector.bit_len) {
        bail!(
            "{} {} mismatch: expected {}, got {}",
            vector.mode,
            vector.operation,
            hex::encode(expected),
            hex::encode(&actual)
        );
    }
    Ok(())
}
