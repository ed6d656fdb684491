//! Final-block padding schemes.

use core::fmt;
use core::str::FromStr;

use rand::RngCore;
use rijndael_core::{Error, Result};

/// How the last block of a message is filled out to the block size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaddingMode {
    /// No padding; the data must already fit the mode.
    None,
    /// Zero bytes with no length marker. Removal is a no-op.
    Zeros,
    /// `N` bytes each holding `N`.
    #[default]
    Pkcs7,
    /// `N - 1` zero bytes followed by `N`.
    AnsiX923,
    /// `N - 1` random bytes followed by `N`.
    Iso10126,
}

impl PaddingMode {
    /// Every supported padding mode.
    pub const ALL: [PaddingMode; 5] = [
        PaddingMode::None,
        PaddingMode::Zeros,
        PaddingMode::Pkcs7,
        PaddingMode::AnsiX923,
        PaddingMode::Iso10126,
    ];

    /// Number of bytes [`PaddingMode::pad`] appends to `data_len` bytes.
    ///
    /// Every mode except `None` appends a whole block to aligned data.
    pub fn padding_len(self, data_len: usize, block_size: usize) -> usize {
        match self {
            PaddingMode::None => 0,
            _ => block_size - data_len % block_size,
        }
    }

    /// Pads `buf` up to a multiple of `block_size`.
    pub fn pad(self, buf: &mut Vec<u8>, block_size: usize) {
        let n = self.padding_len(buf.len(), block_size);
        if n == 0 {
            return;
        }
        let start = buf.len();
        buf.resize(start + n, 0);
        let end = buf.len();
        match self {
            PaddingMode::None | PaddingMode::Zeros => {}
            PaddingMode::Pkcs7 => buf[start..].fill(n as u8),
            PaddingMode::AnsiX923 => buf[end - 1] = n as u8,
            PaddingMode::Iso10126 => {
                rand::thread_rng().fill_bytes(&mut buf[start..end - 1]);
                buf[end - 1] = n as u8;
            }
        }
    }

    /// Validates and strips padding from the end of `buf`.
    ///
    /// PKCS7 and ANSI X9.23 check every pad byte; ISO 10126 only checks the
    /// length marker. `None` and `Zeros` leave `buf` untouched.
    pub fn unpad(self, buf: &mut Vec<u8>, block_size: usize) -> Result<()> {
        if matches!(self, PaddingMode::None | PaddingMode::Zeros) {
            return Ok(());
        }

        let n = *buf.last().ok_or(Error::InvalidPadding)? as usize;
        if n == 0 || n > block_size || n > buf.len() {
            return Err(Error::InvalidPadding);
        }

        let body = buf.len() - n;
        let expected = match self {
            PaddingMode::Pkcs7 => Some(n as u8),
            PaddingMode::AnsiX923 => Some(0u8),
            _ => None,
        };
        if let Some(expected) = expected {
            if buf[body..buf.len() - 1].iter().any(|&b| b != expected) {
                return Err(Error::InvalidPadding);
            }
        }

        buf.truncate(body);
        Ok(())
    }
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaddingMode::None => "None",
            PaddingMode::Zeros => "Zeros",
            PaddingMode::Pkcs7 => "PKCS7",
            PaddingMode::AnsiX923 => "ANSIX923",
            PaddingMode::Iso10126 => "ISO10126",
        };
        f.write_str(name)
    }
}

impl FromStr for PaddingMode {
    type Err = Error;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(PaddingMode::None),
            "ZEROS" => Ok(PaddingMode::Zeros),
            "PKCS7" => Ok(PaddingMode::Pkcs7),
            "ANSIX923" => Ok(PaddingMode::AnsiX923),
            "ISO10126" => Ok(PaddingMode::Iso10126),
            _ => Err(Error::UnsupportedPaddingMode(s.to_string())),
        }
    }
}
