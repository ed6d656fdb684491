//! Cipher mode and direction selectors.

use core::fmt;
use core::str::FromStr;

use rijndael_core::Error;

/// Block cipher mode of operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CipherMode {
    /// Electronic codebook: every block is enciphered independently.
    Ecb,
    /// Cipher block chaining.
    Cbc,
    /// Cipher feedback with a configurable segment size.
    Cfb,
    /// Output feedback with full-block feedback.
    Ofb,
}

impl CipherMode {
    /// Every supported mode.
    pub const ALL: [CipherMode; 4] = [CipherMode::Ecb, CipherMode::Cbc, CipherMode::Cfb, CipherMode::Ofb];

    /// Whether the mode turns the block cipher into a keystream generator,
    /// which lets the final block be shorter than the block size.
    pub fn is_feedback(self) -> bool {
        matches!(self, CipherMode::Cfb | CipherMode::Ofb)
    }

    /// Whether the mode consumes an initialization vector.
    pub fn uses_iv(self) -> bool {
        !matches!(self, CipherMode::Ecb)
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CipherMode::Ecb => "ECB",
            CipherMode::Cbc => "CBC",
            CipherMode::Cfb => "CFB",
            CipherMode::Ofb => "OFB",
        };
        f.write_str(name)
    }
}

impl FromStr for CipherMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ECB" => Ok(CipherMode::Ecb),
            "CBC" => Ok(CipherMode::Cbc),
            "CFB" => Ok(CipherMode::Cfb),
            "OFB" => Ok(CipherMode::Ofb),
            _ => Err(Error::UnsupportedCipherMode(s.to_string())),
        }
    }
}

/// Whether a transform encrypts or decrypts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Plaintext to ciphertext.
    Encrypt,
    /// Ciphertext to plaintext.
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("cbc".parse::<CipherMode>(), Ok(CipherMode::Cbc));
        assert_eq!(" OFB ".parse::<CipherMode>(), Ok(CipherMode::Ofb));
        for mode in CipherMode::ALL {
            assert_eq!(mode.to_string().parse::<CipherMode>(), Ok(mode));
        }
    }

    #[test]
    fn rejects_unknown_modes() {
        assert_eq!(
            "CTS".parse::<CipherMode>(),
            Err(Error::UnsupportedCipherMode("CTS".to_string()))
        );
    }

    #[test]
    fn feedback_modes() {
        assert!(CipherMode::Cfb.is_feedback());
        assert!(CipherMode::Ofb.is_feedback());
        assert!(!CipherMode::Cbc.is_feedback());
        assert!(!CipherMode::Ecb.uses_iv());
    }
}
