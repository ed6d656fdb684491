//! Independent AES mode chaining over the RustCrypto `aes` block primitive.
//!
//! Used by `check` to compare this workspace's ciphertext against a second
//! implementation byte for byte.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use anyhow::{anyhow, bail, Result};
use rijndael_core::AES_BLOCK_SIZE;
use rijndael_modes::{CipherMode, PaddingMode};

/// RustCrypto AES for one of the three key sizes.
pub enum Reference {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl Reference {
    pub fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_| anyhow!("reference AES rejects a {}-byte key", key.len());
        Ok(match key.len() {
            16 => Self::Aes128(Aes128::new_from_slice(key).map_err(invalid)?),
            24 => Self::Aes192(Aes192::new_from_slice(key).map_err(invalid)?),
            32 => Self::Aes256(Aes256::new_from_slice(key).map_err(invalid)?),
            len => bail!("reference AES rejects a {len}-byte key"),
        })
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Self::Aes128(cipher) => cipher.encrypt_block(block),
            Self::Aes192(cipher) => cipher.encrypt_block(block),
            Self::Aes256(cipher) => cipher.encrypt_block(block),
        }
    }

    fn keystream(&self, register: &[u8; AES_BLOCK_SIZE]) -> [u8; AES_BLOCK_SIZE] {
        let mut out = *register;
        self.encrypt_block(&mut out);
        out
    }

    /// Pads and encrypts `plain` in one pass.
    ///
    /// `segment` is the CFB segment size in bytes. Only PKCS7, ANSI X9.23
    /// and None are deterministic, so other paddings are refused.
    pub fn encrypt(
        &self,
        mode: CipherMode,
        iv: &[u8; AES_BLOCK_SIZE],
        segment: usize,
        padding: PaddingMode,
        plain: &[u8],
    ) -> Result<Vec<u8>> {
        let mut data = plain.to_vec();
        let fill = AES_BLOCK_SIZE - plain.len() % AES_BLOCK_SIZE;
        match padding {
            PaddingMode::None => {}
            PaddingMode::Pkcs7 => data.resize(plain.len() + fill, fill as u8),
            PaddingMode::AnsiX923 => {
                data.resize(plain.len() + fill - 1, 0);
                data.push(fill as u8);
            }
            other => bail!("reference AES has no {other} padding"),
        }
        if segment == 0 || AES_BLOCK_SIZE % segment != 0 {
            bail!("reference CFB segment must divide the block, got {segment} bytes");
        }
        if !mode.is_feedback() && data.len() % AES_BLOCK_SIZE != 0 {
            bail!("reference {mode} needs whole blocks, got {} bytes", data.len());
        }

        let mut register = *iv;
        match mode {
            CipherMode::Ecb => {
                for block in data.chunks_mut(AES_BLOCK_SIZE) {
                    self.encrypt_block(block);
                }
            }
            CipherMode::Cbc => {
                for block in data.chunks_mut(AES_BLOCK_SIZE) {
                    block.iter_mut().zip(&register).for_each(|(b, r)| *b ^= r);
                    self.encrypt_block(block);
                    register.copy_from_slice(block);
                }
            }
            CipherMode::Cfb => {
                for chunk in data.chunks_mut(segment) {
                    let stream = self.keystream(&register);
                    chunk.iter_mut().zip(&stream).for_each(|(b, k)| *b ^= k);
                    register.copy_within(segment.., 0);
                    register[AES_BLOCK_SIZE - segment..][..chunk.len()].copy_from_slice(chunk);
                }
            }
            CipherMode::Ofb => {
                for chunk in data.chunks_mut(AES_BLOCK_SIZE) {
                    register = self.keystream(&register);
                    chunk.iter_mut().zip(&register).for_each(|(b, k)| *b ^= k);
                }
            }
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
    const IV: &str = "000102030405060708090a0b0c0d0e0f";
    const PLAIN: &str = "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51";

    fn hex_bytes(s: &str) -> Vec<u8> {
        hex::decode(s).expect("valid hex")
    }

    fn encrypt(mode: CipherMode, segment: usize) -> String {
        let reference = Reference::new(&hex_bytes(KEY)).expect("key");
        let iv: [u8; 16] = hex_bytes(IV).try_into().expect("iv");
        let ct = reference
            .encrypt(mode, &iv, segment, PaddingMode::None, &hex_bytes(PLAIN))
            .expect("encrypt");
        hex::encode(ct)
    }

    #[test]
    fn matches_sp800_38a_vectors() {
        assert_eq!(
            encrypt(CipherMode::Ecb, 16),
            "3ad77bb40d7a3660a89ecaf32466ef97f5d3d58503b9699de785895a96fdbaaf"
        );
        assert_eq!(
            encrypt(CipherMode::Cbc, 16),
            "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2"
        );
        assert_eq!(
            encrypt(CipherMode::Cfb, 16),
            "3b3fd92eb72dad20333449f8e83cfb4ac8a64537a0b3a93fcde3cdad9f1ce58b"
        );
        assert_eq!(
            encrypt(CipherMode::Ofb, 16),
            "3b3fd92eb72dad20333449f8e83cfb4a7789508d16918f03f53c52dac54ed825"
        );
        assert!(encrypt(CipherMode::Cfb, 1).starts_with("3b79424c9c0dd436bace9e0ed4586a4f"));
    }

    #[test]
    fn pads_like_the_named_schemes() {
        let reference = Reference::new(&[0u8; 24]).expect("key");
        let iv = [0u8; 16];
        let pkcs7 = reference
            .encrypt(CipherMode::Ecb, &iv, 16, PaddingMode::Pkcs7, b"abc")
            .expect("encrypt");
        let mut block = b"abc".to_vec();
        block.resize(16, 13);
        assert_eq!(
            pkcs7,
            reference
                .encrypt(CipherMode::Ecb, &iv, 16, PaddingMode::None, &block)
                .expect("encrypt")
        );

        assert!(Reference::new(&[0u8; 20]).is_err());
        assert!(reference
            .encrypt(CipherMode::Ecb, &iv, 16, PaddingMode::Iso10126, b"abc")
            .is_err());
    }
}
