//! AES: Rijndael restricted to 128-bit blocks and 128/192/256-bit keys.

use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::cipher::{BlockCipher, Rijndael};
use crate::error::{Error, Result};
use crate::params::Settings;

/// AES key sizes in bytes.
pub const AES_KEY_SIZES: [usize; 3] = [16, 24, 32];

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Advanced Encryption Standard cipher.
#[derive(Clone, Debug)]
pub struct Aes {
    inner: Rijndael,
}

fn check_aes_key(key: &[u8]) -> Result<()> {
    if AES_KEY_SIZES.contains(&key.len()) {
        Ok(())
    } else {
        Err(Error::InvalidKeySize {
            len: key.len(),
            expected: "16, 24, or 32 bytes".to_string(),
        })
    }
}

impl Aes {
    /// Creates an AES cipher from a 16, 24, or 32 byte key.
    pub fn new(key: &[u8]) -> Result<Self> {
        check_aes_key(key)?;
        Ok(Self {
            inner: Rijndael::with_block_size(key, AES_BLOCK_SIZE)?,
        })
    }

    /// Creates an AES-256 cipher with a key drawn from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let mut key = [0u8; 32];
        rng.fill_bytes(&mut key);
        let aes = Self::new(&key);
        key.zeroize();
        aes
    }

    /// The cipher key.
    pub fn key(&self) -> &[u8] {
        self.inner.key()
    }

    /// Replaces the key.
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        check_aes_key(key)?;
        self.inner.set_key(key)
    }

    /// Resolved sizes; `block_columns` is always 4.
    pub fn settings(&self) -> &Settings {
        self.inner.settings()
    }

    /// Encrypts one 16-byte block.
    pub fn encrypt(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.inner.encrypt(input)
    }

    /// Decrypts one 16-byte block.
    pub fn decrypt(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.inner.decrypt(input)
    }

    /// One-shot encryption of a single block.
    pub fn encrypt_with_key(input: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        Self::new(key)?.encrypt(input)
    }

    /// One-shot decryption of a single block.
    pub fn decrypt_with_key(input: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        Self::new(key)?.decrypt(input)
    }

    /// The underlying generalized cipher.
    pub fn as_rijndael(&self) -> &Rijndael {
        &self.inner
    }
}

impl BlockCipher for Aes {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        self.inner.encrypt_block(block)
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<()> {
        self.inner.decrypt_block(block)
    }
}
