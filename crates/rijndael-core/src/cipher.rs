//! Rijndael block encryption and decryption over a pre-expanded key schedule.

use log::{log_enabled, trace, Level};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::key::KeySchedule;
use crate::matrix::State;
use crate::params::{Settings, MAX_COLUMNS, MIN_COLUMNS, STATE_ROWS};
use crate::round::Round;

/// Single-block primitive consumed by the modes of operation.
pub trait BlockCipher {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts exactly one block in place.
    fn encrypt_block(&self, block: &mut [u8]) -> Result<()>;

    /// Decrypts exactly one block in place.
    fn decrypt_block(&self, block: &mut [u8]) -> Result<()>;
}

impl<C: BlockCipher + ?Sized> BlockCipher for &C {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        (**self).encrypt_block(block)
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<()> {
        (**self).decrypt_block(block)
    }
}

fn check_block_len(block: &[u8], settings: &Settings) -> Result<()> {
    let expected = settings.block_bytes();
    if block.len() != expected {
        return Err(Error::InvalidBlockSize {
            len: block.len(),
            expected: format!("{expected} bytes"),
        });
    }
    Ok(())
}

/// Encrypts a single block in place with a pre-expanded key schedule.
pub fn encrypt_block(block: &mut [u8], schedule: &KeySchedule) -> Result<()> {
    let settings = *schedule.settings();
    check_block_len(block, &settings)?;
    let mut state = State::new(block)?;

    Round::Initial.apply(&mut state, schedule, 0);
    for round in 1..settings.rounds {
        Round::Intermediate.apply(&mut state, schedule, round);
        if log_enabled!(Level::Trace) {
            trace!("state after round {round}:\n{state}");
        }
    }
    Round::Final.apply(&mut state, schedule, settings.rounds);

    Ok(())
}

/// Decrypts a single block in place with a pre-expanded key schedule.
pub fn decrypt_block(block: &mut [u8], schedule: &KeySchedule) -> Result<()> {
    let settings = *schedule.settings();
    check_block_len(block, &settings)?;
    let mut state = State::new(block)?;

    Round::Final.inverse(&mut state, schedule, settings.rounds);
    for round in (1..settings.rounds).rev() {
        Round::Intermediate.inverse(&mut state, schedule, round);
    }
    Round::Initial.inverse(&mut state, schedule, 0);

    Ok(())
}

/// Generalized Rijndael with 128–256 bit keys and blocks in 32-bit steps.
#[derive(Clone, Debug)]
pub struct Rijndael {
    schedule: KeySchedule,
}

impl Rijndael {
    /// Default block size in bytes (128 bits).
    pub const DEFAULT_BLOCK_SIZE: usize = MIN_COLUMNS * STATE_ROWS;

    /// Creates a cipher with a 128-bit block.
    pub fn new(key: &[u8]) -> Result<Self> {
        Self::with_block_size(key, Self::DEFAULT_BLOCK_SIZE)
    }

    /// Creates a cipher with an explicit block size in bytes.
    pub fn with_block_size(key: &[u8], block_bytes: usize) -> Result<Self> {
        Ok(Self {
            schedule: KeySchedule::new(key, block_bytes)?,
        })
    }

    /// Creates a cipher with a fresh 256-bit key drawn from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, block_bytes: usize) -> Result<Self> {
        let mut key = [0u8; MAX_COLUMNS * STATE_ROWS];
        rng.fill_bytes(&mut key);
        let cipher = Self::with_block_size(&key, block_bytes);
        key.zeroize();
        cipher
    }

    /// The cipher key.
    pub fn key(&self) -> &[u8] {
        self.schedule.key()
    }

    /// Replaces the key and re-derives every round key.
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.schedule.rekey(key)
    }

    /// Changes the block size (in bytes) and re-derives every round key.
    pub fn set_block_size(&mut self, block_bytes: usize) -> Result<()> {
        self.schedule.set_block_size(block_bytes)
    }

    /// Resolved key columns, block columns, and rounds.
    pub fn settings(&self) -> &Settings {
        self.schedule.settings()
    }

    /// The expanded key schedule.
    pub fn schedule(&self) -> &KeySchedule {
        &self.schedule
    }

    /// Encrypts one block, returning the ciphertext.
    pub fn encrypt(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut block = input.to_vec();
        encrypt_block(&mut block, &self.schedule)?;
        Ok(block)
    }

    /// Decrypts one block, returning the plaintext.
    pub fn decrypt(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut block = input.to_vec();
        decrypt_block(&mut block, &self.schedule)?;
        Ok(block)
    }

    /// One-shot encryption where the block size is taken from `input.len()`.
    pub fn encrypt_with_key(input: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        Self::with_block_size(key, input.len())?.encrypt(input)
    }

    /// One-shot decryption where the block size is taken from `input.len()`.
    pub fn decrypt_with_key(input: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        Self::with_block_size(key, input.len())?.decrypt(input)
    }
}

impl BlockCipher for Rijndael {
    fn block_size(&self) -> usize {
        self.settings().block_bytes()
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        encrypt_block(block, &self.schedule)
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<()> {
        decrypt_block(block, &self.schedule)
    }
}
