//! Streaming encryptors and decryptors.

use log::debug;
use rijndael_core::{BlockCipher, Error, Result};

use crate::chaining::Chaining;
use crate::mode::{CipherMode, Direction};
use crate::padding::PaddingMode;

/// Streaming block transform.
///
/// `transform_block` handles whole blocks only and never pads. The remainder
/// of a stream goes to `transform_final_block`, which pads on encryption and
/// strips padding on decryption.
pub trait CryptoTransform {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Transforms the largest block-aligned prefix of `input`, appending the
    /// result to `output`. Returns the number of bytes consumed.
    fn transform_block(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<usize>;

    /// Transforms everything in `input` as the end of the stream.
    fn transform_final_block(&mut self, input: &[u8]) -> Result<Vec<u8>>;
}

/// A configured mode of operation bound to a block cipher.
pub struct Transform<C> {
    cipher: C,
    direction: Direction,
    mode: CipherMode,
    padding: PaddingMode,
    chaining: Chaining,
}

impl<C: BlockCipher> Transform<C> {
    /// Builds a transform.
    ///
    /// `iv` is required for CBC, CFB and OFB and must match the block size.
    /// `feedback_bits` is the CFB segment size; OFB only accepts the full
    /// block. ECB and CBC ignore it.
    pub fn new(
        cipher: C,
        direction: Direction,
        mode: CipherMode,
        iv: Option<&[u8]>,
        feedback_bits: usize,
        padding: PaddingMode,
    ) -> Result<Self> {
        let block_size = cipher.block_size();
        let chaining = Chaining::new(mode, block_size, iv, feedback_bits)?;
        debug!(
            "{direction} transform: mode={mode} padding={padding} block={} bits feedback={} bits",
            block_size * 8,
            if mode == CipherMode::Cfb { feedback_bits } else { block_size * 8 }
        );
        Ok(Self {
            cipher,
            direction,
            mode,
            padding,
            chaining,
        })
    }

    /// Shorthand for an encrypting transform.
    pub fn encryptor(
        cipher: C,
        mode: CipherMode,
        iv: Option<&[u8]>,
        feedback_bits: usize,
        padding: PaddingMode,
    ) -> Result<Self> {
        Self::new(cipher, Direction::Encrypt, mode, iv, feedback_bits, padding)
    }

    /// Shorthand for a decrypting transform.
    pub fn decryptor(
        cipher: C,
        mode: CipherMode,
        iv: Option<&[u8]>,
        feedback_bits: usize,
        padding: PaddingMode,
    ) -> Result<Self> {
        Self::new(cipher, Direction::Decrypt, mode, iv, feedback_bits, padding)
    }

    /// Mode of operation.
    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Padding scheme.
    pub fn padding(&self) -> PaddingMode {
        self.padding
    }

    /// Encrypt or decrypt.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Restarts the stream from a new IV.
    pub fn reset(&mut self, iv: Option<&[u8]>) -> Result<()> {
        self.chaining.reset(iv)
    }

    fn process_blocks(&mut self, data: &mut [u8]) -> Result<()> {
        let bs = self.cipher.block_size();
        for block in data.chunks_mut(bs) {
            if block.len() < bs && !self.mode.is_feedback() {
                return Err(Error::IncompleteBlock {
                    len: block.len(),
                    block_size: bs,
                });
            }
            self.chaining.process(&self.cipher, self.direction, block)?;
        }
        Ok(())
    }

    fn encrypt_final(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let bs = self.cipher.block_size();
        let mut buf = input.to_vec();
        self.padding.pad(&mut buf, bs);
        self.process_blocks(&mut buf)?;
        Ok(buf)
    }

    fn decrypt_final(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let bs = self.cipher.block_size();
        let tail = match input.len() % bs {
            0 if !input.is_empty() => bs,
            rem => rem,
        };
        let mut buf = input.to_vec();
        let (head, last) = buf.split_at_mut(input.len() - tail);
        self.process_blocks(head)?;
        self.process_blocks(last)?;
        self.padding.unpad(&mut buf, bs)?;
        Ok(buf)
    }
}

impl<C: BlockCipher> CryptoTransform for Transform<C> {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn transform_block(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<usize> {
        let bs = self.cipher.block_size();
        let consumed = input.len() - input.len() % bs;
        let start = output.len();
        output.extend_from_slice(&input[..consumed]);
        if let Err(err) = self.process_blocks(&mut output[start..]) {
            output.truncate(start);
            return Err(err);
        }
        Ok(consumed)
    }

    fn transform_final_block(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        match self.direction {
            Direction::Encrypt => self.encrypt_final(input),
            Direction::Decrypt => self.decrypt_final(input),
        }
    }
}

/// Transform factory for any block cipher.
pub trait CreateTransform: BlockCipher + Sized {
    /// Encryptor that borrows this cipher.
    fn create_encryptor(
        &self,
        mode: CipherMode,
        iv: Option<&[u8]>,
        feedback_bits: usize,
        padding: PaddingMode,
    ) -> Result<Transform<&Self>> {
        Transform::encryptor(self, mode, iv, feedback_bits, padding)
    }

    /// Decryptor that borrows this cipher.
    fn create_decryptor(
        &self,
        mode: CipherMode,
        iv: Option<&[u8]>,
        feedback_bits: usize,
        padding: PaddingMode,
    ) -> Result<Transform<&Self>> {
        Transform::decryptor(self, mode, iv, feedback_bits, padding)
    }
}

impl<C: BlockCipher> CreateTransform for C {}
