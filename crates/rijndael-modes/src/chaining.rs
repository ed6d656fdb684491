//! Per-mode chaining and feedback registers.

use rijndael_core::{xor_in_place, BlockCipher, Error, Result, MAX_COLUMNS, STATE_ROWS};

use crate::mode::{CipherMode, Direction};

const MAX_BLOCK_BYTES: usize = MAX_COLUMNS * STATE_ROWS;

/// Mutable state carried between blocks of one stream.
#[derive(Clone)]
pub(crate) enum Chaining {
    Ecb,
    Cbc {
        register: Vec<u8>,
        scratch: Vec<u8>,
    },
    Cfb {
        register: Vec<u8>,
        keystream: Vec<u8>,
        feedback_bytes: usize,
    },
    Ofb {
        register: Vec<u8>,
    },
}

fn check_iv(iv: Option<&[u8]>, block_size: usize) -> Result<Vec<u8>> {
    let iv = iv.unwrap_or_default();
    if iv.len() != block_size {
        return Err(Error::InvalidIvSize {
            len: iv.len(),
            expected: block_size,
        });
    }
    Ok(iv.to_vec())
}

impl Chaining {
    pub(crate) fn new(
        mode: CipherMode,
        block_size: usize,
        iv: Option<&[u8]>,
        feedback_bits: usize,
    ) -> Result<Self> {
        let block_bits = block_size * 8;
        match mode {
            CipherMode::Ecb => Ok(Chaining::Ecb),
            CipherMode::Cbc => Ok(Chaining::Cbc {
                register: check_iv(iv, block_size)?,
                scratch: vec![0u8; block_size],
            }),
            CipherMode::Cfb => {
                if feedback_bits == 0 || feedback_bits % 8 != 0 || block_bits % feedback_bits != 0 {
                    return Err(Error::InvalidFeedbackSize {
                        bits: feedback_bits,
                        block_bits,
                    });
                }
                Ok(Chaining::Cfb {
                    register: check_iv(iv, block_size)?,
                    keystream: vec![0u8; block_size],
                    feedback_bytes: feedback_bits / 8,
                })
            }
            CipherMode::Ofb => {
                // Feedback narrower than the block shortens the keystream cycle.
                if feedback_bits != block_bits {
                    return Err(Error::InvalidFeedbackSize {
                        bits: feedback_bits,
                        block_bits,
                    });
                }
                Ok(Chaining::Ofb {
                    register: check_iv(iv, block_size)?,
                })
            }
        }
    }

    /// Reloads the register from a fresh IV.
    pub(crate) fn reset(&mut self, iv: Option<&[u8]>) -> Result<()> {
        match self {
            Chaining::Ecb => Ok(()),
            Chaining::Cbc { register, .. }
            | Chaining::Cfb { register, .. }
            | Chaining::Ofb { register } => {
                *register = check_iv(iv, register.len())?;
                Ok(())
            }
        }
    }

    /// Transforms `data` in place.
    ///
    /// `data` is one full block, except for the feedback modes where the last
    /// segment of a stream may be shorter.
    pub(crate) fn process<C: BlockCipher>(
        &mut self,
        cipher: &C,
        direction: Direction,
        data: &mut [u8],
    ) -> Result<()> {
        match self {
            Chaining::Ecb => match direction {
                Direction::Encrypt => cipher.encrypt_block(data),
                Direction::Decrypt => cipher.decrypt_block(data),
            },
            Chaining::Cbc { register, scratch } => match direction {
                Direction::Encrypt => {
                    xor_in_place(data, register);
                    cipher.encrypt_block(data)?;
                    register.copy_from_slice(data);
                    Ok(())
                }
                Direction::Decrypt => {
                    scratch.copy_from_slice(data);
                    cipher.decrypt_block(data)?;
                    xor_in_place(data, register);
                    core::mem::swap(register, scratch);
                    Ok(())
                }
            },
            Chaining::Ofb { register } => {
                cipher.encrypt_block(register)?;
                xor_in_place(data, register);
                Ok(())
            }
            Chaining::Cfb {
                register,
                keystream,
                feedback_bytes,
            } => {
                let fb = *feedback_bytes;
                let mut ciphertext = [0u8; MAX_BLOCK_BYTES];
                for segment in data.chunks_mut(fb) {
                    keystream.copy_from_slice(register);
                    cipher.encrypt_block(keystream)?;

                    let len = segment.len();
                    if direction == Direction::Decrypt {
                        ciphertext[..len].copy_from_slice(segment);
                    }
                    xor_in_place(segment, keystream);
                    if direction == Direction::Encrypt {
                        ciphertext[..len].copy_from_slice(segment);
                    }

                    // A short segment can only end the stream.
                    if len == fb {
                        let block = register.len();
                        register.copy_within(fb.., 0);
                        register[block - fb..].copy_from_slice(&ciphertext[..fb]);
                    }
                }
                Ok(())
            }
        }
    }
}
