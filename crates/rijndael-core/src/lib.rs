//! Generalized Rijndael block cipher with an AES facade.
//!
//! This crate follows the Rijndael proposal and FIPS-197 and provides:
//! - GF(2^8) arithmetic and the S-box built from it.
//! - Key schedules for 128–256 bit keys and blocks in 32-bit steps.
//! - The SubBytes/ShiftRows/MixColumns/AddRoundKey round pipeline.
//! - Single-block encryption and decryption through [`Rijndael`] and [`Aes`].
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; it should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod aes;
mod block;
mod cipher;
mod error;
pub mod field;
mod key;
mod matrix;
mod params;
pub mod round;
mod sbox;

pub use crate::aes::{Aes, AES_BLOCK_SIZE, AES_KEY_SIZES};
pub use crate::block::xor_in_place;
pub use crate::cipher::{decrypt_block, encrypt_block, BlockCipher, Rijndael};
pub use crate::error::{Error, Result};
pub use crate::key::{expand_key, KeySchedule};
pub use crate::matrix::{ByteMatrix, State};
pub use crate::params::{
    rounds, shifts, Settings, MAX_COLUMNS, MAX_ROUNDS, MIN_COLUMNS, MIN_ROUNDS, STATE_ROWS,
};
pub use crate::sbox::{inv_sbox, sbox};
