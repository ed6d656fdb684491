//! Error taxonomy shared by the cipher core and the modes of operation.

use thiserror::Error;

/// Errors raised while configuring or running the cipher.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The key length is not acceptable for the cipher being constructed.
    #[error("invalid key size `{len}` bytes (expected {expected})")]
    InvalidKeySize {
        /// Length of the rejected key in bytes.
        len: usize,
        /// Human readable description of the accepted sizes.
        expected: String,
    },

    /// The block size, or the length of a block handed to the engine, is not acceptable.
    #[error("invalid block size `{len}` bytes (expected {expected})")]
    InvalidBlockSize {
        /// Length of the rejected block in bytes.
        len: usize,
        /// Human readable description of the accepted sizes.
        expected: String,
    },

    /// The named cipher mode is not one of ECB, CBC, CFB, or OFB.
    #[error("unsupported cipher mode `{0}`")]
    UnsupportedCipherMode(String),

    /// The named padding mode is not one of None, Zeros, PKCS7, ANSIX923, or ISO10126.
    #[error("unsupported padding mode `{0}`")]
    UnsupportedPaddingMode(String),

    /// Padding could not be validated on removal.
    #[error("invalid padding")]
    InvalidPadding,

    /// A block mode was asked to process a partial block without padding.
    #[error("incomplete block of `{len}` bytes for a `{block_size}` byte block cipher")]
    IncompleteBlock {
        /// Number of bytes available.
        len: usize,
        /// Block size in bytes.
        block_size: usize,
    },

    /// The initialization vector does not match the block size.
    #[error("invalid IV size `{len}` bytes (expected {expected} bytes)")]
    InvalidIvSize {
        /// Length of the rejected IV in bytes.
        len: usize,
        /// Required IV length in bytes.
        expected: usize,
    },

    /// The feedback size is not usable with the selected mode and block size.
    #[error("invalid feedback size `{bits}` bits for a `{block_bits}` bit block")]
    InvalidFeedbackSize {
        /// Requested feedback size in bits.
        bits: usize,
        /// Block size in bits.
        block_bits: usize,
    },

    /// Two byte sequences that were expected to line up differ in length.
    #[error("length mismatch: expected `{expected}` bytes, got `{actual}`")]
    LengthMismatch {
        /// Expected length in bytes.
        expected: usize,
        /// Observed length in bytes.
        actual: usize,
    },
}

/// Result alias used throughout the workspace.
pub type Result<T> = core::result::Result<T, Error>;
