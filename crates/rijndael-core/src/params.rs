//! Size parameters and the fixed tables indexed by them.

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::field::xtime;

/// Rows in the state and in every round key.
pub const STATE_ROWS: usize = 4;
/// Smallest block or key size in 32-bit columns.
pub const MIN_COLUMNS: usize = 4;
/// Largest block or key size in 32-bit columns.
pub const MAX_COLUMNS: usize = 8;
/// Fewest rounds (128-bit key and block).
pub const MIN_ROUNDS: usize = 10;
/// Most rounds (256-bit key or block).
pub const MAX_ROUNDS: usize = 14;

/// Enough round constants for a 256-bit block expanded from a 128-bit key.
const ROUND_CONSTANT_COUNT: usize = MAX_COLUMNS * (MAX_ROUNDS + 1) / MIN_COLUMNS;

/// Rounds by `[key_columns - 4][block_columns - 4]`.
const ROUNDS: [[usize; 5]; 5] = [
    [10, 11, 12, 13, 14],
    [11, 11, 12, 13, 14],
    [12, 12, 12, 13, 14],
    [13, 13, 13, 13, 14],
    [14, 14, 14, 14, 14],
];

/// ShiftRows offsets by `block_columns - 4`.
const SHIFTS: [[usize; STATE_ROWS]; 5] = [
    [0, 1, 2, 3],
    [0, 1, 2, 3],
    [0, 1, 2, 3],
    [0, 1, 2, 4],
    [0, 1, 3, 4],
];

static ROUND_CONSTANTS: Lazy<[u8; ROUND_CONSTANT_COUNT]> = Lazy::new(|| {
    let mut rc = [0u8; ROUND_CONSTANT_COUNT];
    rc[1] = 0x01;
    for i in 2..ROUND_CONSTANT_COUNT {
        rc[i] = xtime(rc[i - 1]);
    }
    rc
});

/// Resolved `(key_columns, block_columns, rounds)` for one key/block size pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Key length in 32-bit columns.
    pub key_columns: usize,
    /// Block length in 32-bit columns.
    pub block_columns: usize,
    /// Number of rounds, not counting the initial key addition.
    pub rounds: usize,
}

impl Settings {
    /// Validates byte lengths and resolves the round count.
    pub fn new(key_bytes: usize, block_bytes: usize) -> Result<Self> {
        let key_columns = key_columns(key_bytes)?;
        let block_columns = block_columns(block_bytes)?;
        Ok(Self {
            key_columns,
            block_columns,
            rounds: rounds(key_columns, block_columns),
        })
    }

    /// Block size in bytes.
    #[inline]
    pub fn block_bytes(&self) -> usize {
        self.block_columns * STATE_ROWS
    }

    /// Key size in bytes.
    #[inline]
    pub fn key_bytes(&self) -> usize {
        self.key_columns * STATE_ROWS
    }
}

/// Converts a key length in bytes to columns, rejecting unsupported sizes.
pub fn key_columns(key_bytes: usize) -> Result<usize> {
    let columns = key_bytes / STATE_ROWS;
    if key_bytes % STATE_ROWS != 0 || !(MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
        return Err(Error::InvalidKeySize {
            len: key_bytes,
            expected: "a multiple of 4 bytes between 16 and 32".to_string(),
        });
    }
    Ok(columns)
}

/// Converts a block length in bytes to columns, rejecting unsupported sizes.
pub fn block_columns(block_bytes: usize) -> Result<usize> {
    let columns = block_bytes / STATE_ROWS;
    if block_bytes % STATE_ROWS != 0 || !(MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
        return Err(Error::InvalidBlockSize {
            len: block_bytes,
            expected: "a multiple of 4 bytes between 16 and 32".to_string(),
        });
    }
    Ok(columns)
}

/// Number of rounds for the given key and block widths (both in 4..=8).
#[inline]
pub fn rounds(key_columns: usize, block_columns: usize) -> usize {
    ROUNDS[key_columns - MIN_COLUMNS][block_columns - MIN_COLUMNS]
}

/// Per-row ShiftRows offsets for a state with `columns` columns (4..=8).
#[inline]
pub fn shifts(columns: usize) -> &'static [usize; STATE_ROWS] {
    &SHIFTS[columns - MIN_COLUMNS]
}

/// Key schedule round constant `rc[i]`: `rc[0] = 0`, `rc[1] = 1`, `rc[i] = xtime(rc[i - 1])`.
#[inline]
pub fn round_constant(i: usize) -> u8 {
    ROUND_CONSTANTS[i]
}
