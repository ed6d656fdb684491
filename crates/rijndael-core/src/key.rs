//! Key schedule: expands a cipher key into `rounds + 1` round-key matrices.

use log::{debug, log_enabled, trace, Level};
use zeroize::Zeroize;

use crate::error::Result;
use crate::matrix::ByteMatrix;
use crate::params::{round_constant, Settings, STATE_ROWS};
use crate::sbox::sbox;

/// Raw key plus the round keys derived from it for one block size.
#[derive(Clone)]
pub struct KeySchedule {
    key: Vec<u8>,
    settings: Settings,
    round_keys: Vec<ByteMatrix>,
}

impl KeySchedule {
    /// Expands `key` for blocks of `block_bytes` bytes.
    pub fn new(key: &[u8], block_bytes: usize) -> Result<Self> {
        let settings = Settings::new(key.len(), block_bytes)?;
        let round_keys = expand_key(key, &settings);
        let schedule = Self {
            key: key.to_vec(),
            settings,
            round_keys,
        };
        schedule.log_rekey();
        Ok(schedule)
    }

    /// Replaces the key, keeping the block size. Every previously derived round key is discarded.
    pub fn rekey(&mut self, key: &[u8]) -> Result<()> {
        *self = Self::new(key, self.settings.block_bytes())?;
        Ok(())
    }

    /// Re-derives the round keys for a different block size.
    pub fn set_block_size(&mut self, block_bytes: usize) -> Result<()> {
        let fresh = Self::new(&self.key, block_bytes)?;
        *self = fresh;
        Ok(())
    }

    /// The raw cipher key.
    #[inline]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Resolved sizes for this schedule.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Round key for `round` (0..=rounds).
    #[inline]
    pub fn round_key(&self, round: usize) -> &ByteMatrix {
        &self.round_keys[round]
    }

    /// All round keys in order.
    #[inline]
    pub fn round_keys(&self) -> &[ByteMatrix] {
        &self.round_keys
    }

    fn log_rekey(&self) {
        debug!(
            "rekeyed rijndael with {}-bit key for {}-bit blocks ({} round keys)",
            self.key.len() * 8,
            self.settings.block_bytes() * 8,
            self.round_keys.len()
        );
        if log_enabled!(Level::Trace) {
            for (i, round_key) in self.round_keys.iter().enumerate() {
                trace!("round key {i}:\n{round_key}");
            }
        }
    }
}

impl Drop for KeySchedule {
    fn drop(&mut self) {
        self.key.zeroize();
        for round_key in self.round_keys.iter_mut() {
            round_key.zeroize();
        }
    }
}

impl core::fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeySchedule")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Expands `key` into the `W` array and slices it into `rounds + 1` round keys.
///
/// `key.len()` must match `settings.key_bytes()`.
pub fn expand_key(key: &[u8], settings: &Settings) -> Vec<ByteMatrix> {
    let nk = settings.key_columns;
    let nb = settings.block_columns;
    let total_columns = nb * (settings.rounds + 1);

    let mut w = ByteMatrix::new(STATE_ROWS, total_columns);
    for col in 0..nk {
        w.column_mut(col)
            .copy_from_slice(&key[col * STATE_ROWS..(col + 1) * STATE_ROWS]);
    }

    for col in nk..total_columns {
        let mut temp = [0u8; STATE_ROWS];
        temp.copy_from_slice(w.column(col - 1));

        if col % nk == 0 {
            temp.rotate_left(1);
            for byte in temp.iter_mut() {
                *byte = sbox(*byte);
            }
            temp[0] ^= round_constant(col / nk);
        } else if nk > 6 && col % nk == 4 {
            for byte in temp.iter_mut() {
                *byte = sbox(*byte);
            }
        }

        for (row, value) in temp.iter().enumerate() {
            let prior = w.get(row, col - nk);
            w.set(row, col, prior ^ value);
        }
    }

    let round_keys = (0..=settings.rounds)
        .map(|round| w.sub_matrix(round * nb, nb))
        .collect();
    w.zeroize();
    round_keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::params::{MAX_COLUMNS, MIN_COLUMNS};

    fn hex_bytes(s: &str) -> Vec<u8> {
        hex::decode(s).expect("valid hex")
    }

    #[test]
    fn aes128_expansion_matches_fips_appendix_a1() {
        let key = hex_bytes("2b7e151628aed2a6abf7158809cf4f3c");
        let schedule = KeySchedule::new(&key, 16).expect("valid key");
        assert_eq!(schedule.round_keys().len(), 11);
        assert_eq!(schedule.round_key(0).as_bytes(), key.as_slice());
        assert_eq!(
            schedule.round_key(1).as_bytes(),
            hex_bytes("a0fafe1788542cb123a339392a6c7605").as_slice()
        );
        assert_eq!(
            schedule.round_key(10).as_bytes(),
            hex_bytes("d014f9a8c9ee2589e13f0cc8b6630ca6").as_slice()
        );
    }

    #[test]
    fn aes256_expansion_matches_fips_appendix_a3() {
        let key = hex_bytes("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
        let schedule = KeySchedule::new(&key, 16).expect("valid key");
        assert_eq!(schedule.round_keys().len(), 15);
        // w[8..12]
        assert_eq!(
            schedule.round_key(2).as_bytes(),
            hex_bytes("9ba354118e6925afa51a8b5f2067fcde").as_slice()
        );
        // w[12..16] exercises the extra SubWord for keys wider than six columns
        assert_eq!(
            schedule.round_key(3).as_bytes(),
            hex_bytes("a8b09c1a93d194cdbe49846eb75d5b9a").as_slice()
        );
    }

    #[test]
    fn round_key_count_is_rounds_plus_one_for_every_size() {
        for nk in MIN_COLUMNS..=MAX_COLUMNS {
            for nb in MIN_COLUMNS..=MAX_COLUMNS {
                let key = vec![0x5au8; nk * 4];
                let schedule = KeySchedule::new(&key, nb * 4).expect("valid sizes");
                let settings = *schedule.settings();
                assert_eq!(schedule.round_keys().len(), settings.rounds + 1);
                for round_key in schedule.round_keys() {
                    assert_eq!(round_key.rows(), 4);
                    assert_eq!(round_key.columns(), nb);
                }
            }
        }
    }

    #[test]
    fn expansion_is_deterministic() {
        let key: Vec<u8> = (0..28).collect();
        let a = KeySchedule::new(&key, 24).expect("valid");
        let b = KeySchedule::new(&key, 24).expect("valid");
        assert_eq!(a.round_keys(), b.round_keys());
    }

    #[test]
    fn rekey_replaces_every_round_key() {
        let mut schedule = KeySchedule::new(&[0u8; 16], 16).expect("valid");
        let before = schedule.round_keys().to_vec();
        schedule.rekey(&[1u8; 24]).expect("valid");
        assert_eq!(schedule.settings().rounds, 12);
        assert_eq!(schedule.round_keys().len(), 13);
        assert_ne!(schedule.round_key(0), &before[0]);
        assert_eq!(schedule.key(), &[1u8; 24]);
    }

    #[test]
    fn set_block_size_keeps_key() {
        let mut schedule = KeySchedule::new(&[7u8; 16], 16).expect("valid");
        schedule.set_block_size(32).expect("valid");
        assert_eq!(schedule.settings().rounds, 14);
        assert_eq!(schedule.round_key(0).columns(), 8);
        assert_eq!(schedule.key(), &[7u8; 16]);
    }

    #[test]
    fn rejects_bad_key_lengths() {
        for len in [0usize, 4, 15, 17, 36] {
            let key = vec![0u8; len];
            assert!(matches!(
                KeySchedule::new(&key, 16),
                Err(Error::InvalidKeySize { .. })
            ));
        }
    }

    #[test]
    fn failed_rekey_leaves_schedule_untouched() {
        let mut schedule = KeySchedule::new(&[3u8; 16], 16).expect("valid");
        assert!(schedule.rekey(&[0u8; 10]).is_err());
        assert_eq!(schedule.key(), &[3u8; 16]);
    }
}
