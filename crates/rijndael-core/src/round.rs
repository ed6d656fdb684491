//! Rijndael round layers and their composition into rounds.
//!
//! Each layer is a pair of in-place functions over a [`State`]. Rounds are
//! described as ordered lists of layers; decryption walks a round's list
//! backwards applying each layer's inverse.

use crate::block::xor_in_place;
use crate::field::multiply;
use crate::key::KeySchedule;
use crate::matrix::{ByteMatrix, State};
use crate::params::{shifts, MAX_COLUMNS, STATE_ROWS};
use crate::sbox::{inv_sbox, sbox};

/// Circulant top row for MixColumns.
const MIX: [u8; STATE_ROWS] = [0x02, 0x03, 0x01, 0x01];
/// Circulant top row for the inverse of MixColumns.
const INV_MIX: [u8; STATE_ROWS] = [0x0e, 0x0b, 0x0d, 0x09];

/// Applies SubBytes to the state in place.
#[inline]
pub fn sub_bytes(state: &mut State<'_>) {
    for byte in state.as_bytes_mut().iter_mut() {
        *byte = sbox(*byte);
    }
}

/// Applies the inverse SubBytes transformation.
#[inline]
pub fn inv_sub_bytes(state: &mut State<'_>) {
    for byte in state.as_bytes_mut().iter_mut() {
        *byte = inv_sbox(*byte);
    }
}

/// Performs ShiftRows in place: row `r` rotates left by the width-dependent offset.
pub fn shift_rows(state: &mut State<'_>) {
    rotate_rows(state, false);
}

/// Performs the inverse of ShiftRows in place.
pub fn inv_shift_rows(state: &mut State<'_>) {
    rotate_rows(state, true);
}

fn rotate_rows(state: &mut State<'_>, right: bool) {
    let columns = state.columns();
    let offsets = shifts(columns);
    let mut row_buf = [0u8; MAX_COLUMNS];

    for (row, &offset) in offsets.iter().enumerate().skip(1) {
        let row_bytes = &mut row_buf[..columns];
        for (col, slot) in row_bytes.iter_mut().enumerate() {
            *slot = state.get(row, col);
        }
        if right {
            row_bytes.rotate_right(offset);
        } else {
            row_bytes.rotate_left(offset);
        }
        for (col, value) in row_bytes.iter().enumerate() {
            state.set(row, col, *value);
        }
    }
}

fn mix_single_column(col: &mut [u8], top_row: &[u8; STATE_ROWS]) {
    let mut input = [0u8; STATE_ROWS];
    input.copy_from_slice(col);
    for (row, out) in col.iter_mut().enumerate() {
        *out = top_row
            .iter()
            .enumerate()
            .fold(0u8, |acc, (j, &coef)| {
                acc ^ multiply(coef, input[(row + j) % STATE_ROWS])
            });
    }
}

/// MixColumns over every column.
pub fn mix_columns(state: &mut State<'_>) {
    for col in 0..state.columns() {
        mix_single_column(state.column_mut(col), &MIX);
    }
}

/// Inverse MixColumns over every column.
pub fn inv_mix_columns(state: &mut State<'_>) {
    for col in 0..state.columns() {
        mix_single_column(state.column_mut(col), &INV_MIX);
    }
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut State<'_>, round_key: &ByteMatrix) {
    xor_in_place(state.as_bytes_mut(), round_key.as_bytes());
}

/// One of the four round layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Byte substitution through the S-box.
    SubBytes,
    /// Cyclic row rotation.
    ShiftRows,
    /// Column mixing over GF(2^8).
    MixColumns,
    /// XOR with the round key.
    AddRoundKey,
}

impl Layer {
    /// Applies the layer in the encryption direction.
    pub fn apply(self, state: &mut State<'_>, schedule: &KeySchedule, round: usize) {
        match self {
            Layer::SubBytes => sub_bytes(state),
            Layer::ShiftRows => shift_rows(state),
            Layer::MixColumns => mix_columns(state),
            Layer::AddRoundKey => add_round_key(state, schedule.round_key(round)),
        }
    }

    /// Undoes [`Layer::apply`].
    pub fn inverse(self, state: &mut State<'_>, schedule: &KeySchedule, round: usize) {
        match self {
            Layer::SubBytes => inv_sub_bytes(state),
            Layer::ShiftRows => inv_shift_rows(state),
            Layer::MixColumns => inv_mix_columns(state),
            Layer::AddRoundKey => add_round_key(state, schedule.round_key(round)),
        }
    }
}

/// The three round shapes of the cipher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Round {
    /// Key whitening with round key 0.
    Initial,
    /// Full round used for rounds `1..rounds`.
    Intermediate,
    /// Last round, without MixColumns.
    Final,
}

impl Round {
    /// Layers of this round in encryption order.
    pub const fn layers(self) -> &'static [Layer] {
        match self {
            Round::Initial => &[Layer::AddRoundKey],
            Round::Intermediate => &[
                Layer::SubBytes,
                Layer::ShiftRows,
                Layer::MixColumns,
                Layer::AddRoundKey,
            ],
            Round::Final => &[Layer::SubBytes, Layer::ShiftRows, Layer::AddRoundKey],
        }
    }

    /// Runs the round forwards using round key `round`.
    pub fn apply(self, state: &mut State<'_>, schedule: &KeySchedule, round: usize) {
        for layer in self.layers() {
            layer.apply(state, schedule, round);
        }
    }

    /// Runs the round backwards, inverting each layer.
    pub fn inverse(self, state: &mut State<'_>, schedule: &KeySchedule, round: usize) {
        for layer in self.layers().iter().rev() {
            layer.inverse(state, schedule, round);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn random_state(rng: &mut ChaCha20Rng, columns: usize) -> Vec<u8> {
        let mut buf = vec![0u8; columns * 4];
        rng.fill_bytes(&mut buf);
        buf
    }

    #[test]
    fn shift_rows_matches_aes_permutation() {
        let mut buf: [u8; 16] = core::array::from_fn(|i| i as u8);
        let mut state = State::new(&mut buf).expect("valid");
        shift_rows(&mut state);
        assert_eq!(
            buf,
            [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11]
        );
    }

    #[test]
    fn shift_rows_uses_wider_offsets_for_eight_columns() {
        let mut buf: [u8; 32] = core::array::from_fn(|i| i as u8);
        let mut state = State::new(&mut buf).expect("valid");
        shift_rows(&mut state);
        // Row 2 shifts by 3 and row 3 by 4 for a 256-bit block.
        assert_eq!(state.get(0, 0), 0);
        assert_eq!(state.get(1, 0), 5);
        assert_eq!(state.get(2, 0), 3 * 4 + 2);
        assert_eq!(state.get(3, 0), 4 * 4 + 3);
        assert_eq!(state.get(3, 7), 3 * 4 + 3);
    }

    #[test]
    fn mix_columns_matches_known_columns() {
        let mut buf = [
            0xdb, 0x13, 0x53, 0x45, 0xf2, 0x0a, 0x22, 0x5c, 0x01, 0x01, 0x01, 0x01, 0xc6, 0xc6,
            0xc6, 0xc6,
        ];
        let mut state = State::new(&mut buf).expect("valid");
        mix_columns(&mut state);
        assert_eq!(
            buf,
            [
                0x8e, 0x4d, 0xa1, 0xbc, 0x9f, 0xdc, 0x58, 0x9d, 0x01, 0x01, 0x01, 0x01, 0xc6,
                0xc6, 0xc6, 0xc6,
            ]
        );
    }

    #[test]
    fn linear_layers_invert_for_every_width() {
        let mut rng = ChaCha20Rng::from_seed([30u8; 32]);
        for columns in 4..=8 {
            for _ in 0..32 {
                let original = random_state(&mut rng, columns);

                let mut buf = original.clone();
                let mut state = State::new(&mut buf).expect("valid");
                shift_rows(&mut state);
                inv_shift_rows(&mut state);
                assert_eq!(buf, original, "ShiftRows, {columns} columns");

                let mut buf = original.clone();
                let mut state = State::new(&mut buf).expect("valid");
                mix_columns(&mut state);
                inv_mix_columns(&mut state);
                assert_eq!(buf, original, "MixColumns, {columns} columns");

                let mut buf = original.clone();
                let mut state = State::new(&mut buf).expect("valid");
                sub_bytes(&mut state);
                inv_sub_bytes(&mut state);
                assert_eq!(buf, original, "SubBytes, {columns} columns");
            }
        }
    }

    #[test]
    fn rounds_invert_with_schedule() {
        let mut rng = ChaCha20Rng::from_seed([31u8; 32]);
        for columns in 4..=8 {
            let mut key = vec![0u8; 16];
            rng.fill_bytes(&mut key);
            let schedule = KeySchedule::new(&key, columns * 4).expect("valid");
            for round in [Round::Initial, Round::Intermediate, Round::Final] {
                let original = random_state(&mut rng, columns);
                let mut buf = original.clone();
                let mut state = State::new(&mut buf).expect("valid");
                round.apply(&mut state, &schedule, 1);
                round.inverse(&mut state, &schedule, 1);
                assert_eq!(buf, original, "{round:?}, {columns} columns");
            }
        }
    }

    #[test]
    fn final_round_skips_mix_columns() {
        assert!(!Round::Final.layers().contains(&Layer::MixColumns));
        assert_eq!(Round::Intermediate.layers().len(), 4);
        assert_eq!(Round::Initial.layers(), &[Layer::AddRoundKey]);
    }
}
