//! Rijndael substitution box and its inverse.

use once_cell::sync::Lazy;

use crate::field::{affine_transform, inverse};

struct SubstitutionBox {
    forward: [u8; 256],
    inverse: [u8; 256],
}

static SBOX: Lazy<SubstitutionBox> = Lazy::new(SubstitutionBox::build);

impl SubstitutionBox {
    fn build() -> Self {
        let mut forward = [0u8; 256];
        let mut inverse_table = [0u8; 256];
        let mut seen = [false; 256];

        for a in 0..=255u8 {
            let value = affine_transform(inverse(a));
            assert!(
                !seen[value as usize],
                "S-box is not a bijection: {value:#04x} produced twice"
            );
            seen[value as usize] = true;
            forward[a as usize] = value;
            inverse_table[value as usize] = a;
        }

        Self {
            forward,
            inverse: inverse_table,
        }
    }
}

/// Forward S-box lookup.
#[inline]
pub fn sbox(byte: u8) -> u8 {
    SBOX.forward[byte as usize]
}

/// Inverse S-box lookup.
#[inline]
pub fn inv_sbox(byte: u8) -> u8 {
    SBOX.inverse[byte as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_checks_against_published_table() {
        assert_eq!(sbox(0x00), 0x63);
        assert_eq!(sbox(0x01), 0x7c);
        assert_eq!(sbox(0x53), 0xed);
        assert_eq!(sbox(0xff), 0x16);
        assert_eq!(inv_sbox(0x63), 0x00);
        assert_eq!(inv_sbox(0x00), 0x52);
    }

    #[test]
    fn inverse_undoes_forward_for_every_byte() {
        for a in 0..=255u8 {
            assert_eq!(inv_sbox(sbox(a)), a);
            assert_eq!(sbox(inv_sbox(a)), a);
        }
    }

    #[test]
    fn sbox_has_no_fixed_points() {
        for a in 0..=255u8 {
            assert_ne!(sbox(a), a);
        }
    }
}
