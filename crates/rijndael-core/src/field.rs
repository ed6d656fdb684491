//! Arithmetic in GF(2^8) modulo the Rijndael polynomial `x^8 + x^4 + x^3 + x + 1`.
//!
//! Multiplication, inversion, and the S-box affine map are table driven. The
//! tables are pure functions of fixed constants and are built once on first use.
//! Apart from [`xtime`], nothing here is constant-time.

use once_cell::sync::Lazy;

/// Low byte of the reduction polynomial (`0x11B`).
const REDUCTION: u8 = 0x1b;

/// Top row of the affine matrix, most significant output bit first.
const AFFINE_TOP_ROW: u8 = 0b1111_1000;

/// Constant vector added after the affine matrix multiply.
const AFFINE_CONSTANT: u8 = 0b0110_0011;

struct LogTables {
    log: [u8; 256],
    antilog: [u8; 256],
}

static LOG_TABLES: Lazy<LogTables> = Lazy::new(build_log_tables);
static INVERSE_TABLE: Lazy<[u8; 256]> = Lazy::new(build_inverse_table);
static AFFINE_TABLE: Lazy<[u8; 256]> = Lazy::new(build_affine_table);

/// Multiplies `b` by `x`, reducing modulo the field polynomial.
///
/// The reduction constant is masked in rather than selected with a branch so
/// both cases execute the same instructions.
#[inline]
pub fn xtime(b: u8) -> u8 {
    let mask = 0u8.wrapping_sub(b >> 7);
    (b << 1) ^ (REDUCTION & mask)
}

/// Multiplies `b` by the generator `x + 1` (`0x03`).
#[inline]
fn x_plus_1_time(b: u8) -> u8 {
    xtime(b) ^ b
}

/// Discrete logarithm of `a` to the base `0x03`. `log(0)` is defined as 0.
pub fn log(a: u8) -> u8 {
    LOG_TABLES.log[a as usize]
}

/// Inverse of [`log`]: `0x03` raised to the power `i`.
pub fn antilog(i: u8) -> u8 {
    LOG_TABLES.antilog[i as usize]
}

/// Multiplies two field elements.
pub fn multiply(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let tables = &*LOG_TABLES;
    let sum = (tables.log[a as usize] as usize + tables.log[b as usize] as usize) % 255;
    tables.antilog[sum]
}

/// Multiplicative inverse of `a`, with `inverse(0) == 0`.
pub fn inverse(a: u8) -> u8 {
    INVERSE_TABLE[a as usize]
}

/// The S-box affine map: bit-matrix multiply followed by XOR with `0x63`.
pub fn affine_transform(a: u8) -> u8 {
    AFFINE_TABLE[a as usize]
}

fn build_log_tables() -> LogTables {
    let mut log = [0u8; 256];
    let mut antilog = [0u8; 256];

    antilog[0] = 1;
    for i in 1..256 {
        antilog[i] = x_plus_1_time(antilog[i - 1]);
        log[antilog[i] as usize] = i as u8;
    }
    // antilog[255] wraps back to 1 and would otherwise leave log[1] == 255.
    log[1] = 0;

    LogTables { log, antilog }
}

fn calculate_inverse(a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    (1..=255u8)
        .find(|&candidate| multiply(a, candidate) == 1)
        .unwrap_or_else(|| panic!("no multiplicative inverse for {a:#04x}; field tables are corrupt"))
}

fn build_inverse_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (a, slot) in table.iter_mut().enumerate() {
        *slot = calculate_inverse(a as u8);
    }
    table
}

fn calculate_affine(a: u8) -> u8 {
    let mut out = 0u8;
    for row in 0..8 {
        let mask = AFFINE_TOP_ROW.rotate_right(row);
        let parity = (mask & a).count_ones() as u8 & 1;
        out |= parity << (7 - row);
    }
    out ^ AFFINE_CONSTANT
}

fn build_affine_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (a, slot) in table.iter_mut().enumerate() {
        *slot = calculate_affine(a as u8);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_and_add_multiply(mut a: u8, mut b: u8) -> u8 {
        let mut product = 0u8;
        while b != 0 {
            if b & 1 != 0 {
                product ^= a;
            }
            a = xtime(a);
            b >>= 1;
        }
        product
    }

    #[test]
    fn xtime_matches_fips_examples() {
        assert_eq!(xtime(0x57), 0xae);
        assert_eq!(xtime(0xae), 0x47);
        assert_eq!(xtime(0x47), 0x8e);
        assert_eq!(xtime(0x8e), 0x07);
    }

    #[test]
    fn multiply_matches_fips_examples() {
        assert_eq!(multiply(0x57, 0x83), 0xc1);
        assert_eq!(multiply(0x57, 0x13), 0xfe);
        assert_eq!(multiply(0x00, 0x13), 0x00);
        assert_eq!(multiply(0x57, 0x00), 0x00);
    }

    #[test]
    fn multiply_agrees_with_shift_and_add() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!(multiply(a, b), shift_and_add_multiply(a, b), "{a:#04x} * {b:#04x}");
            }
        }
    }

    #[test]
    fn log_and_antilog_are_inverse_on_nonzero_elements() {
        assert_eq!(log(1), 0);
        assert_eq!(antilog(0), 1);
        for a in 1..=255u8 {
            assert_eq!(antilog(log(a)), a);
        }
    }

    #[test]
    fn inverse_is_multiplicative_inverse() {
        assert_eq!(inverse(0), 0);
        assert_eq!(inverse(1), 1);
        assert_eq!(inverse(0x53), 0xca);
        for a in 1..=255u8 {
            assert_eq!(multiply(a, inverse(a)), 1, "{a:#04x}");
        }
    }

    #[test]
    fn affine_transform_known_values() {
        assert_eq!(affine_transform(0x00), 0x63);
        assert_eq!(affine_transform(0xca), 0xed);
    }
}
