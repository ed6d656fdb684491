//! Randomized comparison of chunked streaming against one-shot transforms,
//! and of one-shot ciphertext against the RustCrypto `aes` primitive.

use anyhow::{bail, Result};
use log::{debug, info};
use rand::{Rng, RngCore};
use rijndael_core::{Aes, Error, AES_BLOCK_SIZE, AES_KEY_SIZES};
use rijndael_modes::{CipherMode, CreateTransform, CryptoTransform, Direction, PaddingMode};

use crate::reference::Reference;

const MAX_MESSAGE_BYTES: usize = 64;
const PADDINGS: [PaddingMode; 3] = [PaddingMode::Pkcs7, PaddingMode::AnsiX923, PaddingMode::Iso10126];
/// Mode and feedback size in bits.
const CONFIGS: [(CipherMode, usize); 5] = [
    (CipherMode::Ecb, 128),
    (CipherMode::Cbc, 128),
    (CipherMode::Cfb, 8),
    (CipherMode::Cfb, 128),
    (CipherMode::Ofb, 128),
];

/// Feeds `data` through `transform` in random-sized chunks.
///
/// Decryption keeps at least one block pending so the padded tail reaches
/// `transform_final_block`.
pub fn stream_in_chunks<T: CryptoTransform>(
    transform: &mut T,
    direction: Direction,
    data: &[u8],
    rng: &mut impl RngCore,
) -> Result<Vec<u8>> {
    let bs = transform.block_size();
    let mut out = Vec::with_capacity(data.len() + bs);
    let mut pending = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let take = rng.gen_range(1..=2 * bs).min(data.len() - offset);
        pending.extend_from_slice(&data[offset..offset + take]);
        offset += take;

        let ready = match direction {
            Direction::Encrypt => pending.len(),
            Direction::Decrypt => pending.len().saturating_sub(bs),
        };
        let used = transform.transform_block(&pending[..ready], &mut out)?;
        pending.drain(..used);
    }
    out.extend(transform.transform_final_block(&pending)?);
    Ok(out)
}

fn compare(what: &str, expected: &[u8], actual: &[u8]) -> Result<()> {
    if expected.len() != actual.len() {
        return Err(Error::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        }
        .into());
    }
    if expected != actual {
        bail!(
            "{what} mismatch: expected {}, got {}",
            hex::encode(expected),
            hex::encode(actual)
        );
    }
    Ok(())
}

fn check_once(
    mode: CipherMode,
    bits: usize,
    padding: PaddingMode,
    key_len: usize,
    rng: &mut impl RngCore,
) -> Result<()> {
    let mut key = vec![0u8; key_len];
    let mut iv = [0u8; AES_BLOCK_SIZE];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut iv);
    let mut plain = vec![0u8; rng.gen_range(0..=MAX_MESSAGE_BYTES)];
    rng.fill_bytes(&mut plain);

    let aes = Aes::new(&key)?;
    let reference = Reference::new(&key)?;
    let chain_iv = iv;
    let iv = mode.uses_iv().then_some(&iv[..]);

    let mut enc = aes.create_encryptor(mode, iv, bits, padding)?;
    let streamed = stream_in_chunks(&mut enc, Direction::Encrypt, &plain, rng)?;

    let mut one_shot = aes.create_encryptor(mode, iv, bits, padding)?;
    let expected = one_shot.transform_final_block(&plain)?;
    // ISO 10126 fills with fresh random bytes, so only the length is comparable.
    if padding == PaddingMode::Iso10126 {
        if expected.len() != streamed.len() {
            return Err(Error::LengthMismatch {
                expected: expected.len(),
                actual: streamed.len(),
            }
            .into());
        }
    } else {
        let independent = reference.encrypt(mode, &chain_iv, bits / 8, padding, &plain)?;
        compare("reference ciphertext", &independent, &expected)?;
        compare("ciphertext", &expected, &streamed)?;
    }

    let mut dec = aes.create_decryptor(mode, iv, bits, padding)?;
    let decrypted = stream_in_chunks(&mut dec, Direction::Decrypt, &streamed, rng)?;
    compare("plaintext", &plain, &decrypted)
}

/// Runs `samples` random messages through every mode, padding, and AES key size.
pub fn run(samples: usize, rng: &mut impl RngCore) -> Result<()> {
    let mut total = 0;
    for key_len in AES_KEY_SIZES {
        for (mode, bits) in CONFIGS {
            for padding in PADDINGS {
                for _ in 0..samples {
                    check_once(mode, bits, padding, key_len, rng)?;
                    total += 1;
                }
                debug!("AES-{} {mode}{bits} {padding}: {samples} samples ok", key_len * 8);
            }
        }
    }
    info!("{total} randomized checks passed");
    println!("{total} randomized checks passed!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn randomized_checks_pass() {
        let mut rng = ChaCha20Rng::from_seed([21u8; 32]);
        run(4, &mut rng).expect("all checks pass");
    }

    #[test]
    fn streamed_decrypt_holds_back_padding_block() {
        let mut rng = ChaCha20Rng::from_seed([22u8; 32]);
        let aes = Aes::new(&[0x42u8; 16]).expect("valid key");
        let plain = [0x17u8; 48];

        let mut enc = aes
            .create_encryptor(CipherMode::Ecb, None, 128, PaddingMode::Pkcs7)
            .expect("encryptor");
        let ct = stream_in_chunks(&mut enc, Direction::Encrypt, &plain, &mut rng).expect("encrypt");
        assert_eq!(ct.len(), 64);

        let mut dec = aes
            .create_decryptor(CipherMode::Ecb, None, 128, PaddingMode::Pkcs7)
            .expect("decryptor");
        let pt = stream_in_chunks(&mut dec, Direction::Decrypt, &ct, &mut rng).expect("decrypt");
        assert_eq!(pt, plain);
    }

    #[test]
    fn compare_reports_length_mismatch() {
        let err = compare("x", &[1, 2, 3], &[1, 2]).expect_err("lengths differ");
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(compare("x", &[1, 2], &[1, 3]).is_err());
        assert!(compare("x", &[1, 2], &[1, 2]).is_ok());
    }

    #[test]
    fn every_mode_agrees_with_rustcrypto() {
        let mut rng = ChaCha20Rng::from_seed([23u8; 32]);
        for key_len in AES_KEY_SIZES {
            for (mode, bits) in CONFIGS {
                for padding in [PaddingMode::Pkcs7, PaddingMode::AnsiX923] {
                    if let Err(err) = check_once(mode, bits, padding, key_len, &mut rng) {
                        panic!("AES-{} {mode}{bits} {padding}: {err:#}", key_len * 8);
                    }
                }
            }
        }
    }
}
