//! Modes of operation and padding for Rijndael-family block ciphers.
//!
//! ECB, CBC, CFB and OFB are exposed as streaming transforms over any
//! [`BlockCipher`]. Each transform owns its chaining register, so one
//! instance serves exactly one stream until [`Transform::reset`] is called.
//!
//! ```
//! use rijndael_core::Aes;
//! use rijndael_modes::{CipherMode, CreateTransform, CryptoTransform, PaddingMode};
//!
//! let aes = Aes::new(&[0u8; 16]).unwrap();
//! let iv = [0u8; 16];
//! let mut enc = aes
//!     .create_encryptor(CipherMode::Cbc, Some(&iv), 128, PaddingMode::Pkcs7)
//!     .unwrap();
//! let ct = enc.transform_final_block(b"attack at dawn").unwrap();
//!
//! let mut dec = aes
//!     .create_decryptor(CipherMode::Cbc, Some(&iv), 128, PaddingMode::Pkcs7)
//!     .unwrap();
//! assert_eq!(dec.transform_final_block(&ct).unwrap(), b"attack at dawn");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chaining;
mod mode;
mod padding;
mod transform;

pub use crate::mode::{CipherMode, Direction};
pub use crate::padding::PaddingMode;
pub use crate::transform::{CreateTransform, CryptoTransform, Transform};
pub use rijndael_core::{BlockCipher, Error, Result};
