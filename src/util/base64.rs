//! Handling of Base 64-encoded data.
//!
//! This module provides the flavors of Base 64 used in this crate. Each
//! flavor is a struct describing how Base 64 is used in a certain context so
//! you don’t have to remember the exact engine configuration but just pick
//! your application.
use base64::Engine;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
#[cfg(feature = "serde")]
use base64::engine::general_purpose::STANDARD;
use crate::error::RoaError;

pub use base64::DecodeError;


//------------ Armor ---------------------------------------------------------

/// The flavor used inside PEM-style armor.
///
/// Uses the standard alphabet. Encoding adds padding. Decoding operates on
/// input that has already been stripped of everything but alphabet
/// characters, so it neither needs nor checks padding and it tolerates
/// non-zero bits in a short final group.
pub struct Armor;

impl Armor {
    const ENGINE: GeneralPurpose = GeneralPurpose::new(
        &base64::alphabet::STANDARD,
        GeneralPurposeConfig::new()
            .with_encode_padding(true)
            .with_decode_padding_mode(DecodePaddingMode::Indifferent)
            .with_decode_allow_trailing_bits(true)
    );

    /// Appends the encoding of `data` to `target`.
    pub fn encode_into(
        self, data: &[u8], target: &mut String
    ) -> Result<(), RoaError> {
        target.try_reserve(encoded_len(data.len())).map_err(|_| {
            RoaError::OutOfMemory
        })?;
        Self::ENGINE.encode_string(data, target);
        Ok(())
    }

    /// Appends the decoded `symbols` to `target`.
    ///
    /// The symbols must only contain characters of the alphabet.
    pub fn decode_into(
        self, symbols: &[u8], target: &mut Vec<u8>
    ) -> Result<(), DecodeError> {
        Self::ENGINE.decode_vec(symbols, target)
    }
}


//------------ Serde ---------------------------------------------------------

/// The flavor used for serialization of objects in this crate.
///
/// It uses the standard alphabet with padding and no white space allowed.
#[cfg(feature = "serde")]
pub struct Serde;

#[cfg(feature = "serde")]
impl Serde {
    const ENGINE: GeneralPurpose = STANDARD;

    pub fn decode(self, input: &str) -> Result<Vec<u8>, DecodeError> {
        Self::ENGINE.decode(input)
    }

    pub fn encode(self, data: &[u8]) -> String {
        Self::ENGINE.encode(data)
    }
}


//------------ Helpers -------------------------------------------------------

/// Returns the length of the padded encoding of `len` octets.
pub fn encoded_len(len: usize) -> usize {
    (len + 2) / 3 * 4
}

/// Returns whether `ch` is part of the standard alphabet.
pub fn is_alphabet(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'+' || ch == b'/'
}


//============ Tests =========================================================
