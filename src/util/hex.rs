//! Converting octets to hex strings.

use std::fmt;


/// Writes an octet sequence as upper case hex digits.
pub fn write<W: fmt::Write>(src: &[u8], target: &mut W) -> fmt::Result {
    for ch in src {
        let digits = encode_u8(*ch);
        target.write_char(char::from(digits[0]))?;
        target.write_char(char::from(digits[1]))?;
    }
    Ok(())
}

pub fn encode_u8(ch: u8) -> [u8; 2] {
    [DIGITS[usize::from(ch >> 4)], DIGITS[usize::from(ch & 0x0F)]]
}

const DIGITS: &[u8] = b"0123456789ABCDEF";


//============ Tests =========================================================
