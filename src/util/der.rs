//! Framing of DER values.
//!
//! The decoders in this crate want to know exactly where a value ends so
//! they can report trailing data or truncated input with its position. This
//! module only looks at the tag and length octets of the outermost value.

use crate::error::RoaError;


/// Returns the total length of the DER value starting at `data`.
///
/// This is the length of tag, length, and content octets together. It may
/// be larger than `data` if the value is truncated.
pub fn value_len(data: &[u8]) -> Result<usize, RoaError> {
    let mut pos = 0;

    // Tag. Long-form tag numbers continue while the top bit is set.
    let first = *data.first().ok_or_else(|| {
        RoaError::encoding(0, "empty input")
    })?;
    pos += 1;
    if first & 0x1f == 0x1f {
        loop {
            let octet = *data.get(pos).ok_or_else(|| {
                RoaError::encoding(data.len(), "truncated tag")
            })?;
            pos += 1;
            if octet & 0x80 == 0 {
                break
            }
        }
    }

    // Length.
    let octet = *data.get(pos).ok_or_else(|| {
        RoaError::encoding(data.len(), "truncated length")
    })?;
    pos += 1;
    let len = if octet & 0x80 == 0 {
        usize::from(octet)
    }
    else if octet == 0x80 {
        return Err(RoaError::encoding(pos - 1, "indefinite length"))
    }
    else {
        let count = usize::from(octet & 0x7f);
        if count > std::mem::size_of::<usize>() {
            return Err(RoaError::encoding(pos - 1, "length too large"))
        }
        let octets = data.get(pos..pos + count).ok_or_else(|| {
            RoaError::encoding(data.len(), "truncated length")
        })?;
        pos += count;
        octets.iter().fold(0usize, |len, octet| {
            (len << 8) | usize::from(*octet)
        })
    };
    pos.checked_add(len).ok_or_else(|| {
        RoaError::encoding(pos, "length too large")
    })
}

/// Checks that `data` contains exactly one DER value.
///
/// If the value ends before the data, the offset of the error is that of the
/// first octet not belonging to the value. If it overruns the data, the
/// offset is the length of the data.
pub fn check_exact(data: &[u8]) -> Result<(), RoaError> {
    let len = value_len(data)?;
    if len < data.len() {
        Err(RoaError::encoding(len, "trailing data after value"))
    }
    else if len > data.len() {
        Err(RoaError::encoding(data.len(), "value exceeds input"))
    }
    else {
        Ok(())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn offset(res: Result<(), RoaError>) -> usize {
        match res {
            Err(RoaError::InvalidEncoding { offset, .. }) => offset,
            _ => panic!("expected encoding error")
        }
    }

    #[test]
    fn lengths() {
        assert_eq!(value_len(b"\x05\x00").unwrap(), 2);
        assert_eq!(value_len(b"\x30\x03\x02\x01\x03").unwrap(), 5);
        assert_eq!(value_len(b"\x30\x81\x80").unwrap(), 131);
        assert_eq!(value_len(b"\x30\x82\x01\x00").unwrap(), 260);
        assert_eq!(value_len(b"\x1f\x81\x01\x00").unwrap(), 4);
    }

    #[test]
    fn exact() {
        assert!(check_exact(b"\x30\x03\x02\x01\x03").is_ok());
        assert_eq!(offset(check_exact(b"\x30\x03\x02\x01\x03\x00")), 5);
        assert_eq!(offset(check_exact(b"\x30\x04\x02\x01\x03")), 5);
        assert_eq!(offset(check_exact(b"\x30\x80\x00\x00")), 1);
        assert_eq!(offset(check_exact(b"\x30\x82\x01")), 3);
        assert_eq!(offset(check_exact(b"")), 0);
    }
}
