//! Packed Binary-Coded Decimal
//!
//! Two decimal digits per byte, first digit in the high nibble. Inputs with
//! an odd number of digits are zero-padded on the left before packing, so
//! `"123"` packs to `[0x01, 0x23]`.
//!
//! # Example
//! ```
//! use bcd_codec::{pack, pack_fixed, unpack};
//!
//! assert_eq!(pack("4532").unwrap(), vec![0x45, 0x32]);
//! assert_eq!(pack_fixed("840", 2).unwrap(), vec![0x08, 0x40]);
//! assert_eq!(unpack(&[0x12, 0x99]).unwrap(), "1299");
//! ```

/// Errors raised while packing or unpacking BCD data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BcdError {
    #[error("Invalid digit {ch:?} at position {position}")]
    InvalidDigit { ch: char, position: usize },

    #[error("Value has {digits} digits but the field holds at most {capacity}")]
    Overflow { digits: usize, capacity: usize },

    #[error("Invalid BCD nibble {nibble:#x} in byte {index}")]
    InvalidNibble { nibble: u8, index: usize },
}

/// Packs a string of ASCII digits, left-padding odd-length input with `0`.
pub fn pack(digits: &str) -> Result<Vec<u8>, BcdError> {
    let width = digits.len().div_ceil(2);
    pack_fixed(digits, width)
}

/// Packs `digits` into exactly `width` bytes, zero-padding on the left.
///
/// Fails with [`BcdError::Overflow`] when the value needs more than
/// `width * 2` digits.
pub fn pack_fixed(digits: &str, width: usize) -> Result<Vec<u8>, BcdError> {
    let capacity = width * 2;
    if digits.len() > capacity {
        return Err(BcdError::Overflow {
            digits: digits.len(),
            capacity,
        });
    }

    let mut nibbles = vec![0u8; capacity - digits.len()];
    for (position, ch) in digits.chars().enumerate() {
        let value = ch
            .to_digit(10)
            .ok_or(BcdError::InvalidDigit { ch, position })?;
        nibbles.push(value as u8);
    }

    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Unpacks BCD bytes into their digit string, two digits per byte.
///
/// Nibbles above 9 are rejected rather than rendered as hex.
pub fn unpack(bytes: &[u8]) -> Result<String, BcdError> {
    let mut out = String::with_capacity(bytes.len() * 2);
    for (index, byte) in bytes.iter().enumerate() {
        for nibble in [byte >> 4, byte & 0x0F] {
            if nibble > 9 {
                return Err(BcdError::InvalidNibble { nibble, index });
            }
            out.push(char::from(b'0' + nibble));
        }
    }
    Ok(out)
}
