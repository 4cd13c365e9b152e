//! Fixed-width integer encoding for protocol length and version fields.
//!
//! Integers are 4-byte big-endian two's complement. Decoding accepts shorter
//! inputs by left-padding with zero bytes and rejects anything longer than
//! four bytes instead of truncating it.

use crate::error::CryptoError;

/// Width of an encoded integer in bytes.
pub const INT32_SIZE: usize = 4;

/// Encodes `value` as exactly four big-endian bytes, leading zeros kept.
pub fn encode_int32(value: i32) -> [u8; INT32_SIZE] {
    value.to_be_bytes()
}

/// Decodes up to four big-endian bytes into an `i32`.
///
/// `[0x81, 0xA3, 0x99]` decodes as `0x0081A399`; an empty slice decodes to 0.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if `bytes` is longer than four bytes.
pub fn decode_int32(bytes: &[u8]) -> Result<i32, CryptoError> {
    if bytes.len() > INT32_SIZE {
        return Err(CryptoError::InvalidInput(format!(
            "integer encoding is {} bytes, at most {} allowed",
            bytes.len(),
            INT32_SIZE
        )));
    }

    let mut buf = [0u8; INT32_SIZE];
    buf[INT32_SIZE - bytes.len()..].copy_from_slice(bytes);
    Ok(i32::from_be_bytes(buf))
}
