/*!
 * Subhash derivation for the napiprojekt lookup API.
 *
 * The service refuses lookups unless the request carries a five character
 * "subhash" computed from the content hash. The derivation is a fixed walk over
 * the hash: each step reads one hex digit, uses it to pick a one or two digit
 * window further along the hash, scales that value and keeps the last hex digit
 * of the product.
 */

use crate::errors::HashError;

/// Positions of the digits that select each window
const INDICES: [usize; 5] = [0xE, 0x3, 0x6, 0x8, 0x2];

/// Multiplier applied to each window value
const MULTIPLIERS: [u32; 5] = [2, 2, 5, 4, 3];

/// Offset added to the selecting digit to find the window start
const OFFSETS: [usize; 5] = [0x0, 0xD, 0x10, 0xB, 0x5];

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Length of every derived subhash
pub const SUBHASH_LEN: usize = INDICES.len();

/// Derive the subhash the lookup endpoint expects for `hash`.
///
/// A window that starts on the last character of the hash is one digit wide.
/// Positions outside the hash and non-hex characters are reported as
/// [`HashError`] instead of being guessed around.
pub fn derive_subhash(hash: &str) -> Result<String, HashError> {
    let bytes = hash.as_bytes();
    let mut subhash = String::with_capacity(SUBHASH_LEN);

    for ((&index, &multiplier), &offset) in INDICES.iter().zip(&MULTIPLIERS).zip(&OFFSETS) {
        let start = offset + hex_digit_at(bytes, index)? as usize;
        if start >= bytes.len() {
            return Err(HashError::TooShort {
                position: start,
                length: bytes.len(),
            });
        }

        let end = (start + 2).min(bytes.len());
        let mut value = 0u32;
        for position in start..end {
            value = value * 16 + hex_digit_at(bytes, position)?;
        }

        let product = value * multiplier;
        subhash.push(HEX_DIGITS[(product & 0xF) as usize] as char);
    }

    Ok(subhash)
}

fn hex_digit_at(bytes: &[u8], position: usize) -> Result<u32, HashError> {
    let byte = *bytes.get(position).ok_or(HashError::TooShort {
        position,
        length: bytes.len(),
    })?;

    char::from(byte).to_digit(16).ok_or(HashError::InvalidDigit {
        position,
        character: char::from(byte),
    })
}
