//! Request id and code generation
//!
//! Both draw from `OsRng`. Codes used to be derived from the sub-second
//! clock digits, which made consecutive codes predictable; the external
//! shape (fixed digit count, numeric) is unchanged.

use rand::{rngs::OsRng, Rng};

/// Length of a request id, separators included
pub const REQUEST_ID_LENGTH: usize = 36;

/// Indices holding a `-` separator (8-4-4-4-12 grouping)
const SEPARATOR_POSITIONS: [usize; 4] = [8, 13, 18, 23];

const SEPARATOR: char = '-';

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a request id shaped like `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
///
/// Every non-separator position is drawn uniformly from `[a-z0-9]`. This is
/// not an RFC 4122 UUID: there are no version or variant bits.
pub fn generate_request_id() -> String {
    let mut rng = OsRng;
    (0..REQUEST_ID_LENGTH)
        .map(|i| {
            if SEPARATOR_POSITIONS.contains(&i) {
                SEPARATOR
            } else {
                char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())])
            }
        })
        .collect()
}

/// Generate a decimal code of exactly `length` digits.
///
/// The leading digit is never zero, so the integer form keeps all `length`
/// digits when it is stored and echoed back as a number.
pub fn generate_check_code(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|i| {
            let digit: u8 = if i == 0 {
                rng.gen_range(1..=9)
            } else {
                rng.gen_range(0..=9)
            };
            char::from(b'0' + digit)
        })
        .collect()
}
