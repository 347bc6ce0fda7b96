//! Unit tests for request id and code generation

use std::collections::HashSet;

use crate::services::verification::{generate_check_code, generate_request_id, REQUEST_ID_LENGTH};

#[test]
fn test_request_id_shape() {
    let id = generate_request_id();
    assert_eq!(id.len(), REQUEST_ID_LENGTH);

    for (i, c) in id.chars().enumerate() {
        if [8, 13, 18, 23].contains(&i) {
            assert_eq!(c, '-', "expected separator at {} in {}", i, id);
        } else {
            assert!(
                c.is_ascii_lowercase() || c.is_ascii_digit(),
                "unexpected {:?} at {} in {}",
                c,
                i,
                id
            );
        }
    }
}

#[test]
fn test_request_ids_are_unique() {
    let ids: HashSet<String> = (0..1000).map(|_| generate_request_id()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn test_check_code_has_exact_length() {
    for length in 1..=9 {
        for _ in 0..50 {
            let code = generate_check_code(length);
            assert_eq!(code.len(), length);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');

            let numeric: u32 = code.parse().unwrap();
            assert_eq!(numeric.to_string(), code);
        }
    }
}

#[test]
fn test_check_codes_vary() {
    let codes: HashSet<String> = (0..200).map(|_| generate_check_code(6)).collect();
    assert!(codes.len() > 150);
}
