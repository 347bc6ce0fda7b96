//! Phone number utilities
//!
//! Numbers are opaque to the service and are never validated; they only
//! need to be kept out of logs in full.

/// Mask a phone number for logging, keeping only the last 4 characters.
///
/// Works on characters rather than bytes, so arbitrary (non-ASCII) input
/// never panics.
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let tail: String = phone.chars().skip(len - 4).collect();
    format!("***{}", tail)
}
