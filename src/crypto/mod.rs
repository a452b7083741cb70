//! Obfuscation helpers
//!
//! A reversible XOR stream cipher over URL-safe base64, for obfuscating
//! small bits of configuration or model metadata. This is not a security
//! boundary; anything that needs real cryptography belongs behind the
//! proprietary placeholders below, which refuse to run until replaced
//! with a local implementation.

use crate::error::{AscensionError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

fn xor_cycle(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, b)| b ^ key[i % key.len()])
        .collect()
}

/// Obfuscate `data` with a cycling XOR over `key` and encode the result
/// as URL-safe base64. Keys shorter than the data repeat cyclically.
pub fn xor_encrypt(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(AscensionError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(URL_SAFE_NO_PAD.encode(xor_cycle(data, key)).into_bytes())
}

/// Reverse [`xor_encrypt`]: decode the base64 payload and XOR it with the
/// same key.
pub fn xor_decrypt(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(AscensionError::InvalidKey("key must not be empty".to_string()));
    }
    let decoded = URL_SAFE_NO_PAD
        .decode(data)
        .map_err(|e| AscensionError::InvalidKey(format!("malformed ciphertext: {}", e)))?;
    Ok(xor_cycle(&decoded, key))
}

/// Placeholder for the proprietary encryption scheme. The real
/// implementation is intentionally absent from this repository; replace
/// the body locally before relying on it.
pub fn encrypt_proprietary_data(_data: &[u8], _key: &[u8]) -> Result<Vec<u8>> {
    Err(AscensionError::NotImplemented(
        "encrypt_proprietary_data must be implemented locally",
    ))
}

/// Placeholder for the proprietary decryption scheme. See
/// [`encrypt_proprietary_data`].
pub fn decrypt_proprietary_data(_data: &[u8], _key: &[u8]) -> Result<Vec<u8>> {
    Err(AscensionError::NotImplemented(
        "decrypt_proprietary_data must be implemented locally",
    ))
}
