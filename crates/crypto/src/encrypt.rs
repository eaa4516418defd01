use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use openssl::symm;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::algorithm::Algorithm;
use crate::keys::{derive_key_iv, hash};

const NONCE_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum EncryptError {
    #[error("Unknown encryption algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("Key derivation failed")]
    KeyDerivation,
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed")]
    DecryptionFailed,
    #[error("Invalid key")]
    InvalidKey,
    #[error("Ciphertext too short")]
    CiphertextTooShort,
}

/// Encrypt data with a passphrase using the given algorithm
pub fn encrypt(
    algorithm: Algorithm,
    passphrase: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, EncryptError> {
    match algorithm.openssl_cipher() {
        Some(cipher) => {
            let derived = derive_key_iv(cipher, passphrase)?;
            symm::encrypt(cipher, &derived.key, derived.iv.as_deref(), plaintext)
                .map_err(|_| EncryptError::EncryptionFailed)
        }
        None => encrypt_symmetric(&hash(passphrase), plaintext),
    }
}

/// Decrypt data produced by [`encrypt`] with the same algorithm and passphrase
///
/// For the unauthenticated AES modes a wrong passphrase is usually caught by
/// the padding check (CBC) but may also yield garbage; callers must validate
/// the plaintext.
pub fn decrypt(
    algorithm: Algorithm,
    passphrase: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, EncryptError> {
    match algorithm.openssl_cipher() {
        Some(cipher) => {
            let derived = derive_key_iv(cipher, passphrase)?;
            symm::decrypt(cipher, &derived.key, derived.iv.as_deref(), ciphertext)
                .map_err(|_| EncryptError::DecryptionFailed)
        }
        None => decrypt_symmetric(&hash(passphrase), ciphertext),
    }
}

/// Encrypt data with a symmetric key (ChaCha20-Poly1305, random nonce prepended)
pub fn encrypt_symmetric(key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, EncryptError> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| EncryptError::InvalidKey)?;

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| EncryptError::EncryptionFailed)?;

    let mut result = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypt data with a symmetric key
pub fn decrypt_symmetric(key: &[u8; 32], ciphertext: &[u8]) -> Result<Vec<u8>, EncryptError> {
    if ciphertext.len() < NONCE_LEN {
        return Err(EncryptError::CiphertextTooShort);
    }

    let nonce = Nonce::from_slice(&ciphertext[..NONCE_LEN]);
    let ciphertext = &ciphertext[NONCE_LEN..];

    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| EncryptError::InvalidKey)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| EncryptError::DecryptionFailed)
}
