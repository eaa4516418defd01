use openssl::hash::MessageDigest;
use openssl::pkcs5::bytes_to_key;
use openssl::symm::Cipher;
use sha2::{Digest, Sha256};

use crate::EncryptError;

/// Key and IV derived from a passphrase
#[derive(Clone)]
pub struct DerivedKey {
    pub key: Vec<u8>,
    pub iv: Option<Vec<u8>>,
}

/// Derive a cipher key and IV from a passphrase (`EVP_BytesToKey`, MD5, one round, no salt)
///
/// Deterministic: the same passphrase always yields the same key and IV.
pub fn derive_key_iv(cipher: Cipher, passphrase: &[u8]) -> Result<DerivedKey, EncryptError> {
    let pair = bytes_to_key(cipher, MessageDigest::md5(), passphrase, None, 1)
        .map_err(|_| EncryptError::KeyDerivation)?;
    Ok(DerivedKey {
        key: pair.key,
        iv: pair.iv,
    })
}

/// Hash data using SHA-256
pub fn hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
