use std::fmt;
use std::str::FromStr;

use openssl::symm::Cipher;
use serde::{Deserialize, Serialize};

use crate::EncryptError;

/// Symmetric cipher used to encrypt the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Algorithm {
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    #[serde(rename = "aes-192-cbc")]
    Aes192Cbc,
    /// AES-256 in CBC mode with passphrase-derived key and IV
    #[default]
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
    #[serde(rename = "aes-128-ctr")]
    Aes128Ctr,
    #[serde(rename = "aes-192-ctr")]
    Aes192Ctr,
    #[serde(rename = "aes-256-ctr")]
    Aes256Ctr,
    /// Authenticated encryption with a random nonce per write
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Self::Aes128Cbc,
        Self::Aes192Cbc,
        Self::Aes256Cbc,
        Self::Aes128Ctr,
        Self::Aes192Ctr,
        Self::Aes256Ctr,
        Self::ChaCha20Poly1305,
    ];

    /// Canonical lower-case name, e.g. `aes-256-cbc`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aes128Cbc => "aes-128-cbc",
            Self::Aes192Cbc => "aes-192-cbc",
            Self::Aes256Cbc => "aes-256-cbc",
            Self::Aes128Ctr => "aes-128-ctr",
            Self::Aes192Ctr => "aes-192-ctr",
            Self::Aes256Ctr => "aes-256-ctr",
            Self::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }

    /// Whether ciphertext is authenticated (tampering and wrong keys are detected)
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::ChaCha20Poly1305)
    }

    /// OpenSSL cipher for the AES family
    pub(crate) fn openssl_cipher(&self) -> Option<Cipher> {
        match self {
            Self::Aes128Cbc => Some(Cipher::aes_128_cbc()),
            Self::Aes192Cbc => Some(Cipher::aes_192_cbc()),
            Self::Aes256Cbc => Some(Cipher::aes_256_cbc()),
            Self::Aes128Ctr => Some(Cipher::aes_128_ctr()),
            Self::Aes192Ctr => Some(Cipher::aes_192_ctr()),
            Self::Aes256Ctr => Some(Cipher::aes_256_ctr()),
            Self::ChaCha20Poly1305 => None,
        }
    }
}

impl FromStr for Algorithm {
    type Err = EncryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| EncryptError::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
