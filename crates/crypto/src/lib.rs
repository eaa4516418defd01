//! SettingsCraft Cryptography
//!
//! Passphrase-keyed symmetric encryption for settings files at rest.
//!
//! The default algorithm, `aes-256-cbc`, derives both key and IV from the
//! passphrase (OpenSSL `EVP_BytesToKey`, MD5, no salt). Output is therefore
//! deterministic and unauthenticated: it hides the file from casual reading
//! but is not a confidentiality guarantee. `chacha20-poly1305` uses a random
//! nonce and an authentication tag and should be preferred for new files.

mod algorithm;
mod encrypt;
mod keys;

pub use algorithm::*;
pub use encrypt::*;
pub use keys::*;
