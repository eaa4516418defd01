//! Document serialization and at-rest encryption

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use settingscraft_crypto::{decrypt, encrypt, Algorithm};

use crate::error::CodecError;
use crate::StoreConfig;

/// Widest indent honoured when prettifying
const MAX_INDENT: usize = 10;

/// Converts the settings document to and from file bytes
#[derive(Clone)]
pub struct Codec {
    indent: Option<String>,
    encryption: Option<(Algorithm, String)>,
}

impl Codec {
    pub fn new(config: &StoreConfig) -> Self {
        let indent = (config.prettify && config.num_spaces > 0)
            .then(|| " ".repeat(config.num_spaces.min(MAX_INDENT)));
        let encryption = config
            .encryption_key
            .clone()
            .map(|key| (config.encryption_algorithm, key));

        Self { indent, encryption }
    }

    /// Serialize (and encrypt, if configured) a document
    pub fn encode(&self, document: &Value) -> Result<Vec<u8>, CodecError> {
        let text = match &self.indent {
            Some(indent) => {
                let mut out = Vec::new();
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                document.serialize(&mut serializer)?;
                out
            }
            None => serde_json::to_vec(document)?,
        };

        match &self.encryption {
            Some((algorithm, key)) => Ok(encrypt(*algorithm, key.as_bytes(), &text)?),
            None => Ok(text),
        }
    }

    /// Decrypt (if configured) and parse file bytes
    pub fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        match &self.encryption {
            Some((algorithm, key)) => {
                let text = decrypt(*algorithm, key.as_bytes(), bytes)?;
                Ok(serde_json::from_slice(&text)?)
            }
            None => Ok(serde_json::from_slice(bytes)?),
        }
    }
}
