// Symmetric encryption for anti-theft command payloads: AES-256-GCM with 16-byte IVs

use crate::core::errors::CryptoError;
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// AES-256-GCM with a 128-bit nonce
type Aes256Gcm16 = AesGcm<Aes256, U16>;

const IV_LEN: usize = 16;
const TAG_LEN: usize = 16;
const KEY_HEX_LEN: usize = 64;

/// One encrypted value: IV, ciphertext and authentication tag, each hex-encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    pub iv: String,
    pub content: String,
    #[serde(rename = "authTag")]
    pub auth_tag: String,
}

impl EncryptedEnvelope {
    /// Serialize to the JSON string form stored alongside commands
    pub fn to_json_string(&self) -> String {
        // Three plain string fields; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Envelope as read from untrusted input; any field may be missing
#[derive(Deserialize)]
struct RawEnvelope {
    iv: Option<String>,
    content: Option<String>,
    #[serde(rename = "authTag")]
    auth_tag: Option<String>,
}

/// Authenticated cipher keyed once at startup
pub struct CommandCipher {
    cipher: Aes256Gcm16,
}

impl CommandCipher {
    /// Build a cipher from a 64-character hex key
    pub fn from_hex_key(key_hex: &str) -> Result<Self, CryptoError> {
        if key_hex.len() != KEY_HEX_LEN || !key_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CryptoError::InvalidKey(
                "ENCRYPTION_KEY must be a 64-character hexadecimal string (32 bytes)".to_string(),
            ));
        }

        let mut key_bytes = hex::decode(key_hex)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid hex: {}", e)))?;
        let cipher = Aes256Gcm16::new_from_slice(&key_bytes)
            .map_err(|_| CryptoError::InvalidKey("Key must be 32 bytes".to_string()));
        key_bytes.zeroize();

        Ok(Self { cipher: cipher? })
    }

    /// Encrypt `plaintext` under a fresh random IV
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedEnvelope, CryptoError> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let mut buffer = plaintext.as_bytes().to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        Ok(EncryptedEnvelope {
            iv: hex::encode(iv),
            content: hex::encode(&buffer),
            auth_tag: hex::encode(tag),
        })
    }

    /// Decrypt an envelope, failing closed on any malformed field or tag mismatch
    pub fn decrypt_envelope(&self, envelope: &EncryptedEnvelope) -> Result<String, CryptoError> {
        let iv = decode_field(&envelope.iv, "iv")?;
        let tag = decode_field(&envelope.auth_tag, "authTag")?;
        let mut buffer = decode_field(&envelope.content, "content")?;

        if iv.len() != IV_LEN {
            return Err(CryptoError::InvalidCiphertext("iv must be 16 bytes".to_string()));
        }
        if tag.len() != TAG_LEN {
            return Err(CryptoError::InvalidCiphertext("authTag must be 16 bytes".to_string()));
        }

        self.cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&iv),
                b"",
                &mut buffer,
                Tag::from_slice(&tag),
            )
            .map_err(|_| CryptoError::InvalidCiphertext("authentication failed".to_string()))?;

        String::from_utf8(buffer)
            .map_err(|_| CryptoError::InvalidCiphertext("plaintext is not UTF-8".to_string()))
    }

    /// Decrypt the JSON string form of an envelope
    pub fn decrypt(&self, encrypted: &str) -> Result<String, CryptoError> {
        if encrypted.is_empty() {
            return Err(CryptoError::InvalidCiphertext("empty string".to_string()));
        }

        let raw: RawEnvelope = serde_json::from_str(encrypted)
            .map_err(|_| CryptoError::InvalidCiphertext("malformed JSON".to_string()))?;

        match (raw.iv, raw.content, raw.auth_tag) {
            (Some(iv), Some(content), Some(auth_tag)) => self.decrypt_envelope(&EncryptedEnvelope {
                iv,
                content,
                auth_tag,
            }),
            _ => Err(CryptoError::InvalidCiphertext(
                "missing required fields (iv, content, authTag)".to_string(),
            )),
        }
    }
}

fn decode_field(value: &str, field: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(value).map_err(|_| CryptoError::InvalidCiphertext(format!("{} is not valid hex", field)))
}

impl fmt::Debug for CommandCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandCipher")
            .field("key", &"<REDACTED>")
            .finish()
    }
}
