use aes_gcm::aead::{rand_core::RngCore, Aead, OsRng};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use base64::{engine::general_purpose, Engine as _};

use crate::error::{EngineError, EngineResult};

/// AES-256-GCM encryption for client contact fields (name, email,
/// phone), which are stored encrypted at rest. A random nonce is
/// prepended to each ciphertext before base64 encoding.
#[derive(Clone)]
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl EncryptionService {
    pub fn new(key_str: &str) -> EngineResult<Self> {
        if key_str.len() != 32 {
            return Err(EngineError::Crypto(
                "encryption key must be exactly 32 bytes".to_string(),
            ));
        }

        let key = Key::<Aes256Gcm>::from_slice(key_str.as_bytes());
        let cipher = Aes256Gcm::new(key);

        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> EngineResult<String> {
        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| EngineError::Crypto(format!("encryption failed: {}", e)))?;

        let mut encrypted = nonce_bytes.to_vec();
        encrypted.extend_from_slice(&ciphertext);

        Ok(general_purpose::STANDARD.encode(&encrypted))
    }

    pub fn decrypt(&self, encrypted_data: &str) -> EngineResult<String> {
        let encrypted_bytes = general_purpose::STANDARD
            .decode(encrypted_data)
            .map_err(|e| EngineError::Crypto(format!("base64 decode failed: {}", e)))?;

        if encrypted_bytes.len() < 12 {
            return Err(EngineError::Crypto("invalid encrypted data length".to_string()));
        }

        let (nonce_bytes, ciphertext) = encrypted_bytes.split_at(12);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| EngineError::Crypto(format!("decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| EngineError::Crypto(format!("utf-8 conversion failed: {}", e)))
    }

    /// Decrypt an optional field, passing `None` through.
    pub fn decrypt_opt(&self, value: Option<&str>) -> EngineResult<Option<String>> {
        value.map(|v| self.decrypt(v)).transpose()
    }
}
