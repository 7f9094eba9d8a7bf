//! Password-based encryption envelope.
//!
//! Keys come from PBKDF2-HMAC-SHA256 over the password; the payload is
//! encrypted with AES-128, AES-256 or DES in CBC mode with PKCS#7 padding.
//!
//! Envelope layout:
//!
//! ```text
//! [param_len: 1][params: param_len][ciphertext...]
//! params = [algorithm id: 1][salt_len: 1][salt][iterations: 4 BE][iv_len: 1][iv]
//! ```
//!
//! Every value needed for decryption except the password travels in the
//! parameters, so the reader never depends on its own configuration to pick
//! the cipher.

use crate::error::{Result, StegoError};
use crate::header::Compatibility;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use hmac::Hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

/// Salt of the historical format, shared by every legacy envelope
pub const LEGACY_SALT: [u8; 8] = [0x28, 0x5F, 0x71, 0xC9, 0x1E, 0x35, 0x0A, 0x62];

/// Iteration count of the historical format
pub const LEGACY_ITERATIONS: u32 = 7;

/// Random salt length for corrected envelopes
pub const SALT_LEN: usize = 16;

/// Iteration count for corrected envelopes
pub const ITERATIONS: u32 = 10_000;

/// Largest parameter block the 1-byte length prefix can describe
pub const MAX_PARAM_LEN: usize = u8::MAX as usize;

/// Password-based encryption algorithm options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionAlgorithm {
    #[default]
    Aes128,
    Aes256,
    Des,
}

impl std::str::FromStr for EncryptionAlgorithm {
    type Err = StegoError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "aes128" | "pbewithhmacsha256andaes128" => Ok(Self::Aes128),
            "aes256" | "pbewithhmacsha256andaes256" => Ok(Self::Aes256),
            "des" | "pbewithmd5anddes" => Ok(Self::Des),
            _ => Err(StegoError::InvalidAlgorithm(s.to_string())),
        }
    }
}

impl std::fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Aes128 => "AES128",
            Self::Aes256 => "AES256",
            Self::Des => "DES",
        };
        f.write_str(name)
    }
}

impl EncryptionAlgorithm {
    fn id(self) -> u8 {
        match self {
            Self::Aes128 => 1,
            Self::Aes256 => 2,
            Self::Des => 3,
        }
    }

    fn from_id(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Self::Aes128),
            2 => Ok(Self::Aes256),
            3 => Ok(Self::Des),
            other => Err(StegoError::InvalidAlgorithm(format!("algorithm id {}", other))),
        }
    }

    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes256 => 32,
            Self::Des => 8,
        }
    }

    pub fn block_len(self) -> usize {
        match self {
            Self::Aes128 | Self::Aes256 => 16,
            Self::Des => 8,
        }
    }
}

/// Algorithm parameters carried in front of the ciphertext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbeParams {
    pub algorithm: EncryptionAlgorithm,
    pub salt: Vec<u8>,
    pub iterations: u32,
    pub iv: Vec<u8>,
}

impl PbeParams {
    /// Fresh parameters for one encryption: random IV, salt per compatibility mode
    pub fn generate(algorithm: EncryptionAlgorithm, compat: Compatibility) -> Self {
        let mut rng = OsRng;
        let (salt, iterations) = match compat {
            Compatibility::Legacy => (LEGACY_SALT.to_vec(), LEGACY_ITERATIONS),
            Compatibility::Corrected => {
                let mut salt = vec![0u8; SALT_LEN];
                rng.fill_bytes(&mut salt);
                (salt, ITERATIONS)
            }
        };
        let mut iv = vec![0u8; algorithm.block_len()];
        rng.fill_bytes(&mut iv);
        Self {
            algorithm,
            salt,
            iterations,
            iv,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let salt_len = u8::try_from(self.salt.len())
            .map_err(|_| StegoError::Crypto(format!("salt too long: {}", self.salt.len())))?;
        let iv_len = u8::try_from(self.iv.len())
            .map_err(|_| StegoError::Crypto(format!("IV too long: {}", self.iv.len())))?;

        let mut buf = Vec::with_capacity(7 + self.salt.len() + self.iv.len());
        buf.push(self.algorithm.id());
        buf.push(salt_len);
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.iterations.to_be_bytes());
        buf.push(iv_len);
        buf.extend_from_slice(&self.iv);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let truncated = || StegoError::CorruptData("truncated encryption parameters".into());

        let (&id, rest) = data.split_first().ok_or_else(truncated)?;
        let algorithm = EncryptionAlgorithm::from_id(id)?;
        let (&salt_len, rest) = rest.split_first().ok_or_else(truncated)?;
        let salt = rest.get(..salt_len as usize).ok_or_else(truncated)?;
        let rest = &rest[salt_len as usize..];
        let iterations = rest
            .get(..4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
            .ok_or_else(truncated)?;
        let (&iv_len, rest) = rest[4..].split_first().ok_or_else(truncated)?;
        if iv_len as usize != rest.len() {
            return Err(StegoError::CorruptData(format!(
                "IV length {} does not match parameter block",
                iv_len
            )));
        }
        if rest.len() != algorithm.block_len() {
            return Err(StegoError::CorruptData(format!(
                "{} needs a {}-byte IV, got {}",
                algorithm,
                algorithm.block_len(),
                rest.len()
            )));
        }
        if iterations == 0 {
            return Err(StegoError::CorruptData("zero key derivation iterations".into()));
        }

        Ok(Self {
            algorithm,
            salt: salt.to_vec(),
            iterations,
            iv: rest.to_vec(),
        })
    }
}

/// Password-keyed encrypt/decrypt of payload bytes
pub struct CryptoEnvelope {
    password: Zeroizing<String>,
    algorithm: EncryptionAlgorithm,
    compat: Compatibility,
}

impl std::fmt::Debug for CryptoEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoEnvelope")
            .field("algorithm", &self.algorithm)
            .field("compat", &self.compat)
            .finish_non_exhaustive()
    }
}

impl CryptoEnvelope {
    pub fn new(password: &str, algorithm: EncryptionAlgorithm, compat: Compatibility) -> Self {
        Self {
            password: Zeroizing::new(password.to_string()),
            algorithm,
            compat,
        }
    }

    /// Build an envelope from an algorithm name, failing with `InvalidAlgorithm`
    pub fn with_algorithm_name(password: &str, name: &str, compat: Compatibility) -> Result<Self> {
        Ok(Self::new(password, name.parse()?, compat))
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let params = PbeParams::generate(self.algorithm, self.compat);
        let encoded = params.to_bytes()?;
        if encoded.len() > MAX_PARAM_LEN {
            return Err(StegoError::Crypto(format!(
                "encryption parameters too long: {} bytes",
                encoded.len()
            )));
        }

        let key = derive_key(&self.password, &params)?;
        let ciphertext = match params.algorithm {
            EncryptionAlgorithm::Aes128 => cbc_encrypt::<aes::Aes128>(&key, &params.iv, plaintext)?,
            EncryptionAlgorithm::Aes256 => cbc_encrypt::<aes::Aes256>(&key, &params.iv, plaintext)?,
            EncryptionAlgorithm::Des => cbc_encrypt::<des::Des>(&key, &params.iv, plaintext)?,
        };
        log::debug!(
            "encrypted {} bytes with {} (params {})",
            plaintext.len(),
            params.algorithm,
            hex::encode(&encoded)
        );

        let mut envelope = Vec::with_capacity(1 + encoded.len() + ciphertext.len());
        envelope.push(encoded.len() as u8);
        envelope.extend_from_slice(&encoded);
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    pub fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>> {
        let (&param_len, rest) = envelope
            .split_first()
            .ok_or_else(|| StegoError::CorruptData("empty encrypted payload".into()))?;
        let param_len = param_len as usize;
        if rest.len() < param_len {
            return Err(StegoError::CorruptData(
                "encrypted payload shorter than its parameters".into(),
            ));
        }
        let params = PbeParams::from_bytes(&rest[..param_len])?;
        let ciphertext = &rest[param_len..];
        if params.algorithm != self.algorithm {
            log::debug!(
                "payload was encrypted with {}, configured {}",
                params.algorithm,
                self.algorithm
            );
        }
        if ciphertext.is_empty() || ciphertext.len() % params.algorithm.block_len() != 0 {
            return Err(StegoError::CorruptData(format!(
                "ciphertext length {} is not a multiple of the {} block size",
                ciphertext.len(),
                params.algorithm
            )));
        }

        let key = derive_key(&self.password, &params)?;
        match params.algorithm {
            EncryptionAlgorithm::Aes128 => cbc_decrypt::<aes::Aes128>(&key, &params.iv, ciphertext),
            EncryptionAlgorithm::Aes256 => cbc_decrypt::<aes::Aes256>(&key, &params.iv, ciphertext),
            EncryptionAlgorithm::Des => cbc_decrypt::<des::Des>(&key, &params.iv, ciphertext),
        }
    }
}

fn derive_key(password: &str, params: &PbeParams) -> Result<Zeroizing<Vec<u8>>> {
    let mut key = Zeroizing::new(vec![0u8; params.algorithm.key_len()]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), &params.salt, params.iterations, &mut key)
        .map_err(|e| StegoError::Crypto(format!("key derivation: {}", e)))?;
    Ok(key)
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let cipher = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| StegoError::Crypto(format!("cipher init: {}", e)))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let cipher = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| StegoError::Crypto(format!("cipher init: {}", e)))?;
    // Block alignment is checked by the caller, so only bad padding is left
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| StegoError::InvalidPassword)
}
