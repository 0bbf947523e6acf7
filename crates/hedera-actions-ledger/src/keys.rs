//! Private and public key encoding.
//!
//! Keys travel as hex strings. Private keys are accepted either DER encoded
//! (PKCS#8 for ED25519, SEC1 wrapped for ECDSA secp256k1) or as 32 raw bytes,
//! which are read as ED25519. Keys always print DER encoded.
//!
//! ED25519 signs the message bytes directly; ECDSA signs their Keccak-256
//! digest. Both produce 64-byte signatures.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signer as _, Verifier as _};
use k256::ecdsa::signature::{DigestSigner as _, DigestVerifier as _};
use rand::rngs::OsRng;
use serde::{Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::error::LedgerError;

const ED25519_PRIVATE_PREFIX: &str = "302e020100300506032b657004220420";
const ECDSA_PRIVATE_PREFIX: &str = "3030020100300706052b8104000a04220420";
const ED25519_PUBLIC_PREFIX: &str = "302a300506032b6570032100";
const ECDSA_PUBLIC_PREFIX: &str = "302d300706052a8648ce3d020106052b8104000a032200";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
  Ed25519,
  Ecdsa,
}

/// A private key able to authorize transactions.
#[derive(Clone)]
pub enum PrivateKey {
  Ed25519(ed25519_dalek::SigningKey),
  Ecdsa(k256::ecdsa::SigningKey),
}

impl PrivateKey {
  pub fn generate_ed25519() -> Self {
    Self::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng))
  }

  pub fn generate_ecdsa() -> Self {
    Self::Ecdsa(k256::ecdsa::SigningKey::random(&mut OsRng))
  }

  pub fn generate(algorithm: KeyAlgorithm) -> Self {
    match algorithm {
      KeyAlgorithm::Ed25519 => Self::generate_ed25519(),
      KeyAlgorithm::Ecdsa => Self::generate_ecdsa(),
    }
  }

  pub fn algorithm(&self) -> KeyAlgorithm {
    match self {
      PrivateKey::Ed25519(_) => KeyAlgorithm::Ed25519,
      PrivateKey::Ecdsa(_) => KeyAlgorithm::Ecdsa,
    }
  }

  pub fn public_key(&self) -> PublicKey {
    match self {
      PrivateKey::Ed25519(key) => PublicKey::Ed25519(key.verifying_key().to_bytes()),
      PrivateKey::Ecdsa(key) => {
        let point = key.verifying_key().to_encoded_point(true);
        let mut compressed = [0u8; 33];
        compressed.copy_from_slice(point.as_bytes());
        PublicKey::Ecdsa(compressed)
      }
    }
  }

  /// Sign `message` in-process.
  pub fn sign(&self, message: &[u8]) -> Vec<u8> {
    match self {
      PrivateKey::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
      PrivateKey::Ecdsa(key) => {
        let signature: k256::ecdsa::Signature = key.sign_digest(Keccak256::new_with_prefix(message));
        signature.to_bytes().to_vec()
      }
    }
  }

  fn from_ed25519_bytes(hex_str: &str) -> Result<Self, LedgerError> {
    let bytes = decode_fixed::<32>(hex_str)?;
    Ok(Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(&bytes)))
  }

  fn from_ecdsa_bytes(hex_str: &str) -> Result<Self, LedgerError> {
    let bytes = decode_fixed::<32>(hex_str)?;
    k256::ecdsa::SigningKey::from_slice(&bytes)
      .map(Self::Ecdsa)
      .map_err(|e| LedgerError::invalid_key(format!("invalid ECDSA scalar: {}", e)))
  }
}

impl FromStr for PrivateKey {
  type Err = LedgerError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    let hex_str = trimmed
      .strip_prefix("0x")
      .unwrap_or(trimmed)
      .to_ascii_lowercase();

    if let Some(raw) = hex_str.strip_prefix(ED25519_PRIVATE_PREFIX) {
      Self::from_ed25519_bytes(raw)
    } else if let Some(raw) = hex_str.strip_prefix(ECDSA_PRIVATE_PREFIX) {
      Self::from_ecdsa_bytes(raw)
    } else if hex_str.len() == 64 {
      Self::from_ed25519_bytes(&hex_str)
    } else {
      Err(LedgerError::invalid_key(
        "expected a DER encoded ED25519/ECDSA key or 32 raw hex bytes",
      ))
    }
  }
}

impl fmt::Display for PrivateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PrivateKey::Ed25519(key) => {
        write!(f, "{}{}", ED25519_PRIVATE_PREFIX, hex::encode(key.to_bytes()))
      }
      PrivateKey::Ecdsa(key) => {
        write!(f, "{}{}", ECDSA_PRIVATE_PREFIX, hex::encode(key.to_bytes()))
      }
    }
  }
}

impl fmt::Debug for PrivateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PrivateKey")
      .field("algorithm", &self.algorithm())
      .field("public_key", &self.public_key().to_string())
      .finish()
  }
}

impl PartialEq for PrivateKey {
  fn eq(&self, other: &Self) -> bool {
    self.to_string() == other.to_string()
  }
}

/// A public key, as attached to accounts, tokens and topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKey {
  Ed25519([u8; 32]),
  /// Compressed SEC1 point.
  Ecdsa([u8; 33]),
}

impl PublicKey {
  pub fn algorithm(&self) -> KeyAlgorithm {
    match self {
      PublicKey::Ed25519(_) => KeyAlgorithm::Ed25519,
      PublicKey::Ecdsa(_) => KeyAlgorithm::Ecdsa,
    }
  }

  /// Check a signature produced by [`PrivateKey::sign`].
  pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
    match self {
      PublicKey::Ed25519(bytes) => {
        let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(bytes) else {
          return false;
        };
        ed25519_dalek::Signature::from_slice(signature)
          .is_ok_and(|sig| key.verify(message, &sig).is_ok())
      }
      PublicKey::Ecdsa(bytes) => {
        let Ok(key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes) else {
          return false;
        };
        k256::ecdsa::Signature::from_slice(signature).is_ok_and(|sig| {
          key
            .verify_digest(Keccak256::new_with_prefix(message), &sig)
            .is_ok()
        })
      }
    }
  }
}

impl fmt::Display for PublicKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublicKey::Ed25519(bytes) => write!(f, "{}{}", ED25519_PUBLIC_PREFIX, hex::encode(bytes)),
      PublicKey::Ecdsa(bytes) => write!(f, "{}{}", ECDSA_PUBLIC_PREFIX, hex::encode(bytes)),
    }
  }
}

impl Serialize for PublicKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

fn decode_fixed<const N: usize>(hex_str: &str) -> Result<[u8; N], LedgerError> {
  let bytes = hex::decode(hex_str).map_err(|e| LedgerError::invalid_key(e.to_string()))?;
  let len = bytes.len();
  bytes
    .try_into()
    .map_err(|_| LedgerError::invalid_key(format!("expected {} key bytes, got {}", N, len)))
}
