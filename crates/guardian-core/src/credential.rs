//! Password hashing seam and its argon2 implementation.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result, parent::Credential};

/// Turns plaintext passwords into stored credentials and checks them back.
pub trait CredentialHasher: Send + Sync {
  /// Hash `plaintext` into a self-describing string (PHC format).
  fn hash(&self, plaintext: &str) -> Result<String>;

  /// Whether `plaintext` matches a hash previously produced by [`hash`].
  /// Malformed hashes never verify.
  ///
  /// [`hash`]: CredentialHasher::hash
  fn verify(&self, plaintext: &str, hash: &str) -> bool;

  /// Build a [`Credential`]; an absent or empty password yields
  /// [`Credential::Unusable`].
  fn make_credential(&self, plaintext: Option<&str>) -> Result<Credential> {
    match plaintext.filter(|p| !p.is_empty()) {
      Some(p) => Ok(Credential::Usable(self.hash(p)?)),
      None => Ok(Credential::Unusable),
    }
  }
}

/// argon2id with default parameters and a fresh random salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
  fn hash(&self, plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(plaintext.as_bytes(), &salt)
      .map(|h| h.to_string())
      .map_err(|e| Error::Credential(format!("argon2 error: {e}")))
  }

  fn verify(&self, plaintext: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
      return false;
    };
    Argon2::default()
      .verify_password(plaintext.as_bytes(), &parsed)
      .is_ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hasher = Argon2Hasher;
    let phc = hasher.hash("secret").unwrap();
    assert!(phc.starts_with("$argon2id$"));
    assert!(hasher.verify("secret", &phc));
    assert!(!hasher.verify("wrong", &phc));
  }

  #[test]
  fn salts_differ() {
    let hasher = Argon2Hasher;
    assert_ne!(hasher.hash("secret").unwrap(), hasher.hash("secret").unwrap());
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!Argon2Hasher.verify("secret", "not-a-phc-string"));
    assert!(!Argon2Hasher.verify("", ""));
  }

  #[test]
  fn empty_or_absent_password_is_unusable() {
    let hasher = Argon2Hasher;
    assert_eq!(hasher.make_credential(None).unwrap(), Credential::Unusable);
    assert_eq!(hasher.make_credential(Some("")).unwrap(), Credential::Unusable);
    assert!(hasher.make_credential(Some("pw")).unwrap().is_usable());
  }
}
