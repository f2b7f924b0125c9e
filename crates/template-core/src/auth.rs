//! Owner credential verification
//!
//! The owner collection is only exposed after a `CredentialVerifier` accepts
//! the caller. Failure carries no detail about what was wrong.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};

/// Decides whether a submitted secret grants owner access
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, secret: &str) -> bool;

    /// Whether the user has to be prompted for a secret at all
    fn requires_secret(&self) -> bool {
        true
    }
}

/// Accepts secrets whose SHA-256 digest matches a stored hex digest
#[derive(Debug, Clone)]
pub struct Sha256Verifier {
    digest: Vec<u8>,
}

impl Sha256Verifier {
    /// Create from a hex-encoded digest; `None` if it is not valid hex
    pub fn from_hex(digest_hex: &str) -> Option<Self> {
        let digest = hex::decode(digest_hex.trim()).ok()?;
        (digest.len() == 32).then_some(Self { digest })
    }

    /// Hex digest of a secret, for producing the stored value
    pub fn digest_hex(secret: &str) -> String {
        hex::encode(Sha256::digest(secret.as_bytes()))
    }
}

impl CredentialVerifier for Sha256Verifier {
    fn verify(&self, secret: &str) -> bool {
        let candidate = Sha256::digest(secret.as_bytes());
        constant_time_eq(candidate.as_slice(), &self.digest)
    }
}

/// Accepts when the invoking OS user is the configured owner
///
/// The secret is ignored; the login comes from `USER` (or `USERNAME` on
/// Windows).
#[derive(Debug, Clone)]
pub struct OsUserVerifier {
    owner_login: String,
}

impl OsUserVerifier {
    pub fn new(owner_login: impl Into<String>) -> Self {
        Self {
            owner_login: owner_login.into(),
        }
    }

    fn current_login() -> Option<String> {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
    }
}

impl CredentialVerifier for OsUserVerifier {
    fn verify(&self, _secret: &str) -> bool {
        Self::current_login().is_some_and(|login| login == self.owner_login)
    }

    fn requires_secret(&self) -> bool {
        false
    }
}

/// Rejects everything; used when no usable credential is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LockedVerifier;

impl CredentialVerifier for LockedVerifier {
    fn verify(&self, _secret: &str) -> bool {
        false
    }
}

/// Map a verification result onto the error taxonomy
pub fn authorize(verifier: &dyn CredentialVerifier, secret: &str) -> Result<()> {
    if verifier.verify(secret) {
        Ok(())
    } else {
        Err(Error::AuthFailure)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
