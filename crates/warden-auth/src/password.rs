//! Password hashing with Argon2id

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::AuthError;

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// Check that Argon2 accepts these parameters
    pub fn validate(&self) -> Result<(), AuthError> {
        self.params().map(|_| ())
    }

    fn params(&self) -> Result<Params, AuthError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }
}

/// Hashes new passwords and verifies login attempts
///
/// Every hash gets a fresh random salt. Verification reads the cost from the
/// stored PHC string, so hashes written under an older cost keep working.
#[derive(Clone)]
pub struct PasswordService {
    params: Params,
    /// Hash of a random value, verified against when a login names an
    /// unknown user so that path costs as much as a wrong password.
    dummy_hash: Arc<str>,
}

impl PasswordService {
    pub fn new(cost: HashCost) -> Result<Self, AuthError> {
        let params = cost.params()?;

        let dummy_secret = SaltString::generate(&mut OsRng);
        let dummy_hash = hash_with(&argon2id(&params), dummy_secret.as_str())?;

        Ok(Self {
            params,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        argon2id(&self.params)
    }

    /// Hash a password with a fresh salt
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        hash_with(&self.argon2(), password)
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `Ok(false)`; an unparseable hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswordHash(e.to_string())),
        }
    }

    /// Verify a login attempt, which may name a user that does not exist
    ///
    /// With no stored hash the password is checked against the dummy hash
    /// and the result is always `false`.
    pub fn verify_login(&self, password: &str, stored_hash: Option<&str>) -> Result<bool, AuthError> {
        match stored_hash {
            Some(hash) => self.verify(password, hash),
            None => {
                self.verify(password, &self.dummy_hash)?;
                Ok(false)
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| AuthError::PasswordHash(format!("hashing task failed: {}", e)))?
    }

    /// [`verify_login`](Self::verify_login) on the blocking thread pool
    pub async fn verify_login_blocking(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> Result<bool, AuthError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify_login(&password, stored_hash.as_deref()))
            .await
            .map_err(|e| AuthError::PasswordHash(format!("verification task failed: {}", e)))?
    }
}

fn argon2id(params: &Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}
