//! Argon2id adapter for the password hashing port.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use masterhub_application::PasswordHasher as PasswordHasherPort;
use masterhub_core::{AppError, AppResult};

/// Memory cost in KiB used for login passwords.
pub const DEFAULT_MEMORY_KIB: u32 = 19_456;
/// Number of Argon2 passes used for login passwords.
pub const DEFAULT_ITERATIONS: u32 = 2;

/// Argon2id password hasher producing PHC strings.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the default cost parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS)
    }

    /// Creates a hasher with explicit memory and time costs.
    ///
    /// Invalid costs fall back to the argon2 crate defaults.
    #[must_use]
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Self {
        let params =
            Params::new(memory_kib, iterations, 1, None).unwrap_or_else(|_| Params::default());

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let stored = PasswordHash::new(hash).map_err(|error| {
            AppError::Internal(format!("failed to parse stored password hash: {error}"))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "failed to verify password: {error}"
            ))),
        }
    }
}
