//! Login accounts and password authentication.
//!
//! Every failed login reports the same generic error and still pays for one
//! password hash, so callers cannot tell unknown emails from bad passwords.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use masterhub_core::{AppError, AppResult, TenantId, UserIdentity};
use masterhub_domain::{EmailAddress, UserId};

/// Message returned for every rejected login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Tenant the user belongs to.
    pub tenant_id: TenantId,
    /// Normalized login email.
    pub email: EmailAddress,
    /// Name shown in the UI and stored in audit columns.
    pub display_name: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Inactive users cannot log in.
    pub is_active: bool,
    /// Staff users administer tenants.
    pub is_staff: bool,
}

impl UserRecord {
    /// Builds the session identity of this user.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.email.as_str(),
            self.display_name.as_str(),
            Some(self.email.as_str().to_owned()),
            self.tenant_id,
        )
        .with_staff(self.is_staff)
    }
}

/// Repository port for login accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by normalized email.
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>>;

    /// Inserts a user. Fails with `AppError::Conflict` when the email is taken.
    async fn create(&self, user: &UserRecord) -> AppResult<()>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Parameters for creating a login account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Tenant the user belongs to.
    pub tenant_id: TenantId,
    /// Login email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Plaintext password.
    pub password: String,
    /// Whether the user administers tenants.
    pub is_staff: bool,
}

/// Application service for login accounts.
#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    /// Creates an auth service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    /// Checks the credentials and returns the identity to store in the session.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<UserIdentity> {
        let user = match EmailAddress::new(email) {
            Ok(email) => self.user_repository.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user.filter(|user| user.is_active) else {
            let _ = self.password_hasher.hash_password(password);
            return Err(invalid_credentials());
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            return Err(invalid_credentials());
        }

        info!(user_id = %user.id, tenant_id = %user.tenant_id, "user logged in");
        Ok(user.identity())
    }

    /// Creates an active login account.
    pub async fn create_user(&self, new_user: NewUser) -> AppResult<UserRecord> {
        let email = EmailAddress::new(new_user.email)?;
        let display_name = new_user.display_name.trim().to_owned();
        if display_name.is_empty() {
            return Err(AppError::Validation(
                "display name must not be empty".to_owned(),
            ));
        }
        if new_user.password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_owned()));
        }

        let user = UserRecord {
            id: UserId::new(),
            tenant_id: new_user.tenant_id,
            email,
            display_name,
            password_hash: self.password_hasher.hash_password(&new_user.password)?,
            is_active: true,
            is_staff: new_user.is_staff,
        };
        self.user_repository.create(&user).await?;
        Ok(user)
    }

    /// Returns the user registered under an email, if any.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let email = EmailAddress::new(email)?;
        self.user_repository.find_by_email(&email).await
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_owned())
}
