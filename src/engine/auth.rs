//! Local account store: sign-up, sign-in and the persisted session.
//!
//! Accounts live in the local store with salted PBKDF2 hashes. The demo
//! provider sign-in stands in for a third-party identity redirect and
//! never touches the account mapping.

use std::time::Duration;

use crate::db::models::User;
use crate::db::repos::users::{self, AccountRecord};
use crate::db::DbPool;
use crate::engine::crypto::{PasswordHash, DEFAULT_PBKDF2_ITERATIONS};
use crate::error::AppError;
use crate::validation;

pub const DEMO_EMAIL: &str = "demo@gmail.com";
pub const DEMO_NAME: &str = "Demo User";

const NO_ACCOUNT: &str = "No account found with this email";

pub struct AuthService {
    pool: DbPool,
    /// Simulated round-trip before each remote-looking operation.
    latency: Duration,
    iterations: u32,
}

impl AuthService {
    pub fn new(pool: DbPool, latency: Duration) -> Self {
        Self {
            pool,
            latency,
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }

    /// Override the PBKDF2 work factor for newly created accounts.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Run CPU-heavy hashing off the async worker threads.
    async fn hash_off_thread<T, F>(f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))
    }

    async fn simulate_round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// The persisted session, if any. Unreadable sessions count as signed out.
    pub fn current_session(&self) -> Result<Option<User>, AppError> {
        users::get_session(&self.pool)
    }

    /// The signed-in user, or an `Auth` error.
    pub fn require_user(&self) -> Result<User, AppError> {
        self.current_session()?
            .ok_or_else(|| AppError::Auth("Not signed in".into()))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        validation::require_non_empty("Email", email)?;
        validation::require_non_empty("Password", password)?;

        self.simulate_round_trip().await;

        let Some(account) = users::find_account(&self.pool, email)? else {
            tracing::info!("Login rejected: unknown email");
            return Err(AppError::NotFound(NO_ACCOUNT.into()));
        };
        let credential = account.credential.clone();
        let attempt = password.to_string();
        if !Self::hash_off_thread(move || credential.verify(&attempt)).await?? {
            tracing::info!(user_id = %account.user.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        users::set_session(&self.pool, &account.user)?;
        tracing::info!(user_id = %account.user.id, "User signed in");
        Ok(account.user)
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<User, AppError> {
        validation::require_email(email)?;
        validation::require_non_empty("Password", password)?;
        validation::require_non_empty("Name", name)?;

        self.simulate_round_trip().await;

        if users::find_account(&self.pool, email)?.is_some() {
            return Err(AppError::AlreadyExists);
        }

        let user = User::new(email, name.trim());
        let iterations = self.iterations;
        let secret = password.to_string();
        let credential = Self::hash_off_thread(move || PasswordHash::derive_with(&secret, iterations)).await?;
        let record = AccountRecord { credential, user: user.clone() };
        users::insert_account(&self.pool, record)?;
        users::set_session(&self.pool, &user)?;

        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Sign in as a fabricated demo profile, bypassing the account mapping.
    pub async fn login_with_demo_provider(&self) -> Result<User, AppError> {
        self.simulate_round_trip().await;
        let user = User::new(DEMO_EMAIL, DEMO_NAME);
        users::set_session(&self.pool, &user)?;
        tracing::info!(user_id = %user.id, "Demo provider sign-in");
        Ok(user)
    }

    /// Clears the session only; registered accounts remain.
    pub fn logout(&self) -> Result<(), AppError> {
        if users::clear_session(&self.pool)? {
            tracing::info!("User signed out");
        }
        Ok(())
    }

    /// Succeeds for registered emails without sending anything.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        self.simulate_round_trip().await;
        if users::find_account(&self.pool, email)?.is_none() {
            return Err(AppError::NotFound(NO_ACCOUNT.into()));
        }
        // TODO: hand off to the automation webhook once it exposes a reset-mail endpoint.
        tracing::info!("Password reset requested");
        Ok(())
    }
}
