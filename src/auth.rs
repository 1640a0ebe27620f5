//! Mock authentication provider
//!
//! Accepts two hard-wired test accounts and lets anyone register. Sessions
//! are persisted through the injected [`SessionStore`].

use crate::state::{DocumentHistory, Session, SessionStore, User};
use chrono::Utc;
use std::time::Duration;

/// Address that gets the admin screen
pub const ADMIN_EMAIL: &str = "admin@docuforge.com";

/// Token handed out for every successful sign-in
pub const DUMMY_TOKEN: &str = "dummy-jwt-token";

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

struct TestAccount {
    email: &'static str,
    password: &'static str,
    id: &'static str,
    name: &'static str,
}

const TEST_ACCOUNTS: &[TestAccount] = &[
    TestAccount {
        email: ADMIN_EMAIL,
        password: "admin123",
        id: "admin-1",
        name: "Admin User",
    },
    TestAccount {
        email: "user@test.com",
        password: "user123",
        id: "user-1",
        name: "Test User",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Sign-up form contents
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.first_name.trim().is_empty() {
            return Err(AuthError::MissingField("First name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(AuthError::MissingField("Last name"));
        }
        if self.email.trim().is_empty() {
            return Err(AuthError::MissingField("Email"));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Login, registration and the current session
pub struct AuthService {
    store: Box<dyn SessionStore>,
    session: Option<Session>,
    latency: Duration,
}

impl AuthService {
    /// Restore any saved session from `store`
    pub fn new(store: Box<dyn SessionStore>, latency: Duration) -> Self {
        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to load session: {e:#}");
                None
            }
        };
        Self {
            store,
            session,
            latency,
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        self.simulate_latency().await;

        let email = email.trim();
        let account = TEST_ACCOUNTS
            .iter()
            .find(|a| a.email == email && a.password == password)
            .ok_or_else(|| {
                tracing::info!(%email, "Rejected sign-in");
                AuthError::InvalidCredentials
            })?;

        let user = User {
            id: account.id.to_string(),
            email: account.email.to_string(),
            name: account.name.to_string(),
            created_at: Utc::now(),
        };
        tracing::info!(user = %user.email, "Signed in");
        Ok(self.start_session(user))
    }

    pub async fn register(&mut self, request: RegisterRequest) -> Result<&User, AuthError> {
        request.validate()?;
        self.simulate_latency().await;

        let user = User {
            id: format!("user-{}", uuid::Uuid::new_v4()),
            email: request.email.trim().to_string(),
            name: request.full_name(),
            created_at: Utc::now(),
        };
        tracing::info!(user = %user.email, "Registered account");
        Ok(self.start_session(user))
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(user = %session.user.email, "Signed out");
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear session: {e:#}");
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|u| u.email == ADMIN_EMAIL)
    }

    /// The signed-in user's document history, empty when signed out
    pub fn history(&self) -> DocumentHistory {
        let Some(user) = self.current_user() else {
            return DocumentHistory::default();
        };
        self.store.load_history(&user.id).unwrap_or_else(|e| {
            tracing::warn!("Failed to load history: {e:#}");
            DocumentHistory::default()
        })
    }

    pub fn save_history(&mut self, history: &DocumentHistory) -> anyhow::Result<()> {
        let Some(user_id) = self.current_user().map(|u| u.id.clone()) else {
            return Ok(());
        };
        self.store.save_history(&user_id, history)
    }

    fn start_session(&mut self, user: User) -> &User {
        let session = Session {
            user,
            token: DUMMY_TOKEN.to_string(),
        };
        // The session still works for this run if persisting fails
        if let Err(e) = self.store.save(&session) {
            tracing::warn!("Failed to persist session: {e:#}");
        }
        &self.session.insert(session).user
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
