use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::middleware::auth::{hash_password, hash_token, verify_password};
use crate::modules::auth::models::{
    AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, Role, User,
};
use crate::modules::auth::repositories::{SessionRepository, UserRepository};

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 64;
const MIN_PASSWORD_LEN: usize = 8;

/// Usernames are stored lowercased so they line up with delivery-lead owner
/// keys and match the same way on every storage backend
fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Username/password accounts and opaque session tokens
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    token_secret: Vec<u8>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        token_secret: impl Into<Vec<u8>>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            token_secret: token_secret.into(),
            session_ttl,
        }
    }

    /// Register a `user`-role account
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let username = normalize_username(&request.username);
        Self::validate_username(&username)?;
        Self::validate_password(&request.password)?;

        let user = self.create_user(username, &request.password, Role::User).await?;
        info!(username = %user.username, "User registered");

        Ok(user)
    }

    /// Check credentials and open a session
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let invalid = || AppError::unauthorized("Invalid username or password");

        let user = self
            .users
            .find_by_username(&normalize_username(&request.username))
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(username = %user.username, "Failed login attempt");
            return Err(invalid());
        }

        let now = Utc::now();
        let purged = self.sessions.purge_expired(now).await?;
        if purged > 0 {
            info!(purged, "Expired sessions removed");
        }

        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let expires_at = now + self.session_ttl;
        self.sessions
            .create(&hash_token(&self.token_secret, &token)?, &user.id, expires_at)
            .await?;

        info!(username = %user.username, role = %user.role, "User logged in");

        Ok(AuthResponse {
            token,
            username: user.username,
            role: user.role,
            expires_at,
        })
    }

    /// Revoke the session behind a token; unknown tokens are ignored
    pub async fn logout(&self, token: &str) -> Result<()> {
        let token_hash = hash_token(&self.token_secret, token)?;
        self.sessions.revoke(&token_hash).await?;
        Ok(())
    }

    /// Resolve a token to its user
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let token_hash = hash_token(&self.token_secret, token)?;

        self.sessions
            .find_user(&token_hash, Utc::now())
            .await?
            .map(|user| AuthenticatedUser::from(&user))
            .ok_or_else(|| AppError::unauthorized("Invalid or expired session"))
    }

    /// Create the bootstrap administrator if it does not exist yet
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<()> {
        let username = normalize_username(username);

        if let Some(existing) = self.users.find_by_username(&username).await? {
            if existing.role != Role::Admin {
                warn!(username = %username, "Bootstrap admin name belongs to a regular user");
            }
            return Ok(());
        }

        Self::validate_password(password)?;
        self.create_user(username.clone(), password, Role::Admin).await?;
        info!(username = %username, "Bootstrap admin created");

        Ok(())
    }

    async fn create_user(&self, username: String, password: &str, role: Role) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash: hash_password(password)?,
            role,
            created_at: Utc::now(),
        };

        self.users.create(&user).await
    }

    fn validate_username(username: &str) -> Result<()> {
        let len = username.chars().count();
        if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
            return Err(AppError::validation(format!(
                "Username must be {} to {} characters",
                MIN_USERNAME_LEN, MAX_USERNAME_LEN
            )));
        }

        if username.chars().any(char::is_whitespace) {
            return Err(AppError::validation("Username cannot contain whitespace"));
        }

        Ok(())
    }

    fn validate_password(password: &str) -> Result<()> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(())
    }
}
