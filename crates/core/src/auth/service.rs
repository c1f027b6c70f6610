//! Session authenticator.
//!
//! A request is authenticated only when both checks pass:
//! 1. the bearer token verifies (signature, algorithm, expiry), and
//! 2. the session it names is the user's current session and is not revoked.
//!
//! Revoking a session therefore kills every outstanding token for it at once,
//! without keeping a token blacklist.

use std::sync::Arc;

use chrono::{Duration, Utc};
use fxgate_shared::types::{SessionId, UserId};
use fxgate_shared::{AccessToken, Claims, JwtService};
use tracing::{debug, info, warn};

use super::error::AuthError;
use super::password::{burn_verification, hash_password, verify_password};
use super::store::CredentialStore;
use super::{User, normalize_email};
use crate::store::StoreError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Identity attached to an authorized request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated user.
    pub user_id: UserId,
    /// Session the presented token is bound to.
    pub session_id: SessionId,
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme must be `Bearer` (any case) followed by a space and a non-empty token.
#[must_use]
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_at_checked(7)?;
    if !scheme.eq_ignore_ascii_case("bearer ") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Mints and verifies tokens and checks them against live session state.
pub struct SessionAuthenticator {
    store: Arc<dyn CredentialStore>,
    jwt: JwtService,
}

impl std::fmt::Debug for SessionAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthenticator")
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

impl SessionAuthenticator {
    /// Creates an authenticator over the given store and signing service.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, jwt: JwtService) -> Self {
        Self { store, jwt }
    }

    /// Signs a token for `session_id` valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn mint(
        &self,
        user_id: UserId,
        session_id: SessionId,
        ttl: Duration,
    ) -> Result<AccessToken, AuthError> {
        let (token, expires_at) = self
            .jwt
            .mint(user_id, session_id, ttl)
            .map_err(AuthError::Token)?;
        Ok(AccessToken::bearer(token, session_id, expires_at))
    }

    /// Verifies a token's signature, algorithm and expiry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` on any rejection, expiry included.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.jwt
            .verify(token)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// True iff `session_id` is the user's current session and is not revoked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the store cannot be read.
    pub async fn is_session_live(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<bool, AuthError> {
        let Some(user) = self.store.find_user(user_id).await? else {
            return Ok(false);
        };
        if user.current_session_id != Some(session_id) {
            return Ok(false);
        }

        let live = self
            .store
            .find_session(session_id)
            .await?
            .is_some_and(|s| s.user_id == user_id && !s.is_revoked());
        Ok(live)
    }

    /// Authorizes a request from its raw `Authorization` header.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingToken` when the header is absent or not a bearer credential
    /// - `AuthError::InvalidToken` when the token fails verification
    /// - `AuthError::SessionRevoked` when the session is no longer live
    pub async fn authorize(&self, authorization: Option<&str>) -> Result<AuthContext, AuthError> {
        let token = authorization
            .and_then(extract_bearer_token)
            .ok_or(AuthError::MissingToken)?;

        let claims = self.verify(token)?;
        let context = AuthContext {
            user_id: claims.user_id(),
            session_id: claims.session_id(),
        };

        if !self
            .is_session_live(context.user_id, context.session_id)
            .await?
        {
            debug!(
                user_id = %context.user_id,
                session_id = %context.session_id,
                "Rejected token for dead session"
            );
            return Err(AuthError::SessionRevoked);
        }

        Ok(context)
    }

    /// Authenticates by email and password and opens a new session.
    ///
    /// Any previous live session of the user is revoked in the same atomic
    /// store operation, so logging in anywhere logs out everywhere else.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidCredentials` for an unknown email or wrong password
    /// - `AuthError::SessionCreation` if the session cannot be persisted
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            burn_verification(password);
            info!(email = %email, "Login attempt for non-existent user");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let rotation = self
            .store
            .rotate_session(user.id, Utc::now())
            .await
            .map_err(AuthError::SessionCreation)?;

        if let Some(revoked) = rotation.revoked {
            info!(user_id = %user.id, session_id = %revoked, "Revoked superseded session");
        }

        let token = self.mint(user.id, rotation.session.id, self.jwt.token_ttl())?;
        info!(user_id = %user.id, session_id = %rotation.session.id, "User logged in");
        Ok(token)
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidInput` if the email has no `@` or the password is too short
    /// - `AuthError::EmailTaken` if the normalized email is already registered
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(AuthError::InvalidInput("email must contain '@'".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .store
            .create_user(&email, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        info!(user_id = %user.id, email = %user.email, "New user registered");
        Ok(user)
    }

    /// Revokes the session behind an authorized request.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the store cannot be updated.
    pub async fn logout(&self, context: AuthContext) -> Result<(), AuthError> {
        let revoked = self
            .store
            .revoke_session(context.session_id, Utc::now())
            .await?;
        if revoked {
            info!(user_id = %context.user_id, session_id = %context.session_id, "Session revoked by logout");
        } else {
            warn!(session_id = %context.session_id, "Logout for an already revoked session");
        }
        Ok(())
    }
}
