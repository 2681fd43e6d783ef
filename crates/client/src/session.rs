//! Session: the one owner of the credential lifecycle.
//!
//! Screens never touch the credential store directly. They log in, log out,
//! report rejected API calls, and ask where a navigation should go.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use eventhub_auth::{
    Credential, CredentialStore, Guard, MalformedCredential, Role, RouteTable, StoreError, UnresolvableIdentity,
    decode,
};
use eventhub_core::UserId;

use crate::routes::{LOGIN_PATH, Navigation, resolve};

/// Who is signed in, as far as the client can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: UserId,
    /// `None` when the credential carries no recognized role.
    pub role: Option<Role>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not signed in")]
    SignedOut,

    #[error("credential is malformed: {0}")]
    Malformed(#[from] MalformedCredential),

    #[error("credential has expired")]
    Expired,

    #[error("credential does not identify a user: {0}")]
    Unresolvable(#[from] UnresolvableIdentity),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// HTTP statuses meaning the backend no longer accepts the credential.
fn is_credential_rejection(status: u16) -> bool {
    matches!(status, 401 | 403)
}

pub struct Session<S> {
    guard: Guard<S>,
}

impl<S: CredentialStore> Session<S> {
    pub fn new(store: S, routes: RouteTable) -> Self {
        Self {
            guard: Guard::new(store, routes),
        }
    }

    pub fn guard(&self) -> &Guard<S> {
        &self.guard
    }

    /// Store the token from a successful login response.
    ///
    /// The token is checked first; one the client cannot read or attribute
    /// to a user is not stored.
    pub fn login(&self, token: impl Into<String>, now: DateTime<Utc>) -> Result<Identity, SessionError> {
        let credential = Credential::new(token);
        let identity = identify(&credential, now)?;

        self.guard.store().set(credential)?;
        tracing::info!(user_id = %identity.user_id, role = ?identity.role, "signed in");
        Ok(identity)
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.guard.store().clear()?;
        tracing::info!("signed out");
        Ok(())
    }

    /// React to the status of any backend API call.
    ///
    /// A rejected credential is cleared and the caller is sent to login,
    /// the same place the guard would send them next. If the store cannot
    /// be cleared the error is returned and no redirect is issued.
    pub fn handle_api_status(&self, status: u16) -> Result<Option<Navigation>, SessionError> {
        if !is_credential_rejection(status) {
            return Ok(None);
        }

        tracing::warn!(status, "backend rejected credential; signing out");
        self.guard.store().clear().inspect_err(|e| {
            tracing::error!(error = %e, "failed to clear rejected credential");
        })?;
        Ok(Some(Navigation::Redirect(LOGIN_PATH.to_string())))
    }

    /// Identity of the signed-in user; never a placeholder.
    pub fn current_identity(&self, now: DateTime<Utc>) -> Result<Identity, SessionError> {
        let credential = self.guard.store().get()?.ok_or(SessionError::SignedOut)?;
        identify(&credential, now)
    }

    /// Where an attempt to open `route` should end up.
    pub fn navigate(&self, route: &str, now: DateTime<Utc>) -> Navigation {
        resolve(self.guard.evaluate_route(route, now), route)
    }
}

fn identify(credential: &Credential, now: DateTime<Utc>) -> Result<Identity, SessionError> {
    let claims = decode(credential)?;
    if claims.is_expired_at(now) {
        return Err(SessionError::Expired);
    }

    Ok(Identity {
        user_id: claims.user_id()?,
        role: claims.role().known(),
    })
}
