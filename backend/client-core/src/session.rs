//! Authentication state of one client.
//!
//! ```text
//! Unauthenticated --login--> Authenticated --logout--> Revoked
//!                                  |
//!                                  +--backend unauthorized--> Expired
//! ```
//!
//! `Expired` and `Revoked` are terminal: a new client is needed to log in again.

use crate::auth::AccessToken;
use crate::error::AuthError;

use std::fmt;

use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Expired,
    Revoked,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expired | Self::Revoked)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    token: Option<AccessToken>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            token: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Service account of the logged-in token, if any.
    pub fn service_account_id(&self) -> Option<uuid::Uuid> {
        self.token.as_ref().map(AccessToken::service_account_id)
    }

    /// Precondition for every command except login.
    #[track_caller]
    pub fn require_authenticated(&self, operation: &'static str) -> Result<(), AuthError> {
        if self.is_authenticated() {
            return Ok(());
        }

        Err(AuthError::not_authenticated(operation, self.state))
    }

    /// Precondition for login. Never re-logs-in an authenticated session.
    #[track_caller]
    pub fn begin_login(&self) -> Result<(), AuthError> {
        match self.state {
            SessionState::Unauthenticated => Ok(()),
            SessionState::Authenticated => Err(AuthError::already_authenticated()),
            SessionState::Expired | SessionState::Revoked => {
                Err(AuthError::session_terminated(self.state))
            }
        }
    }

    pub fn complete_login(&mut self, token: AccessToken) {
        info!(
            "Session authenticated for service account {}",
            token.service_account_id()
        );
        self.token = Some(token);
        self.state = SessionState::Authenticated;
    }

    /// Backend no longer accepts the credential.
    pub fn expire(&mut self) {
        if self.state != SessionState::Authenticated {
            debug!("Ignoring expiry of {} session", self.state);
            return;
        }

        warn!("Session expired: backend rejected the credential");
        self.token = None;
        self.state = SessionState::Expired;
    }

    /// Drops the token (zeroized on drop) and ends the session for good.
    pub fn logout(&mut self) {
        if self.state.is_terminal() {
            debug!("Logout on {} session is a no-op", self.state);
            return;
        }

        info!("Session revoked by logout");
        self.token = None;
        self.state = SessionState::Revoked;
    }
}
