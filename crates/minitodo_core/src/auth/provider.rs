//! `AuthProvider` capability and the host-driven implementation.

use crate::model::session::Identity;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sign-in failure surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The user closed or abandoned the interactive flow.
    Cancelled,
    /// The provider refused the credentials.
    Rejected(String),
    /// The provider could not be reached or misbehaved.
    Provider(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "sign-in was cancelled"),
            Self::Rejected(message) => write!(f, "sign-in rejected: {message}"),
            Self::Provider(message) => write!(f, "sign-in failed: {message}"),
        }
    }
}

impl Error for AuthError {}

/// External identity provider.
pub trait AuthProvider {
    /// Runs the interactive sign-in flow.
    fn sign_in(&mut self) -> Result<Identity, AuthError>;
    fn sign_out(&mut self);
}

impl<A: AuthProvider + ?Sized> AuthProvider for Box<A> {
    fn sign_in(&mut self) -> Result<Identity, AuthError> {
        (**self).sign_in()
    }

    fn sign_out(&mut self) {
        (**self).sign_out()
    }
}

/// Provider whose interactive flow runs in the host (UI shell or CLI).
///
/// The host records the flow outcome with `complete`, and the next
/// `sign_in` consumes it. Without a recorded outcome, sign-in is treated as
/// cancelled.
#[derive(Debug, Default)]
pub struct HostAuthProvider {
    pending: Option<Result<Identity, AuthError>>,
}

impl HostAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with a successful outcome already recorded.
    pub fn with_identity(identity: Identity) -> Self {
        let mut provider = Self::new();
        provider.complete(Ok(identity));
        provider
    }

    /// Records the outcome of the host's interactive flow.
    pub fn complete(&mut self, outcome: Result<Identity, AuthError>) {
        self.pending = Some(outcome);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl AuthProvider for HostAuthProvider {
    fn sign_in(&mut self) -> Result<Identity, AuthError> {
        let identity = self.pending.take().unwrap_or(Err(AuthError::Cancelled))?;
        if identity.uid.trim().is_empty() {
            return Err(AuthError::Rejected("identity has an empty uid".to_string()));
        }
        Ok(identity)
    }

    fn sign_out(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, AuthProvider, HostAuthProvider};
    use crate::model::session::Identity;

    #[test]
    fn sign_in_without_outcome_is_cancelled() {
        let mut provider = HostAuthProvider::new();
        assert_eq!(provider.sign_in().unwrap_err(), AuthError::Cancelled);
    }

    #[test]
    fn outcome_is_consumed_once() {
        let mut provider = HostAuthProvider::with_identity(Identity::new("u1", "Ada"));
        assert_eq!(provider.sign_in().unwrap().uid, "u1");
        assert!(!provider.has_pending());
        assert_eq!(provider.sign_in().unwrap_err(), AuthError::Cancelled);
    }

    #[test]
    fn empty_uid_is_rejected() {
        let mut provider = HostAuthProvider::with_identity(Identity::new("  ", "Nobody"));
        assert!(matches!(provider.sign_in(), Err(AuthError::Rejected(_))));
    }
}
