//! Session holder state machine.
//!
//! `SignedOut` (initial) -> `SignedIn` only through a successful provider
//! sign-in; `SignedIn` -> `SignedOut` only through explicit sign-out. A
//! successful sign-in while signed in replaces the identity.

use crate::auth::provider::{AuthError, AuthProvider};
use crate::model::session::Identity;
use log::{info, warn};

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn(Identity),
}

/// Owns the auth provider and the current identity.
pub struct SessionHolder<A: AuthProvider> {
    provider: A,
    state: SessionState,
}

impl<A: AuthProvider> SessionHolder<A> {
    pub fn new(provider: A) -> Self {
        Self {
            provider,
            state: SessionState::SignedOut,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current identity, `None` while signed out.
    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::SignedIn(identity) => Some(identity),
            SessionState::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity().is_some()
    }

    pub fn provider_mut(&mut self) -> &mut A {
        &mut self.provider
    }

    /// Runs the provider sign-in flow.
    ///
    /// On failure the state is left untouched: a signed-out session stays
    /// signed out and an active identity stays signed in.
    pub fn sign_in(&mut self) -> Result<Identity, AuthError> {
        match self.provider.sign_in() {
            Ok(identity) => {
                info!("event=auth_sign_in module=session status=ok");
                self.state = SessionState::SignedIn(identity.clone());
                Ok(identity)
            }
            Err(err) => {
                warn!(
                    "event=auth_sign_in module=session status=error signed_in={} error={err}",
                    self.is_signed_in()
                );
                Err(err)
            }
        }
    }

    /// Signs out. A no-op when already signed out.
    pub fn sign_out(&mut self) {
        if self.is_signed_in() {
            self.provider.sign_out();
            info!("event=auth_sign_out module=session status=ok");
        }
        self.state = SessionState::SignedOut;
    }
}
