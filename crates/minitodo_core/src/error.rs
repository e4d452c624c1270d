//! Facade-level error taxonomy.
//!
//! Empty task text is not an error at this level: it is rejected silently
//! before any store call.

use crate::auth::provider::AuthError;
use crate::input::dictation::DictationError;
use crate::repo::task_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AppResult<T> = Result<T, AppError>;

/// Recoverable failure of one user-initiated operation.
#[derive(Debug)]
pub enum AppError {
    /// Sign-in rejected or cancelled; the session stays signed out.
    Auth(AuthError),
    /// A store call failed; the prior in-memory state is retained.
    Store(StoreError),
    /// Dictation unavailable or recognition failed; recording is back to idle.
    Dictation(DictationError),
    /// A task operation was attempted without a signed-in identity.
    NotSignedIn,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Dictation(err) => write!(f, "{err}"),
            Self::NotSignedIn => write!(f, "please sign in to manage tasks"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Auth(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Dictation(err) => Some(err),
            Self::NotSignedIn => None,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<DictationError> for AppError {
    fn from(value: DictationError) -> Self {
        Self::Dictation(value)
    }
}
