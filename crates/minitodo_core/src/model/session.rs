//! Signed-in identity model.

use serde::{Deserialize, Serialize};

/// Identity returned by a successful sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable user id used as task owner id.
    pub uid: String,
    pub display_name: String,
}

impl Identity {
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
        }
    }

    /// Name shown to the user, falling back to `uid` when the provider
    /// returned no display name.
    pub fn shown_name(&self) -> &str {
        let trimmed = self.display_name.trim();
        if trimmed.is_empty() {
            self.uid.as_str()
        } else {
            trimmed
        }
    }

    /// Header line shown while signed in.
    pub fn greeting(&self) -> String {
        format!("Welcome, {}", self.shown_name())
    }
}
