//! Input source selection for the new-task field.

use crate::input::dictation::{
    DictationBridge, DictationError, DictationSource, DICTATION_UNAVAILABLE_MESSAGE,
};

/// How new-task text is entered.
pub enum TextInputSource {
    /// Typing only; dictation is unsupported on this runtime.
    Keyboard,
    /// Typing plus dictation through the bridge.
    Dictation(DictationBridge),
}

impl TextInputSource {
    /// Picks `Dictation` when the runtime provides a speech source.
    pub fn detect(source: Option<Box<dyn DictationSource + Send>>) -> Self {
        match source {
            Some(source) => Self::Dictation(DictationBridge::new(source)),
            None => Self::Keyboard,
        }
    }

    pub fn is_dictation_available(&self) -> bool {
        matches!(self, Self::Dictation(_))
    }

    /// Explanation shown instead of the dictation control, if any.
    pub fn unavailable_message(&self) -> Option<&'static str> {
        match self {
            Self::Keyboard => Some(DICTATION_UNAVAILABLE_MESSAGE),
            Self::Dictation(_) => None,
        }
    }

    pub fn dictation_mut(&mut self) -> Result<&mut DictationBridge, DictationError> {
        match self {
            Self::Dictation(bridge) => Ok(bridge),
            Self::Keyboard => Err(DictationError::Unavailable),
        }
    }
}
