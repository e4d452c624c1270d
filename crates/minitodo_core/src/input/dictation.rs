//! Dictation bridge: speech recognition feeding the task draft.
//!
//! # Responsibility
//! - Drive the `Idle -> Recording -> Idle` state machine over a
//!   `DictationSource`.
//! - Overwrite the draft text with the latest transcript.
//!
//! # Invariants
//! - Recognition errors and source-initiated ends always return to `Idle`.
//! - Events are never applied after `stop` or after the bridge is dropped.

use crate::input::draft::TaskDraft;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};

/// Message shown in place of the dictation control when unsupported.
pub const DICTATION_UNAVAILABLE_MESSAGE: &str =
    "Speech recognition is not supported on this device. Type your task instead.";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Event delivered by a running speech-recognition engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationEvent {
    /// Latest full transcript of the current utterance.
    Transcript(String),
    /// Recognition failed; the session is over.
    Error(String),
    /// Engine stopped on its own, e.g. silence timeout.
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationError {
    /// The runtime exposes no speech recognition.
    Unavailable,
    /// The engine refused to start.
    StartFailed(String),
    /// The engine reported an error while recording.
    Recognition(String),
}

impl Display for DictationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => f.write_str(DICTATION_UNAVAILABLE_MESSAGE),
            Self::StartFailed(message) => write!(f, "could not start dictation: {message}"),
            Self::Recognition(message) => write!(f, "speech recognition error: {message}"),
        }
    }
}

impl Error for DictationError {}

/// Speech-recognition capability.
pub trait DictationSource {
    /// Starts recognition and returns the event stream for this session.
    fn start(&mut self) -> Result<Receiver<DictationEvent>, DictationError>;
    /// Stops recognition. Must be safe to call when not running.
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationState {
    Idle,
    Recording,
}

/// Connects a `DictationSource` to the new-task draft.
pub struct DictationBridge {
    source: Box<dyn DictationSource + Send>,
    events: Option<Receiver<DictationEvent>>,
}

impl DictationBridge {
    pub fn new(source: Box<dyn DictationSource + Send>) -> Self {
        Self {
            source,
            events: None,
        }
    }

    pub fn state(&self) -> DictationState {
        if self.events.is_some() {
            DictationState::Recording
        } else {
            DictationState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state() == DictationState::Recording
    }

    /// Starts recording. Already recording is a no-op.
    pub fn start(&mut self) -> Result<(), DictationError> {
        if self.is_recording() {
            return Ok(());
        }
        match self.source.start() {
            Ok(events) => {
                info!("event=dictation_start module=dictation status=ok");
                self.events = Some(events);
                Ok(())
            }
            Err(err) => {
                warn!("event=dictation_start module=dictation status=error error={err}");
                Err(err)
            }
        }
    }

    /// Applies pending engine events to `draft`.
    ///
    /// Each transcript replaces the draft text. An engine error stops the
    /// source, returns to `Idle` and is returned; events queued after it are
    /// dropped.
    pub fn pump(&mut self, draft: &mut TaskDraft) -> Result<(), DictationError> {
        let Some(events) = self.events.as_ref() else {
            return Ok(());
        };

        let mut outcome = Ok(());
        let mut finished = false;
        loop {
            match events.try_recv() {
                Ok(DictationEvent::Transcript(text)) => {
                    draft.set_text(normalize_transcript(&text));
                }
                Ok(DictationEvent::Error(message)) => {
                    warn!("event=dictation_result module=dictation status=error");
                    outcome = Err(DictationError::Recognition(message));
                    finished = true;
                    break;
                }
                Ok(DictationEvent::Ended) | Err(TryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if finished {
            self.stop();
        }
        outcome
    }

    /// Stops recording and discards undelivered events.
    pub fn stop(&mut self) {
        if self.events.take().is_some() {
            self.source.stop();
            info!("event=dictation_stop module=dictation status=ok");
        }
    }
}

impl Drop for DictationBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Collapses whitespace runs and trims.
pub fn normalize_transcript(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

type SenderSlot = Arc<Mutex<Option<Sender<DictationEvent>>>>;

/// Source fed by a host-side engine through a `DictationFeed`.
#[derive(Debug)]
pub struct ChannelDictationSource {
    slot: SenderSlot,
}

/// Host handle pushing engine events into a `ChannelDictationSource`.
#[derive(Debug, Clone)]
pub struct DictationFeed {
    slot: SenderSlot,
}

impl ChannelDictationSource {
    pub fn new() -> (Self, DictationFeed) {
        let slot = SenderSlot::default();
        (
            Self {
                slot: Arc::clone(&slot),
            },
            DictationFeed { slot },
        )
    }
}

impl DictationSource for ChannelDictationSource {
    fn start(&mut self) -> Result<Receiver<DictationEvent>, DictationError> {
        let (sender, receiver) = mpsc::channel();
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(sender);
        Ok(receiver)
    }

    fn stop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl DictationFeed {
    /// Delivers one event. Returns `false` when no session is listening.
    pub fn push(&self, event: DictationEvent) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    pub fn transcript(&self, text: impl Into<String>) -> bool {
        self.push(DictationEvent::Transcript(text.into()))
    }

    pub fn error(&self, message: impl Into<String>) -> bool {
        self.push(DictationEvent::Error(message.into()))
    }

    pub fn end(&self) -> bool {
        self.push(DictationEvent::Ended)
    }

    pub fn is_listening(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_transcript;

    #[test]
    fn normalize_transcript_collapses_whitespace() {
        assert_eq!(normalize_transcript("  buy\n  oat   milk "), "buy oat milk");
        assert_eq!(normalize_transcript("   "), "");
    }
}
