//! Application facade composing session, task list, analytics and input.
//!
//! # Responsibility
//! - Gate every task operation on a signed-in identity.
//! - Scope all task reads and writes to that identity.
//! - Clear cached tasks whenever the identity changes.
//!
//! # Invariants
//! - While signed out the cached collection is empty.
//! - A store failure never changes the session state.

use crate::auth::provider::AuthProvider;
use crate::auth::session::SessionHolder;
use crate::error::{AppError, AppResult};
use crate::input::dictation::DictationState;
use crate::input::draft::TaskDraft;
use crate::input::source::TextInputSource;
use crate::model::session::Identity;
use crate::model::task::{Priority, Task, TaskId};
use crate::repo::task_store::TaskStore;
use crate::service::analytics::{AnalyticsAggregator, TaskStats};
use crate::service::clock::Clock;
use crate::service::task_list::{TaskFilter, TaskListController};
use chrono::TimeZone;

/// One user's view of the to-do list.
pub struct TodoApp<A: AuthProvider, S: TaskStore> {
    session: SessionHolder<A>,
    tasks: TaskListController<S>,
    draft: TaskDraft,
    input: TextInputSource,
}

impl<A: AuthProvider, S: TaskStore> TodoApp<A, S> {
    /// Creates a signed-out app with keyboard-only input.
    pub fn new(provider: A, store: S) -> Self {
        Self::from_parts(SessionHolder::new(provider), TaskListController::new(store))
    }

    pub fn with_clock(provider: A, store: S, clock: impl Clock + Send + 'static) -> Self {
        Self::from_parts(
            SessionHolder::new(provider),
            TaskListController::with_clock(store, clock),
        )
    }

    fn from_parts(session: SessionHolder<A>, tasks: TaskListController<S>) -> Self {
        Self {
            session,
            tasks,
            draft: TaskDraft::new(),
            input: TextInputSource::Keyboard,
        }
    }

    pub fn with_input_source(mut self, input: TextInputSource) -> Self {
        self.set_input_source(input);
        self
    }

    /// Replaces the input source; dropping the old bridge stops its source.
    pub fn set_input_source(&mut self, input: TextInputSource) {
        self.input = input;
    }

    pub fn session(&self) -> &SessionHolder<A> {
        &self.session
    }

    pub fn provider_mut(&mut self) -> &mut A {
        self.session.provider_mut()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub fn controller(&self) -> &TaskListController<S> {
        &self.tasks
    }

    pub fn store(&self) -> &S {
        self.tasks.store()
    }

    /// Signs in through the provider and loads the new identity's tasks.
    ///
    /// A failed sign-in leaves the current session, cache and draft as they
    /// were. On success the cache is replaced; a different identity also
    /// drops the previous draft and dictation. When the load fails the
    /// session stays signed in and the error is returned; `reload` retries.
    pub fn sign_in(&mut self) -> AppResult<Identity> {
        let previous_uid = self.session.identity().map(|identity| identity.uid.clone());
        let identity = self.session.sign_in()?;
        if previous_uid.as_deref() != Some(identity.uid.as_str()) {
            self.stop_dictation();
            self.draft.clear();
        }
        self.tasks.clear();
        self.tasks.load(&identity.uid)?;
        Ok(identity)
    }

    /// Signs out and forgets cached tasks, draft and dictation.
    pub fn sign_out(&mut self) {
        self.stop_dictation();
        self.session.sign_out();
        self.tasks.clear();
        self.draft.clear();
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn filtered(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks.filter(filter)
    }

    /// Re-reads the signed-in identity's tasks from the store.
    pub fn reload(&mut self) -> AppResult<&[Task]> {
        let owner_id = self.require_owner()?;
        Ok(self.tasks.load(&owner_id)?)
    }

    /// Adds a task for the signed-in identity; blank text is a silent no-op.
    pub fn add(&mut self, text: &str, priority: Option<Priority>) -> AppResult<Option<TaskId>> {
        let owner_id = self.require_owner()?;
        Ok(self.tasks.add(&owner_id, text, priority)?)
    }

    /// Adds the current draft and clears it on success.
    pub fn add_from_draft(&mut self) -> AppResult<Option<TaskId>> {
        let text = self.draft.text().to_string();
        let priority = self.draft.priority();
        let created = self.add(&text, Some(priority))?;
        if created.is_some() {
            self.draft.clear();
        }
        Ok(created)
    }

    pub fn toggle_completed(&mut self, id: TaskId) -> AppResult<bool> {
        self.require_owner()?;
        Ok(self.tasks.toggle_completed(id)?)
    }

    pub fn delete(&mut self, id: TaskId) -> AppResult<bool> {
        self.require_owner()?;
        Ok(self.tasks.delete(id)?)
    }

    pub fn sort_by_priority(&mut self) {
        self.tasks.sort_by_priority();
    }

    /// Recomputes statistics from a fresh load, bucketing dates in `tz`.
    pub fn stats<Tz: TimeZone>(&self, tz: &Tz) -> AppResult<TaskStats> {
        let owner_id = self.require_owner()?;
        let aggregator = AnalyticsAggregator::new(self.tasks.store());
        Ok(aggregator.summarize(&owner_id, tz)?)
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TaskDraft {
        &mut self.draft
    }

    pub fn input(&self) -> &TextInputSource {
        &self.input
    }

    pub fn dictation_state(&self) -> DictationState {
        match &self.input {
            TextInputSource::Dictation(bridge) => bridge.state(),
            TextInputSource::Keyboard => DictationState::Idle,
        }
    }

    pub fn start_dictation(&mut self) -> AppResult<()> {
        self.input.dictation_mut()?.start()?;
        Ok(())
    }

    /// Applies pending transcripts to the draft.
    pub fn pump_dictation(&mut self) -> AppResult<()> {
        if let TextInputSource::Dictation(bridge) = &mut self.input {
            bridge.pump(&mut self.draft)?;
        }
        Ok(())
    }

    pub fn stop_dictation(&mut self) {
        if let TextInputSource::Dictation(bridge) = &mut self.input {
            bridge.stop();
        }
    }

    fn require_owner(&self) -> AppResult<String> {
        self.session
            .identity()
            .map(|identity| identity.uid.clone())
            .ok_or(AppError::NotSignedIn)
    }
}
