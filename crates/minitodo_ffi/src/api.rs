//! FFI use-case API for the Flutter shell.
//!
//! # Responsibility
//! - Expose task, session, analytics and dictation use-cases to Dart.
//! - Hand the host's sign-in outcome and speech engine events to the core.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Failures come back as messages, never as partially applied state.
//! - One process-wide app instance; every call runs under its lock.

use chrono::FixedOffset;
use minitodo_core::config::ENV_DB_PATH;
use minitodo_core::db::open_db;
use minitodo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppError, AuthError, ChannelDictationSource, DictationFeed, DictationState, HostAuthProvider,
    Identity, Priority, SqliteTaskStore, Task, TaskFilter, TaskStats, TextInputSource, TodoApp,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

const DEFAULT_DB_FILE_NAME: &str = "minitodo_ffi.sqlite3";

type FfiApp = TodoApp<HostAuthProvider, SqliteTaskStore>;

struct FfiState {
    db_path: PathBuf,
    app: FfiApp,
    feed: Option<DictationFeed>,
}

static STATE: Mutex<Option<FfiState>> = Mutex::new(None);

/// Health-check probe.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; always returns `pong`.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version string.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Starts core file logging.
///
/// # FFI contract
/// - Sync call; may create the log directory.
/// - Idempotent for identical `level + log_dir`; a different level or
///   directory returns an error.
/// - Never panics; empty string on success, error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// `high|medium|low`.
    pub priority: String,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Outcome of one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Set when the action created or touched a task.
    pub task_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsResponse {
    pub ok: bool,
    pub completed: u32,
    pub pending: u32,
    pub completion_rate: f64,
    /// e.g. `40.0%`.
    pub completion_rate_label: String,
    pub daily: Vec<DailyCount>,
    pub message: String,
}

/// Points the app at a task database file, signing out any session.
///
/// # FFI contract
/// - Sync call; opens and migrates the SQLite file.
/// - On failure the previous store and session stay in place.
/// - Never panics; empty string on success, error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let mut guard = STATE.lock().unwrap_or_else(PoisonError::into_inner);
    match open_state(Path::new(trimmed)) {
        Ok(state) => {
            *guard = Some(state);
            String::new()
        }
        Err(err) => err,
    }
}

/// Database file backing the current app state.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Empty string until the store is first opened.
#[flutter_rust_bridge::frb(sync)]
pub fn configured_db_path() -> String {
    let guard = STATE.lock().unwrap_or_else(PoisonError::into_inner);
    guard
        .as_ref()
        .map(|state| state.db_path.display().to_string())
        .unwrap_or_default()
}

/// Declares whether the host has a speech-recognition engine.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - `false` stops any running dictation and falls back to the keyboard.
/// - Never panics; empty string on success, error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn set_dictation_supported(supported: bool) -> String {
    with_state(|state| {
        if supported {
            let (source, feed) = ChannelDictationSource::new();
            state
                .app
                .set_input_source(TextInputSource::detect(Some(Box::new(source))));
            state.feed = Some(feed);
        } else {
            state.app.set_input_source(TextInputSource::detect(None));
            state.feed = None;
        }
        Ok(())
    })
    .err()
    .unwrap_or_default()
}

/// Completes sign-in with the identity produced by the host's flow.
///
/// # FFI contract
/// - Sync call, DB-backed: loads the identity's tasks.
/// - A different identity replaces cached tasks and the draft.
/// - Never panics; `message` holds the greeting or the failure reason.
#[flutter_rust_bridge::frb(sync)]
pub fn sign_in(uid: String, display_name: String) -> ActionResponse {
    sign_in_with(Ok(Identity::new(uid.trim(), display_name.trim())))
}

/// Reports a failed or cancelled host sign-in flow.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - An active session is left signed in.
/// - Always returns `ok=false`; an empty `message` argument counts as
///   cancellation.
#[flutter_rust_bridge::frb(sync)]
pub fn sign_in_failed(message: String) -> ActionResponse {
    let trimmed = message.trim();
    let err = if trimmed.is_empty() {
        AuthError::Cancelled
    } else {
        AuthError::Provider(trimmed.to_string())
    };
    sign_in_with(Err(err))
}

/// Signs out and forgets cached tasks, draft and dictation.
///
/// # FFI contract
/// - Sync call, non-blocking; a no-op while signed out.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn sign_out() {
    let _ = with_state(|state| {
        state.app.sign_out();
        Ok(())
    });
}

/// `Welcome, <name>` while signed in.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Empty string while signed out.
#[flutter_rust_bridge::frb(sync)]
pub fn current_greeting() -> String {
    with_state(|state| Ok(state.app.identity().map(Identity::greeting)))
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Re-reads the signed-in identity's tasks from the database.
///
/// # FFI contract
/// - Sync call, DB-backed.
/// - Never panics; `ok=false` with a message when signed out or on
///   storage failure, leaving the cached list unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_reload() -> TaskListResponse {
    list_response(with_state(|state| {
        state.app.reload().map_err(message)?;
        Ok(to_items(state.app.tasks().iter()))
    }))
}

/// Lists cached tasks; `filter` is `all|active|completed`.
///
/// # FFI contract
/// - Sync call, reads the in-memory list only.
/// - Unknown filters return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(filter: String) -> TaskListResponse {
    list_response(with_state(|state| {
        let filter = TaskFilter::parse(&filter)
            .ok_or_else(|| format!("unknown filter `{}`", filter.trim()))?;
        Ok(to_items(state.app.filtered(filter).into_iter()))
    }))
}

/// Reorders cached tasks high -> medium -> low.
///
/// # FFI contract
/// - Sync call; nothing is written to the database.
/// - Ties keep their previous order.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_sort_by_priority() -> TaskListResponse {
    list_response(with_state(|state| {
        state.app.sort_by_priority();
        Ok(to_items(state.app.tasks().iter()))
    }))
}

/// Adds a task; `priority` is `high|medium|low` or empty for medium.
///
/// # FFI contract
/// - Sync call, DB-backed write followed by a reload.
/// - Blank text is not an error: `ok=true` with no `task_id`.
/// - Never panics; unknown priority or signed-out state gives `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String, priority: String) -> ActionResponse {
    let priority = match parse_priority(&priority) {
        Ok(priority) => priority,
        Err(err) => return ActionResponse::failure(err),
    };
    action_response(with_state(|state| {
        state.app.add(&text, priority).map_err(message)
    }))
}

/// Adds the draft built by typing and dictation.
///
/// # FFI contract
/// - Sync call, DB-backed.
/// - Pending dictation results are applied first.
/// - The draft is cleared only when a task was created.
#[flutter_rust_bridge::frb(sync)]
pub fn add_from_draft() -> ActionResponse {
    action_response(with_state(|state| {
        state.app.pump_dictation().map_err(message)?;
        state.app.add_from_draft().map_err(message)
    }))
}

/// Flips completion of a listed task.
///
/// # FFI contract
/// - Sync call, DB-backed write followed by a reload.
/// - Ids not in the cached list are a no-op with `ok=true` and no `task_id`.
/// - Malformed ids return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> ActionResponse {
    task_action(&id, "Task updated.", |app, id| app.toggle_completed(id))
}

/// Permanently deletes a listed task.
///
/// # FFI contract
/// - Sync call, DB-backed write followed by a reload.
/// - Repeating a delete is a no-op with `ok=true` and no `task_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> ActionResponse {
    task_action(&id, "Task deleted.", |app, id| app.delete(id))
}

/// Statistics with dates bucketed at `utc_offset_minutes` from UTC.
///
/// # FFI contract
/// - Sync call; runs a fresh database read, independent of list order.
/// - Timestamps that cannot be dated are counted but not bucketed.
/// - Never panics; out-of-range offsets return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_stats(utc_offset_minutes: i32) -> StatsResponse {
    let outcome = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
        .ok_or_else(|| format!("utc offset out of range: {utc_offset_minutes} minutes"))
        .and_then(|offset| with_state(|state| state.app.stats(&offset).map_err(message)));

    match outcome {
        Ok(stats) => to_stats_response(&stats),
        Err(err) => StatsResponse {
            ok: false,
            completed: 0,
            pending: 0,
            completion_rate: 0.0,
            completion_rate_label: String::new(),
            daily: Vec::new(),
            message: err,
        },
    }
}

/// Replaces the draft text typed by the user.
///
/// # FFI contract
/// - Sync call, non-blocking.
#[flutter_rust_bridge::frb(sync)]
pub fn set_draft_text(text: String) {
    let _ = with_state(|state| {
        state.app.draft_mut().set_text(text);
        Ok(())
    });
}

/// Current draft text after applying pending dictation results.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - `message` holds the draft text, or the recognition error with
///   `ok=false`; dictation is stopped in that case.
#[flutter_rust_bridge::frb(sync)]
pub fn draft_text() -> ActionResponse {
    match with_state(|state| {
        state.app.pump_dictation().map_err(message)?;
        Ok(state.app.draft().text().to_string())
    }) {
        Ok(text) => ActionResponse::success(text, None),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Starts dictation into the draft.
///
/// # FFI contract
/// - Sync call; a no-op when already recording.
/// - Never panics; empty string on success, otherwise the unavailability
///   or start failure message.
#[flutter_rust_bridge::frb(sync)]
pub fn dictation_start() -> String {
    with_state(|state| state.app.start_dictation().map_err(message))
        .err()
        .unwrap_or_default()
}

/// Pushes the engine's latest transcript.
///
/// # FFI contract
/// - Sync call, non-blocking; the newest transcript wins.
/// - Returns `false` when not recording.
#[flutter_rust_bridge::frb(sync)]
pub fn dictation_push_transcript(text: String) -> bool {
    with_feed(|feed| feed.transcript(text))
}

/// Pushes an engine recognition error.
///
/// # FFI contract
/// - Sync call, non-blocking; the next draft read surfaces it.
/// - Returns `false` when not recording.
#[flutter_rust_bridge::frb(sync)]
pub fn dictation_push_error(message: String) -> bool {
    with_feed(|feed| feed.error(message))
}

/// Engine-initiated end, e.g. silence timeout.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Returns `false` when not recording.
#[flutter_rust_bridge::frb(sync)]
pub fn dictation_end() -> bool {
    with_feed(DictationFeed::end)
}

/// User-initiated stop.
///
/// # FFI contract
/// - Sync call; safe to call while idle.
#[flutter_rust_bridge::frb(sync)]
pub fn dictation_stop() {
    let _ = with_state(|state| {
        state.app.stop_dictation();
        Ok(())
    });
}

/// Whether dictation is currently recording.
///
/// # FFI contract
/// - Sync call, non-blocking.
#[flutter_rust_bridge::frb(sync)]
pub fn dictation_is_recording() -> bool {
    with_state(|state| Ok(state.app.dictation_state() == DictationState::Recording))
        .unwrap_or(false)
}

fn sign_in_with(outcome: Result<Identity, AuthError>) -> ActionResponse {
    match with_state(|state| {
        state.app.provider_mut().complete(outcome);
        state.app.sign_in().map_err(message)
    }) {
        Ok(identity) => ActionResponse::success(identity.greeting(), None),
        Err(err) => ActionResponse::failure(err),
    }
}

fn task_action(
    id: &str,
    done_message: &str,
    action: impl FnOnce(&mut FfiApp, Uuid) -> Result<bool, AppError>,
) -> ActionResponse {
    let id = match Uuid::parse_str(id.trim()) {
        Ok(id) => id,
        Err(_) => return ActionResponse::failure(format!("invalid task id `{}`", id.trim())),
    };
    match with_state(|state| action(&mut state.app, id).map_err(message)) {
        Ok(true) => ActionResponse::success(done_message, Some(id.to_string())),
        Ok(false) => ActionResponse::success("Task not found; nothing changed.", None),
        Err(err) => ActionResponse::failure(err),
    }
}

fn with_state<T>(f: impl FnOnce(&mut FfiState) -> Result<T, String>) -> Result<T, String> {
    let mut guard = STATE.lock().unwrap_or_else(PoisonError::into_inner);
    if guard.is_none() {
        *guard = Some(open_state(&default_db_path())?);
    }
    match guard.as_mut() {
        Some(state) => f(state),
        None => Err("task store is not configured".to_string()),
    }
}

fn with_feed(f: impl FnOnce(&DictationFeed) -> bool) -> bool {
    with_state(|state| Ok(state.feed.as_ref().is_some_and(f))).unwrap_or(false)
}

fn open_state(db_path: &Path) -> Result<FfiState, String> {
    let conn = open_db(db_path)
        .map_err(|err| format!("task DB open failed at `{}`: {err}", db_path.display()))?;
    Ok(FfiState {
        db_path: db_path.to_path_buf(),
        app: TodoApp::new(HostAuthProvider::new(), SqliteTaskStore::new(conn)),
        feed: None,
    })
}

fn default_db_path() -> PathBuf {
    std::env::var(ENV_DB_PATH)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME), PathBuf::from)
}

fn parse_priority(value: &str) -> Result<Option<Priority>, String> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    Priority::parse(value)
        .map(Some)
        .ok_or_else(|| format!("unknown priority `{}`; expected high|medium|low", value.trim()))
}

fn message(err: AppError) -> String {
    err.to_string()
}

fn to_items<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<TaskItem> {
    tasks
        .map(|task| TaskItem {
            id: task.id.to_string(),
            text: task.text.clone(),
            completed: task.completed,
            priority: task.priority.as_str().to_string(),
            created_at_ms: task.created_at,
        })
        .collect()
}

fn list_response(outcome: Result<Vec<TaskItem>, String>) -> TaskListResponse {
    match outcome {
        Ok(items) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: err,
        },
    }
}

fn action_response(outcome: Result<Option<Uuid>, String>) -> ActionResponse {
    match outcome {
        Ok(Some(id)) => ActionResponse::success("Task added.", Some(id.to_string())),
        Ok(None) => ActionResponse::success("Nothing to add.", None),
        Err(err) => ActionResponse::failure(err),
    }
}

fn to_stats_response(stats: &TaskStats) -> StatsResponse {
    StatsResponse {
        ok: true,
        completed: saturating_u32(stats.completed),
        pending: saturating_u32(stats.pending),
        completion_rate: stats.completion_rate(),
        completion_rate_label: stats.completion_rate_label(),
        daily: stats
            .daily_created
            .iter()
            .map(|(date, count)| DailyCount {
                date: date.format("%Y-%m-%d").to_string(),
                count: saturating_u32(*count),
            })
            .collect(),
        message: format!("{} task(s).", stats.total()),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
