use chrono::Utc;
use minitodo_core::{
    AppError, AuthError, FixedClock, HostAuthProvider, Identity, InMemoryTaskStore, Priority,
    SessionState, TodoApp,
};

type App = TodoApp<HostAuthProvider, InMemoryTaskStore>;

fn app() -> App {
    TodoApp::with_clock(
        HostAuthProvider::new(),
        InMemoryTaskStore::new(),
        FixedClock(1_700_000_000_000),
    )
}

fn sign_in_as(app: &mut App, uid: &str, name: &str) {
    app.provider_mut().complete(Ok(Identity::new(uid, name)));
    app.sign_in().unwrap();
}

#[test]
fn starts_signed_out_and_rejects_task_operations() {
    let mut app = app();
    assert_eq!(app.session().state(), &SessionState::SignedOut);
    assert!(matches!(app.add("task", None), Err(AppError::NotSignedIn)));
    assert!(matches!(app.reload(), Err(AppError::NotSignedIn)));
    assert!(matches!(app.stats(&Utc), Err(AppError::NotSignedIn)));
    assert!(app.store().is_empty());
}

#[test]
fn failed_sign_in_stays_signed_out_and_surfaces_error() {
    let mut app = app();
    app.provider_mut()
        .complete(Err(AuthError::Rejected("popup blocked".to_string())));

    let err = app.sign_in().unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::Rejected(_))));
    assert!(err.to_string().contains("popup blocked"));
    assert!(!app.session().is_signed_in());

    assert!(matches!(
        app.sign_in(),
        Err(AppError::Auth(AuthError::Cancelled))
    ));
}

#[test]
fn sign_in_loads_only_the_identity_tasks() {
    let mut app = app();
    sign_in_as(&mut app, "u1", "Ada");
    assert_eq!(app.identity().unwrap().greeting(), "Welcome, Ada");
    app.add("Buy milk", Some(Priority::High)).unwrap();
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.tasks()[0].owner_id, "u1");
}

#[test]
fn sign_out_clears_cache_and_next_identity_sees_only_its_tasks() {
    let mut app = app();
    sign_in_as(&mut app, "u1", "Ada");
    app.add("private", None).unwrap();
    app.draft_mut().set_text("half typed");

    app.sign_out();
    assert_eq!(app.session().state(), &SessionState::SignedOut);
    assert!(app.tasks().is_empty());
    assert!(app.draft().is_blank());

    sign_in_as(&mut app, "u2", "Bob");
    assert!(app.tasks().is_empty());
    app.add("bob's", None).unwrap();
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.tasks()[0].text, "bob's");
    assert_eq!(app.store().len(), 2);
}

#[test]
fn add_from_draft_clears_draft_only_on_success() {
    let mut app = app();
    sign_in_as(&mut app, "u1", "Ada");

    app.draft_mut().set_text("   ");
    assert_eq!(app.add_from_draft().unwrap(), None);
    assert_eq!(app.draft().text(), "   ");

    app.draft_mut().set_text("Water plants");
    app.draft_mut().set_priority(Priority::Low);
    let id = app.add_from_draft().unwrap().expect("created");
    assert!(app.draft().is_blank());
    assert_eq!(app.draft().priority(), Priority::Medium);

    let task = app.controller().find(id).unwrap();
    assert_eq!(task.text, "Water plants");
    assert_eq!(task.priority, Priority::Low);
}

#[test]
fn buy_milk_scenario_ends_fully_completed() {
    let mut app = app();
    sign_in_as(&mut app, "u1", "Ada");

    let milk = app.add("Buy milk", Some(Priority::High)).unwrap().unwrap();
    let clean = app.add("Clean", Some(Priority::Low)).unwrap().unwrap();
    assert!(app.toggle_completed(milk).unwrap());
    assert!(app.delete(clean).unwrap());

    let tasks = app.reload().unwrap().to_vec();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "Buy milk");
    assert!(tasks[0].completed);
    assert_eq!(tasks[0].priority, Priority::High);

    let stats = app.stats(&Utc).unwrap();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.completion_rate(), 1.0);
}

#[test]
fn failed_sign_in_while_signed_in_keeps_the_active_session() {
    let mut app = app();
    sign_in_as(&mut app, "u1", "Ada");
    app.add("Buy milk", None).unwrap();
    app.draft_mut().set_text("half typed");

    app.provider_mut().complete(Err(AuthError::Cancelled));
    assert!(matches!(
        app.sign_in(),
        Err(AppError::Auth(AuthError::Cancelled))
    ));

    assert_eq!(app.identity().unwrap().uid, "u1");
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.draft().text(), "half typed");
    assert!(app.add("Clean", None).unwrap().is_some());
}

#[test]
fn switching_identity_replaces_tasks_and_drops_previous_draft() {
    let mut app = app();
    sign_in_as(&mut app, "u1", "Ada");
    app.add("ada's", None).unwrap();
    app.draft_mut().set_text("ada's private draft");

    sign_in_as(&mut app, "u2", "Bob");
    assert_eq!(app.identity().unwrap().uid, "u2");
    assert!(app.tasks().is_empty());
    assert!(app.draft().is_blank());

    app.draft_mut().set_text("bob keeps this");
    sign_in_as(&mut app, "u2", "Bob");
    assert_eq!(app.draft().text(), "bob keeps this");
}
