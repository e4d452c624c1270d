//! `minitodo` command-line front end.
//!
//! Each invocation signs in as `--user`, loads that user's tasks from the
//! local store, runs one command and exits.

use anyhow::{bail, Context};
use chrono::{FixedOffset, Local, TimeZone};
use clap::Parser;
use log::info;
use minitodo_core::db::open_db;
use minitodo_core::{
    AppConfig, HostAuthProvider, Identity, SqliteTaskStore, Task, TaskStats, TodoApp,
};
use serde_json::json;
use uuid::Uuid;

mod cli;

use cli::{Cli, Commands};

type CliApp = TodoApp<HostAuthProvider, SqliteTaskStore>;

fn main() {
    if let Err(error) = run() {
        eprintln!("minitodo error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    config
        .init_logging()
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let Some(uid) = cli.user.as_deref().map(str::trim).filter(|uid| !uid.is_empty()) else {
        bail!("no user given; pass --user or set MINITODO_USER");
    };
    let name = cli.name.clone().unwrap_or_default();

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open task database `{}`", config.db_path.display()))?;
    let mut app = TodoApp::new(
        HostAuthProvider::with_identity(Identity::new(uid, name)),
        SqliteTaskStore::new(conn),
    );
    let identity = app.sign_in().context("sign-in failed")?;
    info!("event=cli_command module=cli status=start");
    if !cli.json {
        println!("{}", identity.greeting());
    }

    dispatch(&mut app, cli.command, cli.json)
}

fn dispatch(app: &mut CliApp, command: Commands, as_json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Add { text, priority } => match app.add(&text, Some(priority.into()))? {
            Some(id) => report(as_json, json!({ "added": id }), &format!("Added {id}")),
            None => report(as_json, json!({ "added": null }), "Nothing to add."),
        },
        Commands::List {
            sort_priority,
            filter,
        } => {
            if sort_priority {
                app.sort_by_priority();
            }
            let tasks = app.filtered(filter.into());
            if as_json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in tasks {
                    println!("{}", format_task(task));
                }
            }
            Ok(())
        }
        Commands::Toggle { id } => {
            let id = parse_id(&id)?;
            let changed = app.toggle_completed(id)?;
            let completed = app.controller().find(id).map(|task| task.completed);
            report(
                as_json,
                json!({ "id": id, "changed": changed, "completed": completed }),
                &match completed {
                    Some(true) if changed => format!("Completed {id}"),
                    Some(false) if changed => format!("Reopened {id}"),
                    _ => format!("No task {id}"),
                },
            )
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            let deleted = app.delete(id)?;
            report(
                as_json,
                json!({ "id": id, "deleted": deleted }),
                &if deleted {
                    format!("Deleted {id}")
                } else {
                    format!("No task {id}")
                },
            )
        }
        Commands::Stats { utc_offset_minutes } => {
            let stats = match utc_offset_minutes {
                Some(minutes) => {
                    let offset = FixedOffset::east_opt(minutes.saturating_mul(60))
                        .with_context(|| format!("utc offset out of range: {minutes} minutes"))?;
                    stats_in(app, &offset)?
                }
                None => stats_in(app, &Local)?,
            };
            print_stats(&stats, as_json)
        }
    }
}

fn stats_in<Tz: TimeZone>(app: &CliApp, tz: &Tz) -> anyhow::Result<TaskStats> {
    Ok(app.stats(tz)?)
}

fn print_stats(stats: &TaskStats, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let value = json!({
            "total": stats.total(),
            "completed": stats.completed,
            "pending": stats.pending,
            "completionRate": stats.completion_rate(),
            "dailyCreated": stats.daily_created,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Total tasks: {}", stats.total());
    println!("Completed tasks: {}", stats.completed);
    println!("Pending tasks: {}", stats.pending);
    println!("Completion rate: {}", stats.completion_rate_label());
    for (date, count) in &stats.daily_created {
        println!("  {date}: {count}");
    }
    Ok(())
}

fn report(as_json: bool, value: serde_json::Value, text: &str) -> anyhow::Result<()> {
    if as_json {
        println!("{value}");
    } else {
        println!("{text}");
    }
    Ok(())
}

fn parse_id(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw.trim()).with_context(|| format!("invalid task id `{}`", raw.trim()))
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {} ({}) {}", task.id, task.priority, task.text)
}

#[cfg(test)]
mod tests {
    use super::{format_task, parse_id};
    use minitodo_core::{NewTask, Priority, Task};
    use uuid::Uuid;

    #[test]
    fn format_task_marks_completed_tasks() {
        let draft = NewTask::new("u1", "Buy milk", Priority::High, 0).unwrap();
        let mut task = Task::from_new(Uuid::nil(), &draft);
        assert_eq!(
            format_task(&task),
            "[ ] 00000000-0000-0000-0000-000000000000 (high) Buy milk"
        );
        task.completed = true;
        assert!(format_task(&task).starts_with("[x]"));
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("nope").is_err());
        assert_eq!(parse_id(" 00000000-0000-0000-0000-000000000000 ").unwrap(), Uuid::nil());
    }
}
