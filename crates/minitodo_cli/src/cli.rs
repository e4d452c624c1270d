//! Command-line surface.

use clap::{Parser, Subcommand, ValueEnum};
use minitodo_core::{Priority, TaskFilter};
use std::path::PathBuf;

/// Personal to-do list over a local SQLite store.
#[derive(Debug, Parser)]
#[command(name = "minitodo", version, about = "Minimalist to-do list")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Task database file (overrides MINITODO_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Signed-in user id that owns the tasks
    #[arg(short, long, global = true, env = "MINITODO_USER")]
    pub user: Option<String>,

    /// Display name for the greeting
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task text; blank text is ignored
        text: String,
        #[arg(short, long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
    },
    /// List tasks
    List {
        /// Order high -> medium -> low
        #[arg(long)]
        sort_priority: bool,
        #[arg(short, long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Flip a task between done and pending
    Toggle { id: String },
    /// Delete a task permanently
    Delete { id: String },
    /// Completion statistics
    Stats {
        /// Bucket dates at this offset from UTC instead of local time
        #[arg(long, allow_hyphen_values = true)]
        utc_offset_minutes: Option<i32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Active,
    Completed,
}

impl From<FilterArg> for TaskFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => TaskFilter::All,
            FilterArg::Active => TaskFilter::Active,
            FilterArg::Completed => TaskFilter::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, FilterArg, PriorityArg};
    use clap::{CommandFactory, Parser};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "minitodo", "add", "Buy milk", "--priority", "high", "--user", "u1", "--json",
        ])
        .expect("cli should parse");

        assert_eq!(cli.user.as_deref(), Some("u1"));
        assert!(cli.json);
        match cli.command {
            Commands::Add { text, priority } => {
                assert_eq!(text, "Buy milk");
                assert_eq!(priority, PriorityArg::High);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_defaults_to_all_unsorted() {
        let cli = Cli::try_parse_from(["minitodo", "list"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::List {
                sort_priority: false,
                filter: FilterArg::All
            }
        ));
    }

    #[test]
    fn stats_accepts_negative_offset() {
        let cli = Cli::try_parse_from(["minitodo", "stats", "--utc-offset-minutes", "-300"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Stats {
                utc_offset_minutes: Some(-300)
            }
        ));
    }
}
