use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nesttask")]
#[command(version)]
#[command(about = "Nested task list with session-scoped completion tracking")]
pub struct Cli {
    /// Directory holding the task database, session ledger, logs and exports
    #[arg(long, global = true, env = "NESTTASK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "NESTTASK_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the task tree
    List,

    /// Add a top-level task
    Add {
        title: String,
    },

    /// Add a subtask under an existing task
    Sub {
        parent_id: String,
        title: String,
    },

    /// Edit the title or deadline of a task
    Edit(EditArgs),

    /// Delete a task and all of its subtasks
    Rm {
        id: String,
    },

    /// Mark a task complete, or incomplete if it already is
    Toggle {
        id: String,
    },

    /// Write completed tasks of this session to a text file
    Export {
        /// Target directory (defaults to <data-dir>/exports)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the report instead of writing a file
        #[arg(long)]
        print: bool,
    },

    /// Load the demo task tree into an empty list
    Demo,

    /// End the session: forget every completion timestamp
    EndSession,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New deadline, YYYY-MM-DDTHH:MM
    #[arg(long, conflicts_with = "clear_deadline")]
    pub deadline: Option<String>,

    /// Remove the deadline
    #[arg(long)]
    pub clear_deadline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn sub_takes_parent_and_title() {
        let cli = Cli::parse_from(["nesttask", "sub", "1-2", "Pack socks"]);
        match cli.command {
            Commands::Sub { parent_id, title } => {
                assert_eq!(parent_id, "1-2");
                assert_eq!(title, "Pack socks");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_data_dir_is_accepted_after_subcommand() {
        let cli = Cli::parse_from(["nesttask", "list", "--data-dir", "/tmp/tasks"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tasks")));
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn edit_rejects_deadline_with_clear_deadline() {
        let result = Cli::try_parse_from([
            "nesttask",
            "edit",
            "1",
            "--deadline",
            "2025-10-30T17:00",
            "--clear-deadline",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn export_defaults_to_file_output() {
        let cli = Cli::parse_from(["nesttask", "export"]);
        match cli.command {
            Commands::Export { out, print } => {
                assert!(out.is_none());
                assert!(!print);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
