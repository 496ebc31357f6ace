//! CLI entry point for nesttask.
//!
//! # Responsibility
//! - Map subcommands onto the core task service actions.
//! - Own process-level setup: data directory, logging, database handles.

mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, EditArgs};
use log::info;
use nesttask_core::db::open_db;
use nesttask_core::{
    default_log_level, init_logging, AppPaths, Clock, CompletionLedger, Deadline,
    SqliteKvRepository, SystemClock, TaskId, TaskPatch, TaskService, TaskTreeStore,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AppPaths::resolve(cli.data_dir.as_deref())?;
    paths.ensure_dirs()?;
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &paths.log_dir()).context("failed to initialize logging")?;

    let tree_conn = open_db(paths.tasks_db_path()).context("failed to open task database")?;
    let session_conn =
        open_db(paths.session_db_path()).context("failed to open session database")?;
    let mut service = TaskService::open(
        TaskTreeStore::new(SqliteKvRepository::try_new(&tree_conn)?),
        CompletionLedger::new(SqliteKvRepository::try_new(&session_conn)?),
        SystemClock,
    );

    run(&mut service, &paths, cli.command)
}

fn run<C: Clock>(
    service: &mut TaskService<SqliteKvRepository<'_>, SqliteKvRepository<'_>, C>,
    paths: &AppPaths,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::List => println!("{}", render::render_tree(service.tasks(), service.now())),
        Commands::Add { title } => {
            let id = service.add_task(&title)?;
            println!("added {id}");
        }
        Commands::Sub { parent_id, title } => {
            match service.add_subtask(&TaskId::from(parent_id.as_str()), &title)? {
                Some(id) => println!("added {id} under {parent_id}"),
                None => println!("no task with id {parent_id}"),
            }
        }
        Commands::Edit(args) => edit(service, args)?,
        Commands::Rm { id } => {
            if service.delete_task(&TaskId::from(id.as_str())) {
                println!("deleted {id}");
            } else {
                println!("no task with id {id}");
            }
        }
        Commands::Toggle { id } => match service.toggle_complete(&TaskId::from(id.as_str())) {
            Some(completion) => match completion.completed_at() {
                Some(completed_at) => println!("completed {id} at {completed_at}"),
                None => println!("reopened {id}"),
            },
            None => println!("no task with id {id}"),
        },
        Commands::Export { out, print } => {
            if print {
                println!("{}", service.export_session());
            } else {
                let dir = out.unwrap_or_else(|| paths.export_dir());
                let path = service.write_export(&dir)?;
                println!("exported to {}", path.display());
            }
        }
        Commands::Demo => {
            if service.seed_demo() {
                println!("{}", render::render_tree(service.tasks(), service.now()));
            } else {
                println!("task list is not empty; demo data not loaded");
            }
        }
        Commands::EndSession => {
            service.end_session();
            println!("session ended; completion timestamps cleared");
        }
    }
    info!("event=cli_command module=cli status=ok");
    Ok(())
}

fn edit<C: Clock>(
    service: &mut TaskService<SqliteKvRepository<'_>, SqliteKvRepository<'_>, C>,
    args: EditArgs,
) -> Result<()> {
    let deadline = match (args.deadline, args.clear_deadline) {
        (Some(raw), _) => Some(Some(Deadline::parse(&raw)?)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    let patch = TaskPatch {
        title: args.title,
        deadline,
    };
    if patch.is_empty() {
        anyhow::bail!("nothing to edit; pass --title, --deadline or --clear-deadline");
    }

    if service.update_task(&TaskId::from(args.id.as_str()), patch)? {
        println!("updated {}", args.id);
    } else {
        println!("no task with id {}", args.id);
    }
    Ok(())
}
