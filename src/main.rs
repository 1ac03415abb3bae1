use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;

use geeklife::app::{runner, App};
use geeklife::cli::{Cli, CliCommand};
use geeklife::config;
use geeklife::storage::{self, Database, StorageWorker};

mod logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let home = config::home_dir();
    let log_guard = logging::init(home.as_deref());

    let settings = config::load(home.as_deref(), &cli.overrides());
    let db_path = settings.db_path(home.as_deref());

    let mut db = match Database::open(&db_path) {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(path = %db_path.display(), error = %err, "failed to open database");
            eprintln!("Failed to open database {}: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    if cli.command == Some(CliCommand::Migrate) {
        if let Err(err) = storage::migrate(&mut db).and_then(|()| db.close()) {
            tracing::error!(error = %err, "migration failed");
            eprintln!("Migration failed: {err}");
            return ExitCode::FAILURE;
        }
        println!("Database migrated successfully!");
        return ExitCode::SUCCESS;
    }

    let (reply_tx, reply_rx) = mpsc::channel();
    let worker = match StorageWorker::spawn(db, reply_tx) {
        Ok(worker) => worker,
        Err(err) => {
            tracing::error!(error = %err, "failed to start storage worker");
            eprintln!("Failed to start storage worker: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(&settings, Box::new(worker.handle()));
    let result = runner::run(&mut app, reply_rx);
    drop(app);

    if let Err(err) = worker.shutdown() {
        tracing::warn!(error = %err, "database was not closed cleanly");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "terminal error");
            eprintln!("geeklife: {err}");
            if let Some(log_guard) = &log_guard {
                eprintln!("logs: {}", log_guard.log_dir().display());
            }
            ExitCode::FAILURE
        }
    }
}
