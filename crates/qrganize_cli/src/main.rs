//! `qrganize` entry point: serves the inventory store as line-delimited
//! JSON-RPC over stdin/stdout.

mod config;

use config::Config;
use log::{error, info};
use qrganize_core::db::open_db;
use qrganize_core::{init_logging, SqliteStoreRepository, StorageManager};
use qrganize_rpc::{serve, StoreService};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("qrganize: logging disabled: {err}");
        }
    }

    match run(&config) {
        Ok(answered) => {
            info!("event=app_exit module=cli status=ok answered={answered}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=app_exit module=cli status=error error={message}");
            eprintln!("qrganize: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<u64, String> {
    let mut conn = open_db(&config.db_path).map_err(|err| {
        format!(
            "failed to open store `{}`: {err}",
            config.db_path.display()
        )
    })?;
    let repo = SqliteStoreRepository::try_new(&mut conn)
        .map_err(|err| format!("store is not ready: {err}"))?;
    let mut service = StoreService::new(StorageManager::new(repo));

    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&mut service, stdin.lock(), stdout.lock())
        .map_err(|err| format!("transport failure: {err}"))
}
