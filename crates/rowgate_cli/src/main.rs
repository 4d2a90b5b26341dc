//! Command-line access to rowgate tables.
//!
//! # Responsibility
//! - Map one command invocation onto one table operation.
//! - Print results as JSON, or `"success"` for mutations.
//!
//! Usage: `rowgate <config.json> <scan|search|insert|update|delete> <table> [row-json]`

use log::info;
use rowgate_core::db::open_db;
use rowgate_core::{
    core_version, init_logging, AccessConfig, ExecutionMode, Operation, RelationalStore, Row,
    TableService,
};
use std::error::Error;
use std::process::ExitCode;

const USAGE: &str =
    "usage: rowgate <config.json> <scan|search|insert|update|delete> <table> [row-json]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("--version" | "-V")) {
        println!("rowgate_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let [config_path, operation, table, rest @ ..] = args else {
        return Err(USAGE.into());
    };
    let operation: Operation = operation.parse()?;
    let row = match rest {
        [] => None,
        [json] => Some(serde_json::from_str::<Row>(json)?),
        _ => return Err(USAGE.into()),
    };
    if operation.takes_row() && row.is_none() {
        return Err(format!("`{}` needs a row-json argument", operation.as_str()).into());
    }

    let config = AccessConfig::load(config_path)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }
    let registry = config.registry()?;

    let conn = match config.live_database_path()? {
        Some(path) => Some(open_db(path)?),
        None => None,
    };
    let mode = match &conn {
        Some(conn) => ExecutionMode::Live(conn),
        None => ExecutionMode::Rehearsal,
    };
    let store = RelationalStore::new(mode).with_update_scope(config.relational.update_scope);
    let mut service = TableService::new(registry, store);

    info!(
        "event=cli_request module=cli status=start operation={} table={}",
        operation.as_str(),
        table
    );
    let response = service.execute(operation, table, row.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if service.store().is_rehearsal() {
        for statement in service.store().history() {
            eprintln!(
                "rehearsed: {} {}",
                statement.sql,
                serde_json::to_string(&statement.params)?
            );
        }
    }
    Ok(())
}
