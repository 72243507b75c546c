// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use std::process::ExitCode;

use clap::Parser;
use serde_json::{Value, json};
use tracing::{error, info};

use commands::{CliError, Command, run};
use fleet_dispatch_api::AuthenticatedAdmin;
use fleet_dispatch_audit::Cause;
use fleet_dispatch_domain::StaffId;
use fleet_dispatch_persistence::{Persistence, PersistenceError};

/// Fleet Dispatch - back office for moving vehicles and staff between stations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. Without this or `--mysql-url`,
    /// uses an in-memory database that lives for one command.
    #[arg(short, long, conflicts_with = "mysql_url")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL.
    #[arg(long)]
    mysql_url: Option<String>,

    /// Staff id of the administrator issuing dispatch commands.
    #[arg(short, long)]
    actor: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

fn open_persistence(args: &Args) -> Result<Persistence, PersistenceError> {
    if let Some(url) = &args.mysql_url {
        info!("Using MySQL database");
        Persistence::new_with_mysql(url)
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()
    }
}

fn execute(args: Args) -> Result<Value, CliError> {
    let mut persistence: Persistence = open_persistence(&args)?;
    let actor: Option<AuthenticatedAdmin> = args
        .actor
        .map(|id| AuthenticatedAdmin::new(StaffId::new(id)));
    let cause: Cause = Cause::new(
        format!("cli-{}", std::process::id()),
        format!("fleet-dispatch {}", args.command.name()),
    );
    run(&mut persistence, actor.as_ref(), args.command, cause)
}

fn main() -> ExitCode {
    let args: Args = Args::parse();

    // Logs go to stderr so stdout carries only JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match execute(args) {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(kind = err.kind(), "{err}");
            eprintln!(
                "{:#}",
                json!({ "error": err.kind(), "message": err.to_string() })
            );
            ExitCode::FAILURE
        }
    }
}
