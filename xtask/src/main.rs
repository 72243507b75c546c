// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Workspace automation for the fleet dispatch back office.
//!
//! - `cargo xtask test` runs every standard test against in-memory `SQLite`.
//! - `cargo xtask test-mariadb` starts a throwaway `MariaDB` container and
//!   runs the ignored backend validation tests of `fleet-dispatch-persistence`
//!   against it. The container is removed even when the tests fail.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output, thread::sleep, time::Duration};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context, eyre::eyre};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const PERSISTENCE_PACKAGE: &str = "fleet-dispatch-persistence";
const READY_ATTEMPTS: u32 = 30;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err:?}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Lint, build and test
    Ci,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Run clippy and the format check
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    Clippy,

    /// Format the workspace
    #[command(visible_alias = "f")]
    Fmt,

    /// Run the standard test suite
    #[command(visible_alias = "t")]
    Test,

    /// Run the `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::Ci => ci(),
            Self::Build => run_cargo(&["build", "--all-targets", "--all-features"]),
            Self::Check => run_cargo(&["check", "--all-targets", "--all-features"]),
            Self::Lint => lint(),
            Self::Clippy => clippy(),
            Self::Fmt => run_cargo_nightly(&["fmt", "--all"]),
            Self::Test => run_cargo(&["test", "--all-targets", "--all-features"]),
            Self::TestMariadb => test_mariadb(),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    Command::Build.run()?;
    Command::Test.run()
}

fn lint() -> Result<()> {
    clippy()?;
    run_cargo_nightly(&["fmt", "--all", "--check"])
}

fn clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn run_cargo_nightly(args: &[&str]) -> Result<()> {
    cmd("cargo", args)
        // Set by cargo for subcommands; it would pin the stable toolchain.
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// A `MariaDB` container that is stopped and removed on drop.
struct MariadbContainer {
    name: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: u16,
}

impl MariadbContainer {
    fn start() -> Result<Self> {
        let container = Self {
            name: "fleet-dispatch-test-mariadb",
            database: "fleet_dispatch_test",
            user: "fleet_dispatch",
            password: "test_password",
            port: 3307,
        };
        container.remove();

        tracing::info!("Starting MariaDB container: {}", container.name);
        cmd!(
            "docker",
            "run",
            "--name",
            container.name,
            "-e",
            format!("MARIADB_DATABASE={}", container.database),
            "-e",
            format!("MARIADB_USER={}", container.user),
            "-e",
            format!("MARIADB_PASSWORD={}", container.password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", container.port),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        Ok(container)
    }

    fn wait_until_ready(&self) -> Result<()> {
        for attempt in 1..=READY_ATTEMPTS {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/{READY_ATTEMPTS}");
            let ready = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                self.user,
                format!("-p{}", self.password),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();
            if ready.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within {READY_ATTEMPTS}s"))
    }

    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    fn remove(&self) {
        let _ = cmd!("docker", "rm", "--force", self.name)
            .stdout_null()
            .stderr_null()
            .run();
    }
}

impl Drop for MariadbContainer {
    fn drop(&mut self) {
        tracing::info!("Removing MariaDB container: {}", self.name);
        self.remove();
    }
}

/// Runs the ignored backend validation tests against a fresh `MariaDB`.
///
/// Requires Docker and a free port 3307.
fn test_mariadb() -> Result<()> {
    cmd!("docker", "--version")
        .run_with_trace()
        .wrap_err("Docker is not available")?;

    let container: MariadbContainer = MariadbContainer::start()?;
    container.wait_until_ready()?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        PERSISTENCE_PACKAGE,
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.url())
    .env("FLEET_DISPATCH_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Logs a `duct` expression before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
