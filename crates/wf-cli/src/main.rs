//! Workforce console
//!
//! Employee, department, project and time tracking management from the
//! terminal.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use wf_core::config::AppConfig;
use wf_core::error::ValidationErrors;
use wf_services::{App, ReportService, ReportTarget};

mod console;
mod menu;
mod screens;
mod session;

use console::{is_end_of_input, Prompt};

/// Workforce - employee and time tracking console
#[derive(Parser, Debug)]
#[command(name = "workforce")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Database URL, overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and use the menus (default)
    Run,

    /// Create the schema and the default administrator, then exit
    InitDb,

    /// Export a CSV report without the menus
    Report {
        /// employees, departments, projects, time_records, assignments or all
        #[arg(value_parser = parse_target)]
        target: ReportTarget,

        #[arg(long, env = "WORKFORCE_USERNAME")]
        username: String,

        #[arg(long, env = "WORKFORCE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Output directory, overrides WORKFORCE_REPORTS_DIR
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(url) = cli.database_url {
        config = config.with_database_url(url);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.database.url,
        "Starting Workforce"
    );

    let app = App::connect(config)
        .await
        .context("Failed to open the database")?;

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_interactive(&app).await,
        Commands::InitDb => init_db(&app).await,
        Commands::Report {
            target,
            username,
            password,
            output,
        } => export_report(&app, target, &username, &password, output).await,
    };

    app.close().await;
    result
}

async fn run_interactive(app: &App) -> Result<()> {
    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());

    match session::interactive(&mut prompt, app).await {
        Err(err) if is_end_of_input(&err) => Ok(()),
        other => other.context("Console session failed"),
    }
}

async fn init_db(app: &App) -> Result<()> {
    let created = app.initialize().await.context("Failed to initialise the database")?;
    if created {
        println!(
            "Database ready. Default administrator '{}' created.",
            wf_auth::credentials::ADMIN_USERNAME
        );
    } else {
        println!("Database ready.");
    }
    Ok(())
}

async fn export_report(
    app: &App,
    target: ReportTarget,
    username: &str,
    password: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    app.initialize().await.context("Failed to initialise the database")?;

    let Some(ctx) = app.login(username, password).await? else {
        bail!("Invalid username or password");
    };

    let mut service = ReportService::new(&ctx);
    if let Some(dir) = output {
        service = service.with_directory(dir);
    }

    for path in service.run(target).await? {
        println!("{}", path.display());
    }
    Ok(())
}

fn parse_target(raw: &str) -> Result<ReportTarget, String> {
    raw.parse().map_err(|e: ValidationErrors| e.to_string())
}

/// Logs go to stderr so they never interleave with the menus
fn init_tracing(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use wf_auth::PasswordService;
    use wf_db::Database;
    use wf_services::ReportKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_command() {
        let cli = Cli::try_parse_from([
            "workforce",
            "--database-url",
            "sqlite::memory:",
            "report",
            "time-records",
            "--username",
            "admin",
            "--password",
            "admin123",
        ])
        .unwrap();

        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        match cli.command {
            Some(Commands::Report { target, username, .. }) => {
                assert_eq!(target, ReportTarget::One(ReportKind::TimeRecords));
                assert_eq!(username, "admin");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_report_is_rejected() {
        assert!(parse_target("payroll").is_err());
        assert_eq!(parse_target("all").unwrap(), ReportTarget::All);
    }

    #[tokio::test]
    async fn test_export_report() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory().await.unwrap();
        let app = App::new(db, AppConfig::default()).with_password_service(PasswordService::minimal());

        export_report(&app, ReportTarget::All, "admin", "admin123", Some(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), ReportKind::ALL.len());

        let err = export_report(&app, ReportTarget::All, "admin", "nope", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password");
    }
}
