mod config;
mod http;

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use platform_db::EmployeeTable;
use platform_obs::{LogFormat, ObsConfig, init_tracing};
use products_hr::EmployeeRepository;

use crate::{
    config::{AppConfig, DEFAULT_PAGE_SIZE},
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "employee-server", version, about = "In-memory employee registry")]
struct Cli {
    #[arg(long, global = true, help = "Tracing filter directives (falls back to RUST_LOG)")]
    log_filter: Option<String>,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, help = "Page size when pageSize is absent")]
    default_page_size: i64,
    #[arg(long = "cors-origin", value_name = "ORIGIN", help = "Allowed CORS origin (repeatable)")]
    cors_origins: Vec<String>,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(ObsConfig {
        env_filter: cli.log_filter.clone(),
        format: cli.log_format,
        ..ObsConfig::default()
    })?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
    }
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = Arc::new(AppConfig::new(cmd.default_page_size, &cmd.cors_origins)?);
    let employees = EmployeeRepository::new(Arc::new(EmployeeTable::new()));
    let state = AppState { employees, config };
    http::serve((&cmd).into(), state).await
}
