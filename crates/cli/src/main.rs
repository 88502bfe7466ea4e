// JustiGuide contacts CLI - guest-list import and HTTP service

mod exit_codes;
mod import;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use justiguide_cli::server::{self, AppState};
use justiguide_config::Settings;

use exit_codes::{EXIT_ERROR, EXIT_SERVE_BIND, EXIT_SERVE_RUNTIME, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "jg-contacts")]
#[command(about = "Merge event guest lists (CSV, PDF) into one contact list")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every configured guest list and write a contact snapshot
    #[command(after_help = "\
Examples:
  jg-contacts import
  jg-contacts import --config imports/founders.toml
  jg-contacts import --config imports/founders.toml --json
  jg-contacts import --output report.json --quiet")]
    Import {
        /// Import config (TOML). Omit to use settings, then the built-in list.
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Suppress the human summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate an import config without running it
    #[command(after_help = "\
Examples:
  jg-contacts validate imports/founders.toml")]
    Validate {
        /// Path to the import config
        config: PathBuf,
    },

    /// Serve POST /api/contacts/import-group
    #[command(after_help = "\
Examples:
  jg-contacts serve
  jg-contacts serve --port 8080 --config imports/founders.toml
  RUST_LOG=debug jg-contacts serve")]
    Serve {
        /// Listen host (default from settings, then 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (default from settings, then 3001)
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Import config (TOML). Omit to use settings, then the built-in list.
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::load();
    init_tracing(&settings);

    let result = match cli.command {
        Commands::Import { config, json, output, quiet } => {
            import::cmd_import(&settings, config, json, output, quiet)
        }
        Commands::Validate { config } => import::cmd_validate(config),
        Commands::Serve { host, port, config } => cmd_serve(settings, host, port, config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// `RUST_LOG` wins; otherwise the settings' filter. Logs go to stderr so
/// `--json` stdout stays clean.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// serve
// ============================================================================

fn cmd_serve(
    mut settings: Settings,
    host: Option<String>,
    port: Option<u16>,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }

    let config_path = import::config_path(config, &settings);
    let (config, base_dir) = import::load_config(config_path.as_deref())?;
    let state = AppState::new(config, base_dir);

    let runtime = tokio::runtime::Runtime::new().map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("cannot start async runtime: {e}"),
        hint: None,
    })?;

    runtime.block_on(async move {
        let address = settings.bind_addr();
        tracing::info!("Binding to {address}");

        let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| CliError {
            code: EXIT_SERVE_BIND,
            message: format!("cannot bind {address}: {e}"),
            hint: Some("is another instance already running on this port?".into()),
        })?;

        server::serve(listener, state).await.map_err(|e| CliError {
            code: EXIT_SERVE_RUNTIME,
            message: format!("server error: {e}"),
            hint: None,
        })
    })
}
