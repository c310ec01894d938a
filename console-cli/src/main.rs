//! `clinic`: the clinic administration console in a terminal.
//!
//! ```bash
//! clinic dashboard
//! clinic doctors add --name "Dr. A" --specialization Cardiology
//! clinic appointments book --date 2026-11-02
//! clinic bills pay 5 --patient 7
//! clinic completions zsh > _clinic
//! ```

mod commands;
mod terminal;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use clinic_console::ClinicConsole;
use colored::*;
use config_engine::ConsoleConfig;
use logger_redacted::LoggerConfig;
use tracing::{debug, error};

use commands::{AppointmentCommand, BillCommand, DoctorCommand, PatientCommand};
use terminal::TerminalDocument;

/// Clinic administration console
#[derive(Parser, Debug)]
#[command(name = "clinic")]
#[command(about = "Manage doctors, patients, appointments and bills of the clinic")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CLINIC_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refresh and show the summary counters
    Dashboard,
    /// Manage doctors
    Doctors {
        #[command(subcommand)]
        action: DoctorCommand,
    },
    /// Manage patients
    Patients {
        #[command(subcommand)]
        action: PatientCommand,
    },
    /// Book and cancel appointments
    Appointments {
        #[command(subcommand)]
        action: AppointmentCommand,
    },
    /// Search, create and settle bills
    Bills {
        #[command(subcommand)]
        action: BillCommand,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "clinic", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {}", format!("{:#}", e).bright_red());
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ConsoleConfig> {
    let mut config = config_engine::load(cli.config.as_deref())?;
    if let Some(api_url) = &cli.api_url {
        config.api_base_url = api_url.clone();
        config = config.validated()?;
    }
    Ok(config)
}

/// Run one command; `Ok(false)` means the action reported a failure.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = load_config(&cli)?;

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    logger_redacted::init(&LoggerConfig::default().with_level(level).with_json(config.log_json))?;
    debug!(api = %config.api_base_url, "Configuration loaded");

    let document = Arc::new(TerminalDocument::new(cli.yes));
    let console = ClinicConsole::new(&config, document.clone())?;

    let outcome: anyhow::Result<()> = match cli.command {
        Commands::Dashboard => {
            commands::dashboard(&console).await;
            Ok(())
        }
        Commands::Doctors { action } => commands::run_doctors(&console, &document, action)
            .await
            .map_err(Into::into),
        Commands::Patients { action } => commands::run_patients(&console, &document, action)
            .await
            .map_err(Into::into),
        Commands::Appointments { action } => {
            commands::run_appointments(&console, &document, action).await
        }
        Commands::Bills { action } => commands::run_bills(&console, &document, action)
            .await
            .map_err(Into::into),
        Commands::Completions { .. } => Ok(()),
    };

    match outcome {
        // Controller failures were already shown as notifications
        Err(e) if document.has_failed() => {
            debug!(error = %e, "Command failed");
            Ok(false)
        }
        Err(e) => Err(e),
        Ok(()) => Ok(!document.has_failed()),
    }
}
