//! EduMatch CLI - command-line access to the sanitizer and session guard
//!
//! Useful for scripting moderation tasks and for checking what the web client
//! will accept before it goes out.

use anyhow::Context;
use clap::{Parser, Subcommand};
use edumatch_core::{
    default_config_path, init_logging, log_operation_error, log_operation_start,
    log_operation_success, EdumatchConfig, LoggingConfig,
};
use edumatch_security::{
    login, logout, FileSessionStore, GuardDecision, Role, Sanitizer, SessionGuard,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "edumatch")]
#[command(about = "Input sanitizer and session guard for EduMatch")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanitize text (reads stdin when TEXT is omitted)
    Sanitize {
        /// Text to sanitize
        text: Option<String>,

        /// Override the configured maximum length
        #[arg(long)]
        max_length: Option<usize>,

        /// Treat the value as a required form field and reject it if empty
        #[arg(long, value_name = "FIELD")]
        required: Option<String>,
    },

    /// Start a session for a staff user
    Login {
        /// Role granted to the session
        #[arg(short, long)]
        role: Role,

        /// Identity reference from the auth provider
        #[arg(short, long)]
        user: String,
    },

    /// Remove the stored session
    Logout,

    /// Run the session guard, exiting non-zero on denial
    Check {
        /// Minimum role required
        #[arg(long)]
        require: Option<Role>,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        /// Write the default configuration
        #[arg(long)]
        init: bool,

        /// Show the effective configuration
        #[arg(long)]
        show: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // `config --init` must work before any config file exists
    let config = match &cli.command {
        Commands::Config { init: true, .. } => EdumatchConfig::default(),
        _ => EdumatchConfig::load(cli.config.as_deref()).context("Failed to load configuration")?,
    };

    let logging_config = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        config.logging.clone()
    };
    init_logging(&logging_config).context("Failed to initialize logging")?;

    info!("Starting EduMatch CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Sanitize {
            text,
            max_length,
            required,
        } => handle_sanitize(text, max_length, required, &config),
        Commands::Login { role, user } => handle_login(role, &user, &config),
        Commands::Logout => handle_logout(&config),
        Commands::Check { require, json } => handle_check(require, json, &config),
        Commands::Config {
            init,
            show,
            validate,
        } => handle_config(cli.config, init, show, validate, &config),
    }
}

fn handle_sanitize(
    text: Option<String>,
    max_length: Option<usize>,
    required: Option<String>,
    config: &EdumatchConfig,
) -> anyhow::Result<ExitCode> {
    let input = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let sanitizer = match max_length {
        Some(max_length) => Sanitizer::new(max_length),
        None => Sanitizer::from_config(&config.security),
    };

    match required {
        Some(field) => match sanitizer.sanitize_required(&field, &input) {
            Ok(value) => println!("{}", value),
            Err(e) => {
                e.log();
                eprintln!("❌ {}", e);
                return Ok(ExitCode::FAILURE);
            }
        },
        None => println!("{}", sanitizer.sanitize(&input)),
    }

    Ok(ExitCode::SUCCESS)
}

fn handle_login(role: Role, user: &str, config: &EdumatchConfig) -> anyhow::Result<ExitCode> {
    log_operation_start!("login", role = %role);

    let store = FileSessionStore::from_config(&config.session)?;
    let record = match login(&store, role, user) {
        Ok(record) => record,
        Err(e) => {
            log_operation_error!("login", e);
            return Err(e.into());
        }
    };

    log_operation_success!("login", user_id = %record.user_id);
    println!(
        "✅ Logged in {} as {} at {}",
        record.user_id,
        record.role,
        record.login_time.to_rfc3339()
    );
    Ok(ExitCode::SUCCESS)
}

fn handle_logout(config: &EdumatchConfig) -> anyhow::Result<ExitCode> {
    let store = FileSessionStore::from_config(&config.session)?;
    logout(&store)?;
    println!("👋 Logged out");
    Ok(ExitCode::SUCCESS)
}

fn handle_check(
    require: Option<Role>,
    json: bool,
    config: &EdumatchConfig,
) -> anyhow::Result<ExitCode> {
    let store = FileSessionStore::from_config(&config.session)?;
    let guard = SessionGuard::new(store, &config.session);
    let decision = guard.check(require);

    if json {
        let output = match &decision {
            GuardDecision::Authorized(record) => serde_json::json!({
                "authorized": true,
                "session": record,
            }),
            GuardDecision::Denied {
                reason,
                redirect_to,
            } => serde_json::json!({
                "authorized": false,
                "denial": reason,
                "redirect_to": redirect_to,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &decision {
            GuardDecision::Authorized(record) => {
                println!("✅ authorized: {} ({})", record.user_id, record.role)
            }
            GuardDecision::Denied {
                reason,
                redirect_to,
            } => println!("❌ denied ({}) -> {}", reason, redirect_to),
        }
    }

    Ok(if decision.is_authorized() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn handle_config(
    path: Option<PathBuf>,
    init: bool,
    show: bool,
    validate: bool,
    config: &EdumatchConfig,
) -> anyhow::Result<ExitCode> {
    let path = path.unwrap_or_else(default_config_path);

    if init {
        EdumatchConfig::default().save_to_file(&path)?;
        println!("✅ Configuration initialized at: {}", path.display());
    }

    if show {
        println!("📋 Current configuration:");
        println!("{}", toml::to_string_pretty(config)?);
    }

    if validate {
        match config.validate() {
            Ok(()) => println!("✅ Configuration is valid"),
            Err(e) => {
                println!("❌ Configuration validation failed: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
