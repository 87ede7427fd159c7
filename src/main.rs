mod config;
mod domain;
mod fetch;
mod notification;
mod runner;
mod storage;

use chrono::NaiveDate;
use runner::{Runner, RunnerConfig};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

/// Parsed command line flags.
struct Args {
    config_path: String,
    single_run: bool,
    test_email: bool,
    debug: bool,
    date: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        config_path: DEFAULT_CONFIG_PATH.to_string(),
        single_run: false,
        test_email: false,
        debug: false,
        date: None,
    };

    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            args.config_path = path.to_string();
        } else if let Some(date) = arg.strip_prefix("--date=") {
            args.date = Some(date.to_string());
        } else {
            match arg.as_str() {
                "--single-run" | "-s" => args.single_run = true,
                "--test-email" | "-t" => args.test_email = true,
                "--debug" | "-d" => args.debug = true,
                other => eprintln!("Ignoring unknown argument: {}", other),
            }
        }
    }

    args
}

fn init_tracing(debug: bool, log_level: Option<&str>) {
    let level = if debug {
        Level::DEBUG
    } else {
        match log_level {
            Some("debug") => Level::DEBUG,
            Some("info") => Level::INFO,
            Some("warn") | Some("warning") => Level::WARN,
            Some("error") => Level::ERROR,
            Some("trace") => Level::TRACE,
            _ => Level::INFO,
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = parse_args();

    let (config, created) = match config::Config::load_or_init(&args.config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config_path, e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(args.debug, config.app.log_level.as_deref());

    if created {
        info!(
            path = %args.config_path,
            "created default configuration, edit it and set SMTP credentials before enabling email"
        );
    }

    let runner = match Runner::new(RunnerConfig {
        config,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Failed to create watcher: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(config = %args.config_path, "watcher initialized");

    if args.test_email {
        return match runner.send_test_email().await {
            Ok(()) => {
                info!("test email sent");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "test email failed");
                ExitCode::FAILURE
            }
        };
    }

    if let Some(ref date_str) = args.date {
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%m-%d-%Y") else {
            eprintln!("Invalid date {} (expected MM-DD-YYYY)", date_str);
            return ExitCode::FAILURE;
        };

        return match runner.check_date(date).await {
            Ok(bookable) => {
                info!(date = %date, bookable, "date check complete");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "date check failed");
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = runner.start(args.single_run).await {
        error!(error = %e, "watcher error");
    }

    let _ = runner.stop().await;

    ExitCode::SUCCESS
}
