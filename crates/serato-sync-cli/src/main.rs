//! Headless CLI for seratosync
//!
//! Progress lines go to stderr through the tracing subscriber; summaries
//! go to stdout (plain text, or JSON with --json).

mod cli;

use std::process::ExitCode;

use serato_sync_core::{
    clean_database, generate_report, CleanupOptions, Config, SyncEngine,
};

use crate::cli::{parse_args, usage, CliCommand, CliOptions};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", usage());
        return ExitCode::SUCCESS;
    }

    let (command, options) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", usage());
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(command, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn require_serato_path(config: &Config) -> serato_sync_core::Result<()> {
    if config.serato_db_path.trim().is_empty() {
        return Err(serato_sync_core::Error::Config(
            "Serato DB path not set".to_string(),
        ));
    }
    Ok(())
}

fn run(command: CliCommand, options: &CliOptions) -> serato_sync_core::Result<()> {
    let config = match &options.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match command {
        CliCommand::Sync { dry_run } => {
            let summary = SyncEngine::new(config).dry_run(dry_run).run()?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&summary).unwrap());
            } else {
                println!("{}", summary.report());
            }
        }
        CliCommand::Report => {
            require_serato_path(&config)?;
            let report = generate_report(&config.database_path())?;
            println!("{}", report);
        }
        CliCommand::Clean {
            keep_duplicates,
            keep_untagged,
        } => {
            require_serato_path(&config)?;
            let cleanup_options = CleanupOptions {
                remove_duplicates: !keep_duplicates,
                require_metadata: !keep_untagged,
            };
            let report = clean_database(&config.database_path(), &cleanup_options)?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&report).unwrap());
            } else {
                println!("{}", report.summary());
            }
        }
        CliCommand::Config { serato_db, library } => {
            if serato_db.is_none() && library.is_none() {
                println!("{}", serde_json::to_string_pretty(&config).unwrap());
                return Ok(());
            }

            let mut config = config;
            if let Some(path) = serato_db {
                config.serato_db_path = path;
            }
            if let Some(path) = library {
                config.music_library_path = path;
            }

            match &options.config_path {
                Some(path) => config.save_to(path)?,
                None => config.save()?,
            }
            println!("Configuration saved.");
        }
    }

    Ok(())
}
