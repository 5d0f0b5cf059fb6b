//! Argument parsing for the headless CLI
//!
//! Usage:
//!   seratosync sync [--dry-run]          Mirror the library into crates
//!   seratosync report                    Print a database report
//!   seratosync clean [--keep-duplicates] [--keep-untagged]
//!                                        Prune the database (backs up first)
//!   seratosync config [--serato-db <p>] [--library <p>]
//!                                        Show or update the configuration
//!
//! Options:
//!   --config <path>    Use an explicit config file
//!   --json             Output summaries in JSON format

use std::path::PathBuf;

/// CLI command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Sync {
        dry_run: bool,
    },
    Report,
    Clean {
        keep_duplicates: bool,
        keep_untagged: bool,
    },
    Config {
        serato_db: Option<String>,
        library: Option<String>,
    },
}

/// CLI options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub json: bool,
    pub config_path: Option<PathBuf>,
}

/// Parse CLI arguments and return command + options
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), String> {
    let mut options = CliOptions::default();
    let mut command: Option<CliCommand> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--json" => options.json = true,
            "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("--config requires a path".to_string());
                }
                options.config_path = Some(PathBuf::from(&args[i]));
            }
            "--dry-run" => match command {
                Some(CliCommand::Sync { ref mut dry_run }) => *dry_run = true,
                _ => return Err("--dry-run only applies to sync".to_string()),
            },
            "--keep-duplicates" => match command {
                Some(CliCommand::Clean {
                    ref mut keep_duplicates,
                    ..
                }) => *keep_duplicates = true,
                _ => return Err("--keep-duplicates only applies to clean".to_string()),
            },
            "--keep-untagged" => match command {
                Some(CliCommand::Clean {
                    ref mut keep_untagged,
                    ..
                }) => *keep_untagged = true,
                _ => return Err("--keep-untagged only applies to clean".to_string()),
            },
            "--serato-db" => {
                i += 1;
                if i >= args.len() {
                    return Err("--serato-db requires a path".to_string());
                }
                match command {
                    Some(CliCommand::Config {
                        ref mut serato_db, ..
                    }) => *serato_db = Some(args[i].clone()),
                    _ => return Err("--serato-db only applies to config".to_string()),
                }
            }
            "--library" => {
                i += 1;
                if i >= args.len() {
                    return Err("--library requires a path".to_string());
                }
                match command {
                    Some(CliCommand::Config {
                        ref mut library, ..
                    }) => *library = Some(args[i].clone()),
                    _ => return Err("--library only applies to config".to_string()),
                }
            }
            "sync" => command = Some(CliCommand::Sync { dry_run: false }),
            "report" => command = Some(CliCommand::Report),
            "clean" => {
                command = Some(CliCommand::Clean {
                    keep_duplicates: false,
                    keep_untagged: false,
                })
            }
            "config" => {
                command = Some(CliCommand::Config {
                    serato_db: None,
                    library: None,
                })
            }
            other => {
                return Err(format!("Unknown argument: {}", other));
            }
        }
        i += 1;
    }

    match command {
        Some(command) => Ok((command, options)),
        None => Err("No command specified. Use: sync, report, clean, or config".to_string()),
    }
}

/// Usage text printed for --help and argument errors
pub fn usage() -> &'static str {
    "Usage: seratosync [--config <path>] [--json] <command>\n\
     \n\
     Commands:\n\
     \x20 sync [--dry-run]                        Mirror the library into crates and append new tracks\n\
     \x20 report                                  Print a database report\n\
     \x20 clean [--keep-duplicates] [--keep-untagged]\n\
     \x20                                         Prune the database (backs up first)\n\
     \x20 config [--serato-db <p>] [--library <p>]  Show or update the configuration"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_sync() {
        let (command, options) = parse_args(&args(&["sync"])).unwrap();
        assert_eq!(command, CliCommand::Sync { dry_run: false });
        assert!(!options.json);
    }

    #[test]
    fn test_parse_sync_dry_run() {
        let (command, _) = parse_args(&args(&["sync", "--dry-run"])).unwrap();
        assert_eq!(command, CliCommand::Sync { dry_run: true });
    }

    #[test]
    fn test_parse_clean_flags() {
        let (command, _) =
            parse_args(&args(&["clean", "--keep-duplicates", "--keep-untagged"])).unwrap();
        assert_eq!(
            command,
            CliCommand::Clean {
                keep_duplicates: true,
                keep_untagged: true,
            }
        );
    }

    #[test]
    fn test_parse_config_set() {
        let (command, _) =
            parse_args(&args(&["config", "--serato-db", "/s", "--library", "/m"])).unwrap();
        assert_eq!(
            command,
            CliCommand::Config {
                serato_db: Some("/s".to_string()),
                library: Some("/m".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_global_options() {
        let (_, options) =
            parse_args(&args(&["--json", "--config", "/tmp/c.json", "report"])).unwrap();
        assert!(options.json);
        assert_eq!(options.config_path, Some(PathBuf::from("/tmp/c.json")));
    }

    #[test]
    fn test_missing_command_fails() {
        assert!(parse_args(&args(&["--json"])).is_err());
    }

    #[test]
    fn test_flag_without_command_fails() {
        assert!(parse_args(&args(&["--dry-run", "sync"])).is_err());
    }

    #[test]
    fn test_unknown_argument_fails() {
        assert!(parse_args(&args(&["frobnicate"])).is_err());
    }
}
