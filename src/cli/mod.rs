pub mod add;
pub mod output;
pub mod report;

use std::path::PathBuf;

use add::{process_add_command, AddCommand};
use anyhow::Result;
use clap::{Parser, Subcommand};
use report::{process_daily_command, process_records_command, RangeCommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    storage::record_storage::JsonFileStorage,
    utils::{
        clock::LocalClock,
        dir::{create_application_default_path, DEFAULT_LOG_FILE},
        logging::{enable_logging, CLI_PREFIX},
        runtime::single_thread_runtime,
    },
};

#[derive(Parser, Debug)]
#[command(name = "worklog", version, long_about = None)]
#[command(about = "Personal attendance tracker", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Attendance file. By default $XDG_STATE_HOME/worklog/attendance.json or $HOME/.local/state/worklog/attendance.json"
    )]
    file: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs into the console")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Record a working day")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Display recorded entries")]
    Records {
        #[command(flatten)]
        command: RangeCommand,
    },
    #[command(about = "Display hours worked per day")]
    Daily {
        #[command(flatten)]
        command: RangeCommand,
        #[arg(long, help = "Don't draw the chart of daily hours")]
        no_chart: bool,
    },
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let (file, app_dir) = resolve_paths(args.file, create_application_default_path)?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, app_dir.as_deref(), logging_level, args.log)?;

    let storage = JsonFileStorage::new(file);
    debug!("Using attendance file {:?}", storage.path());
    let clock = LocalClock;

    single_thread_runtime()?.block_on(async move {
        match args.commands {
            Commands::Add { command } => process_add_command(command, storage, &clock).await,
            Commands::Records { command } => {
                process_records_command(command, storage, &clock).await
            }
            Commands::Daily { command, no_chart } => {
                process_daily_command(command, !no_chart, storage, &clock).await
            }
        }
    })
}

/// Picks the attendance file and the application directory used for logs. An explicit file
/// doesn't need the application directory, so failing to create one is only fatal without it.
fn resolve_paths(
    file: Option<PathBuf>,
    app_dir: impl FnOnce() -> Result<PathBuf>,
) -> Result<(PathBuf, Option<PathBuf>)> {
    match file {
        Some(file) => {
            let app_dir = app_dir()
                .inspect_err(|e| eprintln!("Logging into a file is disabled: {e}"))
                .ok();
            Ok((file, app_dir))
        }
        None => {
            let app_dir = app_dir()?;
            Ok((app_dir.join(DEFAULT_LOG_FILE), Some(app_dir)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anyhow::anyhow;
    use clap::CommandFactory;

    use super::{resolve_paths, Args};

    #[test]
    fn test_explicit_file_without_app_dir() {
        let (file, app_dir) = resolve_paths(Some(PathBuf::from("a.json")), || {
            Err(anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))
        })
        .unwrap();
        assert_eq!(file, PathBuf::from("a.json"));
        assert_eq!(app_dir, None);
    }

    #[test]
    fn test_explicit_file_with_app_dir() {
        let (file, app_dir) =
            resolve_paths(Some(PathBuf::from("a.json")), || Ok(PathBuf::from("state"))).unwrap();
        assert_eq!(file, PathBuf::from("a.json"));
        assert_eq!(app_dir, Some(PathBuf::from("state")));
    }

    #[test]
    fn test_default_file_lives_in_app_dir() {
        let (file, app_dir) = resolve_paths(None, || Ok(PathBuf::from("state"))).unwrap();
        assert_eq!(file, PathBuf::from("state").join("attendance.json"));
        assert_eq!(app_dir, Some(PathBuf::from("state")));
    }

    #[test]
    fn test_default_file_requires_app_dir() {
        assert!(resolve_paths(None, || Err(anyhow!("no home"))).is_err());
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }
}
