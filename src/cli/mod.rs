pub mod config;
pub mod edit;
pub mod output;
pub mod totals;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{load_config, Config};
use edit::edit_log;
use output::todo::print_todo;
use totals::{process_totals_command, TotalsCommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    fs::operations::read_logs,
    log::tidy::print_log,
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "tf", version, long_about = None)]
#[command(about = "Shows where the time of your week went, based on a plain text activity log")]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        short,
        long,
        global = true,
        help = "Config file. By default $HOME/.tf/config is used when present"
    )]
    config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        help = "Log file. Overrides LogFile of the config, by default $HOME/.tf/log"
    )]
    log: Option<PathBuf>,
    #[arg(long, global = true, help = "Trace everything and mirror it to stderr")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Display how the weekly budget was spent")]
    Tots {
        #[command(flatten)]
        command: TotalsCommand,
    },
    #[command(about = "List open todo entries, oldest week first")]
    Todo {},
    #[command(about = "Print the log in canonical form, newest week first")]
    Tidy {},
    #[command(about = "Open the log file in $EDITOR")]
    Edit {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();
    let app_dir = create_application_default_path()?;

    let logging_level = if args.verbose {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.verbose)?;

    let mut config = load_config(args.config.as_deref(), &app_dir).await?;
    if let Some(log) = args.log {
        config.file.log_file = Some(log);
    }
    debug!("Running {:?} with {config:?}", args.commands);

    run_command(args.commands, config, app_dir).await
}

async fn run_command(commands: Commands, config: Config, app_dir: PathBuf) -> Result<()> {
    let log_paths = config.file.log_paths(&app_dir);
    match commands {
        Commands::Tots { command } => process_totals_command(command, config, &log_paths).await,
        Commands::Todo {} => {
            print!("{}", print_todo(&read_logs(&log_paths).await?));
            Ok(())
        }
        Commands::Tidy {} => {
            print!("{}", print_log(&read_logs(&log_paths).await?));
            Ok(())
        }
        Commands::Edit {} => edit_log(&config.file.log_file(&app_dir)).await,
    }
}
