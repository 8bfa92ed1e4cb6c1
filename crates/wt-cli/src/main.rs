use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wt_cli::commands::{ignore, report, vacation};
use wt_cli::{Cli, Commands, Config, VacationAction};

/// Locate the Watson directory and load the config stored next to it.
fn load_config(cli: &Cli) -> Result<(PathBuf, Config)> {
    let watson_dir = wt_cli::watson_dir()
        .context("cannot determine the Watson directory; set WATSON_DIR")?;
    let config = Config::load_from(&watson_dir, cli.config.as_deref())
        .context("failed to load configuration")?;
    tracing::debug!(?config, watson_dir = %watson_dir.display(), "loaded configuration");
    Ok((watson_dir, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so reports can be piped
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let now = Local::now();
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Report(args)) => {
            let (watson_dir, config) = load_config(&cli)?;
            report::run(&mut stdout, &config, &watson_dir, &args.options(), &now)?;
        }
        Some(Commands::Vacation { action }) => {
            let (watson_dir, config) = load_config(&cli)?;
            match action {
                VacationAction::List => {
                    vacation::list(&mut stdout, &config, &watson_dir, now.date_naive())?;
                }
                VacationAction::Add(args) => {
                    vacation::add(&mut stdout, &config, &watson_dir, args, &now)?;
                }
                VacationAction::Del(args) => vacation::del(&mut stdout, &watson_dir, args)?,
            }
        }
        Some(Commands::Ignore { days }) => {
            let (watson_dir, _config) = load_config(&cli)?;
            ignore::ignore(&mut stdout, &watson_dir, days)?;
        }
        Some(Commands::Unignore { days }) => {
            let (watson_dir, _config) = load_config(&cli)?;
            ignore::unignore(&mut stdout, &watson_dir, days)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
