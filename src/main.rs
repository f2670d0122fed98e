//! labelkit - label vessel trajectory segments from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vessel_labelkit::{LabelingConfig, LabelingSession};

#[derive(Parser, Debug)]
#[command(author, version, about = "Vessel trajectory segment labeling", long_about = None)]
struct Cli {
    /// TOML config file (defaults are used when it does not exist)
    #[arg(short, long, global = true, default_value = "labelkit.toml", value_hint = ValueHint::FilePath)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List trajectory files in the data directory
    List,
    /// Print the configured label options
    Options,
    /// Show labeling coverage of a trajectory
    Coverage {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Print the view model of a window as JSON
    View {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long)]
        start: Option<i64>,
        #[arg(long)]
        end: Option<i64>,
    },
    /// Label a window and save it back to the file
    Label {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long)]
        start: Option<i64>,
        #[arg(long)]
        end: Option<i64>,
        /// Label to assign
        #[arg(long)]
        category: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = LabelingConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let mut session = LabelingSession::new(config)?;

    match cli.command {
        Command::List => {
            for path in session.sources()? {
                println!("{}", path.display());
            }
        }
        Command::Options => {
            for option in session.label_options().as_slice() {
                println!("{}", option);
            }
        }
        Command::Coverage { file } => {
            let trajectory = session.open(&file)?;
            println!("vessel {}", trajectory.vessel_key());
            println!("{}", session.coverage()?);
        }
        Command::View { file, start, end } => {
            session.open(&file)?;
            session.select(start, end)?;
            println!("{}", session.view()?.to_json()?);
        }
        Command::Label {
            file,
            start,
            end,
            category,
        } => {
            session.open(&file)?;
            let range = session.select(start, end)?;
            info!(
                "labeling rows {} to {} as '{}'",
                range.start(),
                range.end(),
                category
            );
            session.label_segment(&category)?;
            println!("{}", session.coverage()?);
        }
    }

    Ok(())
}
