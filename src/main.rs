use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use planetoid::{opml, Aggregator, HttpFeedSource, Settings};

/// Aggregate RSS/Atom feeds into a static, categorized HTML archive.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch all feeds and write the site
    Build {
        /// YAML feed list
        config: PathBuf,
        /// Output directory (removed and recreated)
        output: PathBuf,
        /// TOML settings file
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Convert an OPML subscription list to a YAML feed list on stdout
    Opml {
        /// OPML file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            config,
            output,
            settings,
        } => {
            let settings = match settings {
                Some(path) => match Settings::load(&path) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Failed to load {}: {e}", path.display());
                        return ExitCode::FAILURE;
                    }
                },
                None => Settings::default(),
            };

            if let Err(e) = planetoid::logging::init(&settings.logging) {
                eprintln!("Failed to initialize logging: {e}");
                planetoid::logging::init_console_only(&settings.logging.level);
            }

            match build(config, output, settings).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Opml { file } => {
            match opml::load_opml(&file).and_then(|feeds| opml::to_yaml(&feeds)) {
                Ok(yaml) => {
                    print!("{yaml}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to convert {}: {e}", file.display());
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn build(config: PathBuf, output: PathBuf, settings: Settings) -> planetoid::Result<()> {
    let feeds = planetoid::load_feeds(&config)?;
    let source = HttpFeedSource::new(&settings.fetch)?;
    Aggregator::new(source, settings).run(feeds, &output).await?;
    Ok(())
}
