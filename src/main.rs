use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use netforge::config::Config;
use netforge::NfResult;
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for a net that replays the log well.
    Discover(cmd::discover::DiscoverArgs),
    /// Score a saved net against a log.
    Replay(cmd::replay::ReplayArgs),
}

fn main() {
    // 1. Parse Raw Matches (to distinguish user input from defaults)
    let matches = Cli::command().get_matches();

    // 2. Construct CLI struct (populated with defaults)
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Discover(args) => {
            // Flags such as --population-size live in the subcommand's matches.
            let sub_matches = matches.subcommand_matches("discover");
            resolve_config(&args.config, args.config_file.as_deref(), sub_matches)
                .and_then(|config| cmd::discover::run(args, config))
        }
        Commands::Replay(args) => cmd::replay::run(args),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}

/// A config file becomes the base; flags typed on the command line override it.
fn resolve_config(
    cli_config: &Config,
    path: Option<&str>,
    sub_matches: Option<&clap::ArgMatches>,
) -> NfResult<Config> {
    let config = match (path, sub_matches) {
        (Some(path), Some(m)) => {
            println!("📂 Loading Config: {}", path);
            let mut file_config = Config::load_from_file(path)?;
            file_config.merge_from_cli(cli_config, m);
            file_config
        }
        (Some(path), None) => Config::load_from_file(path)?,
        (None, _) => cli_config.clone(),
    };
    config.validate()?;
    Ok(config)
}
