use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use remeny_aenor::config::DEFAULT_CONFIG_PATH;
use remeny_aenor::{Config, Session, repl};

#[derive(Parser)]
#[command(name = "remeny", version, about = "Remény & Aenor voice assistant shell")]
struct Cli {
    /// Config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Initially active user (overrides the config)
    #[arg(short, long)]
    user: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send one command to the active persona and exit
    Say {
        #[arg(required = true)]
        text: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info,remeny_aenor=info",
        2 => "info,remeny_aenor=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(user) = cli.user {
        config.default_user = user;
    }
    let session = Session::from_config(&config)?;

    match cli.command {
        Some(Command::Say { text }) => {
            session.on_command_submitted(&text.join(" "))?;
            Ok(())
        }
        None => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(repl::run(session));
            // Cancelled captures may still be blocked in the recognizer
            runtime.shutdown_background();
            result
        }
    }
}
