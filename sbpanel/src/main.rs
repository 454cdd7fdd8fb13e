use clap::{Parser, Subcommand};
use sbpanel_core::cli;
use sbpanel_core::conf::load_config;
use sbpanel_core::event::LogFormat;
use sbpanel_core::logging::{LogMode, default_log_mode, init_logging};
use sbpanel_core::server;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sbpanel",
    version,
    about = "sbpanel: Starbound server status from its log"
)]
struct Cli {
    /// Log output format (default: pretty on a terminal, json otherwise)
    #[arg(long, global = true, value_enum)]
    log_mode: Option<LogMode>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow the server log and keep state up to date (default)
    Run {
        /// Path to the sbpanel config file
        #[arg(long, default_value = "sbpanel.hcl")]
        config: PathBuf,
    },

    /// Rebuild state from a log file and print it
    Replay {
        log: PathBuf,

        #[arg(long, value_enum, default_value_t = LogFormat::Auto)]
        format: LogFormat,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::conf::ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_mode.unwrap_or_else(default_log_mode));

    let command = cli.command.unwrap_or(Command::Run {
        config: PathBuf::from("sbpanel.hcl"),
    });

    let result = match command {
        Command::Run { config } => run(config),
        Command::Replay { log, format, json } => cli::replay::replay(&log, format, json),
        Command::Config { cmd } => cli::conf::run(cmd),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(config: PathBuf) -> anyhow::Result<()> {
    let cfg = load_config(&config)?;
    tracing::info!(config = %config.display(), "configuration loaded");
    server::run(cfg)
}
