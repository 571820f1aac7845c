use clap::{Parser, Subcommand};
use habitroom_core::{Config, UserId};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "habitroom", version, about = "Habitroom CLI")]
struct Cli {
    /// Acting user id (defaults to tracker.default_user_id)
    #[arg(long, global = true)]
    user: Option<UserId>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Ledger maintenance and completion counts
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Habit categories
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    // stdout carries JSON, so events go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_logging(&config);

    let ctx = commands::Context {
        user_id: cli.user.unwrap_or(config.tracker.default_user_id),
        config,
    };

    match cli.command {
        Commands::Habit { action } => commands::habit::run(&ctx, action),
        Commands::History { action } => commands::history::run(&ctx, action),
        Commands::Category { action } => commands::category::run(&ctx, action),
        Commands::Config { action } => commands::config::run(ctx, action),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
