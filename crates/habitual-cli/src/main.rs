use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "habitual", version, about = "Habit tracker with period streaks")]
struct Cli {
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
    /// Check off a habit
    Check(commands::check::CheckArgs),
    /// Streak analysis across habits
    Analyze(commands::analyze::AnalyzeArgs),
    /// Print the start of the period containing a date
    Period(commands::period::PeriodArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

/// `HABITUAL_LOG` wins over `logging.level` from the config file.
fn init_logging() {
    let filter = EnvFilter::try_from_env("HABITUAL_LOG").unwrap_or_else(|_| {
        let level = habitual_core::Config::load()
            .map(|config| config.logging.level)
            .unwrap_or_else(|_| "warn".to_string());
        EnvFilter::new(level)
    });
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Check(args) => commands::check::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Period(args) => commands::period::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
