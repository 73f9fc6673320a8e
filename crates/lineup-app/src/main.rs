// Lineup CLI entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Parse the command line
// 3. Load config
// 4. Open database
// 5. Load player catalog
// 6. Restore working roster, run the command

use lineup_app::app::App;
use lineup_app::command::{Command, USAGE};
use lineup_app::config;
use lineup_app::db;
use lineup_app::players;

use anyhow::Context;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    info!("running {:?}", command);

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: default formation {}, recommendations from {} players",
        config.lineup.default_formation, config.recommendations.min_players
    );

    let db = db::Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    let catalog =
        players::load_catalog(&config.data_paths).context("failed to load players")?;

    let mut app = App::new(config, db, catalog).context("failed to restore working roster")?;
    match app.execute(command) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!("command failed: {:#}", e);
            Err(e)
        }
    }
}

/// Initialize tracing to append to a log file so command output stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("lineup.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lineup_app=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
