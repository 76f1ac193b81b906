// ScoutAI command-line entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config (copying defaults on first run)
// 4. Open database
// 5. Dispatch the subcommand

mod cli;

use anyhow::Context;
use clap::Parser;
use scoutai_core::{config, db};
use tracing::{error, info};

use cli::session::Session;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let args = Cli::parse();

    // 2. Initialize tracing
    init_tracing(args.log_level.as_deref())?;
    info!("scoutai starting up");

    // 3. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: api={}, top_k={}",
        config.api.base_url, config.recommendations.top_k
    );

    // 4. Open database
    let db_path = config.resolve_db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let db_path = db_path.to_string_lossy().into_owned();
    let db = db::Database::open(&db_path).context("failed to open database")?;
    info!("Database opened at {db_path}");

    let session = Session::new(config, db, args.players);

    // 5. Dispatch
    let result = match &args.command {
        Commands::Recommend(a) => cli::recommend::execute(&session, a).await,
        Commands::Search(a) => cli::search::execute(&session, a).await,
        Commands::Chat(a) => cli::chat::execute(&session, a).await,
        Commands::Compare(a) => cli::compare::execute(&session, a).await,
        Commands::Metrics(a) => cli::compare::metrics(&session, a).await,
        Commands::Favorites(c) => cli::favorites::execute(&session, c).await,
        Commands::History(c) => cli::history::execute(&session, c),
        Commands::Draft(c) => cli::draft::execute(&session, c).await,
        Commands::Export(a) => cli::export::execute(&session, a).await,
        Commands::Dashboard => cli::dashboard::execute(&session).await,
        Commands::Health => cli::health::execute(&session).await,
    };

    if let Err(e) = &result {
        error!("command failed: {e:#}");
    }
    result
}

/// Initialize tracing to log to a file, keeping the terminal for command
/// output. `--log-level` takes precedence over `RUST_LOG`.
fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("scoutai.log"))?;

    let filter = match level {
        Some(level) => EnvFilter::try_new(format!("scoutai={level},warn"))
            .with_context(|| format!("invalid log level {level:?}"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("scoutai=info,warn")),
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
