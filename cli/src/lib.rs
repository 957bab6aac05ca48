use std::path::PathBuf;

use clap::Parser;
use stockroom_activity::LedgerConfig;
use stockroom_activity::config::DEFAULT_CAPACITY;
use stockroom_activity::config::DEFAULT_USER;
use stockroom_activity::factory;
use tracing_subscriber::EnvFilter;

pub mod activity;

pub use activity::ActivityCli;
pub use activity::ActivityCommand;

#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Inventory activity ledger")]
pub struct Cli {
    /// Directory holding the activity store
    /// (default: $STOCKROOM_ACTIVITY_DIR, then ~/.stockroom/activity).
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Storage backend: `file`, `sqlite` or `memory` (default: $STOCKROOM_ACTIVITY_BACKEND, then file).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Identity attributed to new activities.
    #[arg(long, global = true, default_value = DEFAULT_USER)]
    pub user: String,

    /// Number of activities retained.
    #[arg(long, global = true, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Inspect and manage the activity log.
    Activity(ActivityCli),
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = LedgerConfig::default()
        .with_user(cli.user)
        .with_capacity(cli.capacity);
    let dir = factory::resolve_store_dir(cli.store.as_deref());
    let backend = cli.backend.as_deref().map(factory::parse_backend);
    tracing::debug!(
        "stockroom: store dir {dir:?}, backend {backend:?}, capacity {}",
        config.capacity
    );
    let ledger = factory::open_ledger(dir.as_deref(), backend, config)?;
    match cli.cmd {
        Command::Activity(activity) => {
            let mut out = std::io::stdout().lock();
            activity::run(&ledger, activity, &mut out)
        }
    }
}
