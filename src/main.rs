use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use memberhub::config::Config;
use memberhub::logging;
use memberhub::seed;
use memberhub::server;
use memberhub::storage::{InMemoryStorage, Storage};

#[cfg(feature = "db")]
use memberhub::{db::DatabaseManager, storage::DatabaseStorage};

#[derive(Parser)]
#[command(name = "memberhub")]
#[command(about = "GraphQL read API for the membership platform")]
#[command(version = "0.1.0")]
struct Cli {
    /// Port to run the server on (overrides config.toml)
    #[arg(short, long)]
    port: Option<u16>,

    /// Use database storage instead of in-memory
    #[arg(long)]
    use_database: bool,

    /// Seed the store with demo data before serving
    #[arg(long)]
    seed_demo: bool,
}

async fn create_storage(use_database: bool) -> Result<Arc<dyn Storage>> {
    if use_database {
        #[cfg(feature = "db")]
        {
            info!("Initializing database storage...");
            let db_manager = DatabaseManager::new().await?;
            db_manager.run_migrations().await?;
            let storage = Arc::new(DatabaseStorage::new(db_manager));
            info!("Database storage initialized successfully");
            Ok(storage)
        }
        #[cfg(not(feature = "db"))]
        {
            anyhow::bail!("Database feature not enabled. Rebuild with --features db");
        }
    } else {
        info!("Using in-memory storage");
        Ok(Arc::new(InMemoryStorage::new()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;
    let port = cli.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", config.server.host, port).parse()?;

    let storage = create_storage(cli.use_database).await?;

    if cli.seed_demo {
        seed::seed_demo_data(storage.as_ref()).await?;
    }

    server::start_server(storage, addr).await?;

    Ok(())
}
