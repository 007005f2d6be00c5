//! Full seed script - wipes the bookshelf tables and repopulates them
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed
//! ```
//!
//! Flags:
//! - `--migrate`: apply the schema migrations first
//! - `--in-memory`: seed an in-memory store instead of PostgreSQL

use seed_data::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let in_memory = args.iter().any(|a| a == "--in-memory");
    let migrate = args.iter().any(|a| a == "--migrate");

    let config = SeedConfig::from_env()?;

    if in_memory {
        tracing::info!("Seeding in-memory store");
        return seed(MemoryStore::new(), config).await;
    }

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&database_url).await?;
    tracing::info!("Connected to database");

    if migrate {
        if let Err(e) = db.migrate().await {
            tracing::error!("Migration failed: {e}");
            db.close().await;
            return Err(e.into());
        }
        tracing::info!("Migrations applied");
    }

    seed(db, config).await
}

/// Runs the full seeder and prints the report. The store is closed on both
/// the success and the failure path.
async fn seed<S: Store>(store: S, config: SeedConfig) -> anyhow::Result<()> {
    let mut rng = config.rng();
    let seeder = Seeder::new(store).with_config(config);

    let result = seeder.run(&mut rng).await;
    seeder.store().close().await;

    match result {
        Ok(report) => {
            tracing::info!("Seed completed!");
            println!("{report}");
            Ok(())
        }
        Err(SeedError::Store(e)) if e.is_constraint_violation() => {
            tracing::error!("Seeding hit a schema constraint: {e}");
            Err(SeedError::Store(e).into())
        }
        Err(e) => {
            tracing::error!("Seeding failed: {e}");
            Err(e.into())
        }
    }
}
