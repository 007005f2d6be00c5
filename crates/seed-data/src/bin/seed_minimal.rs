//! Minimal seed script - creates one author with one book
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed_minimal
//! ```

use seed_data::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SeedConfig::from_env()?;
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&database_url).await?;
    tracing::info!("Connected to database");

    let mut rng = config.rng();
    let seeder = Seeder::new(db).with_config(config);

    let result = seeder.seed_minimal(&mut rng).await;
    seeder.store().close().await;

    match result {
        Ok(author) => {
            println!("Created author: {}", serde_json::to_string_pretty(&author)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Seeding failed: {e}");
            Err(e.into())
        }
    }
}
