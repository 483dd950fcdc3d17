//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

use villagecraft_storefront::db;

/// Connect to the storefront database using the standard environment lookup.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("VILLAGECRAFT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "VILLAGECRAFT_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    tracing::info!("Connected to database");
    Ok(pool)
}
