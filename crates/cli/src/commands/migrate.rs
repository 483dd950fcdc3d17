//! Run the storefront database migrations.

use tracing::info;

/// Apply the embedded migrations to the storefront database.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Migrations applied");
    Ok(())
}
