//! Commands that need a database connection.

use std::path::Path;

use ordval_core::CatalogSnapshot;

/// Loads `DATABASE_URL` and pool settings from the environment and connects.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the pool cannot connect.
pub(crate) async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let config = ordval_core::load_app_config()?;
    let pool_config = ordval_db::PoolConfig::from_app_config(&config);
    let pool = ordval_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

/// Upserts the catalog file into `produtos`, `adicionais` and `bairros`.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or any upsert fails; the
/// batch is rolled back on failure.
pub(crate) async fn run_seed(pool: &sqlx::PgPool, catalog_path: &Path) -> anyhow::Result<()> {
    tracing::debug!(path = %catalog_path.display(), "loading catalog for seeding");
    let catalog = CatalogSnapshot::from_yaml_path(catalog_path)?;
    ordval_db::run_migrations(pool).await?;
    let summary = ordval_db::seed_catalog(pool, &catalog).await?;

    println!(
        "seeded {} products, {} additionals, {} neighborhoods from {}",
        summary.products,
        summary.additionals,
        summary.neighborhoods,
        catalog_path.display()
    );
    Ok(())
}

pub(crate) async fn run_ping(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    ordval_db::health_check(pool).await?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    ordval_db::run_migrations(pool).await?;
    println!("migrations applied");
    Ok(())
}
