use ordval_core::{CatalogNeighborhood, CatalogProduct, CatalogSnapshot};
use sqlx::{Postgres, Transaction};

use crate::DbError;

/// Number of rows upserted per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub additionals: usize,
    pub neighborhoods: usize,
}

/// Upsert a catalog (typically loaded from YAML) into the database.
///
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back. Existing rows keep their `id`, so
/// lookup order is stable across re-seeds.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(
    pool: &sqlx::PgPool,
    catalog: &CatalogSnapshot,
) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for product in &catalog.products {
        upsert_item(&mut tx, "produtos", product).await?;
        summary.products += 1;
    }

    for additional in &catalog.additionals {
        upsert_item(&mut tx, "adicionais", additional).await?;
        summary.additionals += 1;
    }

    for neighborhood in &catalog.neighborhoods {
        upsert_neighborhood(&mut tx, neighborhood).await?;
        summary.neighborhoods += 1;
    }

    tx.commit().await?;

    tracing::info!(
        products = summary.products,
        additionals = summary.additionals,
        neighborhoods = summary.neighborhoods,
        "catalog seeded"
    );
    Ok(summary)
}

async fn upsert_item(
    tx: &mut Transaction<'_, Postgres>,
    table: &'static str,
    item: &CatalogProduct,
) -> Result<(), DbError> {
    if item.name.trim().is_empty() {
        return Err(DbError::InvalidRecord(format!("{table}: empty name")));
    }

    // `table` is one of two compile-time constants, never user input.
    let sql = format!(
        "INSERT INTO {table} (nome, tamanho, preco, status) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (nome, tamanho) DO UPDATE SET \
             preco      = EXCLUDED.preco, \
             status     = EXCLUDED.status, \
             updated_at = NOW()"
    );

    sqlx::query(&sql)
        .bind(&item.name)
        .bind(item.size.as_deref().map(str::trim).unwrap_or_default())
        .bind(item.price)
        .bind(item.status.as_str())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn upsert_neighborhood(
    tx: &mut Transaction<'_, Postgres>,
    neighborhood: &CatalogNeighborhood,
) -> Result<(), DbError> {
    if neighborhood.name.trim().is_empty() {
        return Err(DbError::InvalidRecord("bairros: empty name".to_string()));
    }

    sqlx::query(
        "INSERT INTO bairros (nome, taxa, status) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (nome) DO UPDATE SET \
             taxa       = EXCLUDED.taxa, \
             status     = EXCLUDED.status, \
             updated_at = NOW()",
    )
    .bind(&neighborhood.name)
    .bind(neighborhood.fee)
    .bind(neighborhood.status.as_str())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
