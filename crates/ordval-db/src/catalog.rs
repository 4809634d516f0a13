//! Read operations for `produtos`, `adicionais`, and `bairros`.

use chrono::{DateTime, Utc};
use ordval_core::{
    Availability, CatalogNeighborhood, CatalogProduct, CatalogSnapshot,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from `produtos` or `adicionais` (identical shape).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogItemRow {
    pub id: i64,
    pub nome: String,
    /// `''` for single-size items.
    pub tamanho: String,
    pub preco: Decimal,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// A row from `bairros`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NeighborhoodRow {
    pub id: i64,
    pub nome: String,
    pub taxa: Decimal,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl From<CatalogItemRow> for CatalogProduct {
    fn from(row: CatalogItemRow) -> Self {
        let size = Some(row.tamanho).filter(|s| !s.trim().is_empty());
        CatalogProduct {
            name: row.nome,
            size,
            price: row.preco,
            status: Availability::from_status(&row.status),
        }
    }
}

impl From<NeighborhoodRow> for CatalogNeighborhood {
    fn from(row: NeighborhoodRow) -> Self {
        CatalogNeighborhood {
            name: row.nome,
            fee: row.taxa,
            status: Availability::from_status(&row.status),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Lists available products in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(pool: &PgPool) -> Result<Vec<CatalogItemRow>, DbError> {
    let rows = sqlx::query_as::<_, CatalogItemRow>(
        "SELECT id, nome, tamanho, preco, status, updated_at \
         FROM produtos \
         WHERE status = 'disponivel' \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lists available additionals in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_additionals(pool: &PgPool) -> Result<Vec<CatalogItemRow>, DbError> {
    let rows = sqlx::query_as::<_, CatalogItemRow>(
        "SELECT id, nome, tamanho, preco, status, updated_at \
         FROM adicionais \
         WHERE status = 'disponivel' \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lists available neighborhoods in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_neighborhoods(pool: &PgPool) -> Result<Vec<NeighborhoodRow>, DbError> {
    let rows = sqlx::query_as::<_, NeighborhoodRow>(
        "SELECT id, nome, taxa, status, updated_at \
         FROM bairros \
         WHERE status = 'disponivel' \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Loads the available catalog into an in-memory snapshot.
///
/// One query per table; the snapshot answers every lookup for a single
/// order without further round trips.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any of the three queries fails.
pub async fn load_catalog(pool: &PgPool) -> Result<CatalogSnapshot, DbError> {
    let products = list_products(pool).await?;
    let additionals = list_additionals(pool).await?;
    let neighborhoods = list_neighborhoods(pool).await?;

    tracing::debug!(
        products = products.len(),
        additionals = additionals.len(),
        neighborhoods = neighborhoods.len(),
        "catalog snapshot loaded"
    );

    Ok(CatalogSnapshot {
        products: products.into_iter().map(CatalogProduct::from).collect(),
        additionals: additionals.into_iter().map(CatalogProduct::from).collect(),
        neighborhoods: neighborhoods
            .into_iter()
            .map(CatalogNeighborhood::from)
            .collect(),
    })
}
