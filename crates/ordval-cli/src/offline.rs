//! Commands that run against a YAML catalog without a database.

use std::path::Path;

use ordval_core::{
    money::brl, CatalogGateway, CatalogNeighborhood, CatalogProduct, CatalogSnapshot,
    OrderRecord, ValidationReport,
};

use crate::LookupCommands;

/// Validates the order JSON at `order_path` against the catalog YAML.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub(crate) fn validate_files(
    order_path: &Path,
    catalog_path: &Path,
) -> anyhow::Result<ValidationReport> {
    let raw = std::fs::read_to_string(order_path)
        .map_err(|e| anyhow::anyhow!("failed to read order {}: {e}", order_path.display()))?;
    let order: OrderRecord = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid order JSON in {}: {e}", order_path.display()))?;
    let catalog = CatalogSnapshot::from_yaml_path(catalog_path)?;

    Ok(ordval_core::validate_order(&catalog, &order))
}

/// Prints the validation report as pretty JSON. An invalid order is not a
/// command failure.
pub(crate) fn run_validate(order_path: &Path, catalog_path: &Path) -> anyhow::Result<()> {
    let report = validate_files(order_path, catalog_path)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Resolves a lookup to a single display row.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or nothing matches.
pub(crate) fn lookup(command: &LookupCommands) -> anyhow::Result<String> {
    match command {
        LookupCommands::Product {
            name,
            size,
            catalog,
        } => {
            let snapshot = CatalogSnapshot::from_yaml_path(catalog)?;
            snapshot
                .find_product(name, size.as_deref())?
                .map(|p| item_row(&p))
                .ok_or_else(|| not_found("product", name, size.as_deref()))
        }
        LookupCommands::Additional {
            name,
            size,
            catalog,
        } => {
            let snapshot = CatalogSnapshot::from_yaml_path(catalog)?;
            snapshot
                .find_additional(name, size.as_deref())?
                .map(|a| item_row(&a))
                .ok_or_else(|| not_found("additional", name, size.as_deref()))
        }
        LookupCommands::Neighborhood { name, catalog } => {
            let snapshot = CatalogSnapshot::from_yaml_path(catalog)?;
            snapshot
                .find_neighborhood(name)?
                .map(|n| neighborhood_row(&n))
                .ok_or_else(|| not_found("neighborhood", name, None))
        }
    }
}

pub(crate) fn run_lookup(command: &LookupCommands) -> anyhow::Result<()> {
    let row = lookup(command)?;
    println!("{row}");
    Ok(())
}

fn item_row(item: &CatalogProduct) -> String {
    format!(
        "{:<32}{:<10}{:<14}{}",
        item.name,
        item.size.as_deref().unwrap_or("-"),
        brl(item.price),
        item.status.as_str()
    )
}

fn neighborhood_row(neighborhood: &CatalogNeighborhood) -> String {
    format!(
        "{:<32}{:<14}{}",
        neighborhood.name,
        brl(neighborhood.fee),
        neighborhood.status.as_str()
    )
}

fn not_found(kind: &str, name: &str, size: Option<&str>) -> anyhow::Error {
    anyhow::anyhow!(
        "{kind} '{name}'{} not found or unavailable in catalog",
        size.map(|s| format!(" (size {s})")).unwrap_or_default()
    )
}
