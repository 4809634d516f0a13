//! Order reconciliation against the catalog.
//!
//! Each stage is a pure function returning a [`ReconcileOutcome`]; the
//! orchestrator only concatenates. Stages run product → delivery fee →
//! total, because the total check consumes both earlier contributions.

use rust_decimal::Decimal;

use crate::catalog::CatalogGateway;
use crate::error::GatewayError;
use crate::money::{amounts_match, brl};
use crate::order::{LineItem, OrderRecord};
use crate::report::{Correction, ValidationReport};
use crate::text::{extract_size_qualifier, strip_size_qualifier};

/// Errors, corrections, and the amount a stage adds to the computed total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    pub errors: Vec<String>,
    pub corrections: Vec<Correction>,
    pub contribution: Decimal,
}

impl ReconcileOutcome {
    fn with_error(error: String) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }
}

/// A mismatch between the informed total and the computed one.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalDiscrepancy {
    pub error: String,
    pub correction: Correction,
}

/// Collapses a failed lookup into "not found", logging the failure.
fn found_or_log<T>(lookup: Result<Option<T>, GatewayError>, table: &str, name: &str) -> Option<T> {
    lookup.unwrap_or_else(|error| {
        tracing::warn!(%error, table, name, "catalog lookup failed; treating as not found");
        None
    })
}

/// Matches every line item against the catalog.
///
/// Mismatched prices are replaced by the catalog price in the contribution,
/// so the computed total reflects what the order should cost.
pub fn reconcile_products(catalog: &dyn CatalogGateway, items: &[LineItem]) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for item in items {
        let explicit_size = item
            .size
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let size = explicit_size.or_else(|| extract_size_qualifier(&item.name).map(|s| s.as_str()));
        let lookup_name = strip_size_qualifier(&item.name);

        let Some(product) = found_or_log(
            catalog.find_product(&lookup_name, size),
            "produtos",
            &item.name,
        ) else {
            outcome
                .errors
                .push(format!("Produto '{}' não encontrado no cardápio", item.name));
            continue;
        };

        if amounts_match(item.price, product.price) {
            outcome.contribution += item.price;
        } else {
            outcome.errors.push(format!(
                "Preço incorreto para '{}': informado {}, correto {}",
                item.name,
                brl(item.price),
                brl(product.price)
            ));
            outcome.corrections.push(Correction::product_price(
                item.name.clone(),
                item.price,
                product.price,
            ));
            outcome.contribution += product.price;
        }
    }

    outcome
}

/// Checks the delivery fee for `neighborhood`. Only meaningful for delivery orders.
///
/// A missing neighborhood short-circuits without a catalog lookup.
pub fn reconcile_delivery_fee(
    catalog: &dyn CatalogGateway,
    neighborhood: Option<&str>,
    informed_fee: Decimal,
) -> ReconcileOutcome {
    let Some(neighborhood) = neighborhood.filter(|n| !n.trim().is_empty()) else {
        return ReconcileOutcome::with_error("Bairro não informado para entrega".to_string());
    };

    let Some(record) = found_or_log(
        catalog.find_neighborhood(neighborhood),
        "bairros",
        neighborhood,
    ) else {
        return ReconcileOutcome::with_error(format!(
            "Bairro '{neighborhood}' não encontrado ou indisponível"
        ));
    };

    if amounts_match(informed_fee, record.fee) {
        return ReconcileOutcome {
            contribution: informed_fee,
            ..ReconcileOutcome::default()
        };
    }

    ReconcileOutcome {
        errors: vec![format!(
            "Taxa de entrega incorreta para '{neighborhood}': informada {}, correta {}",
            brl(informed_fee),
            brl(record.fee)
        )],
        corrections: vec![Correction::delivery_fee(
            neighborhood,
            informed_fee,
            record.fee,
        )],
        contribution: record.fee,
    }
}

/// Compares the informed grand total with the computed one.
#[must_use]
pub fn reconcile_total(
    informed_total: Decimal,
    computed_total: Decimal,
) -> Option<TotalDiscrepancy> {
    if amounts_match(informed_total, computed_total) {
        return None;
    }
    Some(TotalDiscrepancy {
        error: format!(
            "Valor total incorreto: informado {}, calculado {}",
            brl(informed_total),
            brl(computed_total)
        ),
        correction: Correction::total(informed_total, computed_total),
    })
}

/// Validates one order against the catalog. Never fails: lookup failures
/// are logged and reported as missing catalog entries.
pub fn validate_order(catalog: &dyn CatalogGateway, order: &OrderRecord) -> ValidationReport {
    let products = reconcile_products(catalog, &order.items);
    tracing::debug!(
        items = order.items.len(),
        errors = products.errors.len(),
        subtotal = %products.contribution,
        "products reconciled"
    );

    let fee = if order.is_delivery() {
        let fee =
            reconcile_delivery_fee(catalog, order.neighborhood.as_deref(), order.delivery_fee);
        tracing::debug!(
            neighborhood = order.neighborhood.as_deref().unwrap_or_default(),
            errors = fee.errors.len(),
            fee = %fee.contribution,
            "delivery fee reconciled"
        );
        fee
    } else {
        ReconcileOutcome::default()
    };

    let computed_total = products.contribution + fee.contribution;
    let total = reconcile_total(order.total, computed_total);

    let mut errors = products.errors;
    errors.extend(fee.errors);
    let mut corrections = products.corrections;
    corrections.extend(fee.corrections);
    if let Some(discrepancy) = total {
        errors.push(discrepancy.error);
        corrections.push(discrepancy.correction);
    }

    let report = ValidationReport::new(computed_total, order.total, errors, corrections);
    tracing::info!(
        valid = report.is_valid,
        errors = report.errors.len(),
        computed_total = %report.computed_total,
        informed_total = %report.informed_total,
        "order validated"
    );
    report
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
