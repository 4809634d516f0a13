use std::cell::Cell;

use super::*;
use crate::catalog::{
    Availability, CatalogAdditional, CatalogNeighborhood, CatalogProduct, CatalogSnapshot,
    UnavailableCatalog,
};
use crate::order::DeliveryType;
use crate::report::SUCCESS_SUMMARY;

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn product(name: &str, size: Option<&str>, price_cents: i64) -> CatalogProduct {
    CatalogProduct {
        name: name.to_string(),
        size: size.map(ToString::to_string),
        price: money(price_cents),
        status: Availability::Available,
    }
}

fn catalog() -> CatalogSnapshot {
    CatalogSnapshot {
        products: vec![
            product("Pizza Calabresa", Some("grande"), 50_00),
            product("Pizza Mussarela", Some("pequeno"), 27_00),
            product("Pizza Calabresa Acebolada", Some("grande"), 50_00),
            product("Refrigerante Lata", None, 6_50),
        ],
        additionals: vec![],
        neighborhoods: vec![CatalogNeighborhood {
            name: "Vila Cristina".to_string(),
            fee: money(3_00),
            status: Availability::Available,
        }],
    }
}

fn delivery_order(
    items: Vec<LineItem>,
    neighborhood: Option<&str>,
    fee: i64,
    total: i64,
) -> OrderRecord {
    OrderRecord {
        items,
        neighborhood: neighborhood.map(ToString::to_string),
        delivery_fee: money(fee),
        total: money(total),
        delivery_type: DeliveryType::Delivery,
        ..OrderRecord::default()
    }
}

/// Gateway that records how many neighborhood lookups were attempted.
struct CountingGateway {
    inner: CatalogSnapshot,
    neighborhood_lookups: Cell<usize>,
}

impl CatalogGateway for CountingGateway {
    fn find_product(
        &self,
        name: &str,
        size: Option<&str>,
    ) -> Result<Option<CatalogProduct>, GatewayError> {
        self.inner.find_product(name, size)
    }

    fn find_additional(
        &self,
        name: &str,
        size: Option<&str>,
    ) -> Result<Option<CatalogAdditional>, GatewayError> {
        self.inner.find_additional(name, size)
    }

    fn find_neighborhood(&self, name: &str) -> Result<Option<CatalogNeighborhood>, GatewayError> {
        self.neighborhood_lookups.set(self.neighborhood_lookups.get() + 1);
        self.inner.find_neighborhood(name)
    }
}

// -----------------------------------------------------------------------
// reconcile_products
// -----------------------------------------------------------------------

#[test]
fn sized_name_matches_catalog_product() {
    let outcome = reconcile_products(
        &catalog(),
        &[LineItem::new("Pizza grande Calabresa", money(50_00))],
    );
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert!(outcome.corrections.is_empty());
    assert_eq!(outcome.contribution, money(50_00));
}

#[test]
fn wrong_price_is_corrected_to_catalog_price() {
    let outcome = reconcile_products(
        &catalog(),
        &[LineItem::new("Pizza grande Calabresa", money(55_00))],
    );
    assert_eq!(
        outcome.errors,
        vec![
            "Preço incorreto para 'Pizza grande Calabresa': informado R$ 55.00, correto R$ 50.00"
                .to_string()
        ]
    );
    assert_eq!(outcome.corrections.len(), 1);
    assert_eq!(outcome.corrections[0].delta(), money(-5_00));
    assert_eq!(outcome.contribution, money(50_00));
}

#[test]
fn unknown_product_contributes_nothing_and_has_no_correction() {
    let outcome = reconcile_products(
        &catalog(),
        &[
            LineItem::new("Pizza grande Portuguesa", money(48_00)),
            LineItem::new("Refrigerante Lata", money(6_50)),
        ],
    );
    assert_eq!(
        outcome.errors,
        vec!["Produto 'Pizza grande Portuguesa' não encontrado no cardápio".to_string()]
    );
    assert!(outcome.corrections.is_empty());
    assert_eq!(outcome.contribution, money(6_50));
}

#[test]
fn size_mismatch_is_not_found() {
    let outcome = reconcile_products(
        &catalog(),
        &[LineItem::new("Pizza pequena Calabresa", money(27_00))],
    );
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("não encontrado no cardápio"));
}

#[test]
fn explicit_size_overrides_name() {
    let item = LineItem {
        name: "Pizza Mussarela".to_string(),
        price: money(27_00),
        size: Some("Pequeno".to_string()),
    };
    let outcome = reconcile_products(&catalog(), &[item]);
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.contribution, money(27_00));
}

#[test]
fn blank_explicit_size_falls_back_to_name() {
    let item = LineItem {
        name: "Pizza pequena Mussarela".to_string(),
        price: money(27_00),
        size: Some("  ".to_string()),
    };
    let outcome = reconcile_products(&catalog(), &[item]);
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
}

#[test]
fn price_within_one_cent_keeps_informed_price() {
    let outcome = reconcile_products(
        &catalog(),
        &[LineItem::new("Pizza grande Calabresa", money(50_01))],
    );
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.contribution, money(50_01));
}

#[test]
fn price_beyond_one_cent_is_a_mismatch() {
    let outcome = reconcile_products(
        &catalog(),
        &[LineItem::new("Pizza grande Calabresa", Decimal::new(50_011, 3))],
    );
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.contribution, money(50_00));
}

#[test]
fn gateway_failure_is_reported_as_not_found() {
    let outcome = reconcile_products(
        &UnavailableCatalog::new("timeout"),
        &[LineItem::new("Pizza grande Calabresa", money(50_00))],
    );
    assert_eq!(
        outcome.errors,
        vec!["Produto 'Pizza grande Calabresa' não encontrado no cardápio".to_string()]
    );
    assert_eq!(outcome.contribution, Decimal::ZERO);
}

// -----------------------------------------------------------------------
// reconcile_delivery_fee
// -----------------------------------------------------------------------

#[test]
fn missing_neighborhood_short_circuits_lookup() {
    let gateway = CountingGateway {
        inner: catalog(),
        neighborhood_lookups: Cell::new(0),
    };
    for neighborhood in [None, Some(""), Some("   ")] {
        let outcome = reconcile_delivery_fee(&gateway, neighborhood, money(3_00));
        assert_eq!(
            outcome.errors,
            vec!["Bairro não informado para entrega".to_string()]
        );
        assert_eq!(outcome.contribution, Decimal::ZERO);
    }
    assert_eq!(gateway.neighborhood_lookups.get(), 0);
}

#[test]
fn unknown_neighborhood_contributes_nothing() {
    let outcome = reconcile_delivery_fee(&catalog(), Some("Jardim Goiás"), money(5_00));
    assert_eq!(
        outcome.errors,
        vec!["Bairro 'Jardim Goiás' não encontrado ou indisponível".to_string()]
    );
    assert!(outcome.corrections.is_empty());
    assert_eq!(outcome.contribution, Decimal::ZERO);
}

#[test]
fn wrong_fee_is_corrected_to_catalog_fee() {
    let outcome = reconcile_delivery_fee(&catalog(), Some("vila cristina"), money(5_00));
    assert_eq!(
        outcome.errors,
        vec![
            "Taxa de entrega incorreta para 'vila cristina': informada R$ 5.00, correta R$ 3.00"
                .to_string()
        ]
    );
    assert_eq!(
        outcome.corrections,
        vec![Correction::delivery_fee(
            "vila cristina",
            money(5_00),
            money(3_00)
        )]
    );
    assert_eq!(outcome.contribution, money(3_00));
}

#[test]
fn matching_fee_contributes_informed_fee() {
    let outcome = reconcile_delivery_fee(&catalog(), Some("Vila Cristina"), money(3_00));
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.contribution, money(3_00));
}

// -----------------------------------------------------------------------
// reconcile_total
// -----------------------------------------------------------------------

#[test]
fn total_within_tolerance_is_silent() {
    assert!(reconcile_total(money(80_00), money(80_00)).is_none());
    assert!(reconcile_total(money(80_01), money(80_00)).is_none());
}

#[test]
fn total_mismatch_reports_error_and_correction() {
    let discrepancy = reconcile_total(money(85_00), money(80_00)).expect("mismatch");
    assert_eq!(
        discrepancy.error,
        "Valor total incorreto: informado R$ 85.00, calculado R$ 80.00"
    );
    assert_eq!(discrepancy.correction.delta(), money(-5_00));
}

// -----------------------------------------------------------------------
// validate_order
// -----------------------------------------------------------------------

#[test]
fn valid_delivery_order() {
    let order = delivery_order(
        vec![
            LineItem::new("Pizza grande Calabresa Acebolada", money(50_00)),
            LineItem::new("Pizza pequena Mussarela", money(27_00)),
        ],
        Some("Vila Cristina"),
        3_00,
        80_00,
    );
    let report = validate_order(&catalog(), &order);
    assert!(report.is_valid);
    assert_eq!(report.computed_total, money(80_00));
    assert_eq!(report.informed_total, money(80_00));
    assert!(report.errors.is_empty());
    assert!(report.corrections.is_empty());
    assert_eq!(report.summary, SUCCESS_SUMMARY);
}

#[test]
fn price_error_propagates_to_total() {
    let order = delivery_order(
        vec![
            LineItem::new("Pizza grande Calabresa Acebolada", money(55_00)),
            LineItem::new("Pizza pequena Mussarela", money(27_00)),
        ],
        Some("Vila Cristina"),
        3_00,
        85_00,
    );
    let report = validate_order(&catalog(), &order);
    assert!(!report.is_valid);
    assert_eq!(report.computed_total, money(80_00));
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].starts_with("Preço incorreto"));
    assert!(report.errors[1].starts_with("Valor total incorreto"));
    assert!(matches!(report.corrections[0], Correction::ProductPrice { .. }));
    assert!(matches!(report.corrections[1], Correction::Total { .. }));
    assert!(report.summary.contains("- Valor total correto: R$ 80.00"));
}

#[test]
fn missing_neighborhood_with_reconciling_total() {
    let order = delivery_order(
        vec![LineItem::new("Pizza grande Calabresa", money(50_00))],
        None,
        3_00,
        50_00,
    );
    let report = validate_order(&catalog(), &order);
    assert_eq!(
        report.errors,
        vec!["Bairro não informado para entrega".to_string()]
    );
    assert_eq!(report.computed_total, money(50_00));
    assert!(!report.is_valid);
}

#[test]
fn errors_are_ordered_products_fee_total() {
    let order = delivery_order(
        vec![LineItem::new("Calzone", money(30_00))],
        Some("Centro"),
        4_00,
        34_00,
    );
    let report = validate_order(&catalog(), &order);
    assert_eq!(
        report.errors,
        vec![
            "Produto 'Calzone' não encontrado no cardápio".to_string(),
            "Bairro 'Centro' não encontrado ou indisponível".to_string(),
            "Valor total incorreto: informado R$ 34.00, calculado R$ 0.00".to_string(),
        ]
    );
    assert_eq!(report.corrections.len(), 1);
}

#[test]
fn pickup_skips_fee_check() {
    let gateway = CountingGateway {
        inner: catalog(),
        neighborhood_lookups: Cell::new(0),
    };
    let order = OrderRecord {
        items: vec![LineItem::new("Pizza grande Calabresa", money(50_00))],
        neighborhood: Some("Nowhere".to_string()),
        delivery_fee: money(9_00),
        total: money(50_00),
        delivery_type: DeliveryType::Pickup,
        ..OrderRecord::default()
    };
    let report = validate_order(&gateway, &order);
    assert!(report.is_valid, "{:?}", report.errors);
    assert_eq!(gateway.neighborhood_lookups.get(), 0);
}

#[test]
fn empty_pickup_order_only_checks_total() {
    let zero = OrderRecord::default();
    let report = validate_order(&catalog(), &zero);
    assert!(report.is_valid);
    assert_eq!(report.computed_total, Decimal::ZERO);

    let nonzero = OrderRecord {
        total: money(10_00),
        ..OrderRecord::default()
    };
    let report = validate_order(&catalog(), &nonzero);
    assert_eq!(report.computed_total, Decimal::ZERO);
    assert_eq!(
        report.errors,
        vec!["Valor total incorreto: informado R$ 10.00, calculado R$ 0.00".to_string()]
    );
}

#[test]
fn validity_matches_empty_errors() {
    let orders = [
        OrderRecord::default(),
        delivery_order(vec![], None, 0, 0),
        delivery_order(
            vec![LineItem::new("Pizza grande Calabresa", money(50_00))],
            Some("Vila Cristina"),
            3_00,
            53_00,
        ),
        delivery_order(
            vec![LineItem::new("Pizza grande Calabresa", money(40_00))],
            Some("Vila Cristina"),
            3_00,
            43_00,
        ),
    ];
    for order in &orders {
        let report = validate_order(&catalog(), order);
        assert_eq!(report.is_valid, report.errors.is_empty());
    }
}

#[test]
fn unavailable_catalog_still_returns_report() {
    let order = delivery_order(
        vec![LineItem::new("Pizza grande Calabresa", money(50_00))],
        Some("Vila Cristina"),
        3_00,
        53_00,
    );
    let report = validate_order(&UnavailableCatalog::new("down"), &order);
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 3);
    assert_eq!(report.computed_total, Decimal::ZERO);
}
