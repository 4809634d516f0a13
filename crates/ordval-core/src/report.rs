//! Validation output: structured corrections and the customer-facing summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{brl, round_cents};

pub const SUCCESS_SUMMARY: &str = "✓ Pedido validado com sucesso! Todos os valores estão corretos.";

/// A detected informed-vs-correct discrepancy.
///
/// Serialized untagged; downstream consumers tell the variants apart by
/// their keys. `diferenca` is always `correct - informed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Correction {
    ProductPrice {
        #[serde(rename = "produto")]
        item: String,
        #[serde(rename = "preco_informado", with = "rust_decimal::serde::float")]
        informed: Decimal,
        #[serde(rename = "preco_correto", with = "rust_decimal::serde::float")]
        correct: Decimal,
        #[serde(rename = "diferenca", with = "rust_decimal::serde::float")]
        delta: Decimal,
    },
    DeliveryFee {
        #[serde(rename = "bairro")]
        neighborhood: String,
        #[serde(rename = "taxa_informada", with = "rust_decimal::serde::float")]
        informed: Decimal,
        #[serde(rename = "taxa_correta", with = "rust_decimal::serde::float")]
        correct: Decimal,
        #[serde(rename = "diferenca", with = "rust_decimal::serde::float")]
        delta: Decimal,
    },
    Total {
        #[serde(rename = "valor_informado", with = "rust_decimal::serde::float")]
        informed: Decimal,
        #[serde(rename = "valor_calculado", with = "rust_decimal::serde::float")]
        computed: Decimal,
        #[serde(rename = "diferenca", with = "rust_decimal::serde::float")]
        delta: Decimal,
    },
}

impl Correction {
    #[must_use]
    pub fn product_price(item: impl Into<String>, informed: Decimal, correct: Decimal) -> Self {
        Correction::ProductPrice {
            item: item.into(),
            informed,
            correct,
            delta: correct - informed,
        }
    }

    #[must_use]
    pub fn delivery_fee(
        neighborhood: impl Into<String>,
        informed: Decimal,
        correct: Decimal,
    ) -> Self {
        Correction::DeliveryFee {
            neighborhood: neighborhood.into(),
            informed,
            correct,
            delta: correct - informed,
        }
    }

    #[must_use]
    pub fn total(informed: Decimal, computed: Decimal) -> Self {
        Correction::Total {
            informed,
            computed,
            delta: computed - informed,
        }
    }

    #[must_use]
    pub fn delta(&self) -> Decimal {
        match self {
            Correction::ProductPrice { delta, .. }
            | Correction::DeliveryFee { delta, .. }
            | Correction::Total { delta, .. } => *delta,
        }
    }

    /// The line listed under "Correções necessárias" (corrected value only).
    #[must_use]
    pub fn summary_line(&self) -> String {
        match self {
            Correction::ProductPrice { item, correct, .. } => {
                format!("- {item}: {}", brl(*correct))
            }
            Correction::DeliveryFee {
                neighborhood,
                correct,
                ..
            } => format!("- Taxa para {neighborhood}: {}", brl(*correct)),
            Correction::Total { computed, .. } => {
                format!("- Valor total correto: {}", brl(*computed))
            }
        }
    }
}

/// Result of validating one order. `valido` holds exactly when `erros` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(rename = "valido")]
    pub is_valid: bool,
    #[serde(rename = "valor_total_calculado", with = "rust_decimal::serde::float")]
    pub computed_total: Decimal,
    #[serde(rename = "valor_total_informado", with = "rust_decimal::serde::float")]
    pub informed_total: Decimal,
    #[serde(rename = "erros")]
    pub errors: Vec<String>,
    #[serde(rename = "correcoes")]
    pub corrections: Vec<Correction>,
    #[serde(rename = "resumo")]
    pub summary: String,
}

impl ValidationReport {
    /// Builds a report, deriving validity and the summary from `errors`.
    #[must_use]
    pub fn new(
        computed_total: Decimal,
        informed_total: Decimal,
        errors: Vec<String>,
        corrections: Vec<Correction>,
    ) -> Self {
        let is_valid = errors.is_empty();
        let summary = build_summary(&errors, &corrections);
        Self {
            is_valid,
            computed_total,
            informed_total,
            errors,
            corrections,
            summary,
        }
    }

    /// `computed - informed`, rounded to cents.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        round_cents(self.computed_total - self.informed_total)
    }
}

/// Renders the customer-facing summary: the success sentence when there are
/// no errors, otherwise a numbered error list followed by the corrected values.
#[must_use]
pub fn build_summary(errors: &[String], corrections: &[Correction]) -> String {
    if errors.is_empty() {
        return SUCCESS_SUMMARY.to_string();
    }

    let mut summary = String::from("✗ Pedido contém erros:\n\n");
    for (i, error) in errors.iter().enumerate() {
        summary.push_str(&format!("{}. {error}\n", i + 1));
    }

    if !corrections.is_empty() {
        summary.push_str("\nCorreções necessárias:\n");
        for correction in corrections {
            summary.push_str(&correction.summary_line());
            summary.push('\n');
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_errors_yield_success_sentence() {
        assert_eq!(build_summary(&[], &[]), SUCCESS_SUMMARY);
    }

    #[test]
    fn summary_lists_errors_then_corrections() {
        let errors = vec![
            "Preço incorreto para 'Pizza grande Calabresa': informado R$ 55.00, correto R$ 50.00"
                .to_string(),
            "Taxa de entrega incorreta para 'Vila Cristina': informada R$ 5.00, correta R$ 3.00"
                .to_string(),
            "Valor total incorreto: informado R$ 90.00, calculado R$ 80.00".to_string(),
        ];
        let corrections = vec![
            Correction::product_price(
                "Pizza grande Calabresa",
                Decimal::new(55, 0),
                Decimal::new(50, 0),
            ),
            Correction::delivery_fee("Vila Cristina", Decimal::new(5, 0), Decimal::new(3, 0)),
            Correction::total(Decimal::new(90, 0), Decimal::new(80, 0)),
        ];

        let expected = "✗ Pedido contém erros:\n\n\
            1. Preço incorreto para 'Pizza grande Calabresa': \
            informado R$ 55.00, correto R$ 50.00\n\
            2. Taxa de entrega incorreta para 'Vila Cristina': informada R$ 5.00, correta R$ 3.00\n\
            3. Valor total incorreto: informado R$ 90.00, calculado R$ 80.00\n\
            \nCorreções necessárias:\n\
            - Pizza grande Calabresa: R$ 50.00\n\
            - Taxa para Vila Cristina: R$ 3.00\n\
            - Valor total correto: R$ 80.00\n";
        assert_eq!(build_summary(&errors, &corrections), expected);
    }

    #[test]
    fn summary_omits_corrections_section_when_none() {
        let errors = vec!["Bairro não informado para entrega".to_string()];
        assert_eq!(
            build_summary(&errors, &[]),
            "✗ Pedido contém erros:\n\n1. Bairro não informado para entrega\n"
        );
    }

    #[test]
    fn corrections_serialize_in_their_three_shapes() {
        let product = serde_json::to_value(Correction::product_price(
            "Pizza",
            Decimal::new(55, 0),
            Decimal::new(50, 0),
        ))
        .expect("serialize");
        assert_eq!(product["produto"], "Pizza");
        assert_eq!(product["preco_informado"], 55.0);
        assert_eq!(product["preco_correto"], 50.0);
        assert_eq!(product["diferenca"], -5.0);

        let fee = serde_json::to_value(Correction::delivery_fee(
            "Vila Cristina",
            Decimal::new(5, 0),
            Decimal::new(3, 0),
        ))
        .expect("serialize");
        assert_eq!(fee["bairro"], "Vila Cristina");
        assert_eq!(fee["taxa_correta"], 3.0);
        assert_eq!(fee["diferenca"], -2.0);

        let total =
            serde_json::to_value(Correction::total(Decimal::new(90, 0), Decimal::new(80, 0)))
                .expect("serialize");
        assert_eq!(total["valor_calculado"], 80.0);
        assert_eq!(total["diferenca"], -10.0);
        assert!(total.get("produto").is_none());
    }

    #[test]
    fn correction_shapes_deserialize_back_to_their_variant() {
        let fee: Correction = serde_json::from_value(serde_json::json!({
            "bairro": "Centro",
            "taxa_informada": 2.0,
            "taxa_correta": 4.0,
            "diferenca": 2.0
        }))
        .expect("deserialize");
        assert!(matches!(fee, Correction::DeliveryFee { .. }));
        assert_eq!(fee.delta(), Decimal::new(2, 0));
    }

    #[test]
    fn report_validity_follows_errors() {
        let ok = ValidationReport::new(Decimal::new(80, 0), Decimal::new(80, 0), vec![], vec![]);
        assert!(ok.is_valid);
        assert_eq!(ok.summary, SUCCESS_SUMMARY);

        let bad = ValidationReport::new(
            Decimal::new(80, 0),
            Decimal::new(85, 0),
            vec!["Valor total incorreto: informado R$ 85.00, calculado R$ 80.00".to_string()],
            vec![Correction::total(Decimal::new(85, 0), Decimal::new(80, 0))],
        );
        assert!(!bad.is_valid);
        assert_eq!(bad.difference(), Decimal::new(-5, 0));
    }

    #[test]
    fn report_serializes_contract_field_names() {
        let report =
            ValidationReport::new(Decimal::new(8000, 2), Decimal::new(8000, 2), vec![], vec![]);
        let value = serde_json::to_value(&report).expect("serialize");
        for key in [
            "valido",
            "valor_total_calculado",
            "valor_total_informado",
            "erros",
            "correcoes",
            "resumo",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["valor_total_calculado"], 80.0);
    }
}
