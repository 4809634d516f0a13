//! Structured order as produced by the extractor.
//!
//! Wire names are the Portuguese keys the extraction prompt asks for
//! (`nome`, `produtos`, `taxa_entrega`, ...). Every field is optional on the
//! wire: a model that omits a value yields an empty field, not a parse error.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::text::normalize;

/// Whether the order is delivered or picked up at the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryType {
    #[serde(rename = "entrega", alias = "delivery")]
    Delivery,
    #[default]
    #[serde(rename = "retirada", alias = "pickup")]
    Pickup,
}

/// One ordered product with the price the customer was quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Raw product name; may embed a size (`"Pizza grande Calabresa"`).
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "preco", default, with = "crate::money::lenient")]
    pub price: Decimal,
    /// Explicit size, when the extractor reports one separately from the name.
    #[serde(rename = "tamanho", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl LineItem {
    #[must_use]
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            size: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "nome", default, deserialize_with = "lenient_text")]
    pub customer_name: Option<String>,
    #[serde(rename = "telefone", default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(rename = "unidade", default, deserialize_with = "lenient_text")]
    pub store_unit: Option<String>,
    #[serde(rename = "produtos", default, deserialize_with = "null_as_empty")]
    pub items: Vec<LineItem>,
    #[serde(rename = "endereco", default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(rename = "bairro", default, deserialize_with = "lenient_text")]
    pub neighborhood: Option<String>,
    #[serde(rename = "taxa_entrega", default, with = "crate::money::lenient")]
    pub delivery_fee: Decimal,
    #[serde(rename = "valor_total", default, with = "crate::money::lenient")]
    pub total: Decimal,
    #[serde(rename = "forma_pagamento", default, deserialize_with = "lenient_text")]
    pub payment_method: Option<String>,
    /// Amount the customer pays with; free text such as `"sem troco"` reads as `None`.
    #[serde(
        rename = "troco",
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize",
        deserialize_with = "lenient_change"
    )]
    pub change: Option<Decimal>,
    #[serde(rename = "observacoes", default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    /// Only a folded `entrega`/`delivery` is a delivery; anything else is pickup.
    #[serde(rename = "tipo_entrega", default, deserialize_with = "lenient_delivery_type")]
    pub delivery_type: DeliveryType,
}

impl OrderRecord {
    #[must_use]
    pub fn is_delivery(&self) -> bool {
        self.delivery_type == DeliveryType::Delivery
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<LineItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any JSON scalar a model may put in a pass-through field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Other(IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Int(n) => Some(n.to_string()),
            Scalar::UInt(n) => Some(n.to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Other(_) => None,
        }
    }
}

/// Strings pass through, numbers and booleans are rendered as text, and
/// anything else (arrays, objects) reads as `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.and_then(Scalar::into_text))
}

fn lenient_change<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let change = match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Int(n)) => Some(Decimal::from(n)),
        Some(Scalar::UInt(n)) => Some(Decimal::from(n)),
        Some(Scalar::Float(f)) => Decimal::try_from(f).ok(),
        Some(Scalar::Text(s)) => Decimal::from_str(s.trim()).ok(),
        Some(Scalar::Bool(_) | Scalar::Other(_)) | None => None,
    };
    Ok(change)
}

fn lenient_delivery_type<'de, D>(deserializer: D) -> Result<DeliveryType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?.and_then(Scalar::into_text);
    let delivery_type = match raw.as_deref().map(normalize).as_deref() {
        Some("entrega" | "delivery") => DeliveryType::Delivery,
        _ => DeliveryType::Pickup,
    };
    Ok(delivery_type)
}
