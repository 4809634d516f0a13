//! Read-only catalog lookups used by the validator.
//!
//! [`CatalogGateway`] is the only way the validator touches the catalog.
//! [`CatalogSnapshot`] answers lookups from in-memory tables (loaded from
//! Postgres by `ordval-db`, or from a YAML file by the CLI).

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GatewayError};
use crate::text::normalize;

/// Availability status of a catalog record. Only available records match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    #[serde(rename = "disponivel")]
    Available,
    #[serde(rename = "indisponivel", other)]
    Unavailable,
}

impl Availability {
    /// Maps a stored status string; anything other than `disponivel`
    /// (accent- and case-insensitive) is unavailable.
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        if normalize(status) == "disponivel" {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Available => "disponivel",
            Availability::Unavailable => "indisponivel",
        }
    }

    #[must_use]
    pub fn is_available(self) -> bool {
        self == Availability::Available
    }
}

/// A sellable product, optionally sized (e.g. `"Pizza Calabresa"` / `"grande"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub name: String,
    /// `None` or empty means the product is sold in a single size and
    /// matches any requested size.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub status: Availability,
}

/// Add-ons (extra toppings, stuffed crusts) share the product shape but live
/// in their own table.
pub type CatalogAdditional = CatalogProduct;

/// A delivery area and its flat delivery fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogNeighborhood {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    #[serde(default)]
    pub status: Availability,
}

/// Read-only catalog lookups.
///
/// Names and sizes are compared after [`normalize`] on both sides, and only
/// available records are considered.
pub trait CatalogGateway {
    /// Finds a product by name. A record with a non-empty size only matches
    /// when `size` folds to the same value.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the backing store cannot answer.
    fn find_product(
        &self,
        name: &str,
        size: Option<&str>,
    ) -> Result<Option<CatalogProduct>, GatewayError>;

    /// Same matching rules as [`CatalogGateway::find_product`], over additionals.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the backing store cannot answer.
    fn find_additional(
        &self,
        name: &str,
        size: Option<&str>,
    ) -> Result<Option<CatalogAdditional>, GatewayError>;

    /// Finds a neighborhood by exact folded name.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the backing store cannot answer.
    fn find_neighborhood(&self, name: &str) -> Result<Option<CatalogNeighborhood>, GatewayError>;
}

/// In-memory catalog tables, scanned in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
    #[serde(default)]
    pub additionals: Vec<CatalogAdditional>,
    #[serde(default)]
    pub neighborhoods: Vec<CatalogNeighborhood>,
}

impl CatalogSnapshot {
    /// Loads and validates a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or fails validation.
    pub fn from_yaml_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses and validates a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CatalogFileParse`] on malformed YAML or
    /// [`ConfigError::InvalidCatalog`] when a record is unusable.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let snapshot: CatalogSnapshot = serde_yaml::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let priced = self
            .products
            .iter()
            .chain(&self.additionals)
            .map(|p| (p.name.as_str(), p.price))
            .chain(self.neighborhoods.iter().map(|n| (n.name.as_str(), n.fee)));

        for (name, amount) in priced {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidCatalog(
                    "catalog record with empty name".to_string(),
                ));
            }
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(ConfigError::InvalidCatalog(format!(
                    "'{name}' has a negative amount ({amount})"
                )));
            }
        }
        Ok(())
    }
}

fn find_sized<'a>(
    records: &'a [CatalogProduct],
    name: &str,
    size: Option<&str>,
) -> Option<&'a CatalogProduct> {
    let wanted_name = normalize(name);
    let wanted_size = normalize(size.unwrap_or_default());

    records
        .iter()
        .filter(|r| r.status.is_available())
        .find(|r| {
            if normalize(&r.name) != wanted_name {
                return false;
            }
            let record_size = normalize(r.size.as_deref().unwrap_or_default());
            record_size.is_empty() || record_size == wanted_size
        })
}

impl CatalogGateway for CatalogSnapshot {
    fn find_product(
        &self,
        name: &str,
        size: Option<&str>,
    ) -> Result<Option<CatalogProduct>, GatewayError> {
        Ok(find_sized(&self.products, name, size).cloned())
    }

    fn find_additional(
        &self,
        name: &str,
        size: Option<&str>,
    ) -> Result<Option<CatalogAdditional>, GatewayError> {
        Ok(find_sized(&self.additionals, name, size).cloned())
    }

    fn find_neighborhood(&self, name: &str) -> Result<Option<CatalogNeighborhood>, GatewayError> {
        let wanted = normalize(name);
        Ok(self
            .neighborhoods
            .iter()
            .filter(|n| n.status.is_available())
            .find(|n| normalize(&n.name) == wanted)
            .cloned())
    }
}

/// Gateway standing in for a catalog that could not be loaded; every lookup
/// fails with [`GatewayError::Unavailable`].
#[derive(Debug, Clone)]
pub struct UnavailableCatalog {
    reason: String,
}

impl UnavailableCatalog {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl CatalogGateway for UnavailableCatalog {
    fn find_product(
        &self,
        _name: &str,
        _size: Option<&str>,
    ) -> Result<Option<CatalogProduct>, GatewayError> {
        Err(GatewayError::Unavailable(self.reason.clone()))
    }

    fn find_additional(
        &self,
        _name: &str,
        _size: Option<&str>,
    ) -> Result<Option<CatalogAdditional>, GatewayError> {
        Err(GatewayError::Unavailable(self.reason.clone()))
    }

    fn find_neighborhood(&self, _name: &str) -> Result<Option<CatalogNeighborhood>, GatewayError> {
        Err(GatewayError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
