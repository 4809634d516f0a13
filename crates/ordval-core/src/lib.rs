pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod money;
pub mod order;
pub mod report;
pub mod text;
pub mod validate;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    Availability, CatalogAdditional, CatalogGateway, CatalogNeighborhood, CatalogProduct,
    CatalogSnapshot, UnavailableCatalog,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, GatewayError};
pub use order::{DeliveryType, LineItem, OrderRecord};
pub use report::{Correction, ValidationReport};
pub use validate::validate_order;
