use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Failure raised by a catalog backend while answering a lookup.
///
/// The validator never reports these to the customer: they are logged and
/// the lookup is treated as "not found".
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog backend error: {0}")]
    Backend(String),
}
