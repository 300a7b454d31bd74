use thiserror::Error;

impl From<sqlx::Error> for DashboardError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreReadError(format!("Database error: {}", err))
    }
}

impl From<config::ConfigError> for DashboardError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Gateway-side failure reading the external event store.
    #[error("Store read error: {0}")]
    StoreReadError(String),

    /// Presenter-side failure reaching the gateway.
    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),
}

impl DashboardError {
    pub fn is_store_read(&self) -> bool {
        matches!(self, Self::StoreReadError(_))
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::FetchError(_))
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
