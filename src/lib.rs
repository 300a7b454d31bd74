pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod matching;
pub mod presenter;
pub mod store;

pub use error::DashboardError;
