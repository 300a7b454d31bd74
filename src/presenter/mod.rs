//! Presenter
//!
//! Polls the gateway, joins scans with verification outcomes and renders the
//! result.

pub mod client;
pub mod poller;
pub mod render;
pub mod state;

pub use client::GatewayClient;
pub use poller::{PollScope, Poller, PollerConfig, PollerHandle, DEFAULT_POLL_INTERVAL};
pub use render::render_dashboard;
pub use state::DashboardState;
