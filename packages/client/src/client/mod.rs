//! HTTP client
//!
//! The client type, its builder and its statistics.

pub mod configuration;
pub mod core;
pub mod stats;

pub use configuration::HttpClientBuilder;
pub use self::core::HttpClient;
pub use stats::{ClientStats, ClientStatsSnapshot};
