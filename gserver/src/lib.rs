//! HTTP surface for the gossip chat service.
//!
//! The router is built from an [`AppState`] holding a [`gossip::ChatService`],
//! so tests can drive it with any provider and an isolated session store.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod shutdown;

pub use config::{ConfigError, LogFormat, ServerConfig, load_dotenv};
pub use error::ApiError;
pub use logging::init_logging;
pub use routes::{AppState, build_router};
pub use shutdown::{serve_with_shutdown, shutdown_signal};
