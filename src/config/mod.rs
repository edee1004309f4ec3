//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → semantic validation
//!     → PORT env / --port flag overrides
//!     → AppConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Every field has a default so the server runs with no config at all
//! - Precedence for the port: CLI flag, then PORT, then file, then 3000
//! - Config is immutable once loaded; no hot reload

pub mod loader;
pub mod schema;

pub use loader::{load_config, resolve_port, ConfigError};
pub use schema::{AppConfig, CaptureConfig, ListenerConfig, ObservabilityConfig};
