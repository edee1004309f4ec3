//! HTTP front door subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, body limit, trace layer)
//!     → GET  /         render current log as HTML
//!     → POST /clear    reset the log, JSON ack
//!     → ALL  /webhook  normalize → record → JSON ack
//!     → anything else  404 with a structured JSON payload
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
