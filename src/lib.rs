//! Webhook inspection service library.

pub mod capture;
pub mod config;
pub mod http;
pub mod render;

pub use capture::store::RequestLog;
pub use config::AppConfig;
pub use http::HttpServer;
