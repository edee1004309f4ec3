//! Request capture subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (/webhook)
//!     → snapshot.rs (normalize: method, url, headers, query, body, source IP)
//!     → store.rs (prepend, evict past capacity)
//!     → read_all() for rendering (newest-first view)
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable once captured; the store hands out Arc handles
//! - Body parsing never fails: JSON, then form-urlencoded, then raw text
//! - Eviction is strict FIFO-by-age against a fixed capacity bound

pub mod snapshot;
pub mod store;

pub use snapshot::{RecordedBody, RequestSnapshot};
pub use store::RequestLog;
