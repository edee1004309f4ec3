//! Inspection page rendering subsystem.
//!
//! # Data Flow
//! ```text
//! RequestLog::read_all() (newest-first view)
//!     → page.rs (pure function → HTML document string)
//!     → served as text/html by the front door
//! ```
//!
//! # Design Decisions
//! - Rendering is a pure function; no store access, no side effects
//! - Every interpolated value is HTML-escaped, hostile payloads included
//! - Structured values (headers, query, JSON bodies) are pretty-printed

pub mod page;

pub use page::render_page;
