//! Visitor logging
//!
//! Records page visits into a bounded, origin-scoped log, skips repeat visits
//! to the same URL within a session, and keeps aggregate stats alongside the
//! log. The stores are injected, so the same logger runs against SQLite,
//! PostgreSQL or memory.

pub mod export;
pub mod ids;
pub mod logger;
pub mod models;
pub mod overlay;
pub mod snapshot;
pub mod stats;

pub use export::{export_file_name, write_export, ExportDocument};
pub use logger::{VisitOutcome, VisitorLogger};
pub use models::{LogEntry, LogStore, PageContext, Stats, VisitSnapshot};
pub use overlay::display_stats;
pub use snapshot::{capture, capture_at, origin_of};

/// Durable key holding the visit log
pub const LOGS_KEY: &str = "visitorLogs";

/// Durable key holding the derived stats
pub const STATS_KEY: &str = "visitorStats";

/// Session key holding the session id
pub const SESSION_ID_KEY: &str = "sessionId";

/// Number of visits kept unless configured otherwise
pub const DEFAULT_MAX_ENTRIES: usize = 100;
