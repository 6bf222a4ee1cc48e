//! # Antiban
//!
//! Send-time scheduler that keeps automated and bulk messaging under
//! anti-spam thresholds.
//!
//! Every message gets the earliest send time at or after the one it asked for
//! that respects three spacing rules at once:
//!
//! - **Global**: minimum gap between any two sends (default 10 s)
//! - **Recipient**: minimum gap between two sends to one recipient (default 1 min)
//! - **Recipient broadcast**: minimum gap between two broadcast-class sends to
//!   one recipient (default 24 h)
//!
//! ## Architecture
//!
//! - [`scheduler`]: interval-tolerant ordered set, constraint queues and the
//!   fixed-point orchestrator
//! - [`models`]: messages, scheduled entries and plan records
//! - [`config`]: interval configuration from TOML and environment
//! - [`services`]: thread-safe sessions and the in-memory session store
//! - [`http`]: Axum-based REST API over sessions (feature `http-server`)
//!
//! ## Example
//!
//! ```rust
//! use antiban::{Message, ScheduleOrchestrator};
//! use chrono::{TimeZone, Utc};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let mut orchestrator = ScheduleOrchestrator::default();
//! orchestrator.push(Message::broadcast("promo-1", "+15550100", t0)).unwrap();
//! orchestrator.push(Message::normal("reply-1", "+15550100", t0)).unwrap();
//!
//! for entry in orchestrator.get_plan() {
//!     println!("{} -> {}", entry.message_id, entry.scheduled_at);
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use config::SchedulerConfig;
pub use error::{Result, SchedulerError};
pub use models::{Message, MessageId, PlanEntry, Priority, RecipientKey, ScheduledEntry};
pub use scheduler::{ConstraintQueue, IntervalOrderedSet, QueueKind, ScheduleOrchestrator};
pub use services::{SessionId, SessionStore, SharedSession};
