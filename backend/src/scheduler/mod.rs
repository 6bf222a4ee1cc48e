//! Send-time scheduling core.
//!
//! ```text
//! message ──► queue selection ──► fixed-point proposal loop ──► commit
//!                 │                       │                       │
//!                 ▼                       ▼                       ▼
//!         RecipientRegistry       ConstraintQueue::propose   every selected
//!       (queue pair, stored       over IntervalOrderedSet    ConstraintQueue
//!        after first commit)
//! ```
//!
//! The plan is read back from the global queue, which every message joins.

mod interval_set;
mod orchestrator;
mod queue;
mod registry;

pub use interval_set::IntervalOrderedSet;
pub use orchestrator::ScheduleOrchestrator;
pub use queue::{ConstraintQueue, QueueKind};
pub use registry::{RecipientQueues, RecipientRegistry};
