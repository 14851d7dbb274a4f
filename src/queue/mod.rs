//! # Triage Queue
//!
//! The queue manager and the pure calculations it runs after every mutation.

pub mod clock;
pub mod manager;
pub mod threshold;
pub mod wait_time;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{QueueManager, QueueSnapshot};
pub use threshold::{StaffingAssessment, ThresholdPolicy};
pub use wait_time::{WaitTimeEstimate, WaitTimeEstimator};
