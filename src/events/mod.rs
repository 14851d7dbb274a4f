pub mod dispatcher;
pub mod publisher;
pub mod recording;
pub mod types;

// Re-export key types for convenience
pub use dispatcher::{AlertDispatcher, DispatchError, DispatchResult, NoopDispatcher};
pub use publisher::BroadcastDispatcher;
pub use recording::RecordingDispatcher;
pub use types::{AlertEvent, PatientAlert, PublishedAlert, StaffingDetails};
