pub mod models;
pub mod services;

// Re-export the model types and services for external use
pub use models::*;
pub use services::*;

// Specifically re-export the scheduling types most callers need
pub use services::schedule::WeeklyAvailability;
pub use services::editor::{AvailabilityEditor, EditorState, SlotDraft};
pub use services::sync::{ScheduleOwner, ScheduleSyncService};
