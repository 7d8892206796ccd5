pub mod machine;
pub mod notify;
pub mod session;
pub mod types;

pub use machine::EnhancementWorkflow;
pub use notify::{MemorySink, Notification, NotificationLevel, NotificationSink, TracingSink};
pub use session::{EditingSession, SessionSnapshot};
pub use types::{ErrorInfo, ErrorKind, Resolution, Ticket, WorkflowError, WorkflowState};
