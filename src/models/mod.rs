pub mod capture;
pub mod competency;
pub mod log_entry;
pub mod session;

pub use capture::{Capture, CaptureType};
pub use competency::Competency;
pub use log_entry::LogEntry;
pub use session::{Session, SessionStatus};
