//! Notification dispatch pipeline.
//!
//! One trigger message carries one notification id. The dispatcher loads
//! that notification's content, fans out one personalized email per
//! attendee, and writes the completion status back onto the notification
//! row. The queue worker at the edge is the only code that knows where
//! trigger messages come from.

pub mod dispatch;
pub mod repo;
pub mod trigger;
pub mod worker;
