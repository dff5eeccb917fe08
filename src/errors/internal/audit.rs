use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to write audit log: {0}")]
    LogWriteFailed(String),

    /// The primary mutation committed but its audit entry could not be written
    #[error("Operation applied but audit entry '{activity}' was not recorded: {reason}")]
    NotRecorded { activity: String, reason: String },
}
