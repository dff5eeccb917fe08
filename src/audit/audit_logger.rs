use std::sync::Arc;

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::providers::clock::Clock;
use crate::stores::audit_store::AuditStore;
use crate::types::db::audit_entry;
use crate::types::internal::audit::{AuditEvent, EventType};

/// Writes audit entries at the point of action
///
/// The audit database is separate from the primary one, so an entry can fail
/// after the mutation it describes has committed. Callers pick the failure mode:
/// `record_committed` surfaces it as `AuditError::NotRecorded`, `record_best_effort`
/// only logs it.
pub struct AuditLogger {
    audit_store: Arc<AuditStore>,
    clock: Arc<dyn Clock>,
}

impl AuditLogger {
    pub fn new(audit_store: Arc<AuditStore>, clock: Arc<dyn Clock>) -> Self {
        Self { audit_store, clock }
    }

    pub async fn record(&self, event_type: EventType, user_id: &str) -> Result<(), InternalError> {
        let event = AuditEvent::new(event_type, user_id);
        self.audit_store
            .write_event(&event, self.clock.now().timestamp())
            .await?;
        tracing::debug!(event_type = %event_type, user_id = %user_id, "Audit entry recorded");
        Ok(())
    }

    /// Record an entry for a mutation that has already committed
    ///
    /// # Errors
    /// `AuditError::NotRecorded`: the effect stands but its entry is missing.
    pub async fn record_committed(&self, event_type: EventType, user_id: &str) -> Result<(), InternalError> {
        self.record(event_type, user_id).await.map_err(|err| {
            tracing::error!(
                event_type = %event_type,
                user_id = %user_id,
                "Mutation committed but audit entry was not written: {}",
                err
            );
            AuditError::NotRecorded {
                activity: event_type.activity().to_string(),
                reason: err.to_string(),
            }
            .into()
        })
    }

    /// Record an entry whose loss must not change the caller's outcome
    pub async fn record_best_effort(&self, event_type: EventType, user_id: &str) {
        if let Err(audit_err) = self.record(event_type, user_id).await {
            tracing::error!(
                event_type = %event_type,
                user_id = %user_id,
                "Failed to log audit entry: {:?}",
                audit_err
            );
        }
    }

    pub async fn entries(&self) -> Result<Vec<audit_entry::Model>, InternalError> {
        self.audit_store.list_entries().await
    }

    pub async fn entries_for_user(&self, user_id: &str) -> Result<Vec<audit_entry::Model>, InternalError> {
        self.audit_store.list_for_user(user_id).await
    }
}
