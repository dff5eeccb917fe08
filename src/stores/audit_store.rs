use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::types::db::audit_entry::{self, Entity as AuditEntry};
use crate::types::internal::audit::AuditEvent;

/// Append-only storage for the audit trail
///
/// There is deliberately no update or delete.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one entry
    ///
    /// # Errors
    /// `AuditError::LogWriteFailed` when the insert fails.
    pub async fn write_event(&self, event: &AuditEvent, created_at: i64) -> Result<audit_entry::Model, InternalError> {
        if event.user_id.is_empty() {
            return Err(AuditError::LogWriteFailed("audit entry requires a user id".to_string()).into());
        }

        let entry = audit_entry::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(event.user_id.clone()),
            event_type: Set(event.event_type.as_str().to_string()),
            activity: Set(event.event_type.activity().to_string()),
            created_at: Set(created_at),
        };

        entry
            .insert(&self.db)
            .await
            .map_err(|e| AuditError::LogWriteFailed(format!("{}: {}", event.event_type, e)).into())
    }

    /// The full trail in insertion order
    pub async fn list_entries(&self) -> Result<Vec<audit_entry::Model>, InternalError> {
        AuditEntry::find()
            .order_by_asc(audit_entry::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_audit_entries", e))
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<audit_entry::Model>, InternalError> {
        AuditEntry::find()
            .filter(audit_entry::Column::UserId.eq(user_id))
            .order_by_asc(audit_entry::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_audit_entries_for_user", e))
    }
}
