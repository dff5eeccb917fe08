use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::coordinators::with_timeout;
use crate::errors::internal::LoanError;
use crate::errors::InternalError;
use crate::providers::Clock;
use crate::stores::LoanStore;
use crate::types::db::{audit_entry, loan};
use crate::types::internal::audit::EventType;
use crate::types::internal::loan::{Decision, LoanApplication, LoanPage, LoanQuery};

/// Loan ledger: application, owner lookup, admin review and deletion
///
/// ```text
/// Pending → Approved | Rejected   (terminal)
/// any     → Deleted
/// ```
pub struct LoanCoordinator {
    loan_store: Arc<LoanStore>,
    audit_logger: Arc<AuditLogger>,
    clock: Arc<dyn Clock>,
    interest_rate: f64,
    timeout: Duration,
}

impl LoanCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            loan_store: app_data.loan_store.clone(),
            audit_logger: app_data.audit_logger.clone(),
            clock: app_data.clock.clone(),
            interest_rate: app_data.settings.interest_rate(),
            timeout: app_data.settings.request_timeout(),
        }
    }

    /// Record a new pending loan for `user_id` at the configured interest rate
    pub async fn apply(&self, application: LoanApplication, user_id: &str) -> Result<loan::Model, InternalError> {
        with_timeout(self.timeout, "apply_loan", async {
            if !application.amount.is_finite() || application.amount <= 0.0 {
                return Err(InternalError::validation("amount", "must be a positive number"));
            }
            if application.duration <= 0 {
                return Err(InternalError::validation("duration", "must be a positive number of months"));
            }

            let now = self.clock.now().timestamp();
            let loan = self
                .loan_store
                .insert(LoanStore::new_pending(
                    Uuid::new_v4().to_string(),
                    user_id,
                    application.amount,
                    self.interest_rate,
                    application.duration,
                    now,
                ))
                .await?;
            tracing::info!(loan_id = %loan.id, user_id = %user_id, "Loan application recorded");

            self.audit_logger
                .record_committed(EventType::LoanApplied, user_id)
                .await?;

            Ok(loan)
        })
        .await
    }

    /// A loan visible to its owner only
    ///
    /// # Errors
    /// `LoanError::NotFound` both when the loan is missing and when someone else owns it.
    pub async fn details(&self, loan_id: &str, user_id: &str) -> Result<loan::Model, InternalError> {
        with_timeout(self.timeout, "loan_details", async {
            self.loan_store
                .find_owned(loan_id, user_id)
                .await?
                .ok_or_else(|| LoanError::NotFound(loan_id.to_string()).into())
        })
        .await
    }

    /// One page of loans for administrators
    ///
    /// Status and order are validated before the store is touched. `total` counts
    /// every loan matching the status filter.
    pub async fn view_all(&self, page: i64, status: &str, order: &str) -> Result<LoanPage, InternalError> {
        let query = LoanQuery::parse(page, status, order)?;

        with_timeout(self.timeout, "view_all_loans", async {
            let loans = self.loan_store.list(&query).await?;
            let total = self.loan_store.count(query.status).await?;
            Ok(LoanPage {
                loans,
                total,
                page: query.page,
            })
        })
        .await
    }

    /// Approve or reject a pending loan
    ///
    /// The store update only matches pending rows, so of two concurrent decisions
    /// exactly one wins; the loser sees `AlreadyProcessed` and writes no audit entry.
    pub async fn approve_reject(
        &self,
        loan_id: &str,
        decision: Decision,
        actor_id: &str,
    ) -> Result<loan::Model, InternalError> {
        with_timeout(self.timeout, "approve_reject_loan", async {
            let target = decision.target_status();
            let changed = self
                .loan_store
                .transition_pending(loan_id, target, self.clock.now().timestamp())
                .await?;

            if changed == 0 {
                return match self.loan_store.find_by_id(loan_id).await? {
                    None => Err(LoanError::NotFound(loan_id.to_string()).into()),
                    Some(existing) => {
                        tracing::warn!(loan_id = %loan_id, status = %existing.status, "Loan already processed");
                        Err(LoanError::AlreadyProcessed {
                            loan_id: loan_id.to_string(),
                            status: existing.status,
                        }
                        .into())
                    }
                };
            }
            tracing::info!(loan_id = %loan_id, actor_id = %actor_id, status = %target, "Loan decided");

            let event = match decision {
                Decision::Approve => EventType::LoanApproved,
                Decision::Reject => EventType::LoanRejected,
            };
            self.audit_logger.record_committed(event, actor_id).await?;

            self.loan_store
                .find_by_id(loan_id)
                .await?
                .ok_or_else(|| LoanError::NotFound(loan_id.to_string()).into())
        })
        .await
    }

    /// Delete a loan in any state; deleting a missing loan is a silent success
    pub async fn delete(&self, loan_id: &str, actor_id: &str) -> Result<(), InternalError> {
        with_timeout(self.timeout, "delete_loan", async {
            if self.loan_store.delete(loan_id).await? == 0 {
                tracing::debug!(loan_id = %loan_id, "Delete of missing loan ignored");
                return Ok(());
            }
            tracing::info!(loan_id = %loan_id, actor_id = %actor_id, "Loan deleted");

            self.audit_logger
                .record_committed(EventType::LoanDeleted, actor_id)
                .await
        })
        .await
    }

    /// The whole audit trail, oldest first
    pub async fn view_logs(&self) -> Result<Vec<audit_entry::Model>, InternalError> {
        with_timeout(self.timeout, "view_logs", self.audit_logger.entries()).await
    }
}
