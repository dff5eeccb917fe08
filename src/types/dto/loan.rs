use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::{audit_entry, loan};
use crate::types::internal::loan::{LoanApplication, LoanPage};

/// Request model for a loan application
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ApplyLoanRequest {
    /// Principal, must be positive
    pub amount: f64,

    /// Term in months, must be positive
    pub duration: i32,
}

impl From<ApplyLoanRequest> for LoanApplication {
    fn from(req: ApplyLoanRequest) -> Self {
        LoanApplication {
            amount: req.amount,
            duration: req.duration,
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: String,

    /// Owner's user ID
    pub user_id: String,
    pub amount: f64,

    /// Interest rate fixed at application time
    pub interest: f64,

    /// Term in months
    pub duration: i32,

    /// One of "pending", "approved", "rejected"
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<loan::Model> for LoanResponse {
    fn from(model: loan::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            amount: model.amount,
            interest: model.interest,
            duration: model.duration,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// One page of the admin loan listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoanPageResponse {
    pub loans: Vec<LoanResponse>,

    /// Loans matching the status filter across all pages
    pub total: u64,
    pub page: u64,
}

impl From<LoanPage> for LoanPageResponse {
    fn from(page: LoanPage) -> Self {
        Self {
            loans: page.loans.into_iter().map(LoanResponse::from).collect(),
            total: page.total,
            page: page.page,
        }
    }
}

/// Admin decision on a pending loan
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// "approved" or "rejected"
    pub status: String,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AuditEntryResponse {
    pub id: i64,
    pub user_id: String,
    pub event_type: String,
    pub activity: String,
    pub created_at: i64,
}

impl From<audit_entry::Model> for AuditEntryResponse {
    fn from(model: audit_entry::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            event_type: model.event_type,
            activity: model.activity,
            created_at: model.created_at,
        }
    }
}
