use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::helpers::create_request_context;
use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::coordinators::{LoanCoordinator, SessionCoordinator};
use crate::errors::{AuthError, InternalError, LedgerError};
use crate::providers::TokenProvider;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::loan::{AuditEntryResponse, LoanPageResponse, LoanResponse, StatusUpdateRequest};
use crate::types::dto::user::UserProfileResponse;
use crate::types::internal::context::RequestContext;
use crate::types::internal::loan::Decision;

/// Administrator endpoints; every route requires an admin access token
pub struct AdminApi {
    session: SessionCoordinator,
    ledger: LoanCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl AdminApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            session: SessionCoordinator::new(app_data.clone()),
            ledger: LoanCoordinator::new(app_data),
        }
    }

    /// Authenticated context, or `None` when the caller is not an administrator
    fn admin_context(&self, req: &Request, auth: &BearerAuth) -> Result<Option<RequestContext>, InternalError> {
        let ctx = create_request_context(req, &auth.0, &self.token_provider)?;
        if !ctx.is_admin() {
            tracing::warn!(user_id = %ctx.actor_id(), request_id = %ctx.request_id, "Non-admin on admin route");
            return Ok(None);
        }
        Ok(Some(ctx))
    }

    fn require_admin_for_users(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, AuthError> {
        self.admin_context(req, auth)?.ok_or_else(AuthError::forbidden)
    }

    fn require_admin_for_ledger(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, LedgerError> {
        self.admin_context(req, auth)?.ok_or_else(LedgerError::forbidden)
    }
}

#[derive(Tags)]
enum AdminTags {
    /// Account administration
    AdminUsers,
    /// Loan review and audit trail
    AdminLoans,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    #[oai(path = "/users", method = "get", tag = "AdminTags::AdminUsers")]
    async fn list_users(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<UserProfileResponse>>, AuthError> {
        self.require_admin_for_users(req, &auth)?;
        let users = self.session.list_users().await?;
        Ok(Json(users.into_iter().map(UserProfileResponse::from).collect()))
    }

    /// Delete an account; deleting an unknown id succeeds without effect
    #[oai(path = "/users/:id", method = "delete", tag = "AdminTags::AdminUsers")]
    async fn delete_user(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = self.require_admin_for_users(req, &auth)?;
        self.session.delete_user(&id.0, ctx.actor_id()).await?;
        Ok(Json(MessageResponse::new("User deleted")))
    }

    /// Page through loans, ten per page
    ///
    /// `status` is one of all, pending, approved, rejected. `order` is asc or desc;
    /// when omitted the pending queue is oldest-first and everything else newest-first.
    #[oai(path = "/loans", method = "get", tag = "AdminTags::AdminLoans")]
    async fn list_loans(
        &self,
        req: &Request,
        auth: BearerAuth,
        page: Query<Option<i64>>,
        status: Query<Option<String>>,
        order: Query<Option<String>>,
    ) -> Result<Json<LoanPageResponse>, LedgerError> {
        self.require_admin_for_ledger(req, &auth)?;
        let page = self
            .ledger
            .view_all(
                page.0.unwrap_or(1),
                status.0.as_deref().unwrap_or(""),
                order.0.as_deref().unwrap_or(""),
            )
            .await?;
        Ok(Json(page.into()))
    }

    /// Approve or reject a pending loan
    #[oai(path = "/loans/:id/status", method = "patch", tag = "AdminTags::AdminLoans")]
    async fn update_status(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<StatusUpdateRequest>,
    ) -> Result<Json<LoanResponse>, LedgerError> {
        let ctx = self.require_admin_for_ledger(req, &auth)?;
        let decision: Decision = body.status.parse()?;
        let loan = self.ledger.approve_reject(&id.0, decision, ctx.actor_id()).await?;
        Ok(Json(loan.into()))
    }

    #[oai(path = "/loans/:id", method = "delete", tag = "AdminTags::AdminLoans")]
    async fn delete_loan(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<MessageResponse>, LedgerError> {
        let ctx = self.require_admin_for_ledger(req, &auth)?;
        self.ledger.delete(&id.0, ctx.actor_id()).await?;
        Ok(Json(MessageResponse::new("Loan deleted")))
    }

    /// Full audit trail, oldest first
    #[oai(path = "/logs", method = "get", tag = "AdminTags::AdminLoans")]
    async fn logs(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<AuditEntryResponse>>, LedgerError> {
        self.require_admin_for_ledger(req, &auth)?;
        let entries = self.ledger.view_logs().await?;
        Ok(Json(entries.into_iter().map(AuditEntryResponse::from).collect()))
    }
}
