use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::helpers::create_request_context;
use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::coordinators::LoanCoordinator;
use crate::errors::LedgerError;
use crate::providers::TokenProvider;
use crate::types::dto::loan::{ApplyLoanRequest, LoanResponse};

/// Loan endpoints for the signed-in borrower
pub struct LoansApi {
    ledger: LoanCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl LoansApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            ledger: LoanCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum LoanTags {
    Loans,
}

#[OpenApi]
impl LoansApi {
    /// Apply for a loan; it starts pending at the configured interest rate
    #[oai(path = "/loans", method = "post", tag = "LoanTags::Loans")]
    async fn apply(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<ApplyLoanRequest>,
    ) -> Result<Json<LoanResponse>, LedgerError> {
        let ctx = create_request_context(req, &auth.0, &self.token_provider)?;
        let loan = self.ledger.apply(body.0.into(), ctx.actor_id()).await?;
        Ok(Json(loan.into()))
    }

    /// A loan owned by the caller; loans of other users answer 404
    #[oai(path = "/loans/:id", method = "get", tag = "LoanTags::Loans")]
    async fn details(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<LoanResponse>, LedgerError> {
        let ctx = create_request_context(req, &auth.0, &self.token_provider)?;
        let loan = self.ledger.details(&id.0, ctx.actor_id()).await?;
        Ok(Json(loan.into()))
    }
}
