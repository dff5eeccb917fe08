use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::errors::InternalError;
use crate::types::db::loan::{self, ActiveModel, Entity as Loan};
use crate::types::internal::loan::{LoanQuery, LoanStatus, SortOrder, StatusFilter, LOAN_PAGE_SIZE};

/// Persistence for loan records
///
/// Every mutation is a single statement; status transitions are conditional on
/// the row still being pending.
pub struct LoanStore {
    db: DatabaseConnection,
}

impl LoanStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, model: ActiveModel) -> Result<loan::Model, InternalError> {
        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_loan", e))
    }

    pub async fn find_by_id(&self, loan_id: &str) -> Result<Option<loan::Model>, InternalError> {
        Loan::find_by_id(loan_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_loan_by_id", e))
    }

    /// Single lookup keyed on both the loan id and its owner
    pub async fn find_owned(&self, loan_id: &str, user_id: &str) -> Result<Option<loan::Model>, InternalError> {
        Loan::find()
            .filter(
                Condition::all()
                    .add(loan::Column::Id.eq(loan_id))
                    .add(loan::Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_owned_loan", e))
    }

    fn status_condition(filter: StatusFilter) -> Condition {
        match filter {
            StatusFilter::All => Condition::all(),
            StatusFilter::Only(status) => Condition::all().add(loan::Column::Status.eq(status.as_str())),
        }
    }

    /// One page of loans, sorted by creation time with the id as tie-break
    pub async fn list(&self, query: &LoanQuery) -> Result<Vec<loan::Model>, InternalError> {
        let select = Loan::find().filter(Self::status_condition(query.status));
        let select = match query.order {
            SortOrder::Asc => select
                .order_by_asc(loan::Column::CreatedAt)
                .order_by_asc(loan::Column::Id),
            SortOrder::Desc => select
                .order_by_desc(loan::Column::CreatedAt)
                .order_by_desc(loan::Column::Id),
        };

        select
            .offset(query.offset())
            .limit(LOAN_PAGE_SIZE)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_loans", e))
    }

    pub async fn count(&self, filter: StatusFilter) -> Result<u64, InternalError> {
        Loan::find()
            .filter(Self::status_condition(filter))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_loans", e))
    }

    /// Move a pending loan to `status`; returns the number of rows changed (0 or 1)
    ///
    /// The `status = 'pending'` predicate makes concurrent decisions on the same
    /// loan mutually exclusive.
    pub async fn transition_pending(
        &self,
        loan_id: &str,
        status: LoanStatus,
        updated_at: i64,
    ) -> Result<u64, InternalError> {
        let result = Loan::update_many()
            .col_expr(loan::Column::Status, Expr::value(status.as_str()))
            .col_expr(loan::Column::UpdatedAt, Expr::value(updated_at))
            .filter(loan::Column::Id.eq(loan_id))
            .filter(loan::Column::Status.eq(LoanStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("transition_loan_status", e))?;
        Ok(result.rows_affected)
    }

    /// Returns the number of rows removed
    pub async fn delete(&self, loan_id: &str) -> Result<u64, InternalError> {
        let result = Loan::delete_by_id(loan_id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_loan", e))?;
        Ok(result.rows_affected)
    }
}

impl LoanStore {
    /// Build an unsaved pending loan row
    pub fn new_pending(
        id: String,
        user_id: &str,
        amount: f64,
        interest: f64,
        duration: i32,
        created_at: i64,
    ) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            user_id: Set(user_id.to_string()),
            amount: Set(amount),
            interest: Set(interest),
            duration: Set(duration),
            status: Set(LoanStatus::Pending.as_str().to_string()),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_loan_store;

    async fn seed(store: &LoanStore, id: &str, user_id: &str, created_at: i64) -> loan::Model {
        store
            .insert(LoanStore::new_pending(id.to_string(), user_id, 1000.0, 0.05, 12, created_at))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_find_owned_requires_matching_owner() {
        let store = setup_test_loan_store().await;
        seed(&store, "loan-1", "alice", 100).await;

        assert!(store.find_owned("loan-1", "alice").await.unwrap().is_some());
        assert!(store.find_owned("loan-1", "bob").await.unwrap().is_none());
        assert!(store.find_owned("loan-2", "alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transition_only_applies_to_pending() {
        let store = setup_test_loan_store().await;
        seed(&store, "loan-1", "alice", 100).await;

        assert_eq!(store.transition_pending("loan-1", LoanStatus::Approved, 200).await.unwrap(), 1);
        assert_eq!(store.transition_pending("loan-1", LoanStatus::Rejected, 300).await.unwrap(), 0);
        assert_eq!(store.transition_pending("missing", LoanStatus::Approved, 300).await.unwrap(), 0);

        let loan = store.find_by_id("loan-1").await.unwrap().unwrap();
        assert_eq!(loan.status().unwrap(), LoanStatus::Approved);
        assert_eq!(loan.updated_at, 200);
    }

    #[tokio::test]
    async fn test_list_pages_filters_and_sorts() {
        let store = setup_test_loan_store().await;
        for i in 0..12 {
            seed(&store, &format!("loan-{:02}", i), "alice", 100 + i).await;
        }
        store.transition_pending("loan-05", LoanStatus::Rejected, 500).await.unwrap();

        let pending_first_page = store.list(&LoanQuery::parse(1, "pending", "").unwrap()).await.unwrap();
        assert_eq!(pending_first_page.len(), 10);
        assert_eq!(pending_first_page[0].id, "loan-00");

        let pending_second_page = store.list(&LoanQuery::parse(2, "pending", "").unwrap()).await.unwrap();
        assert_eq!(pending_second_page.len(), 1);
        assert_eq!(pending_second_page[0].id, "loan-11");

        let newest_first = store.list(&LoanQuery::parse(1, "", "").unwrap()).await.unwrap();
        assert_eq!(newest_first[0].id, "loan-11");

        assert_eq!(store.count(StatusFilter::All).await.unwrap(), 12);
        assert_eq!(store.count(StatusFilter::Only(LoanStatus::Pending)).await.unwrap(), 11);
        assert_eq!(store.count(StatusFilter::Only(LoanStatus::Rejected)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_id_breaks_created_at_ties() {
        let store = setup_test_loan_store().await;
        seed(&store, "b", "alice", 100).await;
        seed(&store, "a", "alice", 100).await;

        let asc = store.list(&LoanQuery::parse(1, "", "asc").unwrap()).await.unwrap();
        assert_eq!(asc.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_reports_rows_removed() {
        let store = setup_test_loan_store().await;
        seed(&store, "loan-1", "alice", 100).await;

        assert_eq!(store.delete("loan-1").await.unwrap(), 1);
        assert_eq!(store.delete("loan-1").await.unwrap(), 0);
    }
}
