mod common;

use common::TestApp;
use loan_tracker_backend::coordinators::LoanCoordinator;
use loan_tracker_backend::errors::internal::LoanError;
use loan_tracker_backend::errors::InternalError;
use loan_tracker_backend::types::internal::loan::{Decision, LoanApplication, LoanStatus, LOAN_PAGE_SIZE};

fn application(amount: f64) -> LoanApplication {
    LoanApplication { amount, duration: 12 }
}

#[tokio::test]
async fn test_apply_approve_delete_with_audit_trail() {
    let app = TestApp::new().await;
    let ledger = LoanCoordinator::new(app.app_data.clone());

    let loan = ledger.apply(application(100_000.0), "borrower-1").await.unwrap();
    assert_eq!(loan.status().unwrap(), LoanStatus::Pending);
    assert_eq!(loan.amount, 100_000.0);
    assert_eq!(loan.duration, 12);

    let approved = ledger
        .approve_reject(&loan.id, Decision::Approve, "admin-1")
        .await
        .unwrap();
    assert_eq!(approved.status().unwrap(), LoanStatus::Approved);

    ledger.delete(&loan.id, "admin-1").await.unwrap();
    assert!(matches!(
        ledger.details(&loan.id, "borrower-1").await,
        Err(InternalError::Loan(LoanError::NotFound(_)))
    ));

    let logs = ledger.view_logs().await.unwrap();
    let trail: Vec<(&str, &str)> = logs
        .iter()
        .map(|e| (e.user_id.as_str(), e.activity.as_str()))
        .collect();
    assert_eq!(
        trail,
        vec![
            ("borrower-1", "applied for a loan"),
            ("admin-1", "loan approved by admin"),
            ("admin-1", "deleted a loan"),
        ]
    );
}

#[tokio::test]
async fn test_concurrent_decisions_have_one_winner() {
    let app = TestApp::new().await;
    let ledger = LoanCoordinator::new(app.app_data.clone());
    let loan = ledger.apply(application(5_000.0), "borrower-1").await.unwrap();

    let (first, second) = tokio::join!(
        ledger.approve_reject(&loan.id, Decision::Approve, "admin-1"),
        ledger.approve_reject(&loan.id, Decision::Reject, "admin-2"),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);

    let loser = if first.is_ok() { second } else { first };
    assert!(matches!(
        loser,
        Err(InternalError::Loan(LoanError::AlreadyProcessed { .. }))
    ));

    let decisions = ledger
        .view_logs()
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.activity == "loan approved by admin" || e.activity == "loan rejected by admin")
        .count();
    assert_eq!(decisions, 1);
}

#[tokio::test]
async fn test_rejected_loan_is_terminal() {
    let app = TestApp::new().await;
    let ledger = LoanCoordinator::new(app.app_data.clone());
    let loan = ledger.apply(application(2_500.0), "borrower-1").await.unwrap();

    ledger.approve_reject(&loan.id, Decision::Reject, "admin-1").await.unwrap();

    match ledger.approve_reject(&loan.id, Decision::Approve, "admin-1").await {
        Err(InternalError::Loan(LoanError::AlreadyProcessed { status, .. })) => assert_eq!(status, "rejected"),
        other => panic!("Expected AlreadyProcessed, got {:?}", other),
    }
    assert_eq!(
        ledger.details(&loan.id, "borrower-1").await.unwrap().status().unwrap(),
        LoanStatus::Rejected
    );
}

#[tokio::test]
async fn test_owner_only_details() {
    let app = TestApp::new().await;
    let ledger = LoanCoordinator::new(app.app_data.clone());
    let loan = ledger.apply(application(750.0), "owner").await.unwrap();

    assert_eq!(ledger.details(&loan.id, "owner").await.unwrap().id, loan.id);
    assert!(matches!(
        ledger.details(&loan.id, "stranger").await,
        Err(InternalError::Loan(LoanError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_listing_pages_and_orders() {
    let app = TestApp::new().await;
    let ledger = LoanCoordinator::new(app.app_data.clone());

    let mut ids = Vec::new();
    for i in 0..(LOAN_PAGE_SIZE + 2) {
        let loan = ledger.apply(application(1_000.0 + i as f64), "borrower").await.unwrap();
        ids.push(loan.id);
        app.clock.advance(chrono::Duration::seconds(1));
    }

    let first_page = ledger.view_all(1, "pending", "").await.unwrap();
    assert_eq!(first_page.total, LOAN_PAGE_SIZE + 2);
    assert_eq!(first_page.loans.len() as u64, LOAN_PAGE_SIZE);
    assert_eq!(first_page.loans[0].id, ids[0]);

    let second_page = ledger.view_all(2, "pending", "").await.unwrap();
    assert_eq!(second_page.loans.len(), 2);

    let newest_first = ledger.view_all(1, "all", "").await.unwrap();
    assert_eq!(newest_first.loans[0].id, ids[ids.len() - 1]);

    let approved = ledger.view_all(1, "approved", "asc").await.unwrap();
    assert_eq!(approved.total, 0);
    assert!(approved.loans.is_empty());
}

#[tokio::test]
async fn test_invalid_status_writes_nothing() {
    let app = TestApp::new().await;
    let ledger = LoanCoordinator::new(app.app_data.clone());

    assert!(matches!(
        ledger.view_all(1, "archived", "desc").await,
        Err(InternalError::Loan(LoanError::InvalidStatus(_)))
    ));
    assert!(ledger.view_logs().await.unwrap().is_empty());
}
