// Coordinators: one workflow per public operation, composed from stores and providers.
use std::future::Future;
use std::time::Duration;

use crate::errors::InternalError;

pub mod loan_coordinator;
pub mod session_coordinator;

pub use loan_coordinator::LoanCoordinator;
pub use session_coordinator::SessionCoordinator;

/// Run `operation` within `budget`
///
/// On expiry the future is dropped; each store call is a single statement, so
/// nothing is left half-written.
pub(crate) async fn with_timeout<T, F>(budget: Duration, operation: &str, fut: F) -> Result<T, InternalError>
where
    F: Future<Output = Result<T, InternalError>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation = %operation, budget_ms = budget.as_millis() as u64, "Operation timed out");
            Err(InternalError::timeout(operation, budget))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_through_result() {
        let value = with_timeout(Duration::from_secs(1), "fast", async { Ok::<_, InternalError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_reports_budget() {
        let result: Result<(), InternalError> = with_timeout(Duration::from_millis(50), "slow", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        assert!(matches!(
            result,
            Err(InternalError::Timeout { ref operation, budget_ms: 50 }) if operation == "slow"
        ));
    }
}
