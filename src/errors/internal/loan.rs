use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoanError {
    /// Missing loan, or a loan owned by someone else; deliberately indistinguishable
    #[error("Loan not found: {0}")]
    NotFound(String),

    #[error("Loan {loan_id} already processed (status: {status})")]
    AlreadyProcessed { loan_id: String, status: String },

    #[error("Invalid status parameter: {0}")]
    InvalidStatus(String),

    #[error("Invalid order parameter: {0}")]
    InvalidOrder(String),
}
