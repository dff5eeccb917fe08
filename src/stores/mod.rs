// Stores: data access over the primary and audit databases
pub mod audit_store;
pub mod credential_store;
pub mod loan_store;

pub use audit_store::AuditStore;
pub use credential_store::CredentialStore;
pub use loan_store::LoanStore;
