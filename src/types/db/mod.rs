// Database entities - SeaORM models
pub mod audit_entry;
pub mod loan;
pub mod user;
