// Request and response bodies exposed through the OpenAPI schema
pub mod common;
pub mod loan;
pub mod user;
