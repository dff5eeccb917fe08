pub mod audit;
pub mod auth;
pub mod context;
pub mod loan;
pub mod user;
