use std::fmt;
use std::str::FromStr;

use crate::errors::InternalError;
use crate::errors::internal::LoanError;
use crate::types::db::loan;

/// Fixed page size for the admin loan listing
pub const LOAN_PAGE_SIZE: u64 = 10;

/// Loan lifecycle state; `Approved` and `Rejected` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(LoanError::InvalidStatus(other.to_string())),
        }
    }
}

impl loan::Model {
    /// Typed view of the stored status column
    pub fn status(&self) -> Result<LoanStatus, InternalError> {
        self.status
            .parse()
            .map_err(|_| InternalError::parse("loan_status", format!("unknown status '{}'", self.status)))
    }
}

/// Admin decision on a pending loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(&self) -> LoanStatus {
        match self {
            Self::Approve => LoanStatus::Approved,
            Self::Reject => LoanStatus::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = InternalError;

    /// Accepts the target status names used on the wire ("approved" / "rejected")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approve),
            "rejected" => Ok(Self::Reject),
            other => Err(InternalError::validation(
                "status",
                format!("expected 'approved' or 'rejected', got '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(LoanStatus),
}

impl StatusFilter {
    /// Empty input means "all"
    pub fn parse(raw: &str) -> Result<Self, LoanError> {
        match raw {
            "" | "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Resolve the requested order; unspecified defaults to oldest-first for the
    /// pending queue and newest-first for everything else
    pub fn resolve(raw: &str, filter: StatusFilter) -> Result<Self, LoanError> {
        match raw {
            "" if filter == StatusFilter::Only(LoanStatus::Pending) => Ok(Self::Asc),
            "" => Ok(Self::Desc),
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(LoanError::InvalidOrder(other.to_string())),
        }
    }
}

/// Validated admin listing query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanQuery {
    pub page: u64,
    pub status: StatusFilter,
    pub order: SortOrder,
}

impl LoanQuery {
    pub fn parse(page: i64, status: &str, order: &str) -> Result<Self, LoanError> {
        let status = StatusFilter::parse(status)?;
        let order = SortOrder::resolve(order, status)?;
        Ok(Self {
            page: if page < 1 { 1 } else { page as u64 },
            status,
            order,
        })
    }

    /// Row offset of the page, capped to what SQLite accepts as an OFFSET
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(LOAN_PAGE_SIZE)
            .min(i64::MAX as u64)
    }
}

/// Caller-supplied part of a loan; everything else is set by the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LoanApplication {
    pub amount: f64,
    pub duration: i32,
}

#[derive(Debug, Clone)]
pub struct LoanPage {
    pub loans: Vec<loan::Model>,
    /// Number of loans matching the status filter, across all pages
    pub total: u64,
    pub page: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_without_order_defaults_to_ascending() {
        let query = LoanQuery::parse(1, "pending", "").unwrap();
        assert_eq!(query.status, StatusFilter::Only(LoanStatus::Pending));
        assert_eq!(query.order, SortOrder::Asc);
    }

    #[test]
    fn test_other_filters_default_to_descending() {
        assert_eq!(LoanQuery::parse(1, "", "").unwrap().order, SortOrder::Desc);
        assert_eq!(LoanQuery::parse(1, "all", "").unwrap().order, SortOrder::Desc);
        assert_eq!(LoanQuery::parse(1, "approved", "").unwrap().order, SortOrder::Desc);
    }

    #[test]
    fn test_explicit_order_is_honoured() {
        assert_eq!(LoanQuery::parse(1, "pending", "desc").unwrap().order, SortOrder::Desc);
        assert_eq!(LoanQuery::parse(1, "rejected", "asc").unwrap().order, SortOrder::Asc);
    }

    #[test]
    fn test_unknown_status_and_order_are_rejected() {
        assert!(matches!(
            LoanQuery::parse(1, "archived", ""),
            Err(LoanError::InvalidStatus(s)) if s == "archived"
        ));
        assert!(matches!(
            LoanQuery::parse(1, "pending", "random"),
            Err(LoanError::InvalidOrder(s)) if s == "random"
        ));
    }

    #[test]
    fn test_page_below_one_normalises_to_first_page() {
        assert_eq!(LoanQuery::parse(0, "", "").unwrap().page, 1);
        assert_eq!(LoanQuery::parse(-4, "", "").unwrap().offset(), 0);
        assert_eq!(LoanQuery::parse(3, "", "").unwrap().offset(), 20);
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let query = LoanQuery::parse(i64::MAX, "", "").unwrap();
        assert_eq!(query.page, i64::MAX as u64);
        assert_eq!(query.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_decision_parses_wire_values_only() {
        assert_eq!("approved".parse::<Decision>().unwrap(), Decision::Approve);
        assert_eq!("rejected".parse::<Decision>().unwrap(), Decision::Reject);
        assert!(matches!("pending".parse::<Decision>(), Err(InternalError::Validation { .. })));
    }
}
