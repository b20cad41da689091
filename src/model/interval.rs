use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

/// What an approved date range covers. Holidays apply to everybody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalCategory {
    Holiday,
    Leave { employee_id: u64 },
    Visit { employee_id: u64 },
}

/// Approval state of a leave or visit application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Closed range `[from, to]` that has passed approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovedInterval {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub category: IntervalCategory,
}

impl ApprovedInterval {
    pub fn new(from: NaiveDate, to: NaiveDate, category: IntervalCategory) -> Self {
        Self { from, to, category }
    }

    /// An inverted range contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}
