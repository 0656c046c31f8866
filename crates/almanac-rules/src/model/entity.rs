use std::fmt;

use serde::{Deserialize, Serialize};

use super::CodedValue;

/// Kind of entity a calendar is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Clients,
    Groups,
    Loans,
    Centers,
    Savings,
    LoanRecalculationRestDetail,
    LoanRecalculationCompoundingDetail,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Groups => "groups",
            Self::Loans => "loans",
            Self::Centers => "centers",
            Self::Savings => "savings",
            Self::LoanRecalculationRestDetail => "loan_recalculation_rest_detail",
            Self::LoanRecalculationCompoundingDetail => "loan_recalculation_compounding_detail",
        }
    }
}

impl CodedValue for EntityType {
    const MIN_VALUE: i64 = 1;
    const MAX_VALUE: i64 = 7;

    fn from_int(value: i64) -> Option<Self> {
        Some(match value {
            1 => Self::Clients,
            2 => Self::Groups,
            3 => Self::Loans,
            4 => Self::Centers,
            5 => Self::Savings,
            6 => Self::LoanRecalculationRestDetail,
            7 => Self::LoanRecalculationCompoundingDetail,
            _ => return None,
        })
    }

    fn value(self) -> i64 {
        match self {
            Self::Clients => 1,
            Self::Groups => 2,
            Self::Loans => 3,
            Self::Centers => 4,
            Self::Savings => 5,
            Self::LoanRecalculationRestDetail => 6,
            Self::LoanRecalculationCompoundingDetail => 7,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reminder delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemindBy {
    Email,
    Sms,
}

impl CodedValue for RemindBy {
    const MIN_VALUE: i64 = 1;
    const MAX_VALUE: i64 = 2;

    fn from_int(value: i64) -> Option<Self> {
        Some(match value {
            1 => Self::Email,
            2 => Self::Sms,
            _ => return None,
        })
    }

    fn value(self) -> i64 {
        match self {
            Self::Email => 1,
            Self::Sms => 2,
        }
    }
}
