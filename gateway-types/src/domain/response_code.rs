//! Issuer response codes.

use serde::{Deserialize, Serialize};

/// Outcome of processing a transaction, rendered as a 2-digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCode {
    Approved,
    InsufficientFunds,
    Rejected,
    Reversed,
    DoNotHonor,
    SystemError,
}

impl ResponseCode {
    pub fn code(&self) -> &'static str {
        match self {
            ResponseCode::Approved => "00",
            ResponseCode::InsufficientFunds => "01",
            ResponseCode::Rejected => "02",
            ResponseCode::Reversed => "03",
            ResponseCode::DoNotHonor => "10",
            ResponseCode::SystemError => "99",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResponseCode::Approved => "Success",
            ResponseCode::InsufficientFunds => "Insufficient funds",
            ResponseCode::Rejected => "Transaction rejected",
            ResponseCode::Reversed => "Transaction reversed",
            ResponseCode::DoNotHonor => "Do not honor",
            ResponseCode::SystemError => "System error",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ResponseCode::Approved)
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}
