//! Card transaction domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::card;

/// Processing code used when the caller does not supply one.
pub const DEFAULT_PROCESSING_CODE: &str = "999000";

/// What the transaction asks the issuer to do.
///
/// Each variant maps to a fixed 4-digit numeric code on the compact wire
/// format. Parsing accepts either the variant name or the numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum FunctionCode {
    Purchase,
    Refund,
    Void,
}

impl FunctionCode {
    pub const ALL: [FunctionCode; 3] = [
        FunctionCode::Purchase,
        FunctionCode::Refund,
        FunctionCode::Void,
    ];

    /// The zero-padded 4-digit wire code.
    pub fn code(&self) -> &'static str {
        match self {
            FunctionCode::Purchase => "1234",
            FunctionCode::Refund => "0234",
            FunctionCode::Void => "0034",
        }
    }

    /// Looks up a variant by numeric code; leading zeros are optional.
    pub fn from_code(code: &str) -> Option<Self> {
        let value: u16 = code.parse().ok()?;
        Self::ALL
            .into_iter()
            .find(|f| f.code().parse::<u16>().ok() == Some(value))
    }
}

impl std::fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionCode::Purchase => write!(f, "Purchase"),
            FunctionCode::Refund => write!(f, "Refund"),
            FunctionCode::Void => write!(f, "Void"),
        }
    }
}

impl std::str::FromStr for FunctionCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(code) = Self::from_code(trimmed) {
            return Ok(code);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "purchase" => Ok(FunctionCode::Purchase),
            "refund" => Ok(FunctionCode::Refund),
            "void" => Ok(FunctionCode::Void),
            _ => Err(format!("Invalid function code: {}", s)),
        }
    }
}

impl TryFrom<String> for FunctionCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A card transaction as submitted by a client.
///
/// `card_holder` never travels in the compact record; a decoded
/// transaction always has it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Six digits; only the first three are meaningful
    pub processing_code: String,
    /// Trace number used for duplicate suppression
    pub system_trace_nr: String,
    pub function_code: FunctionCode,
    pub card_no: String,
    pub card_holder: String,
    /// Transaction amount in major units (two decimal places on the wire)
    pub amount: Decimal,
    /// ISO-4217 numeric currency code
    pub currency_code: String,
    /// MM/YY (MMYY is also accepted)
    pub expiry_date: String,
    pub cvv: String,
}

impl Transaction {
    /// Card number with everything but the last four digits masked, for logs.
    pub fn masked_card(&self) -> String {
        card::mask_card_number(&self.card_no)
    }
}
