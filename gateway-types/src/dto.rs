//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DEFAULT_PROCESSING_CODE, EphemeralKey, FunctionCode, ResponseCode, Transaction};
use crate::error::{ErrorKind, GatewayError};

/// Timestamp format used in [`TransactionResponse::date_time`].
pub const RESPONSE_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

// ─────────────────────────────────────────────────────────────────────────────
// Result envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Success/failure envelope returned by every endpoint.
///
/// Failures travel in-band: HTTP status is always 200 and `isSuccess`
/// carries the real outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResult<T> {
    pub is_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T> ApiResult<T> {
    pub fn success(value: T) -> Self {
        Self {
            is_success: true,
            value: Some(value),
            error: None,
            error_kind: None,
        }
    }

    pub fn failure(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            is_success: false,
            value: None,
            error: Some(error.into()),
            error_kind: Some(kind),
        }
    }

    /// Converts back into a `Result`, e.g. on the client side.
    pub fn into_result(self) -> Result<T, (ErrorKind, String)> {
        match (self.is_success, self.value) {
            (true, Some(value)) => Ok(value),
            (true, None) => Err((ErrorKind::System, "Success without a value".into())),
            (false, _) => Err((
                self.error_kind.unwrap_or(ErrorKind::System),
                self.error.unwrap_or_default(),
            )),
        }
    }
}

impl<T> From<Result<T, GatewayError>> for ApiResult<T> {
    fn from(result: Result<T, GatewayError>) -> Self {
        match result {
            Ok(value) => ApiResult::success(value),
            Err(err) => ApiResult::failure(err.kind(), err.to_string()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Key DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A freshly issued single-use key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionKeyResponse {
    /// Base64 AES-256 key (32 bytes)
    #[schema(example = "q1Jm2H0uS3xk0W6q6v9m3Zkz7mEw3h1G1o8l3zQw3yA=")]
    pub key: String,
    /// Identifier to send back in `X-Key-Identifier`
    #[schema(example = "0f8fad5b-d9cb-469f-a165-70867728950e")]
    pub key_identifier: String,
    /// Base64 IV (16 bytes)
    #[schema(example = "AAECAwQFBgcICQoLDA0ODw==")]
    pub iv: String,
}

impl From<EphemeralKey> for EncryptionKeyResponse {
    fn from(key: EphemeralKey) -> Self {
        Self {
            key: key.key,
            key_identifier: key.key_id.to_string(),
            iv: key.iv,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Transaction as the client serializes it before encryption.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(default = "default_processing_code")]
    #[schema(example = "999000")]
    pub processing_code: String,
    #[schema(example = "123456")]
    pub system_trace_nr: String,
    /// Purchase, Refund or Void (numeric codes 1234/234/34 also accepted)
    #[schema(value_type = String, example = "Purchase")]
    pub function_code: FunctionCode,
    #[schema(example = "4532015112830366")]
    pub card_no: String,
    #[serde(default)]
    #[schema(example = "Jane Doe")]
    pub card_holder: String,
    #[schema(value_type = String, example = "10.00")]
    pub amount_trxn: Decimal,
    #[schema(example = "840")]
    pub currency_code: String,
    #[schema(example = "12/99")]
    pub expiry_date: String,
    #[serde(rename = "cvv", alias = "CVV")]
    #[schema(example = "123")]
    pub cvv: String,
}

fn default_processing_code() -> String {
    DEFAULT_PROCESSING_CODE.to_string()
}

impl From<TransactionRequest> for Transaction {
    fn from(req: TransactionRequest) -> Self {
        Self {
            processing_code: req.processing_code,
            system_trace_nr: req.system_trace_nr,
            function_code: req.function_code,
            card_no: req.card_no,
            card_holder: req.card_holder,
            amount: req.amount_trxn,
            currency_code: req.currency_code,
            expiry_date: req.expiry_date,
            cvv: req.cvv,
        }
    }
}

impl From<Transaction> for TransactionRequest {
    fn from(tx: Transaction) -> Self {
        Self {
            processing_code: tx.processing_code,
            system_trace_nr: tx.system_trace_nr,
            function_code: tx.function_code,
            card_no: tx.card_no,
            card_holder: tx.card_holder,
            amount_trxn: tx.amount,
            currency_code: tx.currency_code,
            expiry_date: tx.expiry_date,
            cvv: tx.cvv,
        }
    }
}

/// Issuer response, returned encrypted under the request's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Two-digit response code ("00" = approved)
    #[schema(example = "00")]
    pub response_code: String,
    #[schema(example = "Success")]
    pub message: String,
    /// Six digits when approved, empty otherwise
    #[schema(example = "482913")]
    pub approval_code: String,
    /// UTC timestamp, `yyyyMMddHHmmss`
    #[schema(example = "20261018120000")]
    pub date_time: String,
}

impl TransactionResponse {
    pub fn new(code: ResponseCode, approval_code: Option<String>, at: DateTime<Utc>) -> Self {
        Self {
            response_code: code.code().to_string(),
            message: code.message().to_string(),
            approval_code: approval_code.unwrap_or_default(),
            date_time: at.format(RESPONSE_DATE_FORMAT).to_string(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.response_code == ResponseCode::Approved.code()
    }
}
