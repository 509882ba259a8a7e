//! Transaction Processor
//!
//! Validates a decrypted transaction, refuses replays of a trace number,
//! and decides the issuer response.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use gateway_types::domain::card;
use gateway_types::{DomainError, FunctionCode, ResponseCode, Transaction, TransactionResponse};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::TraceRegistry;

/// Inclusive millisecond range for the simulated issuer round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    fn sample(&self) -> Duration {
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Rules deciding the issuer response for a valid, non-duplicate transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingPolicy {
    /// Purchases above this amount are declined with `01`
    pub purchase_limit: Decimal,
    /// Refunds above this amount are rejected with `02`
    pub refund_limit: Decimal,
    pub delay: Option<DelayRange>,
}

impl Default for ProcessingPolicy {
    fn default() -> Self {
        Self {
            purchase_limit: Decimal::new(1_000_000, 2),
            refund_limit: Decimal::new(500_000, 2),
            delay: None,
        }
    }
}

impl ProcessingPolicy {
    pub fn decide(&self, tx: &Transaction) -> ResponseCode {
        match tx.function_code {
            FunctionCode::Purchase if tx.amount > self.purchase_limit => {
                ResponseCode::InsufficientFunds
            }
            FunctionCode::Refund if tx.amount > self.refund_limit => ResponseCode::Rejected,
            FunctionCode::Void => ResponseCode::Approved,
            _ => ResponseCode::Approved,
        }
    }
}

pub struct TransactionProcessor {
    policy: ProcessingPolicy,
    traces: Arc<TraceRegistry>,
}

impl TransactionProcessor {
    pub fn new(policy: ProcessingPolicy, traces: Arc<TraceRegistry>) -> Self {
        Self { policy, traces }
    }

    pub fn policy(&self) -> &ProcessingPolicy {
        &self.policy
    }

    pub fn traces(&self) -> &Arc<TraceRegistry> {
        &self.traces
    }

    /// Checks every card rule, reporting all failures at once.
    pub fn validate(&self, tx: &Transaction) -> Result<(), DomainError> {
        card::validate(tx, Utc::now()).inspect_err(|e| {
            warn!(card = %tx.masked_card(), error = %e, "Transaction failed validation");
        })
    }

    pub fn check_duplicate(&self, tx: &Transaction) -> Result<(), DomainError> {
        if self.traces.check_and_insert(&tx.system_trace_nr) {
            Ok(())
        } else {
            warn!(trace = %tx.system_trace_nr, "Duplicate transaction refused");
            Err(DomainError::DuplicateTrace(tx.system_trace_nr.clone()))
        }
    }

    /// Validate, refuse duplicates, then answer as the issuer.
    #[instrument(skip(self, tx), fields(trace = %tx.system_trace_nr, function = %tx.function_code, card = %tx.masked_card()))]
    pub async fn process(&self, tx: &Transaction) -> Result<TransactionResponse, DomainError> {
        self.validate(tx)?;
        self.check_duplicate(tx)?;

        if let Some(range) = self.policy.delay {
            let delay = range.sample();
            debug!(delay_ms = delay.as_millis() as u64, "Simulating issuer round trip");
            tokio::time::sleep(delay).await;
        }

        let code = self.policy.decide(tx);
        let approval_code = code.is_approved().then(generate_approval_code);
        info!(response_code = code.code(), amount = %tx.amount, "Transaction processed");

        Ok(TransactionResponse::new(code, approval_code, Utc::now()))
    }
}

/// Six random decimal digits.
pub fn generate_approval_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000u32))
}
