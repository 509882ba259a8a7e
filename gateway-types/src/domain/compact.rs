//! Compact binary record: a transaction packed into 28 BCD bytes.
//!
//! Layout (bytes, in order):
//!
//! | field            | bytes | digits on the wire                 |
//! |------------------|-------|------------------------------------|
//! | processing code  | 3     | first 3 digits, left-padded to 6   |
//! | system trace     | 3     | 6                                  |
//! | function code    | 2     | 4                                  |
//! | card number      | 8     | 16                                 |
//! | amount           | 6     | 12, two implied decimals           |
//! | currency code    | 2     | 3, left-padded to 4                |
//! | expiry (MMYY)    | 2     | 4                                  |
//! | cvv              | 2     | 3 or 4, left-padded to 4           |
//!
//! The cardholder name is not part of the record.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::card::{expected_cvv_length, parse_expiry};
use super::{FunctionCode, Transaction};
use crate::error::CodecError;

const PROCESSING_CODE_LEN: usize = 3;
const SYSTEM_TRACE_LEN: usize = 3;
const FUNCTION_CODE_LEN: usize = 2;
const CARD_NO_LEN: usize = 8;
const AMOUNT_LEN: usize = 6;
const CURRENCY_LEN: usize = 2;
const EXPIRY_LEN: usize = 2;
const CVV_LEN: usize = 2;

/// Total size of a compact record.
pub const COMPACT_RECORD_LEN: usize = PROCESSING_CODE_LEN
    + SYSTEM_TRACE_LEN
    + FUNCTION_CODE_LEN
    + CARD_NO_LEN
    + AMOUNT_LEN
    + CURRENCY_LEN
    + EXPIRY_LEN
    + CVV_LEN;

const MAX_AMOUNT_MINOR: u64 = 999_999_999_999;

/// The fixed-size wire form of a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactRecord([u8; COMPACT_RECORD_LEN]);

impl CompactRecord {
    /// Packs a transaction. Every numeric field must be plain digits.
    pub fn encode(tx: &Transaction) -> Result<Self, CodecError> {
        let mut out = Vec::with_capacity(COMPACT_RECORD_LEN);

        if tx.processing_code.len() != 6 {
            return Err(CodecError::ProcessingCodeLength(tx.processing_code.len()));
        }
        // The full code is checked for digits; only the first half travels.
        pack_field("processingCode", &tx.processing_code, 6, 3)?;
        out.extend(pack_field(
            "processingCode",
            &tx.processing_code[..3],
            3,
            PROCESSING_CODE_LEN,
        )?);

        out.extend(pack_field(
            "systemTraceNr",
            &tx.system_trace_nr,
            6,
            SYSTEM_TRACE_LEN,
        )?);
        out.extend(pack_field(
            "functionCode",
            tx.function_code.code(),
            4,
            FUNCTION_CODE_LEN,
        )?);

        if tx.card_no.len() != 16 {
            return Err(CodecError::CardNumberLength(tx.card_no.len()));
        }
        out.extend(pack_field("cardNo", &tx.card_no, 16, CARD_NO_LEN)?);

        let minor = amount_to_minor(tx.amount)?;
        out.extend(pack_field("amount", &minor.to_string(), 12, AMOUNT_LEN)?);

        out.extend(pack_field(
            "currencyCode",
            &tx.currency_code,
            3,
            CURRENCY_LEN,
        )?);

        let (month, year) = parse_expiry(&tx.expiry_date)
            .ok_or_else(|| CodecError::ExpiryFormat(tx.expiry_date.clone()))?;
        let expiry = format!("{:02}{:02}", month, year);
        out.extend(pack_field("expiryDate", &expiry, 4, EXPIRY_LEN)?);

        out.extend(pack_field("cvv", &tx.cvv, 4, CVV_LEN)?);

        let bytes: [u8; COMPACT_RECORD_LEN] =
            out.try_into().map_err(|v: Vec<u8>| CodecError::InvalidLength {
                expected: COMPACT_RECORD_LEN,
                actual: v.len(),
            })?;
        Ok(Self(bytes))
    }

    /// Unpacks a record back into a transaction.
    ///
    /// The processing code comes back as its three meaningful digits plus
    /// `"000"`, the expiry as `MM/YY`, and the cardholder empty.
    pub fn decode(bytes: &[u8]) -> Result<Transaction, CodecError> {
        Self::try_from(bytes)?.to_transaction()
    }

    pub fn to_transaction(&self) -> Result<Transaction, CodecError> {
        let mut reader = Reader {
            bytes: &self.0,
            offset: 0,
        };

        let processing = reader.read("processingCode", PROCESSING_CODE_LEN)?;
        let processing_code = format!("{}000", strip_padding("processingCode", &processing, 3)?);

        let system_trace_nr = reader.read("systemTraceNr", SYSTEM_TRACE_LEN)?;

        let function = reader.read("functionCode", FUNCTION_CODE_LEN)?;
        let function_code = FunctionCode::from_code(&function)
            .ok_or(CodecError::UnknownFunctionCode(function))?;

        let card_no = reader.read("cardNo", CARD_NO_LEN)?;

        let minor: i64 = reader
            .read("amount", AMOUNT_LEN)?
            .parse()
            .map_err(|_| CodecError::AmountOutOfRange("unreadable amount".into()))?;
        let amount = Decimal::new(minor, 2);

        let currency = reader.read("currencyCode", CURRENCY_LEN)?;
        let currency_code = strip_padding("currencyCode", &currency, 3)?.to_string();

        let expiry = reader.read("expiryDate", EXPIRY_LEN)?;
        let expiry_date = format!("{}/{}", &expiry[..2], &expiry[2..]);

        let cvv_digits = reader.read("cvv", CVV_LEN)?;
        let cvv_len = expected_cvv_length(&card_no).min(cvv_digits.len());
        let cvv = strip_padding("cvv", &cvv_digits, cvv_len)?.to_string();

        Ok(Transaction {
            processing_code,
            system_trace_nr,
            function_code,
            card_no,
            card_holder: String::new(),
            amount,
            currency_code,
            expiry_date,
            cvv,
        })
    }

    pub fn as_bytes(&self) -> &[u8; COMPACT_RECORD_LEN] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; COMPACT_RECORD_LEN] {
        self.0
    }
}

impl TryFrom<&[u8]> for CompactRecord {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; COMPACT_RECORD_LEN] =
            bytes.try_into().map_err(|_| CodecError::InvalidLength {
                expected: COMPACT_RECORD_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }
}

impl Transaction {
    /// Packs this transaction into its compact record.
    pub fn to_compact(&self) -> Result<CompactRecord, CodecError> {
        CompactRecord::encode(self)
    }
}

fn pack_field(
    field: &'static str,
    value: &str,
    max_digits: usize,
    width: usize,
) -> Result<Vec<u8>, CodecError> {
    if value.is_empty() {
        return Err(CodecError::EmptyField(field));
    }
    if value.len() > max_digits {
        return Err(CodecError::Field {
            field,
            source: bcd_codec::BcdError::Overflow {
                digits: value.len(),
                capacity: max_digits,
            },
        });
    }
    bcd_codec::pack_fixed(value, width).map_err(|source| CodecError::Field { field, source })
}

fn amount_to_minor(amount: Decimal) -> Result<u64, CodecError> {
    let out_of_range = || CodecError::AmountOutOfRange(amount.to_string());
    if amount.is_sign_negative() {
        return Err(out_of_range());
    }
    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(out_of_range)?;
    // Sub-cent amounts cannot be represented with two implied decimals.
    if !scaled.fract().is_zero() {
        return Err(out_of_range());
    }
    let minor = scaled.to_u64().ok_or_else(out_of_range)?;
    if minor > MAX_AMOUNT_MINOR {
        return Err(out_of_range());
    }
    Ok(minor)
}

/// Keeps the last `len` digits of a left-padded field. The padding must be zeros.
fn strip_padding<'a>(
    field: &'static str,
    digits: &'a str,
    len: usize,
) -> Result<&'a str, CodecError> {
    let (pad, value) = digits.split_at(digits.len() - len);
    if pad.bytes().any(|b| b != b'0') {
        return Err(CodecError::NonZeroPadding {
            field,
            digits: digits.to_string(),
        });
    }
    Ok(value)
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn read(&mut self, field: &'static str, len: usize) -> Result<String, CodecError> {
        let chunk = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        bcd_codec::unpack(chunk).map_err(|source| CodecError::Field { field, source })
    }
}
