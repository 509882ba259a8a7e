//! Card business rules: Luhn checksum, CVV length by brand, expiry.
//!
//! Everything here is a pure function; the caller supplies "now" so the
//! rules are deterministic under test.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::Transaction;
use crate::error::DomainError;

/// CVV length required for cards whose number starts with `prefix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CvvRule {
    pub prefix: &'static str,
    pub length: usize,
}

/// Brand-specific CVV lengths. Cards matching no prefix use
/// [`DEFAULT_CVV_LENGTH`].
pub const CVV_RULES: &[CvvRule] = &[
    // American Express
    CvvRule {
        prefix: "34",
        length: 4,
    },
    CvvRule {
        prefix: "37",
        length: 4,
    },
];

pub const DEFAULT_CVV_LENGTH: usize = 3;

/// CVV length the card number's brand requires.
pub fn expected_cvv_length(card_no: &str) -> usize {
    CVV_RULES
        .iter()
        .find(|rule| card_no.starts_with(rule.prefix))
        .map_or(DEFAULT_CVV_LENGTH, |rule| rule.length)
}

/// Standard mod-10 check. Empty or non-digit input is invalid.
pub fn luhn_valid(card_no: &str) -> bool {
    if card_no.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    for (i, ch) in card_no.chars().rev().enumerate() {
        let Some(mut digit) = ch.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

/// Parses `MM/YY` or `MMYY` into `(month, two-digit year)`.
pub fn parse_expiry(expiry: &str) -> Option<(u32, u32)> {
    let digits: String = match expiry.len() {
        5 if expiry.as_bytes()[2] == b'/' => format!("{}{}", &expiry[..2], &expiry[3..]),
        4 => expiry.to_string(),
        _ => return None,
    };
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let month: u32 = digits[..2].parse().ok()?;
    let year: u32 = digits[2..].parse().ok()?;
    (1..=12).contains(&month).then_some((month, year))
}

/// The instant a card stops being valid: midnight UTC on the last day of
/// its expiry month.
pub fn expiry_instant(month: u32, year: u32) -> Option<DateTime<Utc>> {
    let first = NaiveDate::from_ymd_opt(2000 + year as i32, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some(last.and_hms_opt(0, 0, 0)?.and_utc())
}

/// True when the expiry date is well formed and still in the future.
pub fn expiry_valid(expiry: &str, now: DateTime<Utc>) -> bool {
    parse_expiry(expiry)
        .and_then(|(month, year)| expiry_instant(month, year))
        .is_some_and(|instant| instant > now)
}

/// CVV is all digits with the length the card brand requires.
pub fn cvv_valid(cvv: &str, card_no: &str) -> bool {
    !cvv.is_empty()
        && cvv.chars().all(|c| c.is_ascii_digit())
        && cvv.len() == expected_cvv_length(card_no)
}

/// At most two decimal places, so the amount is a whole number of cents.
pub fn amount_precision_valid(amount: Decimal) -> bool {
    amount.normalize().scale() <= AMOUNT_SCALE
}

/// Decimal places an amount carries on the wire.
pub const AMOUNT_SCALE: u32 = 2;

pub fn currency_code_valid(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_digit())
}

/// Masks all but the last four digits.
pub fn mask_card_number(card_no: &str) -> String {
    let visible = card_no.len().saturating_sub(4);
    card_no
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}

/// Runs every transaction rule and reports all failures at once.
pub fn validate(tx: &Transaction, now: DateTime<Utc>) -> Result<(), DomainError> {
    let mut errors = Vec::new();

    if tx.card_no.trim().is_empty() {
        errors.push("Card number is required");
    }
    if tx.card_holder.trim().is_empty() {
        errors.push("Cardholder name is required");
    }
    if tx.amount <= Decimal::ZERO {
        errors.push("Amount must be greater than zero");
    }
    if !amount_precision_valid(tx.amount) {
        errors.push("Amount must have at most two decimal places");
    }
    if !luhn_valid(&tx.card_no) {
        errors.push("Invalid card number");
    }
    if !expiry_valid(&tx.expiry_date, now) {
        errors.push("Invalid or expired card");
    }
    if !cvv_valid(&tx.cvv, &tx.card_no) {
        errors.push("Invalid CVV");
    }
    if !currency_code_valid(&tx.currency_code) {
        errors.push("Invalid currency code");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(
            errors.into_iter().map(String::from).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::{DEFAULT_PROCESSING_CODE, FunctionCode};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn valid_tx() -> Transaction {
        Transaction {
            processing_code: DEFAULT_PROCESSING_CODE.into(),
            system_trace_nr: "123456".into(),
            function_code: FunctionCode::Purchase,
            card_no: "4532015112830366".into(),
            card_holder: "Jane Doe".into(),
            amount: dec!(10.00),
            currency_code: "840".into(),
            expiry_date: "12/99".into(),
            cvv: "123".into(),
        }
    }

    #[test]
    fn test_luhn() {
        assert!(luhn_valid("4532015112830366"));
        assert!(!luhn_valid("4532015112830367"));
        assert!(luhn_valid("378282246310005"));
        assert!(!luhn_valid(""));
        assert!(!luhn_valid("4532-0151"));
    }

    #[test]
    fn test_expected_cvv_length_by_prefix() {
        assert_eq!(expected_cvv_length("341111111111111"), 4);
        assert_eq!(expected_cvv_length("371449635398431"), 4);
        assert_eq!(expected_cvv_length("4532015112830366"), 3);
        assert_eq!(expected_cvv_length("5500000000000004"), 3);
    }

    #[test]
    fn test_cvv_valid() {
        assert!(cvv_valid("1234", "371449635398431"));
        assert!(!cvv_valid("123", "371449635398431"));
        assert!(cvv_valid("123", "4532015112830366"));
        assert!(!cvv_valid("1234", "4532015112830366"));
        assert!(!cvv_valid("12a", "4532015112830366"));
    }

    #[test]
    fn test_parse_expiry_formats() {
        assert_eq!(parse_expiry("12/99"), Some((12, 99)));
        assert_eq!(parse_expiry("0127"), Some((1, 27)));
        assert_eq!(parse_expiry("13/25"), None);
        assert_eq!(parse_expiry("00/25"), None);
        assert_eq!(parse_expiry("1/25"), None);
        assert_eq!(parse_expiry("ab/cd"), None);
    }

    #[test]
    fn test_expiry_is_last_day_of_month() {
        let instant = expiry_instant(2, 28).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2028, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_expiry_valid_relative_to_now() {
        assert!(expiry_valid("11/26", now()));
        assert!(!expiry_valid("10/26", Utc.with_ymd_and_hms(2026, 10, 31, 0, 0, 1).unwrap()));
        assert!(!expiry_valid("09/26", now()));
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("4532015112830366"), "************0366");
        assert_eq!(mask_card_number("123"), "123");
    }

    #[test]
    fn test_validate_accepts_valid_transaction() {
        assert!(validate(&valid_tx(), now()).is_ok());
    }

    #[test]
    fn test_validate_accumulates_all_failures() {
        let tx = Transaction {
            card_holder: "".into(),
            amount: dec!(0),
            card_no: "4532015112830367".into(),
            expiry_date: "01/20".into(),
            cvv: "12".into(),
            currency_code: "USD".into(),
            ..valid_tx()
        };

        let Err(DomainError::Validation(errors)) = validate(&tx, now()) else {
            panic!("expected validation failure");
        };

        assert_eq!(
            errors,
            vec![
                "Cardholder name is required",
                "Amount must be greater than zero",
                "Invalid card number",
                "Invalid or expired card",
                "Invalid CVV",
                "Invalid currency code",
            ]
        );
    }

    #[test]
    fn test_amount_precision() {
        assert!(amount_precision_valid(dec!(10.00)));
        assert!(amount_precision_valid(dec!(10.500)));
        assert!(amount_precision_valid(dec!(0.01)));
        assert!(!amount_precision_valid(dec!(10.005)));
        assert!(!amount_precision_valid(dec!(0.001)));
    }

    #[test]
    fn test_validate_rejects_sub_cent_amounts() {
        for amount in [dec!(10.005), dec!(0.001)] {
            let tx = Transaction {
                amount,
                ..valid_tx()
            };
            assert_eq!(
                validate(&tx, now()),
                Err(DomainError::Validation(vec![
                    "Amount must have at most two decimal places".into()
                ]))
            );
        }
    }

    #[test]
    fn test_validate_empty_card_number() {
        let tx = Transaction {
            card_no: "".into(),
            ..valid_tx()
        };
        let Err(DomainError::Validation(errors)) = validate(&tx, now()) else {
            panic!("expected validation failure");
        };
        assert_eq!(errors[0], "Card number is required");
        assert!(errors.contains(&"Invalid card number".to_string()));
    }

    #[test]
    fn test_validate_amex_requires_four_digit_cvv() {
        let tx = Transaction {
            card_no: "378282246310005".into(),
            cvv: "123".into(),
            ..valid_tx()
        };
        assert_eq!(
            validate(&tx, now()),
            Err(DomainError::Validation(vec!["Invalid CVV".into()]))
        );
    }
}
