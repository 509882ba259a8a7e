//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use gateway_hex::{DelayRange, ProcessingPolicy};
use gateway_store::{KeyStoreOptions, RetryPolicy};
use rust_decimal::Decimal;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub key_ttl: Duration,
    pub key_instance_name: String,
    pub key_prefix: String,
    pub key_compression: bool,
    pub store_retry_count: u32,
    pub store_retry_delay: Duration,
    pub store_timeout: Duration,
    pub sweep_interval: Duration,
    pub trace_capacity: usize,
    pub purchase_limit: Decimal,
    pub refund_limit: Decimal,
    pub processing_delay: Option<DelayRange>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through `lookup`, applying defaults for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let processing_delay = match lookup("PROCESSING_DELAY_MS") {
            Some(raw) if !raw.trim().is_empty() => Some(parse_delay_range(&raw)?),
            _ => None,
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000)?,
            key_ttl: Duration::from_secs(parse_or(&lookup, "KEY_TTL_SECS", 300)?),
            key_instance_name: lookup("KEY_INSTANCE_NAME")
                .unwrap_or_else(|| "PaymentGateway_".to_string()),
            key_prefix: lookup("KEY_PREFIX").unwrap_or_else(|| "keys:".to_string()),
            key_compression: parse_or(&lookup, "KEY_COMPRESSION", true)?,
            store_retry_count: parse_or(&lookup, "STORE_RETRY_COUNT", 3)?,
            store_retry_delay: Duration::from_millis(parse_or(
                &lookup,
                "STORE_RETRY_DELAY_MS",
                300,
            )?),
            store_timeout: Duration::from_millis(parse_or(&lookup, "STORE_TIMEOUT_MS", 5000)?),
            sweep_interval: Duration::from_secs(parse_or(&lookup, "SWEEP_INTERVAL_SECS", 30)?),
            trace_capacity: parse_or(&lookup, "TRACE_CAPACITY", 10_000)?,
            purchase_limit: parse_or(&lookup, "PURCHASE_LIMIT", Decimal::new(1_000_000, 2))?,
            refund_limit: parse_or(&lookup, "REFUND_LIMIT", Decimal::new(500_000, 2))?,
            processing_delay,
        })
    }

    pub fn key_store_options(&self) -> KeyStoreOptions {
        KeyStoreOptions {
            instance_name: self.key_instance_name.clone(),
            key_prefix: self.key_prefix.clone(),
            default_ttl: self.key_ttl,
            compression: self.key_compression,
            retry: RetryPolicy::new(self.store_retry_count, self.store_retry_delay)
                .with_attempt_timeout(self.store_timeout),
        }
    }

    pub fn processing_policy(&self) -> ProcessingPolicy {
        ProcessingPolicy {
            purchase_limit: self.purchase_limit,
            refund_limit: self.refund_limit,
            delay: self.processing_delay,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

/// Parses `"min-max"` (or a single value) in milliseconds.
fn parse_delay_range(raw: &str) -> anyhow::Result<DelayRange> {
    let (min, max) = raw.split_once('-').unwrap_or((raw, raw));
    let min: u64 = min
        .trim()
        .parse()
        .with_context(|| format!("PROCESSING_DELAY_MS has an invalid minimum: {raw:?}"))?;
    let max: u64 = max
        .trim()
        .parse()
        .with_context(|| format!("PROCESSING_DELAY_MS has an invalid maximum: {raw:?}"))?;
    Ok(DelayRange::new(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.key_ttl, Duration::from_secs(300));
        assert_eq!(config.key_instance_name, "PaymentGateway_");
        assert_eq!(config.key_prefix, "keys:");
        assert!(config.key_compression);
        assert_eq!(config.store_retry_count, 3);
        assert_eq!(config.store_retry_delay, Duration::from_millis(300));
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.trace_capacity, 10_000);
        assert_eq!(config.purchase_limit, dec!(10000.00));
        assert_eq!(config.refund_limit, dec!(5000.00));
        assert_eq!(config.processing_delay, None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("KEY_TTL_SECS", "60"),
            ("KEY_COMPRESSION", "false"),
            ("PURCHASE_LIMIT", "250.50"),
            ("STORE_TIMEOUT_MS", "750"),
            ("PROCESSING_DELAY_MS", "100-500"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.key_store_options().default_ttl, Duration::from_secs(60));
        assert!(!config.key_store_options().compression);
        assert_eq!(
            config.key_store_options().retry.attempt_timeout,
            Duration::from_millis(750)
        );
        assert_eq!(config.processing_policy().purchase_limit, dec!(250.50));
        assert_eq!(config.processing_delay, Some(DelayRange::new(100, 500)));
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_single_value_delay() {
        assert_eq!(parse_delay_range("250").unwrap(), DelayRange::new(250, 250));
        assert!(parse_delay_range("a-b").is_err());
    }
}
