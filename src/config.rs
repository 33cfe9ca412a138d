use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Index used for relative momentum.
    pub benchmark_ticker: String,
    /// Upper bound on tickers fetched and scored at the same time.
    pub scoring_concurrency: usize,
    /// Days of daily history requested per ticker.
    pub history_days: u32,
    pub max_tickers_per_request: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            benchmark_ticker: "SPY".to_string(),
            scoring_concurrency: 4,
            history_days: 365,
            max_tickers_per_request: 50,
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let scoring_concurrency: usize =
            parse_or(&lookup, "SCORING_CONCURRENCY", defaults.scoring_concurrency)?;
        if scoring_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "SCORING_CONCURRENCY",
                value: "0".into(),
            });
        }

        let benchmark_ticker = lookup("BENCHMARK_TICKER")
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .unwrap_or(defaults.benchmark_ticker);

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            benchmark_ticker,
            scoring_concurrency,
            history_days: parse_or(&lookup, "HISTORY_DAYS", defaults.history_days)?,
            max_tickers_per_request: parse_or(
                &lookup,
                "MAX_TICKERS_PER_REQUEST",
                defaults.max_tickers_per_request,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("BENCHMARK_TICKER", " qqq "),
            ("SCORING_CONCURRENCY", "8"),
            ("HISTORY_DAYS", "180"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.benchmark_ticker, "QQQ");
        assert_eq!(config.scoring_concurrency, 8);
        assert_eq!(config.history_days, 180);
        assert_eq!(config.max_tickers_per_request, 50);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = AppConfig::from_lookup(lookup_from(&[("HISTORY_DAYS", "a year")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid { key: "HISTORY_DAYS", value: "a year".into() }
        );
        assert!(AppConfig::from_lookup(lookup_from(&[("SCORING_CONCURRENCY", "0")])).is_err());
    }
}
