//! Currency catalogue and conversion-rate abstractions

use anyhow::{Result, bail};
use std::collections::BTreeMap;
use tracing::debug;

/// A known currency marker as it appears on the page, its ISO code and the
/// default value of one unit in TWD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownCurrency {
    pub marker: &'static str,
    pub iso: &'static str,
    pub default_rate: f64,
}

const fn known(marker: &'static str, iso: &'static str, default_rate: f64) -> KnownCurrency {
    KnownCurrency {
        marker,
        iso,
        default_rate,
    }
}

pub const KNOWN_CURRENCIES: &[KnownCurrency] = &[
    known("$", "TWD", 1.0),
    known("US$", "USD", 32.95),
    known("HK$", "HKD", 4.213),
    known("SGD", "SGD", 24.65),
    known("CA$", "CAD", 22.87),
    known("MYR", "MYR", 7.35),
    known("¥", "JPY", 0.22),
    known("AU$", "AUD", 20.78),
    known("£", "GBP", 42.48),
    known("€", "EUR", 35.7),
    known("NZ$", "NZD", 18.85),
    known("PHP", "PHP", 0.55),
    known("THB", "THB", 0.96),
    known("IDR", "IDR", 0.0020),
    known("TRY", "TRY", 0.97),
    known("CLP", "CLP", 0.035),
    known("ARS", "ARS", 0.035),
    known("AED", "AED", 8.59),
];

/// Returns the ISO code for a page marker such as `US$`.
pub fn iso_code(marker: &str) -> Option<&'static str> {
    KNOWN_CURRENCIES
        .iter()
        .find(|c| c.marker == marker)
        .map(|c| c.iso)
}

/// Returns the page marker used for an ISO code such as `USD`.
pub fn marker_for_iso(iso: &str) -> Option<&'static str> {
    KNOWN_CURRENCIES
        .iter()
        .find(|c| c.iso == iso)
        .map(|c| c.marker)
}

/// Answers "how much is one unit of `currency` in the canonical unit".
///
/// `None` is a rate miss, which callers treat as an identity rate.
pub trait RateLookup {
    fn rate(&self, currency: &str) -> Option<f64>;
}

impl<F> RateLookup for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn rate(&self, currency: &str) -> Option<f64> {
        self(currency)
    }
}

/// Applies the miss policy: unknown currencies convert 1:1.
pub fn rate_or_identity(rates: &dyn RateLookup, currency: &str) -> f64 {
    match rates.rate(currency) {
        Some(rate) => rate,
        None => {
            debug!("No rate for {}, using 1.0", currency);
            1.0
        }
    }
}

/// Static conversion table keyed by currency marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with the built-in rates of every known currency.
    pub fn with_defaults() -> Self {
        let rates = KNOWN_CURRENCIES
            .iter()
            .map(|c| (c.marker.to_string(), c.default_rate))
            .collect();
        Self { rates }
    }

    pub fn insert(&mut self, currency: &str, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            bail!("Invalid rate for {currency}: {rate} (must be a positive number)");
        }
        self.rates.insert(currency.trim().to_string(), rate);
        Ok(())
    }

    /// Overlays `overrides` onto this table, replacing existing entries.
    ///
    /// Keys may be page markers (`US$`) or ISO codes of known currencies (`USD`).
    pub fn merge(&mut self, overrides: &BTreeMap<String, f64>) -> Result<()> {
        for (currency, rate) in overrides {
            let marker = match marker_for_iso(currency.trim()) {
                Some(marker) => marker,
                None => currency.as_str(),
            };
            self.insert(marker, *rate)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl RateLookup for RateTable {
    fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }
}
