//! Running per-currency totals for one scrape run, and their converted report.
use crate::core::currency::{RateLookup, rate_or_identity};
use crate::core::parser::{AmountParser, ParsedAmount, Resolution};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("Invalid amount for {currency}: {amount} (must be finite and non-negative)")]
    InvalidAmount { currency: String, amount: f64 },
}

/// One currency's line in an [`AggregateReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyLine {
    pub currency: String,
    pub total: f64,
    pub rate: f64,
    pub converted: f64,
}

/// Read-only projection of the accumulated totals through a rate table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    /// Sorted by currency code.
    pub lines: Vec<CurrencyLine>,
    pub grand_total: f64,
    pub resolved_count: usize,
    pub examined_count: usize,
}

impl AggregateReport {
    pub fn line(&self, currency: &str) -> Option<&CurrencyLine> {
        self.lines.iter().find(|l| l.currency == currency)
    }
}

#[derive(Debug, Default, Clone)]
pub struct CurrencyAggregator {
    totals: BTreeMap<String, f64>,
    resolved: usize,
    examined: usize,
}

impl CurrencyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, currency: &str, amount: f64) -> Result<(), AggregateError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(AggregateError::InvalidAmount {
                currency: currency.to_string(),
                amount,
            });
        }
        *self.totals.entry(currency.to_string()).or_insert(0.0) += amount;
        self.resolved += 1;
        Ok(())
    }

    /// Counts a raw fragment as examined, whether or not it resolves.
    pub fn note_examined(&mut self) {
        self.examined += 1;
    }

    /// Examines, resolves and, if resolved, records a raw fragment.
    pub fn ingest(
        &mut self,
        parser: &AmountParser,
        raw_text: &str,
    ) -> Result<Resolution, AggregateError> {
        self.note_examined();
        let resolution = parser.resolve(raw_text);
        if let Resolution::Resolved(ParsedAmount { currency, amount }) = &resolution {
            self.record(currency, *amount)?;
        }
        Ok(resolution)
    }

    pub fn total(&self, currency: &str) -> Option<f64> {
        self.totals.get(currency).copied()
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    pub fn examined_count(&self) -> usize {
        self.examined
    }

    pub fn summarize(&self, rates: &dyn RateLookup) -> AggregateReport {
        let mut lines = Vec::with_capacity(self.totals.len());
        let mut grand_total = 0.0;

        for (currency, total) in &self.totals {
            if *total == 0.0 {
                continue;
            }
            let rate = rate_or_identity(rates, currency);
            let converted = total * rate;
            debug!("{} {:.2} x {} = {:.2}", currency, total, rate, converted);
            grand_total += converted;
            lines.push(CurrencyLine {
                currency: currency.clone(),
                total: *total,
                rate,
                converted,
            });
        }

        AggregateReport {
            lines,
            grand_total,
            resolved_count: self.resolved,
            examined_count: self.examined.max(self.resolved),
        }
    }
}
