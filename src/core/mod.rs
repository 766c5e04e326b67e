//! Core business logic abstractions

pub mod aggregator;
pub mod analysis;
pub mod capture;
pub mod config;
pub mod currency;
pub mod log;
pub mod models;
pub mod parser;
pub mod stats;
pub mod store;
pub mod video;

// Re-export main types for cleaner imports
pub use aggregator::{AggregateError, AggregateReport, CurrencyAggregator};
pub use currency::{RateLookup, RateTable};
pub use parser::{AmountParser, ParsedAmount, Resolution};
pub use store::TipStore;
