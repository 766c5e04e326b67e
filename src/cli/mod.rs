pub mod analyze;
pub mod browse;
pub mod setup;
pub mod stats;
pub mod ui;
