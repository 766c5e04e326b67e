//! Storage abstraction for videos, tips and rates

use crate::core::currency::RateTable;
use crate::core::models::{CurrencyRate, SuperThanks, Video};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TipStore: Send + Sync {
    /// Inserts or replaces a video by id.
    async fn save_video(&self, video: &Video) -> Result<()>;

    /// Replaces every stored tip of `video_id` with `tips`.
    async fn replace_tips(&self, video_id: &str, tips: &[SuperThanks]) -> Result<()>;

    async fn videos(&self) -> Result<Vec<Video>>;

    /// Tips of one video, or of all videos when `video_id` is `None`.
    async fn tips(&self, video_id: Option<&str>) -> Result<Vec<SuperThanks>>;

    async fn put_rate(&self, currency: &str, rate: f64) -> Result<()>;

    async fn rates(&self) -> Result<Vec<CurrencyRate>>;

    async fn rate_table(&self) -> Result<RateTable> {
        let mut table = RateTable::new();
        for r in self.rates().await? {
            table.insert(&r.currency, r.rate)?;
        }
        Ok(table)
    }

    /// Writes every entry of `table`, replacing existing rates.
    async fn seed_rates(&self, table: &RateTable) -> Result<()> {
        for (currency, rate) in table.iter() {
            self.put_rate(currency, rate).await?;
        }
        Ok(())
    }
}
