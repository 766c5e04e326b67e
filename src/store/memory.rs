use crate::core::models::{CurrencyRate, SuperThanks, Video};
use crate::core::store::TipStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct Tables {
    videos: BTreeMap<String, Video>,
    tips: BTreeMap<String, Vec<SuperThanks>>,
    rates: BTreeMap<String, CurrencyRate>,
}

/// In-memory store with the same ordering as the disk store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TipStore for MemoryStore {
    async fn save_video(&self, video: &Video) -> Result<()> {
        let mut tables = self.inner.lock().await;
        tables.videos.insert(video.video_id.clone(), video.clone());
        debug!("Saved video {}", video.video_id);
        Ok(())
    }

    async fn replace_tips(&self, video_id: &str, tips: &[SuperThanks]) -> Result<()> {
        let mut tables = self.inner.lock().await;
        tables.tips.insert(video_id.to_string(), tips.to_vec());
        Ok(())
    }

    async fn videos(&self) -> Result<Vec<Video>> {
        let tables = self.inner.lock().await;
        Ok(tables.videos.values().cloned().collect())
    }

    async fn tips(&self, video_id: Option<&str>) -> Result<Vec<SuperThanks>> {
        let tables = self.inner.lock().await;
        Ok(match video_id {
            Some(id) => tables.tips.get(id).cloned().unwrap_or_default(),
            None => tables.tips.values().flatten().cloned().collect(),
        })
    }

    async fn put_rate(&self, currency: &str, rate: f64) -> Result<()> {
        let mut tables = self.inner.lock().await;
        tables.rates.insert(
            currency.to_string(),
            CurrencyRate {
                currency: currency.to_string(),
                rate,
                last_updated: Utc::now(),
            },
        );
        Ok(())
    }

    async fn rates(&self) -> Result<Vec<CurrencyRate>> {
        let tables = self.inner.lock().await;
        Ok(tables.rates.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::{RateLookup, RateTable};

    fn tip(video_id: &str, amount: f64) -> SuperThanks {
        SuperThanks {
            video_id: video_id.to_string(),
            currency: "¥".to_string(),
            amount,
            amount_converted: amount * 0.22,
            commenter_name: "bob".to_string(),
            comment_text: String::new(),
            comment_date: Utc::now(),
            scrape_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_store_replace_tips() {
        let store = MemoryStore::new();
        store
            .replace_tips("a", &[tip("a", 100.0), tip("a", 200.0)])
            .await
            .unwrap();
        store.replace_tips("b", &[tip("b", 300.0)]).await.unwrap();
        assert_eq!(store.tips(None).await.unwrap().len(), 3);

        store.replace_tips("a", &[]).await.unwrap();
        assert!(store.tips(Some("a")).await.unwrap().is_empty());
        assert!(store.tips(Some("missing")).await.unwrap().is_empty());
        assert_eq!(store.tips(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_rate_table() {
        let store = MemoryStore::new();
        store.seed_rates(&RateTable::with_defaults()).await.unwrap();
        store.put_rate("KRW", 0.024).await.unwrap();

        let table = store.rate_table().await.unwrap();
        assert_eq!(table.rate("KRW"), Some(0.024));
        assert_eq!(table.rate("€"), Some(35.7));
    }
}
