use crate::core::models::{CurrencyRate, SuperThanks, Video};
use crate::core::store::TipStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

const VIDEOS: &str = "videos";
const TIPS: &str = "tips";
const RATES: &str = "rates";

/// Tips of one video share the `<video_id>\0` key prefix.
fn tip_prefix(video_id: &str) -> String {
    format!("{video_id}\0")
}

fn tip_key(video_id: &str, index: usize) -> String {
    format!("{video_id}\0{index:06}")
}

/// Persistent store backed by a fjall keyspace with one partition per record kind.
pub struct FjallStore {
    keyspace: Keyspace,
    videos: PartitionHandle,
    tips: PartitionHandle,
    rates: PartitionHandle,
}

impl FjallStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let videos = keyspace.open_partition(VIDEOS, PartitionCreateOptions::default())?;
        let tips = keyspace.open_partition(TIPS, PartitionCreateOptions::default())?;
        let rates = keyspace.open_partition(RATES, PartitionCreateOptions::default())?;
        debug!("Opened store at {}", path.display());

        Ok(Self {
            keyspace,
            videos,
            tips,
            rates,
        })
    }

    fn decode_all<T, K, V>(iter: impl Iterator<Item = fjall::Result<(K, V)>>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        V: AsRef<[u8]>,
    {
        iter.map(|item| -> Result<T> {
            let (_, value) = item?;
            Ok(serde_json::from_slice(value.as_ref())?)
        })
        .collect()
    }
}

#[async_trait]
impl TipStore for FjallStore {
    async fn save_video(&self, video: &Video) -> Result<()> {
        self.videos
            .insert(video.video_id.as_str(), serde_json::to_vec(video)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Saved video {}", video.video_id);
        Ok(())
    }

    async fn replace_tips(&self, video_id: &str, tips: &[SuperThanks]) -> Result<()> {
        let mut batch = self.keyspace.batch();
        let mut removed = 0;
        for item in self.tips.prefix(tip_prefix(video_id)) {
            let (key, _) = item?;
            batch.remove(&self.tips, key);
            removed += 1;
        }
        for (index, tip) in tips.iter().enumerate() {
            batch.insert(&self.tips, tip_key(video_id, index), serde_json::to_vec(tip)?);
        }
        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(
            "Replaced {} tips of {} with {}",
            removed,
            video_id,
            tips.len()
        );
        Ok(())
    }

    async fn videos(&self) -> Result<Vec<Video>> {
        Self::decode_all(self.videos.iter())
    }

    async fn tips(&self, video_id: Option<&str>) -> Result<Vec<SuperThanks>> {
        match video_id {
            Some(id) => Self::decode_all(self.tips.prefix(tip_prefix(id))),
            None => Self::decode_all(self.tips.iter()),
        }
    }

    async fn put_rate(&self, currency: &str, rate: f64) -> Result<()> {
        let record = CurrencyRate {
            currency: currency.to_string(),
            rate,
            last_updated: Utc::now(),
        };
        self.rates.insert(currency, serde_json::to_vec(&record)?)?;
        Ok(())
    }

    async fn rates(&self) -> Result<Vec<CurrencyRate>> {
        Self::decode_all(self.rates.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::{RateLookup, RateTable};
    use tempfile::tempdir;

    fn video(id: &str) -> Video {
        Video {
            video_id: id.to_string(),
            video_url: format!("https://www.youtube.com/watch?v={id}"),
            title: Some(format!("Video {id}")),
            channel: Some("Channel".to_string()),
            scrape_date: Utc::now(),
        }
    }

    fn tip(video_id: &str, amount: f64) -> SuperThanks {
        SuperThanks {
            video_id: video_id.to_string(),
            currency: "US$".to_string(),
            amount,
            amount_converted: amount * 32.95,
            commenter_name: "alice".to_string(),
            comment_text: "hi".to_string(),
            comment_date: Utc::now(),
            scrape_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_fjall_store_videos() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();

        assert!(store.videos().await.unwrap().is_empty());

        store.save_video(&video("a")).await.unwrap();
        store.save_video(&video("b")).await.unwrap();
        let mut updated = video("a");
        updated.title = Some("Renamed".to_string());
        store.save_video(&updated).await.unwrap();

        let videos = store.videos().await.unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].title.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_fjall_store_replace_tips() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();

        store
            .replace_tips("a", &[tip("a", 1.0), tip("a", 2.0), tip("a", 3.0)])
            .await
            .unwrap();
        store.replace_tips("ab", &[tip("ab", 9.0)]).await.unwrap();
        store.replace_tips("a", &[tip("a", 5.0)]).await.unwrap();

        let a = store.tips(Some("a")).await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].amount, 5.0);
        assert_eq!(store.tips(Some("ab")).await.unwrap().len(), 1);
        assert_eq!(store.tips(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fjall_store_rates() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();
        store.seed_rates(&RateTable::with_defaults()).await.unwrap();
        store.put_rate("US$", 31.5).await.unwrap();

        assert_eq!(store.rates().await.unwrap().len(), 18);
        let table = store.rate_table().await.unwrap();
        assert_eq!(table.rate("US$"), Some(31.5));
        assert_eq!(table.rate("¥"), Some(0.22));
        assert_eq!(table.rate("ZZZ"), None);
    }
}
