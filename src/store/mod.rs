pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::currency::RateTable;
use crate::core::store::TipStore;
use anyhow::Result;
use disk::FjallStore;
use std::sync::Arc;
use tracing::debug;

/// Opens the persistent store under the configured data path and seeds the
/// rate table (built-in defaults overlaid with configured rates).
pub async fn open(config: &AppConfig) -> Result<Arc<dyn TipStore>> {
    let path = config.data_path()?;
    let store: Arc<dyn TipStore> = Arc::new(FjallStore::open(&path.join("store"))?);

    let table = config.rate_table()?;
    store.seed_rates(&table).await?;
    debug!("Seeded {} rates", table.len());

    Ok(store)
}

/// Same seeding as [`open`], without touching disk.
pub async fn open_in_memory(config: &AppConfig) -> Result<Arc<dyn TipStore>> {
    let store: Arc<dyn TipStore> = Arc::new(memory::MemoryStore::new());
    let table: RateTable = config.rate_table()?;
    store.seed_rates(&table).await?;
    Ok(store)
}
