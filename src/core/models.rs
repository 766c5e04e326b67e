use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub video_url: String,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub scrape_date: DateTime<Utc>,
}

impl Video {
    /// Title for display, falling back to the id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.video_id)
    }
}

/// One resolved Super Thanks tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperThanks {
    pub video_id: String,
    pub currency: String,
    pub amount: f64,
    pub amount_converted: f64,
    pub commenter_name: String,
    pub comment_text: String,
    pub comment_date: DateTime<Utc>,
    pub scrape_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub currency: String,
    pub rate: f64,
    pub last_updated: DateTime<Utc>,
}
