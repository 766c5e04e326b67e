//! Aggregations over stored videos and tips.
use crate::core::models::{SuperThanks, Video};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoTally {
    pub video_id: String,
    pub title: String,
    pub count: usize,
    pub total_converted: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseStats {
    pub total_videos: usize,
    pub total_tips: usize,
    pub total_converted: f64,
    /// Count and converted total for the requested video.
    pub video: Option<(usize, f64)>,
    pub most_tipped: Option<VideoTally>,
    pub top_earning: Option<VideoTally>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyStat {
    pub currency: String,
    pub count: usize,
    pub total: f64,
    pub total_converted: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommenterStat {
    pub name: String,
    pub count: usize,
    pub total_converted: f64,
}

fn by_converted_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn video_tallies(videos: &[Video], tips: &[SuperThanks]) -> Vec<VideoTally> {
    let mut tallies: Vec<VideoTally> = videos
        .iter()
        .map(|v| VideoTally {
            video_id: v.video_id.clone(),
            title: v.display_title().to_string(),
            count: 0,
            total_converted: 0.0,
        })
        .collect();

    for tip in tips {
        if let Some(t) = tallies.iter_mut().find(|t| t.video_id == tip.video_id) {
            t.count += 1;
            t.total_converted += tip.amount_converted;
        }
    }

    tallies.retain(|t| t.count > 0);
    tallies
}

pub fn database_stats(
    videos: &[Video],
    tips: &[SuperThanks],
    video_id: Option<&str>,
) -> DatabaseStats {
    let tallies = video_tallies(videos, tips);

    let video = video_id.map(|id| {
        tips.iter()
            .filter(|t| t.video_id == id)
            .fold((0, 0.0), |(n, sum), t| (n + 1, sum + t.amount_converted))
    });

    // Ties go to the first video in storage order.
    let most_tipped = tallies
        .iter()
        .fold(None::<&VideoTally>, |best, t| match best {
            Some(b) if b.count >= t.count => Some(b),
            _ => Some(t),
        })
        .cloned();
    let top_earning = tallies
        .iter()
        .fold(None::<&VideoTally>, |best, t| match best {
            Some(b) if b.total_converted >= t.total_converted => Some(b),
            _ => Some(t),
        })
        .cloned();

    DatabaseStats {
        total_videos: videos.len(),
        total_tips: tips.len(),
        total_converted: tips.iter().map(|t| t.amount_converted).sum(),
        video,
        most_tipped,
        top_earning,
    }
}

/// Per-currency count and totals, largest converted total first.
pub fn currency_breakdown(tips: &[SuperThanks]) -> Vec<CurrencyStat> {
    let mut by_currency: HashMap<&str, CurrencyStat> = HashMap::new();
    for tip in tips {
        let stat = by_currency
            .entry(tip.currency.as_str())
            .or_insert_with(|| CurrencyStat {
                currency: tip.currency.clone(),
                count: 0,
                total: 0.0,
                total_converted: 0.0,
            });
        stat.count += 1;
        stat.total += tip.amount;
        stat.total_converted += tip.amount_converted;
    }

    let mut stats: Vec<CurrencyStat> = by_currency.into_values().collect();
    stats.sort_by(|a, b| {
        by_converted_desc(a.total_converted, b.total_converted)
            .then_with(|| a.currency.cmp(&b.currency))
    });
    stats
}

/// The `limit` commenters with the largest converted totals.
pub fn top_commenters(tips: &[SuperThanks], limit: usize) -> Vec<CommenterStat> {
    let mut by_name: HashMap<&str, CommenterStat> = HashMap::new();
    for tip in tips {
        let stat = by_name
            .entry(tip.commenter_name.as_str())
            .or_insert_with(|| CommenterStat {
                name: tip.commenter_name.clone(),
                count: 0,
                total_converted: 0.0,
            });
        stat.count += 1;
        stat.total_converted += tip.amount_converted;
    }

    let mut stats: Vec<CommenterStat> = by_name.into_values().collect();
    stats.sort_by(|a, b| {
        by_converted_desc(a.total_converted, b.total_converted).then_with(|| a.name.cmp(&b.name))
    });
    stats.truncate(limit);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn video(id: &str, title: Option<&str>) -> Video {
        Video {
            video_id: id.to_string(),
            video_url: format!("https://www.youtube.com/watch?v={id}"),
            title: title.map(str::to_string),
            channel: None,
            scrape_date: Utc::now(),
        }
    }

    fn tip(video_id: &str, currency: &str, amount: f64, converted: f64, who: &str) -> SuperThanks {
        SuperThanks {
            video_id: video_id.to_string(),
            currency: currency.to_string(),
            amount,
            amount_converted: converted,
            commenter_name: who.to_string(),
            comment_text: String::new(),
            comment_date: Utc::now(),
            scrape_date: Utc::now(),
        }
    }

    fn fixture() -> (Vec<Video>, Vec<SuperThanks>) {
        let videos = vec![video("a", Some("First")), video("b", None), video("c", None)];
        let tips = vec![
            tip("a", "US$", 5.0, 164.75, "alice"),
            tip("a", "¥", 100.0, 22.0, "bob"),
            tip("a", "$", 75.0, 75.0, "alice"),
            tip("b", "US$", 20.0, 659.0, "carol"),
        ];
        (videos, tips)
    }

    #[test]
    fn test_database_stats() {
        let (videos, tips) = fixture();
        let stats = database_stats(&videos, &tips, Some("a"));

        assert_eq!(stats.total_videos, 3);
        assert_eq!(stats.total_tips, 4);
        assert!((stats.total_converted - 920.75).abs() < 1e-9);

        let (count, total) = stats.video.unwrap();
        assert_eq!(count, 3);
        assert!((total - 261.75).abs() < 1e-9);

        assert_eq!(stats.most_tipped.unwrap().title, "First");
        let top = stats.top_earning.unwrap();
        assert_eq!(top.video_id, "b");
        assert_eq!(top.title, "b");
    }

    #[test]
    fn test_database_stats_empty() {
        let stats = database_stats(&[], &[], None);
        assert_eq!(stats.total_tips, 0);
        assert!(stats.video.is_none());
        assert!(stats.most_tipped.is_none());
        assert!(stats.top_earning.is_none());
    }

    #[test]
    fn test_currency_breakdown_orders_by_converted_total() {
        let (_, tips) = fixture();
        let breakdown = currency_breakdown(&tips);
        let order: Vec<&str> = breakdown.iter().map(|s| s.currency.as_str()).collect();
        assert_eq!(order, vec!["US$", "$", "¥"]);
        assert_eq!(breakdown[0].count, 2);
        assert!((breakdown[0].total - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_commenters() {
        let (_, tips) = fixture();
        let top = top_commenters(&tips, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "carol");
        assert_eq!(top[1].name, "alice");
        assert_eq!(top[1].count, 2);
        assert!((top[1].total_converted - 239.75).abs() < 1e-9);
    }
}
