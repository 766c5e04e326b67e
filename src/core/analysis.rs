//! Turns a page capture into stored tips and a converted report.
use crate::core::aggregator::{AggregateReport, CurrencyAggregator};
use crate::core::capture::PageCapture;
use crate::core::currency::{RateLookup, rate_or_identity};
use crate::core::models::{SuperThanks, Video};
use crate::core::parser::{AmountParser, ParsedAmount, Resolution};
use crate::core::video::{commenter_name, extract_video_id, video_url};
use anyhow::Result;
use chrono::Utc;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Drop tips that resolve to an amount of zero.
    pub skip_zero_amounts: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            skip_zero_amounts: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoAnalysis {
    pub video: Video,
    pub tips: Vec<SuperThanks>,
    pub report: AggregateReport,
}

/// Resolves every fragment of `capture` in page order.
///
/// Unresolvable fragments are counted as examined and otherwise skipped.
/// `progress` is called once per fragment.
pub fn analyze_capture(
    capture: &PageCapture,
    parser: &AmountParser,
    rates: &dyn RateLookup,
    options: AnalysisOptions,
    progress: &dyn Fn(),
) -> Result<VideoAnalysis> {
    let now = Utc::now();
    let video_id = extract_video_id(&capture.video);
    let video = Video {
        video_id: video_id.clone(),
        video_url: video_url(&capture.video),
        title: capture.title.clone(),
        channel: capture.channel.clone(),
        scrape_date: now,
    };

    let mut aggregator = CurrencyAggregator::new();
    let mut tips = Vec::new();

    for (index, fragment) in capture.fragments.iter().enumerate() {
        progress();
        aggregator.note_examined();

        let text = fragment.text.trim();
        if text.is_empty() {
            continue;
        }

        let ParsedAmount { currency, amount } = match parser.resolve(text) {
            Resolution::Resolved(parsed) => parsed,
            Resolution::NoMatch => {
                debug!("Fragment #{} did not resolve: {:?}", index + 1, text);
                continue;
            }
        };

        if amount == 0.0 && options.skip_zero_amounts {
            debug!("Skipping zero amount in fragment #{}", index + 1);
            continue;
        }

        aggregator.record(&currency, amount)?;

        let name = commenter_name(fragment.author.as_deref(), index);
        debug!(
            "Super Thanks #{}: {} {:.2} from {}",
            index + 1,
            currency,
            amount,
            name
        );

        tips.push(SuperThanks {
            video_id: video_id.clone(),
            amount_converted: amount * rate_or_identity(rates, &currency),
            currency,
            amount,
            commenter_name: name,
            comment_text: fragment
                .comment
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            comment_date: now,
            scrape_date: now,
        });
    }

    Ok(VideoAnalysis {
        video,
        tips,
        report: aggregator.summarize(rates),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capture::CapturedFragment;
    use crate::core::currency::RateTable;
    use std::cell::Cell;

    fn fragment(text: &str, author: Option<&str>) -> CapturedFragment {
        CapturedFragment {
            text: text.to_string(),
            author: author.map(str::to_string),
            comment: Some(" nice video ".to_string()),
        }
    }

    fn capture() -> PageCapture {
        PageCapture {
            video: "https://www.youtube.com/watch?v=abc123&t=1".to_string(),
            title: Some("Title".to_string()),
            channel: Some("Channel".to_string()),
            fragments: vec![
                fragment("US$ 5.00", Some("@alice")),
                fragment("  ", None),
                fragment("US$0.00", Some("@bob")),
                fragment("12345", None),
                fragment("¥1,200", None),
                fragment("US$3", Some("carol")),
            ],
        }
    }

    #[test]
    fn test_analyze_capture() {
        let calls = Cell::new(0);
        let analysis = analyze_capture(
            &capture(),
            &AmountParser::new(),
            &RateTable::with_defaults(),
            AnalysisOptions::default(),
            &|| calls.set(calls.get() + 1),
        )
        .unwrap();

        assert_eq!(calls.get(), 6);
        assert_eq!(analysis.video.video_id, "abc123");
        assert_eq!(analysis.video.video_url, "https://www.youtube.com/watch?v=abc123&t=1");

        assert_eq!(analysis.tips.len(), 3);
        assert_eq!(analysis.tips[0].commenter_name, "alice");
        assert_eq!(analysis.tips[0].comment_text, "nice video");
        assert_eq!(analysis.tips[1].commenter_name, "Unknown commenter #5");
        assert_eq!(analysis.tips[1].currency, "¥");
        assert!((analysis.tips[1].amount_converted - 264.0).abs() < 1e-9);

        let report = &analysis.report;
        assert_eq!(report.examined_count, 6);
        assert_eq!(report.resolved_count, 3);
        assert!((report.line("US$").unwrap().total - 8.0).abs() < 1e-9);
        assert!((report.grand_total - (8.0 * 32.95 + 264.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_amounts_kept_when_configured() {
        let analysis = analyze_capture(
            &capture(),
            &AmountParser::new(),
            &RateTable::with_defaults(),
            AnalysisOptions {
                skip_zero_amounts: false,
            },
            &|| {},
        )
        .unwrap();

        assert_eq!(analysis.tips.len(), 4);
        assert_eq!(analysis.report.resolved_count, 4);
        assert_eq!(analysis.tips[1].commenter_name, "bob");
    }
}
