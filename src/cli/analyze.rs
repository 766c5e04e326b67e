use super::{stats, ui};
use crate::core::aggregator::AggregateReport;
use crate::core::analysis::{VideoAnalysis, analyze_capture};
use crate::core::capture;
use crate::core::config::AppConfig;
use crate::core::parser::AmountParser;
use crate::core::stats::database_stats;
use crate::core::store::TipStore;
use anyhow::{Result, bail};
use comfy_table::Cell;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

impl AggregateReport {
    pub fn display_as_table(&self, canonical_currency: &str) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Total"),
            ui::header_cell("Rate"),
            ui::header_cell(&format!("Converted ({canonical_currency})")),
        ]);

        for line in &self.lines {
            table.add_row(vec![
                Cell::new(&line.currency),
                ui::amount_cell(line.total),
                Cell::new(line.rate),
                ui::amount_cell(line.converted),
            ]);
        }

        let mut output = table.to_string();
        output.push_str(&format!(
            "\n\nResolved Super Thanks: {}\nExamined fragments: {}\nTotal ({}): {}",
            self.resolved_count,
            self.examined_count,
            ui::style_text(canonical_currency, ui::StyleType::TotalLabel),
            ui::style_text(&format!("{:.1}", self.grand_total), ui::StyleType::TotalValue)
        ));
        output
    }
}

impl VideoAnalysis {
    pub fn display(&self, canonical_currency: &str) -> String {
        let channel = self.video.channel.as_deref().unwrap_or("unknown channel");
        let mut output = format!(
            "Video: {} {}\n\n",
            ui::style_text(self.video.display_title(), ui::StyleType::Title),
            ui::style_text(&format!("({channel})"), ui::StyleType::Subtle)
        );
        if self.tips.is_empty() {
            output.push_str(&ui::style_text("No Super Thanks found", ui::StyleType::Error));
        } else {
            output.push_str(&self.report.display_as_table(canonical_currency));
        }
        output
    }
}

/// Analyses each capture, stores its video and tips, and prints the reports.
///
/// Captures that fail to load are logged and skipped; the command fails only
/// when none could be processed.
pub async fn run(
    captures: &[PathBuf],
    config: &AppConfig,
    store: &dyn TipStore,
) -> Result<Vec<VideoAnalysis>> {
    let started = Instant::now();
    let parser = AmountParser::new();
    let rates = store.rate_table().await?;
    let options = config.analysis_options();
    let canonical = config.canonical_currency.as_str();

    let mut analyses = Vec::new();
    for (path, loaded) in captures.iter().zip(capture::load_all(captures).await) {
        let page = match loaded {
            Ok(page) => page,
            Err(e) => {
                error!("Skipping {}: {:#}", path.display(), e);
                continue;
            }
        };

        let pb = ui::new_progress_bar(page.fragments.len() as u64);
        pb.set_message("Resolving Super Thanks...");
        let analysis = analyze_capture(&page, &parser, &rates, options, &|| pb.inc(1))?;
        pb.finish_and_clear();

        store.save_video(&analysis.video).await?;
        store
            .replace_tips(&analysis.video.video_id, &analysis.tips)
            .await?;
        info!(
            "Stored {} Super Thanks for {}",
            analysis.tips.len(),
            analysis.video.video_id
        );

        if !analyses.is_empty() {
            ui::print_separator();
        }
        println!("{}", analysis.display(canonical));

        let videos = store.videos().await?;
        let tips = store.tips(None).await?;
        let summary = database_stats(&videos, &tips, Some(&analysis.video.video_id));
        println!("\n{}", stats::display_stats(&summary, canonical));

        analyses.push(analysis);
    }

    if analyses.is_empty() && !captures.is_empty() {
        bail!("None of the {} capture files could be processed", captures.len());
    }

    info!("Finished in {:.2?}", started.elapsed());
    Ok(analyses)
}
