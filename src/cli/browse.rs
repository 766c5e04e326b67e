use super::ui;
use crate::core::currency::iso_code;
use crate::core::parser::{AmountParser, Resolution};
use crate::core::stats::top_commenters;
use crate::core::store::TipStore;
use crate::core::video::extract_video_id;
use anyhow::Result;
use comfy_table::Cell;

pub async fn run_videos(store: &dyn TipStore) -> Result<()> {
    let videos = store.videos().await?;
    if videos.is_empty() {
        println!("{}", ui::style_text("No videos stored yet", ui::StyleType::Subtle));
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Video ID"),
        ui::header_cell("Title"),
        ui::header_cell("Channel"),
        ui::header_cell("Scraped"),
    ]);
    for video in &videos {
        table.add_row(vec![
            Cell::new(&video.video_id),
            Cell::new(video.display_title()),
            video.channel.as_deref().map_or_else(ui::na_cell, Cell::new),
            Cell::new(video.scrape_date.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Lists one video's tips, largest converted amount first, then its top commenters.
pub async fn run_tips(store: &dyn TipStore, video: &str, canonical: &str) -> Result<()> {
    let video_id = extract_video_id(video);
    let mut tips = store.tips(Some(&video_id)).await?;
    if tips.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("No Super Thanks stored for {video_id}"),
                ui::StyleType::Error
            )
        );
        return Ok(());
    }
    tips.sort_by(|a, b| b.amount_converted.total_cmp(&a.amount_converted));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Commenter"),
        ui::header_cell("Amount"),
        ui::header_cell(&format!("Converted ({canonical})")),
        ui::header_cell("Comment"),
    ]);
    for tip in &tips {
        table.add_row(vec![
            Cell::new(&tip.commenter_name),
            Cell::new(format!("{} {:.2}", tip.currency, tip.amount)),
            ui::amount_cell(tip.amount_converted),
            Cell::new(&tip.comment_text),
        ]);
    }
    println!(
        "Super Thanks for {}\n\n{table}",
        ui::style_text(&video_id, ui::StyleType::Title)
    );

    let mut top = ui::new_styled_table();
    top.set_header(vec![
        ui::header_cell("Top commenters"),
        ui::header_cell("Count"),
        ui::header_cell(&format!("Total ({canonical})")),
    ]);
    for stat in top_commenters(&tips, 10) {
        top.add_row(vec![
            Cell::new(&stat.name),
            ui::count_cell(stat.count),
            ui::amount_cell(stat.total_converted),
        ]);
    }
    println!("\n{top}");
    Ok(())
}

pub async fn run_rates(store: &dyn TipStore, canonical: &str) -> Result<()> {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("ISO"),
        ui::header_cell(&format!("Rate ({canonical})")),
        ui::header_cell("Updated"),
    ]);
    for rate in store.rates().await? {
        table.add_row(vec![
            Cell::new(&rate.currency),
            iso_code(&rate.currency).map_or_else(ui::na_cell, Cell::new),
            Cell::new(rate.rate),
            Cell::new(rate.last_updated.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// One-line description of how `text` resolves.
pub fn describe_resolution(text: &str) -> String {
    match AmountParser::new().resolve(text) {
        Resolution::Resolved(p) => {
            let iso = iso_code(&p.currency).unwrap_or("unknown");
            format!("{} {} ({iso})", p.currency, p.amount)
        }
        Resolution::NoMatch => "no match".to_string(),
    }
}

pub fn run_parse(text: &str) -> Result<()> {
    println!("{}", describe_resolution(text));
    Ok(())
}
