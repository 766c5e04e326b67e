use super::ui;
use crate::core::stats::{DatabaseStats, currency_breakdown, database_stats};
use crate::core::store::TipStore;
use anyhow::Result;
use comfy_table::Cell;

pub fn display_stats(stats: &DatabaseStats, canonical_currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Statistic"), ui::header_cell("Value")]);

    table.add_row(vec![
        Cell::new("Videos"),
        ui::count_cell(stats.total_videos),
    ]);
    table.add_row(vec![
        Cell::new("Super Thanks"),
        ui::count_cell(stats.total_tips),
    ]);
    table.add_row(vec![
        Cell::new(format!("Total ({canonical_currency})")),
        ui::total_cell(stats.total_converted),
    ]);

    if let Some((count, total)) = stats.video {
        table.add_row(vec![Cell::new("This video: Super Thanks"), ui::count_cell(count)]);
        table.add_row(vec![
            Cell::new(format!("This video: total ({canonical_currency})")),
            ui::amount_cell(total),
        ]);
    }

    match &stats.most_tipped {
        Some(t) => table.add_row(vec![
            Cell::new("Most Super Thanks"),
            Cell::new(format!("{} ({})", t.title, t.count)),
        ]),
        None => table.add_row(vec![Cell::new("Most Super Thanks"), ui::na_cell()]),
    };
    match &stats.top_earning {
        Some(t) => table.add_row(vec![
            Cell::new("Highest total"),
            Cell::new(format!(
                "{} ({:.1} {canonical_currency})",
                t.title, t.total_converted
            )),
        ]),
        None => table.add_row(vec![Cell::new("Highest total"), ui::na_cell()]),
    };

    format!(
        "{}\n\n{}",
        ui::style_text("Database statistics", ui::StyleType::Title),
        table
    )
}

pub async fn run(store: &dyn TipStore, video_id: Option<&str>, canonical: &str) -> Result<()> {
    let videos = store.videos().await?;
    let tips = store.tips(None).await?;
    println!(
        "{}",
        display_stats(&database_stats(&videos, &tips, video_id), canonical)
    );
    Ok(())
}

/// Per-currency counts and totals over every stored tip.
pub async fn run_currencies(store: &dyn TipStore, canonical: &str) -> Result<()> {
    let tips = store.tips(None).await?;
    let breakdown = currency_breakdown(&tips);
    if breakdown.is_empty() {
        println!("{}", ui::style_text("No Super Thanks stored yet", ui::StyleType::Subtle));
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Count"),
        ui::header_cell("Total"),
        ui::header_cell(&format!("Total ({canonical})")),
    ]);
    for stat in &breakdown {
        table.add_row(vec![
            Cell::new(&stat.currency),
            ui::count_cell(stat.count),
            ui::amount_cell(stat.total),
            ui::amount_cell(stat.total_converted),
        ]);
    }
    println!("{table}");
    Ok(())
}
