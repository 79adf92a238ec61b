use std::sync::Arc;

use anyhow::Result;
use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Table, row};

use farmhand_service::caches::icons::DEFAULT_ICON;

/// Icons inline entire SVG documents; keep table rows readable.
const MAX_ICON_WIDTH: usize = 64;

fn shorten(icon: &str) -> String {
    if icon.chars().count() <= MAX_ICON_WIDTH {
        return icon.to_owned();
    }
    let prefix: String = icon.chars().take(MAX_ICON_WIDTH).collect();
    format!("{prefix}...")
}

fn source(icon: &str) -> &'static str {
    if icon == DEFAULT_ICON { "fallback" } else { "catalog" }
}

pub fn print_table(slugs: &[String], icons: &[Arc<str>]) {
    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);
    table.set_titles(row![b => "Slug", "Source", "Icon"]);

    for (slug, icon) in slugs.iter().zip(icons) {
        table.add_row(row![slug, source(icon), shorten(icon)]);
    }

    table.printstd();
}

pub fn print_json(slugs: &[String], icons: &[Arc<str>]) -> Result<()> {
    let entries: Vec<_> = slugs
        .iter()
        .zip(icons)
        .map(|(slug, icon)| {
            serde_json::json!({
                "slug": slug,
                "source": source(icon),
                "icon": icon.as_ref(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
