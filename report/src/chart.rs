use std::sync::Arc;

use html_escape::encode_text;
use num_format::{Locale, ToFormattedString};
use usvg::{fontdb, Options, Tree};

use crate::ReportRow;

const WIDTH: u32 = 900;
const LABEL_WIDTH: u32 = 220;
const BAR_AREA: u32 = 560;
const ROW_HEIGHT: u32 = 28;
const BAR_HEIGHT: u32 = 20;
const TOP: u32 = 56;
const BOTTOM: u32 = 24;
const BAR_COLOR: &str = "#4c78a8";

/// Horizontal bar chart with one bar per user in rank order.
pub fn render_svg(title: &str, rows: &[ReportRow]) -> String {
    let height = TOP + ROW_HEIGHT * rows.len().max(1) as u32 + BOTTOM;
    let max_total = rows.iter().map(|row| row.total).max().unwrap_or(0);

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" font-family="DejaVu Sans, Arial, Helvetica, sans-serif">
<rect width="100%" height="100%" fill="#ffffff"/>
<text x="{x}" y="32" font-size="20" font-weight="bold" fill="#222222">{title}</text>
"##,
        x = WIDTH / 2 - BAR_AREA / 2,
        title = encode_text(title),
    );

    if rows.is_empty() {
        svg.push_str(&format!(
            r##"<text x="{LABEL_WIDTH}" y="{y}" font-size="14" fill="#666666">No contributions</text>
"##,
            y = TOP + BAR_HEIGHT - 4,
        ));
    }

    for (index, row) in rows.iter().enumerate() {
        let y = TOP + ROW_HEIGHT * index as u32;
        let width = bar_width(row.total, max_total);
        svg.push_str(&format!(
            r##"<text x="{label_x}" y="{text_y}" font-size="14" text-anchor="end" fill="#222222">#{rank} {login}</text>
<rect x="{LABEL_WIDTH}" y="{y}" width="{width}" height="{BAR_HEIGHT}" fill="{BAR_COLOR}"/>
<text x="{value_x}" y="{text_y}" font-size="13" fill="#222222">{total}</text>
"##,
            label_x = LABEL_WIDTH - 8,
            text_y = y + BAR_HEIGHT - 5,
            rank = row.rank,
            login = encode_text(&row.login),
            value_x = LABEL_WIDTH + width + 6,
            total = row.total.to_formatted_string(&Locale::en),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn bar_width(total: u64, max_total: u64) -> u32 {
    if max_total == 0 {
        return 0;
    }
    (total as f64 / max_total as f64 * BAR_AREA as f64).round() as u32
}

pub fn svg_to_png(svg: &str, fontdb: Arc<fontdb::Database>) -> anyhow::Result<Vec<u8>> {
    let tree = Tree::from_str(
        svg,
        &Options {
            fontdb,
            ..Default::default()
        },
    )?;

    let pixmap_size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(pixmap_size.width(), pixmap_size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to create pixmap"))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap.encode_png()?)
}

pub fn system_fonts() -> Arc<fontdb::Database> {
    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();
    Arc::new(fontdb)
}
