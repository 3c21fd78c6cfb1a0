use comfy_table::{presets::UTF8_FULL, CellAlignment, ContentArrangement, Table};

use crate::{csv_report::HEADER, ReportRow};

pub fn render_table(title: &str, rows: &[ReportRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(std::iter::once("Rank").chain(HEADER));

    for row in rows {
        table.add_row(vec![
            format!("#{}", row.rank),
            row.login.clone(),
            row.activity.pr_feature_fix.to_string(),
            row.activity.pr_doc.to_string(),
            row.activity.pr_typo.to_string(),
            row.activity.issue_feature_fix.to_string(),
            row.activity.issue_doc.to_string(),
            format!("{:.2}%", row.rates.pr_rate),
            format!("{:.2}%", row.rates.is_rate),
            row.total.to_string(),
        ]);
    }

    for index in 2..=HEADER.len() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    format!("{title}\n{table}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{report_rows, target::tests::sample_scores};

    #[test]
    fn table_lists_ranked_users() {
        let table = render_table("near/core", &report_rows(&sample_scores()));
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], "near/core");
        assert!(table.contains("f/b_issue"));

        let alice = lines.iter().position(|line| line.contains("alice")).unwrap();
        let carol = lines.iter().position(|line| line.contains("carol")).unwrap();
        assert!(alice < carol);
        assert!(lines[alice].contains("#1"));
        assert!(lines[alice].contains("75.00%"));
    }

    #[test]
    fn empty_table_keeps_header() {
        let table = render_table("total", &[]);
        assert!(table.contains("Rank"));
        assert!(table.contains("total"));
    }
}
