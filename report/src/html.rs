use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;

use crate::{csv_report::HEADER, ReportRow};

/// Rendered content of one tab of the HTML report.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlTab {
    pub label: String,
    pub title: String,
    pub rows: Vec<ReportRow>,
    pub chart_png: Option<Vec<u8>>,
}

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; background: #f5f6f8; color: #222; }
header { background: #24292f; color: #fff; padding: 16px 24px; }
header p { margin: 4px 0 0; color: #c9d1d9; font-size: 13px; }
.tabs { display: flex; flex-wrap: wrap; gap: 4px; padding: 12px 24px 0; }
.tabs button { border: 1px solid #d0d7de; border-bottom: none; background: #eaeef2; padding: 8px 14px; cursor: pointer; border-radius: 6px 6px 0 0; }
.tabs button.active { background: #fff; font-weight: bold; }
.tab { display: none; background: #fff; margin: 0 24px 24px; padding: 16px; border: 1px solid #d0d7de; }
.tab.active { display: block; }
table { border-collapse: collapse; width: 100%; margin-bottom: 16px; }
th, td { border: 1px solid #d0d7de; padding: 6px 10px; text-align: right; }
th:nth-child(2), td:nth-child(2) { text-align: left; }
th { background: #f6f8fa; }
img { max-width: 100%; }
"#;

const SCRIPT: &str = r#"
function showTab(id) {
    document.querySelectorAll('.tab').forEach(t => t.classList.toggle('active', t.id === id));
    document.querySelectorAll('.tabs button').forEach(b => b.classList.toggle('active', b.dataset.tab === id));
}
"#;

/// Single page with one tab per entry of `tabs`, in the given order. The first
/// tab is shown initially.
pub fn render_html(title: &str, tabs: &[HtmlTab]) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{CSS}</style>
<script>{SCRIPT}</script>
</head>
<body>
<header>
<h1>{title}</h1>
<p>Generated {generated}</p>
</header>
"#,
        title = encode_text(title),
        generated = Utc::now().format("%Y-%m-%d %H:%M UTC"),
    ));

    html.push_str("<nav class=\"tabs\">\n");
    for (index, tab) in tabs.iter().enumerate() {
        html.push_str(&format!(
            "<button class=\"{class}\" data-tab=\"tab-{index}\" onclick=\"showTab('tab-{index}')\">{label}</button>\n",
            class = if index == 0 { "active" } else { "" },
            label = encode_text(&tab.title),
        ));
    }
    html.push_str("</nav>\n");

    for (index, tab) in tabs.iter().enumerate() {
        html.push_str(&render_tab(index, tab));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_tab(index: usize, tab: &HtmlTab) -> String {
    let header = std::iter::once("Rank")
        .chain(HEADER)
        .map(|name| format!("<th>{}</th>", encode_text(name)))
        .join("");

    let body = tab
        .rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>#{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td><td>{:.2}%</td><td>{}</td></tr>",
                row.rank,
                encode_text(&row.login),
                row.activity.pr_feature_fix,
                row.activity.pr_doc,
                row.activity.pr_typo,
                row.activity.issue_feature_fix,
                row.activity.issue_doc,
                row.rates.pr_rate,
                row.rates.is_rate,
                row.total,
            )
        })
        .join("\n");

    let chart = tab
        .chart_png
        .as_ref()
        .map(|png| {
            format!(
                "<img alt=\"{} chart\" src=\"data:image/png;base64,{}\">\n",
                encode_double_quoted_attribute(&tab.title),
                STANDARD.encode(png)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<section class="tab{active}" id="tab-{index}" data-label="{label}">
<h2>{title}</h2>
<table>
<thead><tr>{header}</tr></thead>
<tbody>
{body}
</tbody>
</table>
{chart}</section>
"#,
        active = if index == 0 { " active" } else { "" },
        label = encode_double_quoted_attribute(&tab.label),
        title = encode_text(&tab.title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{report_rows, target::tests::sample_scores};

    fn tab(label: &str, title: &str) -> HtmlTab {
        HtmlTab {
            label: label.to_string(),
            title: title.to_string(),
            rows: report_rows(&sample_scores()),
            chart_png: Some(vec![1, 2, 3]),
        }
    }

    #[test]
    fn one_tab_per_entry_in_order() {
        let html = render_html(
            "Contributor scores",
            &[tab("near_core", "near/core"), tab("total", "total")],
        );

        assert_eq!(html.matches("<section class=\"tab").count(), 2);
        assert!(html.contains(r#"<section class="tab active" id="tab-0" data-label="near_core">"#));
        assert!(html.contains(r#"<section class="tab" id="tab-1" data-label="total">"#));
        assert!(html.find(">near/core</button>").unwrap() < html.find(">total</button>").unwrap());
        assert!(html.contains("data:image/png;base64,AQID"));
        assert!(html.contains("<td>#1</td><td>alice</td>"));
        assert!(html.contains("<td>75.00%</td>"));
    }

    #[test]
    fn escapes_user_text() {
        let mut tab = tab("x", "<b>repo</b>");
        tab.rows[0].login = "a&b".to_string();
        let html = render_html("t", &[tab]);
        assert!(html.contains("&lt;b&gt;repo&lt;/b&gt;"));
        assert!(html.contains("<td>a&amp;b</td>"));
        assert!(!html.contains("<b>repo</b>"));
    }
}
