//! Renders score sets as CSV, terminal tables, bar charts and a tabbed HTML page.

use std::{collections::BTreeSet, sync::Arc};

use shared::{RunStatistics, ScoreMap, ScoringPolicy};
use tracing::{debug, info};

mod chart;
mod csv_report;
mod format;
mod html;
mod table;
mod target;

pub use chart::{render_svg, svg_to_png, system_fonts};
pub use csv_report::{render_csv, render_state};
pub use format::{parse_formats, FormatError, OutputFormat};
pub use html::{render_html, HtmlTab};
pub use table::render_table;
pub use target::{report_rows, ReportRow, ReportTarget, TOTAL_LABEL};
pub use usvg::fontdb;

use csv_report::write_file;

/// Writes every selected artifact for one score set.
pub struct Reporter {
    formats: BTreeSet<OutputFormat>,
    policy: ScoringPolicy,
    fontdb: Arc<fontdb::Database>,
}

impl Reporter {
    pub fn new(
        formats: BTreeSet<OutputFormat>,
        policy: ScoringPolicy,
        fontdb: Arc<fontdb::Database>,
    ) -> Self {
        Self {
            formats,
            policy,
            fontdb,
        }
    }

    pub fn wants(&self, format: OutputFormat) -> bool {
        self.formats.contains(&format) || self.formats.contains(&OutputFormat::All)
    }

    /// Renders one repository or the total. Returns the tab to include in the
    /// HTML page when HTML output is selected.
    pub fn render(
        &self,
        target: &ReportTarget,
        title: &str,
        scores: &ScoreMap,
        statistics: Option<&RunStatistics>,
    ) -> anyhow::Result<Option<HtmlTab>> {
        let rows = report_rows(scores);
        debug!("Rendering {} rows for {}", rows.len(), target.label);

        if self.wants(OutputFormat::Text) {
            println!("{}", render_table(title, &rows));
        }

        if self.wants(OutputFormat::Csv) {
            let path = target.path("csv");
            write_file(&path, render_csv(&rows, self.policy, statistics)?.as_bytes())?;
            info!("Wrote {}", path.display());

            if let Some(statistics) = statistics {
                let path = target.state_path();
                write_file(&path, render_state(statistics)?.as_bytes())?;
                info!("Wrote {}", path.display());
            }
        }

        let chart_png = if self.wants(OutputFormat::Chart) || self.wants(OutputFormat::Html) {
            let svg = render_svg(title, &rows);
            let png = svg_to_png(&svg, self.fontdb.clone())?;
            if self.wants(OutputFormat::Chart) {
                write_file(&target.path("svg"), svg.as_bytes())?;
                write_file(&target.path("png"), &png)?;
                info!("Wrote {}", target.path("png").display());
            }
            Some(png)
        } else {
            None
        };

        Ok(self.wants(OutputFormat::Html).then(|| HtmlTab {
            label: target.label.clone(),
            title: title.to_string(),
            rows,
            chart_png,
        }))
    }

    /// Renders the aggregated scores and, with HTML output, the page holding
    /// `repo_tabs` followed by the total tab.
    pub fn render_total(
        &self,
        target: &ReportTarget,
        scores: &ScoreMap,
        statistics: Option<&RunStatistics>,
        repo_tabs: &[HtmlTab],
    ) -> anyhow::Result<()> {
        let total_tab = self.render(target, TOTAL_LABEL, scores, statistics)?;

        if let Some(total_tab) = total_tab {
            let tabs: Vec<HtmlTab> = repo_tabs.iter().cloned().chain([total_tab]).collect();
            let path = target.path("html");
            write_file(&path, render_html("Contributor scores", &tabs).as_bytes())?;
            info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shared::{ActivityRecord, RepoId, ScoreAnalyzer};

    use super::*;

    fn reporter(formats: &[&str]) -> Reporter {
        Reporter::new(
            parse_formats(formats).unwrap(),
            ScoringPolicy::Capped,
            Arc::new(fontdb::Database::new()),
        )
    }

    fn scores() -> ScoreMap {
        let mut activity = shared::ActivityMap::new();
        activity.insert("alice".to_string(), ActivityRecord::new(1, 0, 0, 1, 0));
        ScoreAnalyzer::default().score_all(&activity)
    }

    #[test]
    fn writes_only_selected_formats() {
        let dir = tempfile::tempdir().unwrap();
        let target = ReportTarget::repo(dir.path(), &RepoId::new("near", "core"));

        let tab = reporter(&["csv"])
            .render(&target, "near/core", &scores(), None)
            .unwrap();

        assert!(tab.is_none());
        assert!(target.path("csv").exists());
        assert!(!target.path("png").exists());
        assert!(!target.state_path().exists());
    }

    #[test]
    fn state_file_needs_csv_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = ReportTarget::repo(dir.path(), &RepoId::new("near", "core"));
        let statistics = RunStatistics {
            merged_prs: 2,
            ..Default::default()
        };

        reporter(&["text"])
            .render(&target, "near/core", &scores(), Some(&statistics))
            .unwrap();
        assert!(!target.state_path().exists());
        assert!(!target.path("csv").exists());

        reporter(&["csv"])
            .render(&target, "near/core", &scores(), Some(&statistics))
            .unwrap();
        assert!(target.state_path().exists());
    }

    #[test]
    fn all_formats_write_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let repo_target = ReportTarget::repo(dir.path(), &RepoId::new("near", "core"));
        let total_target = ReportTarget::total(dir.path());
        let reporter = reporter(&["csv,chart,html"]);
        let statistics = RunStatistics {
            merged_prs: 1,
            ..Default::default()
        };

        let tab = reporter
            .render(&repo_target, "near/core", &scores(), Some(&statistics))
            .unwrap()
            .unwrap();
        reporter
            .render_total(&total_target, &scores(), Some(&statistics), &[tab])
            .unwrap();

        for path in [
            repo_target.path("csv"),
            repo_target.path("svg"),
            repo_target.path("png"),
            repo_target.state_path(),
            total_target.path("csv"),
            total_target.path("html"),
            total_target.state_path(),
        ] {
            assert!(path.exists(), "{} missing", path.display());
        }
        assert!(!repo_target.path("html").exists());

        let html = std::fs::read_to_string(total_target.path("html")).unwrap();
        assert!(html.contains(r#"data-label="near_core""#));
        assert!(html.contains(r#"data-label="total""#));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = ReportTarget::total(dir.path().join("missing"));
        assert!(reporter(&["csv"])
            .render(&target, "total", &scores(), None)
            .is_err());
    }
}
