use std::path::{Path, PathBuf};

use crate::chart::{self, Chart};
use crate::data::analysis::{StudentPerformanceAnalyzer, DEFAULT_TOP_N};
use crate::data::model::{format_score, DerivedColumns};

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Which tab of the central area is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    DataTable,
    Charts,
}

/// A table ready for display: header plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Every sidebar action is a
/// method here and is a no-op until a file has been loaded.
#[derive(Default)]
pub struct AppState {
    /// Loaded analyzer (None until a file loads successfully).
    pub analyzer: Option<StudentPerformanceAnalyzer>,

    /// Path of the loaded file, for the top bar.
    pub source: Option<PathBuf>,

    pub table: Option<TableView>,

    pub chart: Option<Chart>,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<StatusMessage>,

    /// Text buffer of the "choose subject" prompt; `Some` while it is open.
    pub subject_prompt: Option<String>,
}

impl AppState {
    /// Load a score file, clean it and show it. On failure the previous
    /// analyzer is dropped and the error is shown.
    pub fn load_path(&mut self, path: &Path) {
        self.table = None;
        self.chart = None;
        self.subject_prompt = None;

        match StudentPerformanceAnalyzer::new(path) {
            Ok(mut analyzer) => {
                let filled = analyzer.clean_data();
                self.analyzer = Some(analyzer);
                self.source = Some(path.to_path_buf());
                let text = if filled > 0 {
                    format!("CSV Loaded Successfully! ({filled} missing scores filled)")
                } else {
                    "CSV Loaded Successfully!".to_string()
                };
                self.set_info(text);
                self.show_data();
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.analyzer = None;
                self.source = None;
                self.set_error(format!("Error: {e}"));
            }
        }
    }

    /// Show the cleaned table with any derived columns computed so far.
    pub fn show_data(&mut self) {
        let Some(analyzer) = &self.analyzer else {
            return;
        };
        let table = analyzer.table();
        let derived = analyzer.derived();

        let mut columns = table.columns.clone();
        columns.extend(derived.present_columns().iter().map(|c| c.to_string()));

        let rows = table
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mut row = table.display_row(record);
                row.extend(derived_cells(derived, i));
                row
            })
            .collect();

        self.show_table(TableView { columns, rows });
    }

    pub fn show_averages(&mut self) {
        let Some(analyzer) = &self.analyzer else {
            return;
        };
        let rows = analyzer
            .subject_averages()
            .into_iter()
            .map(|avg| vec![avg.subject, format_score(avg.mean.map(round2))])
            .collect();
        self.show_table(TableView {
            columns: vec!["Subject".into(), "Average".into()],
            rows,
        });
    }

    pub fn show_top(&mut self) {
        let Some(analyzer) = &mut self.analyzer else {
            return;
        };
        let top = match analyzer.top_performers(DEFAULT_TOP_N) {
            Ok(top) => top,
            Err(e) => {
                self.set_error(e.to_string());
                return;
            }
        };
        let table = analyzer.table();
        let mut columns = table.columns.clone();
        columns.push(DerivedColumns::TOTAL.to_string());
        let rows = top
            .iter()
            .map(|t| {
                let mut row = table.display_row(&t.record);
                row.push(format_score(Some(t.total)));
                row
            })
            .collect();
        self.show_table(TableView { columns, rows });
    }

    pub fn show_percentiles(&mut self) {
        let Some(analyzer) = &mut self.analyzer else {
            return;
        };
        let rows = analyzer
            .overall_percentiles()
            .into_iter()
            .map(|p| {
                vec![
                    p.name,
                    format_score(Some(p.total)),
                    format_score(Some(round2(p.percentile))),
                ]
            })
            .collect();
        self.show_table(TableView {
            columns: vec![
                "Name".into(),
                DerivedColumns::TOTAL.into(),
                DerivedColumns::PERCENTILE.into(),
            ],
            rows,
        });
    }

    pub fn plot_averages(&mut self) {
        let Some(analyzer) = &self.analyzer else {
            return;
        };
        let chart = chart::subject_averages_chart(analyzer);
        self.show_chart(chart);
    }

    /// Open the subject prompt.
    pub fn ask_subject(&mut self) {
        if self.analyzer.is_some() {
            self.subject_prompt = Some(String::new());
        }
    }

    /// Plot one column's distribution. An unknown column leaves the current
    /// chart and the prompt in place and shows an error.
    pub fn plot_distribution(&mut self, subject: &str) {
        let Some(analyzer) = &self.analyzer else {
            return;
        };
        match chart::distribution_chart(analyzer, subject.trim()) {
            Ok(chart) => {
                self.subject_prompt = None;
                self.show_chart(chart);
            }
            Err(e) => {
                log::warn!("{e}");
                self.set_error(e.to_string());
            }
        }
    }

    pub fn plot_grades(&mut self) {
        let Some(analyzer) = &mut self.analyzer else {
            return;
        };
        let distribution = analyzer.grade_distribution();
        log::info!("Graded {} students", distribution.total());
        match chart::grade_breakdown_chart(analyzer) {
            Ok(chart) => self.show_chart(chart),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn show_table(&mut self, view: TableView) {
        self.table = Some(view);
        self.active_tab = Tab::DataTable;
    }

    fn show_chart(&mut self, chart: Chart) {
        log::info!("Rendering chart '{}'", chart.title());
        self.chart = Some(chart);
        self.active_tab = Tab::Charts;
    }

    fn set_info(&mut self, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            is_error: false,
        });
    }

    fn set_error(&mut self, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            is_error: true,
        });
    }
}

fn derived_cells(derived: &DerivedColumns, row: usize) -> Vec<String> {
    let number = |col: &Option<Vec<f64>>| col.as_ref().map(|v| format_score(v.get(row).copied()));
    [
        number(&derived.total),
        number(&derived.percentile),
        number(&derived.average),
        derived
            .grade
            .as_ref()
            .map(|g| g.get(row).map(|g| g.to_string()).unwrap_or_default()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_csv(text: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn loaded() -> (AppState, NamedTempFile) {
        let file = write_csv("Name,Math,Science\nAlice,90,80\nBob,50,40\nCarol,70,\n");
        let mut state = AppState::default();
        state.load_path(file.path());
        (state, file)
    }

    #[test]
    fn test_actions_are_noops_before_load() {
        let mut state = AppState::default();
        state.show_data();
        state.show_averages();
        state.show_top();
        state.show_percentiles();
        state.plot_averages();
        state.ask_subject();
        state.plot_distribution("Math");
        state.plot_grades();
        assert!(state.table.is_none());
        assert!(state.chart.is_none());
        assert!(state.subject_prompt.is_none());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_load_cleans_and_shows_data() {
        let (state, _file) = loaded();
        let status = state.status_message.as_ref().unwrap();
        assert!(!status.is_error);
        assert!(status.text.contains("1 missing scores filled"));

        let table = state.table.as_ref().unwrap();
        assert_eq!(table.columns, vec!["Name", "Math", "Science"]);
        assert_eq!(table.rows[2], vec!["Carol", "70", "60"]);
        assert_eq!(state.active_tab, Tab::DataTable);
    }

    #[test]
    fn test_failed_load_clears_analyzer() {
        let (mut state, _file) = loaded();
        let bad = write_csv("Student,Math\nAlice,90\n");
        state.load_path(bad.path());
        assert!(state.analyzer.is_none());
        assert!(state.table.is_none());
        assert!(state.status_message.as_ref().unwrap().is_error);

        state.show_averages();
        assert!(state.table.is_none());
    }

    #[test]
    fn test_show_averages_rounds() {
        let file = write_csv("Name,Math\nA,90\nB,80\nC,80\n");
        let mut state = AppState::default();
        state.load_path(file.path());
        state.show_averages();
        let table = state.table.unwrap();
        assert_eq!(table.columns, vec!["Subject", "Average"]);
        assert_eq!(table.rows, vec![vec!["Math".to_string(), "83.33".to_string()]]);
    }

    #[test]
    fn test_show_top_appends_total() {
        let (mut state, _file) = loaded();
        state.show_top();
        let table = state.table.unwrap();
        assert_eq!(table.columns, vec!["Name", "Math", "Science", "Total"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["Alice", "90", "80", "170"]);
        assert_eq!(table.rows[1][0], "Carol");
    }

    #[test]
    fn test_show_percentiles() {
        let (mut state, _file) = loaded();
        state.show_percentiles();
        let table = state.table.unwrap();
        assert_eq!(table.columns, vec!["Name", "Total", "Percentile"]);
        assert_eq!(table.rows[1], vec!["Bob", "90", "33.33"]);
    }

    #[test]
    fn test_show_data_includes_derived_columns() {
        let (mut state, _file) = loaded();
        state.plot_grades();
        state.show_data();
        let table = state.table.unwrap();
        assert_eq!(
            table.columns,
            vec!["Name", "Math", "Science", "Total", "Average", "Grade"]
        );
        assert_eq!(table.rows[0], vec!["Alice", "90", "80", "170", "85", "A"]);
    }

    #[test]
    fn test_plot_grades_switches_to_charts() {
        let (mut state, _file) = loaded();
        state.plot_grades();
        assert_eq!(state.active_tab, Tab::Charts);
        assert!(matches!(state.chart, Some(Chart::GradeBreakdown(_))));
    }

    #[test]
    fn test_unknown_subject_keeps_state() {
        let (mut state, _file) = loaded();
        state.plot_averages();
        state.ask_subject();
        state.plot_distribution("History");

        let status = state.status_message.as_ref().unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "Subject 'History' not found!");
        assert!(matches!(state.chart, Some(Chart::SubjectAverages(_))));
        assert!(state.subject_prompt.is_some());
    }

    #[test]
    fn test_known_subject_closes_prompt() {
        let (mut state, _file) = loaded();
        state.ask_subject();
        state.plot_distribution(" Science ");
        assert!(state.subject_prompt.is_none());
        assert!(matches!(state.chart, Some(Chart::Distribution(ref d)) if d.column == "Science"));
    }
}
