use std::path::Path;

use crate::error::{AnalysisError, Result};

use super::loader;
use super::model::{
    DerivedColumns, Grade, GradeDistribution, PercentileRow, StudentTable, SubjectAverage,
    TopPerformer,
};
use super::stats;

/// Number of rows returned by `top_performers` when the caller has no
/// preference.
pub const DEFAULT_TOP_N: i64 = 3;

// ---------------------------------------------------------------------------
// StudentPerformanceAnalyzer
// ---------------------------------------------------------------------------

/// Owns a loaded score table and computes summary statistics over it.
///
/// The subject columns are fixed by the table at load time. Aggregations
/// overwrite the matching fields of [`DerivedColumns`] and never add to the
/// subject set, so call order does not change any result.
#[derive(Debug, Clone)]
pub struct StudentPerformanceAnalyzer {
    table: StudentTable,
    derived: DerivedColumns,
}

impl StudentPerformanceAnalyzer {
    /// Load and parse a score file.
    pub fn new(path: &Path) -> Result<Self> {
        let table = loader::load_file(path).map_err(|e| AnalysisError::Load {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;
        log::info!(
            "Loaded {} students with subjects {:?} from {}",
            table.len(),
            table.subjects,
            path.display()
        );
        Ok(Self::from_table(table))
    }

    pub fn from_table(table: StudentTable) -> Self {
        StudentPerformanceAnalyzer {
            table,
            derived: DerivedColumns::default(),
        }
    }

    pub fn table(&self) -> &StudentTable {
        &self.table
    }

    pub fn subjects(&self) -> &[String] {
        &self.table.subjects
    }

    pub fn derived(&self) -> &DerivedColumns {
        &self.derived
    }

    /// Grades from the last `grade_distribution` call.
    pub fn grades(&self) -> Option<&[Grade]> {
        self.derived.grade.as_deref()
    }

    /// Values of a numeric column: a subject, or a derived column that has
    /// already been computed. `None` if no such column exists.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        if let Some(idx) = self.table.subject_index(name) {
            return Some(self.table.subject_values(idx));
        }
        self.derived
            .numeric(name)
            .map(|vals| vals.iter().copied().map(Some).collect())
    }

    /// Fill missing scores with the mean of their column.
    ///
    /// Columns with no values at all are left as they are. Returns the
    /// number of cells filled.
    pub fn clean_data(&mut self) -> usize {
        let mut filled = 0;
        for (idx, subject) in self.table.subjects.iter().enumerate() {
            let column = self.table.subject_values(idx);
            let missing = column.iter().filter(|v| v.is_none()).count();
            if missing == 0 {
                continue;
            }
            let Some(fill) = stats::mean(&column) else {
                log::debug!("Column '{subject}' has no values; leaving {missing} cells empty");
                continue;
            };
            for record in &mut self.table.records {
                if let Some(cell) = record.scores.get_mut(idx) {
                    if cell.is_none() {
                        *cell = Some(fill);
                    }
                }
            }
            log::debug!("Filled {missing} missing cells in '{subject}' with {fill:.3}");
            filled += missing;
        }

        if filled > 0 {
            // totals computed before the fill are stale now
            self.derived = DerivedColumns::default();
            log::info!("Filled {filled} missing scores with column means");
        }
        filled
    }

    /// Mean of every subject column, in column order.
    pub fn subject_averages(&self) -> Vec<SubjectAverage> {
        self.table
            .subjects
            .iter()
            .enumerate()
            .map(|(idx, subject)| SubjectAverage {
                subject: subject.clone(),
                mean: stats::mean(&self.table.subject_values(idx)),
            })
            .collect()
    }

    /// Total and percentile rank of every student, in row order.
    pub fn overall_percentiles(&mut self) -> Vec<PercentileRow> {
        let totals = self.compute_totals();
        let percentiles = stats::percentile_ranks(&totals);

        let rows = self
            .table
            .records
            .iter()
            .zip(totals.iter().zip(percentiles.iter()))
            .map(|(r, (&total, &percentile))| PercentileRow {
                name: r.name.clone(),
                total,
                percentile,
            })
            .collect();

        self.derived.percentile = Some(percentiles);
        rows
    }

    /// The `n` students with the highest total, best first. Students with
    /// equal totals keep their file order.
    pub fn top_performers(&mut self, n: i64) -> Result<Vec<TopPerformer>> {
        if n < 0 {
            return Err(AnalysisError::InvalidArgument(format!(
                "top_performers expects n >= 0, got {n}"
            )));
        }
        let totals = self.compute_totals();

        let mut ranked: Vec<TopPerformer> = self
            .table
            .records
            .iter()
            .zip(totals)
            .map(|(record, total)| TopPerformer {
                record: record.clone(),
                total,
            })
            .collect();
        // sort_by is stable, so ties stay in file order
        ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
        ranked.truncate(usize::try_from(n).unwrap_or(usize::MAX));
        Ok(ranked)
    }

    /// Grade every student by their average score and count the grades.
    pub fn grade_distribution(&mut self) -> GradeDistribution {
        let totals = self.compute_totals();
        // StudentTable::new guarantees at least one subject
        let subject_count = self.table.subjects.len() as f64;

        let averages: Vec<f64> = totals.iter().map(|t| t / subject_count).collect();
        let grades: Vec<Grade> = averages.iter().map(|&a| stats::grade_for(a)).collect();
        let distribution = GradeDistribution::from_grades(&grades);

        self.derived.average = Some(averages);
        self.derived.grade = Some(grades);
        distribution
    }

    /// Recompute the `Total` column over the original subjects.
    fn compute_totals(&mut self) -> Vec<f64> {
        let totals: Vec<f64> = self.table.records.iter().map(|r| r.total()).collect();
        log::debug!("Recomputed totals for {} students", totals.len());
        self.derived.total = Some(totals.clone());
        totals
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::loader::parse_table;

    fn analyzer(csv: &str) -> StudentPerformanceAnalyzer {
        StudentPerformanceAnalyzer::from_table(parse_table(csv.as_bytes(), b',').unwrap())
    }

    fn scenario() -> StudentPerformanceAnalyzer {
        analyzer("Name,Math,Science\nAlice,90,80\nBob,50,40\nCarol,70,60\n")
    }

    fn subject_keys(a: &StudentPerformanceAnalyzer) -> Vec<String> {
        a.subject_averages().into_iter().map(|s| s.subject).collect()
    }

    #[test]
    fn test_new_loads_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "Name,Math\nAlice,90\n").unwrap();
        let a = StudentPerformanceAnalyzer::new(file.path()).unwrap();
        assert_eq!(a.subjects(), ["Math"]);
        assert_eq!(a.table().len(), 1);
    }

    #[test]
    fn test_new_reports_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let err = StudentPerformanceAnalyzer::new(&path).unwrap_err();
        match err {
            AnalysisError::Load { path: p, reason } => {
                assert_eq!(p, path);
                assert!(reason.contains("opening score file"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_scenario_subject_averages() {
        let a = scenario();
        let averages = a.subject_averages();
        assert_eq!(
            averages,
            vec![
                SubjectAverage {
                    subject: "Math".into(),
                    mean: Some(70.0)
                },
                SubjectAverage {
                    subject: "Science".into(),
                    mean: Some(60.0)
                },
            ]
        );
    }

    #[test]
    fn test_scenario_totals_and_top_performer() {
        let mut a = scenario();
        let top = a.top_performers(1).unwrap();
        assert_eq!(a.derived().total, Some(vec![170.0, 90.0, 130.0]));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].record.name, "Alice");
        assert_eq!(top[0].record.scores, vec![Some(90.0), Some(80.0)]);
        assert_eq!(top[0].total, 170.0);
    }

    #[test]
    fn test_scenario_grade_distribution() {
        let mut a = scenario();
        let dist = a.grade_distribution();
        assert_eq!(a.derived().average, Some(vec![85.0, 45.0, 65.0]));
        assert_eq!(dist.count(Grade::A), 1);
        assert_eq!(dist.count(Grade::D), 1);
        assert_eq!(dist.count(Grade::C), 1);
        assert_eq!(dist.len(), 3);
        assert_eq!(dist.total(), 3);
        assert_eq!(a.grades(), Some(&[Grade::A, Grade::D, Grade::C][..]));
    }

    #[test]
    fn test_scenario_percentiles_in_row_order() {
        let mut a = scenario();
        let rows = a.overall_percentiles();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
        let totals: Vec<f64> = rows.iter().map(|r| r.total).collect();
        assert_eq!(totals, vec![170.0, 90.0, 130.0]);
        assert!((rows[0].percentile - 100.0).abs() < 1e-9);
        assert!((rows[1].percentile - 100.0 / 3.0).abs() < 1e-9);
        assert!((rows[2].percentile - 200.0 / 3.0).abs() < 1e-9);
        assert!(a.derived().percentile.is_some());
    }

    #[test]
    fn test_percentiles_share_rank_on_ties() {
        let mut a = analyzer("Name,Math\nA,10\nB,20\nC,20\nD,30\n");
        let p: Vec<f64> = a.overall_percentiles().iter().map(|r| r.percentile).collect();
        assert_eq!(p, vec![25.0, 62.5, 62.5, 100.0]);
    }

    #[test]
    fn test_subject_averages_unaffected_by_derived_columns() {
        let mut a = scenario();
        let before = subject_keys(&a);
        a.overall_percentiles();
        a.top_performers(DEFAULT_TOP_N).unwrap();
        a.grade_distribution();
        a.grade_distribution();
        assert_eq!(subject_keys(&a), before);
        assert_eq!(before, vec!["Math", "Science"]);
        assert_eq!(a.subject_averages()[0].mean, Some(70.0));
    }

    #[test]
    fn test_average_uses_original_subject_count_in_any_order() {
        let mut a = scenario();
        a.overall_percentiles();
        a.top_performers(2).unwrap();
        let dist = a.grade_distribution();
        assert_eq!(a.derived().average, Some(vec![85.0, 45.0, 65.0]));
        assert_eq!(dist.count(Grade::A), 1);
    }

    #[test]
    fn test_repeated_calls_overwrite() {
        let mut a = scenario();
        a.overall_percentiles();
        a.overall_percentiles();
        assert_eq!(a.derived().total.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_top_performers_stable_on_ties() {
        let mut a = analyzer("Name,Math\nA,50\nB,80\nC,50\nD,80\nE,10\n");
        let names: Vec<String> = a
            .top_performers(5)
            .unwrap()
            .into_iter()
            .map(|t| t.record.name)
            .collect();
        assert_eq!(names, vec!["B", "D", "A", "C", "E"]);
    }

    #[test]
    fn test_top_performers_length_is_min_of_n_and_rows() {
        let mut a = scenario();
        assert_eq!(a.top_performers(0).unwrap().len(), 0);
        assert_eq!(a.top_performers(DEFAULT_TOP_N).unwrap().len(), 3);
        assert_eq!(a.top_performers(10).unwrap().len(), 3);
    }

    #[test]
    fn test_top_performers_rejects_negative_n() {
        let mut a = scenario();
        assert!(matches!(
            a.top_performers(-1),
            Err(AnalysisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_clean_data_fills_with_column_mean() {
        let mut a = analyzer("Name,Math,Science\nAlice,90,\nBob,,40\nCarol,70,60\n");
        assert_eq!(a.clean_data(), 2);
        let t = a.table();
        assert_eq!(t.records[0].scores, vec![Some(90.0), Some(50.0)]);
        assert_eq!(t.records[1].scores, vec![Some(80.0), Some(40.0)]);
        let names: Vec<&str> = t.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_clean_data_noop_without_missing_values() {
        let mut a = scenario();
        let before = a.table().clone();
        assert_eq!(a.clean_data(), 0);
        assert_eq!(a.table(), &before);
    }

    #[test]
    fn test_clean_data_second_pass_is_noop() {
        let mut a = analyzer("Name,Math\nAlice,90\nBob,\n");
        assert_eq!(a.clean_data(), 1);
        let after_first = a.table().clone();
        assert_eq!(a.clean_data(), 0);
        assert_eq!(a.table(), &after_first);
    }

    #[test]
    fn test_clean_data_skips_all_missing_column() {
        let mut a = analyzer("Name,Math,Art\nAlice,90,\nBob,,\n");
        assert_eq!(a.clean_data(), 1);
        let art: Vec<Option<f64>> = a.table().subject_values(1);
        assert_eq!(art, vec![None, None]);
        assert_eq!(a.table().records[1].scores[0], Some(90.0));
        assert_eq!(a.subject_averages()[1].mean, None);
    }

    #[test]
    fn test_clean_data_ignores_nan_cells() {
        let mut a = analyzer("Name,Math\nAlice,90\nBob,NAN\nCarol,\n");
        assert_eq!(a.clean_data(), 2);
        let math = a.table().subject_values(0);
        assert_eq!(math, vec![Some(90.0), Some(90.0), Some(90.0)]);
        assert_eq!(a.subject_averages()[0].mean, Some(90.0));
        let dist = a.grade_distribution();
        assert_eq!(dist.count(Grade::A), 3);
    }

    #[test]
    fn test_clean_data_drops_stale_derived_columns() {
        let mut a = analyzer("Name,Math\nAlice,90\nBob,\n");
        a.grade_distribution();
        assert!(a.grades().is_some());
        a.clean_data();
        assert_eq!(a.derived(), &DerivedColumns::default());
    }

    #[test]
    fn test_totals_skip_missing_cells() {
        let mut a = analyzer("Name,Math,Science\nAlice,90,\n");
        let rows = a.overall_percentiles();
        assert_eq!(rows[0].total, 90.0);
    }

    #[test]
    fn test_empty_table_aggregations() {
        let mut a = analyzer("Name,Math\n");
        assert_eq!(a.subject_averages()[0].mean, None);
        assert!(a.overall_percentiles().is_empty());
        assert!(a.top_performers(3).unwrap().is_empty());
        assert!(a.grade_distribution().is_empty());
    }

    #[test]
    fn test_numeric_column_lookup() {
        let mut a = scenario();
        assert_eq!(
            a.numeric_column("Math"),
            Some(vec![Some(90.0), Some(50.0), Some(70.0)])
        );
        assert_eq!(a.numeric_column("Total"), None);
        assert_eq!(a.numeric_column("Name"), None);
        a.top_performers(1).unwrap();
        assert_eq!(
            a.numeric_column("Total"),
            Some(vec![Some(170.0), Some(90.0), Some(130.0)])
        );
    }
}
