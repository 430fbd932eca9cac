use crate::data::analysis::StudentPerformanceAnalyzer;
use crate::data::model::{DerivedColumns, GradeDistribution};
use crate::data::stats::{self, HistogramBin};
use crate::error::{AnalysisError, Result};

pub const HISTOGRAM_BINS: usize = 10;
pub const DENSITY_POINTS: usize = 200;

// ---------------------------------------------------------------------------
// Chart models – what to draw, independent of the plotting backend
// ---------------------------------------------------------------------------

/// One labelled bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarEntry {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionChart {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    /// Density curve scaled to histogram counts (`density * n * bin width`).
    pub density: Vec<[f64; 2]>,
}

/// A renderable chart. Drawn by `ui::plot::chart_view`.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    SubjectAverages(Vec<BarEntry>),
    Distribution(DistributionChart),
    GradeBreakdown(Vec<BarEntry>),
}

impl Chart {
    pub fn title(&self) -> String {
        match self {
            Chart::SubjectAverages(_) => "Subject Averages".to_string(),
            Chart::Distribution(d) => format!("Distribution of {}", d.column),
            Chart::GradeBreakdown(_) => "Grade Distribution".to_string(),
        }
    }

    pub fn x_label(&self) -> &'static str {
        match self {
            Chart::SubjectAverages(_) => "Subject",
            Chart::Distribution(_) => "Scores",
            Chart::GradeBreakdown(_) => "Grade",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            Chart::SubjectAverages(_) => "Average Score",
            Chart::Distribution(_) => "Frequency",
            Chart::GradeBreakdown(_) => "Number of Students",
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Bar per subject with its mean. Subjects without any score are left out.
pub fn subject_averages_chart(analyzer: &StudentPerformanceAnalyzer) -> Chart {
    let bars = analyzer
        .subject_averages()
        .into_iter()
        .filter_map(|avg| {
            avg.mean.map(|value| BarEntry {
                label: avg.subject,
                value,
            })
        })
        .collect();
    Chart::SubjectAverages(bars)
}

/// Histogram plus density curve of one numeric column.
pub fn distribution_chart(analyzer: &StudentPerformanceAnalyzer, column: &str) -> Result<Chart> {
    let values: Vec<f64> = analyzer
        .numeric_column(column)
        .ok_or_else(|| AnalysisError::ColumnNotFound(column.to_string()))?
        .into_iter()
        .flatten()
        .collect();

    let bins = stats::histogram(&values, HISTOGRAM_BINS);
    let bin_width = bins.first().map(HistogramBin::width).unwrap_or(1.0);
    let scale = values.len() as f64 * bin_width;
    let density = stats::gaussian_kde(&values, DENSITY_POINTS)
        .into_iter()
        .map(|[x, y]| [x, y * scale])
        .collect();

    Ok(Chart::Distribution(DistributionChart {
        column: column.to_string(),
        bins,
        density,
    }))
}

/// Bar per grade. Requires a prior `grade_distribution()` call.
pub fn grade_breakdown_chart(analyzer: &StudentPerformanceAnalyzer) -> Result<Chart> {
    let grades = analyzer
        .grades()
        .ok_or_else(|| AnalysisError::ColumnNotFound(DerivedColumns::GRADE.to_string()))?;
    Ok(grade_bars(&GradeDistribution::from_grades(grades)))
}

fn grade_bars(distribution: &GradeDistribution) -> Chart {
    Chart::GradeBreakdown(
        distribution
            .iter()
            .map(|(grade, count)| BarEntry {
                label: grade.to_string(),
                value: count as f64,
            })
            .collect(),
    )
}
