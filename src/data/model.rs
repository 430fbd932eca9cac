use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Grade – letter bucket for a student's average score
// ---------------------------------------------------------------------------

/// Letter grade. Ordered best-first so a `BTreeMap<Grade, _>` iterates A..F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn letter(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

// ---------------------------------------------------------------------------
// StudentRecord – one row of the score table
// ---------------------------------------------------------------------------

/// A single student (one row of the source file).
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    /// Scores indexed like [`StudentTable::subjects`]; `None` is a missing cell.
    pub scores: Vec<Option<f64>>,
}

impl StudentRecord {
    /// Sum of the present scores. Missing cells contribute nothing.
    pub fn total(&self) -> f64 {
        self.scores.iter().flatten().sum()
    }
}

// ---------------------------------------------------------------------------
// StudentTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed score table. The subject columns are fixed when the table is
/// built and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentTable {
    /// All column names in file order, including `Name`.
    pub columns: Vec<String>,
    /// Position of the `Name` column within `columns`.
    pub name_index: usize,
    /// Subject column names in file order (every column except `Name`).
    pub subjects: Vec<String>,
    pub records: Vec<StudentRecord>,
}

impl StudentTable {
    pub const NAME_COLUMN: &'static str = "Name";

    /// Build a table from a header and its rows, deriving the subject list.
    ///
    /// Returns `None` if the header has no `Name` column or no other column,
    /// so every table has at least one subject.
    pub fn new(columns: Vec<String>, records: Vec<StudentRecord>) -> Option<Self> {
        let name_index = columns.iter().position(|c| c == Self::NAME_COLUMN)?;
        if columns.len() < 2 {
            return None;
        }
        let subjects = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != name_index)
            .map(|(_, c)| c.clone())
            .collect();
        Some(StudentTable {
            columns,
            name_index,
            subjects,
            records,
        })
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn subject_index(&self, subject: &str) -> Option<usize> {
        self.subjects.iter().position(|s| s == subject)
    }

    /// All cells of one subject column, in row order.
    pub fn subject_values(&self, index: usize) -> Vec<Option<f64>> {
        self.records
            .iter()
            .map(|r| r.scores.get(index).copied().flatten())
            .collect()
    }

    /// Render a record as display strings in file column order.
    pub fn display_row(&self, record: &StudentRecord) -> Vec<String> {
        let mut scores = record.scores.iter();
        (0..self.columns.len())
            .map(|i| {
                if i == self.name_index {
                    record.name.clone()
                } else {
                    format_score(scores.next().copied().flatten())
                }
            })
            .collect()
    }
}

/// Format a score cell: integers without decimals, others to two places.
pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
        None => "<missing>".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Derived values returned by the analyzer
// ---------------------------------------------------------------------------

/// Computed columns, overwritten by every aggregation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedColumns {
    pub total: Option<Vec<f64>>,
    pub percentile: Option<Vec<f64>>,
    pub average: Option<Vec<f64>>,
    pub grade: Option<Vec<Grade>>,
}

impl DerivedColumns {
    pub const TOTAL: &'static str = "Total";
    pub const PERCENTILE: &'static str = "Percentile";
    pub const AVERAGE: &'static str = "Average";
    pub const GRADE: &'static str = "Grade";

    /// Names of the derived columns currently populated, in display order.
    pub fn present_columns(&self) -> Vec<&'static str> {
        let mut cols = Vec::new();
        if self.total.is_some() {
            cols.push(Self::TOTAL);
        }
        if self.percentile.is_some() {
            cols.push(Self::PERCENTILE);
        }
        if self.average.is_some() {
            cols.push(Self::AVERAGE);
        }
        if self.grade.is_some() {
            cols.push(Self::GRADE);
        }
        cols
    }

    /// A numeric derived column by name, if it has been computed.
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        match name {
            Self::TOTAL => self.total.as_deref(),
            Self::PERCENTILE => self.percentile.as_deref(),
            Self::AVERAGE => self.average.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectAverage {
    pub subject: String,
    /// `None` when every cell of the column is missing.
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PercentileRow {
    pub name: String,
    pub total: f64,
    /// Fractional rank of `total` among all rows, 0–100.
    pub percentile: f64,
}

/// A row returned by `top_performers`: the original record plus its total.
#[derive(Debug, Clone, PartialEq)]
pub struct TopPerformer {
    pub record: StudentRecord,
    pub total: f64,
}

/// Count of students per grade. Only grades that occur are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeDistribution {
    counts: BTreeMap<Grade, usize>,
}

impl GradeDistribution {
    pub fn from_grades(grades: &[Grade]) -> Self {
        let mut counts = BTreeMap::new();
        for g in grades {
            *counts.entry(*g).or_insert(0) += 1;
        }
        GradeDistribution { counts }
    }

    pub fn count(&self, grade: Grade) -> usize {
        self.counts.get(&grade).copied().unwrap_or(0)
    }

    /// Total number of graded students.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Present grades with their counts, best grade first.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, usize)> + '_ {
        self.counts.iter().map(|(g, c)| (*g, *c))
    }
}
