use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{StudentRecord, StudentTable};

/// Cell contents treated as a missing score (after trimming).
pub const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "-"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a score table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.tsv` / `.txt` – tab separated
/// * anything else   – comma separated
///
/// The header row must contain a `Name` column; every other column is a
/// subject whose cells are numbers or one of [`MISSING_TOKENS`].
pub fn load_file(path: &Path) -> Result<StudentTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "tsv" | "txt" => b'\t',
        _ => b',',
    };

    let file = std::fs::File::open(path).context("opening score file")?;
    parse_table(file, delimiter)
}

// ---------------------------------------------------------------------------
// Delimited-text parser
// ---------------------------------------------------------------------------

/// Parse delimited text with a header row into a [`StudentTable`].
pub fn parse_table<R: Read>(input: R, delimiter: u8) -> Result<StudentTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("CSV has no header row");
    }

    let mut seen = BTreeSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            bail!("CSV has duplicate column '{h}'");
        }
    }

    let name_idx = headers
        .iter()
        .position(|h| h == StudentTable::NAME_COLUMN)
        .context("CSV missing 'Name' column")?;

    if headers.len() < 2 {
        bail!("CSV has no subject columns");
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = row_no + 2;
        let record = result.with_context(|| format!("CSV line {line}"))?;

        let mut name = String::new();
        let mut scores = Vec::with_capacity(headers.len() - 1);
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == name_idx {
                name = value.to_string();
                continue;
            }
            scores.push(parse_score(value, line, &headers[col_idx])?);
        }

        records.push(StudentRecord { name, scores });
    }

    StudentTable::new(headers, records).context("CSV missing 'Name' column")
}

fn parse_score(cell: &str, line: usize, col: &str) -> Result<Option<f64>> {
    if is_missing(cell) {
        return Ok(None);
    }
    let value = cell
        .parse::<f64>()
        .with_context(|| format!("CSV line {line}, column '{col}': '{cell}' is not a number"))?;
    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        bail!("CSV line {line}, column '{col}': '{cell}' is not a finite score");
    }
    Ok(Some(value))
}

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}
