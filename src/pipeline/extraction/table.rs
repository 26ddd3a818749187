//! Tabular extraction for spreadsheets and CSV files.
//!
//! Both formats are read into the same `Table` (at most `MAX_TABLE_ROWS`
//! data rows) and rendered as a textual summary: shape, column names, the
//! first five rows, and descriptive statistics for numeric columns.

use std::fmt::Write as _;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::{ExtractionError, MAX_TABLE_ROWS};

const HEAD_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Blank and `NaN` cells are missing values.
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => Cell::number(n),
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    fn number(n: f64) -> Self {
        if n.is_nan() {
            Cell::Empty
        } else {
            Cell::Number(n)
        }
    }

    fn render(&self) -> String {
        match self {
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
            Cell::Empty => "NaN".to_string(),
        }
    }
}

/// A header row plus data rows; rows may be ragged.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Table {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows[row].get(col).unwrap_or(&Cell::Empty)
    }

    /// A column is numeric when it has at least one number and no text.
    pub fn is_numeric_column(&self, col: usize) -> bool {
        let mut any_number = false;
        for row in 0..self.rows.len() {
            match self.cell(row, col) {
                Cell::Number(_) => any_number = true,
                Cell::Text(_) => return false,
                Cell::Empty => {}
            }
        }
        any_number
    }

    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&col| self.is_numeric_column(col))
            .collect()
    }

    pub fn column_stats(&self, col: usize) -> Option<ColumnStats> {
        let mut values: Vec<f64> = (0..self.rows.len())
            .filter_map(|row| match self.cell(row, col) {
                Cell::Number(n) => Some(*n),
                _ => None,
            })
            .collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            f64::NAN
        };

        Some(ColumnStats {
            count,
            mean,
            std,
            min: values[0],
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values[count - 1],
        })
    }

    /// Textual summary handed to the rest of the pipeline.
    pub fn summary(&self) -> String {
        let (rows, cols) = self.shape();
        let column_list = self
            .columns
            .iter()
            .map(|c| format!("'{c}'"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::from("Data Summary:\n");
        let _ = writeln!(out, "Shape: ({rows}, {cols})");
        let _ = writeln!(out, "Columns: [{column_list}]");
        out.push_str("\nFirst 5 rows:\n");
        out.push_str(&self.render_head());

        let numeric = self.numeric_columns();
        if !numeric.is_empty() {
            out.push_str("\n\nData Info:\n");
            out.push_str(&self.render_describe(&numeric));
        }
        out
    }

    fn render_head(&self) -> String {
        let head = self.rows.len().min(HEAD_ROWS);
        let body: Vec<(String, Vec<String>)> = (0..head)
            .map(|row| {
                let cells = (0..self.columns.len())
                    .map(|col| self.cell(row, col).render())
                    .collect();
                (row.to_string(), cells)
            })
            .collect();
        render_grid(&self.columns, &body)
    }

    fn render_describe(&self, numeric: &[usize]) -> String {
        let headers: Vec<String> = numeric.iter().map(|&c| self.columns[c].clone()).collect();
        let stats: Vec<ColumnStats> = numeric
            .iter()
            .filter_map(|&c| self.column_stats(c))
            .collect();

        let labels: [(&str, fn(&ColumnStats) -> f64); 8] = [
            ("count", |s| s.count as f64),
            ("mean", |s| s.mean),
            ("std", |s| s.std),
            ("min", |s| s.min),
            ("25%", |s| s.q25),
            ("50%", |s| s.median),
            ("75%", |s| s.q75),
            ("max", |s| s.max),
        ];

        let body: Vec<(String, Vec<String>)> = labels
            .iter()
            .map(|(label, get)| {
                let cells = stats.iter().map(|s| format_stat(get(s))).collect();
                (label.to_string(), cells)
            })
            .collect();
        render_grid(&headers, &body)
    }
}

/// Parse CSV bytes; the first record is the header.
pub fn read_csv(bytes: &[u8]) -> Result<Table, ExtractionError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let columns = reader
        .headers()
        .map_err(|e| ExtractionError::CsvParsing(e.to_string()))?
        .iter()
        .enumerate()
        .map(|(i, h)| column_name(h, i))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records().take(MAX_TABLE_ROWS) {
        let record = record.map_err(|e| ExtractionError::CsvParsing(e.to_string()))?;
        rows.push(record.iter().map(Cell::parse).collect());
    }

    Ok(Table { columns, rows })
}

/// Read the first worksheet of an .xlsx workbook.
pub fn read_spreadsheet(bytes: &[u8]) -> Result<Table, ExtractionError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ExtractionError::SpreadsheetParsing(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ExtractionError::EmptyWorkbook)?
        .map_err(|e| ExtractionError::SpreadsheetParsing(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let columns = match sheet_rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| column_name(&cell.to_string(), i))
            .collect(),
        None => Vec::new(),
    };

    let rows = sheet_rows
        .take(MAX_TABLE_ROWS)
        .map(|row| row.iter().map(data_cell).collect())
        .collect();

    Ok(Table { columns, rows })
}

fn data_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(if *b { "True".into() } else { "False".into() }),
        Data::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

fn column_name(raw: &str, index: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("Unnamed: {index}")
    } else {
        trimmed.to_string()
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn format_stat(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else {
        format!("{n:.6}")
    }
}

/// Right-aligned grid with a leading label column.
fn render_grid(headers: &[String], body: &[(String, Vec<String>)]) -> String {
    let label_width = body.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .filter_map(|(_, cells)| cells.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 1);
    let mut header_line = " ".repeat(label_width);
    for (h, &w) in headers.iter().zip(&widths) {
        let _ = write!(header_line, "  {h:>w$}");
    }
    lines.push(header_line);

    for (label, cells) in body {
        let mut line = format!("{label:<label_width$}");
        for (i, &w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let _ = write!(line, "  {cell:>w$}");
        }
        lines.push(line);
    }
    lines.join("\n")
}
