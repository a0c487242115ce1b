// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use log::debug;

/// Canonical name of the population support column.
pub const POPULATION: &str = "population";
/// Canonical name of the technical diagnosis column.
pub const DIAGNOSIS: &str = "diagnosis";
/// Canonical name of the discrete adherence column (0, 0.5 or 1).
pub const ADHERENCE: &str = "adherence";
/// Canonical name of the optional goal label column.
pub const GOVERNMENT: &str = "government";

// Headers found in the planning workbooks, after normalization.
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("populacao", POPULATION),
    ("população", POPULATION),
    ("diagnostico", DIAGNOSIS),
    ("diagnóstico", DIAGNOSIS),
    ("aderencia", ADHERENCE),
    ("aderência", ADHERENCE),
    ("governo", GOVERNMENT),
];

/// Lowercases a header and replaces the spaces with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Normalizes a header and maps the known aliases onto the canonical names.
pub fn canonical_column_name(name: &str) -> String {
    let normalized = normalize_column_name(name);
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(normalized)
}

/// The content of one cell of a sheet.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// The numeric value of the cell, if any.
    ///
    /// Text that parses as a number counts as a number. Everything else is
    /// missing and is skipped by the averages.
    pub fn as_number(&self) -> Option<f64> {
        let x = match self {
            Cell::Number(x) => Some(*x),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Empty | Cell::Bool(_) => None,
        };
        x.filter(|v| !v.is_nan())
    }

    /// The cell rendered as a goal label. Empty cells have no label.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(x) if x.fract() == 0.0 && x.abs() < 1e15 => {
                Some(format!("{}", *x as i64))
            }
            Cell::Number(x) => Some(x.to_string()),
            Cell::Bool(true) => Some("True".to_string()),
            Cell::Bool(false) => Some("False".to_string()),
        }
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Number(x)
    }
}

impl From<i64> for Cell {
    fn from(x: i64) -> Self {
        Cell::Number(x as f64)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// One sheet of the workbook: the goals of a single axis.
///
/// Column names are canonical (see [canonical_column_name]) and every row has
/// exactly one cell per column.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Builds a table from raw headers. Short rows are padded with empty cells,
    /// extra cells are dropped.
    pub fn new(headers: &[String], rows: Vec<Vec<Cell>>) -> Table {
        let mut columns: Vec<String> = Vec::with_capacity(headers.len());
        for h in headers {
            let canonical = canonical_column_name(h);
            // A second header resolving to the same canonical name keeps its own name.
            if columns.contains(&canonical) {
                columns.push(normalize_column_name(h));
            } else {
                columns.push(canonical);
            }
        }
        debug!("Table::new: columns: {:?}", columns);
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All the cells of a column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Checks that all the required columns are present.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), MissingColumnsError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingColumnsError { missing })
        }
    }
}

// ******** Output data structures *********

/// The three fixed categories of an axis.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Category {
    Population,
    Government,
    Diagnosis,
}

impl Category {
    /// Order of the radar chart (clockwise from the top).
    pub const RADAR_ORDER: [Category; 3] = [
        Category::Government,
        Category::Population,
        Category::Diagnosis,
    ];

    /// Order of the correspondence chart (left to right).
    pub const CORRESPONDENCE_ORDER: [Category; 3] = [
        Category::Population,
        Category::Government,
        Category::Diagnosis,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Population => "População",
            Category::Government => "Governo",
            Category::Diagnosis => "Diagnóstico",
        }
    }
}

/// The discrete adherence of a goal.
///
/// Values outside of 0, 0.5 and 1 are kept as `Unclassified` rather than
/// being forced into a bucket.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum AdherenceLevel {
    Low,
    Medium,
    High,
    Unclassified,
}

impl AdherenceLevel {
    /// Levels in the order they are reported.
    pub const REPORTED: [AdherenceLevel; 3] = [
        AdherenceLevel::High,
        AdherenceLevel::Medium,
        AdherenceLevel::Low,
    ];

    pub fn from_value(value: Option<f64>) -> AdherenceLevel {
        match value {
            Some(x) if x == 0.0 => AdherenceLevel::Low,
            Some(x) if x == 0.5 => AdherenceLevel::Medium,
            Some(x) if x == 1.0 => AdherenceLevel::High,
            _ => AdherenceLevel::Unclassified,
        }
    }

    /// The display name, or None for unclassified goals.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            AdherenceLevel::Low => Some("Baixa"),
            AdherenceLevel::Medium => Some("Média"),
            AdherenceLevel::High => Some("Alta"),
            AdherenceLevel::Unclassified => None,
        }
    }
}

/// A required column is absent from a sheet.
///
/// This only affects the chart that needed the column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MissingColumnsError {
    pub missing: Vec<String>,
}

impl Error for MissingColumnsError {}

impl Display for MissingColumnsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing columns: {}", self.missing.join(", "))
    }
}
