pub use crate::config::*;

/// A builder for assembling a table one goal at a time.
///
/// ```
/// use adherence::builder::TableBuilder;
/// use adherence::{summarize, Cell};
///
/// let mut builder = TableBuilder::new(&["População", "Diagnóstico"]);
/// builder.add_row(vec![Cell::from(0.5), Cell::from(0.8)]);
/// builder.add_row(vec![Cell::from(0.3), Cell::from(0.6)]);
///
/// let summary = summarize(&builder.build())?;
/// assert_eq!(summary.average, 55);
/// # Ok::<(), adherence::MissingColumnsError>(())
/// ```
pub struct TableBuilder {
    pub(crate) _headers: Vec<String>,
    pub(crate) _rows: Vec<Vec<Cell>>,
}

impl TableBuilder {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> TableBuilder {
        TableBuilder {
            _headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            _rows: Vec::new(),
        }
    }

    /// Adds a row of cells, in header order.
    pub fn add_row(&mut self, cells: Vec<Cell>) {
        self._rows.push(cells);
    }

    /// Adds a goal with the usual layout: label, population, diagnosis and adherence.
    ///
    /// The builder must have been created with these four headers in this order.
    pub fn add_goal(&mut self, label: &str, population: f64, diagnosis: f64, adherence: f64) {
        self.add_row(vec![
            Cell::from(label),
            Cell::from(population),
            Cell::from(diagnosis),
            Cell::from(adherence),
        ]);
    }

    pub fn num_rows(&self) -> usize {
        self._rows.len()
    }

    pub fn build(self) -> Table {
        Table::new(&self._headers, self._rows)
    }
}
