// Reading the sheets of the planning workbook.

use adherence::builder::TableBuilder;
use calamine::{open_workbook, DataType, Reader, Xlsx};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::time::SystemTime;

use crate::dashboard::*;

/// The sheets already read from the workbook.
///
/// Everything is dropped as soon as the modification time of the file changes.
pub struct SheetCache {
    path: PathBuf,
    modified: SystemTime,
    names: Option<Vec<String>>,
    sheets: HashMap<String, Table>,
}

impl SheetCache {
    /// Fails if the workbook does not exist.
    pub fn open(path: &Path) -> DashResult<SheetCache> {
        let modified = modification_time(path)?;
        info!("SheetCache::open: {}", path.display());
        Ok(SheetCache {
            path: path.to_path_buf(),
            modified,
            names: None,
            sheets: HashMap::new(),
        })
    }

    fn refresh(&mut self) -> DashResult<()> {
        let modified = modification_time(&self.path)?;
        if modified != self.modified {
            info!(
                "SheetCache::refresh: {} changed, dropping {} sheets",
                self.path.display(),
                self.sheets.len()
            );
            self.sheets.clear();
            self.names = None;
            self.modified = modified;
        }
        Ok(())
    }

    pub fn sheet_names(&mut self) -> DashResult<Vec<String>> {
        self.refresh()?;
        if let Some(names) = &self.names {
            return Ok(names.clone());
        }
        let mut workbook: Xlsx<_> = open_workbook(&self.path).context(OpeningExcelSnafu {
            path: self.path.display().to_string(),
        })?;
        let names = workbook.sheet_names().to_vec();
        self.names = Some(names.clone());
        Ok(names)
    }

    /// The table of a sheet, read from the file on first use.
    pub fn load(&mut self, sheet: &str) -> DashResult<&Table> {
        self.refresh()?;
        if let Entry::Vacant(e) = self.sheets.entry(sheet.to_string()) {
            let table = read_sheet(&self.path, sheet)?;
            e.insert(table);
        } else {
            debug!("SheetCache::load: {} from cache", sheet);
        }
        Ok(&self.sheets[sheet])
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }
}

fn modification_time(path: &Path) -> DashResult<SystemTime> {
    if !path.exists() {
        return WorkbookNotFoundSnafu {
            path: path.display().to_string(),
        }
        .fail();
    }
    let path_s = path.display().to_string();
    fs::metadata(path)
        .and_then(|m| m.modified())
        .context(ReadingWorkbookSnafu { path: path_s })
}

pub fn read_sheet(path: &Path, sheet: &str) -> DashResult<Table> {
    let path_s = path.display().to_string();
    debug!("read_sheet: path: {:?} worksheet: {:?}", &path_s, sheet);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path_s.clone(),
    })?;
    let wrange = workbook
        .worksheet_range(sheet)
        .context(SheetNotFoundSnafu {
            sheet,
            path: path_s.clone(),
        })?
        .context(OpeningExcelSnafu { path: path_s })?;

    let mut iter = wrange.rows();
    let headers: Vec<String> = match iter.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(idx, cell))
            .collect(),
        None => Vec::new(),
    };
    debug!("read_sheet: header: {:?}", headers);

    let mut builder = TableBuilder::new(&headers);
    for row in iter {
        let cells: Vec<Cell> = row.iter().map(read_cell).collect();
        // Blank lines are not goals.
        if cells.iter().all(|c| *c == Cell::Empty) {
            continue;
        }
        builder.add_row(cells);
    }
    info!(
        "read_sheet: {}: {} goals, {} columns",
        sheet,
        builder.num_rows(),
        headers.len()
    );
    Ok(builder.build())
}

fn header_name(idx: usize, cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => format!("Unnamed: {}", idx),
    }
}

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Float(f) => Cell::Number(*f),
        DataType::DateTime(f) => Cell::Number(*f),
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Bool(b) => Cell::Bool(*b),
        _ => Cell::Empty,
    }
}
