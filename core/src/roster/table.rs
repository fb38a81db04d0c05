//! In-memory spreadsheet table
//!
//! The roster is kept as the raw table it was read from so it can be written
//! back with the original header order, extra columns and cell types intact.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook};

use super::error::RosterError;

/// Spreadsheet flavours the roster can round-trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self, RosterError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xlsx") | Some("xlsm") => Ok(SheetFormat::Xlsx),
            Some("csv") => Ok(SheetFormat::Csv),
            _ => Err(RosterError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A single cell value, keeping enough type information to write it back.
///
/// Spreadsheet error values (`#N/A`, `#DIV/0!`, ...) are kept as their text;
/// the writer has no way to store an error result without its formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel serial date/time
    DateTime(f64),
    /// Excel serial duration
    Duration(f64),
}

impl Cell {
    fn from_text(raw: &str) -> Self {
        if raw.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Error(e) => Cell::Text(e.to_string()),
            Data::String(s) => Cell::from_text(s),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) if dt.is_duration() => Cell::Duration(dt.as_f64()),
            Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed textual value; whole floats print without a fraction.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) | Cell::DateTime(f) | Cell::Duration(f)
                if f.is_finite() && f.fract() == 0.0 =>
            {
                Some(format!("{:.0}", f))
            }
            Cell::Float(f) | Cell::DateTime(f) | Cell::Duration(f) => Some(f.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    pub fn as_id(&self) -> Option<u64> {
        match self {
            Cell::Int(i) => u64::try_from(*i).ok(),
            Cell::Float(f) if *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64 => {
                Some(*f as u64)
            }
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn to_csv_field(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            other => other.as_text().unwrap_or_default(),
        }
    }
}

/// Header row plus data rows, all of one width.
///
/// Rows longer than the header widen the table with blank header names so
/// their trailing cells survive a write-back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(mut headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(headers.len());
        headers.resize(width, String::new());
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Index of the first header matching any of `names` (trimmed, case-insensitive)
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers.iter().position(|h| {
            let h = h.trim();
            names.iter().any(|n| h.eq_ignore_ascii_case(n))
        })
    }

    pub fn read(path: &Path, format: SheetFormat) -> Result<Self, RosterError> {
        match format {
            SheetFormat::Xlsx => read_xlsx(path),
            SheetFormat::Csv => read_csv(path),
        }
    }

    pub fn write(&self, path: &Path, format: SheetFormat) -> Result<(), RosterError> {
        match format {
            SheetFormat::Xlsx => self.write_xlsx(path),
            SheetFormat::Csv => self.write_csv(path),
        }
    }

    fn write_xlsx(&self, path: &Path) -> Result<(), RosterError> {
        let wrap = |source| RosterError::Write {
            path: path.to_path_buf(),
            source,
        };

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let duration_format = Format::new().set_num_format("[h]:mm:ss");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, header) in self.headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            sheet.write_string(0, col as u16, header).map_err(wrap)?;
        }

        for (idx, row) in self.rows.iter().enumerate() {
            let r = idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                match cell {
                    Cell::Empty => continue,
                    Cell::Text(s) => sheet.write_string(r, c, s),
                    Cell::Int(i) => sheet.write_number(r, c, *i as f64),
                    Cell::Float(f) => sheet.write_number(r, c, *f),
                    Cell::Bool(b) => sheet.write_boolean(r, c, *b),
                    Cell::DateTime(serial) if serial.fract() == 0.0 => {
                        sheet.write_number_with_format(r, c, *serial, &date_format)
                    }
                    Cell::DateTime(serial) => {
                        sheet.write_number_with_format(r, c, *serial, &datetime_format)
                    }
                    Cell::Duration(serial) => {
                        sheet.write_number_with_format(r, c, *serial, &duration_format)
                    }
                }
                .map_err(wrap)?;
            }
        }

        workbook.save(path).map_err(wrap)
    }

    fn write_csv(&self, path: &Path) -> Result<(), RosterError> {
        let wrap = |source| RosterError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
        writer.write_record(&self.headers).map_err(wrap)?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(Cell::to_csv_field))
                .map_err(wrap)?;
        }
        writer.flush().map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_xlsx(path: &Path) -> Result<Table, RosterError> {
    let wrap = |source| RosterError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(wrap)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RosterError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(wrap)?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|d| Cell::from_data(d).as_text().unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|row| row.iter().map(Cell::from_data).collect())
        .collect();

    Ok(Table::new(headers, rows))
}

fn read_csv(path: &Path) -> Result<Table, RosterError> {
    let wrap = |source| RosterError::Csv {
        path: PathBuf::from(path),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(wrap)?;

    let headers = reader
        .headers()
        .map_err(wrap)?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(wrap)?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(Table::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(
            SheetFormat::from_path(Path::new("staff.XLSX")).unwrap(),
            SheetFormat::Xlsx
        );
        assert_eq!(
            SheetFormat::from_path(Path::new("staff.csv")).unwrap(),
            SheetFormat::Csv
        );
        assert!(matches!(
            SheetFormat::from_path(Path::new("staff.ods")),
            Err(RosterError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_ids_accept_integral_numbers_and_numeric_text() {
        assert_eq!(Cell::Int(4).as_id(), Some(4));
        assert_eq!(Cell::Float(12.0).as_id(), Some(12));
        assert_eq!(Cell::Text(" 9 ".into()).as_id(), Some(9));
        assert_eq!(Cell::Float(1.5).as_id(), None);
        assert_eq!(Cell::Int(-1).as_id(), None);
        assert_eq!(Cell::Text("abc".into()).as_id(), None);
        assert_eq!(Cell::Empty.as_id(), None);
    }

    #[test]
    fn test_whole_floats_render_without_fraction() {
        assert_eq!(Cell::Float(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(Cell::Float(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(Cell::Text("   ".into()).as_text(), None);
    }

    #[test]
    fn test_long_rows_widen_the_header() {
        let table = Table::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Cell::Int(1), Cell::Text("A".into()), Cell::Text("extra".into())],
                vec![Cell::Int(2)],
            ],
        );
        assert_eq!(table.headers, vec!["id", "name", ""]);
        assert_eq!(table.rows[0][2], Cell::Text("extra".into()));
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_error_and_date_cells_keep_their_meaning() {
        use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

        assert_eq!(
            Cell::from_data(&Data::Error(CellErrorType::Div0)),
            Cell::Text("#DIV/0!".into())
        );
        let date = ExcelDateTime::new(45306.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(Cell::from_data(&Data::DateTime(date)), Cell::DateTime(45306.0));
        assert_eq!(Cell::DateTime(45306.0).as_id(), None);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::new(
            vec!["id".into(), "name".into(), "note".into()],
            vec![vec![Cell::Int(1)]],
        );
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], Cell::Empty);
    }

    #[test]
    fn test_column_lookup_ignores_case_and_padding() {
        let table = Table::new(vec![" STT ".into(), "Name".into()], vec![]);
        assert_eq!(table.column(&["id", "stt"]), Some(0));
        assert_eq!(table.column(&["name"]), Some(1));
        assert_eq!(table.column(&["group"]), None);
    }
}
