//! Participant roster loaded from a spreadsheet
//!
//! The roster owns the raw table so winners can be struck from the source
//! file without disturbing any other column.

mod error;
mod participant;
mod table;

pub use error::RosterError;
pub use participant::Participant;
pub use table::{Cell, SheetFormat, Table};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

const ID_COLUMNS: &[&str] = &["id", "stt"];
const NAME_COLUMNS: &[&str] = &["name"];
const GROUP_COLUMNS: &[&str] = &["group"];
const DEPARTMENT_COLUMNS: &[&str] = &["department", "dept"];

/// Column positions of the fields the draw cares about
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    name: usize,
    group: Option<usize>,
    department: Option<usize>,
}

impl Columns {
    fn locate(table: &Table) -> Result<Self, RosterError> {
        Ok(Self {
            id: table
                .column(ID_COLUMNS)
                .ok_or(RosterError::MissingColumn { column: "id" })?,
            name: table
                .column(NAME_COLUMNS)
                .ok_or(RosterError::MissingColumn { column: "name" })?,
            group: table.column(GROUP_COLUMNS),
            department: table.column(DEPARTMENT_COLUMNS),
        })
    }
}

/// A validated roster and the file it came from
#[derive(Debug, Clone)]
pub struct RosterFile {
    path: PathBuf,
    format: SheetFormat,
    table: Table,
    columns: Columns,
}

impl RosterFile {
    /// Read and validate a roster. Returns the file handle and its participants.
    ///
    /// Validation is all-or-nothing: a single bad row rejects the whole file.
    pub fn read(path: impl AsRef<Path>) -> Result<(Self, Vec<Participant>), RosterError> {
        let path = path.as_ref();
        let format = SheetFormat::from_path(path)?;
        let table = Table::read(path, format)?;
        Self::from_table(path.to_path_buf(), format, table)
    }

    pub fn from_table(
        path: PathBuf,
        format: SheetFormat,
        table: Table,
    ) -> Result<(Self, Vec<Participant>), RosterError> {
        let columns = Columns::locate(&table)?;
        let participants = parse_participants(&table, columns)?;

        tracing::debug!(
            path = %path.display(),
            rows = table.rows.len(),
            participants = participants.len(),
            "Roster parsed"
        );

        Ok((
            Self {
                path,
                format,
                table,
                columns,
            },
            participants,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Drop every row carrying `id`. Returns how many rows went.
    pub fn remove_participant(&mut self, id: u64) -> usize {
        let id_col = self.columns.id;
        let before = self.table.rows.len();
        self.table
            .rows
            .retain(|row| row.get(id_col).and_then(Cell::as_id) != Some(id));
        before - self.table.rows.len()
    }

    /// Rewrite the source file from the in-memory table
    pub fn save(&self) -> Result<(), RosterError> {
        self.table.write(&self.path, self.format)
    }
}

fn parse_participants(table: &Table, columns: Columns) -> Result<Vec<Participant>, RosterError> {
    let mut seen = HashSet::new();
    let mut participants = Vec::with_capacity(table.rows.len());

    for (idx, row) in table.rows.iter().enumerate() {
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        // Spreadsheet numbering: header is row 1
        let row_number = idx + 2;

        let id = cell(row, columns.id)
            .as_id()
            .ok_or(RosterError::InvalidId { row: row_number })?;
        if !seen.insert(id) {
            return Err(RosterError::DuplicateId { id });
        }

        let name = cell(row, columns.name)
            .as_text()
            .ok_or(RosterError::EmptyName { row: row_number })?;

        participants.push(Participant {
            id,
            name,
            group: columns.group.and_then(|c| cell(row, c).as_text()),
            department: columns.department.and_then(|c| cell(row, c).as_text()),
        });
    }

    Ok(participants)
}

fn cell(row: &[Cell], idx: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(idx).unwrap_or(&EMPTY)
}

#[cfg(test)]
mod roster_tests;
