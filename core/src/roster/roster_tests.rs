//! Tests for roster loading, validation and write-back

use super::*;
use crate::test_support::{scratch_dir, write_csv};

fn table(headers: &[&str], rows: Vec<Vec<Cell>>) -> Table {
    Table::new(headers.iter().map(|h| h.to_string()).collect(), rows)
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

#[test]
fn test_csv_roster_loads_all_rows() {
    let dir = scratch_dir("roster_csv_loads");
    let path = write_csv(
        &dir,
        "staff.csv",
        "STT,Name,Group,Department",
        &["1,Alice,G1,Sales", "2,Bob,,Ops", "3,Carol,G2,"],
    );

    let (_, participants) = RosterFile::read(&path).unwrap();

    assert_eq!(participants.len(), 3);
    assert_eq!(
        participants[0],
        Participant::new(1, "Alice")
            .with_group("G1")
            .with_department("Sales")
    );
    assert_eq!(participants[1].group, None);
    assert_eq!(participants[1].department.as_deref(), Some("Ops"));
    assert_eq!(participants[2].department, None);

    let ids: HashSet<u64> = participants.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), participants.len(), "ids must be unique");
}

#[test]
fn test_missing_name_column_is_rejected() {
    let result = RosterFile::from_table(
        PathBuf::from("staff.csv"),
        SheetFormat::Csv,
        table(&["id", "group"], vec![vec![Cell::Int(1), text("G1")]]),
    );

    let err = result.unwrap_err();
    assert!(matches!(err, RosterError::MissingColumn { column: "name" }));
    assert!(err.is_validation());
}

#[test]
fn test_missing_id_column_is_rejected() {
    let result = RosterFile::from_table(
        PathBuf::from("staff.csv"),
        SheetFormat::Csv,
        table(&["name"], vec![vec![text("Alice")]]),
    );

    assert!(matches!(
        result,
        Err(RosterError::MissingColumn { column: "id" })
    ));
}

#[test]
fn test_group_and_department_are_optional() {
    let (_, participants) = RosterFile::from_table(
        PathBuf::from("staff.csv"),
        SheetFormat::Csv,
        table(&["ID", "NAME"], vec![vec![Cell::Float(5.0), text("Eve")]]),
    )
    .unwrap();

    assert_eq!(participants, vec![Participant::new(5, "Eve")]);
}

#[test]
fn test_empty_name_reports_spreadsheet_row() {
    let result = RosterFile::from_table(
        PathBuf::from("staff.csv"),
        SheetFormat::Csv,
        table(
            &["id", "name"],
            vec![
                vec![Cell::Int(1), text("Alice")],
                vec![Cell::Int(2), text("  ")],
            ],
        ),
    );

    assert!(matches!(result, Err(RosterError::EmptyName { row: 3 })));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let result = RosterFile::from_table(
        PathBuf::from("staff.csv"),
        SheetFormat::Csv,
        table(
            &["id", "name"],
            vec![
                vec![Cell::Int(7), text("Alice")],
                vec![text("7"), text("Bob")],
            ],
        ),
    );

    assert!(matches!(result, Err(RosterError::DuplicateId { id: 7 })));
}

#[test]
fn test_invalid_id_is_rejected() {
    let result = RosterFile::from_table(
        PathBuf::from("staff.csv"),
        SheetFormat::Csv,
        table(&["id", "name"], vec![vec![text("first"), text("Alice")]]),
    );

    assert!(matches!(result, Err(RosterError::InvalidId { row: 2 })));
}

#[test]
fn test_blank_rows_are_skipped() {
    let (_, participants) = RosterFile::from_table(
        PathBuf::from("staff.csv"),
        SheetFormat::Csv,
        table(
            &["id", "name"],
            vec![
                vec![Cell::Int(1), text("Alice")],
                vec![Cell::Empty, text("")],
                vec![Cell::Int(2), text("Bob")],
            ],
        ),
    )
    .unwrap();

    assert_eq!(participants.len(), 2);
}

#[test]
fn test_unsupported_extension_is_validation_error() {
    let err = RosterFile::read("staff.txt").unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = scratch_dir("roster_missing_file");
    let err = RosterFile::read(dir.join("absent.csv")).unwrap_err();
    assert!(!err.is_validation());
}

#[test]
fn test_csv_write_back_preserves_columns() {
    let dir = scratch_dir("roster_csv_write_back");
    let path = write_csv(
        &dir,
        "staff.csv",
        "Name,Seat,STT",
        &["Alice,A1,1", "Bob,B2,2", "Carol,C3,3"],
    );

    let (mut roster, _) = RosterFile::read(&path).unwrap();
    assert_eq!(roster.remove_participant(2), 1);
    roster.save().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "Name,Seat,STT\nAlice,A1,1\nCarol,C3,3\n");

    let (_, reloaded) = RosterFile::read(&path).unwrap();
    assert_eq!(
        reloaded.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[test]
fn test_xlsx_round_trip_keeps_cell_types() {
    let dir = scratch_dir("roster_xlsx_round_trip");
    let path = dir.join("staff.xlsx");

    let original = table(
        &["STT", "Name", "Group", "Department", "Score", "Joined", "Shift"],
        vec![
            vec![
                Cell::Int(1),
                text("Alice"),
                text("G1"),
                text("Sales"),
                Cell::Float(9.5),
                Cell::DateTime(45306.0),
                Cell::Duration(0.5),
            ],
            vec![
                Cell::Int(2),
                text("Bob"),
                Cell::Empty,
                text("Ops"),
                Cell::Float(7.0),
                Cell::DateTime(45307.25),
                Cell::Duration(0.25),
            ],
        ],
    );
    original.write(&path, SheetFormat::Xlsx).unwrap();

    let (mut roster, participants) = RosterFile::read(&path).unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[1].group, None);
    assert_eq!(roster.table().headers, original.headers);

    roster.remove_participant(1);
    roster.save().unwrap();

    let (roster, participants) = RosterFile::read(&path).unwrap();
    assert_eq!(participants, vec![Participant::new(2, "Bob").with_department("Ops")]);
    let kept = &roster.table().rows[0];
    assert_eq!(kept[4].as_text().as_deref(), Some("7"));
    assert_eq!(kept[5], Cell::DateTime(45307.25));
    assert_eq!(kept[6], Cell::Duration(0.25));
}

#[test]
fn test_csv_write_back_keeps_cells_past_the_header() {
    let dir = scratch_dir("roster_csv_overflow");
    let path = write_csv(&dir, "staff.csv", "id,name", &["1,A,extra", "2,B,keep"]);

    let (mut roster, participants) = RosterFile::read(&path).unwrap();
    assert_eq!(participants.len(), 2);
    roster.remove_participant(1);
    roster.save().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,name,\n2,B,keep\n");
    let (_, reloaded) = RosterFile::read(&path).unwrap();
    assert_eq!(reloaded, vec![Participant::new(2, "B")]);
}

#[test]
fn test_removing_unknown_id_keeps_table() {
    let (mut roster, _) = RosterFile::from_table(
        PathBuf::from("staff.csv"),
        SheetFormat::Csv,
        table(&["id", "name"], vec![vec![Cell::Int(1), text("Alice")]]),
    )
    .unwrap();

    assert_eq!(roster.remove_participant(99), 0);
    assert_eq!(roster.table().rows.len(), 1);
}
