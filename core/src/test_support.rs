//! Helpers shared by the unit tests

use std::path::{Path, PathBuf};

/// Fresh, empty directory under the system temp dir, unique per test name and process
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("lucky-draw-tests")
        .join(format!("{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Write a csv roster with the given header line and rows
pub fn write_csv(dir: &Path, file: &str, header: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(file);
    let mut body = String::from(header);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    std::fs::write(&path, body).expect("write csv roster");
    path
}
