//! CSV ledger: the spreadsheet output, doubling as the "already parsed" index.
//!
//! Rows are appended, never rewritten. The header is whatever key sequence the
//! first saved record had; later records with a different key set are written
//! anyway and will not line up with it.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::error;

use crate::models::resume::{ParsedResume, FILE_NAME_KEY};

pub const LEDGER_FILE: &str = "data.csv";

pub fn ledger_path(output_folder: &Path) -> PathBuf {
    output_folder.join(LEDGER_FILE)
}

/// True when a ledger row's "File Name" equals `file_name` exactly.
///
/// A missing ledger means nothing has been parsed. Read errors are logged and
/// treated as "not parsed" so a damaged ledger never blocks new work.
pub fn has_been_parsed(output_folder: &Path, file_name: &str) -> bool {
    let path = ledger_path(output_folder);
    if !path.exists() {
        return false;
    }

    match scan_for_file_name(&path, file_name) {
        Ok(found) => found,
        Err(e) => {
            error!("Error checking file existence: {e}");
            false
        }
    }
}

fn scan_for_file_name(path: &Path, file_name: &str) -> Result<bool, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let Some(column) = reader.headers()?.iter().position(|h| h == FILE_NAME_KEY) else {
        return Ok(false);
    };

    for row in reader.records() {
        if row?.get(column) == Some(file_name) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Appends `record` as one row, writing a header of its keys first if the ledger is new.
pub fn append_row(path: &Path, record: &ParsedResume) -> Result<(), csv::Error> {
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(file);

    if is_new {
        writer.write_record(record.keys())?;
    }
    writer.write_record(record.values().map(render_cell))?;
    writer.flush()?;
    Ok(())
}

/// Cell text for one value. Nested sections are kept as compact JSON.
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            value.to_string()
        }
    }
}
