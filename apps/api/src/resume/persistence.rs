use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::models::resume::ParsedResume;
use crate::resume::ledger;
use crate::resume::ResumeError;

pub const JSON_OUTPUT_FILE: &str = "data.json";

/// Where a parsed record ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `data.json`, overwritten on every save.
    Json,
    /// `data.csv`, one appended row per save.
    Spreadsheet,
}

impl FromStr for OutputFormat {
    type Err = ResumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "spreadsheet" => Ok(OutputFormat::Spreadsheet),
            other => Err(ResumeError::UnsupportedOutputFormat(other.to_string())),
        }
    }
}

/// Writes `record` under `output_folder` and returns the file written to.
///
/// The format is checked before anything touches the disk.
pub fn save(
    record: &ParsedResume,
    format: &str,
    output_folder: &Path,
) -> Result<PathBuf, ResumeError> {
    let format: OutputFormat = format.parse()?;

    fs::create_dir_all(output_folder)?;

    let path = match format {
        OutputFormat::Json => {
            let path = output_folder.join(JSON_OUTPUT_FILE);
            fs::write(&path, to_pretty_json(record)?)?;
            path
        }
        OutputFormat::Spreadsheet => {
            let path = ledger::ledger_path(output_folder);
            ledger::append_row(&path, record)?;
            path
        }
    };

    info!("Saved parsed resume as {:?} to {}", format, path.display());
    Ok(path)
}

/// Pretty JSON with a four-space indent.
fn to_pretty_json(record: &ParsedResume) -> Result<Vec<u8>, ResumeError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record
        .serialize(&mut serializer)
        .map_err(|e| ResumeError::Filesystem(e.into()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::response::parse_response;
    use serde_json::{json, Value};

    fn record(raw: &str, file_name: &str) -> ParsedResume {
        parse_response(raw, file_name).unwrap()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_output_format_parses_known_values() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "spreadsheet".parse::<OutputFormat>().unwrap(),
            OutputFormat::Spreadsheet
        );
        assert!("JSON".parse::<OutputFormat>().is_err());
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_is_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");

        save(&record(r#"{"Name":"A"}"#, "a.pdf"), "json", &out).unwrap();
        let path = save(&record(r#"{"Name":"B"}"#, "b.pdf"), "json", &out).unwrap();

        assert_eq!(path, out.join(JSON_OUTPUT_FILE));
        assert_eq!(read_json(&path), json!({"Name": "B", "File Name": "b.pdf"}));
    }

    #[test]
    fn test_json_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = save(&record(r#"{"Name":"A"}"#, "a.pdf"), "json", dir.path()).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text, "{\n    \"Name\": \"A\",\n    \"File Name\": \"a.pdf\"\n}");
    }

    #[test]
    fn test_spreadsheet_writes_one_header_and_n_rows() {
        let dir = tempfile::tempdir().unwrap();
        let n = 4;
        let mut path = PathBuf::new();
        for i in 0..n {
            let raw = format!(r#"{{"Name":"Person {i}","Skills":["Rust"]}}"#);
            path = save(&record(&raw, &format!("{i}.pdf")), "spreadsheet", dir.path()).unwrap();
        }

        assert_eq!(path, dir.path().join(ledger::LEDGER_FILE));
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["Name", "Skills", "File Name"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), n);
        assert_eq!(&rows[2][0], "Person 2");
        assert_eq!(&rows[2][1], r#"["Rust"]"#);
        assert_eq!(&rows[2][2], "2.pdf");
    }

    #[test]
    fn test_unknown_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never-created");

        let err = save(&record(r#"{"Name":"A"}"#, "a.pdf"), "xml", &out).unwrap_err();

        match err {
            ResumeError::UnsupportedOutputFormat(f) => assert_eq!(f, "xml"),
            other => panic!("expected UnsupportedOutputFormat, got {other:?}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");
        let path = save(&record(r#"{"Name":"A"}"#, "a.pdf"), "json", &out).unwrap();
        assert!(path.exists());
    }
}
