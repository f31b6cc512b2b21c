//! Upload storage: filename sanitizing and collision-safe placement in the upload folder.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc"];

/// True when `filename` has an extension in `ALLOWED_EXTENSIONS` (case-insensitive).
pub fn is_allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduces a client-supplied name to a safe basename.
///
/// Keeps ASCII alphanumerics, `.`, `_` and `-`; whitespace becomes `_`; anything else
/// is dropped. Leading dots and underscores are stripped so the result is never
/// hidden or a relative path component.
pub fn sanitize_filename(filename: &str) -> String {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = basename
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// `<base>_<YYYYmmdd_HHMMSS><ext>` for a name that is already taken.
pub fn timestamped_filename(filename: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    match filename.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => format!("{base}_{timestamp}.{ext}"),
        _ => format!("{filename}_{timestamp}"),
    }
}

/// Writes the upload into `upload_folder` and returns its final path.
///
/// The bytes land in a temporary file first and are only moved under the
/// sanitized name once fully written. An existing file of that name is kept and
/// the new upload gets a timestamp suffix instead.
pub fn store_upload(upload_folder: &Path, filename: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(upload_folder)?;

    let mut temp = tempfile::Builder::new()
        .prefix("temp_")
        .tempfile_in(upload_folder)?;
    temp.write_all(data)?;
    temp.flush()?;

    let safe_name = sanitize_filename(filename);
    let mut final_path = upload_folder.join(&safe_name);
    if final_path.exists() {
        final_path = upload_folder.join(timestamped_filename(&safe_name));
    }

    temp.persist(&final_path).map_err(|e| e.error)?;
    info!("Stored upload '{}' at {}", filename, final_path.display());
    Ok(final_path)
}
