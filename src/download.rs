use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use crate::models::ExportedFile;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("could not create download directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Saves an exported file into `dir` under its suggested name.
///
/// The bytes land in a temporary file next to the target and are renamed into
/// place, so a failed save never leaves a partial file behind.
pub fn save(dir: &Path, file: &ExportedFile) -> Result<PathBuf, DownloadError> {
    fs::create_dir_all(dir).map_err(|source| DownloadError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(safe_file_name(&file.file_name));
    let write_err = |source| DownloadError::Write {
        path: path.clone(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&file.bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), bytes = file.bytes.len(), "saved export");
    Ok(path)
}

/// Longest file name most filesystems accept, in bytes.
const MAX_NAME_BYTES: usize = 255;

/// Strips path separators and other characters that can't appear in a file
/// name. Long names lose the end of their stem, never the extension. Falls
/// back to `invoice` when nothing is left.
fn safe_file_name(name: &str) -> String {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, sanitize_filename::sanitize(ext)),
        _ => (name, String::new()),
    };

    let mut stem = sanitize_filename::sanitize(stem);
    let suffix = if extension.is_empty() { 0 } else { extension.len() + 1 };
    let mut end = MAX_NAME_BYTES.saturating_sub(suffix).min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    stem.truncate(end);

    if stem.trim_matches('.').is_empty() {
        stem = "invoice".to_string();
    }
    if extension.is_empty() {
        stem
    } else {
        format!("{stem}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExportFormat;

    fn exported(format: ExportFormat, number: &str, bytes: &[u8]) -> ExportedFile {
        ExportedFile {
            format,
            file_name: format.file_name(number),
            content_type: format.default_content_type(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn writes_under_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = save(dir.path(), &exported(ExportFormat::Csv, "", b"a,b\n")).unwrap();
        assert_eq!(path, dir.path().join("invoice_items.csv"));
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n");
    }

    #[test]
    fn invoice_number_cannot_escape_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = save(dir.path(), &exported(ExportFormat::Pdf, "../../etc/x", b"%PDF")).unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert!(path.file_name().unwrap().to_string_lossy().ends_with(".pdf"));
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), &exported(ExportFormat::Json, "", b"{}")).unwrap();
        let path = save(dir.path(), &exported(ExportFormat::Json, "", b"{\"a\":1}")).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"{\"a\":1}");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports/2024");
        let path = save(&nested, &exported(ExportFormat::Xml, "", b"<invoice/>")).unwrap();
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn long_invoice_number_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let number = "N".repeat(300);
        let path = save(dir.path(), &exported(ExportFormat::Pdf, &number, b"%PDF")).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.len() <= MAX_NAME_BYTES);
        assert!(name.starts_with("invoice_NNN"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let name = safe_file_name(&format!("invoice_{}.pdf", "é".repeat(200)));
        assert!(name.len() <= MAX_NAME_BYTES);
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(safe_file_name(".."), "invoice");
        assert_eq!(safe_file_name("invoice_A/B.pdf"), "invoice_AB.pdf");
    }
}
