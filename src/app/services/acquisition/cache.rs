//! On-disk station-year cache
//!
//! One file per station-year, named `{station_id}-{year}.gz`, holding the
//! gzip container exactly as the archive served it. A file is only trusted
//! if it is non-empty, decompresses cleanly and yields at least one
//! non-blank line. Writes go to a temporary file in the target directory and
//! are renamed into place, so a concurrent reader sees either nothing or a
//! complete archive.

use crate::constants::archive_file_name;
use crate::{Error, Result};
use flate2::read::MultiGzDecoder;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where a station-year archive came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    /// The configured (or per-request) cache directory
    CacheDir,
    /// The current working directory
    WorkingDir,
    /// Freshly fetched through the transport
    Fetched,
}

impl std::fmt::Display for CacheSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CacheSource::CacheDir => "cache directory",
            CacheSource::WorkingDir => "working directory",
            CacheSource::Fetched => "remote archive",
        };
        f.write_str(label)
    }
}

/// A resolved station-year and its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub station_id: String,
    pub year: i32,
    pub source: CacheSource,
    /// Local file backing the entry; `None` when fetched without a cache directory
    pub path: Option<PathBuf>,
}

/// Path of a station-year archive inside `dir`
pub fn archive_path(dir: &Path, station_id: &str, year: i32) -> PathBuf {
    dir.join(archive_file_name(station_id, year))
}

/// Decompress an archive, rejecting anything that is not a usable record file
///
/// The error string says why the bytes were rejected.
pub fn decompress_archive(bytes: &[u8]) -> std::result::Result<String, String> {
    if bytes.is_empty() {
        return Err("archive is empty".to_string());
    }

    let mut raw = Vec::new();
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut raw)
        .map_err(|e| format!("archive does not decompress: {}", e))?;

    let text = String::from_utf8_lossy(&raw).into_owned();
    if !text.lines().any(|line| !line.trim().is_empty()) {
        return Err("archive holds no records".to_string());
    }
    Ok(text)
}

/// Write `bytes` to `dir/file_name` atomically, creating `dir` if needed
pub fn persist_atomic(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::io(
            format!("Failed to create cache directory {}", dir.display()),
            e,
        )
    })?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
        Error::io(
            format!("Failed to create temporary file in {}", dir.display()),
            e,
        )
    })?;
    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| Error::io("Failed to write cache file", e))?;

    let path = dir.join(file_name);
    temp.persist(&path).map_err(|e| {
        Error::io(
            format!("Failed to move cache file into place at {}", path.display()),
            e.error,
        )
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::TempDir;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_valid_archive_decompresses() {
        let text = decompress_archive(&gzip("line one\nline two\n")).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_invalid_archives_are_rejected() {
        assert!(decompress_archive(&[]).is_err());
        assert!(decompress_archive(b"plain text, not gzip").is_err());
        assert!(decompress_archive(&gzip("  \n\n")).is_err());

        let full = gzip("0123456789\n".repeat(50).as_str());
        assert!(decompress_archive(&full[..full.len() / 2]).is_err());
    }

    #[test]
    fn test_persist_atomic_creates_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested").join("cache");

        let path = persist_atomic(&target, "725030-14732-2020.gz", b"payload").unwrap();
        assert_eq!(path, archive_path(&target, "725030-14732", 2020));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");

        // Only the final file remains; the temporary file was renamed
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 1);
    }

    #[test]
    fn test_persist_atomic_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        persist_atomic(dir.path(), "a.gz", b"old").unwrap();
        let path = persist_atomic(dir.path(), "a.gz", b"new").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }
}
