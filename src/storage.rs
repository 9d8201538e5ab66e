// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for exported files

use crate::constants::naming;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default directory for downloads
///
/// Falls back to the current directory when the platform has no download dir.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `mollycam-photo-<YYYY-MM-DDTHH-MM-SS>.<extension>`
pub fn export_filename(taken_at: &DateTime<Local>, extension: &str) -> String {
    format!(
        "{}{}.{}",
        naming::EXPORT_FILE_PREFIX,
        taken_at.format(naming::TIMESTAMP_FORMAT),
        extension
    )
}

/// Write `data` into `dir` under `filename` without overwriting
///
/// If the name is taken, `-1`, `-2`, ... is appended to the stem the way a
/// browser download would. Creates `dir` if needed.
pub async fn write_unique(dir: &Path, filename: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let candidate = Path::new(filename);
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    let extension = candidate
        .extension()
        .map(|e| e.to_string_lossy().into_owned());

    let mut path = dir.join(filename);
    let mut counter = 0u32;
    loop {
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                use tokio::io::AsyncWriteExt;
                file.write_all(data).await?;
                file.flush().await?;
                debug!(path = %path.display(), bytes = data.len(), "File written");
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter += 1;
                let name = match &extension {
                    Some(ext) => format!("{}-{}.{}", stem, counter, ext),
                    None => format!("{}-{}", stem, counter),
                };
                path = dir.join(name);
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_filename_format() {
        let taken_at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        assert_eq!(
            export_filename(&taken_at, "jpg"),
            "mollycam-photo-2024-03-09T07-05-02.jpg"
        );
        assert_eq!(
            export_filename(&taken_at, "pdf"),
            "mollycam-photo-2024-03-09T07-05-02.pdf"
        );
    }

    #[tokio::test]
    async fn test_write_unique_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();

        let first = write_unique(dir.path(), "a.jpg", b"one").await.unwrap();
        let second = write_unique(dir.path(), "a.jpg", b"two").await.unwrap();

        assert_eq!(first.file_name().unwrap(), "a.jpg");
        assert_eq!(second.file_name().unwrap(), "a-1.jpg");
        assert_eq!(std::fs::read(first).unwrap(), b"one");
        assert_eq!(std::fs::read(second).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_write_unique_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deeper/still");

        let path = write_unique(&nested, "b.pdf", b"%PDF").await.unwrap();
        assert!(path.starts_with(&nested));
    }
}
