//! Export packaging: zip the working tree, then reset it.
//!
//! [`export`] compresses everything under `export/` into `export.zip` at the
//! storage root, replacing any prior archive, then deletes the working tree
//! and recreates the empty skeleton so a new session can start immediately.
//!
//! The reset is irreversible by contract: after a successful export the saved
//! images and `info.json` exist only inside the archive. The order matters —
//! the archive is fully written and closed before anything is deleted, so a
//! failure while zipping leaves the working tree untouched.

use crate::store::{Store, StoreError};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Non-UTF-8 path in working tree: {0}")]
    NonUtf8Path(PathBuf),
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub archive: PathBuf,
    /// Files written into the archive (directories not counted).
    pub files: usize,
    /// Uncompressed bytes packed.
    pub bytes: u64,
}

/// Package the working tree into `export.zip` and reset it.
///
/// Callable with zero saved records; the archive then holds only the empty
/// skeleton. An existing archive at the same path is replaced.
pub fn export(store: &Store) -> Result<ExportSummary, ExportError> {
    // A fresh root exports an empty-but-well-formed tree
    store.ensure_layout()?;

    let archive_path = store.archive_path();
    let archive = File::create(&archive_path)?;
    let mut writer = ZipWriter::new(archive);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut files = 0usize;
    let mut bytes = 0u64;

    // Entry names are relative to the storage root so the archive unpacks
    // to an `export/` tree. walkdir yields directories before their contents.
    for entry in WalkDir::new(store.export_dir()).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(store.root())
            .expect("walked path is under the storage root");
        let name = relative
            .to_str()
            .ok_or_else(|| ExportError::NonUtf8Path(entry.path().to_path_buf()))?
            .replace('\\', "/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            bytes += io::copy(&mut source, &mut writer)?;
            files += 1;
        }
    }

    writer.finish()?;

    std::fs::remove_dir_all(store.export_dir())?;
    store.ensure_layout()?;

    Ok(ExportSummary {
        archive: archive_path,
        files,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::Read;
    use tempfile::TempDir;

    fn archive_names(path: &std::path::Path) -> BTreeSet<String> {
        let file = File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn export_packs_tree_and_resets_skeleton() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        store.ensure_layout().unwrap();
        std::fs::write(store.metadata_path(), b"[]").unwrap();
        std::fs::write(store.images_dir().join("a.png"), b"img").unwrap();
        std::fs::write(store.thumbnails_dir().join("a.png"), b"thumb").unwrap();

        let summary = export(&store).unwrap();

        assert_eq!(summary.files, 3);
        assert_eq!(summary.bytes, 2 + 3 + 5);
        assert!(summary.archive.exists());

        let names = archive_names(&summary.archive);
        assert!(names.contains("export/info.json"));
        assert!(names.contains("export/images/a.png"));
        assert!(names.contains("export/thumbnails/a.png"));

        // Fresh empty skeleton on disk
        assert!(store.images_dir().is_dir());
        assert!(store.thumbnails_dir().is_dir());
        assert!(!store.metadata_path().exists());
        assert_eq!(std::fs::read_dir(store.images_dir()).unwrap().count(), 0);
    }

    #[test]
    fn export_with_nothing_saved_produces_skeleton_archive() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());

        let summary = export(&store).unwrap();

        assert_eq!(summary.files, 0);
        let names = archive_names(&summary.archive);
        assert!(names.iter().any(|n| n.starts_with("export/images")));
        assert!(names.iter().any(|n| n.starts_with("export/thumbnails")));
    }

    #[test]
    fn export_replaces_prior_archive() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        store.ensure_layout().unwrap();
        std::fs::write(store.archive_path(), b"old archive bytes").unwrap();

        std::fs::write(store.images_dir().join("b.png"), b"new").unwrap();
        let summary = export(&store).unwrap();

        assert_eq!(summary.files, 1);
        let names = archive_names(&summary.archive);
        assert!(names.contains("export/images/b.png"));
    }

    #[test]
    fn archived_file_contents_survive() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        store.ensure_layout().unwrap();
        std::fs::write(store.metadata_path(), br#"[{"id":"x"}]"#).unwrap();

        let summary = export(&store).unwrap();

        let file = File::open(&summary.archive).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut entry = archive.by_name("export/info.json").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, r#"[{"id":"x"}]"#);
    }
}
