//! File-level entry points.
//!
//! [`add_interactive_toc`] rewrites a PDF in place. The input is first
//! renamed to its [`backup_path`], read back into memory, and the processed
//! document is written under the original name. The backup stays on disk
//! after a successful run.

use std::fs;
use std::path::{Path, PathBuf};

use pdftoc_core::footer::Footer;
use pdftoc_core::{inspect, toc::TocReport};

use crate::document::PdfDocument;
use crate::PdfError;

/// `<stem>_old.<ext>` next to `path`, or `<name>_old` when there is no
/// extension.
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_old.{}", stem, ext.to_string_lossy()),
        None => format!("{}_old", stem),
    };
    path.with_file_name(name)
}

/// Rebuild the table of contents of the PDF at `path`, add its contents-page
/// links and footers, and write the result back to `path`.
pub fn add_interactive_toc(
    path: impl AsRef<Path>,
    footer: &Footer,
) -> Result<TocReport, PdfError> {
    let path = path.as_ref();
    let backup = backup_path(path);

    fs::rename(path, &backup)?;
    log::debug!("moved {} to {}", path.display(), backup.display());

    match rewrite(&backup, path, footer) {
        Ok(report) => Ok(report),
        Err(err) => {
            if let Err(restore) = fs::rename(&backup, path) {
                log::warn!(
                    "could not restore {} from {}: {}",
                    path.display(),
                    backup.display(),
                    restore
                );
            }
            Err(err)
        }
    }
}

fn rewrite(source: &Path, target: &Path, footer: &Footer) -> Result<TocReport, PdfError> {
    let mut doc = PdfDocument::open(source)?;
    let report = pdftoc_core::toc::add_interactive_toc(&mut doc, footer)?;
    doc.save(target)?;
    Ok(report)
}

/// `true` if the first page of the PDF at `path` has no text.
pub fn first_page_is_empty(path: impl AsRef<Path>) -> Result<bool, PdfError> {
    let doc = PdfDocument::open(path)?;
    inspect::first_page_is_empty(&doc)
}

/// `true` if `text` occurs on the first page of the PDF at `path`.
pub fn first_page_contains(path: impl AsRef<Path>, text: &str) -> Result<bool, PdfError> {
    let doc = PdfDocument::open(path)?;
    inspect::first_page_contains(&doc, text)
}
