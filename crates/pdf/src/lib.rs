//! PDF backend for the table-of-contents engine.
//!
//! [`PdfDocument`] implements [`pdftoc_core::document::Document`] on top of
//! `lopdf`: pages are read through the content-stream extractor in
//! [`parser`], and links, outlines, and footers are written by [`render`].
//! The [`toc`] module holds the file-level entry points used by the CLI.

use thiserror::Error;

use pdftoc_core::outline::OutlineError;

pub mod document;
pub mod parser;
pub mod render;
pub mod toc;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::PdfDocument;
pub use toc::{add_interactive_toc, backup_path, first_page_contains, first_page_is_empty};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("Page {index} is out of range, the document has {count} pages")]
    PageOutOfRange { index: usize, count: usize },
    #[error("Invalid outline: {0}")]
    Outline(#[from] OutlineError),
    #[error("PDF write error: {0}")]
    Write(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
