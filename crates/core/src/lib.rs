//! Core library for pdftoc
//!
//! This crate implements the **Functional Core** of the pdftoc application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`pdftoc_core`** (this crate): the table-of-contents reconstruction
//!   engine, footer layout and first-page predicates, written against the
//!   [`document::Document`] trait. No I/O.
//! - **`pdf`**: the lopdf-backed [`document::Document`] implementation and
//!   file-level orchestration (rename, load, save).
//! - **`pdftoc`**: the command-line shell and its exit-code convention.
//!
//! Because the engine only sees the trait, every heuristic in [`toc`] is
//! tested against an in-memory document with no PDF engine involved.
//!
//! # Module Organization
//!
//! - [`geometry`]: rectangles, points and colors in top-left page space
//! - [`document`]: the Document / Page / TextBlock interfaces
//! - [`toc`]: contents-page harvesting, body-page matching, the full pass
//! - [`footer`]: fixed-geometry page footer
//! - [`outline`]: flat TOC entries to a validated bookmark tree
//! - [`inspect`]: first-page emptiness and substring predicates
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use pdftoc_core::{footer::Footer, toc::add_interactive_toc};
//!
//! let footer = Footer::current("Vdoo", "info@vdoo.com");
//! let report = add_interactive_toc(&mut document, &footer)?;
//!
//! for entry in &report.entries {
//!     println!("{} -> page {}", entry.title, entry.page);
//! }
//! ```

pub mod document;
pub mod footer;
pub mod geometry;
pub mod inspect;
pub mod outline;
pub mod toc;

#[cfg(test)]
pub(crate) mod testing;
