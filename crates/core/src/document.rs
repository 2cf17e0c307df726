//! The document model the engine works against.
//!
//! A concrete PDF engine implements [`Document`]; the engine in
//! [`crate::toc`] never touches bytes, so it can be exercised against an
//! in-memory fake.

use serde::{Deserialize, Serialize};

use crate::geometry::{Color, Point, Rect};

/// Whether a block carries text. Only [`BlockKind::Text`] blocks take part in
/// table-of-contents logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    NonText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub rect: Rect,
    /// Raw content. Multi-line blocks keep their `\n` separators.
    pub text: String,
    pub kind: BlockKind,
    /// Position of the block within its page's emission order.
    pub index: usize,
}

impl TextBlock {
    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }
}

/// A snapshot of one page: its geometry and its blocks in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 0-based page index.
    pub index: usize,
    pub bounds: Rect,
    pub blocks: Vec<TextBlock>,
}

impl Page {
    /// Iterate over the TEXT blocks only, keeping emission order.
    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter(|b| b.is_text())
    }

    /// Plain text of the page: TEXT block contents joined with newlines.
    pub fn text(&self) -> String {
        self.text_blocks()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An item in the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u8,
    pub title: String,
    /// 1-based target page number.
    pub page: usize,
}

/// An internal go-to link placed on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkAnnotation {
    /// Clickable area on the page that holds the annotation.
    pub from: Rect,
    /// 0-based index of the destination page.
    pub target_page: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Color,
}

/// A mutable, page-addressable document.
///
/// Page indices are 0-based. Implementations are free to defer the actual
/// writes until the document is saved, as long as later calls to
/// [`Document::page`] are not required to observe them.
pub trait Document {
    type Error;

    fn page_count(&self) -> usize;

    /// Read the geometry and classified blocks of a page.
    fn page(&self, index: usize) -> Result<Page, Self::Error>;

    /// Attach a go-to link annotation to `page`.
    fn insert_link(&mut self, page: usize, link: &LinkAnnotation) -> Result<(), Self::Error>;

    /// Draw a rectangle stroked with `stroke` and filled with `fill`.
    fn draw_rect(
        &mut self,
        page: usize,
        rect: Rect,
        stroke: Color,
        fill: Color,
    ) -> Result<(), Self::Error>;

    /// Draw a single line of text with its baseline starting at `origin`.
    fn insert_text(
        &mut self,
        page: usize,
        origin: Point,
        text: &str,
        style: TextStyle,
    ) -> Result<(), Self::Error>;

    /// Replace the document outline with `entries`.
    fn set_toc(&mut self, entries: &[TocEntry]) -> Result<(), Self::Error>;
}
