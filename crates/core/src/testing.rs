//! In-memory [`Document`] used by the unit tests of this crate.

use crate::document::{BlockKind, Document, LinkAnnotation, Page, TextBlock, TextStyle, TocEntry};
use crate::geometry::{Color, Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum Drawing {
    Rect {
        page: usize,
        rect: Rect,
        stroke: Color,
        fill: Color,
    },
    Text {
        page: usize,
        origin: Point,
        text: String,
        style: TextStyle,
    },
}

#[derive(Debug, Default)]
pub struct FakeDocument {
    pub pages: Vec<Page>,
    pub links: Vec<(usize, LinkAnnotation)>,
    pub drawings: Vec<Drawing>,
    pub toc: Option<Vec<TocEntry>>,
}

impl FakeDocument {
    /// Build a document from per-page block texts. Entries prefixed with
    /// `"img:"` become NON-TEXT blocks. Each block gets a distinct rectangle
    /// derived from its page and position.
    pub fn from_texts(pages: &[&[&str]]) -> Self {
        let pages = pages
            .iter()
            .enumerate()
            .map(|(index, blocks)| Page {
                index,
                bounds: Rect::new(0.0, 0.0, 595.0, 842.0),
                blocks: blocks
                    .iter()
                    .enumerate()
                    .map(|(i, text)| fake_block(index, i, text))
                    .collect(),
            })
            .collect();

        FakeDocument {
            pages,
            ..Default::default()
        }
    }

    pub fn drawings_on(&self, page: usize) -> Vec<&Drawing> {
        self.drawings
            .iter()
            .filter(|d| match d {
                Drawing::Rect { page: p, .. } | Drawing::Text { page: p, .. } => *p == page,
            })
            .collect()
    }
}

/// Rectangle given to block `i` of page `page` by [`FakeDocument::from_texts`].
pub fn fake_rect(page: usize, i: usize) -> Rect {
    let top = 50.0 + 30.0 * i as f32;
    Rect::new(72.0 + page as f32, top, 300.0, top + 14.0)
}

fn fake_block(page: usize, i: usize, text: &str) -> TextBlock {
    let (kind, text) = match text.strip_prefix("img:") {
        Some(rest) => (BlockKind::NonText, rest),
        None => (BlockKind::Text, text),
    };
    TextBlock {
        rect: fake_rect(page, i),
        text: text.to_string(),
        kind,
        index: i,
    }
}

#[derive(Debug, PartialEq)]
pub struct FakeError(pub String);

impl Document for FakeDocument {
    type Error = FakeError;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Page, FakeError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| FakeError(format!("no page {}", index)))
    }

    fn insert_link(&mut self, page: usize, link: &LinkAnnotation) -> Result<(), FakeError> {
        self.links.push((page, *link));
        Ok(())
    }

    fn draw_rect(
        &mut self,
        page: usize,
        rect: Rect,
        stroke: Color,
        fill: Color,
    ) -> Result<(), FakeError> {
        self.drawings.push(Drawing::Rect {
            page,
            rect,
            stroke,
            fill,
        });
        Ok(())
    }

    fn insert_text(
        &mut self,
        page: usize,
        origin: Point,
        text: &str,
        style: TextStyle,
    ) -> Result<(), FakeError> {
        self.drawings.push(Drawing::Text {
            page,
            origin,
            text: text.to_string(),
            style,
        });
        Ok(())
    }

    fn set_toc(&mut self, entries: &[TocEntry]) -> Result<(), FakeError> {
        self.toc = Some(entries.to_vec());
        Ok(())
    }
}
