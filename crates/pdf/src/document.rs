//! [`Document`] over a parsed PDF file.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::ObjectId;

use pdftoc_core::document::{Document, LinkAnnotation, Page, TextStyle, TocEntry};
use pdftoc_core::geometry::{Color, Point, Rect};

use crate::parser::backend::{LopdfBackend, PageId, PdfBackend};
use crate::parser::layout;
use crate::render::{outline, overlay};
use crate::PdfError;

/// A PDF opened for reading blocks and writing links, footers, and an
/// outline.
///
/// Links and the outline are written into the object graph immediately.
/// Drawing is buffered per page and applied by [`PdfDocument::save`], so
/// [`Document::page`] always reads the original content.
pub struct PdfDocument {
    backend: LopdfBackend,
    /// Page objects in document order; `page_ids[i]` is page index `i`.
    page_ids: Vec<PageId>,
    overlays: BTreeMap<usize, overlay::OverlayBuilder>,
}

impl PdfDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        let page_ids = backend.pages().into_values().collect();
        Ok(Self {
            backend,
            page_ids,
            overlays: BTreeMap::new(),
        })
    }

    fn page_id(&self, index: usize) -> Result<PageId, PdfError> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(PdfError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })
    }

    fn overlay(&mut self, index: usize) -> Result<&mut overlay::OverlayBuilder, PdfError> {
        let id = self.page_id(index)?;
        if !self.overlays.contains_key(&index) {
            let page_box = self.backend.page_box(id)?;
            self.overlays
                .insert(index, overlay::OverlayBuilder::new(page_box));
        }
        self.overlays
            .get_mut(&index)
            .ok_or(PdfError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })
    }

    /// Write pending overlays into the object graph.
    fn flush_overlays(&mut self) -> Result<(), PdfError> {
        let overlays = std::mem::take(&mut self.overlays);
        if overlays.values().all(|o| o.is_empty()) {
            return Ok(());
        }

        let font = overlay::add_overlay_font(self.backend.raw_doc_mut());
        for (index, builder) in overlays {
            if builder.is_empty() {
                continue;
            }
            let id = self.page_id(index)?;
            let resources = self.backend.page_resources(id)?;
            let doc = self.backend.raw_doc_mut();
            overlay::register_font(doc, id, resources, font)?;
            overlay::apply_overlay(doc, id, builder.finish())?;
        }
        Ok(())
    }

    /// Apply pending drawing and serialise the document.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, PdfError> {
        self.flush_overlays()?;
        let mut bytes = Vec::new();
        self.backend
            .raw_doc_mut()
            .save_to(&mut bytes)
            .map_err(|e| PdfError::Write(e.to_string()))?;
        Ok(bytes)
    }

    /// Apply pending drawing and write the document to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), PdfError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        log::debug!("wrote {}", path.as_ref().display());
        Ok(())
    }
}

impl Document for PdfDocument {
    type Error = PdfError;

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, index: usize) -> Result<Page, PdfError> {
        let id = self.page_id(index)?;
        let page_box = self.backend.page_box(id)?;
        layout::extract_page(&self.backend, id, index, page_box)
    }

    fn insert_link(&mut self, page: usize, link: &LinkAnnotation) -> Result<(), PdfError> {
        let from_id = self.page_id(page)?;
        let target_id = self.page_id(link.target_page)?;
        let from_box = self.backend.page_box(from_id)?;
        let target_box = self.backend.page_box(target_id)?;

        overlay::add_link(
            self.backend.raw_doc_mut(),
            from_id,
            &from_box,
            link.from,
            target_id,
            &target_box,
        )?;
        Ok(())
    }

    fn draw_rect(
        &mut self,
        page: usize,
        rect: Rect,
        stroke: Color,
        fill: Color,
    ) -> Result<(), PdfError> {
        self.overlay(page)?.rect(rect, stroke, fill);
        Ok(())
    }

    fn insert_text(
        &mut self,
        page: usize,
        origin: Point,
        text: &str,
        style: TextStyle,
    ) -> Result<(), PdfError> {
        self.overlay(page)?.text(origin, text, style);
        Ok(())
    }

    fn set_toc(&mut self, entries: &[TocEntry]) -> Result<(), PdfError> {
        let page_ids: Vec<ObjectId> = self.page_ids.clone();
        outline::write_outline(self.backend.raw_doc_mut(), entries, &page_ids)?;
        Ok(())
    }
}
