//! Drawing on top of existing pages and attaching link annotations.
//!
//! Drawing calls are recorded into an [`OverlayBuilder`] per page and written
//! once, at save time, by [`apply_overlay`]: the page's original content is
//! wrapped in `q ... Q` so none of its graphics state leaks into the overlay,
//! then the overlay stream is appended.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream, StringFormat};

use pdftoc_core::document::TextStyle;
use pdftoc_core::geometry::{Color, Point, Rect};

use crate::parser::backend::PageBox;
use crate::PdfError;

/// Resource name under which the overlay font is registered on each page.
pub const OVERLAY_FONT_KEY: &str = "PdfTocHelv";

/// Encode `s` for a simple font using WinAnsiEncoding. Characters outside
/// Latin-1 become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if c as u32 <= 255 { c as u8 } else { b'?' })
        .collect()
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![color.r.into(), color.g.into(), color.b.into()]
}

/// Content operations for one page, converted from top-left page space into
/// PDF user space as they are recorded.
#[derive(Debug, Clone)]
pub struct OverlayBuilder {
    page_box: PageBox,
    content: Content,
}

impl OverlayBuilder {
    pub fn new(page_box: PageBox) -> Self {
        Self {
            page_box,
            content: Content { operations: vec![] },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.operations.is_empty()
    }

    /// Fill and stroke `rect`.
    pub fn rect(&mut self, rect: Rect, stroke: Color, fill: Color) {
        let (x, y) = self.page_box.to_user(rect.x0, rect.y1);
        let ops = &mut self.content.operations;
        ops.push(Operation::new("rg", color_operands(fill)));
        ops.push(Operation::new("RG", color_operands(stroke)));
        ops.push(Operation::new(
            "re",
            vec![
                x.into(),
                y.into(),
                rect.width().into(),
                rect.height().into(),
            ],
        ));
        ops.push(Operation::new("B", vec![]));
    }

    /// One line of text with its baseline starting at `origin`.
    pub fn text(&mut self, origin: Point, text: &str, style: TextStyle) {
        let (x, y) = self.page_box.to_user(origin.x, origin.y);
        let ops = &mut self.content.operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(OVERLAY_FONT_KEY.as_bytes().to_vec()),
                style.font_size.into(),
            ],
        ));
        ops.push(Operation::new("rg", color_operands(style.color)));
        ops.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                x.into(),
                y.into(),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    pub fn finish(self) -> Content {
        self.content
    }
}

/// Add the Helvetica font used by overlay text.
pub fn add_overlay_font(doc: &mut lopdf::Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Resolve `obj` to an owned dictionary, following one reference.
fn owned_dict(doc: &lopdf::Document, obj: &Object) -> Option<Dictionary> {
    match obj {
        Object::Dictionary(d) => Some(d.clone()),
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        _ => None,
    }
}

fn page_dict_mut(doc: &mut lopdf::Document, page: ObjectId) -> Result<&mut Dictionary, PdfError> {
    doc.get_object_mut(page)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfError::Write(format!("page {:?} is not a dictionary: {}", page, e)))
}

/// Register the overlay font on `page`.
///
/// `resources` is the page's effective (possibly inherited) resource
/// dictionary. It is written back inline on the page with its `Font` entry
/// materialised, so sibling pages sharing an inherited dictionary are left
/// untouched.
pub fn register_font(
    doc: &mut lopdf::Document,
    page: ObjectId,
    resources: Option<Dictionary>,
    font: ObjectId,
) -> Result<(), PdfError> {
    let mut resources = resources.unwrap_or_default();
    let mut fonts = resources
        .get(b"Font")
        .ok()
        .and_then(|obj| owned_dict(doc, obj))
        .unwrap_or_default();
    fonts.set(OVERLAY_FONT_KEY, font);
    resources.set("Font", fonts);

    page_dict_mut(doc, page)?.set("Resources", resources);
    Ok(())
}

/// Wrap the existing content of `page` in `q ... Q` and append `overlay`.
pub fn apply_overlay(
    doc: &mut lopdf::Document,
    page: ObjectId,
    overlay: Content,
) -> Result<(), PdfError> {
    let mut body = b"\nQ\n".to_vec();
    body.extend(
        overlay
            .encode()
            .map_err(|e| PdfError::Write(format!("cannot encode overlay: {}", e)))?,
    );

    let current = page_dict_mut(doc, page)?.get(b"Contents").ok().cloned();
    let existing: Vec<Object> = match current {
        Some(Object::Array(items)) => items,
        Some(Object::Reference(id)) => match doc.get_object(id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(id)],
        },
        _ => vec![],
    };

    let contents = if existing.is_empty() {
        // Nothing to isolate; drop the leading `Q`.
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), body.split_off(3)));
        vec![Object::Reference(overlay_id)]
    } else {
        let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), body));
        let mut contents = Vec::with_capacity(existing.len() + 2);
        contents.push(Object::Reference(open_id));
        contents.extend(existing);
        contents.push(Object::Reference(overlay_id));
        contents
    };

    page_dict_mut(doc, page)?.set("Contents", contents);
    Ok(())
}

/// Attach a link on `page` covering `from` (top-left space) that jumps to
/// the top of `target`.
pub fn add_link(
    doc: &mut lopdf::Document,
    page: ObjectId,
    page_box: &PageBox,
    from: Rect,
    target: ObjectId,
    target_box: &PageBox,
) -> Result<ObjectId, PdfError> {
    let dest: Vec<Object> = vec![
        Object::Reference(target),
        "XYZ".into(),
        Object::Null,
        target_box.y1.into(),
        Object::Null,
    ];
    let (llx, lly) = page_box.to_user(from.x0, from.y1);
    let (urx, ury) = page_box.to_user(from.x1, from.y0);
    let rect: Vec<Object> = vec![llx.into(), lly.into(), urx.into(), ury.into()];
    let annot_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect,
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        "A" => dictionary! { "Type" => "Action", "S" => "GoTo", "D" => dest },
    });

    let annots = page_dict_mut(doc, page)?.get(b"Annots").ok().cloned();
    let mut items = match annots {
        Some(Object::Array(items)) => items,
        Some(Object::Reference(id)) => match doc.get_object(id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![],
        },
        _ => vec![],
    };
    items.push(Object::Reference(annot_id));
    page_dict_mut(doc, page)?.set("Annots", items);

    Ok(annot_id)
}
