//! Text extraction, line grouping, and block assembly.
//!
//! This module turns raw PDF content-stream operators into the positioned
//! blocks of a [`pdftoc_core::document::Page`]. Every public function is a
//! pure transformation -- I/O lives behind the [`PdfBackend`] trait provided
//! by the caller.
//!
//! # Pipeline
//!
//! ```text
//! content ops  ->  TextSpan[]        ->  TextLine[]  ->  line groups  ->  Page
//!   (per page)     ImagePlacement[]      group_spans     group_lines      build_page
//! ```
//!
//! Coordinates stay in PDF user space (origin bottom-left) until
//! [`build_page`] flips them into the top-left space of the core model.

use std::collections::HashMap;

use pdftoc_core::document::{BlockKind, Page, TextBlock};
use pdftoc_core::geometry::Rect;

use super::backend::{
    get_number_from_value, BackendFontInfo, PageBox, PageId, PdfBackend, PdfValue, TextDecoder,
};
use super::cleanup::cleanup_text;
use crate::PdfError;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A single run of text at a specific position on the page.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    /// Baseline, in user space.
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_name: String,
}

/// A horizontal line of text assembled from one or more [`TextSpan`]s that
/// share (approximately) the same baseline.
#[derive(Debug, Clone, Default)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub y: f32,
    pub x: f32,
    pub font_size: f32,
}

impl TextLine {
    /// Concatenate all span texts with a single space separator.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Right edge of the last span.
    pub fn right(&self) -> f32 {
        self.spans
            .iter()
            .map(|s| s.x + s.width)
            .fold(self.x, f32::max)
    }
}

/// An image XObject painted on the page, as its user-space bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub name: Vec<u8>,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Everything the extractor saw on one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub spans: Vec<TextSpan>,
    pub images: Vec<ImagePlacement>,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Two spans whose Y coordinates differ by less than this are treated as
/// belonging to the same line.
const Y_TOLERANCE: f32 = 1.0;

/// Approximate character width as a fraction of font size when no better
/// metric is available.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Minimum gap (in points) between adjacent spans before we insert a space.
const MIN_WORD_GAP: f32 = 1.5;

/// When grouping lines into blocks, a vertical gap larger than this multiple
/// of the line's font size starts a new block.
const BLOCK_GAP_FACTOR: f32 = 1.4;

/// Glyph extent above and below the baseline, as fractions of font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

// ---------------------------------------------------------------------------
// CJK / spaceless-script helper
// ---------------------------------------------------------------------------

/// Returns `true` if `c` belongs to a script that does not use inter-word
/// spaces (CJK, Hiragana, Katakana, Hangul, Thai, etc.).
pub fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2A6DF
        | 0xF900..=0xFAFF
        | 0x3040..=0x30FF
        | 0x31F0..=0x31FF
        | 0xAC00..=0xD7AF
        | 0x1100..=0x11FF
        | 0x3130..=0x318F
        | 0x3000..=0x303F
        | 0xFF00..=0xFFEF
        | 0x0E00..=0x0EFF
        | 0x1000..=0x109F
        | 0x1780..=0x17FF
        | 0x0F00..=0x0FFF
    )
}

// ---------------------------------------------------------------------------
// Internal: matrices
// ---------------------------------------------------------------------------

/// The identity 2x3 matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m` followed by `n` (PDF row-vector convention: `m x n`).
fn multiply(m: &[f32; 6], n: &[f32; 6]) -> [f32; 6] {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn transform_point(m: &[f32; 6], x: f32, y: f32) -> (f32, f32) {
    (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5])
}

/// Length of the transformed unit vector along y.
fn vertical_scale(m: &[f32; 6]) -> f32 {
    (m[2].powi(2) + m[3].powi(2)).sqrt()
}

fn horizontal_scale(m: &[f32; 6]) -> f32 {
    (m[0].powi(2) + m[1].powi(2)).sqrt()
}

fn matrix_operands(operands: &[PdfValue]) -> Option<[f32; 6]> {
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    match vals.as_slice() {
        &[a, b, c, d, e, f] => Some([a, b, c, d, e, f]),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Internal: PDF text-state machine
// ---------------------------------------------------------------------------

/// Mutable state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    /// Current font resource name (the `/F1`-style key, not the full name).
    font_key: Vec<u8>,
    /// Resolved base-font name for the current font.
    font_name: String,
    /// Current font size in text-space units.
    font_size: f32,
    text_matrix: [f32; 6],
    /// Text line matrix -- set by BT and updated by Td/TD/T*/Tm.
    line_matrix: [f32; 6],
    /// Current transformation matrix (`cm`), saved and restored by `q`/`Q`.
    ctm: [f32; 6],
    ctm_stack: Vec<[f32; 6]>,
    /// Horizontal scaling factor (percent / 100).
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            ctm: IDENTITY_MATRIX,
            ctm_stack: Vec::new(),
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Current text origin (plus rise) in user space.
    fn position(&self) -> (f32, f32) {
        let (x, y) = transform_point(&self.text_matrix, 0.0, self.text_rise);
        transform_point(&self.ctm, x, y)
    }

    /// Rendered font size in user space.
    fn effective_font_size(&self) -> f32 {
        (self.font_size * vertical_scale(&self.text_matrix) * vertical_scale(&self.ctm)).abs()
    }

    /// Factor converting text-space advances into user-space widths.
    fn width_scale(&self) -> f32 {
        horizontal_scale(&self.text_matrix) * horizontal_scale(&self.ctm)
    }

    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Multiply the text line matrix by a translation (used by Td / TD).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn set_font(&mut self, key: Vec<u8>, base_font: &str, size: f32) {
        self.font_key = key;
        self.font_size = size;
        self.font_name = base_font.to_string();
    }

    fn save(&mut self) {
        self.ctm_stack.push(self.ctm);
    }

    /// Unbalanced `Q` operators are ignored.
    fn restore(&mut self) {
        if let Some(ctm) = self.ctm_stack.pop() {
            self.ctm = ctm;
        }
    }
}

fn resolve_font<'a>(key: &[u8], fonts: &'a [BackendFontInfo]) -> Option<&'a BackendFontInfo> {
    fonts.iter().find(|info| info.name == key)
}

/// Text-space advance of `text` given the current spacing parameters.
fn text_advance(text: &str, state: &TextState) -> f32 {
    text.chars()
        .map(|ch| {
            let mut w = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale
                + state.char_spacing;
            if ch == ' ' {
                w += state.word_spacing;
            }
            w
        })
        .sum()
}

/// Advance the text matrix after rendering `text` and return the user-space
/// width that was covered.
fn advance_after_show(text: &str, state: &mut TextState) -> f32 {
    let dx = text_advance(text, state);
    state.advance_x(dx);
    dx * state.width_scale()
}

fn decode_string(val: &PdfValue, decoder: &TextDecoder, font_key: &[u8]) -> String {
    match val {
        PdfValue::Str(bytes) => decoder.decode(font_key, bytes),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Public API: content extraction
// ---------------------------------------------------------------------------

/// Walk a single page's content stream and collect its text spans and image
/// placements.
///
/// | Operator | Action |
/// |----------|--------|
/// | `q` / `Q` | Save / restore the CTM |
/// | `cm`     | Concatenate onto the CTM |
/// | `Do`     | Record an image placement (image XObjects only) |
/// | `BT`     | Begin text object -- reset matrices |
/// | `Tf`     | Set font and size |
/// | `Tm`     | Set text matrix directly |
/// | `Td` / `TD` / `T*` | Move to a new line |
/// | `TL` / `Tc` / `Tw` / `Tz` / `Ts` | Text state parameters |
/// | `Tj` / `TJ` / `'` / `"` | Show text |
pub fn extract_page_content(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<PageContent, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();
    let decoder = backend.text_decoder(page_id).unwrap_or_default();
    let image_names = backend.page_image_names(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut content = PageContent::default();

    for op in &ops {
        match op.operator.as_str() {
            "q" => state.save(),
            "Q" => state.restore(),
            "cm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    state.ctm = multiply(&m, &state.ctm);
                }
            }
            "Do" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    if image_names.contains(name) {
                        content.images.push(place_image(name, &state.ctm));
                    }
                }
            }

            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => {}

            "Tf" => handle_tf(&op.operands, &fonts, &mut state),
            "Tm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.translate_line(0.0, -state.leading),
            "TL" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.text_rise = v;
                }
            }

            "Tj" => {
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, &decoder, &mut state, &mut content.spans);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    handle_tj_array(arr, &decoder, &mut state, &mut content.spans);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, &decoder, &mut state, &mut content.spans);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    if let Some(aw) = get_number_from_value(&op.operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = get_number_from_value(&op.operands[1]) {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    emit_show_string(&op.operands[2], &decoder, &mut state, &mut content.spans);
                }
            }

            _ => {}
        }
    }

    Ok(content)
}

/// An image paints the unit square under the CTM.
fn place_image(name: &[u8], ctm: &[f32; 6]) -> ImagePlacement {
    let corners = [
        transform_point(ctm, 0.0, 0.0),
        transform_point(ctm, 1.0, 0.0),
        transform_point(ctm, 0.0, 1.0),
        transform_point(ctm, 1.0, 1.0),
    ];
    let xs = corners.iter().map(|c| c.0);
    let ys = corners.iter().map(|c| c.1);
    ImagePlacement {
        name: name.to_vec(),
        x0: xs.clone().fold(f32::INFINITY, f32::min),
        x1: xs.fold(f32::NEG_INFINITY, f32::max),
        y0: ys.clone().fold(f32::INFINITY, f32::min),
        y1: ys.fold(f32::NEG_INFINITY, f32::max),
    }
}

fn handle_tf(operands: &[PdfValue], fonts: &[BackendFontInfo], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        PdfValue::Str(s) => s.clone(),
        _ => return,
    };
    let size = get_number_from_value(&operands[1]).unwrap_or(0.0);
    if let Some(info) = resolve_font(&key, fonts) {
        let base = info.base_font.as_deref().unwrap_or("");
        state.set_font(key, base, size);
    } else {
        let name = String::from_utf8_lossy(&key).to_string();
        state.set_font(key, &name, size);
    }
}

/// Shared by `Tj`, `'`, and `"`.
fn emit_show_string(
    operand: &PdfValue,
    decoder: &TextDecoder,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let text = decode_string(operand, decoder, &state.font_key);
    if text.is_empty() {
        return;
    }
    let (x, y) = state.position();
    let font_size = state.effective_font_size();
    let width = advance_after_show(&text, state);
    spans.push(TextSpan {
        text,
        x,
        y,
        width,
        font_size,
        font_name: state.font_name.clone(),
    });
}

/// Process a `TJ` array: elements are either strings to render or numeric
/// kerning adjustments (in thousandths of a unit of text space).
fn handle_tj_array(
    arr: &[PdfValue],
    decoder: &TextDecoder,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let mut buf = String::new();
    let (span_x, span_y) = state.position();
    let mut width = 0.0;

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, decoder, &state.font_key);
                buf.push_str(&fragment);
                width += advance_after_show(&fragment, state);
            }
            val => {
                // Negative value = move right, positive = move left.
                if let Some(adj) = get_number_from_value(val) {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;

                    if dx > gap_threshold && !buf.is_empty() {
                        buf.push(' ');
                    }

                    state.advance_x(dx);
                    width += dx * state.width_scale();
                }
            }
        }
    }

    let trimmed = buf.trim_end();
    if trimmed.is_empty() {
        return;
    }
    spans.push(TextSpan {
        text: trimmed.to_string(),
        x: span_x,
        y: span_y,
        width,
        font_size: state.effective_font_size(),
        font_name: state.font_name.clone(),
    });
}

// ---------------------------------------------------------------------------
// Public API: span -> line grouping
// ---------------------------------------------------------------------------

/// Group a flat list of [`TextSpan`]s into [`TextLine`]s, top of the page
/// first.
///
/// Spans whose Y coordinates are within [`Y_TOLERANCE`] points of each other
/// are placed on the same line.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_spans: Vec<TextSpan> = Vec::new();
    let mut current_y = spans[0].y;

    for span in spans {
        if (span.y - current_y).abs() > Y_TOLERANCE && !current_spans.is_empty() {
            lines.push(assemble_line(std::mem::take(&mut current_spans)));
        }
        if current_spans.is_empty() {
            current_y = span.y;
        }
        current_spans.push(span);
    }

    if !current_spans.is_empty() {
        lines.push(assemble_line(current_spans));
    }

    lines
}

/// Build a [`TextLine`] from spans known to share the same baseline.
///
/// When a gap between consecutive spans exceeds [`MIN_WORD_GAP`] points and
/// the boundary is not between spaceless-script characters, an inter-word
/// space is added.
fn assemble_line(mut spans: Vec<TextSpan>) -> TextLine {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut merged: Vec<TextSpan> = Vec::with_capacity(spans.len());

    for span in spans {
        if let Some(prev) = merged.last_mut() {
            let gap = span.x - (prev.x + prev.width);
            let same_font = prev.font_name == span.font_name
                && (prev.font_size - span.font_size).abs() < 0.5;

            if same_font && gap > -prev.font_size && gap < prev.font_size * 2.0 {
                if gap >= MIN_WORD_GAP && !boundary_is_spaceless(prev, &span) {
                    prev.text.push(' ');
                }
                prev.text.push_str(&span.text);
                prev.width = (span.x + span.width) - prev.x;
                continue;
            }
        }

        merged.push(span);
    }

    let y = merged.first().map(|s| s.y).unwrap_or(0.0);
    let x = merged.first().map(|s| s.x).unwrap_or(0.0);
    let font_size = dominant_font_size(&merged);

    TextLine {
        spans: merged,
        y,
        x,
        font_size,
    }
}

/// Returns the font size that covers the most characters in the spans.
fn dominant_font_size(spans: &[TextSpan]) -> f32 {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for s in spans {
        let key = (s.font_size * 100.0).round() as i32;
        *counts.entry(key).or_insert(0) += s.text.chars().count();
    }
    counts
        .into_iter()
        .max_by_key(|&(size, count)| (count, size))
        .map(|(k, _)| k as f32 / 100.0)
        .unwrap_or(0.0)
}

fn boundary_is_spaceless(prev: &TextSpan, next: &TextSpan) -> bool {
    match (prev.text.chars().next_back(), next.text.chars().next()) {
        (Some(l), Some(f)) => is_spaceless_script_char(l) && is_spaceless_script_char(f),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Public API: line -> block grouping
// ---------------------------------------------------------------------------

/// Group consecutive lines into blocks. A new block starts when the vertical
/// gap between two lines exceeds [`BLOCK_GAP_FACTOR`] times the upper line's
/// font size.
pub fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    let mut blocks: Vec<Vec<TextLine>> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if (prev.y - line.y).abs() > prev.font_size * BLOCK_GAP_FACTOR {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Bounding box of a line group, flipped into top-left page space.
fn lines_rect(lines: &[TextLine], page_box: &PageBox) -> Rect {
    lines.iter().fold(Rect::default(), |acc, line| {
        let (x0, y0) = page_box.to_page(line.x, line.y + line.font_size * ASCENT);
        let (x1, y1) = page_box.to_page(line.right(), line.y - line.font_size * DESCENT);
        acc.union(&Rect::new(x0, y0, x1, y1))
    })
}

// ---------------------------------------------------------------------------
// Public API: full pipeline
// ---------------------------------------------------------------------------

/// Assemble the page snapshot: TEXT blocks from grouped lines and one
/// NON-TEXT block per image, ordered top to bottom.
///
/// Text blocks are cleaned with [`cleanup_text`]; blocks left empty are
/// dropped. Lines inside a block are joined with `\n`.
pub fn build_page(content: PageContent, index: usize, page_box: PageBox) -> Page {
    let lines = group_spans_into_lines(content.spans);
    let mut blocks: Vec<TextBlock> = group_lines_into_blocks(lines)
        .into_iter()
        .filter_map(|group| {
            let text = cleanup_text(
                &group
                    .iter()
                    .map(TextLine::text)
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
            (!text.is_empty()).then(|| TextBlock {
                rect: lines_rect(&group, &page_box),
                text,
                kind: BlockKind::Text,
                index: 0,
            })
        })
        .collect();

    blocks.extend(content.images.iter().map(|image| {
        let (x0, y0) = page_box.to_page(image.x0, image.y1);
        let (x1, y1) = page_box.to_page(image.x1, image.y0);
        TextBlock {
            rect: Rect::new(x0, y0, x1, y1),
            text: String::new(),
            kind: BlockKind::NonText,
            index: 0,
        }
    }));

    blocks.sort_by(|a, b| a.rect.y0.total_cmp(&b.rect.y0));
    for (i, block) in blocks.iter_mut().enumerate() {
        block.index = i;
    }

    Page {
        index,
        bounds: Rect::new(0.0, 0.0, page_box.width(), page_box.height()),
        blocks,
    }
}

/// Extract page `index` (0-based), bounded by `page_box`, into a [`Page`].
pub fn extract_page(
    backend: &dyn PdfBackend,
    page_id: PageId,
    index: usize,
    page_box: PageBox,
) -> Result<Page, PdfError> {
    let content = extract_page_content(backend, page_id)?;
    log::trace!(
        "page {}: {} spans, {} images",
        index,
        content.spans.len(),
        content.images.len()
    );
    Ok(build_page(content, index, page_box))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
