use std::collections::BTreeMap;

use lopdf::{self, content::Content};

use crate::PdfError;

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// A page's MediaBox in PDF user space, normalised so that `(x0, y0)` is the
/// lower-left corner.
///
/// Top-left page space, used by [`pdftoc_core`], puts `(0, 0)` at
/// `(x0, y1)` with y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageBox {
    /// A box with its lower-left corner at the origin.
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: width,
            y1: height,
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// User-space point to top-left page space.
    pub fn to_page(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.x0, self.y1 - y)
    }

    /// Top-left page-space point to user space.
    pub fn to_user(&self, x: f32, y: f32) -> (f32, f32) {
        (x + self.x0, self.y1 - y)
    }
}

/// Font information extracted from a page's resource dictionary.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// The font name key as it appears in the resource dictionary (e.g. `b"F1"`).
    pub name: Vec<u8>,
    /// Base font name from the font dictionary, if present.
    pub base_font: Option<String>,
}

/// Turns the string operands of text-showing operators into Unicode for one
/// page.
///
/// Each page font's `/Encoding` and `/ToUnicode` entries are resolved once, so
/// Type0 fonts with 2-byte Identity-H codes decode through their CMap. Fonts
/// with no usable encoding fall back to [`decode_text_simple`].
#[derive(Default)]
pub struct TextDecoder<'a> {
    encodings: BTreeMap<Vec<u8>, lopdf::Encoding<'a>>,
}

impl TextDecoder<'_> {
    pub fn decode(&self, font_name: &[u8], bytes: &[u8]) -> String {
        self.encodings
            .get(font_name)
            .and_then(|encoding| lopdf::Document::decode_text(encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }
}

/// A simplified, lopdf-independent representation of a PDF value.
///
/// Content-stream operands are converted to this enum so the extraction
/// state machine in [`super::layout`] works on plain data.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Dict(Vec<(Vec<u8>, PdfValue)>),
    Reference(PageId),
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Extract an `f32` from a [`PdfValue`], accepting both `Integer` and `Real`.
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(f) => Some(*f),
        _ => None,
    }
}

/// Convert a `lopdf::Object` into a [`PdfValue`]. Stream bodies are dropped,
/// only their dictionaries survive.
pub fn convert_object(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Null => PdfValue::Null,
        lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => PdfValue::Dict(convert_entries(dict)),
        lopdf::Object::Stream(stream) => PdfValue::Dict(convert_entries(&stream.dict)),
        lopdf::Object::Reference(id) => PdfValue::Reference(*id),
    }
}

fn convert_entries(dict: &lopdf::Dictionary) -> Vec<(Vec<u8>, PdfValue)> {
    dict.iter()
        .map(|(k, v)| (k.clone(), convert_object(v)))
        .collect()
}

/// Best-effort decoding of raw PDF string bytes into a Rust `String`.
///
/// UTF-16BE with a BOM first, then UTF-8, then Latin-1 byte-per-char.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let code_units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// PdfBackend trait
// ---------------------------------------------------------------------------

/// Read access to a parsed PDF, as needed by the text-block extractor.
///
/// Kept separate from `lopdf` so the extractor can be driven by pre-decoded
/// operations in tests.
pub trait PdfBackend {
    /// Return a mapping from 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return font information for every font referenced by the given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>, PdfError>;

    /// Resource names of the image XObjects available to the given page.
    fn page_image_names(&self, page: PageId) -> Result<Vec<Vec<u8>>, PdfError>;

    /// Return the raw (possibly compressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError>;

    /// Decode raw content-stream bytes into a sequence of [`ContentOp`]s.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError>;

    /// The decoder for the string operands of text-showing operators on the
    /// given page.
    fn text_decoder(&self, page: PageId) -> Result<TextDecoder<'_>, PdfError>;
}

// ---------------------------------------------------------------------------
// LopdfBackend
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] implementation backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    /// Parse a PDF from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &lopdf::Document {
        &self.doc
    }

    pub fn raw_doc_mut(&mut self) -> &mut lopdf::Document {
        &mut self.doc
    }

    /// The page's (possibly inherited) MediaBox. Corners given in any order
    /// are normalised.
    pub fn page_box(&self, page: PageId) -> Result<PageBox, PdfError> {
        let page_dict = self.page_dict(page)?;

        let media_box = self
            .find_inherited(page_dict, b"MediaBox")
            .and_then(|obj| self.resolve_array(obj))
            .ok_or_else(|| PdfError::Parse("MediaBox not found for page".into()))?;

        let nums = self.array_to_f32s(&media_box)?;
        if nums.len() < 4 {
            return Err(PdfError::Parse(format!(
                "MediaBox has {} elements, expected 4",
                nums.len()
            )));
        }

        Ok(PageBox {
            x0: nums[0].min(nums[2]),
            y0: nums[1].min(nums[3]),
            x1: nums[0].max(nums[2]),
            y1: nums[1].max(nums[3]),
        })
    }

    /// Resolve a page's `Resources`, following the page tree for inherited
    /// values and one level of indirection. Returns an owned copy.
    pub fn page_resources(&self, page: PageId) -> Result<Option<lopdf::Dictionary>, PdfError> {
        let page_dict = self.page_dict(page)?;
        Ok(self
            .find_inherited(page_dict, b"Resources")
            .and_then(|obj| self.resolve_dict(obj))
            .cloned())
    }

    pub(crate) fn page_dict(&self, page: PageId) -> Result<&lopdf::Dictionary, PdfError> {
        self.doc
            .get_object(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page object: {}", e)))?
            .as_dict()
            .map_err(|e| PdfError::Parse(format!("page object is not a dictionary: {}", e)))
    }

    // -- private helpers ----------------------------------------------------

    /// Look `key` up on a page dictionary, walking `Parent` links for
    /// inheritable attributes.
    fn find_inherited<'a>(
        &'a self,
        dict: &'a lopdf::Dictionary,
        key: &[u8],
    ) -> Option<&'a lopdf::Object> {
        if let Ok(obj) = dict.get(key) {
            return Some(obj);
        }

        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = self.doc.get_object(parent_id).ok()?.as_dict().ok()?;
        self.find_inherited(parent, key)
    }

    /// Resolve an object to an array, following a single level of indirection.
    fn resolve_array(&self, obj: &lopdf::Object) -> Option<Vec<lopdf::Object>> {
        match obj {
            lopdf::Object::Array(arr) => Some(arr.clone()),
            lopdf::Object::Reference(id) => self
                .doc
                .get_object(*id)
                .ok()
                .and_then(|o| o.as_array().ok())
                .cloned(),
            _ => None,
        }
    }

    /// Resolve an object to a dictionary, following a single level of indirection.
    fn resolve_dict<'a>(&'a self, obj: &'a lopdf::Object) -> Option<&'a lopdf::Dictionary> {
        match obj {
            lopdf::Object::Dictionary(d) => Some(d),
            lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?.as_dict().ok(),
            _ => None,
        }
    }

    /// Convert a vector of lopdf objects to `f32` values.
    fn array_to_f32s(&self, objects: &[lopdf::Object]) -> Result<Vec<f32>, PdfError> {
        objects
            .iter()
            .map(|obj| {
                let resolved = match obj {
                    lopdf::Object::Reference(id) => self
                        .doc
                        .get_object(*id)
                        .map_err(|e| PdfError::Parse(e.to_string()))?,
                    other => other,
                };
                match resolved {
                    lopdf::Object::Integer(i) => Ok(*i as f32),
                    lopdf::Object::Real(f) => Ok(*f),
                    _ => Err(PdfError::Parse(format!(
                        "expected number in array, got {:?}",
                        resolved
                    ))),
                }
            })
            .collect()
    }
}

/// A `Name` entry of a dictionary as a `String`.
fn name_entry(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

// ---------------------------------------------------------------------------
// PdfBackend implementation for LopdfBackend
// ---------------------------------------------------------------------------

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
        let fonts_map = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page fonts: {}", e)))?;

        Ok(fonts_map
            .iter()
            .map(|(name, dict)| BackendFontInfo {
                name: name.clone(),
                base_font: name_entry(dict, b"BaseFont"),
            })
            .collect())
    }

    fn page_image_names(&self, page: PageId) -> Result<Vec<Vec<u8>>, PdfError> {
        let Some(resources) = self.page_resources(page)? else {
            return Ok(Vec::new());
        };
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .and_then(|obj| self.resolve_dict(obj))
        else {
            return Ok(Vec::new());
        };

        let names = xobjects
            .iter()
            .filter(|(_, obj)| {
                let resolved = match obj {
                    lopdf::Object::Reference(id) => self.doc.get_object(*id).ok(),
                    other => Some(*other),
                };
                matches!(
                    resolved,
                    Some(lopdf::Object::Stream(s))
                        if s.dict.get(b"Subtype").ok().and_then(|o| o.as_name().ok()) == Some(b"Image".as_slice())
                )
            })
            .map(|(name, _)| name.clone())
            .collect();

        Ok(names)
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
        let content = Content::decode(data)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn text_decoder(&self, page: PageId) -> Result<TextDecoder<'_>, PdfError> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page fonts: {}", e)))?;

        let mut encodings = BTreeMap::new();
        for (name, font) in fonts {
            // lopdf falls back to StandardEncoding, with a warning, for
            // anything else.
            let named = font.get(b"Encoding").and_then(lopdf::Object::as_name).is_ok();
            if !named && !font.has(b"ToUnicode") {
                continue;
            }
            match font.get_font_encoding(&self.doc) {
                Ok(encoding) => {
                    encodings.insert(name, encoding);
                }
                Err(e) => log::debug!(
                    "font {} has no usable encoding: {}",
                    String::from_utf8_lossy(&name),
                    e
                ),
            }
        }

        Ok(TextDecoder { encodings })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
