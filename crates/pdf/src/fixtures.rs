//! In-memory PDFs for tests.
//!
//! Pages are A4 portrait (`595 x 842`). The MediaBox and the Resources
//! dictionary live on the page-tree root, so pages inherit both. Resources
//! hold font `F1` (Helvetica, WinAnsi), every fixture image, and, when a page
//! uses it, font `F2`: a Type0 font with 2-byte Identity-H codes that only its
//! ToUnicode CMap maps back to text.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

/// `F2` glyph codes are printable ASCII shifted down by this much.
const CID_SHIFT: u16 = 0x1D;

const TO_UNICODE_CMAP: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo <<
/Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0003> <0061> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFont {
    /// `F1`, one byte per character.
    Simple,
    /// `F2`, two bytes per character through the ToUnicode CMap.
    Cid,
}

/// Bytes of `text` as shown with `font`.
pub fn encode(font: FixtureFont, text: &str) -> Vec<u8> {
    match font {
        FixtureFont::Simple => text.as_bytes().to_vec(),
        FixtureFont::Cid => text
            .chars()
            .flat_map(|ch| (ch as u16).saturating_sub(CID_SHIFT).to_be_bytes())
            .collect(),
    }
}

/// A text line placed with its baseline at `(x, y)` in PDF space.
#[derive(Debug, Clone)]
pub struct FixtureLine {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub text: String,
    pub font: FixtureFont,
}

/// An image XObject painted over `(x, y, width, height)` in PDF space.
#[derive(Debug, Clone)]
pub struct FixtureImage {
    pub name: &'static str,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FixturePage {
    pub lines: Vec<FixtureLine>,
    pub images: Vec<FixtureImage>,
}

impl FixturePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(self, x: f32, y: f32, size: f32, text: &str) -> Self {
        self.line_in(FixtureFont::Simple, x, y, size, text)
    }

    /// A line shown with the Type0 font `F2`.
    pub fn cid_line(self, x: f32, y: f32, size: f32, text: &str) -> Self {
        self.line_in(FixtureFont::Cid, x, y, size, text)
    }

    fn line_in(mut self, font: FixtureFont, x: f32, y: f32, size: f32, text: &str) -> Self {
        self.lines.push(FixtureLine {
            x,
            y,
            size,
            text: text.to_string(),
            font,
        });
        self
    }

    pub fn image(mut self, image: FixtureImage) -> Self {
        self.images.push(image);
        self
    }

    fn content(&self) -> Content {
        let mut operations = Vec::new();

        for image in &self.images {
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    image.width.into(),
                    0.into(),
                    0.into(),
                    image.height.into(),
                    image.x.into(),
                    image.y.into(),
                ],
            ));
            operations.push(Operation::new(
                "Do",
                vec![Object::Name(image.name.as_bytes().to_vec())],
            ));
            operations.push(Operation::new("Q", vec![]));
        }

        for line in &self.lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(font_key(line.font).to_vec()), line.size.into()],
            ));
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    line.x.into(),
                    line.y.into(),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    encode(line.font, &line.text),
                    match line.font {
                        FixtureFont::Simple => StringFormat::Literal,
                        FixtureFont::Cid => StringFormat::Hexadecimal,
                    },
                )],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        Content { operations }
    }
}

fn font_key(font: FixtureFont) -> &'static [u8] {
    match font {
        FixtureFont::Simple => b"F1",
        FixtureFont::Cid => b"F2",
    }
}

fn add_cid_font(doc: &mut Document) -> lopdf::ObjectId {
    let to_unicode = doc.add_object(Stream::new(
        lopdf::Dictionary::new(),
        TO_UNICODE_CMAP.as_bytes().to_vec(),
    ));
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "ReportSans",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
    });
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "ReportSans",
        "Encoding" => "Identity-H",
        "DescendantFonts" => Object::Array(vec![descendant.into()]),
        "ToUnicode" => to_unicode,
    })
}

/// Serialise `pages` into a complete PDF file.
pub fn build_pdf(pages: &[FixturePage]) -> Vec<u8> {
    build_pdf_in(pages, [0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT])
}

/// Like [`build_pdf`], with every page inheriting `media_box`. Fixture
/// coordinates stay in user space.
pub fn build_pdf_in(pages: &[FixturePage], media_box: [f32; 4]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let mut fonts = dictionary! { "F1" => font_id };
    if pages
        .iter()
        .flat_map(|p| &p.lines)
        .any(|line| line.font == FixtureFont::Cid)
    {
        fonts.set("F2", add_cid_font(&mut doc));
    }

    let mut xobjects = lopdf::Dictionary::new();
    for image in pages.iter().flat_map(|p| &p.images) {
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0x80],
        );
        xobjects.set(image.name, doc.add_object(stream));
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|page| {
            let content = page.content().encode().expect("encode fixture content");
            let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => Object::Array(media_box.iter().map(|&v| v.into()).collect()),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialise fixture pdf");
    bytes
}
