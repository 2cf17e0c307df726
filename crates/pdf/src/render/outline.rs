//! Document outline (bookmarks) writer.

use lopdf::{dictionary, Dictionary, Object, ObjectId, StringFormat};

use pdftoc_core::document::TocEntry;
use pdftoc_core::outline::{self, OutlineNode};

use crate::PdfError;

/// Encode `text` as a PDF text string: a literal string when it is plain
/// ASCII, UTF-16BE with a byte-order mark otherwise.
pub fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn catalog_mut(doc: &mut lopdf::Document) -> Result<&mut Dictionary, PdfError> {
    let root = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| PdfError::Write(format!("document has no catalog: {}", e)))?;
    doc.get_object_mut(root)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfError::Write(format!("catalog is not a dictionary: {}", e)))
}

/// Replace the document outline with `entries`.
///
/// `page_ids[i]` is the object of page `i + 1`. An empty `entries` list
/// removes the outline. Entries must satisfy [`outline::validate`].
pub fn write_outline(
    doc: &mut lopdf::Document,
    entries: &[TocEntry],
    page_ids: &[ObjectId],
) -> Result<Option<ObjectId>, PdfError> {
    let nodes = outline::nest(entries)?;
    if let Some(entry) = entries.iter().find(|e| e.page > page_ids.len()) {
        return Err(PdfError::PageOutOfRange {
            index: entry.page - 1,
            count: page_ids.len(),
        });
    }

    catalog_mut(doc)?.remove(b"Outlines");
    if nodes.is_empty() {
        return Ok(None);
    }

    let root_id = doc.new_object_id();
    let ids = write_level(doc, &nodes, root_id, page_ids);
    let (Some(&first), Some(&last)) = (ids.first(), ids.last()) else {
        return Ok(None);
    };

    doc.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => outline::count(&nodes) as i64,
        }),
    );

    let catalog = catalog_mut(doc)?;
    catalog.set("Outlines", root_id);
    catalog.set("PageMode", "UseOutlines");

    Ok(Some(root_id))
}

/// Write one sibling list under `parent` and return the sibling ids in order.
fn write_level(
    doc: &mut lopdf::Document,
    nodes: &[OutlineNode],
    parent: ObjectId,
    page_ids: &[ObjectId],
) -> Vec<ObjectId> {
    let ids: Vec<ObjectId> = nodes.iter().map(|_| doc.new_object_id()).collect();

    for (i, node) in nodes.iter().enumerate() {
        let dest: Vec<Object> = vec![
            Object::Reference(page_ids[node.page - 1]),
            "XYZ".into(),
            Object::Null,
            Object::Null,
            Object::Null,
        ];
        let mut dict = dictionary! {
            "Title" => encode_text_string(&node.title),
            "Parent" => parent,
            "Dest" => dest,
        };
        if i > 0 {
            dict.set("Prev", ids[i - 1]);
        }
        if i + 1 < ids.len() {
            dict.set("Next", ids[i + 1]);
        }

        let children = write_level(doc, &node.children, ids[i], page_ids);
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            dict.set("First", first);
            dict.set("Last", last);
            // Negative: closed by default.
            dict.set("Count", -(outline::count(&node.children) as i64));
        }

        doc.objects.insert(ids[i], Object::Dictionary(dict));
    }

    ids
}
