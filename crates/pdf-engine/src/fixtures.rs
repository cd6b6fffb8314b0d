//! In-memory PDF builders used by tests across the workspace.
//!
//! Pages are empty apart from their MediaBox, which is all the viewer needs
//! for layout: page count and intrinsic page sizes.

use lopdf::{dictionary, Document, Object};

/// Builds a minimal PDF with one page per `(width_pt, height_pt)` entry.
pub fn sample_pdf(page_sizes: &[(f32, f32)]) -> Vec<u8> {
    build(page_sizes, false)
}

/// Like [`sample_pdf`], but carrying an `/Encrypt` trailer entry so the
/// engine's encryption guard fires.
pub fn encrypted_pdf(page_sizes: &[(f32, f32)]) -> Vec<u8> {
    build(page_sizes, true)
}

fn build(page_sizes: &[(f32, f32)], encrypted_marker: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = page_sizes
        .iter()
        .map(|&(width, height)| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Real(0.0),
                    Object::Real(0.0),
                    Object::Real(width),
                    Object::Real(height),
                ],
            })
            .into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if encrypted_marker {
        doc.trailer.set("Encrypt", Object::Null);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("in-memory fixture save cannot fail");

    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_pdf_round_trips_through_lopdf() {
        let bytes = sample_pdf(&[(600.0, 800.0), (300.0, 500.0)]);
        let doc = Document::load_mem(&bytes).expect("fixture should parse");

        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn encrypted_pdf_carries_the_marker() {
        let bytes = encrypted_pdf(&[(600.0, 800.0)]);
        assert!(bytes.windows("/Encrypt".len()).any(|w| w == b"/Encrypt"));
    }
}
