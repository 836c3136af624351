use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object};

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text shown on a 1-based page, one entry per `Tj` operation.
    pub fn page_strings(&self, page: u32) -> Vec<String> {
        let Some(page_id) = self.doc.get_pages().get(&page).copied() else {
            return Vec::new();
        };
        let Ok(content) = self.doc.get_page_content(page_id) else {
            return Vec::new();
        };
        Content::decode(&content)
            .map(|content| {
                content
                    .operations
                    .into_iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.into_iter().next() {
                        Some(Object::String(bytes, _)) => {
                            Some(bytes.into_iter().map(char::from).collect())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn strings(&self) -> Vec<String> {
        (1..=self.page_count() as u32)
            .flat_map(|page| self.page_strings(page))
            .collect()
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.strings().iter().any(|s| s == text)
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}
