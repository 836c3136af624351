//! The page stack fields are drawn onto: freshly built blank pages, or the
//! pages of a loaded background PDF.

use crate::error::RenderError;
use crate::fonts::{font_dictionary, FONT_RESOURCE};
use crate::xobject::ImageXObject;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use plated_types::{pt_to_mm, Size, A4};

#[derive(Debug, Clone, Copy)]
struct CanvasPage {
    id: ObjectId,
    /// MediaBox size in points.
    size: Size,
    /// MediaBox lower-left corner.
    origin: (f32, f32),
}

pub(crate) struct Canvas {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<CanvasPage>,
    font_id: Option<ObjectId>,
    /// Loaded pages may leave the graphics state modified, so their content
    /// is wrapped in `q`/`Q` before anything is drawn on top.
    isolate_existing: bool,
}

impl Canvas {
    /// A document with `count` blank pages of `size` (millimetres).
    pub fn blank(size: Size, count: usize) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0i64,
            }
            .into(),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut canvas = Self {
            doc,
            pages_id,
            pages: Vec::new(),
            font_id: None,
            isolate_existing: false,
        };
        let size_pt = size.to_pt();
        for _ in 0..count {
            if let Err(err) = canvas.append_page(size_pt) {
                log::error!("Failed to add blank page: {}", err);
            }
        }
        canvas
    }

    /// Loads a background PDF; template pages are overlaid onto its pages.
    pub fn load(bytes: &[u8]) -> Result<Self, RenderError> {
        let doc = Document::load_mem(bytes)?;
        let root_id = doc.trailer.get(b"Root")?.as_reference()?;
        let pages_id = doc.get_dictionary(root_id)?.get(b"Pages")?.as_reference()?;

        let mut pages = Vec::new();
        for (_, page_id) in doc.get_pages() {
            let (origin, size) = media_box(&doc, page_id);
            pages.push(CanvasPage {
                id: page_id,
                size,
                origin,
            });
        }
        if pages.is_empty() {
            return Err(RenderError::Pdf("background PDF has no pages".into()));
        }

        Ok(Self {
            doc,
            pages_id,
            pages,
            font_id: None,
            isolate_existing: true,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page size in millimetres, the unit template geometry uses.
    pub fn page_size_mm(&self, index: usize) -> Size {
        self.pages
            .get(index)
            .map(|p| p.size.to_mm())
            .unwrap_or(A4)
    }

    pub fn page_height_pt(&self, index: usize) -> f32 {
        self.pages
            .get(index)
            .map(|p| p.size.height)
            .unwrap_or_else(|| A4.to_pt().height)
    }

    /// Adds blank pages until there are at least `count`, sized like the
    /// last existing page.
    pub fn ensure_pages(&mut self, count: usize) -> Result<(), RenderError> {
        while self.pages.len() < count {
            let size = self.pages.last().map(|p| p.size).unwrap_or_else(|| A4.to_pt());
            self.append_page(size)?;
        }
        Ok(())
    }

    fn append_page(&mut self, size_pt: Size) -> Result<(), RenderError> {
        let contents_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, Vec::new()).with_compression(false));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0i64.into(), 0i64.into(), size_pt.width.into(), size_pt.height.into()],
            "Contents" => contents_id,
            "Resources" => Dictionary::new(),
        });

        let pages_dict = self.doc.get_object_mut(self.pages_id)?.as_dict_mut()?;
        let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
        kids.push(Object::Reference(page_id));
        let count = pages_dict.get(b"Count")?.as_i64()?;
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", count + 1);

        self.pages.push(CanvasPage {
            id: page_id,
            size: size_pt,
            origin: (0.0, 0.0),
        });
        Ok(())
    }

    /// Stores an image (and its soft mask) and returns the XObject id.
    pub fn add_image(&mut self, image: ImageXObject) -> ObjectId {
        let ImageXObject {
            mut stream, smask, ..
        } = image;
        if let Some(mask) = smask {
            let mask_id = self.doc.add_object(mask);
            stream.dict.set("SMask", mask_id);
        }
        self.doc.add_object(stream)
    }

    fn font_id(&mut self) -> ObjectId {
        match self.font_id {
            Some(id) => id,
            None => {
                let id = self.doc.add_object(font_dictionary());
                self.font_id = Some(id);
                id
            }
        }
    }

    /// Appends `content` on top of page `index`, registering the font and
    /// the given image XObjects in the page resources.
    pub fn overlay(
        &mut self,
        index: usize,
        content: Vec<u8>,
        xobjects: &[(String, ObjectId)],
    ) -> Result<(), RenderError> {
        let page = *self
            .pages
            .get(index)
            .ok_or_else(|| RenderError::Other(format!("page {} is not on the canvas", index)))?;
        let font_id = self.font_id();

        let mut resources = inherited_resources(&self.doc, page.id);
        let mut fonts = sub_dictionary(&self.doc, &resources, b"Font");
        fonts.set(FONT_RESOURCE, font_id);
        resources.set("Font", fonts);
        if !xobjects.is_empty() {
            let mut images = sub_dictionary(&self.doc, &resources, b"XObject");
            for (name, id) in xobjects {
                images.set(name.as_str(), *id);
            }
            resources.set("XObject", images);
        }

        let mut stream_bytes = Vec::new();
        if self.isolate_existing {
            stream_bytes.extend_from_slice(b"Q\n");
        }
        let (ox, oy) = page.origin;
        if ox != 0.0 || oy != 0.0 {
            stream_bytes.extend_from_slice(format!("1 0 0 1 {} {} cm\n", ox, oy).as_bytes());
        }
        stream_bytes.extend_from_slice(&content);
        let overlay_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, stream_bytes).with_compression(false));
        let save_id = if self.isolate_existing {
            Some(self.doc.add_object(
                Stream::new(dictionary! {}, b"q\n".to_vec()).with_compression(false),
            ))
        } else {
            None
        };

        let page_dict = self.doc.get_object_mut(page.id)?.as_dict_mut()?;
        let mut contents = match page_dict.get(b"Contents") {
            Ok(Object::Array(items)) => items.clone(),
            Ok(single) => vec![single.clone()],
            Err(_) => Vec::new(),
        };
        if let Some(id) = save_id {
            contents.insert(0, Object::Reference(id));
        }
        contents.push(Object::Reference(overlay_id));
        page_dict.set("Contents", Object::Array(contents));
        page_dict.set("Resources", resources);
        Ok(())
    }

    pub fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// Looks up a page attribute, following `Parent` links for inherited ones.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok();
    // Page trees are shallow; the bound only guards against cycles.
    for _ in 0..32 {
        let dict = current?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            };
        }
        current = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }
    None
}

fn media_box(doc: &Document, page_id: ObjectId) -> ((f32, f32), Size) {
    let fallback = ((0.0, 0.0), A4.to_pt());
    let Some(Object::Array(values)) = inherited(doc, page_id, b"MediaBox") else {
        return fallback;
    };
    let numbers: Vec<f32> = values.iter().filter_map(|v| v.as_float().ok()).collect();
    match numbers.as_slice() {
        [llx, lly, urx, ury] if urx > llx && ury > lly => {
            ((*llx, *lly), Size::new(urx - llx, ury - lly))
        }
        _ => {
            log::warn!(
                "Page {:?} has an unusable MediaBox, assuming A4 ({:.0} x {:.0} mm)",
                page_id,
                pt_to_mm(fallback.1.width),
                pt_to_mm(fallback.1.height)
            );
            fallback
        }
    }
}

fn inherited_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    match inherited(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    }
}

fn sub_dictionary(doc: &Document, resources: &Dictionary, key: &[u8]) -> Dictionary {
    match resources.get(key) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).cloned().unwrap_or_default(),
        _ => Dictionary::new(),
    }
}
