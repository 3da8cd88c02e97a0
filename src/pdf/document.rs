//! PDF assembly with lopdf.

use super::layout::{PT_PER_MM, PageLayout, PagePlan};
use super::metrics::encode_win_ansi;
use crate::error::Result;
use image::GenericImageView;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

const FONT_NAME: &str = "F1";
const IMAGE_NAME: &str = "Im0";

/// Decoded image ready to embed as an RGB XObject
#[derive(Clone, Debug)]
pub struct EmbeddedImage {
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// Packed 8-bit RGB samples, alpha composited onto white
    pub rgb: Vec<u8>,
}

impl EmbeddedImage {
    /// Decode any format the `image` crate understands
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        let (width, height) = img.dimensions();

        let rgba = img.to_rgba8();
        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let a = u32::from(a);
            for channel in [r, g, b] {
                let blended = (u32::from(channel) * a + 255 * (255 - a)) / 255;
                rgb.push(blended as u8);
            }
        }

        Ok(Self { width, height, rgb })
    }
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Incrementally built document, one page per [`PagePlan`]
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    layout: PageLayout,
}

impl PdfBuilder {
    /// Start an empty document with the given geometry
    pub fn new(layout: PageLayout) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        Self {
            doc,
            pages_id,
            font_id,
            page_ids: Vec::new(),
            layout,
        }
    }

    /// Append a page drawing `plan`, with `image` in the plan's image box
    pub fn add_page(&mut self, plan: &PagePlan, image: Option<&EmbeddedImage>) -> Result<()> {
        let page_height = self.layout.page_height;
        let mut operations = Vec::new();
        let mut xobjects = None;

        if let (Some(placement), Some(image)) = (plan.image, image) {
            let image_id = self.doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => Object::Integer(i64::from(image.width)),
                    "Height" => Object::Integer(i64::from(image.height)),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => Object::Integer(8),
                },
                image.rgb.clone(),
            ));
            xobjects = Some(dictionary! { IMAGE_NAME => image_id });

            let bottom = page_height - (placement.y + placement.height);
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    real(placement.width * PT_PER_MM),
                    real(0.0),
                    real(0.0),
                    real(placement.height * PT_PER_MM),
                    real(placement.x * PT_PER_MM),
                    real(bottom * PT_PER_MM),
                ],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]));
            operations.push(Operation::new("Q", vec![]));
        }

        for line in plan.lines.iter().filter(|l| !l.text.is_empty()) {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_NAME.as_bytes().to_vec()),
                    real(self.layout.font_size),
                ],
            ));
            operations.push(Operation::new(
                "Td",
                vec![
                    real(line.x * PT_PER_MM),
                    real((page_height - line.baseline) * PT_PER_MM),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_win_ansi(&line.text))],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut resources = dictionary! {
            "Font" => dictionary! { FONT_NAME => self.font_id },
        };
        if let Some(xobjects) = xobjects {
            resources.set("XObject", xobjects);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Close the page tree and serialize
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "MediaBox" => vec![
                real(0.0),
                real(0.0),
                real(self.layout.page_width * PT_PER_MM),
                real(self.layout.page_height * PT_PER_MM),
            ],
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
