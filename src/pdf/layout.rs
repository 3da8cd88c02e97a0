//! Page geometry for gallery exports.
//!
//! All lengths are millimetres measured from the top-left corner of the page;
//! font sizes are points. The writer converts to PDF user space.

use super::metrics::text_width;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Points per millimetre
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// A4 width
pub const A4_WIDTH_MM: f32 = 210.0;
/// A4 height
pub const A4_HEIGHT_MM: f32 = 297.0;
/// Left and top margin
pub const DEFAULT_MARGIN_MM: f32 = 15.0;
/// Image and text column width
pub const DEFAULT_CONTENT_WIDTH_MM: f32 = 180.0;
/// Gap between image bottom and first text baseline
pub const DEFAULT_TEXT_GAP_MM: f32 = 10.0;
/// Description font size
pub const DEFAULT_FONT_SIZE_PT: f32 = 12.0;
/// Baseline-to-baseline distance as a multiple of the font size
pub const DEFAULT_LINE_HEIGHT: f32 = 1.15;

/// Fixed page geometry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Page width
    pub page_width: f32,
    /// Page height
    pub page_height: f32,
    /// Left edge of image and text
    pub margin_left: f32,
    /// Top edge of the image
    pub margin_top: f32,
    /// Image width; height follows the source aspect ratio
    pub image_width: f32,
    /// Wrap width of the description
    pub text_width: f32,
    /// Distance from image bottom to the first text baseline
    pub text_gap: f32,
    /// Description font size in points
    pub font_size: f32,
    /// Line spacing factor
    pub line_height: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_MM,
            page_height: A4_HEIGHT_MM,
            margin_left: DEFAULT_MARGIN_MM,
            margin_top: DEFAULT_MARGIN_MM,
            image_width: DEFAULT_CONTENT_WIDTH_MM,
            text_width: DEFAULT_CONTENT_WIDTH_MM,
            text_gap: DEFAULT_TEXT_GAP_MM,
            font_size: DEFAULT_FONT_SIZE_PT,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

/// Where the image goes, top-left origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageBox {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

/// One line of wrapped description text
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Left edge
    pub x: f32,
    /// Baseline, from the top of the page
    pub baseline: f32,
    /// Content
    pub text: String,
}

/// Everything drawn on one page
#[derive(Clone, Debug, PartialEq)]
pub struct PagePlan {
    /// Record placed on the page
    pub record_id: String,
    /// Image placement; None when the image could not be loaded
    pub image: Option<ImageBox>,
    /// Wrapped description lines
    pub lines: Vec<TextLine>,
}

impl PageLayout {
    /// Reject geometry where content would not fit across the page
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("export.layout.page_width", self.page_width),
            ("export.layout.page_height", self.page_height),
            ("export.layout.image_width", self.image_width),
            ("export.layout.text_width", self.text_width),
            ("export.layout.font_size", self.font_size),
            ("export.layout.line_height", self.line_height),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::config(key, format!("must be positive, got {value}")));
            }
        }

        if self.margin_left < 0.0 || self.margin_top < 0.0 || self.text_gap < 0.0 {
            return Err(Error::config("export.layout", "margins and gap must not be negative"));
        }

        let usable = self.page_width - self.margin_left;
        if self.image_width > usable {
            return Err(Error::config(
                "export.layout.image_width",
                format!("{} mm does not fit in {} mm", self.image_width, usable),
            ));
        }
        if self.text_width > usable {
            return Err(Error::config(
                "export.layout.text_width",
                format!("{} mm does not fit in {} mm", self.text_width, usable),
            ));
        }
        if 2.0 * self.margin_top >= self.page_height {
            return Err(Error::config("export.layout.margin_top", "no room left for content"));
        }
        Ok(())
    }

    /// Distance between baselines in millimetres
    pub fn line_step(&self) -> f32 {
        self.font_size * self.line_height / PT_PER_MM
    }

    /// Image box for a source of `width_px` x `height_px`
    ///
    /// The image spans `image_width` with the height following the aspect
    /// ratio. When the image plus `reserved` millimetres of text below it would
    /// pass the bottom margin, the image is scaled down to leave that room.
    pub fn place_image(&self, width_px: u32, height_px: u32, reserved: f32) -> ImageBox {
        let aspect = height_px.max(1) as f32 / width_px.max(1) as f32;
        let natural = self.image_width * aspect;
        // text longer than the page still gets a visible image
        let max_height = (self.page_height - 2.0 * self.margin_top - reserved).max(self.line_step());

        let (width, height) = if natural > max_height {
            (max_height / aspect, max_height)
        } else {
            (self.image_width, natural)
        };

        ImageBox {
            x: self.margin_left,
            y: self.margin_top,
            width,
            height,
        }
    }

    /// Lay out one record: image box (if any) and wrapped description below it
    ///
    /// Every baseline stays within the bottom margin unless the text alone is
    /// longer than the page; text is never continued on another page.
    pub fn plan_page(
        &self,
        record_id: &str,
        image_px: Option<(u32, u32)>,
        description: Option<&str>,
    ) -> PagePlan {
        let wrapped = description
            .filter(|d| !d.trim().is_empty())
            .map(|d| wrap_text(d, self.font_size, self.text_width))
            .unwrap_or_default();

        let text_height = match wrapped.len() {
            0 => 0.0,
            n => self.text_gap + (n - 1) as f32 * self.line_step(),
        };
        let image = image_px.map(|(w, h)| self.place_image(w, h, text_height));

        let first_baseline = match &image {
            Some(b) => b.y + b.height + self.text_gap,
            None => self.margin_top + self.font_size / PT_PER_MM,
        };

        let lines = wrapped
            .into_iter()
            .enumerate()
            .map(|(i, text)| TextLine {
                x: self.margin_left,
                baseline: first_baseline + i as f32 * self.line_step(),
                text,
            })
            .collect();

        PagePlan {
            record_id: record_id.to_string(),
            image,
            lines,
        }
    }
}

/// Word-wrap `text` to `max_width_mm` at `font_size` points
///
/// Explicit line breaks are kept. Words wider than a full line are split
/// between characters.
pub fn wrap_text(text: &str, font_size: f32, max_width_mm: f32) -> Vec<String> {
    let max_width = max_width_mm * PT_PER_MM;
    let fits = |s: &str| text_width(s, font_size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if fits(word) {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    current.push(c);
                    if !fits(&current) && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
        }

        lines.push(current);
    }

    lines
}
