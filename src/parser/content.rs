//! Content stream interpretation.
//!
//! Walks a page's decoded operations, tracking the graphics state and the
//! text state, and emits text spans and image placements positioned in
//! page space (origin at the top-left corner of the visible page box,
//! y growing downward, units in points).

use std::collections::HashMap;

use log::{debug, warn};

use super::backend::{
    get_number_from_value, BackendFontInfo, BackendImageInfo, ContentOp, PageId, PdfBackend,
    PdfValue,
};
use crate::error::Result;
use crate::model::{BoundingBox, ImagePrimitive, TextSpanPrimitive};

/// Ascent and descent of a glyph box, as fractions of the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// Advance used for glyphs of fonts without a width table, in em.
const FALLBACK_GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustments larger than this (1/1000 em) are treated as word spaces.
const SPACE_THRESHOLD: f32 = 200.0;

/// Visible page area, in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl PageGeometry {
    /// US Letter, used when a page declares no usable box.
    pub const LETTER: PageGeometry = PageGeometry {
        left: 0.0,
        top: 792.0,
        width: 612.0,
        height: 792.0,
    };

    /// Build from a `[llx, lly, urx, ury]` rectangle; corners may be swapped.
    ///
    /// Degenerate or non-finite boxes fall back to [`PageGeometry::LETTER`].
    pub fn from_rect(rect: [f32; 4]) -> Self {
        let bbox = BoundingBox::from(rect);
        if !bbox.is_finite() || bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Self::LETTER;
        }
        Self {
            left: bbox.x0(),
            top: bbox.y1(),
            width: bbox.width(),
            height: bbox.height(),
        }
    }

    /// Width of the visible box in points.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height of the visible box in points.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Map a user-space point to page space.
    pub fn to_page_space(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.left, self.top - y)
    }
}

/// Everything drawn on one page, in content order.
#[derive(Debug, Clone, Default)]
pub struct PagePrimitives {
    pub spans: Vec<TextSpanPrimitive>,
    pub images: Vec<ImagePrimitive>,
}

/// Affine transform `[a b c d e f]`, row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(ops: &[PdfValue]) -> Option<Self> {
        if ops.len() < 6 {
            return None;
        }
        Some(Self {
            a: get_number_from_value(&ops[0])?,
            b: get_number_from_value(&ops[1])?,
            c: get_number_from_value(&ops[2])?,
            d: get_number_from_value(&ops[3])?,
            e: get_number_from_value(&ops[4])?,
            f: get_number_from_value(&ops[5])?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length of the transformed unit y vector.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Graphics state parameters saved and restored by `q`/`Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font_key: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font_key: Vec::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// One piece of a text-showing operation.
enum Segment<'a> {
    Text(&'a [u8]),
    /// Position adjustment in 1/1000 em (TJ numbers).
    Adjust(f32),
}

/// Interprets one page's content stream.
pub struct ContentInterpreter<'a> {
    backend: &'a dyn PdfBackend,
    page: PageId,
    geometry: PageGeometry,
    fonts: HashMap<Vec<u8>, BackendFontInfo>,
    images: HashMap<Vec<u8>, BackendImageInfo>,
}

impl<'a> ContentInterpreter<'a> {
    /// Prepare an interpreter, loading the page's font and image resources.
    pub fn new(backend: &'a dyn PdfBackend, page: PageId, geometry: PageGeometry) -> Result<Self> {
        let fonts = backend
            .page_fonts(page)?
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect();
        let images = backend
            .page_images(page)?
            .into_iter()
            .map(|i| (i.name.clone(), i))
            .collect();
        Ok(Self {
            backend,
            page,
            geometry,
            fonts,
            images,
        })
    }

    /// Load, decode and interpret the page's content stream.
    pub fn interpret_page(&self) -> Result<PagePrimitives> {
        let content = self.backend.page_content(self.page)?;
        if content.is_empty() {
            return Ok(PagePrimitives::default());
        }
        let ops = self.backend.decode_content(&content)?;
        Ok(self.run(&ops))
    }

    /// Interpret a sequence of decoded operations.
    pub fn run(&self, ops: &[ContentOp]) -> PagePrimitives {
        let mut out = PagePrimitives::default();
        let mut gs = GraphicsState::default();
        let mut stack: Vec<GraphicsState> = Vec::new();
        let mut tm = Matrix::IDENTITY;
        let mut tlm = Matrix::IDENTITY;
        let mut in_text_block = false;

        for op in ops {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => stack.push(gs.clone()),
                "Q" => match stack.pop() {
                    Some(saved) => gs = saved,
                    None => debug!("Unbalanced Q operator on page {:?}", self.page),
                },
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        gs.ctm = m.then(&gs.ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    tm = Matrix::IDENTITY;
                    tlm = Matrix::IDENTITY;
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let (Some(PdfValue::Name(name)), Some(size)) =
                        (operands.first(), operands.get(1).and_then(get_number_from_value))
                    {
                        gs.font_key = name.clone();
                        gs.font_size = size;
                    }
                }
                "Tc" => set_number(operands, 0, &mut gs.char_spacing),
                "Tw" => set_number(operands, 0, &mut gs.word_spacing),
                "TL" => set_number(operands, 0, &mut gs.leading),
                "Ts" => set_number(operands, 0, &mut gs.rise),
                "Tz" => {
                    if let Some(scale) = operands.first().and_then(get_number_from_value) {
                        gs.horizontal_scale = scale / 100.0;
                    }
                }
                "Td" | "TD" => {
                    if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                        if op.operator == "TD" {
                            gs.leading = -ty;
                        }
                        tlm = Matrix::translation(tx, ty).then(&tlm);
                        tm = tlm;
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        tlm = m;
                        tm = m;
                    }
                }
                "T*" => {
                    tlm = Matrix::translation(0.0, -gs.leading).then(&tlm);
                    tm = tlm;
                }
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = operands.first() {
                        self.show(&[Segment::Text(bytes)], in_text_block, &gs, &mut tm, &mut out);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = operands.first() {
                        let segments: Vec<Segment<'_>> = items
                            .iter()
                            .filter_map(|item| match item {
                                PdfValue::Str(bytes) => Some(Segment::Text(bytes)),
                                other => get_number_from_value(other).map(Segment::Adjust),
                            })
                            .collect();
                        self.show(&segments, in_text_block, &gs, &mut tm, &mut out);
                    }
                }
                "'" | "\"" => {
                    let text_idx = if op.operator == "\"" {
                        set_number(operands, 0, &mut gs.word_spacing);
                        set_number(operands, 1, &mut gs.char_spacing);
                        2
                    } else {
                        0
                    };
                    tlm = Matrix::translation(0.0, -gs.leading).then(&tlm);
                    tm = tlm;
                    if let Some(PdfValue::Str(bytes)) = operands.get(text_idx) {
                        self.show(&[Segment::Text(bytes)], in_text_block, &gs, &mut tm, &mut out);
                    }
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = operands.first() {
                        self.place_image(name, &gs.ctm, &mut out);
                    }
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            debug!(
                "Content stream on page {:?} ended with {} unrestored q operators",
                self.page,
                stack.len()
            );
        }

        out
    }

    /// Emit one span for a text-showing operation and advance the text matrix.
    fn show(
        &self,
        segments: &[Segment<'_>],
        in_text_block: bool,
        gs: &GraphicsState,
        tm: &mut Matrix,
        out: &mut PagePrimitives,
    ) {
        if !in_text_block {
            return;
        }

        let font = self.fonts.get(&gs.font_key);
        let mut text = String::new();
        let mut width = 0.0f32;

        for segment in segments {
            match segment {
                Segment::Text(bytes) => {
                    let decoded = self.backend.decode_text(self.page, &gs.font_key, bytes);
                    width += self.advance(font, bytes, &decoded, gs);
                    text.push_str(&decoded);
                }
                Segment::Adjust(n) => {
                    width -= n / 1000.0 * gs.font_size * gs.horizontal_scale;
                    if -n > SPACE_THRESHOLD && needs_word_space(&text) {
                        text.push(' ');
                    }
                }
            }
        }

        let trm = tm.then(&gs.ctm);
        if !text.trim().is_empty() {
            let bottom = gs.rise - DESCENT * gs.font_size;
            let top = gs.rise + ASCENT * gs.font_size;
            let corners = [(0.0, bottom), (width, bottom), (0.0, top), (width, top)]
                .map(|(x, y)| {
                    let (ux, uy) = trm.apply(x, y);
                    self.geometry.to_page_space(ux, uy)
                });

            let font_size = gs.font_size * trm.vertical_scale();
            match BoundingBox::from_points(corners) {
                Some(bbox) if bbox.is_finite() && font_size.is_finite() => {
                    let font_name = font.map(|f| f.base_font.clone()).unwrap_or_else(|| {
                        String::from_utf8_lossy(&gs.font_key).to_string()
                    });
                    out.spans
                        .push(TextSpanPrimitive::new(text, bbox, font_name, font_size));
                }
                _ => warn!("Skipping span {:?} with out-of-range geometry", text),
            }
        }

        *tm = Matrix::translation(width, 0.0).then(tm);
    }

    /// Horizontal advance of one string, in unscaled text space.
    fn advance(
        &self,
        font: Option<&BackendFontInfo>,
        bytes: &[u8],
        decoded: &str,
        gs: &GraphicsState,
    ) -> f32 {
        let raw = match font.and_then(|f| f.widths.as_ref()) {
            Some(widths) => bytes
                .iter()
                .map(|&b| {
                    let spacing = if b == b' ' { gs.word_spacing } else { 0.0 };
                    widths.width(b) / 1000.0 * gs.font_size + gs.char_spacing + spacing
                })
                .sum::<f32>(),
            None => decoded
                .chars()
                .map(|c| {
                    let spacing = if c == ' ' { gs.word_spacing } else { 0.0 };
                    FALLBACK_GLYPH_WIDTH * gs.font_size + gs.char_spacing + spacing
                })
                .sum::<f32>(),
        };
        raw * gs.horizontal_scale
    }

    fn place_image(&self, name: &[u8], ctm: &Matrix, out: &mut PagePrimitives) {
        let Some(info) = self.images.get(name) else {
            // Form XObjects and unknown names are not descended into.
            debug!(
                "Skipping non-image XObject /{}",
                String::from_utf8_lossy(name)
            );
            return;
        };

        let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)].map(|(x, y)| {
            let (ux, uy) = ctm.apply(x, y);
            self.geometry.to_page_space(ux, uy)
        });

        match BoundingBox::from_points(corners) {
            Some(bbox) if bbox.is_finite() => out.images.push(ImagePrimitive {
                bbox,
                reference_id: info.object_number,
                width: info.width,
                height: info.height,
                color_space: info.color_space.clone(),
            }),
            _ => warn!(
                "Image /{} has a degenerate placement",
                String::from_utf8_lossy(name)
            ),
        }
    }
}

fn number(operands: &[PdfValue], idx: usize) -> Option<f32> {
    operands.get(idx).and_then(get_number_from_value)
}

fn set_number(operands: &[PdfValue], idx: usize, target: &mut f32) {
    if let Some(value) = number(operands, idx) {
        *target = value;
    }
}

/// Whether a TJ gap should become a space after `text`.
fn needs_word_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => c != ' ' && c != '\u{00A0}' && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
