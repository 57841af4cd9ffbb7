//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from content interpretation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Limit on `Parent` hops when resolving inherited page attributes.
const MAX_TREE_DEPTH: usize = 32;

/// Glyph advance widths of a simple (single-byte) font.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphWidths {
    /// Character code of the first entry in `widths`.
    pub first_char: u32,
    /// Advances in 1/1000 text-space units.
    pub widths: Vec<f32>,
    /// Advance for codes outside the table.
    pub missing_width: f32,
}

impl GlyphWidths {
    /// Advance width for a character code, in 1/1000 text-space units.
    pub fn width(&self, code: u8) -> f32 {
        (code as u32)
            .checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.missing_width)
    }
}

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
    /// Glyph widths; `None` for composite fonts or fonts without a table.
    pub widths: Option<GlyphWidths>,
}

/// Image XObject information returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendImageInfo {
    /// XObject resource name (key in the page's XObject dictionary).
    pub name: Vec<u8>,
    /// Object number of the image stream.
    pub object_number: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color space name.
    pub color_space: Option<String>,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Abstract interface for PDF document access.
///
/// The content interpreter reads pages only through this trait, so tests can
/// feed it hand-written content streams without a PDF on disk.
pub trait PdfBackend {
    /// PDF version string (e.g., "1.7").
    fn version(&self) -> String;

    /// Return all pages as (page_number → PageId), page numbers 1-based.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Visible page box `[llx, lly, urx, ury]` in user space
    /// (CropBox, else MediaBox, following inheritance).
    fn page_box(&self, page: PageId) -> Option<[f32; 4]>;

    /// Return font info for a given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Return the image XObjects available to a page.
    fn page_images(&self, page: PageId) -> Result<Vec<BackendImageInfo>>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Decode string bytes without font information.
///
/// UTF-16BE when the bytes start with a byte order mark, else UTF-8, else
/// Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Stream data with filters applied; undecodable streams are used as stored.
fn stream_bytes(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Cut inline images (`BI <dict> ID <data> EI`) out of a content stream.
///
/// lopdf stops at the binary data after `ID` and returns the operations
/// before it, which would drop everything drawn later on the page. String
/// literals are skipped so a `BI` inside `( )` is left alone.
pub(crate) fn strip_inline_images(data: &[u8]) -> Cow<'_, [u8]> {
    let mut stripped: Option<Vec<u8>> = None;
    let mut copied = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        if depth > 0 {
            match byte {
                b'\\' => i += 1,
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
            i += 1;
            continue;
        }

        if byte == b'(' {
            depth = 1;
        } else if is_operator_at(data, i, b"BI") {
            let end = inline_image_end(data, i + 2);
            let out = stripped.get_or_insert_with(|| Vec::with_capacity(data.len()));
            out.extend_from_slice(&data[copied..i]);
            out.push(b' ');
            copied = end;
            i = end;
            continue;
        }
        i += 1;
    }

    match stripped {
        Some(mut out) => {
            out.extend_from_slice(&data[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(data),
    }
}

/// Offset just past the `EI` closing an inline image whose dictionary starts
/// at `from`. Unterminated images run to the end of the stream.
fn inline_image_end(data: &[u8], from: usize) -> usize {
    let Some(id) = (from..data.len()).find(|&i| is_operator_at(data, i, b"ID")) else {
        return data.len();
    };

    // A single whitespace byte separates `ID` from the image data.
    let data_start = (id + 3).min(data.len());
    (data_start..data.len())
        .find(|&i| {
            data[i..].starts_with(b"EI")
                && i > 0
                && is_pdf_whitespace(data[i - 1])
                && data.get(i + 2).map_or(true, |&b| is_pdf_whitespace(b))
        })
        .map_or(data.len(), |ei| ei + 2)
}

fn is_operator_at(data: &[u8], i: usize, operator: &[u8]) -> bool {
    data[i..].starts_with(operator)
        && (i == 0
            || is_pdf_whitespace(data[i - 1])
            || (is_pdf_delimiter(data[i - 1]) && data[i - 1] != b'/'))
        && data
            .get(i + operator.len())
            .map_or(true, |&b| is_pdf_whitespace(b) || is_pdf_delimiter(b))
}

fn is_pdf_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0C | 0x00)
}

fn is_pdf_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

// ---------------------------------------------------------------------------
// LopdfBackend: lopdf-backed implementation
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            doc: LopdfDocument::load_mem(data)?,
        })
    }

    /// Follow a reference to the object it names; other objects pass through.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(r) => self.doc.get_object(*r).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match self.resolve(obj)? {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    /// Look up a page attribute, walking up the page tree for inherited keys.
    fn inherited(&self, page: PageId, key: &[u8]) -> Option<&Object> {
        let mut id: ObjectId = page;
        for _ in 0..MAX_TREE_DEPTH {
            let dict = self.doc.get_dictionary(id).ok()?;
            if let Ok(value) = dict.get(key) {
                return self.resolve(value);
            }
            id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        }
        None
    }

    fn page_resources(&self, page: PageId) -> Option<&Dictionary> {
        let res = self.inherited(page, b"Resources")?;
        self.resolve_dict(res)
    }

    fn rect(&self, obj: &Object) -> Option<[f32; 4]> {
        let array = obj.as_array().ok()?;
        if array.len() < 4 {
            return None;
        }
        let mut rect = [0.0f32; 4];
        for (slot, value) in rect.iter_mut().zip(array.iter()) {
            *slot = self.resolve(value)?.as_float().ok()?;
        }
        Some(rect)
    }

    fn glyph_widths(&self, font: &Dictionary) -> Option<GlyphWidths> {
        let is_composite = font
            .get(b"Subtype")
            .ok()
            .and_then(|s| s.as_name_str().ok())
            .map(|s| s == "Type0")
            .unwrap_or(false);
        if is_composite {
            return None;
        }

        let widths = self.resolve(font.get(b"Widths").ok()?)?.as_array().ok()?;
        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| self.resolve(o))
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0)
            .max(0) as u32;
        let missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve_dict(o))
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| o.as_float().ok())
            .unwrap_or(0.0);

        Some(GlyphWidths {
            first_char,
            widths: widths
                .iter()
                .map(|w| {
                    self.resolve(w)
                        .and_then(|o| o.as_float().ok())
                        .unwrap_or(missing_width)
                })
                .collect(),
            missing_width,
        })
    }

    fn color_space_name(&self, obj: &Object) -> Option<String> {
        match self.resolve(obj)? {
            Object::Name(n) => Some(String::from_utf8_lossy(n).to_string()),
            Object::Array(arr) => arr
                .first()
                .and_then(|o| o.as_name_str().ok())
                .map(String::from),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_box(&self, page: PageId) -> Option<[f32; 4]> {
        self.inherited(page, b"CropBox")
            .and_then(|o| self.rect(o))
            .or_else(|| self.inherited(page, b"MediaBox").and_then(|o| self.rect(o)))
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::Parse(e.to_string()))?;

        let mut result = Vec::with_capacity(lopdf_fonts.len());
        for (name, font_dict) in &lopdf_fonts {
            let base_font = font_dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            result.push(BackendFontInfo {
                name: name.clone(),
                base_font,
                widths: self.glyph_widths(font_dict),
            });
        }
        Ok(result)
    }

    fn page_images(&self, page: PageId) -> Result<Vec<BackendImageInfo>> {
        let Some(xobjects) = self
            .page_resources(page)
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|o| self.resolve_dict(o))
        else {
            return Ok(Vec::new());
        };

        let mut images = Vec::new();
        for (name, obj) in xobjects.iter() {
            let Ok(obj_ref) = obj.as_reference() else {
                continue;
            };
            let Ok(Object::Stream(stream)) = self.doc.get_object(obj_ref) else {
                continue;
            };
            let dict = &stream.dict;

            let is_image = dict
                .get(b"Subtype")
                .ok()
                .and_then(|s| s.as_name_str().ok())
                .map(|s| s == "Image")
                .unwrap_or(false);
            if !is_image {
                continue;
            }

            let dimension = |key: &[u8]| {
                dict.get(key)
                    .ok()
                    .and_then(|o| self.resolve(o))
                    .and_then(|o| o.as_i64().ok())
                    .map(|v| v.max(0) as u32)
                    .unwrap_or(0)
            };

            images.push(BackendImageInfo {
                name: name.clone(),
                object_number: obj_ref.0,
                width: dimension(b"Width"),
                height: dimension(b"Height"),
                color_space: dict
                    .get(b"ColorSpace")
                    .ok()
                    .and_then(|cs| self.color_space_name(cs)),
            });
        }
        Ok(images)
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page)?;

        // A page without /Contents is blank.
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match self.resolve(contents) {
            Some(Object::Stream(stream)) => Ok(stream_bytes(stream)),
            Some(Object::Array(parts)) => Ok(self.join_content_parts(parts)),
            _ => Err(Error::Parse(format!(
                "page {} {} R: /Contents is neither a stream nor an array",
                page.0, page.1
            ))),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(&strip_inline_images(data))
            .map_err(|e| Error::Parse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        let decoded = self.doc.get_page_fonts(page).ok().and_then(|fonts| {
            let font = fonts.get(font_name)?;
            let encoding = font.get_font_encoding(&self.doc).ok()?;
            LopdfDocument::decode_text(&encoding, bytes).ok()
        });
        decoded.unwrap_or_else(|| decode_text_simple(bytes))
    }
}

impl LopdfBackend {
    /// Concatenate the streams of an array-valued /Contents, newline-separated.
    fn join_content_parts(&self, parts: &[Object]) -> Vec<u8> {
        parts
            .iter()
            .filter_map(|part| match self.resolve(part)? {
                Object::Stream(stream) => Some(stream_bytes(stream)),
                _ => None,
            })
            .fold(Vec::new(), |mut content, bytes| {
                content.extend_from_slice(&bytes);
                content.push(b'\n');
                content
            })
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
pub(crate) fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Numeric value of an operand, if it is a number.
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}
