//! Minimal PDF 1.4 writer for article listings.
//!
//! Pages are A4. Text is set in a TrueType font embedded whole in the
//! document (glyph ids through `Identity-H`, plus a `ToUnicode` map so the
//! text can be copied and searched), which covers Cyrillic and any other
//! script the font has glyphs for. Without a usable font file the built-in
//! Helvetica with WinAnsi encoding is used instead, and characters outside
//! WinAnsi print as `?`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use ttf_parser::{Face, GlyphId};

use crate::app::{ReaderError, Result};
use crate::domain::Article;
use crate::render::DOCUMENT_TITLE;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const TITLE_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 9.0;
const LINE_HEIGHT: f32 = 14.0;
const INDENT: f32 = 12.0;
/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

/// Unicode fonts tried, in order, when no font file is configured.
pub const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/local/share/fonts/DejaVuSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

type Rgb = (f32, f32, f32);
const BLACK: Rgb = (0.0, 0.0, 0.0);
const LINK_BLUE: Rgb = (0.365, 0.463, 0.796);

/// A font file read from disk, not yet parsed.
#[derive(Debug, Clone)]
pub struct FontFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// Read the configured font, or the first usable entry of [`SYSTEM_FONTS`].
///
/// A configured font that cannot be read or parsed is an error; unusable
/// system fonts are skipped. `None` means Helvetica.
pub fn load_font_file(configured: Option<&Path>) -> Result<Option<FontFile>> {
    if let Some(path) = configured {
        let data = fs::read(path).map_err(|e| ReaderError::Font(format!("{}: {}", path.display(), e)))?;
        let file = FontFile {
            name: font_name(path),
            data,
        };
        TrueTypeFont::parse(&file.data, &file.name)?;
        return Ok(Some(file));
    }

    for candidate in SYSTEM_FONTS.iter().map(Path::new) {
        let Ok(data) = fs::read(candidate) else {
            continue;
        };
        let file = FontFile {
            name: font_name(candidate),
            data,
        };
        match TrueTypeFont::parse(&file.data, &file.name) {
            Ok(_) => {
                tracing::debug!("Using font {}", candidate.display());
                return Ok(Some(file));
            }
            Err(e) => tracing::debug!("Skipping font {}: {}", candidate.display(), e),
        }
    }

    tracing::warn!("No Unicode font found, PDF text is limited to WinAnsi characters");
    Ok(None)
}

/// PostScript-safe font name from a file name.
fn font_name(path: &Path) -> String {
    let name: String = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if name.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        name
    }
}

pub struct TrueTypeFont<'a> {
    data: &'a [u8],
    face: Face<'a>,
    name: String,
}

impl<'a> TrueTypeFont<'a> {
    pub fn parse(data: &'a [u8], name: &str) -> Result<Self> {
        // 0x00010000 and 'true' mark glyf outlines; CFF ('OTTO') needs FontFile3
        if !data.starts_with(&[0, 1, 0, 0]) && !data.starts_with(b"true") {
            return Err(ReaderError::Font(format!("{} is not a TrueType font", name)));
        }
        let face = Face::parse(data, 0).map_err(|e| ReaderError::Font(format!("{}: {}", name, e)))?;

        Ok(Self {
            data,
            face,
            name: name.to_string(),
        })
    }

    /// Glyph id for `c`; `0` (.notdef) when the font lacks it.
    pub fn glyph(&self, c: char) -> u16 {
        self.face.glyph_index(c).map(|g| g.0).unwrap_or(0)
    }

    /// Advance of a glyph in PDF text space units (1/1000 em).
    fn advance(&self, glyph: u16) -> f32 {
        let advance = self.face.glyph_hor_advance(GlyphId(glyph)).unwrap_or(0);
        self.scale(f32::from(advance))
    }

    fn scale(&self, units: f32) -> f32 {
        units * 1000.0 / f32::from(self.face.units_per_em())
    }
}

pub enum PdfFont<'a> {
    Helvetica,
    TrueType(TrueTypeFont<'a>),
}

impl PdfFont<'_> {
    fn width(&self, text: &str, size: f32) -> f32 {
        match self {
            PdfFont::Helvetica => text.chars().count() as f32 * size * GLYPH_WIDTH,
            PdfFont::TrueType(font) => {
                text.chars().map(|c| font.advance(font.glyph(c))).sum::<f32>() * size / 1000.0
            }
        }
    }
}

struct LinkArea {
    rect: [f32; 4],
    uri: String,
}

#[derive(Default)]
struct Page {
    content: Vec<u8>,
    links: Vec<LinkArea>,
}

struct Layout<'f, 'a> {
    font: &'f PdfFont<'a>,
    /// Glyphs drawn so far and the character each one stands for.
    used: BTreeMap<u16, char>,
    finished: Vec<Page>,
    page: Page,
    y: f32,
}

impl<'f, 'a> Layout<'f, 'a> {
    fn new(font: &'f PdfFont<'a>) -> Self {
        Self {
            font,
            used: BTreeMap::new(),
            finished: Vec::new(),
            page: Page::default(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Baseline of the next line, starting a new page when this one is full.
    fn next_line(&mut self) -> f32 {
        if self.y - LINE_HEIGHT < MARGIN {
            self.finished.push(std::mem::take(&mut self.page));
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= LINE_HEIGHT;
        self.y
    }

    /// String operand for `Tj`, delimiters included.
    fn encode(&mut self, text: &str) -> Vec<u8> {
        let font = self.font;
        match font {
            PdfFont::Helvetica => {
                let mut operand = vec![b'('];
                operand.extend(escape_string(&encode_win_ansi(text)));
                operand.push(b')');
                operand
            }
            PdfFont::TrueType(tt) => {
                let mut operand = String::from("<");
                for c in text.chars() {
                    let glyph = tt.glyph(c);
                    self.used.entry(glyph).or_insert(c);
                    let _ = write!(operand, "{:04X}", glyph);
                }
                operand.push('>');
                operand.into_bytes()
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, color: Rgb, text: &str) {
        let mut op = format!(
            "BT /F1 {:.1} Tf {:.3} {:.3} {:.3} rg {:.2} {:.2} Td ",
            size, color.0, color.1, color.2, x, y
        )
        .into_bytes();
        op.extend(self.encode(text));
        op.extend_from_slice(b" Tj ET\n");
        self.page.content.extend(op);
    }

    fn underline(&mut self, x: f32, y: f32, width: f32, color: Rgb) {
        let op = format!(
            "{:.3} {:.3} {:.3} RG 0.5 w {:.2} {:.2} m {:.2} {:.2} l S\n",
            color.0,
            color.1,
            color.2,
            x,
            y - 1.5,
            x + width,
            y - 1.5
        );
        self.page.content.extend(op.into_bytes());
    }

    fn link(&mut self, x: f32, y: f32, width: f32, uri: &str) {
        self.page.links.push(LinkArea {
            rect: [x, y - 3.0, x + width, y + BODY_SIZE],
            uri: uri.to_string(),
        });
    }

    fn finish(mut self) -> (Vec<Page>, BTreeMap<u16, char>) {
        if !self.page.content.is_empty() || self.finished.is_empty() {
            self.finished.push(self.page);
        }
        (self.finished, self.used)
    }
}

pub fn render(articles: &[Article], font: &PdfFont<'_>) -> Vec<u8> {
    let mut layout = Layout::new(font);

    let y = layout.next_line();
    let title_width = font.width(DOCUMENT_TITLE, TITLE_SIZE);
    layout.text((PAGE_WIDTH - title_width) / 2.0, y, TITLE_SIZE, BLACK, DOCUMENT_TITLE);
    layout.next_line();

    for (index, article) in articles.iter().enumerate() {
        let y = layout.next_line();
        layout.text(MARGIN, y, BODY_SIZE, BLACK, &format!("{}.", index + 1));

        for (name, value) in article.fields() {
            match name {
                "source_origin" => {}
                "link" => write_link_field(&mut layout, name, &value),
                _ => write_text_field(&mut layout, name, &value),
            }
        }
    }

    let (pages, used) = layout.finish();
    let fonts = match font {
        PdfFont::Helvetica => {
            vec![b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec()]
        }
        PdfFont::TrueType(tt) => embedded_font_objects(tt, &used),
    };
    assemble(pages, fonts)
}

fn write_text_field(layout: &mut Layout<'_, '_>, name: &str, value: &str) {
    let font = layout.font;
    let text = format!("{}: {}", name, value);
    let max_width = PAGE_WIDTH - 2.0 * MARGIN - INDENT;

    for line in wrap(&text, max_width, |s| font.width(s, BODY_SIZE)) {
        let y = layout.next_line();
        layout.text(MARGIN + INDENT, y, BODY_SIZE, BLACK, &line);
    }
}

fn write_link_field(layout: &mut Layout<'_, '_>, name: &str, uri: &str) {
    let font = layout.font;
    let label = format!("{}: ", name);
    let x = MARGIN + INDENT + font.width(&label, BODY_SIZE);
    let max_width = PAGE_WIDTH - MARGIN - x;

    for (i, chunk) in split_to_width(uri, max_width, |s| font.width(s, BODY_SIZE))
        .into_iter()
        .enumerate()
    {
        let y = layout.next_line();
        if i == 0 {
            layout.text(MARGIN + INDENT, y, BODY_SIZE, BLACK, &label);
        }
        let width = font.width(&chunk, BODY_SIZE);
        layout.text(x, y, BODY_SIZE, LINK_BLUE, &chunk);
        layout.underline(x, y, width, LINK_BLUE);
        layout.link(x, y, width, uri);
    }
}

/// Greedy word wrap; words wider than a line are split.
fn wrap(text: &str, max_width: f32, width: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        for piece in split_to_width(word, max_width, &width) {
            if current.is_empty() {
                current = piece;
                continue;
            }
            let joined = format!("{} {}", current, piece);
            if width(&joined) > max_width {
                lines.push(std::mem::replace(&mut current, piece));
            } else {
                current = joined;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut `text` into pieces no wider than `max_width`, at least one char each.
fn split_to_width(text: &str, max_width: f32, width: impl Fn(&str) -> f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if current.chars().count() > 1 && width(&current) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }

    if !current.is_empty() || pieces.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Map text to WinAnsi (CP1252) bytes.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' | '\n' | '\r' => b' ',
            _ => b'?',
        })
        .collect()
}

fn escape_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if matches!(b, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

/// URIs in annotations must be 7-bit; everything else is percent-encoded.
fn escape_uri(uri: &str) -> Vec<u8> {
    let mut ascii = String::with_capacity(uri.len());
    for b in uri.bytes() {
        if b.is_ascii_graphic() {
            ascii.push(b as char);
        } else {
            let _ = write!(ascii, "%{:02X}", b);
        }
    }
    escape_string(ascii.as_bytes())
}

fn stream_object(dict_entries: &str, data: &[u8]) -> Vec<u8> {
    let mut object = format!("<< /Length {}{} >>\nstream\n", data.len(), dict_entries).into_bytes();
    object.extend_from_slice(data);
    object.extend_from_slice(b"\nendstream");
    object
}

/// Objects 3..=7: Type0 font, CID font, descriptor, font file, ToUnicode.
fn embedded_font_objects(font: &TrueTypeFont<'_>, used: &BTreeMap<u16, char>) -> Vec<Vec<u8>> {
    let name = &font.name;

    let type0 = format!(
        "<< /Type /Font /Subtype /Type0 /BaseFont /{} /Encoding /Identity-H /DescendantFonts [4 0 R] /ToUnicode 7 0 R >>",
        name
    );

    let mut widths = String::new();
    for glyph in used.keys() {
        let _ = write!(widths, "{} [{:.0}] ", glyph, font.advance(*glyph));
    }
    let cid_font = format!(
        "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> /FontDescriptor 5 0 R /CIDToGIDMap /Identity /W [{}] >>",
        name,
        widths.trim_end()
    );

    let face = &font.face;
    let bbox = face.global_bounding_box();
    let ascent = font.scale(f32::from(face.ascender()));
    let descriptor = format!(
        "<< /Type /FontDescriptor /FontName /{} /Flags 32 /FontBBox [{:.0} {:.0} {:.0} {:.0}] /ItalicAngle 0 /Ascent {:.0} /Descent {:.0} /CapHeight {:.0} /StemV 80 /FontFile2 6 0 R >>",
        name,
        font.scale(f32::from(bbox.x_min)),
        font.scale(f32::from(bbox.y_min)),
        font.scale(f32::from(bbox.x_max)),
        font.scale(f32::from(bbox.y_max)),
        ascent,
        font.scale(f32::from(face.descender())),
        ascent
    );

    let font_file = stream_object(&format!(" /Length1 {}", font.data.len()), font.data);
    let to_unicode = stream_object("", to_unicode_cmap(used).as_bytes());

    vec![
        type0.into_bytes(),
        cid_font.into_bytes(),
        descriptor.into_bytes(),
        font_file,
        to_unicode,
    ]
}

fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = used.iter().collect();
    // at most 100 mappings per block
    for block in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", block.len());
        for (glyph, c) in block {
            let mut units = [0u16; 2];
            let utf16: String = c.encode_utf16(&mut units).iter().map(|u| format!("{:04X}", u)).collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", glyph, utf16);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend");
    cmap
}

/// Lay out the file: catalog, page tree, the font objects from id 3 on
/// (the first one is `/F1`), then a (page, content) pair per page.
fn assemble(pages: Vec<Page>, fonts: Vec<Vec<u8>>) -> Vec<u8> {
    let first_page = 3 + fonts.len();
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page + 2 * i).collect();
    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(first_page - 1 + 2 * pages.len());

    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    objects.push(format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()).into_bytes());
    objects.extend(fonts);

    for (page, page_id) in pages.into_iter().zip(page_ids) {
        let mut dict = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.0} {:.0}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            page_id + 1
        )
        .into_bytes();
        if !page.links.is_empty() {
            dict.extend_from_slice(b" /Annots [");
            for link in &page.links {
                let [x1, y1, x2, y2] = link.rect;
                dict.extend(
                    format!(
                        " << /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] /Border [0 0 0] /A << /S /URI /URI (",
                        x1, y1, x2, y2
                    )
                    .into_bytes(),
                );
                dict.extend(escape_uri(&link.uri));
                dict.extend_from_slice(b") >> >>");
            }
            dict.extend_from_slice(b" ]");
        }
        dict.extend_from_slice(b" >>");
        objects.push(dict);
        objects.push(stream_object("", &page.content));
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend(format!("{} 0 obj\n", i + 1).into_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out.extend(xref.into_bytes());
    out
}
