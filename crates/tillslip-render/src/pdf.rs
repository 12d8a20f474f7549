//! # Streaming PDF Writer
//!
//! Writes a PDF 1.4 file using the built-in Helvetica fonts, so no font
//! data is embedded.
//!
//! ## Object Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  %PDF-1.4                                                               │
//! │  3 0 obj  Helvetica        (written on construction)                    │
//! │  4 0 obj  Helvetica-Bold                                                │
//! │  5 0 obj  page 1 content   ┐ written when page 1 closes                 │
//! │  6 0 obj  page 1           ┘                                            │
//! │  7 0 obj  page 2 content   ┐ written when page 2 closes                 │
//! │  8 0 obj  page 2           ┘                                            │
//! │  ...                                                                    │
//! │  2 0 obj  page tree        ┐                                            │
//! │  1 0 obj  catalog          │ written by finish()                        │
//! │  xref / trailer / %%EOF    ┘                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the open page's content stream is held in memory.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::metrics::encode_win_ansi;
use crate::writer::{DocumentWriter, FontWeight, PageGeometry, TextStyle};

const CATALOG_ID: u32 = 1;
const PAGES_ID: u32 = 2;
const REGULAR_FONT_ID: u32 = 3;
const BOLD_FONT_ID: u32 = 4;
const FIRST_FREE_ID: u32 = 5;

/// `Write` adapter that tracks the byte offset for the xref table.
struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// A `DocumentWriter` producing PDF bytes on any sink.
pub struct PdfWriter<W: Write> {
    out: CountingWriter<W>,
    geometry: PageGeometry,
    offsets: BTreeMap<u32, u64>,
    next_id: u32,
    page_ids: Vec<u32>,
    content: Vec<u8>,
    finished: bool,
}

impl<W: Write> PdfWriter<W> {
    /// Writes the file header and font objects, and opens the first page.
    pub fn new(sink: W, geometry: PageGeometry) -> RenderResult<Self> {
        let mut writer = PdfWriter {
            out: CountingWriter {
                inner: sink,
                written: 0,
            },
            geometry,
            offsets: BTreeMap::new(),
            next_id: FIRST_FREE_ID,
            page_ids: Vec::new(),
            content: Vec::new(),
            finished: false,
        };

        writer.out.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;
        writer.write_object(
            REGULAR_FONT_ID,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        )?;
        writer.write_object(
            BOLD_FONT_ID,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        )?;

        Ok(writer)
    }

    /// Returns the sink. Call after `finish`.
    pub fn into_inner(self) -> W {
        self.out.inner
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn write_object(&mut self, id: u32, body: &[u8]) -> RenderResult<()> {
        self.offsets.insert(id, self.out.written);
        writeln!(self.out, "{} 0 obj", id)?;
        self.out.write_all(body)?;
        self.out.write_all(b"\nendobj\n")?;
        Ok(())
    }

    fn close_page(&mut self) -> RenderResult<()> {
        let content_id = self.allocate();
        let page_id = self.allocate();
        let content = std::mem::take(&mut self.content);

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        self.write_object(content_id, &stream)?;

        let page = format!(
            "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 {} 0 R /F2 {} 0 R >> >> /Contents {} 0 R >>",
            PAGES_ID,
            num(self.geometry.width),
            num(self.geometry.height),
            REGULAR_FONT_ID,
            BOLD_FONT_ID,
            content_id
        );
        self.write_object(page_id, page.as_bytes())?;

        self.page_ids.push(page_id);
        debug!(page = self.page_ids.len(), bytes = content.len(), "PDF page written");
        Ok(())
    }

    fn ensure_open(&self) -> RenderResult<()> {
        if self.finished {
            return Err(RenderError::layout("PDF writer already finished"));
        }
        Ok(())
    }

    /// PDF y axis points up from the bottom edge.
    fn flip(&self, y: f32) -> f32 {
        self.geometry.height - y
    }
}

impl<W: Write> DocumentWriter for PdfWriter<W> {
    fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn text(&mut self, x: f32, y: f32, text: &str, style: TextStyle) -> RenderResult<()> {
        self.ensure_open()?;

        let font = match style.weight {
            FontWeight::Regular => "F1",
            FontWeight::Bold => "F2",
        };
        let y = self.flip(y);

        write!(
            self.content,
            "BT /{} {} Tf {} {} Td (",
            font,
            num(style.size),
            num(x),
            num(y)
        )?;
        escape_string(&encode_win_ansi(text), &mut self.content);
        self.content.extend_from_slice(b") Tj ET\n");
        Ok(())
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) -> RenderResult<()> {
        self.ensure_open()?;

        let (y1, y2) = (self.flip(y1), self.flip(y2));
        writeln!(
            self.content,
            "{} w {} {} m {} {} l S",
            num(width),
            num(x1),
            num(y1),
            num(x2),
            num(y2)
        )?;
        Ok(())
    }

    fn new_page(&mut self) -> RenderResult<()> {
        self.ensure_open()?;
        self.close_page()
    }

    fn finish(&mut self) -> RenderResult<()> {
        self.ensure_open()?;
        self.close_page()?;

        let kids = self
            .page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        let pages = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            self.page_ids.len()
        );
        self.write_object(PAGES_ID, pages.as_bytes())?;
        self.write_object(
            CATALOG_ID,
            format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID).as_bytes(),
        )?;

        let xref_offset = self.out.written;
        let size = self.next_id;
        write!(self.out, "xref\n0 {}\n0000000000 65535 f \n", size)?;
        for id in 1..size {
            let offset = self
                .offsets
                .get(&id)
                .copied()
                .ok_or_else(|| RenderError::layout(format!("PDF object {} never written", id)))?;
            writeln!(self.out, "{:010} 00000 n ", offset)?;
        }
        write!(
            self.out,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, CATALOG_ID, xref_offset
        )?;
        self.out.flush()?;

        self.finished = true;
        debug!(pages = self.page_ids.len(), bytes = self.out.written, "PDF finished");
        Ok(())
    }
}

/// Formats a coordinate with at most two decimals.
fn num(value: f32) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Escapes bytes for a PDF literal string.
fn escape_string(bytes: &[u8], out: &mut Vec<u8>) {
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            0x20..=0x7E | 0x80..=0xFF => out.push(b),
            other => out.extend_from_slice(format!("\\{:03o}", other).as_bytes()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn geometry() -> PageGeometry {
        PageConfig::default().geometry()
    }

    #[test]
    fn test_minimal_document_structure() {
        let mut pdf = PdfWriter::new(Vec::new(), geometry()).unwrap();
        pdf.text(50.0, 60.0, "Hello (world)", TextStyle::bold(12.0)).unwrap();
        pdf.line(50.0, 70.0, 200.0, 70.0, 0.5).unwrap();
        pdf.finish().unwrap();

        let bytes = pdf.into_inner();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/F2 12 Tf"));
        assert!(text.contains("(Hello \\(world\\)) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut pdf = PdfWriter::new(Vec::new(), geometry()).unwrap();
        pdf.text(10.0, 10.0, "one", TextStyle::regular(10.0)).unwrap();
        pdf.new_page().unwrap();
        pdf.text(10.0, 10.0, "two", TextStyle::regular(10.0)).unwrap();
        pdf.finish().unwrap();

        let bytes = pdf.into_inner();
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 2"));

        // Work on raw bytes: the binary header comment is not UTF-8
        let xref_at = bytes.windows(5).position(|w| w == b"xref\n").unwrap();
        let table = std::str::from_utf8(&bytes[xref_at..]).unwrap();
        let entries: Vec<&str> = table.lines().skip(3).take(8).collect();
        assert_eq!(entries.len(), 8);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()), "entry {} wrong", i + 1);
        }
    }

    #[test]
    fn test_failing_sink_is_stream_error() {
        let err = PdfWriter::new(FailingSink, geometry()).err().unwrap();
        assert!(matches!(err, RenderError::Stream(_)));
    }

    #[test]
    fn test_drawing_after_finish_is_layout_error() {
        let mut pdf = PdfWriter::new(Vec::new(), geometry()).unwrap();
        pdf.finish().unwrap();

        let err = pdf.text(0.0, 0.0, "late", TextStyle::regular(10.0)).unwrap_err();
        assert!(matches!(err, RenderError::Layout(_)));
        assert!(pdf.finish().is_err());
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(595.2756), "595.28");
        assert_eq!(num(12.0), "12");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.001), "0");
    }
}
