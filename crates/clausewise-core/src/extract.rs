//! Plain-text extraction from contract documents
//!
//! Supports PDF (via `pdf-extract`) and DOCX (the `word/document.xml` part of
//! the zip container, streamed with `quick-xml`). Extracted text is cleaned:
//! whitespace runs collapse to a single space and `Page N of M` footers are
//! removed.

use crate::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Document formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(Error::UnsupportedFormat(if ext.is_empty() {
                "<none>".to_string()
            } else {
                format!(".{}", ext)
            })),
        }
    }
}

/// Extracts cleaned plain text from PDF and DOCX files
pub struct TextExtractor {
    whitespace: Regex,
    page_footer: Regex,
}

impl TextExtractor {
    /// Create a new extractor
    pub fn new() -> Result<Self> {
        Ok(Self {
            whitespace: Regex::new(r"\s+")
                .map_err(|e| Error::internal(format!("Failed to compile whitespace regex: {}", e)))?,
            page_footer: Regex::new(r"Page \d+ of \d+")
                .map_err(|e| Error::internal(format!("Failed to compile footer regex: {}", e)))?,
        })
    }

    /// Extract and clean the text of the document at `path`
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        info!("Extracting text from {:?} ({:?})", path, format);

        let raw = match format {
            DocumentFormat::Pdf => extract_pdf(path)?,
            DocumentFormat::Docx => extract_docx(path)?,
        };

        let text = self.clean(&raw);
        debug!("Extracted {} characters", text.chars().count());
        Ok(text)
    }

    /// Collapse whitespace and strip page-number footers
    pub fn clean(&self, text: &str) -> String {
        let collapsed = self.whitespace.replace_all(text, " ");
        self.page_footer
            .replace_all(collapsed.trim(), "")
            .into_owned()
    }
}

fn extract_pdf(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| Error::extraction(format!("Failed to read PDF {:?}: {}", path, e)))
}

fn extract_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::extraction(format!("Failed to open DOCX {:?}: {}", path, e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| Error::extraction(format!("DOCX {:?} has no document part: {}", path, e)))?
        .read_to_string(&mut xml)?;

    document_xml_text(&xml)
}

/// Pull paragraph text out of a WordprocessingML document part
pub fn document_xml_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| Error::extraction(format!("Bad DOCX text run: {}", e)))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::extraction(format!(
                    "Malformed DOCX XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(out)
}
