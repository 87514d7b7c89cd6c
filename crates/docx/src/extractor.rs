//! DOCX text extractor implementation.
//!
//! Each paragraph of `word/document.xml` becomes at most one text unit. The
//! paragraph style decides what the unit is:
//!
//! | Style             | Result                                            |
//! |-------------------|---------------------------------------------------|
//! | `Title`           | `Title` unit                                      |
//! | `AlternateTitles` | `AlternateTitles` unit                            |
//! | `Reference`       | no unit; becomes the reference of following body  |
//! | `References`      | standalone `Reference` unit                       |
//! | anything else     | `Body` unit carrying the current reference        |
//!
//! Empty paragraphs are skipped.

use bloom_core::{Error, Result, TextCleaner, TextExtractor, TextKind, TextUnit};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Path of the main document part inside the archive.
const DOCUMENT_PART: &str = "word/document.xml";

/// Extractor for DOCX (Office Open XML) files.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    cleaner: TextCleaner,
}

/// A paragraph with its style id.
#[derive(Debug, Default, PartialEq)]
struct Paragraph {
    style: Option<String>,
    text: String,
}

/// What a paragraph contributes, based on its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphRole {
    Title,
    AlternateTitles,
    Reference,
    References,
    Text,
}

impl ParagraphRole {
    fn from_style(style: Option<&str>) -> Self {
        let Some(style) = style else {
            return ParagraphRole::Text;
        };
        let key: String = style
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "title" => ParagraphRole::Title,
            "alternatetitles" | "alternatetitle" => ParagraphRole::AlternateTitles,
            "reference" => ParagraphRole::Reference,
            "references" => ParagraphRole::References,
            _ => ParagraphRole::Text,
        }
    }
}

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a DOCX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Vec<TextUnit>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let content = read_file_from_archive(&mut archive, DOCUMENT_PART)?;
        let paragraphs = extract_paragraphs(&content)?;
        let units = self.build_units(paragraphs);

        log::debug!("{}: {} text units", filename, units.len());
        Ok(units)
    }

    /// Turn styled paragraphs into text units.
    fn build_units(&self, paragraphs: Vec<Paragraph>) -> Vec<TextUnit> {
        let mut units = Vec::new();
        let mut current_reference: Option<String> = None;

        for paragraph in paragraphs {
            let text = self.cleaner.clean(&paragraph.text);
            if text.is_empty() {
                continue;
            }

            match ParagraphRole::from_style(paragraph.style.as_deref()) {
                ParagraphRole::Title => units.push(TextUnit::title(text)),
                ParagraphRole::AlternateTitles => units.push(TextUnit::alternate_titles(text)),
                ParagraphRole::Reference => current_reference = Some(text),
                ParagraphRole::References => units.push(TextUnit::new(TextKind::Reference, text)),
                ParagraphRole::Text => units.push(TextUnit {
                    kind: TextKind::Body,
                    text,
                    reference: current_reference.clone(),
                }),
            }
        }

        units
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<TextUnit>> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        File::open(path)
            .map_err(Error::from)
            .and_then(|file| self.parse(BufReader::new(file), filename))
            .map_err(|e| Error::Extraction {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Collect the text and style of every body paragraph.
fn extract_paragraphs(xml_content: &str) -> Result<Vec<Paragraph>> {
    let mut paragraphs = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current: Option<Paragraph> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => current = Some(Paragraph::default()),
                b"t" => in_text = true,
                b"pStyle" => set_style(&mut current, e),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"pStyle" => set_style(&mut current, e),
                b"tab" => push_text(&mut current, "\t"),
                b"br" | b"cr" => push_text(&mut current, "\n"),
                // Self-closing paragraphs are empty
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::XmlError(format!("Bad text content: {}", err)))?;
                    push_text(&mut current, &text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn set_style(current: &mut Option<Paragraph>, element: &BytesStart) {
    let Some(paragraph) = current.as_mut() else {
        return;
    };
    for attr in element.attributes().flatten() {
        if local_name(attr.key.as_ref()) == b"val" {
            paragraph.style = Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
}

fn push_text(current: &mut Option<Paragraph>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.text.push_str(text);
    }
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn paragraph(style: Option<&str>, text: &str) -> String {
        let props = style
            .map(|s| format!("<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>", s))
            .unwrap_or_default();
        format!(
            "<w:p>{}<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            props, text
        )
    }

    fn document(paragraphs: &[String]) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}<w:sectPr/></w:body></w:document>",
            paragraphs.concat()
        )
    }

    fn docx(xml: &str) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        let buffer = writer.finish().unwrap().into_inner();
        Cursor::new(buffer)
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"w:p"), b"p");
        assert_eq!(local_name(b"w:pStyle"), b"pStyle");
        assert_eq!(local_name(b"p"), b"p");
    }

    #[test]
    fn test_paragraph_roles() {
        assert_eq!(ParagraphRole::from_style(Some("Title")), ParagraphRole::Title);
        assert_eq!(
            ParagraphRole::from_style(Some("Alternate-Titles")),
            ParagraphRole::AlternateTitles
        );
        assert_eq!(ParagraphRole::from_style(Some("reference")), ParagraphRole::Reference);
        assert_eq!(ParagraphRole::from_style(Some("References")), ParagraphRole::References);
        assert_eq!(ParagraphRole::from_style(Some("Normal")), ParagraphRole::Text);
        assert_eq!(ParagraphRole::from_style(None), ParagraphRole::Text);
    }

    #[test]
    fn test_extract_paragraph_text_runs() {
        let xml = document(&[
            "<w:p><w:r><w:t>In the </w:t></w:r><w:r><w:t>beginning</w:t></w:r></w:p>".to_string(),
            "<w:p><w:r><w:t>Line one</w:t><w:br/><w:t>Line two</w:t></w:r></w:p>".to_string(),
        ]);
        let paragraphs = extract_paragraphs(&xml).unwrap();

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "In the beginning");
        assert_eq!(paragraphs[1].text, "Line one\nLine two");
    }

    #[test]
    fn test_parse_builds_units() {
        let xml = document(&[
            paragraph(Some("Title"), "My Book"),
            paragraph(Some("Reference"), "Gen 1:1"),
            paragraph(None, "Once..."),
            paragraph(None, ""),
            paragraph(None, "Then..."),
            paragraph(Some("Reference"), "Gen 2:4"),
            paragraph(None, "Later &amp; after"),
            paragraph(Some("References"), "Genesis 1-2"),
            paragraph(Some("AlternateTitles"), "Beginnings"),
        ]);

        let units = DocxExtractor::new().parse(docx(&xml), "Creation English.docx").unwrap();

        assert_eq!(units.len(), 6);
        assert_eq!(units[0], TextUnit::title("My Book"));
        assert_eq!(units[1], TextUnit::body_with_reference("Once...", "Gen 1:1"));
        assert_eq!(units[2], TextUnit::body_with_reference("Then...", "Gen 1:1"));
        assert_eq!(units[3], TextUnit::body_with_reference("Later & after", "Gen 2:4"));
        assert_eq!(units[4].kind, TextKind::Reference);
        assert_eq!(units[5], TextUnit::alternate_titles("Beginnings"));
    }

    #[test]
    fn test_body_without_reference() {
        let xml = document(&[paragraph(None, "Once...")]);
        let units = DocxExtractor::new().parse(docx(&xml), "a.docx").unwrap();
        assert_eq!(units, vec![TextUnit::body("Once...")]);
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("other.xml", FileOptions::default()).unwrap();
        let buffer = writer.finish().unwrap().into_inner();

        let err = DocxExtractor::new()
            .parse(Cursor::new(buffer), "a.docx")
            .unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }

    #[test]
    fn test_extract_missing_file_is_extraction_error() {
        let err = DocxExtractor::new()
            .extract(Path::new("/nonexistent/Creation English.docx"))
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_not_a_zip() {
        let err = DocxExtractor::new()
            .parse(Cursor::new(b"plain text".to_vec()), "a.docx")
            .unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }
}
