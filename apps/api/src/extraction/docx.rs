use std::io::{Cursor, Read};

use anyhow::{bail, Result};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Upper bound on the decompressed `word/document.xml`.
pub const MAX_DOCUMENT_XML_BYTES: u64 = 16 * 1024 * 1024;

/// Pulls paragraph text out of a Word-processor package (`word/document.xml`).
/// Paragraphs are joined with newlines; empty paragraphs are dropped.
pub fn extract_docx_text(data: &[u8]) -> Result<String> {
    extract_docx_text_within(data, MAX_DOCUMENT_XML_BYTES)
}

fn extract_docx_text_within(data: &[u8], max_xml_bytes: u64) -> Result<String> {
    let xml = read_document_xml(data, max_xml_bytes)?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut paragraphs = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" if in_paragraph => current.push('\t'),
                b"w:br" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Event::End(e) => {
                if e.name().as_ref() == b"w:p" {
                    let line = current.trim();
                    if !line.is_empty() {
                        paragraphs.push(line.to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Event::Text(e) => {
                if in_paragraph {
                    current.push_str(&e.xml_content()?);
                }
            }
            Event::GeneralRef(e) => {
                if in_paragraph {
                    if let Some(ch) = e.resolve_char_ref()? {
                        current.push(ch);
                    } else if let Some(resolved) = resolve_predefined_entity(&e.decode()?) {
                        current.push_str(resolved);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

/// Reads the main document part, refusing to inflate past `max_xml_bytes`.
/// The declared size is checked first; the bounded read guards against a
/// header that under-reports.
fn read_document_xml(data: &[u8], max_xml_bytes: u64) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let document_file = archive.by_name("word/document.xml")?;
    if document_file.size() > max_xml_bytes {
        bail!(
            "word/document.xml inflates to {} bytes (limit {max_xml_bytes})",
            document_file.size()
        );
    }

    let mut xml = String::new();
    document_file
        .take(max_xml_bytes + 1)
        .read_to_string(&mut xml)?;
    if xml.len() as u64 > max_xml_bytes {
        bail!("word/document.xml exceeds {max_xml_bytes} bytes");
    }
    Ok(xml)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use super::*;

    /// Builds a minimal .docx package containing only `word/document.xml`.
    pub(crate) fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_extracts_paragraphs_in_order() {
        let data = docx_with_body(
            "<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Senior </w:t></w:r><w:r><w:t>Rust Engineer</w:t></w:r></w:p>",
        );
        let text = extract_docx_text(&data).unwrap();
        assert_eq!(text, "Jane Doe\nSenior Rust Engineer");
    }

    #[test]
    fn test_skips_empty_paragraphs_and_unescapes() {
        let data = docx_with_body(
            "<w:p></w:p><w:p><w:r><w:t>R&amp;D lead</w:t></w:r></w:p><w:p><w:r><w:t>  </w:t></w:r></w:p>",
        );
        assert_eq!(extract_docx_text(&data).unwrap(), "R&D lead");
    }

    #[test]
    fn test_rejects_non_zip_bytes() {
        assert!(extract_docx_text(b"plain text, not a package").is_err());
    }

    #[test]
    fn test_oversized_document_is_rejected() {
        let paragraph = "<w:p><w:r><w:t>filler filler filler</w:t></w:r></w:p>".repeat(200);
        let data = docx_with_body(&paragraph);
        assert!(extract_docx_text_within(&data, 64 * 1024).is_ok());

        let err = extract_docx_text_within(&data, 1024).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
