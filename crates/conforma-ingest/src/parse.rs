//! Format dispatch for imported documents.
//!
//! Format libraries are collaborators, not dependencies of the core: the
//! caller injects a [`FormatExtractor`] for the binary formats, and this
//! module owns the dispatch, the fallback behavior, and the output
//! contract. The bundled [`TextOnlyExtractor`] handles plain-text uploads
//! and is what the CLI and tests use.

use serde::Serialize;
use tracing::warn;

use crate::error::ParseError;
use crate::sections::{DocumentSection, extract_sections};

/// Supported upload formats, derived from the upload's mime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
    Xlsx,
}

impl DocumentFormat {
    /// `None` for mime types outside the supported set.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type {
            "text/plain" | "text/markdown" | "text/csv" => Some(Self::PlainText),
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(Self::Xlsx)
            }
            _ => None,
        }
    }
}

/// Text extraction for the binary formats. Implementations wrap whatever
/// format libraries the deployment uses.
pub trait FormatExtractor {
    fn extract(&self, format: DocumentFormat, bytes: &[u8], filename: &str)
    -> Result<String, ParseError>;
}

/// Extractor that only understands plain text. Binary formats fail as
/// [`ParseError::ParseFailure`], which for PDF turns into the placeholder
/// fallback upstream.
pub struct TextOnlyExtractor;

impl FormatExtractor for TextOnlyExtractor {
    fn extract(
        &self,
        format: DocumentFormat,
        bytes: &[u8],
        filename: &str,
    ) -> Result<String, ParseError> {
        match format {
            DocumentFormat::PlainText => {
                String::from_utf8(bytes.to_vec()).map_err(|e| ParseError::ParseFailure {
                    filename: filename.to_string(),
                    reason: e.to_string(),
                })
            }
            _ => Err(ParseError::ParseFailure {
                filename: filename.to_string(),
                reason: "binary format extraction not available".into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseMetadata {
    pub filename: String,
    pub mime_type: String,
    pub char_count: usize,
    /// Set when extraction failed and `content` is a placeholder.
    pub parse_error: bool,
}

/// Output contract of ingestion: best-effort content plus the extracted
/// section structure.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub content: String,
    pub metadata: ParseMetadata,
    pub sections: Vec<DocumentSection>,
}

/// Parse an upload into content and sections.
///
/// Unknown mime types fail with [`ParseError::UnsupportedFileType`]. A PDF
/// extraction failure never propagates: the document is created with
/// placeholder content and `metadata.parse_error = true` so the import
/// continues and the user can replace the content manually. DOCX, XLSX,
/// and text failures propagate as [`ParseError::ParseFailure`].
pub fn parse_document(
    bytes: &[u8],
    mime_type: &str,
    filename: &str,
    extractor: &dyn FormatExtractor,
) -> Result<ParsedDocument, ParseError> {
    let format = DocumentFormat::from_mime(mime_type)
        .ok_or_else(|| ParseError::UnsupportedFileType(mime_type.to_string()))?;

    let (content, parse_error) = match extractor.extract(format, bytes, filename) {
        Ok(content) => (content, false),
        Err(error) if format == DocumentFormat::Pdf => {
            warn!(filename, %error, "pdf extraction failed; using placeholder content");
            (
                format!("[PDF content could not be extracted from {filename}]"),
                true,
            )
        }
        Err(error) => return Err(error),
    };

    let sections = if parse_error {
        Vec::new()
    } else {
        extract_sections(&content)
    };

    Ok(ParsedDocument {
        metadata: ParseMetadata {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            char_count: content.chars().count(),
            parse_error,
        },
        content,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passthrough() {
        let parsed = parse_document(
            b"1. Scope\nThis procedure covers welding.",
            "text/plain",
            "welding.txt",
            &TextOnlyExtractor,
        )
        .unwrap();
        assert!(!parsed.metadata.parse_error);
        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.sections[0].title, "1. Scope");
    }

    #[test]
    fn unknown_mime_rejected() {
        let result = parse_document(b"", "image/png", "logo.png", &TextOnlyExtractor);
        assert!(matches!(result, Err(ParseError::UnsupportedFileType(_))));
    }

    #[test]
    fn pdf_failure_degrades_to_placeholder() {
        let parsed = parse_document(b"%PDF-1.4", "application/pdf", "report.pdf", &TextOnlyExtractor)
            .unwrap();
        assert!(parsed.metadata.parse_error);
        assert!(parsed.content.contains("report.pdf"));
        assert!(parsed.sections.is_empty());
    }

    #[test]
    fn docx_failure_propagates() {
        let result = parse_document(
            b"PK",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "manual.docx",
            &TextOnlyExtractor,
        );
        assert!(matches!(result, Err(ParseError::ParseFailure { .. })));
    }

    #[test]
    fn invalid_utf8_text_is_a_parse_failure() {
        let result = parse_document(&[0xff, 0xfe, 0x00], "text/plain", "notes.txt", &TextOnlyExtractor);
        assert!(matches!(result, Err(ParseError::ParseFailure { .. })));
    }
}
