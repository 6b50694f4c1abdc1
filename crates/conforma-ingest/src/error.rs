use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// Mime type outside the supported set. Not retried.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    /// Format-library failure reading DOCX, XLSX, or text. PDF failures do
    /// not raise this; they degrade to placeholder content instead.
    #[error("failed to parse {filename}: {reason}")]
    ParseFailure { filename: String, reason: String },
}
