//! Document ingestion: format extraction, section splitting, and
//! section-to-clause classification for freshly imported documents.

mod classify;
mod error;
mod parse;
mod sections;

pub use classify::classify_sections;
pub use error::ParseError;
pub use parse::{
    DocumentFormat, FormatExtractor, ParseMetadata, ParsedDocument, TextOnlyExtractor,
    parse_document,
};
pub use sections::{DocumentSection, extract_sections};
