//! The matching engine: strategy cascade, relationship-aware fulfillment,
//! missing-document analysis, duplicate detection, and merge.

mod duplicates;
mod error;
mod matcher;
mod merge;
mod missing;
mod relationship;
mod strategies;

pub use duplicates::{DuplicateDetector, DuplicateReport};
pub use error::MatchError;
pub use matcher::DocumentMatcher;
pub use merge::{MergeError, merge_duplicates};
pub use missing::MissingDocumentFinder;
pub use relationship::RelationshipMatcher;
pub use strategies::{
    ClauseStrategy, KeywordStrategy, MatchStrategy, TitleStrategy, keyword_overlap, title_match,
};
