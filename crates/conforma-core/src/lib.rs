//! Domain types, title normalisation, and string similarity shared by
//! every Conforma crate.

pub mod normalize;
pub mod similarity;
pub mod types;
pub mod weights;

pub use normalize::{canonical_title, extract_version, normalize_title, strip_version_markers};
pub use similarity::{abbreviation_match, similarity};
pub use types::{
    ClauseMapping, DocumentRecord, DocumentStatus, DocumentType, DuplicateGroup, DuplicateMember,
    Importance, IsoClause, MatchResult, MatchType, MissingRequirement, RecommendedAction,
    Reference, ReferenceType, Standard, StandardRequirement,
};
