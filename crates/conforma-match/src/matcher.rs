//! Direct document-to-requirement matching facade.

use tracing::debug;

use conforma_core::{DocumentRecord, MatchResult, StandardRequirement};

use crate::strategies::{ClauseStrategy, KeywordStrategy, MatchStrategy, TitleStrategy};

/// Runs the match strategies in fixed priority order and returns the first
/// positive result.
///
/// The default cascade is clause, then title, then keyword. A clause hit
/// always wins even when title or keyword rules would also fire.
pub struct DocumentMatcher {
    strategies: Vec<Box<dyn MatchStrategy + Send + Sync>>,
}

impl DocumentMatcher {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(ClauseStrategy),
                Box::new(TitleStrategy),
                Box::new(KeywordStrategy),
            ],
        }
    }

    /// Match one document against one requirement. Returns the negative
    /// result when no strategy fires.
    pub fn match_document(
        &self,
        doc: &DocumentRecord,
        req: &StandardRequirement,
    ) -> MatchResult {
        for strategy in &self.strategies {
            if let Some(result) = strategy.attempt(doc, req) {
                debug!(
                    document = %doc.id,
                    requirement = %req.id,
                    strategy = strategy.name(),
                    confidence = result.confidence,
                    "direct match"
                );
                return result;
            }
        }
        MatchResult::none()
    }
}

impl Default for DocumentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conforma_core::{
        ClauseMapping, DocumentStatus, Importance, MatchType, Standard, StandardRequirement,
    };

    fn doc(title: &str, clauses: &[&str]) -> DocumentRecord {
        DocumentRecord {
            id: "doc-1".into(),
            organization_id: "org-1".into(),
            title: title.to_string(),
            content: String::new(),
            clause_mappings: clauses
                .iter()
                .map(|c| ClauseMapping {
                    standard: Standard::Iso9001_2015,
                    clause_number: c.to_string(),
                    confidence: 0.9,
                    matched_keywords: vec![],
                })
                .collect(),
            parent_id: None,
            references: vec![],
            status: DocumentStatus::Approved,
            document_type: None,
            version: 1,
            owner: "qa".into(),
            updated_at: Utc::now(),
        }
    }

    fn quality_objectives_req() -> StandardRequirement {
        StandardRequirement {
            id: "9001-quality-objectives".into(),
            title: "Quality Objectives".into(),
            standard: Standard::Iso9001_2015,
            category: "planning".into(),
            keywords: vec!["quality".into(), "objectives".into(), "targets".into()],
            clause_numbers: vec!["6.2".into(), "6.2.1".into(), "6.2.2".into()],
            document_type: None,
            importance: Importance::Mandatory,
            can_be_fulfilled_by: vec![],
            fulfills: vec![],
        }
    }

    #[test]
    fn clause_takes_precedence_over_title() {
        // Title would match exactly, but the clause tag must decide.
        let result = DocumentMatcher::new()
            .match_document(&doc("Quality Objectives", &["6.2"]), &quality_objectives_req());
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::Clause);
        assert!((result.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn falls_through_to_title() {
        let result = DocumentMatcher::new()
            .match_document(&doc("Quality_objectives.xlsx", &[]), &quality_objectives_req());
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::Title);
    }

    #[test]
    fn falls_through_to_keyword() {
        let result = DocumentMatcher::new().match_document(
            &doc("2024 objectives and targets overview", &[]),
            &quality_objectives_req(),
        );
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::Keyword);
    }

    #[test]
    fn no_signal_returns_none_result() {
        let result = DocumentMatcher::new()
            .match_document(&doc("random_file.txt", &[]), &quality_objectives_req());
        assert!(!result.is_match);
        assert_eq!(result.match_type, MatchType::None);
        assert!(result.confidence.abs() < f64::EPSILON);
    }
}
