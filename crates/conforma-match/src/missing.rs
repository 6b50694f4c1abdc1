//! Missing-document analysis: which required documents does an organisation
//! not have yet?

use tracing::{info, warn};

use conforma_core::weights::FULFILLMENT_THRESHOLD;
use conforma_core::{MissingRequirement, Standard};
use conforma_store::{DocumentStore, RequirementCatalog};

use crate::relationship::RelationshipMatcher;

/// Full scan of a standard's catalog against an organisation's documents.
///
/// O(requirements × documents); catalogs and per-organisation document
/// counts are small enough for interactive latency, so no incremental
/// index is kept.
pub struct MissingDocumentFinder<'a> {
    store: &'a dyn DocumentStore,
    catalog: &'a dyn RequirementCatalog,
}

impl<'a> MissingDocumentFinder<'a> {
    pub fn new(store: &'a dyn DocumentStore, catalog: &'a dyn RequirementCatalog) -> Self {
        Self { store, catalog }
    }

    /// Requirements no document fulfils above the fulfillment threshold.
    ///
    /// A failure while checking a single requirement does not abort the
    /// report: the failure is logged and that requirement is listed as
    /// missing, so one bad input cannot poison the whole analysis.
    pub fn find_missing(
        &self,
        organization_id: &str,
        standard: Option<Standard>,
    ) -> Vec<MissingRequirement> {
        let requirements = match standard {
            Some(standard) => self.catalog.requirements_for(standard),
            None => self.catalog.all(),
        };
        let matcher = RelationshipMatcher::with_catalog(self.store, self.catalog);

        let mut missing = Vec::new();
        for req in requirements {
            let fulfilled = match matcher.check_requirement_fulfillment(&req, organization_id) {
                Ok(result) => result.is_match && result.confidence > FULFILLMENT_THRESHOLD,
                Err(error) => {
                    warn!(
                        requirement = %req.id,
                        %error,
                        "fulfillment check failed; treating requirement as unfulfilled"
                    );
                    false
                }
            };
            if !fulfilled {
                missing.push(MissingRequirement {
                    requirement_id: req.id,
                    title: req.title,
                    category: req.category,
                    clause_refs: req.clause_numbers,
                    importance: req.importance,
                });
            }
        }

        info!(
            organization = organization_id,
            missing = missing.len(),
            "missing-document scan complete"
        );
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conforma_core::{DocumentRecord, DocumentStatus};
    use conforma_store::{DocumentStore, InMemoryCatalog, InMemoryStore};

    fn doc(id: &str, title: &str) -> DocumentRecord {
        DocumentRecord {
            id: id.to_string(),
            organization_id: "org-1".into(),
            title: title.to_string(),
            content: String::new(),
            clause_mappings: vec![],
            parent_id: None,
            references: vec![],
            status: DocumentStatus::Approved,
            document_type: None,
            version: 1,
            owner: "qa".into(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_org_reports_everything_missing() {
        let store = InMemoryStore::new();
        let catalog = InMemoryCatalog::seeded();
        let finder = MissingDocumentFinder::new(&store, &catalog);

        let missing = finder.find_missing("org-1", Some(Standard::Iso9001_2015));
        assert_eq!(
            missing.len(),
            catalog.requirements_for(Standard::Iso9001_2015).len()
        );
    }

    #[test]
    fn matching_document_removes_requirement() {
        let store = InMemoryStore::new();
        store.create(doc("d1", "Quality Policy v3.docx")).unwrap();
        let catalog = InMemoryCatalog::seeded();
        let finder = MissingDocumentFinder::new(&store, &catalog);

        let missing = finder.find_missing("org-1", Some(Standard::Iso9001_2015));
        assert!(
            !missing.iter().any(|m| m.requirement_id == "9001-quality-policy"),
            "quality policy should be fulfilled"
        );
        assert!(
            missing.iter().any(|m| m.requirement_id == "9001-internal-audit"),
            "internal audit should still be missing"
        );
    }

    #[test]
    fn standard_filter_scopes_the_scan() {
        let store = InMemoryStore::new();
        let catalog = InMemoryCatalog::seeded();
        let finder = MissingDocumentFinder::new(&store, &catalog);

        let missing = finder.find_missing("org-1", Some(Standard::Iso27001_2022));
        assert!(missing.iter().all(|m| m.requirement_id.starts_with("27001")));
    }

    #[test]
    fn low_confidence_match_still_missing() {
        let store = InMemoryStore::new();
        // Hits 2 of 5 risk-register keywords: keyword confidence
        // 0.4 * 0.8 = 0.32, below the 0.5 fulfillment threshold.
        store.create(doc("d1", "tracking log")).unwrap();
        let catalog = InMemoryCatalog::seeded();
        let finder = MissingDocumentFinder::new(&store, &catalog);

        let missing = finder.find_missing("org-1", Some(Standard::Iso9001_2015));
        assert!(missing.iter().any(|m| m.requirement_id == "9001-risk-register"));
    }
}
