//! Relationship-aware requirement fulfillment.
//!
//! Extends the direct matcher with three fallback passes over an
//! organisation's document graph. Pass order mirrors the confidence
//! discount: direct > fulfills > hierarchy > reference. The first positive
//! match anywhere short-circuits the whole search.

use tracing::debug;

use conforma_core::weights::{
    CHILD_DISCOUNT, DECLARED_FULFILLMENT_CONFIDENCE, MANUAL_FULFILLMENT_CONFIDENCE,
    MANUAL_KEYWORD_SHARE, PARENT_DISCOUNT, REFERENCE_DISCOUNT,
};
use conforma_core::{
    DocumentRecord, MatchResult, MatchType, StandardRequirement, normalize_title,
};
use conforma_store::{DocumentStore, RequirementCatalog};

use crate::matcher::DocumentMatcher;
use crate::strategies::{keyword_overlap, title_match};
use crate::MatchError;

/// Requirement fulfillment check over a whole organisation, including
/// indirect fulfillment through manuals, hierarchy, and reference edges.
///
/// The declared relations run in both directions: the requirement's own
/// `can_be_fulfilled_by` titles, and any other catalog requirement whose
/// `fulfills` list names this requirement. The reverse direction needs the
/// catalog, so it only runs when one is attached via [`Self::with_catalog`].
pub struct RelationshipMatcher<'a> {
    store: &'a dyn DocumentStore,
    catalog: Option<&'a dyn RequirementCatalog>,
    matcher: DocumentMatcher,
}

impl<'a> RelationshipMatcher<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            catalog: None,
            matcher: DocumentMatcher::new(),
        }
    }

    /// Matcher that also resolves declared `fulfills` relations from the
    /// rest of the catalog.
    pub fn with_catalog(
        store: &'a dyn DocumentStore,
        catalog: &'a dyn RequirementCatalog,
    ) -> Self {
        Self {
            store,
            catalog: Some(catalog),
            matcher: DocumentMatcher::new(),
        }
    }

    /// Direct access to the underlying facade.
    pub fn match_document(
        &self,
        doc: &DocumentRecord,
        req: &StandardRequirement,
    ) -> MatchResult {
        self.matcher.match_document(doc, req)
    }

    /// Search the organisation's documents for one that fulfils the
    /// requirement. Returns the first positive result in pass order, or the
    /// negative result when every pass comes up empty.
    pub fn check_requirement_fulfillment(
        &self,
        req: &StandardRequirement,
        organization_id: &str,
    ) -> Result<MatchResult, MatchError> {
        let docs = self.store.find_all_by_organization(organization_id)?;

        if let Some(result) = self.direct_pass(&docs, req) {
            return Ok(result);
        }
        if let Some(result) = self.fulfillment_pass(&docs, req) {
            return Ok(result);
        }
        if let Some(result) = self.hierarchy_pass(&docs, req)? {
            return Ok(result);
        }
        if let Some(result) = self.reference_pass(&docs, req)? {
            return Ok(result);
        }
        debug!(requirement = %req.id, organization = organization_id, "no fulfillment found");
        Ok(MatchResult::none())
    }

    fn direct_pass(
        &self,
        docs: &[DocumentRecord],
        req: &StandardRequirement,
    ) -> Option<MatchResult> {
        for doc in docs {
            let result = self.matcher.match_document(doc, req);
            if result.is_match {
                return Some(MatchResult::hit(
                    MatchType::Direct,
                    result.confidence,
                    &doc.id,
                ));
            }
        }
        None
    }

    /// Manuals covering the requirement's keywords, same-type documents with
    /// matching titles, and the declared relations in both directions:
    /// the requirement's own `can_be_fulfilled_by` titles, and other
    /// requirements whose `fulfills` list names this one.
    fn fulfillment_pass(
        &self,
        docs: &[DocumentRecord],
        req: &StandardRequirement,
    ) -> Option<MatchResult> {
        for doc in docs {
            if doc.document_type.is_some_and(|t| t.is_manual()) {
                let (_, ratio) = keyword_overlap(&doc.title, &req.keywords);
                if ratio >= MANUAL_KEYWORD_SHARE {
                    return Some(MatchResult::hit(
                        MatchType::Fulfills,
                        MANUAL_FULFILLMENT_CONFIDENCE,
                        &doc.id,
                    ));
                }
            }

            if doc.document_type.is_some()
                && doc.document_type == req.document_type
                && let Some(confidence) = title_match(&doc.title, &req.title)
            {
                return Some(MatchResult::hit(MatchType::Fulfills, confidence, &doc.id));
            }

            for declared in &req.can_be_fulfilled_by {
                if title_match(&doc.title, declared).is_some() {
                    return Some(MatchResult::hit(
                        MatchType::CanBeFulfilledBy,
                        DECLARED_FULFILLMENT_CONFIDENCE,
                        &doc.id,
                    ));
                }
            }
        }

        self.declared_fulfills(docs, req)
    }

    /// The reverse declared relation: another requirement states that its
    /// document also `fulfills` this one, so a document satisfying that
    /// requirement's title counts here too.
    fn declared_fulfills(
        &self,
        docs: &[DocumentRecord],
        req: &StandardRequirement,
    ) -> Option<MatchResult> {
        let catalog = self.catalog?;
        let wanted = normalize_title(&req.title);

        for other in catalog.all() {
            if other.id == req.id
                || !other
                    .fulfills
                    .iter()
                    .any(|title| normalize_title(title) == wanted)
            {
                continue;
            }
            for doc in docs {
                if title_match(&doc.title, &other.title).is_some() {
                    return Some(MatchResult::hit(
                        MatchType::Fulfills,
                        DECLARED_FULFILLMENT_CONFIDENCE,
                        &doc.id,
                    ));
                }
            }
        }
        None
    }

    /// Manual parents (discounted 0.8) and child documents (discounted 0.9).
    fn hierarchy_pass(
        &self,
        docs: &[DocumentRecord],
        req: &StandardRequirement,
    ) -> Result<Option<MatchResult>, MatchError> {
        for doc in docs {
            if let Some(parent_id) = &doc.parent_id
                && let Some(parent) = self.store.find_by_id(parent_id)?
                && parent.document_type.is_some_and(|t| t.is_manual())
            {
                let result = self.matcher.match_document(&parent, req);
                if result.is_match {
                    return Ok(Some(MatchResult::hit(
                        MatchType::Parent,
                        result.confidence * PARENT_DISCOUNT,
                        &parent.id,
                    )));
                }
            }

            for child in self.store.children_of(&doc.id)? {
                let result = self.matcher.match_document(&child, req);
                if result.is_match {
                    return Ok(Some(MatchResult::hit(
                        MatchType::Parent,
                        result.confidence * CHILD_DISCOUNT,
                        &child.id,
                    )));
                }
            }
        }
        Ok(None)
    }

    /// Outgoing and incoming reference edges, both discounted 0.7 —
    /// indirect evidence.
    fn reference_pass(
        &self,
        docs: &[DocumentRecord],
        req: &StandardRequirement,
    ) -> Result<Option<MatchResult>, MatchError> {
        for doc in docs {
            for reference in &doc.references {
                if let Some(target) = self.store.find_by_id(&reference.target_id)? {
                    let result = self.matcher.match_document(&target, req);
                    if result.is_match {
                        return Ok(Some(MatchResult::hit(
                            MatchType::Reference,
                            result.confidence * REFERENCE_DISCOUNT,
                            &target.id,
                        )));
                    }
                }
            }

            for referrer in self.store.referencing(&doc.id)? {
                let result = self.matcher.match_document(&referrer, req);
                if result.is_match {
                    return Ok(Some(MatchResult::hit(
                        MatchType::Reference,
                        result.confidence * REFERENCE_DISCOUNT,
                        &referrer.id,
                    )));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conforma_core::{DocumentStatus, DocumentType, Importance, Reference, ReferenceType, Standard};
    use conforma_store::{DocumentStore, InMemoryCatalog, InMemoryStore, assign_parent};

    fn doc(id: &str, org: &str, title: &str) -> DocumentRecord {
        DocumentRecord {
            id: id.to_string(),
            organization_id: org.to_string(),
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

    fn req(title: &str, keywords: &[&str]) -> StandardRequirement {
        StandardRequirement {
            id: "req-1".into(),
            title: title.to_string(),
            standard: Standard::Iso9001_2015,
            category: "planning".into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            clause_numbers: vec![],
            document_type: None,
            importance: Importance::Mandatory,
            can_be_fulfilled_by: vec![],
            fulfills: vec![],
        }
    }

    #[test]
    fn direct_match_reports_fulfilling_document() {
        let store = InMemoryStore::new();
        store.create(doc("d1", "org-1", "Quality Objectives")).unwrap();

        let matcher = RelationshipMatcher::new(&store);
        let result = matcher
            .check_requirement_fulfillment(&req("Quality Objectives", &[]), "org-1")
            .unwrap();
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::Direct);
        assert_eq!(result.matched_id.as_deref(), Some("d1"));
    }

    #[test]
    fn manual_keyword_fulfillment_fixed_confidence() {
        let store = InMemoryStore::new();
        let mut manual = doc("m1", "org-1", "Quality and Objectives Manual");
        manual.document_type = Some(DocumentType::Manual);
        store.create(manual).unwrap();

        let matcher = RelationshipMatcher::new(&store);
        // "quality" and "objectives" appear in the manual title: 2/3 >= 0.3.
        let result = matcher
            .check_requirement_fulfillment(
                &req("Something Unrelated", &["quality", "objectives", "kpi"]),
                "org-1",
            )
            .unwrap();
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::Fulfills);
        assert!((result.confidence - MANUAL_FULFILLMENT_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn declared_fulfillment_title_hit() {
        let store = InMemoryStore::new();
        store.create(doc("d1", "org-1", "Risk Treatment Plan v2")).unwrap();

        let mut requirement = req("Statement of Applicability", &["statement", "applicability"]);
        requirement.can_be_fulfilled_by = vec!["Risk Treatment Plan".into()];

        let matcher = RelationshipMatcher::new(&store);
        let result = matcher
            .check_requirement_fulfillment(&requirement, "org-1")
            .unwrap();
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::CanBeFulfilledBy);
        assert!((result.confidence - DECLARED_FULFILLMENT_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn declared_fulfills_resolves_through_catalog() {
        let store = InMemoryStore::new();
        store
            .create(doc("d1", "org-1", "Equipment Management Manual"))
            .unwrap();

        // The covering requirement declares the relation; the target
        // carries no reciprocal can_be_fulfilled_by entry.
        let mut target = req("Calibration Records", &["calibration"]);
        target.id = "req-calibration".into();
        let mut covering = req("Equipment Management Manual", &["equipment"]);
        covering.id = "req-equipment".into();
        covering.fulfills = vec!["Calibration Records".into()];
        let catalog = InMemoryCatalog::new(vec![target.clone(), covering], vec![]);

        let without_catalog = RelationshipMatcher::new(&store)
            .check_requirement_fulfillment(&target, "org-1")
            .unwrap();
        assert!(!without_catalog.is_match);

        let result = RelationshipMatcher::with_catalog(&store, &catalog)
            .check_requirement_fulfillment(&target, "org-1")
            .unwrap();
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::Fulfills);
        assert!((result.confidence - DECLARED_FULFILLMENT_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(result.matched_id.as_deref(), Some("d1"));
    }

    #[test]
    fn manual_parent_discounted() {
        let store = InMemoryStore::new();
        // Manual sits outside the searched organisation so the direct pass
        // cannot find it; only the child's parent edge reaches it.
        let mut manual = doc("manual", "org-central", "Supplier Evaluation");
        manual.document_type = Some(DocumentType::Manual);
        store.create(manual).unwrap();
        store.create(doc("child", "org-2", "Welding Work Instruction")).unwrap();
        assign_parent(&store, "child", Some("manual")).unwrap();

        let matcher = RelationshipMatcher::new(&store);
        let result = matcher
            .check_requirement_fulfillment(&req("Supplier Evaluation", &[]), "org-2")
            .unwrap();
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::Parent);
        assert!((result.confidence - PARENT_DISCOUNT).abs() < 1e-9);
        assert_eq!(result.matched_id.as_deref(), Some("manual"));
    }

    #[test]
    fn reference_edge_discounted() {
        let store = InMemoryStore::new();
        store.create(doc("target", "org-2", "Incident Response Procedure")).unwrap();
        let mut referrer = doc("source", "org-1", "Security Overview");
        referrer.references.push(Reference {
            target_id: "target".into(),
            reference_type: ReferenceType::Implements,
        });
        store.create(referrer).unwrap();

        let matcher = RelationshipMatcher::new(&store);
        let result = matcher
            .check_requirement_fulfillment(&req("Incident Response Procedure", &[]), "org-1")
            .unwrap();
        assert!(result.is_match);
        assert_eq!(result.match_type, MatchType::Reference);
        assert!((result.confidence - REFERENCE_DISCOUNT).abs() < 1e-9);
        assert_eq!(result.matched_id.as_deref(), Some("target"));
    }

    #[test]
    fn empty_organization_no_match() {
        let store = InMemoryStore::new();
        let matcher = RelationshipMatcher::new(&store);
        let result = matcher
            .check_requirement_fulfillment(&req("Quality Policy", &["quality"]), "org-1")
            .unwrap();
        assert!(!result.is_match);
        assert_eq!(result.match_type, MatchType::None);
    }
}
