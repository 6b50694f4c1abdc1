//! Duplicate detection over an organisation's documents.
//!
//! Greedy single-link clustering: documents are compared pairwise in a
//! deterministic scan order, and a document assigned to a group is excluded
//! from every later comparison. Two documents that are each similar to a
//! third but not to each other land in the same group only when the third
//! is scanned first. Do not replace this with full transitive closure; that
//! changes which documents get auto-merged.

use std::collections::HashSet;

use tracing::info;

use conforma_core::weights::{
    DUPLICATE_GROUP_THRESHOLD, JACCARD_THRESHOLD, STRIPPED_SIMILARITY_THRESHOLD,
    VERSION_STRIPPED_CONFIDENCE,
};
use conforma_core::{
    DocumentRecord, DocumentStatus, DuplicateGroup, DuplicateMember, RecommendedAction,
    canonical_title, extract_version, similarity, strip_version_markers,
};
use conforma_store::DocumentStore;
use serde::Serialize;

use crate::MatchError;

/// Result of a duplicate scan.
#[derive(Debug, Serialize)]
pub struct DuplicateReport {
    pub groups: Vec<DuplicateGroup>,
    pub total_documents: usize,
    /// Documents that ended up in some group.
    pub duplicates_found: usize,
}

pub struct DuplicateDetector<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> DuplicateDetector<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Pairwise O(n²) scan over the organisation's documents.
    ///
    /// Deterministic: the scan order (title, then version and recency
    /// descending) fixes both the grouping and the latest-version flags, so
    /// repeated runs over unchanged data produce identical reports.
    pub fn detect(&self, organization_id: &str) -> Result<DuplicateReport, MatchError> {
        let mut docs = self.store.find_all_by_organization(organization_id)?;
        docs.sort_by(|a, b| {
            canonical_title(&a.title)
                .cmp(&canonical_title(&b.title))
                .then(b.version.cmp(&a.version))
                .then(b.updated_at.cmp(&a.updated_at))
        });

        let mut processed: HashSet<String> = HashSet::new();
        let mut groups = Vec::new();

        for i in 0..docs.len() {
            if processed.contains(&docs[i].id) {
                continue;
            }
            let mut members = vec![&docs[i]];
            let mut confidence = 0.0f64;

            for j in (i + 1)..docs.len() {
                if processed.contains(&docs[j].id) {
                    continue;
                }
                if let Some(pair) = duplicate_confidence(&docs[i], &docs[j])
                    && pair > DUPLICATE_GROUP_THRESHOLD
                {
                    members.push(&docs[j]);
                    processed.insert(docs[j].id.clone());
                    confidence = confidence.max(pair);
                }
            }

            if members.len() > 1 {
                processed.insert(docs[i].id.clone());
                groups.push(build_group(members, confidence));
            }
        }

        let duplicates_found = groups.iter().map(|g| g.members.len()).sum();
        info!(
            organization = organization_id,
            total = docs.len(),
            groups = groups.len(),
            duplicates_found,
            "duplicate scan complete"
        );
        Ok(DuplicateReport {
            groups,
            total_documents: docs.len(),
            duplicates_found,
        })
    }
}

/// The pairwise duplicate rules, first hit wins:
/// equal canonical titles (1.0), clause-mapping Jaccard (> 0.8), equal
/// version-stripped base titles (0.9), stripped-title similarity (> 0.8).
fn duplicate_confidence(a: &DocumentRecord, b: &DocumentRecord) -> Option<f64> {
    let canonical_a = canonical_title(&a.title);
    let canonical_b = canonical_title(&b.title);
    if !canonical_a.is_empty() && canonical_a == canonical_b {
        return Some(1.0);
    }

    if let Some(jaccard) = clause_jaccard(a, b)
        && jaccard > JACCARD_THRESHOLD
    {
        return Some(jaccard);
    }

    let stripped_a = strip_version_markers(&a.title);
    let stripped_b = strip_version_markers(&b.title);
    if !stripped_a.is_empty() && stripped_a == stripped_b {
        return Some(VERSION_STRIPPED_CONFIDENCE);
    }

    let score = similarity(&stripped_a, &stripped_b);
    if !stripped_a.is_empty() && !stripped_b.is_empty() && score > STRIPPED_SIMILARITY_THRESHOLD {
        return Some(score);
    }
    None
}

/// Jaccard similarity of the two documents' clause-mapping sets. `None`
/// when either document carries no mappings.
fn clause_jaccard(a: &DocumentRecord, b: &DocumentRecord) -> Option<f64> {
    let set_a: HashSet<String> = a.clause_mappings.iter().map(|m| m.clause_id()).collect();
    let set_b: HashSet<String> = b.clause_mappings.iter().map(|m| m.clause_id()).collect();
    if set_a.is_empty() || set_b.is_empty() {
        return None;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    Some(intersection as f64 / union as f64)
}

fn build_group(members: Vec<&DocumentRecord>, confidence: f64) -> DuplicateGroup {
    // Latest-version ranking: approved first, then extracted title version,
    // stored version, recency.
    let mut ranked = members;
    ranked.sort_by(|a, b| {
        let a_approved = a.status == DocumentStatus::Approved;
        let b_approved = b.status == DocumentStatus::Approved;
        b_approved
            .cmp(&a_approved)
            .then_with(|| {
                extract_version(&b.title)
                    .unwrap_or(0)
                    .cmp(&extract_version(&a.title).unwrap_or(0))
            })
            .then(b.version.cmp(&a.version))
            .then(b.updated_at.cmp(&a.updated_at))
    });

    let recommended_action = recommend(&ranked);
    let base_title = strip_version_markers(&ranked[0].title);
    let members = ranked
        .iter()
        .enumerate()
        .map(|(index, doc)| DuplicateMember {
            document_id: doc.id.clone(),
            title: doc.title.clone(),
            version: doc.version,
            status: doc.status,
            owner: doc.owner.clone(),
            is_latest_version: index == 0,
        })
        .collect();

    DuplicateGroup {
        base_title,
        members,
        confidence,
        recommended_action,
    }
}

fn recommend(members: &[&DocumentRecord]) -> RecommendedAction {
    let statuses: HashSet<DocumentStatus> = members.iter().map(|d| d.status).collect();
    if statuses.len() == 1 {
        return RecommendedAction::KeepLatest;
    }
    let owners: HashSet<&str> = members.iter().map(|d| d.owner.as_str()).collect();
    if owners.len() > 1 {
        return RecommendedAction::ManualReview;
    }
    let has_approved = statuses.contains(&DocumentStatus::Approved);
    let has_draft = statuses.contains(&DocumentStatus::Draft);
    if has_approved && has_draft {
        return RecommendedAction::MergeContent;
    }
    RecommendedAction::KeepLatest
}
