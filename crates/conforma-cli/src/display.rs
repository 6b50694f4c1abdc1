//! Plain-text report cards for the CLI.

use std::collections::BTreeMap;

use conforma_core::{
    ClauseMapping, DocumentStatus, Importance, MatchResult, MissingRequirement, Standard,
    StandardRequirement,
};
use conforma_ingest::ParsedDocument;
use conforma_match::DuplicateReport;

const RULE_WIDTH: usize = 64;

fn header(title: &str) {
    println!("{}", "─".repeat(RULE_WIDTH));
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

fn status_label(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Draft => "draft",
        DocumentStatus::UnderReview => "under review",
        DocumentStatus::Approved => "approved",
        DocumentStatus::Archived => "archived",
    }
}

pub fn classification(
    filename: &str,
    standard: Standard,
    parsed: &ParsedDocument,
    proposals: &BTreeMap<String, Vec<ClauseMapping>>,
) {
    header(&format!("Classification: {filename} against {standard}"));
    println!(
        "  {} section(s), {} character(s)",
        parsed.sections.len(),
        parsed.metadata.char_count
    );
    if parsed.metadata.parse_error {
        println!("  warning: content is a parse-failure placeholder");
    }
    println!();

    if proposals.is_empty() {
        println!("  no clause mappings proposed");
        return;
    }
    for (section, mappings) in proposals {
        println!("  {section}");
        for mapping in mappings {
            let keywords = if mapping.matched_keywords.is_empty() {
                String::new()
            } else {
                format!("  [{}]", mapping.matched_keywords.join(", "))
            };
            println!(
                "    clause {:<8} confidence {:.2}{keywords}",
                mapping.clause_number, mapping.confidence
            );
        }
    }
}

pub fn missing(org: &str, standard: Option<Standard>, report: &[MissingRequirement]) {
    let scope = standard.map_or_else(|| "all standards".to_string(), |s| s.to_string());
    header(&format!("Missing documents: {org} ({scope})"));

    if report.is_empty() {
        println!("  no missing documents");
        return;
    }
    for requirement in report {
        let importance = match requirement.importance {
            Importance::Mandatory => "mandatory",
            Importance::Recommended => "recommended",
        };
        println!(
            "  {:<40} {:<12} clauses: {}",
            requirement.title,
            importance,
            requirement.clause_refs.join(", ")
        );
    }
    println!();
    println!("  {} requirement(s) unfulfilled", report.len());
}

pub fn duplicates(org: &str, report: &DuplicateReport) {
    header(&format!("Duplicate groups: {org}"));
    println!(
        "  {} document(s) scanned, {} in {} group(s)",
        report.total_documents,
        report.duplicates_found,
        report.groups.len()
    );

    for group in &report.groups {
        println!();
        println!(
            "  \"{}\"  confidence {:.2}  action: {}",
            group.base_title,
            group.confidence,
            group.recommended_action.as_str()
        );
        for member in &group.members {
            let marker = if member.is_latest_version { "*" } else { " " };
            println!(
                "   {marker} {:<40} v{:<3} {:<12} owner: {}",
                member.title,
                member.version,
                status_label(member.status),
                member.owner
            );
        }
    }
}

pub fn fulfillment(org: &str, requirement: &StandardRequirement, result: &MatchResult) {
    header(&format!("Fulfillment: {} in {org}", requirement.id));
    println!("  requirement: {}", requirement.title);
    println!("  standard:    {}", requirement.standard);

    if result.is_match {
        println!(
            "  fulfilled via {} match, confidence {:.2}",
            result.match_type.as_str(),
            result.confidence
        );
        if let Some(id) = &result.matched_id {
            println!("  matched document: {id}");
        }
    } else {
        println!("  not fulfilled");
    }
}
