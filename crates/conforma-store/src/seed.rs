//! Built-in reference data for ISO 9001:2015 and ISO 27001:2022.
//!
//! The mandatory "required documents" set per standard plus the clause
//! tables the section classifier matches against. Seeded once; treated as
//! immutable by everything downstream.

use conforma_core::{DocumentType, Importance, IsoClause, Standard, StandardRequirement};

fn requirement(
    id: &str,
    title: &str,
    standard: Standard,
    category: &str,
    keywords: &[&str],
    clause_numbers: &[&str],
    document_type: Option<DocumentType>,
    importance: Importance,
) -> StandardRequirement {
    StandardRequirement {
        id: id.to_string(),
        title: title.to_string(),
        standard,
        category: category.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        clause_numbers: clause_numbers.iter().map(|c| c.to_string()).collect(),
        document_type,
        importance,
        can_be_fulfilled_by: vec![],
        fulfills: vec![],
    }
}

fn clause(
    standard: Standard,
    clause_number: &str,
    parent_number: Option<&str>,
    title: &str,
    keywords: &[&str],
) -> IsoClause {
    IsoClause {
        standard,
        clause_number: clause_number.to_string(),
        title: title.to_string(),
        parent_number: parent_number.map(str::to_string),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// Required documents for all supported standards.
pub fn requirements() -> Vec<StandardRequirement> {
    let mut all = iso9001_requirements();
    all.extend(iso27001_requirements());
    all
}

/// Clause tables for all supported standards.
pub fn clauses() -> Vec<IsoClause> {
    let mut all = iso9001_clauses();
    all.extend(iso27001_clauses());
    all
}

pub fn iso9001_requirements() -> Vec<StandardRequirement> {
    use DocumentType::*;
    use Importance::*;
    let s = Standard::Iso9001_2015;
    let mut reqs = vec![
        requirement(
            "9001-scope",
            "Scope of the QMS",
            s,
            "context",
            &["scope", "boundaries", "applicability"],
            &["4.3"],
            Some(Manual),
            Mandatory,
        ),
        requirement(
            "9001-quality-policy",
            "Quality Policy",
            s,
            "leadership",
            &["quality", "policy", "commitment"],
            &["5.2", "5.2.1", "5.2.2"],
            Some(Policy),
            Mandatory,
        ),
        requirement(
            "9001-quality-objectives",
            "Quality Objectives",
            s,
            "planning",
            &["quality", "objectives", "targets", "measurable"],
            &["6.2", "6.2.1", "6.2.2"],
            None,
            Mandatory,
        ),
        requirement(
            "9001-risk-register",
            "Risk Register",
            s,
            "planning",
            &["risk", "register", "log", "tracking", "repository"],
            &["6.1"],
            Some(Register),
            Recommended,
        ),
        requirement(
            "9001-competence-records",
            "Competence and Training Records",
            s,
            "support",
            &["competence", "training", "skills", "records"],
            &["7.2"],
            Some(Record),
            Mandatory,
        ),
        requirement(
            "9001-documented-information",
            "Control of Documented Information Procedure",
            s,
            "support",
            &["documented", "information", "control", "records"],
            &["7.5", "7.5.3"],
            Some(Procedure),
            Mandatory,
        ),
        requirement(
            "9001-operational-planning",
            "Operational Planning and Control",
            s,
            "operation",
            &["operational", "planning", "control", "criteria"],
            &["8.1"],
            Some(Plan),
            Mandatory,
        ),
        requirement(
            "9001-supplier-evaluation",
            "Supplier Evaluation Records",
            s,
            "operation",
            &["supplier", "evaluation", "external", "provider"],
            &["8.4", "8.4.1"],
            Some(Record),
            Mandatory,
        ),
        requirement(
            "9001-internal-audit",
            "Internal Audit Programme",
            s,
            "performance",
            &["internal", "audit", "programme", "schedule"],
            &["9.2", "9.2.2"],
            Some(Plan),
            Mandatory,
        ),
        requirement(
            "9001-management-review",
            "Management Review Minutes",
            s,
            "performance",
            &["management", "review", "minutes", "inputs", "outputs"],
            &["9.3"],
            Some(Record),
            Mandatory,
        ),
        requirement(
            "9001-nonconformity",
            "Nonconformity and Corrective Action Records",
            s,
            "improvement",
            &["nonconformity", "corrective", "action", "capa"],
            &["10.2"],
            Some(Record),
            Mandatory,
        ),
    ];

    // The quality manual is optional under the 2015 revision but fulfils
    // scope, policy, and objectives when present.
    let mut manual = requirement(
        "9001-quality-manual",
        "Quality Manual",
        s,
        "documentation",
        &["quality", "manual", "qms", "handbook"],
        &["4.3", "5.2", "7.5"],
        Some(Manual),
        Recommended,
    );
    manual.fulfills = vec![
        "Scope of the QMS".to_string(),
        "Quality Policy".to_string(),
    ];
    reqs.push(manual);

    if let Some(scope) = reqs.iter_mut().find(|r| r.id == "9001-scope") {
        scope.can_be_fulfilled_by = vec!["Quality Manual".to_string()];
    }
    reqs
}

pub fn iso27001_requirements() -> Vec<StandardRequirement> {
    use DocumentType::*;
    use Importance::*;
    let s = Standard::Iso27001_2022;
    let mut reqs = vec![
        requirement(
            "27001-scope",
            "Scope of the ISMS",
            s,
            "context",
            &["isms", "scope", "boundaries"],
            &["4.3"],
            Some(Manual),
            Mandatory,
        ),
        requirement(
            "27001-security-policy",
            "Information Security Policy",
            s,
            "leadership",
            &["information", "security", "policy"],
            &["5.2"],
            Some(Policy),
            Mandatory,
        ),
        requirement(
            "27001-risk-assessment",
            "Information Security Risk Assessment",
            s,
            "planning",
            &["risk", "assessment", "methodology", "analysis"],
            &["6.1.2", "8.2"],
            Some(Report),
            Mandatory,
        ),
        requirement(
            "27001-soa",
            "Statement of Applicability",
            s,
            "planning",
            &["statement", "applicability", "soa", "controls"],
            &["6.1.3"],
            Some(Register),
            Mandatory,
        ),
        requirement(
            "27001-risk-treatment",
            "Risk Treatment Plan",
            s,
            "planning",
            &["risk", "treatment", "plan", "controls"],
            &["6.1.3", "8.3"],
            Some(Plan),
            Mandatory,
        ),
        requirement(
            "27001-security-objectives",
            "Information Security Objectives",
            s,
            "planning",
            &["security", "objectives", "measurable"],
            &["6.2"],
            None,
            Mandatory,
        ),
        requirement(
            "27001-asset-inventory",
            "Inventory of Assets",
            s,
            "controls",
            &["asset", "inventory", "register", "owner"],
            &["5.9"],
            Some(Register),
            Mandatory,
        ),
        requirement(
            "27001-access-control",
            "Access Control Policy",
            s,
            "controls",
            &["access", "control", "authorisation", "privileges"],
            &["5.15"],
            Some(Policy),
            Mandatory,
        ),
        requirement(
            "27001-incident-response",
            "Incident Response Procedure",
            s,
            "controls",
            &["incident", "response", "breach", "escalation"],
            &["5.24", "5.26"],
            Some(Procedure),
            Mandatory,
        ),
        requirement(
            "27001-business-continuity",
            "Business Continuity Plan",
            s,
            "controls",
            &["business", "continuity", "bcp", "disruption"],
            &["5.29", "5.30"],
            Some(Plan),
            Mandatory,
        ),
        requirement(
            "27001-internal-audit",
            "ISMS Internal Audit Programme",
            s,
            "performance",
            &["internal", "audit", "programme", "isms"],
            &["9.2"],
            Some(Plan),
            Mandatory,
        ),
        requirement(
            "27001-management-review",
            "ISMS Management Review Minutes",
            s,
            "performance",
            &["management", "review", "minutes", "isms"],
            &["9.3"],
            Some(Record),
            Mandatory,
        ),
    ];

    if let Some(soa) = reqs.iter_mut().find(|r| r.id == "27001-soa") {
        soa.can_be_fulfilled_by = vec!["Risk Treatment Plan".to_string()];
    }
    reqs
}

pub fn iso9001_clauses() -> Vec<IsoClause> {
    let s = Standard::Iso9001_2015;
    vec![
        clause(s, "4", None, "Context of the organization", &["context", "organization"]),
        clause(s, "4.1", Some("4"), "Understanding the organization and its context", &["context", "issues"]),
        clause(s, "4.2", Some("4"), "Understanding the needs and expectations of interested parties", &["interested", "parties", "stakeholders"]),
        clause(s, "4.3", Some("4"), "Determining the scope of the quality management system", &["scope", "boundaries"]),
        clause(s, "4.4", Some("4"), "Quality management system and its processes", &["processes", "qms"]),
        clause(s, "5", None, "Leadership", &["leadership", "commitment"]),
        clause(s, "5.1", Some("5"), "Leadership and commitment", &["leadership", "commitment", "customer"]),
        clause(s, "5.2", Some("5"), "Policy", &["quality", "policy"]),
        clause(s, "5.3", Some("5"), "Organizational roles, responsibilities and authorities", &["roles", "responsibilities", "authorities"]),
        clause(s, "6", None, "Planning", &["planning"]),
        clause(s, "6.1", Some("6"), "Actions to address risks and opportunities", &["risk", "opportunities"]),
        clause(s, "6.2", Some("6"), "Quality objectives and planning to achieve them", &["quality", "objectives", "targets"]),
        clause(s, "6.3", Some("6"), "Planning of changes", &["change", "planning"]),
        clause(s, "7", None, "Support", &["support", "resources"]),
        clause(s, "7.1", Some("7"), "Resources", &["resources", "infrastructure", "environment"]),
        clause(s, "7.2", Some("7"), "Competence", &["competence", "training", "skills"]),
        clause(s, "7.3", Some("7"), "Awareness", &["awareness"]),
        clause(s, "7.4", Some("7"), "Communication", &["communication"]),
        clause(s, "7.5", Some("7"), "Documented information", &["documented", "information", "records"]),
        clause(s, "8", None, "Operation", &["operation"]),
        clause(s, "8.1", Some("8"), "Operational planning and control", &["operational", "planning", "control"]),
        clause(s, "8.2", Some("8"), "Requirements for products and services", &["requirements", "products", "services"]),
        clause(s, "8.3", Some("8"), "Design and development of products and services", &["design", "development"]),
        clause(s, "8.4", Some("8"), "Control of externally provided processes, products and services", &["supplier", "external", "provider"]),
        clause(s, "8.5", Some("8"), "Production and service provision", &["production", "service", "provision"]),
        clause(s, "8.6", Some("8"), "Release of products and services", &["release", "acceptance"]),
        clause(s, "8.7", Some("8"), "Control of nonconforming outputs", &["nonconforming", "outputs"]),
        clause(s, "9", None, "Performance evaluation", &["performance", "evaluation"]),
        clause(s, "9.1", Some("9"), "Monitoring, measurement, analysis and evaluation", &["monitoring", "measurement", "analysis"]),
        clause(s, "9.2", Some("9"), "Internal audit", &["internal", "audit"]),
        clause(s, "9.3", Some("9"), "Management review", &["management", "review"]),
        clause(s, "10", None, "Improvement", &["improvement"]),
        clause(s, "10.2", Some("10"), "Nonconformity and corrective action", &["nonconformity", "corrective", "action"]),
        clause(s, "10.3", Some("10"), "Continual improvement", &["continual", "improvement"]),
    ]
}

pub fn iso27001_clauses() -> Vec<IsoClause> {
    let s = Standard::Iso27001_2022;
    vec![
        clause(s, "4", None, "Context of the organization", &["context", "organization"]),
        clause(s, "4.3", Some("4"), "Determining the scope of the information security management system", &["isms", "scope", "boundaries"]),
        clause(s, "5", None, "Leadership", &["leadership"]),
        clause(s, "5.2", Some("5"), "Policy", &["information", "security", "policy"]),
        clause(s, "5.3", Some("5"), "Organizational roles, responsibilities and authorities", &["roles", "responsibilities"]),
        clause(s, "6", None, "Planning", &["planning"]),
        clause(s, "6.1.2", Some("6"), "Information security risk assessment", &["risk", "assessment"]),
        clause(s, "6.1.3", Some("6"), "Information security risk treatment", &["risk", "treatment", "applicability"]),
        clause(s, "6.2", Some("6"), "Information security objectives and planning to achieve them", &["security", "objectives"]),
        clause(s, "7", None, "Support", &["support"]),
        clause(s, "7.2", Some("7"), "Competence", &["competence", "training"]),
        clause(s, "7.5", Some("7"), "Documented information", &["documented", "information"]),
        clause(s, "8", None, "Operation", &["operation"]),
        clause(s, "8.1", Some("8"), "Operational planning and control", &["operational", "planning"]),
        clause(s, "8.2", Some("8"), "Information security risk assessment", &["risk", "assessment"]),
        clause(s, "8.3", Some("8"), "Information security risk treatment", &["risk", "treatment"]),
        clause(s, "9", None, "Performance evaluation", &["performance", "evaluation"]),
        clause(s, "9.2", Some("9"), "Internal audit", &["internal", "audit"]),
        clause(s, "9.3", Some("9"), "Management review", &["management", "review"]),
        clause(s, "10", None, "Improvement", &["improvement"]),
        clause(s, "10.2", Some("10"), "Nonconformity and corrective action", &["nonconformity", "corrective"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_numbers_unique_per_standard() {
        let all = clauses();
        for standard in [Standard::Iso9001_2015, Standard::Iso27001_2022] {
            let numbers: Vec<&str> = all
                .iter()
                .filter(|c| c.standard == standard)
                .map(|c| c.clause_number.as_str())
                .collect();
            let mut deduped = numbers.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(numbers.len(), deduped.len(), "{standard}: duplicate clause numbers");
        }
    }

    #[test]
    fn requirement_ids_unique() {
        let all = requirements();
        let mut ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(total, ids.len());
    }

    #[test]
    fn every_requirement_has_keywords_and_clauses() {
        for req in requirements() {
            assert!(!req.keywords.is_empty(), "{}: no keywords", req.id);
            assert!(!req.clause_numbers.is_empty(), "{}: no clauses", req.id);
        }
    }

    #[test]
    fn parent_clauses_exist() {
        let all = clauses();
        for c in &all {
            if let Some(parent) = &c.parent_number {
                assert!(
                    all.iter()
                        .any(|p| p.standard == c.standard && &p.clause_number == parent),
                    "{}:{} has dangling parent {parent}",
                    c.standard,
                    c.clause_number
                );
            }
        }
    }

    #[test]
    fn declared_fulfillment_titles_resolve() {
        let all = requirements();
        for req in &all {
            for title in req.can_be_fulfilled_by.iter().chain(&req.fulfills) {
                assert!(
                    all.iter()
                        .any(|r| r.standard == req.standard && &r.title == title),
                    "{}: unknown fulfillment title {title:?}",
                    req.id
                );
            }
        }
    }
}
