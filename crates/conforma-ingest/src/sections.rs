//! Section extraction from parsed document text.
//!
//! A single line scan: heading-like lines open a new section, everything
//! else appends to the open one. Byte offsets are tracked so callers can
//! slice the original content per section.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// `1 Scope`, `5.2 Policy`, `6.2.1 Objectives` — up to three numeric parts,
/// optional trailing dot on the number.
static NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+){0,2})\.?\s+(.+)$").unwrap());

const HEADING_MAX_CHARS: usize = 100;

/// Small connective words allowed lowercase inside a title-case heading.
const TITLE_STOPWORDS: &[&str] = &["a", "an", "and", "for", "in", "of", "on", "the", "to"];

/// One extracted section. `start_index`/`end_index` are byte offsets into
/// the parsed content: the heading line's start, and the offset just before
/// the next section begins.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSection {
    pub title: String,
    pub content: String,
    pub level: u8,
    pub start_index: usize,
    pub end_index: usize,
}

struct OpenSection {
    title: String,
    level: u8,
    start_index: usize,
    lines: Vec<String>,
}

impl OpenSection {
    fn close(self, end_index: usize) -> DocumentSection {
        DocumentSection {
            title: self.title,
            content: self.lines.join("\n"),
            level: self.level,
            start_index: self.start_index,
            end_index,
        }
    }
}

/// Split content into heading-delimited sections.
///
/// Numbered headings take their level from the numeric depth (`5.2` is
/// level 2); markdown, ALL-CAPS, and short title-case headings open level-1
/// sections. Text before the first heading lands in an untitled level-1
/// section. Blank lines are skipped, never appended.
pub fn extract_sections(content: &str) -> Vec<DocumentSection> {
    let mut sections = Vec::new();
    let mut current: Option<OpenSection> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some((title, level)) = heading(trimmed) {
            if let Some(open) = current.take() {
                sections.push(open.close(line_start));
            }
            current = Some(OpenSection {
                title,
                level,
                start_index: line_start,
                lines: Vec::new(),
            });
        } else if let Some(open) = &mut current {
            open.lines.push(trimmed.to_string());
        } else {
            // Preamble before any heading.
            current = Some(OpenSection {
                title: String::new(),
                level: 1,
                start_index: line_start,
                lines: vec![trimmed.to_string()],
            });
        }
    }

    if let Some(open) = current.take() {
        sections.push(open.close(content.len()));
    }
    sections
}

/// Heading detection, numbered first. The full line stays in the numbered
/// title so the classifier can read the clause number back out of it.
fn heading(line: &str) -> Option<(String, u8)> {
    if let Some(captures) = NUMBERED_HEADING.captures(line) {
        let level = captures[1].split('.').count() as u8;
        return Some((line.to_string(), level));
    }

    if let Some(stripped) = line.strip_prefix('#') {
        let title = stripped.trim_start_matches('#').trim();
        if !title.is_empty() {
            return Some((title.to_string(), 1));
        }
        return None;
    }

    if line.len() < HEADING_MAX_CHARS && is_all_caps(line) {
        return Some((line.to_string(), 1));
    }

    if line.len() < HEADING_MAX_CHARS && is_title_case(line) {
        return Some((line.to_string(), 1));
    }

    None
}

fn is_all_caps(line: &str) -> bool {
    line.chars().any(|c| c.is_alphabetic()) && !line.chars().any(|c| c.is_lowercase())
}

/// Short title-case line: every word capitalized (connectives excepted),
/// no sentence-ending punctuation.
fn is_title_case(line: &str) -> bool {
    if line.ends_with(['.', ',', ';', ':']) {
        return false;
    }
    let mut words = line.split_whitespace().peekable();
    let Some(first) = words.peek() else {
        return false;
    };
    if !first.chars().next().is_some_and(|c| c.is_uppercase()) {
        return false;
    }
    words.all(|word| {
        word.chars().next().is_some_and(|c| c.is_uppercase())
            || TITLE_STOPWORDS.contains(&word.to_lowercase().as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_sections_with_levels() {
        let text = "1 Scope\nThis document defines the scope.\n\n5.2 Policy\nTop management shall establish a policy.\n6.2.1 Objectives\nObjectives shall be measurable.\n";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 3);

        assert_eq!(sections[0].title, "1 Scope");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].content, "This document defines the scope.");

        assert_eq!(sections[1].title, "5.2 Policy");
        assert_eq!(sections[1].level, 2);

        assert_eq!(sections[2].title, "6.2.1 Objectives");
        assert_eq!(sections[2].level, 3);
    }

    #[test]
    fn byte_offsets_cover_the_source() {
        let text = "1 Scope\nbody one\n5.2 Policy\nbody two\n";
        let sections = extract_sections(text);
        assert_eq!(sections[0].start_index, 0);
        assert_eq!(sections[0].end_index, text.find("5.2").unwrap());
        assert_eq!(sections[1].start_index, text.find("5.2").unwrap());
        assert_eq!(sections[1].end_index, text.len());
        // Slicing the source at the offsets starts with the heading line.
        assert!(text[sections[1].start_index..sections[1].end_index].starts_with("5.2 Policy"));
    }

    #[test]
    fn markdown_and_caps_headings() {
        let text = "# Introduction\nintro text\nDEFINITIONS\nterm text\n";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[1].title, "DEFINITIONS");
    }

    #[test]
    fn title_case_heading_opens_section() {
        let text = "Management of Change\nchanges shall be reviewed before adoption.\n";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Management of Change");
        assert_eq!(sections[0].content, "changes shall be reviewed before adoption.");
    }

    #[test]
    fn sentence_lines_are_content_not_headings() {
        let text = "1 Scope\nThe scope covers all production sites.\nIt excludes the warehouse.\n";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].content,
            "The scope covers all production sites.\nIt excludes the warehouse."
        );
    }

    #[test]
    fn preamble_before_first_heading_is_untitled() {
        let text = "this document is controlled.\n1 Scope\nscope text\n";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].content, "this document is controlled.");
    }

    #[test]
    fn blank_lines_skipped() {
        let text = "1 Scope\n\n\nscope text\n\n";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "scope text");
    }

    #[test]
    fn empty_input_yields_no_sections() {
        assert!(extract_sections("").is_empty());
        assert!(extract_sections("\n\n").is_empty());
    }
}
