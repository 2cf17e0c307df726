//! Table-of-contents reconstruction.
//!
//! # Pipeline
//!
//! ```text
//! pages (document order)
//!   ├─ before/at the contents page ─> harvest_page  ─> CandidateMap
//!   ├─ after the contents page      ─> match_body_page ─> link + TocEntry
//!   └─ every page but the first     ─> Footer::stamp
//! ```
//!
//! The contents page is the first page holding a TEXT block that contains
//! [`CONTENTS_MARKER`]. Every TEXT block after the marker on that same page
//! is a candidate entry. Each later page is matched on its first TEXT block
//! only, and a candidate is consumed by its first match.

use std::collections::HashMap;

use serde::Serialize;

use crate::document::{Document, LinkAnnotation, Page, TocEntry};
use crate::footer::Footer;
use crate::geometry::Rect;

/// Substring identifying the contents page.
pub const CONTENTS_MARKER: &str = "Table of Content";

/// Candidate labels containing any of these are decoration, not entries.
pub const EXCLUDED_SUBSTRINGS: [&str; 2] = [" of ", "Created by:"];

/// Separator between a section title and its per-document suffix on body
/// pages, as in `"Highlighted issues - ProjectX"`.
pub const KEY_SEPARATOR: &str = " - ";

/// Level given to every generated outline entry.
pub const ENTRY_LEVEL: u8 = 1;

/// A harvested contents-page block waiting to be matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub rect: Rect,
    /// The block's raw text, used verbatim as the outline title.
    pub text: String,
}

/// Cleaned label -> candidate. Entries are removed as they are matched.
pub type CandidateMap = HashMap<String, Candidate>;

/// A successful body-page match.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub link: LinkAnnotation,
    pub entry: TocEntry,
}

/// Summary of one reconstruction pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocReport {
    /// 0-based index of the contents page, if one was found.
    pub contents_page: Option<usize>,
    pub entries: Vec<TocEntry>,
    pub links: usize,
    /// Candidate labels never found on a body page, sorted.
    pub unmatched: Vec<String>,
}

/// Label under which a contents-page block is stored: the raw text with
/// every newline removed.
pub fn candidate_label(text: &str) -> String {
    text.replace('\n', "")
}

pub fn is_excluded(label: &str) -> bool {
    EXCLUDED_SUBSTRINGS.iter().any(|s| label.contains(s))
}

/// Lookup key for a body page's first TEXT block.
///
/// Keeps what precedes the first newline (dropping e.g. a creation-date
/// line), then what precedes the first [`KEY_SEPARATOR`].
pub fn match_key(text: &str) -> &str {
    let first_line = text.split_once('\n').map_or(text, |(head, _)| head);
    first_line
        .split_once(KEY_SEPARATOR)
        .map_or(first_line, |(head, _)| head)
}

/// Scan `page` for the contents marker and harvest the TEXT blocks that
/// follow it on the same page.
///
/// Blocks before the marker are ignored. A block holding the marker is
/// never a candidate itself. Returns `true` if the marker was seen.
pub fn harvest_page(page: &Page, candidates: &mut CandidateMap) -> bool {
    let mut found = false;

    for block in page.text_blocks() {
        if block.text.contains(CONTENTS_MARKER) {
            found = true;
            continue;
        }
        if !found {
            continue;
        }

        let label = candidate_label(&block.text);
        if is_excluded(&label) {
            log::debug!("page {}: skipping decorative block {:?}", page.index, label);
            continue;
        }

        candidates.insert(
            label,
            Candidate {
                rect: block.rect,
                text: block.text.clone(),
            },
        );
    }

    found
}

/// Match the first TEXT block of a body page against the remaining
/// candidates, consuming the candidate on a hit.
///
/// Only the first TEXT block is ever looked at, whether or not it matches.
pub fn match_body_page(page: &Page, candidates: &mut CandidateMap) -> Option<Match> {
    let first = page.text_blocks().next()?;
    let key = match_key(&first.text);

    let Some(candidate) = candidates.remove(key) else {
        log::debug!("page {}: no contents entry for {:?}", page.index, key);
        return None;
    };

    Some(Match {
        link: LinkAnnotation {
            from: candidate.rect,
            target_page: page.index,
        },
        entry: TocEntry {
            level: ENTRY_LEVEL,
            title: candidate.text,
            page: page.index + 1,
        },
    })
}

/// Rebuild the outline and contents-page links of `doc` and stamp footers,
/// in a single pass over its pages.
///
/// The accumulated entries are assigned with [`Document::set_toc`] once all
/// pages have been visited; when no contents page exists that assignment is
/// an empty list.
pub fn add_interactive_toc<D: Document>(
    doc: &mut D,
    footer: &Footer,
) -> Result<TocReport, D::Error> {
    let total = doc.page_count();
    let mut contents_page: Option<usize> = None;
    let mut candidates = CandidateMap::new();
    let mut entries: Vec<TocEntry> = Vec::new();

    for index in 0..total {
        let page = doc.page(index)?;

        match contents_page {
            None => {
                if harvest_page(&page, &mut candidates) {
                    log::debug!(
                        "page {}: contents page with {} candidates",
                        index,
                        candidates.len()
                    );
                    contents_page = Some(index);
                }
            }
            Some(contents) => {
                if let Some(hit) = match_body_page(&page, &mut candidates) {
                    log::debug!("page {}: linked {:?}", index, hit.entry.title);
                    doc.insert_link(contents, &hit.link)?;
                    entries.push(hit.entry);
                }
            }
        }

        footer.stamp(doc, index, total)?;
    }

    doc.set_toc(&entries)?;

    let mut unmatched: Vec<String> = candidates.into_keys().collect();
    unmatched.sort();

    log::info!(
        "table of contents: {} entries, {} unmatched candidates",
        entries.len(),
        unmatched.len()
    );

    Ok(TocReport {
        contents_page,
        links: entries.len(),
        entries,
        unmatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockKind;
    use crate::testing::{fake_rect, Drawing, FakeDocument};

    fn footer() -> Footer {
        Footer {
            organization: "Vdoo".to_string(),
            contact: "info@vdoo.com".to_string(),
            year: 2024,
        }
    }

    fn entry(title: &str, page: usize) -> TocEntry {
        TocEntry {
            level: 1,
            title: title.to_string(),
            page,
        }
    }

    // =====================================================================
    // match_key / candidate_label / is_excluded
    // =====================================================================

    #[test]
    fn test_match_key_truncates_at_newline() {
        assert_eq!(
            match_key("Report Title\nCreated: 2024-01-01"),
            "Report Title"
        );
    }

    #[test]
    fn test_match_key_truncates_at_separator() {
        assert_eq!(
            match_key("Highlighted issues - ProjectX"),
            "Highlighted issues"
        );
    }

    #[test]
    fn test_match_key_newline_before_separator() {
        assert_eq!(match_key("Summary\nA - B"), "Summary");
        assert_eq!(match_key("A - B - C\nD"), "A");
    }

    #[test]
    fn test_match_key_plain() {
        assert_eq!(match_key("Overview"), "Overview");
        assert_eq!(match_key(""), "");
    }

    #[test]
    fn test_match_key_hyphen_without_spaces_is_kept() {
        assert_eq!(match_key("Follow-up items"), "Follow-up items");
    }

    #[test]
    fn test_candidate_label_joins_lines() {
        assert_eq!(candidate_label("Highlighted\nissues\n"), "Highlightedissues");
    }

    #[test]
    fn test_is_excluded() {
        assert!(is_excluded("Page 1 of 3"));
        assert!(is_excluded("Created by: someone"));
        assert!(!is_excluded("Table ofContents"));
        assert!(!is_excluded("Overview"));
    }

    // =====================================================================
    // harvest_page
    // =====================================================================

    #[test]
    fn test_harvest_ignores_blocks_before_marker() {
        let doc = FakeDocument::from_texts(&[&[
            "Cover title",
            "Table of Contents",
            "Overview",
            "Findings",
        ]]);
        let mut candidates = CandidateMap::new();

        assert!(harvest_page(&doc.pages[0], &mut candidates));
        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains_key("Overview"));
        assert!(candidates.contains_key("Findings"));
        assert!(!candidates.contains_key("Cover title"));
    }

    #[test]
    fn test_harvest_without_marker() {
        let doc = FakeDocument::from_texts(&[&["Overview", "Findings"]]);
        let mut candidates = CandidateMap::new();

        assert!(!harvest_page(&doc.pages[0], &mut candidates));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_harvest_applies_exclusions() {
        let doc = FakeDocument::from_texts(&[&[
            "Table of Content",
            "Overview",
            "Page 1 of 2",
            "Created by: Analyst",
        ]]);
        let mut candidates = CandidateMap::new();

        harvest_page(&doc.pages[0], &mut candidates);
        assert_eq!(candidates.keys().collect::<Vec<_>>(), vec!["Overview"]);
    }

    #[test]
    fn test_harvest_skips_non_text_blocks() {
        let doc = FakeDocument::from_texts(&[&["Table of Content", "img:logo", "Overview"]]);
        let mut candidates = CandidateMap::new();

        harvest_page(&doc.pages[0], &mut candidates);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates["Overview"].rect, fake_rect(0, 2));
    }

    #[test]
    fn test_harvest_keeps_raw_text_and_rect() {
        let doc = FakeDocument::from_texts(&[&["Table of Content", "Highlighted\nissues"]]);
        let mut candidates = CandidateMap::new();

        harvest_page(&doc.pages[0], &mut candidates);
        let c = &candidates["Highlightedissues"];
        assert_eq!(c.text, "Highlighted\nissues");
        assert_eq!(c.rect, fake_rect(0, 1));
    }

    #[test]
    fn test_harvest_second_marker_is_not_a_candidate() {
        let doc = FakeDocument::from_texts(&[&[
            "Table of Content",
            "Overview",
            "Table of Contents (continued)",
            "Findings",
        ]]);
        let mut candidates = CandidateMap::new();

        harvest_page(&doc.pages[0], &mut candidates);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_harvest_duplicate_label_keeps_later_block() {
        let doc = FakeDocument::from_texts(&[&["Table of Content", "Overview", "Overview"]]);
        let mut candidates = CandidateMap::new();

        harvest_page(&doc.pages[0], &mut candidates);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates["Overview"].rect, fake_rect(0, 2));
    }

    // =====================================================================
    // match_body_page
    // =====================================================================

    fn candidates_for(labels: &[&str]) -> CandidateMap {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| {
                (
                    l.to_string(),
                    Candidate {
                        rect: fake_rect(0, i),
                        text: l.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_match_consumes_candidate() {
        let doc = FakeDocument::from_texts(&[&["x"], &["Overview\nCreated: 2024-01-01"]]);
        let mut candidates = candidates_for(&["Overview", "Findings"]);

        let hit = match_body_page(&doc.pages[1], &mut candidates).unwrap();
        assert_eq!(hit.entry, entry("Overview", 2));
        assert_eq!(hit.link.target_page, 1);
        assert_eq!(hit.link.from, fake_rect(0, 0));
        assert!(!candidates.contains_key("Overview"));
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_match_only_first_text_block() {
        let doc = FakeDocument::from_texts(&[&["x"], &["Unrelated header", "Overview"]]);
        let mut candidates = candidates_for(&["Overview"]);

        assert!(match_body_page(&doc.pages[1], &mut candidates).is_none());
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_match_skips_leading_non_text_blocks() {
        let doc = FakeDocument::from_texts(&[&["x"], &["img:banner", "Overview", "Findings"]]);
        let mut candidates = candidates_for(&["Overview", "Findings"]);

        let hit = match_body_page(&doc.pages[1], &mut candidates).unwrap();
        assert_eq!(hit.entry.title, "Overview");
        assert!(candidates.contains_key("Findings"));
    }

    #[test]
    fn test_match_page_without_text() {
        let doc = FakeDocument::from_texts(&[&["x"], &["img:full page chart"]]);
        let mut candidates = candidates_for(&["Overview"]);

        assert!(match_body_page(&doc.pages[1], &mut candidates).is_none());
    }

    #[test]
    fn test_match_uses_candidate_text_as_title() {
        let doc = FakeDocument::from_texts(&[&["x"], &["Highlighted issues - ProjectX"]]);
        let mut candidates = CandidateMap::new();
        candidates.insert(
            "Highlighted issues".to_string(),
            Candidate {
                rect: fake_rect(0, 3),
                text: "Highlighted issues\n".to_string(),
            },
        );

        let hit = match_body_page(&doc.pages[1], &mut candidates).unwrap();
        assert_eq!(hit.entry.title, "Highlighted issues\n");
    }

    // =====================================================================
    // add_interactive_toc
    // =====================================================================

    #[test]
    fn test_full_pass_links_and_entries() {
        let mut doc = FakeDocument::from_texts(&[
            &["Security Report", "Created by: Analyst"],
            &["Table of Contents", "Overview", "Highlighted issues", "Appendix"],
            &["Overview\nCreated: 2024-01-01", "Body text"],
            &["Highlighted issues - ProjectX", "Issue list"],
            &["Appendix"],
        ]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();

        assert_eq!(report.contents_page, Some(1));
        assert_eq!(
            report.entries,
            vec![
                entry("Overview", 3),
                entry("Highlighted issues", 4),
                entry("Appendix", 5),
            ]
        );
        assert_eq!(report.links, 3);
        assert!(report.unmatched.is_empty());
        assert_eq!(doc.toc.as_deref(), Some(report.entries.as_slice()));

        assert_eq!(doc.links.len(), 3);
        assert!(doc.links.iter().all(|(page, _)| *page == 1));
        assert_eq!(
            doc.links.iter().map(|(_, l)| l.target_page).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert_eq!(doc.links[0].1.from, fake_rect(1, 1));
        assert_eq!(doc.links[1].1.from, fake_rect(1, 2));
    }

    #[test]
    fn test_entries_follow_page_order_not_contents_order() {
        let mut doc = FakeDocument::from_texts(&[
            &["Table of Content", "Zeta", "Alpha", "Mid"],
            &["Alpha"],
            &["Mid"],
            &["Zeta"],
        ]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();
        let pages: Vec<usize> = report.entries.iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![2, 3, 4]);
        assert_eq!(report.entries[0].title, "Alpha");
    }

    #[test]
    fn test_label_is_consumed_at_most_once() {
        let mut doc = FakeDocument::from_texts(&[
            &["Table of Content", "Overview"],
            &["Overview"],
            &["Overview - continued"],
        ]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();
        assert_eq!(report.entries, vec![entry("Overview", 2)]);
        assert_eq!(doc.links.len(), 1);
    }

    #[test]
    fn test_exclusions_never_become_entries() {
        let mut doc = FakeDocument::from_texts(&[
            &["Table of Content", "Page 1 of 4", "Created by: Analyst", "Overview"],
            &["Page 1 of 4"],
            &["Created by: Analyst"],
            &["Overview"],
        ]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();
        assert_eq!(report.entries, vec![entry("Overview", 4)]);
    }

    #[test]
    fn test_unmatched_candidates_are_reported_only() {
        let mut doc = FakeDocument::from_texts(&[
            &["Table of Content", "Overview", "Missing", "Also missing"],
            &["Overview"],
        ]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.unmatched, vec!["Also missing", "Missing"]);
        assert_eq!(doc.links.len(), 1);
    }

    #[test]
    fn test_no_contents_page() {
        let mut doc = FakeDocument::from_texts(&[&["Cover"], &["Overview"], &["Findings"]]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();

        assert_eq!(report.contents_page, None);
        assert!(report.entries.is_empty());
        assert!(doc.links.is_empty());
        assert_eq!(doc.toc, Some(vec![]));
        assert!(doc.drawings_on(0).is_empty());
        assert_eq!(doc.drawings_on(1).len(), 3);
        assert_eq!(doc.drawings_on(2).len(), 3);
    }

    #[test]
    fn test_zero_pages() {
        let mut doc = FakeDocument::default();

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();
        assert_eq!(report.contents_page, None);
        assert!(doc.drawings.is_empty());
        assert_eq!(doc.toc, Some(vec![]));
    }

    #[test]
    fn test_only_non_text_blocks() {
        let mut doc = FakeDocument::from_texts(&[&["img:a"], &["img:b"]]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();
        assert_eq!(report.contents_page, None);
        assert_eq!(doc.drawings_on(1).len(), 3);
    }

    #[test]
    fn test_pages_before_contents_page_are_not_matched() {
        let mut doc = FakeDocument::from_texts(&[
            &["Overview"],
            &["Table of Content", "Overview"],
            &["Body"],
        ]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();
        assert!(report.entries.is_empty());
        assert_eq!(report.unmatched, vec!["Overview"]);
    }

    #[test]
    fn test_later_marker_pages_are_body_pages() {
        let mut doc = FakeDocument::from_texts(&[
            &["Table of Content", "Overview"],
            &["Table of Content", "Extra"],
            &["Overview"],
        ]);

        let report = add_interactive_toc(&mut doc, &footer()).unwrap();
        assert_eq!(report.contents_page, Some(0));
        assert_eq!(report.entries, vec![entry("Overview", 3)]);
    }

    #[test]
    fn test_contents_and_body_pages_get_footers() {
        let mut doc = FakeDocument::from_texts(&[
            &["Cover"],
            &["Table of Content", "Overview"],
            &["Overview"],
        ]);

        add_interactive_toc(&mut doc, &footer()).unwrap();

        let labels: Vec<String> = doc
            .drawings
            .iter()
            .filter_map(|d| match d {
                Drawing::Text { text, .. } if text.ends_with("Pages") => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["2 / 3 Pages", "3 / 3 Pages"]);
    }

    #[test]
    fn test_page_error_propagates() {
        struct Broken;
        impl Document for Broken {
            type Error = String;
            fn page_count(&self) -> usize {
                1
            }
            fn page(&self, _index: usize) -> Result<Page, String> {
                Err("corrupt page".to_string())
            }
            fn insert_link(&mut self, _: usize, _: &LinkAnnotation) -> Result<(), String> {
                unreachable!()
            }
            fn draw_rect(
                &mut self,
                _: usize,
                _: Rect,
                _: crate::geometry::Color,
                _: crate::geometry::Color,
            ) -> Result<(), String> {
                unreachable!()
            }
            fn insert_text(
                &mut self,
                _: usize,
                _: crate::geometry::Point,
                _: &str,
                _: crate::document::TextStyle,
            ) -> Result<(), String> {
                unreachable!()
            }
            fn set_toc(&mut self, _: &[TocEntry]) -> Result<(), String> {
                unreachable!()
            }
        }

        let err = add_interactive_toc(&mut Broken, &footer()).unwrap_err();
        assert_eq!(err, "corrupt page");
    }

    #[test]
    fn test_report_serializes() {
        let report = TocReport {
            contents_page: Some(1),
            entries: vec![entry("Overview", 3)],
            links: 1,
            unmatched: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entries"][0]["page"], 3);
        assert_eq!(json["contents_page"], 1);
    }

    #[test]
    fn test_block_kind_filter_used_for_first_block() {
        let page = Page {
            index: 4,
            bounds: Rect::default(),
            blocks: vec![crate::document::TextBlock {
                rect: Rect::default(),
                text: "Overview".to_string(),
                kind: BlockKind::NonText,
                index: 0,
            }],
        };
        let mut candidates = candidates_for(&["Overview"]);
        assert!(match_body_page(&page, &mut candidates).is_none());
    }
}
