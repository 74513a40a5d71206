//! Markdown Interpreter: classifies generated text line by line into [`Block`]s.
//!
//! The generator's output is loosely structured and never validated, so every
//! rule here is a best-effort heuristic. Nothing in this module fails: text
//! that matches no rule becomes a paragraph, and missing sections simply
//! produce no blocks.
//!
//! # Rules, in priority order
//! 1. `# 6` .. `# 10` halts processing; the remainder is discarded.
//! 2. Known section headings (see [`sections`]) render once each, upper-cased.
//! 3. Runs of 3+ `|` lines become tables (header, separator, data rows).
//! 4. `#`-prefixed, `N.N` numbered or `A.`..`E.` lettered lines become headings.
//!    A lettered line ending in a period is a sentence, not a heading.
//! 5. `-`, `*` or `•` prefixed lines become list items.
//! 6. Anything else non-empty becomes a paragraph.
//!
//! A heading mentioning "timeline" is followed by a [`Block::TimelineMarker`] and
//! everything up to the next heading is skipped: the user-maintained timeline
//! replaces whatever table the model produced there.
//!
//! Text before the table-of-contents heading is model chatter and is skipped.
//! The table of contents ends at the next `#` heading, whatever its title, and
//! a [`Block::PageBreak`] marks that boundary.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::blocks::{Block, RichText, TableBlock};
use crate::document::sections::{self, SOLUTION_ARCHITECTURE, TABLE_OF_CONTENTS};

static HASH_MARKERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#+\s*").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*+").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+\s+").unwrap());
static LETTERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-E]\.\s+\S").unwrap());
static HASH_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+)\s+\S").unwrap());

/// Upper-cased words that mark a paragraph as a bold label.
const EMPHASIS_MARKERS: &[&str] = &["SPONSOR", "CONTACTS", "ASSUMPTIONS:", "DEPENDENCIES:"];

const MIN_TABLE_LINES: usize = 3;
const MAX_HEADING_LEVEL: u8 = 4;

/// Interprets generated document text into an ordered block list.
pub fn interpret(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut blocks = Vec::new();
    let mut rendered_sections: HashSet<&'static str> = HashSet::new();
    let mut in_toc = false;
    let mut i = content_start(&lines);

    while i < lines.len() {
        let line = lines[i];

        if sections::is_halt(line) {
            break;
        }
        if line.is_empty() {
            i += 1;
            continue;
        }

        let clean = clean_line(line);
        let upper = clean.to_uppercase();

        if clean.is_empty() || is_rule(&clean) {
            i += 1;
            continue;
        }

        if in_toc && line.starts_with('#') {
            blocks.push(Block::PageBreak);
            in_toc = false;
        }

        // Inside the table of contents only `#` headings count as sections;
        // bare entries such as "2.1 Objective" are the model's own listing.
        let known = sections::match_known(&upper).filter(|_| !in_toc);
        if let Some(section) = known {
            i += 1;
            if !rendered_sections.insert(section.id) {
                continue;
            }
            blocks.push(Block::Heading {
                level: 1,
                text: upper,
                section: Some(section.id.to_string()),
            });
            if section.id == TABLE_OF_CONTENTS {
                in_toc = true;
            }
            if section.id == SOLUTION_ARCHITECTURE {
                blocks.push(Block::ImageMarker);
                blocks.push(Block::CostTableMarker);
            }
            if is_timeline_title(&clean) {
                blocks.push(Block::TimelineMarker);
                i = skip_to_next_heading(&lines, i);
            }
            continue;
        }

        if line.starts_with('|') {
            let run_end = lines[i..]
                .iter()
                .position(|l| !l.starts_with('|'))
                .map_or(lines.len(), |p| i + p);
            if run_end - i >= MIN_TABLE_LINES {
                blocks.push(Block::Table(parse_table(&lines[i..run_end])));
                i = run_end;
                continue;
            }
            // Too short for a table: falls through to paragraph handling.
        }

        if let Some(level) = heading_level(line, &clean) {
            blocks.push(Block::Heading {
                level,
                text: clean.clone(),
                section: None,
            });
            i += 1;
            if is_timeline_title(&clean) {
                blocks.push(Block::TimelineMarker);
                i = skip_to_next_heading(&lines, i);
            }
            continue;
        }

        if let Some(item) = list_item_text(line) {
            blocks.push(Block::ListItem(RichText::linkify(&item)));
            i += 1;
            continue;
        }

        let emphasis = EMPHASIS_MARKERS.iter().any(|m| upper.contains(m));
        blocks.push(Block::Paragraph {
            text: RichText::linkify(&clean),
            emphasis,
        });
        i += 1;
    }

    blocks
}

/// Index of the table-of-contents heading when one appears before any halt
/// line; everything ahead of it is skipped. Without one, nothing is skipped.
fn content_start(lines: &[&str]) -> usize {
    lines
        .iter()
        .take_while(|l| !sections::is_halt(l))
        .position(|l| {
            sections::match_known(&clean_line(l).to_uppercase())
                .is_some_and(|s| s.id == TABLE_OF_CONTENTS)
        })
        .unwrap_or(0)
}

/// Removes `#` markers and `*` emphasis.
fn clean_line(line: &str) -> String {
    let without_hashes = HASH_MARKERS.replace_all(line, "");
    EMPHASIS.replace_all(&without_hashes, "").trim().to_string()
}

/// Horizontal rules (`---`, `___`) carry no content. `***` is already empty once cleaned.
fn is_rule(clean: &str) -> bool {
    clean.chars().all(|c| matches!(c, '-' | '_' | '='))
}

fn heading_level(line: &str, clean: &str) -> Option<u8> {
    if clean.is_empty() {
        return None;
    }
    if let Some(caps) = HASH_HEADING.captures(line) {
        let hashes = caps[1].len().min(MAX_HEADING_LEVEL as usize);
        return Some(hashes as u8);
    }
    if NUMBERED.is_match(clean) || (LETTERED.is_match(clean) && !clean.ends_with('.')) {
        return Some(2);
    }
    None
}

fn list_item_text(line: &str) -> Option<String> {
    let rest = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix('•'))?;
    let text = EMPHASIS.replace_all(rest.trim(), "").trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn is_timeline_title(clean: &str) -> bool {
    clean.to_lowercase().contains("timeline")
}

/// Index of the next heading-shaped line at or after `from`.
fn skip_to_next_heading(lines: &[&str], from: usize) -> usize {
    lines[from..]
        .iter()
        .position(|l| l.starts_with('#') || sections::match_known(&clean_line(l).to_uppercase()).is_some())
        .map_or(lines.len(), |p| from + p)
}

/// Header row, discarded separator row, then data rows.
fn parse_table(lines: &[&str]) -> TableBlock {
    let header = split_cells(lines[0]);
    let rows = lines[2..]
        .iter()
        .map(|l| {
            split_cells(l)
                .iter()
                .map(|cell| RichText::linkify(cell))
                .collect()
        })
        .collect();
    TableBlock { header, rows }
}

/// `| a |  | c |` → `["a", "", "c"]`. Empty cells are kept so columns stay aligned.
pub(crate) fn split_cells(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner
        .split('|')
        .map(|cell| EMPHASIS.replace_all(cell.trim(), "").trim().to_string())
        .collect()
}
