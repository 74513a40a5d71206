//! Fixed section vocabulary the generation prompt asks the model to use.
//!
//! Matching is best-effort: the model is free to relabel or drop sections,
//! in which case the line is handled by the generic heading rules instead.

use std::sync::LazyLock;

use regex::Regex;

pub const TABLE_OF_CONTENTS: &str = "1";
pub const SOLUTION_ARCHITECTURE: &str = "4";

#[derive(Debug)]
pub struct KnownSection {
    pub id: &'static str,
    pub title: &'static str,
    pattern: Regex,
}

const VOCABULARY: &[(&str, &str)] = &[
    ("1", "TABLE OF CONTENTS"),
    ("2", "PROJECT OVERVIEW"),
    ("2.1", "OBJECTIVE"),
    ("2.2", "PROJECT SPONSOR(S) / STAKEHOLDER(S) / PROJECT TEAM"),
    ("2.3", "ASSUMPTIONS & DEPENDENCIES"),
    ("2.4", "POC SUCCESS CRITERIA"),
    ("3", "SCOPE OF WORK – TECHNICAL PROJECT PLAN"),
    ("4", "SOLUTION ARCHITECTURE"),
    ("5", "RESOURCES AND COST ESTIMATES"),
];

static SECTIONS: LazyLock<Vec<KnownSection>> = LazyLock::new(|| {
    VOCABULARY
        .iter()
        .map(|&(id, title)| {
            // Any dash the model picks is accepted where the title uses an en dash.
            let title_pattern = regex::escape(title).replace('–', "[-–—]");
            let pattern = Regex::new(&format!(r"^{}[.\s]+{}", regex::escape(id), title_pattern))
                .expect("section vocabulary pattern is valid");
            KnownSection { id, title, pattern }
        })
        .collect()
});

/// `# 6`, `#7 ...`, `# 10 ...`: sections the document must not contain.
static HALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*(?:[6-9]|10)\b").expect("halt pattern is valid"));

/// Matches an already cleaned, upper-cased line against the vocabulary.
pub fn match_known(upper: &str) -> Option<&'static KnownSection> {
    SECTIONS.iter().find(|s| s.pattern.is_match(upper))
}

/// True for the out-of-range section headings that end the document.
pub fn is_halt(line: &str) -> bool {
    HALT.is_match(line)
}
