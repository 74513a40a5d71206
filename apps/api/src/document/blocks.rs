//! Typed intermediate representation shared by the preview and export renderers.

use serde::{Deserialize, Serialize};

/// A run of inline content. Calculator links point at the active use-case's
/// pricing calculator; the URL is resolved at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Span {
    Text { text: String },
    CalculatorLink { text: String },
}

/// Inline text made of plain and linked spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText {
    pub spans: Vec<Span>,
}

const LINK_WORD: &str = "estimate";

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![Span::Text { text }],
        }
    }

    /// Splits `text` around the first case-insensitive "estimate" and turns that
    /// word into a calculator link. Surrounding text is kept verbatim.
    pub fn linkify(text: &str) -> Self {
        // ASCII lowering keeps byte offsets aligned with `text`.
        let Some(start) = text.to_ascii_lowercase().find(LINK_WORD) else {
            return Self::plain(text);
        };
        let end = start + LINK_WORD.len();

        let mut spans = Vec::with_capacity(3);
        if start > 0 {
            spans.push(Span::Text {
                text: text[..start].to_string(),
            });
        }
        spans.push(Span::CalculatorLink {
            text: text[start..end].to_string(),
        });
        if end < text.len() {
            spans.push(Span::Text {
                text: text[end..].to_string(),
            });
        }
        Self { spans }
    }

    /// Concatenated visible text.
    pub fn to_plain_string(&self) -> String {
        self.spans
            .iter()
            .map(|s| match s {
                Span::Text { text } | Span::CalculatorLink { text } => text.as_str(),
            })
            .collect()
    }

    #[cfg(test)]
    pub fn has_link(&self) -> bool {
        self.spans
            .iter()
            .any(|s| matches!(s, Span::CalculatorLink { .. }))
    }
}

/// A table recovered from pipe-delimited lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    pub header: Vec<String>,
    pub rows: Vec<Vec<RichText>>,
}

impl TableBlock {
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Data rows fitted to the header width: surplus cells are dropped and
    /// short rows are padded with empty cells.
    pub fn fitted_rows(&self) -> Vec<Vec<RichText>> {
        let width = self.width();
        self.rows
            .iter()
            .map(|row| {
                let mut cells: Vec<RichText> = row.iter().take(width).cloned().collect();
                cells.resize(width, RichText::default());
                cells
            })
            .collect()
    }
}

/// One classified unit of generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        text: String,
        /// Id from the fixed section vocabulary ("2.1", "4", ...), if matched.
        section: Option<String>,
    },
    Table(TableBlock),
    ListItem(RichText),
    Paragraph {
        text: RichText,
        emphasis: bool,
    },
    /// Position of the user-maintained timeline table.
    TimelineMarker,
    /// Position of the use-case architecture diagram.
    ImageMarker,
    /// Position of the use-case cost table.
    CostTableMarker,
    PageBreak,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linkify_preserves_surrounding_text() {
        let text = RichText::linkify("Your estimate here");
        assert_eq!(
            text.spans,
            vec![
                Span::Text {
                    text: "Your ".to_string()
                },
                Span::CalculatorLink {
                    text: "estimate".to_string()
                },
                Span::Text {
                    text: " here".to_string()
                },
            ]
        );
        assert_eq!(text.to_plain_string(), "Your estimate here");
    }

    #[test]
    fn test_linkify_only_first_occurrence() {
        let text = RichText::linkify("Estimate vs estimate");
        assert_eq!(text.spans.len(), 2);
        assert_eq!(
            text.spans[0],
            Span::CalculatorLink {
                text: "Estimate".to_string()
            }
        );
    }

    #[test]
    fn test_linkify_without_keyword_is_plain() {
        let text = RichText::linkify("Nothing to link – ✔");
        assert!(!text.has_link());
        assert_eq!(text.to_plain_string(), "Nothing to link – ✔");
    }

    #[test]
    fn test_linkify_handles_multibyte_prefix() {
        let text = RichText::linkify("✔ ESTIMATE");
        assert!(text.has_link());
        assert_eq!(text.to_plain_string(), "✔ ESTIMATE");
    }

    #[test]
    fn test_fitted_rows_pads_and_truncates() {
        let table = TableBlock {
            header: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                vec![RichText::plain("1")],
                vec![
                    RichText::plain("1"),
                    RichText::plain("2"),
                    RichText::plain("3"),
                ],
            ],
        };
        let rows = table.fitted_rows();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0][1], RichText::default());
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1][1].to_plain_string(), "2");
    }
}
