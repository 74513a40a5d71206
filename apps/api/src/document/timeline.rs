//! Timeline Table: the user-maintained phase/week grid.
//!
//! The column set is `Phase | Task | Wk1 .. WkN`, where N derives from the
//! selected PoC duration. It is rendered in place of whatever timeline the
//! model produced, in both the preview and the export.

use serde::{Deserialize, Serialize};

use crate::document::blocks::{Block, TableBlock};
use crate::document::interpreter::interpret;

/// Glyph written into marked week cells.
pub const MARK: &str = "✔";

const PHASE_COLUMN: &str = "Phase";
const TASK_COLUMN: &str = "Task";
const MAX_WEEKS: u8 = 26;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PocDuration {
    TwoWeeks,
    #[default]
    FourWeeks,
    SixWeeks,
    Custom(u8),
}

impl PocDuration {
    /// Number of week columns, clamped to 1..=26 for custom durations.
    pub fn weeks(self) -> usize {
        match self {
            PocDuration::TwoWeeks => 2,
            PocDuration::FourWeeks => 4,
            PocDuration::SixWeeks => 6,
            PocDuration::Custom(n) => n.clamp(1, MAX_WEEKS) as usize,
        }
    }

    pub fn label(self) -> String {
        format!("{} weeks", self.weeks())
    }

    fn from_weeks(weeks: usize) -> Self {
        match weeks {
            2 => PocDuration::TwoWeeks,
            4 => PocDuration::FourWeeks,
            6 => PocDuration::SixWeeks,
            n => PocDuration::Custom(n.min(MAX_WEEKS as usize) as u8),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub phase: String,
    pub task: String,
    /// One flag per week column; `true` means activity in that week.
    pub weeks: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineTable {
    pub duration: PocDuration,
    pub rows: Vec<TimelineRow>,
}

impl Default for TimelineTable {
    /// The five workstreams the generation prompt asks for, spread over four weeks.
    fn default() -> Self {
        let row = |phase: &str, task: &str, weeks: [bool; 4]| TimelineRow {
            phase: phase.to_string(),
            task: task.to_string(),
            weeks: weeks.to_vec(),
        };
        Self {
            duration: PocDuration::FourWeeks,
            rows: vec![
                row(
                    "A. Infrastructure Setup",
                    "Infra setup",
                    [true, false, false, false],
                ),
                row(
                    "B. Core Workflows",
                    "Core workflows",
                    [false, true, true, false],
                ),
                row(
                    "C. Backend Components",
                    "Backend services and integrations",
                    [false, true, true, false],
                ),
                row(
                    "D. UI / Integration Layer",
                    "UI and integration",
                    [false, false, true, false],
                ),
                row(
                    "E. Testing and Feedback",
                    "Testing, validation, demo and feedback",
                    [false, false, true, true],
                ),
            ],
        }
    }
}

impl TimelineTable {
    pub fn week_count(&self) -> usize {
        self.duration.weeks()
    }

    /// `Phase | Task | Wk1 .. WkN`.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![PHASE_COLUMN.to_string(), TASK_COLUMN.to_string()];
        columns.extend((1..=self.week_count()).map(|w| format!("Wk{w}")));
        columns
    }

    /// Changes the duration, truncating or padding every row's week flags.
    pub fn set_duration(&mut self, duration: PocDuration) {
        self.duration = duration;
        self.normalize();
    }

    /// Forces every row to exactly one flag per week column.
    pub fn normalize(&mut self) {
        let weeks = self.week_count();
        for row in &mut self.rows {
            row.weeks.resize(weeks, false);
        }
    }

    /// Cell text for every row, aligned with [`columns`](Self::columns).
    pub fn cell_rows(&self) -> Vec<Vec<String>> {
        let weeks = self.week_count();
        self.rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.phase.clone(), row.task.clone()];
                cells.extend((0..weeks).map(|w| {
                    if row.weeks.get(w).copied().unwrap_or(false) {
                        MARK.to_string()
                    } else {
                        String::new()
                    }
                }));
                cells
            })
            .collect()
    }

    /// Pipe table with a separator row, readable by the interpreter.
    pub fn to_markdown(&self) -> String {
        let columns = self.columns();
        let mut out = format!("| {} |\n", columns.join(" | "));
        out.push_str(&format!("|{}\n", " --- |".repeat(columns.len())));
        for cells in self.cell_rows() {
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        out
    }

    /// Reads the first pipe table found in `text`. Surrounding prose and
    /// headings are ignored.
    pub fn from_markdown(text: &str) -> Option<Self> {
        let table: Vec<&str> = text
            .lines()
            .map(str::trim)
            .skip_while(|l| !l.starts_with('|'))
            .take_while(|l| l.starts_with('|'))
            .collect();
        interpret(&table.join("\n"))
            .iter()
            .find_map(|block| match block {
                Block::Table(t) => Self::from_table(t),
                _ => None,
            })
    }

    /// Rebuilds a timeline from a parsed table. Returns `None` unless the
    /// header is `Phase | Task` followed by at least one week column.
    /// Any non-empty week cell counts as marked.
    pub fn from_table(table: &TableBlock) -> Option<Self> {
        let header = &table.header;
        if header.len() < 3
            || !header[0].eq_ignore_ascii_case(PHASE_COLUMN)
            || !header[1].eq_ignore_ascii_case(TASK_COLUMN)
        {
            return None;
        }
        let weeks = header.len() - 2;
        let rows = table
            .fitted_rows()
            .into_iter()
            .map(|cells| TimelineRow {
                phase: cells[0].to_plain_string(),
                task: cells[1].to_plain_string(),
                weeks: cells[2..]
                    .iter()
                    .map(|c| !c.to_plain_string().trim().is_empty())
                    .collect(),
            })
            .collect();
        Some(Self {
            duration: PocDuration::from_weeks(weeks),
            rows,
        })
    }
}
