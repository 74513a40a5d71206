//! Use-case catalog: static cost figures, calculator links and diagram paths
//! for the predefined SOW templates.
//!
//! Lookups never fail. A name outside the catalog resolves to an entry with no
//! costs, no diagram and the default calculator URL.

use std::path::{Path, PathBuf};

use serde::Serialize;

pub const DEFAULT_CALCULATOR_URL: &str = "https://calculator.aws/";

/// Logos used on the export cover page, resolved against the assets directory.
pub const PARTNER_NETWORK_LOGO: &str = "aws partner logo.jpg";
pub const PARTNER_LOGO: &str = "oneture logo1.jpg";
pub const ADVANCED_TIER_LOGO: &str = "aws advanced logo1.jpg";

/// One monetary line item of a use-case cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostItem {
    /// Row label in the exported cost table ("POC", "Production", ...).
    pub environment: &'static str,
    /// Row label in the prompt's cost table ("POC Cost", "Prod Cost", ...).
    pub prompt_label: &'static str,
    pub amount: &'static str,
}

struct UseCaseEntry {
    name: &'static str,
    costs: &'static [CostItem],
    calculator_url: Option<&'static str>,
}

const fn poc(amount: &'static str) -> CostItem {
    CostItem {
        environment: "POC",
        prompt_label: "POC Cost",
        amount,
    }
}

const fn prod(amount: &'static str) -> CostItem {
    CostItem {
        environment: "Production",
        prompt_label: "Prod Cost",
        amount,
    }
}

const USE_CASES: &[UseCaseEntry] = &[
    UseCaseEntry {
        name: "L1 Support Bot POC SOW",
        costs: &[poc("3,536.40 USD")],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=211ea64cba5a8f5dc09805f4ad1a1e598ef5238b",
        ),
    },
    UseCaseEntry {
        name: "Beauty Advisor POC SOW",
        costs: &[
            poc("4,525.66 USD + 200 USD (Amazon Bedrock Cost) = 4,725.66"),
            prod("4,525.66 USD + 1,175.82 USD (Amazon Bedrock Cost) = 5,701.48"),
        ],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=3f89756a35f7bac7b2cd88d95f3e9aba9be9b0eb",
        ),
    },
    UseCaseEntry {
        name: "Ready Search POC Scope of Work Document",
        costs: &[poc("2,641.40 USD")],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=f8bc48f1ae566b8ea1241994328978e7e86d3490",
        ),
    },
    UseCaseEntry {
        name: "AI based Image Enhancement POC SOW",
        costs: &[poc("2,814.34 USD")],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=9a3e593b92b796acecf31a78aec17d7eb957d1e5",
        ),
    },
    UseCaseEntry {
        name: "AI based Image Inspection POC SOW",
        costs: &[poc("3,536.40 USD")],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=72c56f93b0c0e101d67a46af4f4fe9886eb93342",
        ),
    },
    UseCaseEntry {
        name: "Gen AI for SOP POC SOW",
        costs: &[poc("2,110.30 USD")],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=c21e9b242964724bf83556cfeee821473bb935d1",
        ),
    },
    UseCaseEntry {
        name: "Project Scope Document",
        costs: &[prod("2,993.60 USD")],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=37339d6e34c73596559fe09ca16a0ac2ec4c4252",
        ),
    },
    UseCaseEntry {
        name: "Gen AI Speech To Speech",
        costs: &[prod("2,124.23 USD")],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=8444ae26e6d61e5a43e8e743578caa17fd7f3e69",
        ),
    },
    UseCaseEntry {
        name: "PoC Scope Document",
        costs: &[
            CostItem {
                environment: "Amazon Bedrock",
                prompt_label: "amazon_bedrock",
                amount: "1,000 USD",
            },
            CostItem {
                environment: "Total",
                prompt_label: "total",
                amount: "$ 3,150",
            },
        ],
        calculator_url: Some(
            "https://calculator.aws/#/estimate?id=420ed9df095e7824a144cb6c0e9db9e7ec3c4153",
        ),
    },
];

/// Resolved reference data for one use-case name.
#[derive(Debug, Clone, Serialize)]
pub struct UseCaseRef {
    pub name: String,
    pub costs: Vec<CostItem>,
    pub calculator_url: String,
    /// Candidate diagram path. Existence is checked by the renderers.
    pub diagram: Option<PathBuf>,
}

impl UseCaseRef {
    pub fn has_costs(&self) -> bool {
        !self.costs.is_empty()
    }

    /// The diagram path, only if the file is actually present on disk.
    pub fn existing_diagram(&self) -> Option<&Path> {
        self.diagram.as_deref().filter(|p| p.is_file())
    }

    /// Markdown cost table embedded in the prompt for section 5.
    /// Empty when the use-case carries no cost figures.
    pub fn cost_table_markdown(&self) -> String {
        if self.costs.is_empty() {
            return String::new();
        }
        let mut table =
            String::from("| System | Infra Cost / month | AWS Calculator Cost |\n| --- | --- | --- |\n");
        for item in &self.costs {
            table.push_str(&format!(
                "| {} | {} | Estimate |\n",
                item.prompt_label, item.amount
            ));
        }
        table
    }
}

/// Read-only catalog rooted at the assets directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    assets_dir: PathBuf,
}

impl Catalog {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Names of every predefined use-case, in menu order.
    pub fn names(&self) -> Vec<&'static str> {
        USE_CASES.iter().map(|u| u.name).collect()
    }

    /// Resolves a use-case name. Accepts menu labels such as
    /// `"3. Ready Search POC Scope of Work Document"`.
    pub fn lookup(&self, name: &str) -> UseCaseRef {
        let key = strip_menu_number(name.trim());
        match USE_CASES.iter().find(|u| u.name == key) {
            Some(entry) => UseCaseRef {
                name: entry.name.to_string(),
                costs: entry.costs.to_vec(),
                calculator_url: entry
                    .calculator_url
                    .unwrap_or(DEFAULT_CALCULATOR_URL)
                    .to_string(),
                diagram: Some(self.assets_dir.join(format!("{}.png", entry.name))),
            },
            None => UseCaseRef {
                name: key.to_string(),
                costs: Vec::new(),
                calculator_url: DEFAULT_CALCULATOR_URL.to_string(),
                diagram: None,
            },
        }
    }

    /// Path to a cover-page logo if the file exists.
    pub fn logo(&self, file_name: &str) -> Option<PathBuf> {
        let path = self.assets_dir.join(file_name);
        path.is_file().then_some(path)
    }
}

/// `"4. AI based Image Enhancement POC SOW"` → `"AI based Image Enhancement POC SOW"`.
fn strip_menu_number(label: &str) -> &str {
    match label.split_once(". ") {
        Some((prefix, rest)) if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) => {
            rest
        }
        _ => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_use_case() {
        let catalog = Catalog::new("diagrams");
        let entry = catalog.lookup("Beauty Advisor POC SOW");
        assert_eq!(entry.costs.len(), 2);
        assert_eq!(entry.costs[1].environment, "Production");
        assert!(entry.calculator_url.contains("3f89756a35f7"));
        assert_eq!(
            entry.diagram.as_deref(),
            Some(Path::new("diagrams/Beauty Advisor POC SOW.png"))
        );
    }

    #[test]
    fn test_lookup_strips_menu_number() {
        let catalog = Catalog::new("diagrams");
        let entry = catalog.lookup("7. Project Scope Document");
        assert_eq!(entry.name, "Project Scope Document");
        assert_eq!(entry.costs[0].amount, "2,993.60 USD");
    }

    #[test]
    fn test_lookup_unknown_use_case_yields_defaults() {
        let catalog = Catalog::new("diagrams");
        let entry = catalog.lookup("Quantum Ledger Migration");
        assert!(!entry.has_costs());
        assert!(entry.diagram.is_none());
        assert_eq!(entry.calculator_url, DEFAULT_CALCULATOR_URL);
        assert!(entry.cost_table_markdown().is_empty());
    }

    #[test]
    fn test_existing_diagram_requires_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(dir.path());
        let entry = catalog.lookup("Gen AI Speech To Speech");
        assert!(entry.existing_diagram().is_none());

        std::fs::write(dir.path().join("Gen AI Speech To Speech.png"), b"png").unwrap();
        assert!(entry.existing_diagram().is_some());
    }

    #[test]
    fn test_cost_table_markdown_rows() {
        let catalog = Catalog::new("diagrams");
        let table = catalog.lookup("PoC Scope Document").cost_table_markdown();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "| amazon_bedrock | 1,000 USD | Estimate |");
        assert_eq!(lines[3], "| total | $ 3,150 | Estimate |");
    }

    #[test]
    fn test_names_lists_all_nine() {
        assert_eq!(Catalog::new("x").names().len(), 9);
    }
}
