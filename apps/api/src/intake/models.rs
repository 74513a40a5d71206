//! Form Intake: the structured answers a user fills in before generation.
//!
//! Every field is defaulted so partial JSON bodies deserialize cleanly; the
//! defaults mirror the pre-selected values of the intake form.

use serde::{Deserialize, Serialize};

/// One row of a stakeholder contact table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub title: String,
    pub email: String,
}

impl Contact {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.title.trim().is_empty() && self.email.trim().is_empty()
    }
}

/// The four contact tables of section 2.2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stakeholders {
    pub partner: Vec<Contact>,
    pub customer: Vec<Contact>,
    pub aws: Vec<Contact>,
    pub escalation: Vec<Contact>,
}

impl Stakeholders {
    /// Table label paired with its rows, in prompt order.
    pub fn tables(&self) -> [(&'static str, &[Contact]); 4] {
        [
            ("Partner Executive Sponsor", self.partner.as_slice()),
            ("Customer Executive Sponsor", self.customer.as_slice()),
            ("AWS Executive Sponsor", self.aws.as_slice()),
            ("Project Escalation Contacts", self.escalation.as_slice()),
        ]
    }

    /// Drops rows where every field is blank (left over from an editable grid).
    pub fn prune_blank_rows(&mut self) {
        for table in [
            &mut self.partner,
            &mut self.customer,
            &mut self.aws,
            &mut self.escalation,
        ] {
            table.retain(|c| !c.is_blank());
        }
    }
}

/// Characteristics of one kind of input data (images, PDFs, audio...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataProfile {
    pub kind: String,
    pub avg_size: String,
    pub formats: String,
    pub volume: String,
}

impl DataProfile {
    /// Profile with the form's placeholder values for `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let formats = if kind.eq_ignore_ascii_case("images") {
            "JPEG, PNG"
        } else {
            "PDF"
        };
        Self {
            kind,
            avg_size: "2 MB".to_string(),
            formats: formats.to_string(),
            volume: "100/day".to_string(),
        }
    }
}

impl Default for DataProfile {
    fn default() -> Self {
        Self::new("Text")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeRecord {
    /// Catalog key; menu labels like `"6. Gen AI for SOP POC SOW"` are accepted.
    pub use_case: String,
    pub engagement_type: String,
    pub industry: String,
    pub business_objective: String,
    pub outcomes: Vec<String>,
    pub stakeholders: Stakeholders,
    pub dependencies: Vec<String>,
    pub data_profiles: Vec<DataProfile>,
    pub assumptions: Vec<String>,
    pub custom_assumption: String,
    pub success_dimensions: Vec<String>,
    pub validation_strategy: String,
    pub compute: Vec<String>,
    pub ai_services: Vec<String>,
    pub storage: Vec<String>,
    pub ui_layer: String,
    pub performance: String,
    pub security: Vec<String>,
    pub cost_ownership: String,
    pub deliverables: Vec<String>,
    pub next_steps: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for IntakeRecord {
    fn default() -> Self {
        Self {
            use_case: "L1 Support Bot POC SOW".to_string(),
            engagement_type: "Proof of Concept (PoC)".to_string(),
            industry: "Retail / E-commerce".to_string(),
            business_objective: String::new(),
            outcomes: strings(&["Improve accuracy / quality", "Cost reduction"]),
            stakeholders: Stakeholders::default(),
            dependencies: Vec::new(),
            data_profiles: Vec::new(),
            assumptions: Vec::new(),
            custom_assumption: String::new(),
            success_dimensions: strings(&["Accuracy", "Cost efficiency"]),
            validation_strategy: "Yes – customer validation required".to_string(),
            compute: strings(&["AWS Lambda", "Step Functions"]),
            ai_services: strings(&["Amazon Bedrock"]),
            storage: strings(&["Amazon S3"]),
            ui_layer: "Streamlit on S3".to_string(),
            performance: "Near real-time".to_string(),
            security: strings(&["IAM-based access", "VPC deployment"]),
            cost_ownership: "Funded by Customer".to_string(),
            deliverables: strings(&["Working demo", "SOW document"]),
            next_steps: strings(&["Production proposal", "Scaling roadmap"]),
        }
    }
}

impl IntakeRecord {
    /// Rejects records the prompt cannot be built from.
    pub fn validate(&self) -> Result<(), String> {
        if self.use_case.trim().is_empty() {
            return Err("use_case must not be empty".to_string());
        }
        if self.industry.trim().is_empty() {
            return Err("industry must not be empty".to_string());
        }
        if let Some(p) = self.data_profiles.iter().find(|p| p.kind.trim().is_empty()) {
            return Err(format!(
                "data profile with formats '{}' is missing its kind",
                p.formats
            ));
        }
        Ok(())
    }

    /// Assumption list including the free-text entry, if any.
    pub fn all_assumptions(&self) -> Vec<&str> {
        let custom = self.custom_assumption.trim();
        self.assumptions
            .iter()
            .map(String::as_str)
            .chain((!custom.is_empty()).then_some(custom))
            .collect()
    }
}
