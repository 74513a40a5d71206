//! Prompt Assembler: turns an intake record into one instruction string.

use crate::catalog::UseCaseRef;
use crate::document::timeline::TimelineTable;
use crate::intake::models::{Contact, DataProfile, IntakeRecord};
use crate::intake::prompts::SOW_PROMPT_TEMPLATE;

const NONE_SPECIFIED: &str = "None specified";

/// Builds the generation prompt for `intake` against the resolved catalog entry.
/// The timeline is passed as planning input only; the rendered document always
/// shows the user's grid in place of whatever table the model writes.
pub fn assemble_prompt(intake: &IntakeRecord, use_case: &UseCaseRef, timeline: &TimelineTable) -> String {
    let stakeholder_tables = intake
        .stakeholders
        .tables()
        .iter()
        .map(|(label, rows)| format!("### {label}\n{}", contact_table(rows)))
        .collect::<Vec<_>>()
        .join("\n");

    let data_types: Vec<&str> = intake.data_profiles.iter().map(|p| p.kind.as_str()).collect();
    let timeline_header = format!("| {} |", timeline.columns().join(" | "));
    let objective = if intake.business_objective.trim().is_empty() {
        NONE_SPECIFIED
    } else {
        intake.business_objective.trim()
    };

    fill(
        SOW_PROMPT_TEMPLATE,
        &[
            ("use_case", use_case.name.clone()),
            ("industry", intake.industry.trim().to_string()),
            ("engagement_type", intake.engagement_type.clone()),
            ("business_objective", objective.to_string()),
            ("outcomes", list(&intake.outcomes)),
            ("stakeholder_tables", stakeholder_tables),
            ("dependencies", list(&intake.dependencies)),
            ("data_profiles", data_profile_table(&intake.data_profiles)),
            ("assumptions", list(&intake.all_assumptions())),
            ("success_dimensions", list(&intake.success_dimensions)),
            ("validation_strategy", intake.validation_strategy.clone()),
            ("ai_services", list(&intake.ai_services)),
            ("data_types", list(&data_types)),
            ("compute", list(&intake.compute)),
            ("storage", list(&intake.storage)),
            ("ui_layer", intake.ui_layer.clone()),
            ("performance", intake.performance.clone()),
            ("security", list(&intake.security)),
            ("timeline_header", timeline_header),
            ("timeline_table", timeline.to_markdown()),
            ("cost_ownership", intake.cost_ownership.clone()),
            ("cost_table", use_case.cost_table_markdown()),
            ("deliverables", list(&intake.deliverables)),
            ("next_steps", list(&intake.next_steps)),
        ],
    )
}

/// Replaces `{key}` placeholders in one pass. Substituted values are never
/// rescanned, so user text containing braces is passed through untouched.
/// Unknown placeholders are left as written.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .map(|close| (&after[..close], close))
            .and_then(|(key, close)| {
                values
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| (v, close))
            });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn list<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        NONE_SPECIFIED.to_string()
    } else {
        items.join(", ")
    }
}

/// Pipes inside values would split cells when the table is read back.
fn cell(value: &str) -> String {
    value.trim().replace('|', "/")
}

fn contact_table(rows: &[Contact]) -> String {
    let mut out = String::from("| Name | Title | Email |\n| --- | --- | --- |\n");
    for c in rows {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            cell(&c.name),
            cell(&c.title),
            cell(&c.email)
        ));
    }
    out
}

fn data_profile_table(profiles: &[DataProfile]) -> String {
    if profiles.is_empty() {
        return NONE_SPECIFIED.to_string();
    }
    let mut out =
        String::from("| Data Type | Avg Size | Formats | Volume |\n| --- | --- | --- | --- |\n");
    for p in profiles {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            cell(&p.kind),
            cell(&p.avg_size),
            cell(&p.formats),
            cell(&p.volume)
        ));
    }
    out
}
