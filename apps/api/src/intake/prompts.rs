// Prompt template for SOW generation.
// Placeholders are `{name}`; the assembler fills them in a single pass.

/// SOW generation prompt. Sections 1-5 only; the model is told to stop before 6.
pub const SOW_PROMPT_TEMPLATE: &str = r#"You are a professional enterprise AWS Solutions Architect. Generate a formal enterprise SOW for {use_case} in the {industry} industry.

STRICT MANDATE: Use standard Markdown headings (# for Main, ## for Sub, ### for Sub-Sub).
Follow this sequential flow exactly: Main Heading -> Sub-heading -> Paragraph/Table.

# 1 TABLE OF CONTENTS
(List sections 1 to 10)

# 2 PROJECT OVERVIEW
## 2.1 OBJECTIVE
(Rewrite the following business objective formally: {business_objective})

### Key Outcomes Expected
{outcomes}

## 2.2 PROJECT SPONSOR(S) / STAKEHOLDER(S) / PROJECT TEAM
{stakeholder_tables}

# 2.3 ASSUMPTIONS & DEPENDENCIES
## CUSTOMER DEPENDENCIES
{dependencies}
## DATA CHARACTERISTICS
{data_profiles}
## KEY ASSUMPTIONS
{assumptions}

# 2.4 POC SUCCESS CRITERIA
## SUCCESS DIMENSIONS
KPIs for {success_dimensions}
## VALIDATION STRATEGY
{validation_strategy}

Context for Scope of Work generation:
- Use case: {use_case}
- Industry: {industry}
- Engagement type: {engagement_type}
- AI services: {ai_services}
- Data types: {data_types}
- Compute: {compute}
- Storage: {storage}
- UI layer: {ui_layer}
- Performance profile: {performance}
- Security controls: {security}

# 3 SCOPE OF WORK – TECHNICAL PROJECT PLAN

Generate enterprise-grade functional content specific to the selected use case.

Follow this exact structure and order. Do NOT rename or reorder headings.

## A. Infrastructure Setup
Describe cloud environment setup, IAM, networking, security baseline, and foundational AWS services.

## B. Core Workflows
Describe the end-to-end AI workflows relevant to the use case, including ingestion, preprocessing, inference, and orchestration.

## C. Backend Components
Describe backend services, LLM integration, vector databases, APIs, event handling, and system orchestration.

## D. UI / Integration Layer
Describe UI, dashboards, APIs, and system integrations if applicable.

## E. Testing and Feedback
Describe testing strategy, validation approach, stakeholder reviews, and iterative improvements.

After completing ALL narrative content above, generate a section titled exactly:

### Development Timelines

Immediately below this heading, generate a Markdown table using these EXACT rules:
1. HEADERS: {timeline_header}
2. ROWS: Include exactly five rows corresponding to:
   - A. Infrastructure Setup
   - B. Core Workflows
   - C. Backend Components
   - D. UI / Integration Layer
   - E. Testing and Feedback
3. DATA: Use '✔' to indicate activity. Map the tasks from this planned schedule:
{timeline_table}
4. NO EXTRA TEXT: Do not add any text before or after the table.

# 4 SOLUTION ARCHITECTURE
Describe the target architecture for {use_case} using the compute, AI and storage services listed above.

# 5 RESOURCES AND COST ESTIMATES
Cost ownership: {cost_ownership}
{cost_table}
Deliverables: {deliverables}
Next steps: {next_steps}

STRICT STOP RULE:
Do NOT generate any section numbered 6, 7, 8, 9, or 10.
End the document immediately after section #5 RESOURCES AND COST ESTIMATES.
"#;
