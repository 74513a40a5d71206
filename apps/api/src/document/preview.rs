//! Preview Renderer: HTML markup for the on-screen visual preview.

use std::fmt::Write;

use crate::document::blocks::{Block, RichText, Span, TableBlock};
use crate::document::RenderContext;

/// URL prefix the router serves the assets directory under.
pub const DIAGRAM_ROUTE: &str = "/diagrams";

/// Renders blocks into a self-contained `<div class="sow-preview">` fragment.
pub fn render_preview(blocks: &[Block], ctx: &RenderContext) -> String {
    let mut html = String::from("<div class=\"sow-preview\">\n");
    let mut in_list = false;

    for block in blocks {
        let is_item = matches!(block, Block::ListItem(_));
        if in_list && !is_item {
            html.push_str("</ul>\n");
        }
        if is_item && !in_list {
            html.push_str("<ul>\n");
        }
        in_list = is_item;

        match block {
            Block::Heading { level, text, .. } => {
                let _ = writeln!(html, "<h{level}>{}</h{level}>", escape(text));
            }
            Block::Table(table) => push_table(&mut html, table, ctx),
            Block::ListItem(text) => {
                let _ = writeln!(html, "<li>{}</li>", rich(text, ctx));
            }
            Block::Paragraph { text, emphasis } => {
                if *emphasis {
                    let _ = writeln!(html, "<p><strong>{}</strong></p>", rich(text, ctx));
                } else {
                    let _ = writeln!(html, "<p>{}</p>", rich(text, ctx));
                }
            }
            Block::TimelineMarker => push_timeline(&mut html, ctx),
            Block::ImageMarker => push_diagram(&mut html, ctx),
            Block::CostTableMarker => push_cost_table(&mut html, ctx),
            Block::PageBreak => html.push_str("<hr class=\"page-break\">\n"),
        }
    }
    if in_list {
        html.push_str("</ul>\n");
    }

    html.push_str("</div>\n");
    html
}

fn rich(text: &RichText, ctx: &RenderContext) -> String {
    text.spans
        .iter()
        .map(|span| match span {
            Span::Text { text } => escape(text),
            Span::CalculatorLink { text } => format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                escape(&ctx.use_case.calculator_url),
                escape(text)
            ),
        })
        .collect()
}

fn push_table(html: &mut String, table: &TableBlock, ctx: &RenderContext) {
    html.push_str("<table>\n<thead><tr>");
    for cell in &table.header {
        let _ = write!(html, "<th>{}</th>", escape(cell));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in table.fitted_rows() {
        html.push_str("<tr>");
        for cell in &row {
            let _ = write!(html, "<td>{}</td>", rich(cell, ctx));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

fn push_timeline(html: &mut String, ctx: &RenderContext) {
    html.push_str("<table class=\"timeline\">\n<thead><tr>");
    for column in ctx.timeline.columns() {
        let _ = write!(html, "<th>{}</th>", escape(&column));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in ctx.timeline.cell_rows() {
        html.push_str("<tr>");
        for (idx, cell) in row.iter().enumerate() {
            if idx >= 2 && !cell.is_empty() {
                let _ = write!(html, "<td class=\"marked\">{}</td>", escape(cell));
            } else {
                let _ = write!(html, "<td>{}</td>", escape(cell));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

fn push_diagram(html: &mut String, ctx: &RenderContext) {
    let use_case = ctx.use_case;
    let _ = writeln!(html, "<h3>{}</h3>", escape(&use_case.name));
    let Some(path) = use_case.existing_diagram() else {
        return;
    };
    let Some(file_name) = path.file_name().and_then(|f| f.to_str()) else {
        return;
    };
    let _ = writeln!(
        html,
        "<figure><img src=\"{DIAGRAM_ROUTE}/{}\" alt=\"{name} Architecture\"><figcaption>{name} Architecture</figcaption></figure>",
        escape(&file_name.replace(' ', "%20")),
        name = escape(&use_case.name)
    );
}

fn push_cost_table(html: &mut String, ctx: &RenderContext) {
    if !ctx.use_case.has_costs() {
        return;
    }
    html.push_str("<h4>Cost Estimates</h4>\n<table class=\"costs\">\n");
    html.push_str("<thead><tr><th>Environment</th><th>Estimated Cost (USD)</th></tr></thead>\n<tbody>\n");
    for item in &ctx.use_case.costs {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(item.environment),
            escape(item.amount)
        );
    }
    html.push_str("</tbody>\n</table>\n");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::document::interpreter::interpret;
    use crate::document::timeline::TimelineTable;

    fn render(text: &str, use_case: &str, catalog: &Catalog) -> String {
        let use_case = catalog.lookup(use_case);
        let timeline = TimelineTable::default();
        let ctx = RenderContext {
            use_case: &use_case,
            timeline: &timeline,
        };
        render_preview(&interpret(text), &ctx)
    }

    #[test]
    fn test_estimate_link_targets_calculator() {
        let catalog = Catalog::new("diagrams");
        let html = render("Your estimate here", "L1 Support Bot POC SOW", &catalog);
        assert!(html.contains(
            "<p>Your <a href=\"https://calculator.aws/#/estimate?id=211ea64cba5a8f5dc09805f4ad1a1e598ef5238b\" target=\"_blank\">estimate</a> here</p>"
        ));
    }

    #[test]
    fn test_unknown_use_case_uses_default_calculator_and_omits_extras() {
        let catalog = Catalog::new("diagrams");
        let html = render(
            "# 4 SOLUTION ARCHITECTURE\nSee the estimate",
            "Unlisted Use Case",
            &catalog,
        );
        assert!(html.contains("<a href=\"https://calculator.aws/\" target=\"_blank\">estimate</a>"));
        assert!(!html.contains("<figure>"));
        assert!(!html.contains("Cost Estimates"));
        assert!(html.contains("<h3>Unlisted Use Case</h3>"));
    }

    #[test]
    fn test_architecture_section_includes_diagram_and_costs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gen AI for SOP POC SOW.png"), b"png").unwrap();
        let catalog = Catalog::new(dir.path());
        let html = render("# 4 SOLUTION ARCHITECTURE", "Gen AI for SOP POC SOW", &catalog);
        assert!(html.contains("src=\"/diagrams/Gen%20AI%20for%20SOP%20POC%20SOW.png\""));
        assert!(html.contains("<figcaption>Gen AI for SOP POC SOW Architecture</figcaption>"));
        assert!(html.contains("<tr><td>POC</td><td>2,110.30 USD</td></tr>"));
    }

    #[test]
    fn test_timeline_marker_renders_user_timeline() {
        let catalog = Catalog::new("diagrams");
        let html = render(
            "### Development Timelines\n| Phase | Task | Wk1 |\n|---|---|---|\n| Bogus | row | ✔ |",
            "PoC Scope Document",
            &catalog,
        );
        assert!(html.contains("<table class=\"timeline\">"));
        assert!(html.contains("<th>Wk4</th>"));
        assert!(html.contains("<td>A. Infrastructure Setup</td>"));
        assert!(!html.contains("Bogus"));
    }

    #[test]
    fn test_list_items_are_grouped() {
        let catalog = Catalog::new("diagrams");
        let html = render("- one\n- two\ntext\n- three", "x", &catalog);
        assert_eq!(html.matches("<ul>").count(), 2);
        assert_eq!(html.matches("</ul>").count(), 2);
        assert!(html.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<p>text</p>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let catalog = Catalog::new("diagrams");
        let html = render("<script>alert('x')</script> & more", "x", &catalog);
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_emphasis_and_headings() {
        let catalog = Catalog::new("diagrams");
        let html = render("## 2.2 Stakeholders\nPartner Executive Sponsor", "x", &catalog);
        assert!(html.contains("<h2>2.2 Stakeholders</h2>"));
        assert!(html.contains("<p><strong>Partner Executive Sponsor</strong></p>"));
    }
}
