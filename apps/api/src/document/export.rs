//! Document Renderer: builds the downloadable `.docx`.
//!
//! Layout: cover page (logos, title, date), a table-of-contents field, then one
//! entry per block. The model's own table-of-contents listing is replaced by
//! the field. Images that fail to decode are skipped with a warning; the
//! document is always produced.

use std::io::Cursor;

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::NaiveDate;
use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, Hyperlink, HyperlinkType, IndentLevel,
    Level, LevelJc, LevelText, NumberFormat, Numbering, NumberingId, Paragraph, Pic, Run,
    RunFonts, Shading, SpecialIndentType, Start, Style, StyleType, Table, TableCell,
    TableOfContents, TableRow,
};
use image::GenericImageView;
use tracing::warn;

use crate::catalog::{
    Catalog, UseCaseRef, ADVANCED_TIER_LOGO, PARTNER_LOGO, PARTNER_NETWORK_LOGO,
};
use crate::document::blocks::{Block, RichText, Span, TableBlock};
use crate::document::sections::TABLE_OF_CONTENTS;
use crate::document::RenderContext;

const FONT: &str = "Times New Roman";
const BLACK: &str = "000000";
const EMU_PER_INCH: f64 = 914_400.0;
const HEADER_SHADE: &str = "D9E2F3";
const MARK_SHADE: &str = "C6E0B4";
const LIST_BULLET_STYLE: &str = "ListBullet";
const BULLET_NUMBERING: usize = 2;
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Cover-page inputs.
#[derive(Debug, Clone)]
pub struct CoverPage<'a> {
    pub title: &'a str,
    pub date: NaiveDate,
}

/// Image bytes the export embeds, loaded ahead of rendering.
#[derive(Debug, Clone, Default)]
pub struct ExportAssets {
    pub customer_logo: Option<Bytes>,
    pub partner_network_logo: Option<Vec<u8>>,
    pub partner_logo: Option<Vec<u8>>,
    pub advanced_tier_logo: Option<Vec<u8>>,
    pub diagram: Option<Vec<u8>>,
}

impl ExportAssets {
    /// Reads logos and the use-case diagram from the assets directory.
    /// Missing or unreadable files are simply left out.
    pub async fn load(catalog: &Catalog, use_case: &UseCaseRef, customer_logo: Option<Bytes>) -> Self {
        async fn read(path: Option<std::path::PathBuf>) -> Option<Vec<u8>> {
            let path = path?;
            match tokio::fs::read(&path).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!("Skipping unreadable asset {}: {e}", path.display());
                    None
                }
            }
        }

        Self {
            customer_logo,
            partner_network_logo: read(catalog.logo(PARTNER_NETWORK_LOGO)).await,
            partner_logo: read(catalog.logo(PARTNER_LOGO)).await,
            advanced_tier_logo: read(catalog.logo(ADVANCED_TIER_LOGO)).await,
            diagram: read(use_case.existing_diagram().map(|p| p.to_path_buf())).await,
        }
    }
}

/// Download filename: `SOW_<name with underscores>.docx`. Anything other than
/// ASCII letters, digits, `-` and `_` becomes `_` so the name is always a
/// valid quoted header value.
pub fn export_file_name(use_case_name: &str) -> String {
    let stem: String = use_case_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("SOW_{stem}.docx")
}

pub fn content_type() -> &'static str {
    DOCX_MIME
}

/// Renders the block list into packed `.docx` bytes.
pub fn render_docx(
    blocks: &[Block],
    ctx: &RenderContext,
    cover: &CoverPage,
    assets: &ExportAssets,
) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    build_docx(blocks, ctx, cover, assets)
        .build()
        .pack(&mut buf)
        .context("Failed to pack exported document")?;
    Ok(buf.into_inner())
}

fn build_docx(
    blocks: &[Block],
    ctx: &RenderContext,
    cover: &CoverPage,
    assets: &ExportAssets,
) -> Docx {
    let mut docx = with_bullets(with_styles(Docx::new()));
    docx = add_cover_page(docx, cover, assets);

    let has_toc_section = blocks.iter().any(is_toc_heading);
    if !has_toc_section {
        docx = docx
            .add_table_of_contents(toc())
            .add_paragraph(page_break());
    }

    for block in blocks_for_export(blocks) {
        docx = match block {
            Block::Heading { level, text, .. } => {
                let docx = docx.add_paragraph(heading(*level, text));
                if is_toc_heading(block) {
                    docx.add_table_of_contents(toc())
                } else {
                    docx
                }
            }
            Block::Table(table) => docx.add_table(grid_table(table, ctx)),
            Block::ListItem(text) => docx.add_paragraph(bullet(text, ctx)),
            Block::Paragraph { text, emphasis } => {
                docx.add_paragraph(rich_paragraph(text, ctx, *emphasis))
            }
            Block::TimelineMarker => docx.add_table(timeline_table(ctx)),
            Block::ImageMarker => add_architecture(docx, ctx, assets),
            Block::CostTableMarker => add_cost_table(docx, ctx),
            Block::PageBreak => docx.add_paragraph(page_break()),
        };
    }
    docx
}

/// Drops the model's own listing between the table-of-contents heading and the
/// page break that closes it. The export replaces it with a TOC field. Without
/// a closing page break every block is kept.
fn blocks_for_export(blocks: &[Block]) -> Vec<&Block> {
    let listing = blocks.iter().position(is_toc_heading).and_then(|toc| {
        blocks[toc + 1..]
            .iter()
            .position(|b| *b == Block::PageBreak)
            .map(|offset| toc + 1..toc + 1 + offset)
    });
    blocks
        .iter()
        .enumerate()
        .filter(|(idx, _)| !listing.as_ref().is_some_and(|range| range.contains(idx)))
        .map(|(_, block)| block)
        .collect()
}

fn is_toc_heading(block: &Block) -> bool {
    matches!(block, Block::Heading { section: Some(id), .. } if id == TABLE_OF_CONTENTS)
}

// ────────────────────────────────────────────────────────────────────────────
// Styles and primitives
// ────────────────────────────────────────────────────────────────────────────

fn with_styles(docx: Docx) -> Docx {
    let docx = docx.add_style(
        Style::new(LIST_BULLET_STYLE, StyleType::Paragraph).name("List Bullet"),
    );
    (1..=4usize).fold(docx, |docx, level| {
        let size = match level {
            1 => 32,
            2 => 28,
            3 => 24,
            _ => 22,
        };
        docx.add_style(
            Style::new(format!("Heading{level}"), StyleType::Paragraph)
                .name(format!("Heading {level}"))
                .size(size)
                .bold()
                .color(BLACK),
        )
    })
}

/// Registers the single-level bullet list used by every list item.
fn with_bullets(docx: Docx) -> Docx {
    docx.add_abstract_numbering(
        AbstractNumbering::new(BULLET_NUMBERING).add_level(
            Level::new(
                0,
                Start::new(1),
                NumberFormat::new("bullet"),
                LevelText::new("•"),
                LevelJc::new("left"),
            )
            .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
        ),
    )
    .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
}

fn toc() -> TableOfContents {
    TableOfContents::new().heading_styles_range(1, 3)
}

fn text_run(text: &str) -> Run {
    Run::new()
        .add_text(text)
        .fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT))
        .color(BLACK)
}

fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

fn blank_lines(docx: Docx, count: usize) -> Docx {
    (0..count).fold(docx, |docx, _| docx.add_paragraph(Paragraph::new()))
}

fn heading(level: u8, text: &str) -> Paragraph {
    Paragraph::new()
        .style(&format!("Heading{}", level.clamp(1, 4)))
        .add_run(text_run(text).bold())
}

fn bullet(text: &RichText, ctx: &RenderContext) -> Paragraph {
    let item = Paragraph::new()
        .style(LIST_BULLET_STYLE)
        .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0));
    append_spans(item, text, ctx, false)
}

fn rich_paragraph(text: &RichText, ctx: &RenderContext, bold: bool) -> Paragraph {
    append_spans(Paragraph::new(), text, ctx, bold)
}

fn append_spans(p: Paragraph, text: &RichText, ctx: &RenderContext, bold: bool) -> Paragraph {
    text.spans.iter().fold(p, |p, span| match span {
        Span::Text { text } => {
            let run = text_run(text);
            p.add_run(if bold { run.bold() } else { run })
        }
        Span::CalculatorLink { text } => p.add_hyperlink(
            Hyperlink::new(&ctx.use_case.calculator_url, HyperlinkType::External)
                .add_run(text_run(text).underline("single")),
        ),
    })
}

fn header_cell(text: &str) -> TableCell {
    TableCell::new()
        .add_paragraph(Paragraph::new().add_run(text_run(text).bold()))
        .shading(Shading::new().fill(HEADER_SHADE))
}

fn grid_table(table: &TableBlock, ctx: &RenderContext) -> Table {
    let mut rows = vec![TableRow::new(
        table.header.iter().map(|h| header_cell(h)).collect(),
    )];
    rows.extend(table.fitted_rows().iter().map(|row| {
        TableRow::new(
            row.iter()
                .map(|cell| TableCell::new().add_paragraph(rich_paragraph(cell, ctx, false)))
                .collect(),
        )
    }));
    Table::new(rows)
}

fn timeline_table(ctx: &RenderContext) -> Table {
    let mut rows = vec![TableRow::new(
        ctx.timeline.columns().iter().map(|c| header_cell(c)).collect(),
    )];
    rows.extend(ctx.timeline.cell_rows().iter().map(|row| {
        TableRow::new(
            row.iter()
                .enumerate()
                .map(|(idx, cell)| {
                    let is_week = idx >= 2;
                    let mut paragraph = Paragraph::new().add_run(text_run(cell));
                    if is_week {
                        paragraph = paragraph.align(AlignmentType::Center);
                    }
                    let table_cell = TableCell::new().add_paragraph(paragraph);
                    if is_week && !cell.is_empty() {
                        table_cell.shading(Shading::new().fill(MARK_SHADE))
                    } else {
                        table_cell
                    }
                })
                .collect(),
        )
    }));
    Table::new(rows)
}

/// Scales an image to `width_in` inches, keeping its aspect ratio.
/// `None` when the bytes are not a decodable image.
fn picture(bytes: &[u8], width_in: f64) -> Option<Pic> {
    let (w, h) = match image::load_from_memory(bytes) {
        Ok(img) => img.dimensions(),
        Err(e) => {
            warn!("Skipping image that failed to decode: {e}");
            return None;
        }
    };
    if w == 0 || h == 0 {
        return None;
    }
    let width_emu = width_in * EMU_PER_INCH;
    let height_emu = width_emu * f64::from(h) / f64::from(w);
    Some(Pic::new(bytes).size(width_emu as u32, height_emu as u32))
}

fn image_paragraph(bytes: &[u8], width_in: f64) -> Option<Paragraph> {
    picture(bytes, width_in)
        .map(|pic| Paragraph::new().add_run(Run::new().add_image(pic)))
}

// ────────────────────────────────────────────────────────────────────────────
// Composite sections
// ────────────────────────────────────────────────────────────────────────────

fn add_cover_page(mut docx: Docx, cover: &CoverPage, assets: &ExportAssets) -> Docx {
    if let Some(p) = assets
        .partner_network_logo
        .as_deref()
        .and_then(|b| image_paragraph(b, 1.6))
    {
        docx = docx.add_paragraph(p);
    }
    docx = blank_lines(docx, 3);
    docx = docx
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(text_run(cover.title).bold().size(52)),
        )
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(text_run("Scope of Work Document").size(28)),
        );
    docx = blank_lines(docx, 4);

    let logos = [
        (assets.customer_logo.as_deref(), 1.8),
        (assets.partner_logo.as_deref(), 2.2),
        (assets.advanced_tier_logo.as_deref(), 1.8),
    ];
    let logo_row = logos
        .iter()
        .filter_map(|(bytes, width)| bytes.and_then(|b| picture(b, *width)))
        .fold(Paragraph::new().align(AlignmentType::Center), |p, pic| {
            p.add_run(Run::new().add_image(pic).add_text("    "))
        });
    docx = docx.add_paragraph(logo_row);

    docx = blank_lines(docx, 3);
    docx.add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(text_run(&cover.date.format("%d %B %Y").to_string()).bold()),
    )
    .add_paragraph(page_break())
}

fn add_architecture(mut docx: Docx, ctx: &RenderContext, assets: &ExportAssets) -> Docx {
    docx = docx.add_paragraph(heading(3, &ctx.use_case.name));
    if let Some(p) = assets.diagram.as_deref().and_then(|b| image_paragraph(b, 6.0)) {
        docx = docx.add_paragraph(p.align(AlignmentType::Center));
    }
    docx
}

fn add_cost_table(docx: Docx, ctx: &RenderContext) -> Docx {
    if !ctx.use_case.has_costs() {
        return docx;
    }
    let mut rows = vec![TableRow::new(vec![
        header_cell("Environment"),
        header_cell("Estimated Cost (USD)"),
    ])];
    rows.extend(ctx.use_case.costs.iter().map(|item| {
        TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(text_run(item.environment))),
            TableCell::new().add_paragraph(Paragraph::new().add_run(text_run(item.amount))),
        ])
    }));
    docx.add_paragraph(heading(4, "Cost Estimates"))
        .add_table(Table::new(rows))
        .add_paragraph(Paragraph::new())
}
