// Document pipeline: one interpreter, two renderers.
// Generated text → interpret() → Vec<Block> → { render_preview(), render_docx() }.
// Renderers are pure over the block list; anything read from disk is loaded by the caller.

pub mod blocks;
pub mod export;
pub mod handlers;
pub mod interpreter;
pub mod preview;
pub mod sections;
pub mod timeline;

use crate::catalog::UseCaseRef;
use crate::document::timeline::TimelineTable;

/// Reference data both renderers need besides the blocks themselves.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub use_case: &'a UseCaseRef,
    pub timeline: &'a TimelineTable,
}
