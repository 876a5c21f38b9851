//! Deterministic block ordering.
//!
//! Loaded content is passed through [`normalize_block_order`] before it is
//! handed to callers, so the well-known sections always render in the same
//! place no matter what order values an editor stored.

use super::document::{Block, SiteContent};

/// Type tag for user-created blocks.
pub const CUSTOM_TYPE: &str = "custom";

/// Sections pinned to the top of the page.
const LEADING_BLOCKS: [(&str, i64); 6] = [
    ("hero", 1),
    ("features", 2),
    ("modules", 3),
    ("can-module", 4),
    ("analog-module", 5),
    ("ops-module", 6),
];

/// Sections pinned to the bottom of the page.
const TRAILING_BLOCKS: [(&str, i64); 2] = [("videos", 50), ("contacts", 51)];

/// Titles containing either spelling mark the ABS section.
const MARKER_UPPER: &str = "АБС";
const MARKER_LOWER: &str = "абс";

/// First order value after the leading sections.
const CUSTOM_BASE_ORDER: i64 = 7;

/// Returns a copy of `content` with every block's `order` rewritten.
///
/// Rules, first match wins:
/// 1. leading section ids get 1..=6
/// 2. a marker title gets order 7 and type `custom`
/// 3. a `custom` block gets `7 + i`, `i` being its position among the
///    custom and marker-titled blocks of the input
/// 4. `videos` and `contacts` get 50 and 51
/// 5. anything else keeps its order
///
/// Rule 2 makes marker-titled blocks custom, so they hold a position in rule
/// 3 on every pass.
pub fn normalize_block_order(content: &SiteContent) -> SiteContent {
    let custom_ids: Vec<&str> = content
        .blocks
        .iter()
        .filter(|b| b.is_kind(CUSTOM_TYPE) || has_marker(b))
        .map(|b| b.id.as_str())
        .collect();

    let blocks: Vec<Block> = content
        .blocks
        .iter()
        .map(|block| reorder(block, &custom_ids))
        .collect();

    tracing::trace!(
        blocks = ?blocks.iter().map(|b| (b.id.as_str(), b.order.clone())).collect::<Vec<_>>(),
        "normalized block order"
    );

    SiteContent {
        blocks,
        extra: content.extra.clone(),
    }
}

fn reorder(block: &Block, custom_ids: &[&str]) -> Block {
    let mut block = block.clone();

    if let Some(order) = fixed_order(&LEADING_BLOCKS, &block.id) {
        block.set_order(order);
    } else if has_marker(&block) {
        block.set_order(CUSTOM_BASE_ORDER);
        block.kind = Some(CUSTOM_TYPE.to_string());
    } else if block.is_kind(CUSTOM_TYPE) {
        let index = custom_ids
            .iter()
            .position(|id| *id == block.id)
            .unwrap_or_default();
        block.set_order(CUSTOM_BASE_ORDER + index as i64);
    } else if let Some(order) = fixed_order(&TRAILING_BLOCKS, &block.id) {
        block.set_order(order);
    }

    block
}

fn fixed_order(table: &[(&str, i64)], id: &str) -> Option<i64> {
    table
        .iter()
        .find(|(fixed_id, _)| *fixed_id == id)
        .map(|(_, order)| *order)
}

fn has_marker(block: &Block) -> bool {
    block
        .title
        .as_deref()
        .is_some_and(|t| t.contains(MARKER_UPPER) || t.contains(MARKER_LOWER))
}
