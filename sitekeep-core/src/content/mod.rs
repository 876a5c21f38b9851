//! Site content documents and the normalization applied to them on load.

mod defaults;
mod document;
mod normalize;

pub use defaults::default_content;
pub use document::{Block, ContentError, SiteContent};
pub use normalize::{normalize_block_order, CUSTOM_TYPE};
