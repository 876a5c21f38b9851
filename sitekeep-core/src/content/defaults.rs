use super::document::{Block, SiteContent};

/// Built-in document used when neither store has content.
///
/// Never persisted on its own; only an explicit save writes it anywhere.
pub fn default_content() -> SiteContent {
    SiteContent::new(vec![
        Block::new("hero", "hero", 1)
            .with_title("Welcome")
            .with_field("subtitle", "Diagnostics and repair of vehicle electronics"),
        Block::new("features", "features", 2).with_title("Why choose us"),
        Block::new("modules", "modules", 3).with_title("Modules we work with"),
        Block::new("can-module", "module", 4).with_title("CAN module"),
        Block::new("analog-module", "module", 5).with_title("Analog module"),
        Block::new("ops-module", "module", 6).with_title("OPS module"),
        Block::new("videos", "videos", 50).with_title("Videos"),
        Block::new("contacts", "contacts", 51).with_title("Contacts"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::normalize_block_order;

    #[test]
    fn test_default_content_is_already_normalized() {
        let content = default_content();
        assert_eq!(normalize_block_order(&content), content);
    }
}
