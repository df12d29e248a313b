use crate::document::Block;
use serde::Serialize;

/// One navigation menu entry pointing at a block section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub anchor: String,
    pub label: String,
}

/// Build the navigation menu in content order.
///
/// Blocks without a label are skipped (they still render in place). Labels
/// are not deduplicated; anchors are unique because block ids are.
pub fn build_navigation(blocks: &[Block]) -> Vec<NavEntry> {
    blocks
        .iter()
        .filter_map(|block| {
            block.nav_label().map(|label| NavEntry {
                anchor: block.id.clone(),
                label: label.to_string(),
            })
        })
        .collect()
}
