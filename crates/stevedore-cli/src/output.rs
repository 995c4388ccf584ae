//! Formatted output helpers for CLI commands.

use stevedore_manifest::{BlockId, Manifest};

/// Horizontal rule under command titles.
pub const RULE: &str = "\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}";

/// Formats one summary row: position, name, count, and an override marker.
#[must_use]
pub fn format_block_row(id: BlockId, count: usize, replaced: bool) -> String {
    let marker = if replaced { "  (overridden)" } else { "" };
    format!(
        "{}. {:<12}{count:>3} instruction(s){marker}",
        id.position() + 1,
        id.name()
    )
}

/// One row per block, in output order.
#[must_use]
pub fn block_summary(manifest: &Manifest) -> Vec<String> {
    BlockId::ALL
        .into_iter()
        .map(|id| {
            format_block_row(
                id,
                manifest.block(id).count(),
                manifest.replaced_blocks().contains(&id),
            )
        })
        .collect()
}
