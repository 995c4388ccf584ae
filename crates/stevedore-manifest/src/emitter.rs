//! Serialization of an instruction sequence to manifest text.
//!
//! Output layout: the frontend directive (when cache mounts are enabled)
//! on line 1, then the banner (when enabled), a blank line, and the
//! instructions with a blank line between blocks.

use stevedore_common::constants::HEADER_BANNER;

use crate::context::RenderContext;
use crate::instruction::TaggedInstruction;

/// Preamble policy for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Frontend named on the directive line; `None` omits the line.
    pub frontend: Option<String>,
    /// Whether the generated-file banner is emitted.
    pub header: bool,
}

impl EmitOptions {
    /// Derives the preamble policy from resolved flags.
    #[must_use]
    pub fn from_context(ctx: &RenderContext) -> Self {
        Self {
            frontend: ctx.enable_buildkit.then(|| ctx.frontend.clone()),
            header: ctx.emit_header,
        }
    }
}

/// The frontend directive line for `frontend`.
#[must_use]
pub fn directive_line(frontend: &str) -> String {
    format!("# syntax={frontend}")
}

/// Renders the full manifest text. The result always ends with a newline.
#[must_use]
pub fn emit(options: &EmitOptions, steps: &[TaggedInstruction]) -> String {
    let mut out = String::new();

    if let Some(frontend) = &options.frontend {
        out.push_str(&directive_line(frontend));
        out.push('\n');
    }
    if options.header {
        for line in HEADER_BANNER {
            out.push_str(line);
            out.push('\n');
        }
    }

    let mut previous = None;
    for step in steps {
        let starts_block = previous != Some(step.block);
        if starts_block && !out.is_empty() {
            out.push('\n');
        }
        previous = Some(step.block);
        out.push_str(&step.instruction.to_string());
        out.push('\n');
    }
    out
}
