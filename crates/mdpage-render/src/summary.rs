//! Summary (table of contents) stage.

use mdpage_model::{Entry, Group, GroupKind};

use crate::anchors::anchor;
use crate::markup::push_link;
use crate::title::{enriched_title, TitleStyle};
use crate::Context;

const GROUP_BULLET: &str = " - ";
const ENTRY_BULLET: &str = "   + ";

/// `## {title}` followed by one bullet per group and a nested bullet per entry.
pub(crate) fn render_summary(ctx: &Context<'_>, groups: &[Group], out: &mut String) {
    out.push_str("## ");
    out.push_str(&ctx.config.contents.title);
    out.push_str("\n\n");

    for group in groups {
        out.push_str(GROUP_BULLET);
        out.push_str(&group.title);
        out.push('\n');

        match group.kind {
            GroupKind::Standard => {
                for entry in &group.entries {
                    render_standard_item(ctx, entry, out);
                }
            }
            GroupKind::List => {
                let target = anchor(&group.title, ctx.anchors);
                for entry in &group.entries {
                    out.push_str(ENTRY_BULLET);
                    push_link(out, &entry.title, &target);
                    out.push('\n');
                }
            }
        }
    }

    if !groups.is_empty() {
        out.push('\n');
    }
}

fn render_standard_item(ctx: &Context<'_>, entry: &Entry, out: &mut String) {
    let label = enriched_title(entry, TitleStyle::Label);
    let text = ctx.prefixed(&label);
    let target = anchor(&enriched_title(entry, TitleStyle::Anchor), ctx.anchors);

    out.push_str(ENTRY_BULLET);
    push_link(out, &text, &target);
    out.push('\n');
}
