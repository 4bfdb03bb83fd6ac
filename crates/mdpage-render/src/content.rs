//! Content stage: one section per group, one block per entry.

use mdpage_model::{Entry, Group, GroupKind};

use crate::anchors::anchor;
use crate::markup::{push_fenced, push_fenced_lines, push_image, push_link};
use crate::title::{enriched_title, TitleStyle};
use crate::Context;

const AUTHOR_SEPARATOR: &str = " — ";
const SOURCE_SEPARATOR: &str = " / ";

pub(crate) fn render_group(ctx: &Context<'_>, group: &Group, out: &mut String) {
    out.push_str("## ");
    out.push_str(&group.title);
    out.push_str("\n\n");

    match group.kind {
        GroupKind::Standard => {
            for entry in &group.entries {
                render_entry(ctx, entry, out);
            }
        }
        GroupKind::List => {
            for entry in &group.entries {
                render_list_item(entry, out);
            }
            if !group.entries.is_empty() {
                out.push('\n');
            }
        }
    }
}

fn render_list_item(entry: &Entry, out: &mut String) {
    out.push_str("- ");
    if entry.url.is_empty() {
        out.push_str(&entry.title);
    } else {
        push_link(out, &entry.title, &entry.url);
    }
    out.push('\n');
}

/// Heading, description line, then the non-empty sections in fixed order.
/// Every block is followed by exactly one blank line.
pub(crate) fn render_entry(ctx: &Context<'_>, entry: &Entry, out: &mut String) {
    render_heading(ctx, entry, out);
    render_description(ctx, entry, out);

    if !entry.commands.is_empty() {
        push_fenced_lines(out, &entry.commands);
        out.push('\n');
    }

    if !entry.example_content.is_empty() {
        push_fenced(out, &entry.example_content_type, &entry.example_content);
        out.push('\n');
    }

    if !entry.example_output.is_empty() {
        push_label(out, &ctx.config.entry.example.title);
        push_fenced(out, "", &entry.example_output);
        out.push('\n');
    }

    if !entry.example_image_url.is_empty() {
        push_image(out, &entry.example_image_url);
        out.push('\n');
    }

    if !entry.requirements.is_empty() {
        push_label(out, &ctx.config.entry.requirements.title);
        push_fenced_lines(out, &entry.requirements);
        out.push('\n');
    }
}

fn render_heading(ctx: &Context<'_>, entry: &Entry, out: &mut String) {
    out.push_str("### ");
    let back = &ctx.config.entry.back;
    if !back.is_empty() {
        push_link(out, back, &anchor(&ctx.config.contents.title, ctx.anchors));
    }
    out.push_str(&ctx.prefixed(&enriched_title(entry, TitleStyle::Linked)));
    out.push_str("\n\n");
}

fn render_description(ctx: &Context<'_>, entry: &Entry, out: &mut String) {
    if entry.description.is_empty() && entry.author.is_empty() && entry.source.is_empty() {
        return;
    }

    out.push_str(&entry.description);
    if !entry.author.is_empty() {
        out.push_str(AUTHOR_SEPARATOR);
        out.push_str(&ctx.author.render(&entry.author));
    }
    if !entry.source.is_empty() {
        out.push_str(SOURCE_SEPARATOR);
        out.push_str(&entry.source);
    }
    out.push_str("\n\n");
}

fn push_label(out: &mut String, label: &str) {
    if !label.is_empty() {
        out.push_str(label);
        out.push('\n');
    }
}
