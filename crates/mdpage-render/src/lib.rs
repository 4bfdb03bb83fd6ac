//! Markdown renderer for mdpage documents.
//!
//! Rendering is a single pass over an already-resolved [`Page`]: the header
//! is copied verbatim, then the summary (table of contents) and one content
//! section per group are appended. The renderer performs no I/O and never
//! fails; empty optional fields simply produce no output.

use std::io;

use mdpage_model::{Page, RenderConfig};

pub mod anchors;
pub mod author;
mod content;
pub mod markup;
mod summary;
pub mod title;

pub use anchors::{
    anchor, find_duplicate_anchors, slugify, AnchorOwner, AnchorStyle, DuplicateAnchor,
};
pub use author::{AuthorRenderer, GitHubAuthor, PlainAuthor};
pub use title::{enriched_title, TitleStyle};

/// Rough output size of a single entry block, used to pre-size the buffer.
const ENTRY_SIZE_ESTIMATE: usize = 640;

/// Renders pages with a fixed author strategy and anchor alphabet.
#[derive(Clone, Copy)]
pub struct PageRenderer<'a> {
    author: &'a dyn AuthorRenderer,
    anchors: AnchorStyle,
}

impl<'a> PageRenderer<'a> {
    pub fn new(author: &'a dyn AuthorRenderer) -> Self {
        PageRenderer {
            author,
            anchors: AnchorStyle::default(),
        }
    }

    pub fn with_anchor_style(mut self, anchors: AnchorStyle) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn anchor_style(&self) -> AnchorStyle {
        self.anchors
    }

    /// Render using the labels stored on the page itself.
    pub fn render_page(&self, page: &Page) -> String {
        self.render(page, &page.config)
    }

    /// Render `page` with explicit section labels.
    pub fn render(&self, page: &Page, config: &RenderConfig) -> String {
        let mut out = String::with_capacity(estimate_size(page));
        let ctx = Context {
            config,
            author: self.author,
            anchors: self.anchors,
        };

        render_header(&page.header, &mut out);
        summary::render_summary(&ctx, &page.groups, &mut out);
        for group in &page.groups {
            content::render_group(&ctx, group, &mut out);
        }
        out
    }

    /// Render into any byte sink.
    pub fn render_to<W: io::Write>(
        &self,
        page: &Page,
        config: &RenderConfig,
        mut sink: W,
    ) -> io::Result<()> {
        sink.write_all(self.render(page, config).as_bytes())?;
        sink.flush()
    }
}

/// Shared state of one render call.
pub(crate) struct Context<'a> {
    pub(crate) config: &'a RenderConfig,
    pub(crate) author: &'a dyn AuthorRenderer,
    pub(crate) anchors: AnchorStyle,
}

impl Context<'_> {
    /// `{prefix} {text}`, or `text` alone when no prefix is configured.
    pub(crate) fn prefixed(&self, text: &str) -> String {
        let prefix = &self.config.entry.title_prefix;
        if prefix.is_empty() {
            text.to_owned()
        } else {
            format!("{prefix} {text}")
        }
    }
}

fn render_header(header: &str, out: &mut String) {
    if header.is_empty() {
        return;
    }
    out.push_str(header);
    if !header.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
}

fn estimate_size(page: &Page) -> usize {
    page.header.len() + (page.groups.len() + page.entry_count()) * ENTRY_SIZE_ESTIMATE
}
