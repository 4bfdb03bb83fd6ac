use std::borrow::Cow;

use mdpage_model::Entry;

use crate::markup::link;

/// Rendering context of an entry title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleStyle {
    /// Content heading: `name` links to `url` when one is set.
    Linked,
    /// Visible summary link text: plain `name`, no markup.
    Label,
    /// Input of the anchor slug: `name` always as inline code, never as a link.
    Anchor,
}

/// Title optionally augmented with the entry's secondary name.
pub fn enriched_title(entry: &Entry, style: TitleStyle) -> Cow<'_, str> {
    if !entry.has_name() {
        return Cow::Borrowed(&entry.title);
    }

    let name = match style {
        TitleStyle::Linked if !entry.url.is_empty() => link(&entry.name, &entry.url),
        TitleStyle::Linked | TitleStyle::Anchor => format!("`{}`", entry.name),
        TitleStyle::Label => entry.name.clone(),
    };
    Cow::Owned(format!("{} with {}", entry.title, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, url: &str) -> Entry {
        Entry {
            name: name.into(),
            url: url.into(),
            ..Entry::new("Check dependencies")
        }
    }

    #[test]
    fn unnamed_entry_keeps_title_in_every_style() {
        let entry = Entry {
            url: "http://x".into(),
            ..Entry::new("Plain title")
        };
        for style in [TitleStyle::Linked, TitleStyle::Label, TitleStyle::Anchor] {
            assert_eq!(enriched_title(&entry, style), "Plain title");
        }
    }

    #[test]
    fn name_without_url_renders_as_code() {
        let entry = named("foo", "");
        assert_eq!(
            enriched_title(&entry, TitleStyle::Linked),
            "Check dependencies with `foo`"
        );
        assert_eq!(
            enriched_title(&entry, TitleStyle::Anchor),
            "Check dependencies with `foo`"
        );
    }

    #[test]
    fn name_with_url_links_only_in_content() {
        let entry = named("foo", "http://x");
        assert_eq!(
            enriched_title(&entry, TitleStyle::Linked),
            "Check dependencies with [foo](http://x)"
        );
        assert_eq!(
            enriched_title(&entry, TitleStyle::Anchor),
            "Check dependencies with `foo`"
        );
        assert_eq!(
            enriched_title(&entry, TitleStyle::Label),
            "Check dependencies with foo"
        );
    }
}
