//! Document model for mdpage.
//!
//! A [`Page`] is an ordered list of [`Group`]s, each holding ordered
//! [`Entry`] records, plus the header block and the [`RenderConfig`] that
//! labels the generated sections. Every text field is already resolved:
//! the model never refers to files. Optional text fields use the empty
//! string for "absent", so decoders can rely on `#[serde(default)]`.

use serde::{Deserialize, Serialize};

mod validate;

pub use validate::{ValidationError, ValidationErrorKind, ValidationErrors};

/// Full page contents: header, groups, and section labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(flatten)]
    pub config: RenderConfig,
}

impl Page {
    /// Number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }
}

/// Labels threaded through every render call. Never mutated by the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub contents: ContentsConfig,
    #[serde(default)]
    pub entry: EntryConfig,
}

/// Summary (table of contents) section settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsConfig {
    #[serde(default)]
    pub title: String,
}

/// Per-entry heading and sub-section labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Prepended to every entry heading, e.g. an arrow emoji.
    #[serde(default)]
    pub title_prefix: String,
    /// Label of the "back to top" link; empty disables the link.
    #[serde(default)]
    pub back: String,
    #[serde(default)]
    pub requirements: SectionLabel,
    #[serde(default)]
    pub example: SectionLabel,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLabel {
    #[serde(default)]
    pub title: String,
}

/// Named ordered collection of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: GroupKind,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Rendering variant of a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    /// Full content block per entry.
    #[default]
    #[serde(rename = "standard")]
    Standard,
    /// One compact link line per entry, no content block.
    #[serde(rename = "md-list", alias = "list")]
    List,
}

/// One documented item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    pub title: String,
    /// Secondary identifier such as a package name.
    pub name: String,
    /// Link target associated with `name` (or with the entry in list groups).
    pub url: String,
    pub description: String,
    pub author: String,
    pub source: String,
    pub requirements: Vec<String>,
    pub commands: Vec<String>,
    pub example_content: String,
    /// Fence language tag for `example_content`.
    pub example_content_type: String,
    pub example_output: String,
    pub example_image_url: String,
}

impl Entry {
    pub fn new(title: impl Into<String>) -> Self {
        Entry {
            title: title.into(),
            ..Entry::default()
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}
