//! Page file decoding and content resolution.
//!
//! A page file is YAML. Header and example fields name files on disk;
//! the loader reads them so the renderer only ever sees text.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mdpage_config::ContentSettings;
use mdpage_model::{ContentsConfig, Entry, EntryConfig, Group, GroupKind, Page, RenderConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading a page file or the files it references.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse page {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{location}: remote content is not supported ({url})")]
    RemoteContent { location: String, url: String },
}

/// Reads page files, resolving references relative to a base directory.
pub struct PageLoader<'a> {
    content: &'a ContentSettings,
    base_dir: Option<PathBuf>,
}

impl<'a> PageLoader<'a> {
    pub fn new(content: &'a ContentSettings) -> Self {
        PageLoader {
            content,
            base_dir: None,
        }
    }

    /// Resolve referenced files against `dir` instead of the page file's directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn load(&self, path: &Path) -> Result<Page, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        self.parse(&contents, path, &base_dir)
    }

    /// Decode `yaml` (read from `origin`) and resolve its references under `base_dir`.
    pub fn parse(&self, yaml: &str, origin: &Path, base_dir: &Path) -> Result<Page, LoadError> {
        let raw: RawPage = serde_yaml::from_str(yaml).map_err(|source| LoadError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        let resolver = Resolver {
            content: self.content,
            base_dir,
        };
        let page = resolver.resolve_page(raw)?;
        debug!(
            page = %origin.display(),
            groups = page.groups.len(),
            entries = page.entry_count(),
            "loaded page"
        );
        Ok(page)
    }
}

struct Resolver<'a> {
    content: &'a ContentSettings,
    base_dir: &'a Path,
}

impl Resolver<'_> {
    fn resolve_page(&self, raw: RawPage) -> Result<Page, LoadError> {
        let header = self.read_optional(&raw.header, "header")?;

        let mut groups = Vec::with_capacity(raw.groups.len());
        for (group_idx, group) in raw.groups.into_iter().enumerate() {
            let mut entries = Vec::with_capacity(group.entries.len());
            for (entry_idx, entry) in group.entries.into_iter().enumerate() {
                let location = format!("group({group_idx}).entry({entry_idx})");
                entries.push(self.resolve_entry(entry, &location)?);
            }
            groups.push(Group {
                title: group.title,
                kind: group.kind,
                entries,
            });
        }

        Ok(Page {
            header,
            groups,
            config: RenderConfig {
                contents: raw.contents,
                entry: raw.entry,
            },
        })
    }

    fn resolve_entry(&self, raw: RawEntry, location: &str) -> Result<Entry, LoadError> {
        let example_content = self.read_optional(
            &raw.example_content_url,
            &format!("{location}.example_content_url"),
        )?;
        let example_output = self.read_optional(
            &raw.example_output_url,
            &format!("{location}.example_output_url"),
        )?;

        let example_content_type = match raw.example_content_type {
            Some(tag) if !tag.is_empty() => tag,
            _ if raw.example_content_url.is_empty() => String::new(),
            _ => self
                .content
                .language_for(Path::new(&raw.example_content_url))
                .unwrap_or_default()
                .to_owned(),
        };

        Ok(Entry {
            title: raw.title,
            name: raw.name,
            url: raw.url,
            description: raw.description,
            author: raw.author,
            source: raw.source,
            requirements: raw.requirements,
            commands: raw.commands,
            example_content,
            example_content_type,
            example_output,
            example_image_url: raw.example_image_url,
        })
    }

    /// Empty reference means "absent"; otherwise the file's text, unmodified.
    fn read_optional(&self, reference: &str, location: &str) -> Result<String, LoadError> {
        if reference.is_empty() {
            return Ok(String::new());
        }
        if is_remote(reference) {
            return Err(LoadError::RemoteContent {
                location: location.to_owned(),
                url: reference.to_owned(),
            });
        }

        let path = self.base_dir.join(reference);
        debug!(path = %path.display(), "reading {}", location);
        fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPage {
    #[serde(default)]
    header: String,
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    contents: ContentsConfig,
    #[serde(default)]
    entry: EntryConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    #[serde(default)]
    title: String,
    #[serde(default, rename = "type")]
    kind: GroupKind,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawEntry {
    title: String,
    name: String,
    url: String,
    description: String,
    author: String,
    source: String,
    example_image_url: String,
    example_content_url: String,
    example_content_type: Option<String>,
    example_output_url: String,
    requirements: Vec<String>,
    commands: Vec<String>,
}
