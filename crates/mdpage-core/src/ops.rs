//! Render and check operations shared by mdpage commands.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use mdpage_config::{AuthorSettings, AuthorStyle, Config, ConfigError};
use mdpage_format::{render_report, CheckFormat, CheckReport, Finding, Severity};
use mdpage_loader::{LoadError, PageLoader};
use mdpage_model::{Page, ValidationErrors};
use mdpage_render::{
    find_duplicate_anchors, AnchorOwner, AnchorStyle, AuthorRenderer, GitHubAuthor, PageRenderer,
    PlainAuthor,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::diff::build_unified_diff;
use crate::fs::{atomic_write, read_existing};

/// Errors surfaced by render and check operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("page {} failed validation with {} error(s)", .0.page.display(), .0.error_count)]
    Invalid(CheckReport),
    #[error("{mode} mode requires an output path")]
    MissingOutput { mode: RenderMode },
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to format report: {0}")]
    Report(#[from] serde_json::Error),
}

/// What `render` does with the generated document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Write to the output path, or hand the document back for stdout.
    #[default]
    Write,
    /// Compare with the existing output file without touching it.
    Check,
    /// Like `Check`, plus a unified diff of the pending change.
    Diff,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Write => "write",
            RenderMode::Check => "check",
            RenderMode::Diff => "diff",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub page: PathBuf,
    /// Falls back to `output.path` from configuration.
    pub output: Option<PathBuf>,
    pub mode: RenderMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    /// No output path; the document is in `rendered`.
    Stdout,
    Written,
    Unchanged,
    Stale,
}

#[derive(Debug)]
pub struct RenderOutcome {
    pub status: RenderStatus,
    pub output_path: Option<PathBuf>,
    /// The generated Markdown document.
    pub document: String,
    /// Text for stdout: the document, a diff, or a status line.
    pub rendered: String,
    pub diff: Option<String>,
    pub exit_code: i32,
}

#[derive(Clone, Debug)]
pub struct CheckOptions {
    pub page: PathBuf,
    pub format: CheckFormat,
}

#[derive(Debug)]
pub struct CheckOutcome {
    pub report: CheckReport,
    pub rendered: String,
    pub exit_code: i32,
}

/// Operation bundle wired from configuration.
pub struct Operations {
    config: Config,
    author: Box<dyn AuthorRenderer>,
    anchors: AnchorStyle,
}

impl Operations {
    pub fn new(config: Config) -> Self {
        let author = author_renderer(&config.author);
        let anchors = if config.anchors.keep_underscores {
            AnchorStyle::KeepUnderscores
        } else {
            AnchorStyle::Strict
        };
        Self {
            config,
            author,
            anchors,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a page file and everything it references.
    pub fn load_page(&self, page: &Path) -> Result<Page, OperationError> {
        let path = self.resolve(page);
        Ok(PageLoader::new(&self.config.content).load(&path)?)
    }

    /// Render an in-memory page with the configured author and anchor styles.
    pub fn render_page(&self, page: &Page) -> String {
        self.renderer().render_page(page)
    }

    pub fn render(&self, options: RenderOptions) -> Result<RenderOutcome, OperationError> {
        let RenderOptions { page, output, mode } = options;

        let loaded = self.load_page(&page)?;
        if let Err(errors) = loaded.validate() {
            let report = CheckReport::new(page, validation_findings(&errors));
            return Err(OperationError::Invalid(report));
        }

        let document = self.render_page(&loaded);
        let requested = output.or_else(|| self.config.output.path.clone());

        let Some(requested) = requested else {
            if mode != RenderMode::Write {
                return Err(OperationError::MissingOutput { mode });
            }
            debug!(page = %page.display(), "rendering to stdout");
            return Ok(RenderOutcome {
                status: RenderStatus::Stdout,
                output_path: None,
                rendered: document.clone(),
                document,
                diff: None,
                exit_code: 0,
            });
        };

        let path = self.resolve(&requested);
        let existing = read_existing(&path).map_err(|source| OperationError::Io {
            path: path.clone(),
            source,
        })?;
        let up_to_date = existing.as_deref() == Some(document.as_str());
        let shown = requested.display().to_string();

        let (status, rendered, diff, exit_code) = match (mode, up_to_date) {
            (_, true) => {
                debug!(output = %shown, "output already up to date");
                (RenderStatus::Unchanged, String::new(), None, 0)
            }
            (RenderMode::Write, false) => {
                atomic_write(&path, &document).map_err(|source| OperationError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!(output = %shown, bytes = document.len(), "wrote page");
                (RenderStatus::Written, String::new(), None, 0)
            }
            (RenderMode::Check, false) => {
                let message = format!("{shown}: out of date\n");
                (RenderStatus::Stale, message, None, 1)
            }
            (RenderMode::Diff, false) => {
                let original = existing.unwrap_or_default();
                let diff = build_unified_diff(&original, &document, &shown);
                let rendered = diff.clone().unwrap_or_default();
                (RenderStatus::Stale, rendered, diff, 1)
            }
        };

        Ok(RenderOutcome {
            status,
            output_path: Some(path),
            document,
            rendered,
            diff,
            exit_code,
        })
    }

    pub fn check(&self, options: CheckOptions) -> Result<CheckOutcome, OperationError> {
        let CheckOptions { page, format } = options;

        let loaded = self.load_page(&page)?;
        let mut findings = match loaded.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => validation_findings(&errors),
        };

        for duplicate in find_duplicate_anchors(&loaded, self.anchors) {
            findings.push(Finding {
                severity: Severity::Warning,
                location: owner_location(&duplicate.duplicate),
                message: format!(
                    "duplicate anchor '{}' (first used by {})",
                    duplicate.anchor,
                    owner_location(&duplicate.first)
                ),
            });
        }

        let report = CheckReport::new(page, findings);
        debug!(
            errors = report.error_count,
            warnings = report.warning_count,
            "checked page"
        );
        let rendered = render_report(&report, format)?;
        let exit_code = if report.has_errors() { 1 } else { 0 };

        Ok(CheckOutcome {
            report,
            rendered,
            exit_code,
        })
    }

    /// Renderer with the configured author strategy and anchor style.
    pub fn renderer(&self) -> PageRenderer<'_> {
        PageRenderer::new(self.author.as_ref()).with_anchor_style(self.anchors)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.sources.working_directory.join(path)
        }
    }
}

fn author_renderer(settings: &AuthorSettings) -> Box<dyn AuthorRenderer> {
    match settings.style {
        AuthorStyle::GitHub => Box::new(GitHubAuthor::new(settings.prefix.clone())),
        AuthorStyle::Plain => Box::new(PlainAuthor),
    }
}

fn validation_findings(errors: &ValidationErrors) -> Vec<Finding> {
    errors
        .iter()
        .map(|error| Finding {
            severity: Severity::Error,
            location: error.location.clone(),
            message: error.kind.to_string(),
        })
        .collect()
}

fn owner_location(owner: &AnchorOwner) -> String {
    match owner {
        AnchorOwner::Group { group } => format!("group({group})"),
        AnchorOwner::Entry { group, entry } => format!("group({group}).entry({entry})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_locations_match_validation_paths() {
        assert_eq!(owner_location(&AnchorOwner::Group { group: 2 }), "group(2)");
        assert_eq!(
            owner_location(&AnchorOwner::Entry { group: 0, entry: 3 }),
            "group(0).entry(3)"
        );
    }

    #[test]
    fn renderer_follows_configured_styles() {
        let mut config = Config::default();
        config.anchors.keep_underscores = true;
        config.author.style = AuthorStyle::Plain;
        let ops = Operations::new(config);

        let renderer = ops.renderer();
        assert_eq!(renderer.anchor_style(), AnchorStyle::KeepUnderscores);

        let page = Page {
            groups: vec![mdpage_model::Group {
                title: "Tools".into(),
                kind: mdpage_model::GroupKind::Standard,
                entries: vec![mdpage_model::Entry {
                    author: "https://github.com/alice".into(),
                    ..mdpage_model::Entry::new("snake_case")
                }],
            }],
            ..Page::default()
        };
        let mut streamed = Vec::new();
        renderer
            .render_to(&page, &page.config, &mut streamed)
            .unwrap();
        let streamed = String::from_utf8(streamed).unwrap();

        assert_eq!(streamed, ops.render_page(&page));
        assert!(streamed.contains("(#-snake_case)"));
        assert!(streamed.contains(" — https://github.com/alice\n"));
    }

    #[test]
    fn plain_author_style_skips_github_handles() {
        let settings = AuthorSettings {
            style: AuthorStyle::Plain,
            prefix: "@".into(),
        };
        let author = author_renderer(&settings);
        assert_eq!(
            author.render("https://github.com/alice"),
            "https://github.com/alice"
        );
    }
}
