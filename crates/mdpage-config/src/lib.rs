//! Configuration primitives and loader for mdpage.
//!
//! Settings are resolved from a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Each `.mdpage.toml` layer is parsed into a partial and merged field by
//! field; values remember the layer they came from so validation errors can
//! point at the offending file.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".mdpage.toml";

const DEFAULT_AUTHOR_PREFIX: &str = "@";

const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    ("go", "go"),
    ("rs", "rust"),
    ("py", "python"),
    ("sh", "bash"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("json", "json"),
    ("toml", "toml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
];

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub author: AuthorSettings,
    pub anchors: AnchorSettings,
    pub content: ContentSettings,
    pub output: OutputSettings,
    pub sources: ConfigSources,
}

/// How the `author` field of an entry is printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorSettings {
    pub style: AuthorStyle,
    /// Marker placed before GitHub handles, e.g. `@`.
    pub prefix: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthorStyle {
    GitHub,
    Plain,
}

impl AuthorStyle {
    pub const ALL: &'static [AuthorStyle] = &[AuthorStyle::GitHub, AuthorStyle::Plain];

    pub fn as_str(self) -> &'static str {
        match self {
            AuthorStyle::GitHub => "github",
            AuthorStyle::Plain => "plain",
        }
    }
}

impl fmt::Display for AuthorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuthorStyle {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "github" => Ok(AuthorStyle::GitHub),
            "plain" => Ok(AuthorStyle::Plain),
            _ => Err(()),
        }
    }
}

/// Anchor slug alphabet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnchorSettings {
    pub keep_underscores: bool,
}

/// Settings applied while resolving external example content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentSettings {
    /// File extension (lowercase, no dot) to fence language tag.
    pub languages: BTreeMap<String, String>,
}

impl ContentSettings {
    /// Fence tag for a content file, looked up by extension.
    pub fn language_for(&self, path: &Path) -> Option<&str> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        self.languages.get(&extension).map(String::as_str)
    }
}

/// Where rendered documents go when no output is given on the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputSettings {
    pub path: Option<PathBuf>,
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    pub fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            author: resolved.author,
            anchors: resolved.anchors,
            content: resolved.content,
            output: resolved.output,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

impl Default for Config {
    /// Built-in defaults only; no files are read.
    fn default() -> Self {
        let working_dir = PathBuf::from(".");
        Config {
            author: AuthorSettings {
                style: AuthorStyle::GitHub,
                prefix: DEFAULT_AUTHOR_PREFIX.to_owned(),
            },
            anchors: AnchorSettings::default(),
            content: ContentSettings {
                languages: default_languages(),
            },
            output: OutputSettings::default(),
            sources: ConfigSources {
                working_directory: working_dir.clone(),
                layers: vec![ConfigSource::default(working_dir)],
            },
        }
    }
}

fn default_languages() -> BTreeMap<String, String> {
    DEFAULT_LANGUAGES
        .iter()
        .map(|(ext, tag)| ((*ext).to_owned(), (*tag).to_owned()))
        .collect()
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let languages = default_languages()
        .into_iter()
        .map(|(ext, tag)| (ext, Located::new(tag, source.clone())))
        .collect();

    PartialConfig {
        author_style: Some(Located::new("github".into(), source.clone())),
        author_prefix: Some(Located::new(DEFAULT_AUTHOR_PREFIX.into(), source.clone())),
        keep_underscores: Some(Located::new(false, source)),
        languages,
        output: None,
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    author_style: Option<Located<String>>,
    author_prefix: Option<Located<String>>,
    keep_underscores: Option<Located<bool>>,
    languages: BTreeMap<String, Located<String>>,
    output: Option<Located<PathBuf>>,
}

struct ResolvedConfig {
    author: AuthorSettings,
    anchors: AnchorSettings,
    content: ContentSettings,
    output: OutputSettings,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        if other.author_style.is_some() {
            self.author_style = other.author_style;
        }
        if other.author_prefix.is_some() {
            self.author_prefix = other.author_prefix;
        }
        if other.keep_underscores.is_some() {
            self.keep_underscores = other.keep_underscores;
        }
        for (key, value) in other.languages {
            self.languages.insert(key, value);
        }
        if other.output.is_some() {
            self.output = other.output;
        }
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let style = match self.author_style {
            Some(located) => match located.value.parse::<AuthorStyle>() {
                Ok(style) => style,
                Err(()) => {
                    let allowed: Vec<&str> =
                        AuthorStyle::ALL.iter().map(|style| style.as_str()).collect();
                    errors.push(ConfigValidationError::new(
                        Some(located.source.clone()),
                        format!(
                            "author.style must be one of {} (received '{}')",
                            allowed.join(", "),
                            located.value
                        ),
                    ));
                    AuthorStyle::GitHub
                }
            },
            None => AuthorStyle::GitHub,
        };

        let prefix = self
            .author_prefix
            .map(|located| located.value)
            .unwrap_or_else(|| DEFAULT_AUTHOR_PREFIX.to_owned());

        let keep_underscores = self
            .keep_underscores
            .map(|located| located.value)
            .unwrap_or(false);

        let languages = parse_languages(self.languages, &mut errors);
        let output = self.output.map(|located| resolve_path(&located));

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            author: AuthorSettings { style, prefix },
            anchors: AnchorSettings { keep_underscores },
            content: ContentSettings { languages },
            output: OutputSettings { path: output },
        })
    }
}

/// `.GO`, ` go` and `go` all name the same extension.
fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn parse_languages(
    entries: BTreeMap<String, Located<String>>,
    errors: &mut Vec<ConfigValidationError>,
) -> BTreeMap<String, String> {
    let mut languages = BTreeMap::new();
    for (key, located) in entries {
        if key.is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(located.source.clone()),
                    "file extension cannot be empty".into(),
                )
                .with_context("content.languages"),
            );
            continue;
        }
        if located.value.trim().is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(located.source.clone()),
                    "fence language cannot be empty".into(),
                )
                .with_context(format!("content.languages.{key}")),
            );
            continue;
        }
        languages.insert(key, located.value.trim().to_owned());
    }
    languages
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

/// Aggregated validation failure list.
#[derive(Clone, Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    author: Option<RawAuthor>,
    #[serde(default)]
    anchors: Option<RawAnchors>,
    #[serde(default)]
    content: Option<RawContent>,
    #[serde(default)]
    output: Option<RawOutput>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let mut partial = PartialConfig::default();

        if let Some(author) = self.author {
            partial.author_style = author
                .style
                .map(|value| Located::new(value, source.clone()));
            partial.author_prefix = author
                .prefix
                .map(|value| Located::new(value, source.clone()));
        }
        if let Some(anchors) = self.anchors {
            partial.keep_underscores = anchors
                .keep_underscores
                .map(|value| Located::new(value, source.clone()));
        }
        if let Some(content) = self.content {
            partial.languages = content
                .languages
                .into_iter()
                .map(|(key, value)| {
                    (normalize_extension(&key), Located::new(value, source.clone()))
                })
                .collect();
        }
        if let Some(output) = self.output {
            partial.output = output.path.map(|value| Located::new(value, source));
        }

        partial
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAuthor {
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnchors {
    #[serde(default)]
    keep_underscores: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContent {
    #[serde(default)]
    languages: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_lookup_ignores_extension_case() {
        let config = Config::default();
        assert_eq!(
            config.content.language_for(Path::new("examples/main.GO")),
            Some("go")
        );
        assert_eq!(config.content.language_for(Path::new("notes.txt")), None);
        assert_eq!(config.content.language_for(Path::new("Makefile")), None);
    }

    #[test]
    fn default_matches_defaults_layer() {
        let source = ConfigSource::default(PathBuf::from("."));
        let resolved = defaults_layer(source).finalize().expect("defaults are valid");
        let config = Config::default();
        assert_eq!(resolved.author, config.author);
        assert_eq!(resolved.anchors, config.anchors);
        assert_eq!(resolved.content, config.content);
        assert_eq!(resolved.output, config.output);
    }
}
