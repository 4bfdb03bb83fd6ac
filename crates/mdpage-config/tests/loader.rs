use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use mdpage_config::{AuthorStyle, Config, ConfigError, ConfigSourceKind, LoadOptions};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.author.style, AuthorStyle::GitHub);
    assert_eq!(config.author.prefix, "@");
    assert!(!config.anchors.keep_underscores);
    assert_eq!(config.content.languages.get("go").map(String::as_str), Some("go"));
    assert_eq!(config.content.languages.get("rs").map(String::as_str), Some("rust"));
    assert!(config.output.path.is_none());

    assert_eq!(config.sources.working_directory, working_dir);
    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn applies_precedence_and_merges_fields() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".mdpage.toml"),
        r#"
        [author]
        style = "plain"
        prefix = "gh:"

        [content]
        languages = { kt = "kotlin" }

        [output]
        path = "README.md"
        "#,
    );

    let nested = git_root.join("docs");
    fs::create_dir(&nested).expect("create docs dir");
    write_file(
        nested.join(".mdpage.toml"),
        r#"
        [author]
        style = "github"

        [anchors]
        keep_underscores = true

        [content]
        languages = { go = "golang" }
        "#,
    );

    let config =
        Config::load(LoadOptions::default().with_working_dir(&nested)).expect("load layered");

    assert_eq!(config.author.style, AuthorStyle::GitHub);
    assert_eq!(config.author.prefix, "gh:");
    assert!(config.anchors.keep_underscores);
    assert_eq!(
        config.content.languages.get("go").map(String::as_str),
        Some("golang")
    );
    assert_eq!(
        config.content.languages.get("kt").map(String::as_str),
        Some("kotlin")
    );
    assert_eq!(config.output.path, Some(git_root.join("README.md")));

    let kinds: Vec<ConfigSourceKind> = config.sources.layers.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local
        ]
    );
}

#[test]
fn override_path_wins_over_local_config() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    write_file(
        working_dir.join(".mdpage.toml"),
        "[author]\nprefix = \"local\"\n",
    );
    write_file(
        working_dir.join("ci.toml"),
        "[author]\nprefix = \"ci\"\n",
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_override_path("ci.toml"),
    )
    .expect("load with override");

    assert_eq!(config.author.prefix, "ci");
    assert_eq!(
        config.sources.layers.last().map(|layer| layer.kind),
        Some(ConfigSourceKind::Override)
    );
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(temp.path())
            .with_override_path("absent.toml"),
    )
    .expect_err("override must exist");

    assert!(matches!(err, ConfigError::OverrideNotFound { .. }));
}

#[test]
fn invalid_values_are_collected_with_source() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    write_file(
        working_dir.join(".mdpage.toml"),
        r#"
        [author]
        style = "gitlab"

        [content]
        languages = { "" = "text", md = " " }
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("invalid config");

    match err {
        ConfigError::Validation(errors) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            assert_eq!(messages.len(), 3, "{messages:?}");
            assert!(messages
                .iter()
                .any(|m| m.contains("author.style must be one of github, plain")));
            assert!(messages
                .iter()
                .any(|m| m.contains("content.languages: file extension cannot be empty")));
            assert!(messages
                .iter()
                .any(|m| m.contains("content.languages.md: fence language cannot be empty")));
            assert!(messages.iter().all(|m| m.contains("local config at")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_keys_fail_to_parse() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(working_dir.join(".mdpage.toml"), "[author]\nsytle = \"plain\"\n");

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("typo should be rejected");

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn language_keys_are_normalized_before_merging() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".mdpage.toml"),
        r#"
        [content]
        languages = { GO = "golang", ".RS" = "rs" }
        "#,
    );

    for _ in 0..16 {
        let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
            .expect("load config");

        assert_eq!(config.content.languages.get("go").map(String::as_str), Some("golang"));
        assert_eq!(config.content.languages.get("rs").map(String::as_str), Some("rs"));
        assert!(!config.content.languages.contains_key("GO"));
        assert!(!config.content.languages.contains_key(".rs"));
    }
}
