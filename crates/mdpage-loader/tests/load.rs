use std::fs;
use std::path::Path;

use mdpage_loader::{LoadError, PageLoader};
use mdpage_model::GroupKind;
use mdpage_test_support::test_config;
use tempfile::TempDir;

fn setup_file(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(&path, contents).expect("write file");
}

const PAGE: &str = r#"
header: header.md
contents:
  title: Contents
entry:
  title_prefix: "➡️"
  back: "⬆️"
  requirements:
    title: Requirements
  example:
    title: Output
groups:
  - title: Code Visualization
    entries:
      - title: Visualize packages
        name: go-graph
        url: https://example.com/go-graph
        description: Draws the import graph.
        author: https://github.com/alice
        example_content_url: snippets/main.go
        example_output_url: snippets/output.txt
        requirements:
          - graphviz
        commands:
          - go-graph ./...
      - title: Typed snippet
        description: Language tag set explicitly.
        example_content_url: snippets/query.txt
        example_content_type: sql
  - title: Blogs
    type: md-list
    entries:
      - title: Go blog
        url: https://go.dev/blog
"#;

#[test]
fn resolves_referenced_files_relative_to_page() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "docs/page.yaml", PAGE);
    setup_file(temp.path(), "docs/header.md", "# Go Tools\n");
    setup_file(temp.path(), "docs/snippets/main.go", "package main\n");
    setup_file(temp.path(), "docs/snippets/output.txt", "ok\n");
    setup_file(temp.path(), "docs/snippets/query.txt", "select 1;\n");

    let config = test_config();
    let page = PageLoader::new(&config.content)
        .load(&temp.path().join("docs/page.yaml"))
        .expect("load page");

    assert_eq!(page.header, "# Go Tools\n");
    assert_eq!(page.config.contents.title, "Contents");
    assert_eq!(page.config.entry.title_prefix, "➡️");
    assert_eq!(page.config.entry.example.title, "Output");
    assert_eq!(page.groups.len(), 2);

    let visualize = &page.groups[0].entries[0];
    assert_eq!(visualize.name, "go-graph");
    assert_eq!(visualize.example_content, "package main\n");
    assert_eq!(visualize.example_content_type, "go");
    assert_eq!(visualize.example_output, "ok\n");
    assert_eq!(visualize.requirements, vec!["graphviz"]);
    assert_eq!(visualize.commands, vec!["go-graph ./..."]);

    let typed = &page.groups[0].entries[1];
    assert_eq!(typed.example_content_type, "sql");
    assert!(typed.example_output.is_empty());

    assert_eq!(page.groups[1].kind, GroupKind::List);
    assert_eq!(page.groups[1].entries[0].url, "https://go.dev/blog");
}

#[test]
fn explicit_base_dir_overrides_page_directory() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "page.yaml", "header: shared/header.md\n");
    setup_file(temp.path(), "root/shared/header.md", "banner\n");

    let config = test_config();
    let page = PageLoader::new(&config.content)
        .with_base_dir(temp.path().join("root"))
        .load(&temp.path().join("page.yaml"))
        .expect("load page");

    assert_eq!(page.header, "banner\n");
    assert!(page.groups.is_empty());
}

#[test]
fn missing_content_file_reports_path() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(
        temp.path(),
        "page.yaml",
        "groups:\n  - title: G\n    entries:\n      - title: E\n        example_content_url: missing.go\n",
    );

    let config = test_config();
    let err = PageLoader::new(&config.content)
        .load(&temp.path().join("page.yaml"))
        .expect_err("missing file");

    match err {
        LoadError::Io { path, .. } => assert!(path.ends_with("missing.go")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn remote_content_is_rejected() {
    let config = test_config();
    let err = PageLoader::new(&config.content)
        .parse(
            "groups:\n  - title: G\n    entries:\n      - title: E\n        example_output_url: https://example.com/out.txt\n",
            Path::new("page.yaml"),
            Path::new("."),
        )
        .expect_err("remote reference");

    assert_eq!(
        err.to_string(),
        "group(0).entry(0).example_output_url: remote content is not supported (https://example.com/out.txt)"
    );
}

#[test]
fn unknown_fields_are_parse_errors() {
    let config = test_config();
    let err = PageLoader::new(&config.content)
        .parse(
            "groups:\n  - title: G\n    entries:\n      - title: E\n        descripton: typo.\n",
            Path::new("page.yaml"),
            Path::new("."),
        )
        .expect_err("typo");

    assert!(matches!(err, LoadError::Parse { .. }));
}
