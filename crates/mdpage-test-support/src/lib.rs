//! Shared test harness utilities for mdpage crates.

use mdpage_config::Config;
use mdpage_model::{
    ContentsConfig, Entry, EntryConfig, Group, GroupKind, Page, RenderConfig, SectionLabel,
};

/// Returns the built-in configuration without reading any config files.
pub fn test_config() -> Config {
    Config::default()
}

/// Section labels used across render fixtures.
pub fn labels() -> RenderConfig {
    RenderConfig {
        contents: ContentsConfig {
            title: "Contents".into(),
        },
        entry: EntryConfig {
            title_prefix: "➡".into(),
            back: "⬆".into(),
            requirements: SectionLabel {
                title: "Requirements".into(),
            },
            example: SectionLabel {
                title: "Example".into(),
            },
        },
    }
}

pub fn entry(title: &str, description: &str) -> Entry {
    Entry {
        description: description.into(),
        ..Entry::new(title)
    }
}

pub fn standard_group(title: &str, entries: Vec<Entry>) -> Group {
    Group {
        title: title.into(),
        kind: GroupKind::Standard,
        entries,
    }
}

pub fn list_group(title: &str, entries: Vec<Entry>) -> Group {
    Group {
        title: title.into(),
        kind: GroupKind::List,
        entries,
    }
}

/// Small page with one standard group and one list group.
pub fn sample_page() -> Page {
    let vet = Entry {
        name: "go-vet".into(),
        url: "https://pkg.go.dev/cmd/vet".into(),
        author: "https://github.com/alice".into(),
        commands: vec!["go vet ./...".into()],
        requirements: vec!["go >= 1.21".into()],
        ..entry("Find suspicious code", "Reports likely mistakes.")
    };
    let graph = Entry {
        example_content: "package main\n".into(),
        example_content_type: "go".into(),
        example_output: "ok\n".into(),
        example_image_url: "https://example.com/graph.png".into(),
        ..entry("Visualize packages", "Draws the import graph.")
    };
    let blog = Entry {
        url: "https://go.dev/blog".into(),
        ..Entry::new("Go blog")
    };

    Page {
        header: "# Go Tools\n".into(),
        groups: vec![
            standard_group("Code Analysis", vec![vet, graph]),
            list_group("Reading", vec![blog]),
        ],
        config: labels(),
    }
}
