use std::io;
use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use clap::Parser;
use mdpage_config::{Config, LoadOptions};
use mdpage_core::MdPage;
use mdpage_model::{
    ContentsConfig, Entry, EntryConfig, Group, GroupKind, Page, RenderConfig, SectionLabel,
};
use mdpage_render::find_duplicate_anchors;

#[derive(Parser)]
#[command(author, version, about = "Benchmark harness for mdpage rendering")]
struct Args {
    /// Number of groups in the synthetic page
    #[arg(long, default_value_t = 20)]
    groups: usize,

    /// Entries per group
    #[arg(long, default_value_t = 25)]
    entries: usize,

    /// Number of warm-up iterations (not counted in results)
    #[arg(long, default_value_t = 1)]
    warmup: usize,

    /// Number of measured iterations
    #[arg(long, default_value_t = 10)]
    iterations: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.iterations > 0, "--iterations must be at least 1");

    let config = Config::load(LoadOptions::default())?;
    let engine = MdPage::bootstrap(config);
    let ops = engine.operations();

    let page = synthetic_page(args.groups, args.entries);
    let size = ops.render_page(&page).len();

    let render_result = benchmark("render", args.warmup, args.iterations, || {
        ops.render_page(&page);
        Ok(())
    })?;

    let renderer = ops.renderer();
    let stream_result = benchmark("render-to-sink", args.warmup, args.iterations, || {
        renderer.render_to(&page, &page.config, io::sink())?;
        Ok(())
    })?;

    let anchors_result = benchmark("duplicate-anchors", args.warmup, args.iterations, || {
        find_duplicate_anchors(&page, renderer.anchor_style());
        Ok(())
    })?;

    println!(
        "page: {} groups, {} entries, {} bytes rendered\n",
        page.groups.len(),
        page.entry_count(),
        size
    );
    print_summary(&[render_result, stream_result, anchors_result]);
    Ok(())
}

/// Standard groups of fully populated entries, plus one list group.
fn synthetic_page(groups: usize, entries: usize) -> Page {
    let mut built: Vec<Group> = (0..groups)
        .map(|g| Group {
            title: format!("Group {g}"),
            kind: GroupKind::Standard,
            entries: (0..entries).map(|e| synthetic_entry(g, e)).collect(),
        })
        .collect();
    built.push(Group {
        title: "Further reading".into(),
        kind: GroupKind::List,
        entries: (0..entries)
            .map(|e| Entry {
                url: format!("https://example.com/article/{e}"),
                ..Entry::new(format!("Article {e}"))
            })
            .collect(),
    });

    Page {
        header: "# Synthetic catalog\n".into(),
        groups: built,
        config: RenderConfig {
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
                    title: "Output".into(),
                },
            },
        },
    }
}

fn synthetic_entry(group: usize, entry: usize) -> Entry {
    Entry {
        name: format!("tool-{group}-{entry}"),
        url: format!("https://example.com/tool/{group}/{entry}"),
        description: "Synthetic entry used for benchmarking.".into(),
        author: format!("https://github.com/user{entry}"),
        commands: vec![format!("go install example.com/tool{entry}@latest")],
        example_content: "package main\n\nfunc main() {}\n".into(),
        example_content_type: "go".into(),
        example_output: "ok\n".into(),
        requirements: vec!["go >= 1.21".into()],
        ..Entry::new(format!("Entry {entry} of group {group}"))
    }
}

struct BenchResult {
    name: String,
    iterations: usize,
    average: Duration,
    median: Duration,
}

fn benchmark<F>(name: &str, warmup: usize, iterations: usize, mut f: F) -> Result<BenchResult>
where
    F: FnMut() -> Result<()>,
{
    for _ in 0..warmup {
        f()?;
    }

    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let start = Instant::now();
        f()?;
        samples.push(start.elapsed());
    }

    samples.sort();
    let total = samples
        .iter()
        .copied()
        .fold(Duration::ZERO, |acc, sample| acc + sample);
    let average = total / (iterations as u32);
    let median = samples[samples.len() / 2];

    Ok(BenchResult {
        name: name.to_string(),
        iterations,
        average,
        median,
    })
}

fn print_summary(results: &[BenchResult]) {
    println!("mdpage benchmark results:\n");
    for result in results {
        println!(
            "- {}: avg {:?} (median {:?}) over {} iterations",
            result.name, result.average, result.median, result.iterations
        );
    }
}
