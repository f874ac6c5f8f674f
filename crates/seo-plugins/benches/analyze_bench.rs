use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html_parser::PageParser;
use seo_plugins::utils::registry::PluginRegistry;
use url::Url;

const PAGE: &str = r#"
        <html lang="en">
            <head>
                <title>Test Page</title>
                <meta name="description" content="Test description">
                <meta name="viewport" content="width=device-width, initial-scale=1">
            </head>
            <body>
                <h1>Test Page</h1>
                <h3>Skipped a level</h3>
                <p>Some text for the readability counters. It has two sentences.</p>
                <img src="/test.jpg" alt="Test Image">
                <img src="/test2.jpg" srcset="test2.jpg 1x, test2-2x.jpg 2x">
                <a href="/about">About</a>
                <a href="https://external.com">External</a>
            </body>
        </html>
        "#;

fn analyze_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    // Setup
    let registry = PluginRegistry::default_with_config();
    let Ok(url) = Url::parse("https://example.com/test") else {
        return;
    };
    let parser = PageParser::from_url(url.clone());
    let signals = parser.extract(PAGE);

    group.bench_function("extract_signals", |b| {
        b.iter(|| {
            black_box(parser.extract(black_box(PAGE)));
        })
    });

    group.bench_function("evaluate_checks", |b| {
        b.iter(|| {
            black_box(registry.evaluate(&signals, &url));
        })
    });

    group.finish();
}

criterion_group!(benches, analyze_benchmark);
criterion_main!(benches);
