//! End-to-end tests for building a site from configured feeds.

mod common;

use std::fs;

use common::{at, item, parsed_feed, test_settings, StaticSource};
use planetoid::{Aggregator, FeedConfig, ParsedItem, PlanetoidError};

fn two_feed_source() -> StaticSource {
    StaticSource::new()
        .with_feed(
            "https://a.example/feed",
            parsed_feed(
                "Alpha",
                vec![item("Alpha-Post", at(2025, 1, 2, 9), "<h1>Big</h1><p>alpha body</p>")],
            ),
        )
        .with_feed(
            "https://b.example/feed",
            parsed_feed(
                "Beta",
                vec![item("Beta-Post", at(2025, 1, 3, 9), "<p>beta body</p>")],
            ),
        )
}

fn two_feed_configs() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("https://a.example/feed").with_category("News/Tech"),
        FeedConfig::new("https://b.example/feed").with_category("News"),
    ]
}

#[tokio::test]
async fn test_build_two_feeds() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");

    let aggregator = Aggregator::new(two_feed_source(), test_settings());
    let summary = aggregator.run(two_feed_configs(), &out).await.unwrap();

    assert_eq!(summary.configured, 2);
    assert_eq!(summary.fetched, 2);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.pages, 3);

    let mut files: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["News--Tech.html", "News.html", "index.html"]);

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains(
        "<ul><li>*<ul><li><a href=\"News.html\">News (2)</a><ul>\
         <li><a href=\"News--Tech.html\">Tech (1)</a></li></ul></li></ul></li></ul>"
    ));
    assert!(index.contains("<title>Test Planet</title>"));

    let tech = fs::read_to_string(out.join("News--Tech.html")).unwrap();
    assert!(tech.contains("Alpha-Post"));
    assert!(!tech.contains("Beta-Post"));
    assert!(tech.contains("<h1>2025-01-02</h1>"));
    // Body headings start below the entry header
    assert!(tech.contains("<h3>Big</h3><p>alpha body</p>"));
    assert!(tech.contains("<title>Test Planet - News / Tech</title>"));

    let news = fs::read_to_string(out.join("News.html")).unwrap();
    let beta = news.find("Beta-Post").unwrap();
    let alpha = news.find("Alpha-Post").unwrap();
    assert!(beta < alpha, "newest entry first");
    assert!(news.find("<h1>2025-01-03</h1>").unwrap() < beta);
    assert!(news.find("<h1>2025-01-02</h1>").unwrap() < alpha);
    assert!(news.contains("<a href=\"https://alpha.example/\">Alpha</a> (1)"));
    assert!(news.contains("<a href=\"https://beta.example/\">Beta</a> (1)"));
}

#[tokio::test]
async fn test_build_skips_failed_feed() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");

    let mut configs = two_feed_configs();
    configs.push(FeedConfig::new("https://missing.example/feed").with_category("News"));

    let aggregator = Aggregator::new(two_feed_source(), test_settings());
    let summary = aggregator.run(configs, &out).await.unwrap();

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "https://missing.example/feed");

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("News (2)"));
}

#[tokio::test]
async fn test_build_fail_fast_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("keep.html"), "previous build").unwrap();

    let mut settings = test_settings();
    settings.fetch.fail_fast = true;

    let mut configs = two_feed_configs();
    configs.push(FeedConfig::new("https://missing.example/feed"));

    let aggregator = Aggregator::new(two_feed_source(), settings);
    let result = aggregator.run(configs, &out).await;

    assert!(matches!(result, Err(PlanetoidError::Fetch(_))));
    assert!(out.join("keep.html").exists());
    assert!(!out.join("index.html").exists());
}

#[tokio::test]
async fn test_build_times_out_slow_feed() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");

    let source = two_feed_source().with_slow("https://a.example/feed");
    let aggregator = Aggregator::new(source, test_settings());
    let summary = aggregator.run(two_feed_configs(), &out).await.unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].1.contains("timed out"));
    assert!(!out.join("News--Tech.html").exists());
}

#[tokio::test]
async fn test_build_recreates_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");
    fs::create_dir_all(out.join("old")).unwrap();
    fs::write(out.join("Stale.html"), "stale").unwrap();

    let aggregator = Aggregator::new(two_feed_source(), test_settings());
    aggregator.run(two_feed_configs(), &out).await.unwrap();

    assert!(!out.join("Stale.html").exists());
    assert!(!out.join("old").exists());
    assert!(out.join("index.html").exists());
}

#[tokio::test]
async fn test_build_excludes_feed_with_undated_item() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");

    let source = two_feed_source().with_feed(
        "https://undated.example/feed",
        parsed_feed(
            "Undated",
            vec![
                item("Dated-Post", at(2025, 1, 4, 9), "<p>x</p>"),
                ParsedItem::new("Undated-Post"),
            ],
        ),
    );
    let mut configs = two_feed_configs();
    configs.push(FeedConfig::new("https://undated.example/feed").with_category("News"));

    let aggregator = Aggregator::new(source, test_settings());
    let summary = aggregator.run(configs, &out).await.unwrap();
    assert_eq!(summary.fetched, 3);

    let news = fs::read_to_string(out.join("News.html")).unwrap();
    assert!(!news.contains("Dated-Post"));
    assert!(!news.contains("Undated-Post"));
    assert!(news.contains("Alpha-Post"));
    assert!(news.contains("Beta-Post"));

    // Still counted as a member of the category
    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("News (3)"));
}

#[tokio::test]
async fn test_build_ambiguous_content() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");

    let source = StaticSource::new().with_feed(
        "https://c.example/feed",
        parsed_feed(
            "Gamma",
            vec![ParsedItem::new("Two-Bodies")
                .with_link("https://example.com/two")
                .with_published_at(at(2025, 1, 1, 9))
                .with_content("text/html", "<p>first version</p>")
                .with_content("text/html", "<p>second version</p>")],
        ),
    );
    let configs = vec![FeedConfig::new("https://c.example/feed").with_category("Misc")];

    let aggregator = Aggregator::new(source, test_settings());
    aggregator.run(configs, &out).await.unwrap();

    let page = fs::read_to_string(out.join("Misc.html")).unwrap();
    assert!(page.contains("<a href=\"https://example.com/two\">Two-Bodies</a> (Gamma)"));
    assert!(!page.contains("first version"));
    assert!(!page.contains("second version"));
}

#[tokio::test]
async fn test_build_sanitizes_content() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");

    let source = StaticSource::new().with_feed(
        "https://d.example/feed",
        parsed_feed(
            "Delta",
            vec![item(
                "Scripted",
                at(2025, 1, 1, 9),
                "<p>safe text</p><script>alert('x')</script>",
            )],
        ),
    );
    let configs = vec![FeedConfig::new("https://d.example/feed").with_category("Misc")];

    let aggregator = Aggregator::new(source, test_settings());
    aggregator.run(configs, &out).await.unwrap();

    let page = fs::read_to_string(out.join("Misc.html")).unwrap();
    assert!(page.contains("safe text"));
    assert!(!page.contains("alert("));
}

#[tokio::test]
async fn test_build_without_feeds() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");

    let aggregator = Aggregator::new(StaticSource::new(), test_settings());
    let summary = aggregator.run(Vec::new(), &out).await.unwrap();

    assert_eq!(summary.pages, 1);
    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("<ul><li>*</li></ul>"));
}

#[tokio::test]
async fn test_build_category_named_index_keeps_site_index() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");

    let configs = vec![
        FeedConfig::new("https://a.example/feed").with_category("index"),
        FeedConfig::new("https://b.example/feed").with_category("News"),
    ];
    let aggregator = Aggregator::new(two_feed_source(), test_settings());
    let summary = aggregator.run(configs, &out).await.unwrap();
    assert_eq!(summary.pages, 3);

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("<li>*<ul>"));
    assert!(index.contains("<a href=\"~69ndex.html\">index (1)</a>"));
    assert!(!index.contains("Alpha-Post"));

    let page = fs::read_to_string(out.join("~69ndex.html")).unwrap();
    assert!(page.contains("Alpha-Post"));
    assert!(page.contains("<title>Test Planet - index</title>"));
}
