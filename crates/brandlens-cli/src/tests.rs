use std::sync::Arc;

use brandlens_analyzer::Lexicon;
use brandlens_scraper::{ExtractorRegistry, FallbackPolicy, FetchPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

#[test]
fn parses_analyze_with_default_json_format() {
    let cli = Cli::try_parse_from(["brandlens", "analyze", "--url", "acme.com"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Analyze {
            ref url,
            format: OutputFormat::Json
        } if url == "acme.com"
    ));
}

#[test]
fn parses_analyze_markdown_format() {
    let cli = Cli::try_parse_from([
        "brandlens",
        "analyze",
        "--url",
        "https://acme.com",
        "--format",
        "markdown",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Analyze {
            format: OutputFormat::Markdown,
            ..
        }
    ));
}

#[test]
fn rejects_unknown_format() {
    let result = Cli::try_parse_from([
        "brandlens", "analyze", "--url", "acme.com", "--format", "html",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_links_and_profiles_commands() {
    let links = Cli::try_parse_from(["brandlens", "links", "--url", "acme.com"])
        .expect("expected valid cli args");
    assert!(matches!(links.command, Commands::Links { ref url } if url == "acme.com"));

    let profiles = Cli::try_parse_from(["brandlens", "profiles", "--url", "acme.com"])
        .expect("expected valid cli args");
    assert!(matches!(profiles.command, Commands::Profiles { .. }));
}

#[test]
fn url_is_required() {
    assert!(Cli::try_parse_from(["brandlens", "links"]).is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["brandlens"]).is_err());
}

fn analyzer() -> Analyzer {
    Analyzer::new(
        FetchPolicy {
            timeout_secs: 5,
            max_retries: 0,
            backoff_base_ms: 0,
            jitter_max_ms: 0,
        },
        Arc::new(ExtractorRegistry::builtin().expect("builtin catalog compiles")),
        FallbackPolicy::default(),
        Lexicon::default(),
    )
}

async fn mock_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Acme Coffee</title></head>\
             <body><main><p>Acme roasts coffee in small batches for people who care about quality.</p></main></body></html>",
        ))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn analyze_json_output_is_the_result_object() {
    let server = mock_site().await;
    let out = commands::run_analyze(&analyzer(), &server.uri(), OutputFormat::Json)
        .await
        .expect("analysis runs");

    let json: serde_json::Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(json["brand_name"], "Acme Coffee");
    assert!(json["visual_profile"]["color_palette"]["primary"].is_string());
}

#[tokio::test]
async fn analyze_markdown_output_starts_with_story() {
    let server = mock_site().await;
    let out = commands::run_analyze(&analyzer(), &server.uri(), OutputFormat::Markdown)
        .await
        .expect("analysis runs");

    assert!(out.starts_with("# Acme Coffee: Brand Story"));
    assert!(out.contains("## Analysis Summary"));
}

#[tokio::test]
async fn links_output_is_json_array() {
    let server = mock_site().await;
    let out = commands::run_links(&analyzer(), &server.uri())
        .await
        .expect("discovery runs");
    assert_eq!(out, "[]");
}

#[tokio::test]
async fn invalid_url_is_an_error() {
    assert!(commands::run_profiles(&analyzer(), "  ").await.is_err());
}
