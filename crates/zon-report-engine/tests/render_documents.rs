use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use std::path::PathBuf;
use zon_report_engine::io::{Corpus, build_corpus, load_document};
use zon_report_engine::{
    RenderError, RenderMode, RenderOptions, Renderer, VersionPolicy, Warning,
    render_diagnostic_page,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")))
}

fn fixture(name: &str) -> Value {
    load_document(&fixture_path(name)).unwrap()
}

fn renderer() -> Renderer {
    Renderer::with_builtins(RenderOptions::default())
}

fn section_ids(html: &str) -> Vec<&str> {
    html.split("<section ")
        .skip(1)
        .filter_map(|rest| {
            let start = rest.find(" id=\"")? + 5;
            let end = rest[start..].find('"')? + start;
            Some(&rest[start..end])
        })
        .collect()
}

#[test]
fn playbook_report_renders_in_block_order() {
    let page = renderer().render(&fixture("report.json")).unwrap();

    assert_eq!(section_ids(&page.html), vec!["tldr", "roadmap", "next"]);
    let labels: Vec<_> = page.navigation.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["TL;DR", "Roadmap", "Next"]);
    assert!(page.warnings.is_empty());
    assert!(!page.meta_only);

    let order: Vec<_> = ["Day 0–2", "Week 1", "Week 2", "Week 3–4"]
        .iter()
        .map(|label| page.html.find(&format!(">{label}<")).unwrap())
        .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));

    assert!(page.html.contains("<aside class=\"zr-sidebar\">"));
    assert!(page.html.contains(
        "<a href=\"https://github.com/EOMZON/postcast\" target=\"_blank\" rel=\"noreferrer\">repo</a>"
    ));
}

#[test]
fn board_script_file_renders() {
    let page = renderer().render(&fixture("board.data.js")).unwrap();

    assert_eq!(
        section_ids(&page.html),
        vec!["tldr", "topics", "stats", "runbook"]
    );
    // The runbook callout has no nav label and stays out of the menu
    let anchors: Vec<_> = page.navigation.iter().map(|e| e.anchor.as_str()).collect();
    assert_eq!(anchors, vec!["tldr", "topics", "stats"]);

    assert!(page.html.contains("zr-layout-audit zr-theme-light"));
    assert!(page.html.contains("<nav class=\"zr-nav\">"));
    assert!(!page.html.contains("zr-sidebar"));
    assert!(page.html.contains("<div class=\"k\">Shortlist items</div><div class=\"v\">8</div>"));
    assert!(page.html.contains("<li>automation</li><li>board</li><li>podcast</li>"));
}

#[rstest]
#[case("report.json")]
#[case("board.data.js")]
fn rendering_twice_is_byte_identical(#[case] name: &str) {
    let raw = fixture(name);
    let first = renderer().render(&raw).unwrap();
    let second = renderer().render(&raw).unwrap();
    assert_eq!(first.html, second.html);
    assert_eq!(first.navigation, second.navigation);
}

#[test]
fn duplicate_ids_fail_naming_both_blocks() {
    let err = renderer().render(&fixture("duplicate_ids.json")).unwrap_err();
    let RenderError::Schema(schema) = &err else {
        panic!("expected schema error, got {err:?}");
    };
    assert_eq!(schema.duplicate_blocks(), vec![(0, 2)]);

    let diagnostic = render_diagnostic_page(&err, "en");
    assert!(diagnostic.contains(
        "<li><code>/blocks/2/id</code> block id `intro` is used by blocks 0 and 2</li>"
    ));
}

#[rstest]
#[case(RenderMode::BestEffort)]
#[case(RenderMode::Strict)]
fn unknown_block_type_becomes_a_placeholder(#[case] mode: RenderMode) {
    let mut raw = fixture("report.json");
    raw["blocks"].as_array_mut().unwrap().push(json!({
        "id": "chart",
        "nav": "Chart",
        "type": "unsupported-xyz",
        "data": { "series": [1, 2, 3] }
    }));
    let renderer = Renderer::with_builtins(RenderOptions {
        mode,
        ..RenderOptions::default()
    });

    let page = renderer.render(&raw).unwrap();
    assert_eq!(
        section_ids(&page.html),
        vec!["tldr", "roadmap", "next", "chart"]
    );
    assert!(page.html.contains("zr-placeholder--unknown"));
    assert!(page.html.contains("<p>Payload fields: series</p>"));
    assert_eq!(
        page.warnings,
        vec![Warning::UnknownBlockType {
            block_id: "chart".to_string(),
            block_type: "unsupported-xyz".to_string(),
        }]
    );
}

#[test]
fn malformed_payload_degrades_or_fails_by_mode() {
    let mut raw = fixture("report.json");
    raw["blocks"][1]["data"]["items"] = json!("not a list");

    let page = renderer().render(&raw).unwrap();
    assert!(page.html.contains("zr-placeholder--invalid"));
    assert!(matches!(
        page.warnings.as_slice(),
        [Warning::BlockDegraded { block_id, .. }] if block_id == "roadmap"
    ));

    let strict = Renderer::with_builtins(RenderOptions {
        mode: RenderMode::Strict,
        ..RenderOptions::default()
    });
    assert!(matches!(
        strict.render(&raw),
        Err(RenderError::Block { block_id, .. }) if block_id == "roadmap"
    ));
}

#[test]
fn future_version_by_policy() {
    let mut raw = fixture("report.json");
    raw["version"] = json!("zon-report@v99");

    assert!(matches!(
        renderer().render(&raw),
        Err(RenderError::UnknownVersion { .. })
    ));

    let degrade = Renderer::with_builtins(RenderOptions {
        version_policy: VersionPolicy::Degrade,
        ..RenderOptions::default()
    });
    let page = degrade.render(&raw).unwrap();
    assert!(page.meta_only);
    assert!(page.html.contains("<h1>Podcast automation plan</h1>"));
    assert!(section_ids(&page.html).is_empty());
    assert_eq!(
        page.warnings,
        vec![Warning::UnsupportedVersion {
            version: "zon-report@v99".to_string()
        }]
    );
}

#[test]
fn fixtures_directory_builds_into_a_site() {
    let out = tempfile::TempDir::new().unwrap();
    let corpus = Corpus::load(&fixture_path("")).unwrap();
    let report = build_corpus(&corpus, &renderer(), out.path()).unwrap();

    let mut ids: Vec<_> = report.pages.iter().map(|p| p.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["board-20260206-002433", "report-20260205-194200"]);
    assert_eq!(report.failed.len(), 1);

    let latest = std::fs::read_to_string(out.path().join("latest.html")).unwrap();
    assert!(latest.contains("url=board-20260206-002433.html"));
}
