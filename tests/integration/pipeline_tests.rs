use crate::fixtures::{mount_site, read_rows, test_config};
use chrono::Datelike;
use showcase_harvest::output::read_url_column;
use showcase_harvest::pipeline::Pipeline;
use showcase_harvest::{Stage, NOT_AVAILABLE};
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

async fn setup() -> (MockServer, TempDir, Pipeline) {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(test_config(&server.uri(), dir.path())).unwrap();
    (server, dir, pipeline)
}

#[tokio::test]
async fn test_project_links_keep_listing_order_and_duplicates() {
    let (server, _dir, pipeline) = setup().await;

    let report = pipeline.project_links().await.unwrap();
    assert_eq!(report.submitted, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.records, 4);

    let urls = read_url_column(&pipeline.output_path(Stage::ProjectLinks), "project_url").unwrap();
    let base = server.uri();
    assert_eq!(
        urls,
        vec![
            format!("{}/showcase/alpha", base),
            format!("{}/showcase/beta", base),
            format!("{}/showcase/gamma", base),
            format!("{}/showcase/alpha", base),
        ]
    );
}

#[tokio::test]
async fn test_project_details_isolate_failed_pages() {
    let (server, _dir, pipeline) = setup().await;
    pipeline.project_links().await.unwrap();

    let urls = pipeline.read_input(Stage::ProjectDetails, None).unwrap();
    let report = pipeline.project_details(urls).await.unwrap();

    assert_eq!(report.submitted, 4);
    assert_eq!(report.completed, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].url, format!("{}/showcase/beta", server.uri()));

    let rows = read_rows(&pipeline.output_path(Stage::ProjectDetails));
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.len(), 10);
        assert!(row.iter().all(|field| !field.is_empty()));
    }

    let alpha = &rows[0];
    assert_eq!(alpha[0], format!("{}/showcase/alpha", server.uri()));
    assert_eq!(alpha[1], "alpha");
    assert_eq!(alpha[2], "ETHGlobal Bangkok");
    assert_eq!(alpha[3], "2024");
    assert_eq!(alpha[4], "alpha in one line.");
    assert_eq!(alpha[5], "About alpha.");
    assert_eq!(alpha[6], "https://alpha.example");
    assert_eq!(alpha[7], "https://github.com/example/alpha");
    assert_eq!(alpha[8], "Rust and Solidity.");
    assert_eq!(alpha[9], "Pool Prize");

    let gamma = &rows[1];
    assert_eq!(gamma[1], "gamma");
    assert_eq!(gamma[2], "ETHGlobal Online");
    assert_eq!(gamma[3], chrono::Utc::now().year().to_string());

    // the duplicate listing entry is scraped again
    assert_eq!(rows[2][1], "alpha");
}

#[tokio::test]
async fn test_events_are_deduplicated() {
    let (server, _dir, pipeline) = setup().await;

    let report = pipeline.events().await.unwrap();
    assert_eq!(report.submitted, 1);
    assert_eq!(report.records, 2);

    let events = read_url_column(&pipeline.output_path(Stage::Events), "event_url").unwrap();
    assert_eq!(
        events,
        vec![
            format!("{}/events/bangkok", server.uri()),
            format!("{}/events/online", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_event_details() {
    let (server, _dir, pipeline) = setup().await;
    pipeline.events().await.unwrap();

    let urls = pipeline.read_input(Stage::EventDetails, None).unwrap();
    let report = pipeline.event_details(urls).await.unwrap();
    assert_eq!(report.failed, 0);

    let rows = read_rows(&pipeline.output_path(Stage::EventDetails));
    assert_eq!(
        rows,
        vec![
            vec![
                format!("{}/events/bangkok", server.uri()),
                "ETHGlobal Bangkok".to_string(),
                "Bangkok".to_string(),
                "2024".to_string(),
            ],
            vec![
                format!("{}/events/online", server.uri()),
                "ETHETHGlobal Online".to_string(),
                "Virtual".to_string(),
                NOT_AVAILABLE.to_string(),
            ],
        ]
    );
}

#[tokio::test]
async fn test_prizes_with_failing_event() {
    let (server, _dir, pipeline) = setup().await;
    pipeline.events().await.unwrap();

    let events = pipeline.read_input(Stage::Prizes, None).unwrap();
    let report = pipeline.prizes(events).await.unwrap();

    assert_eq!(report.submitted, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(
        report.failures[0].url,
        format!("{}/events/online/prizes", server.uri())
    );

    let rows = read_rows(&pipeline.output_path(Stage::Prizes));
    assert_eq!(
        rows,
        vec![vec![
            format!("{}/events/bangkok", server.uri()),
            "Uniswap Foundation".to_string(),
            "$10,000".to_string(),
            "Best Hook".to_string(),
            "$10,000".to_string(),
            "Ship a hook.".to_string(),
            "1st place: $6,000 | 2nd place: $4,000".to_string(),
        ]]
    );
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let (_server, _dir, pipeline) = setup().await;

    pipeline.project_links().await.unwrap();
    let urls = pipeline.read_input(Stage::ProjectDetails, None).unwrap();
    pipeline.project_details(urls.clone()).await.unwrap();
    let path = pipeline.output_path(Stage::ProjectDetails);
    let first = fs::read(&path).unwrap();

    pipeline.project_details(urls).await.unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_every_field_is_quoted() {
    let (_server, _dir, pipeline) = setup().await;
    pipeline.events().await.unwrap();

    let content = fs::read_to_string(pipeline.output_path(Stage::Events)).unwrap();
    for line in content.lines() {
        assert!(line.starts_with('"') && line.ends_with('"'), "unquoted line: {}", line);
    }
}

#[tokio::test]
async fn test_run_all() {
    let (_server, dir, pipeline) = setup().await;

    let reports = pipeline.run_all().await.unwrap();
    let stages: Vec<Stage> = reports.iter().map(|r| r.stage).collect();
    assert_eq!(stages, Stage::all_stages().to_vec());

    for file in [
        "project_urls.csv",
        "project_details.csv",
        "events.csv",
        "event_details.csv",
        "prizes.csv",
    ] {
        assert!(dir.path().join(file).exists(), "{} missing", file);
    }

    let records: Vec<usize> = reports.iter().map(|r| r.records).collect();
    assert_eq!(records, vec![4, 3, 2, 2, 1]);
}

#[tokio::test]
async fn test_unreachable_site_still_writes_header() {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(test_config("http://127.0.0.1:1", dir.path())).unwrap();

    let report = pipeline.events().await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.records, 0);

    let content = fs::read_to_string(pipeline.output_path(Stage::Events)).unwrap();
    assert_eq!(content, "\"event_url\"\n");
}

#[tokio::test]
async fn test_input_override() {
    let (server, dir, pipeline) = setup().await;

    let custom = dir.path().join("custom.csv");
    fs::write(&custom, format!("event_url\n{}/events/bangkok\n", server.uri())).unwrap();

    let urls = pipeline.read_input(Stage::Prizes, Some(&custom)).unwrap();
    assert_eq!(urls, vec![format!("{}/events/bangkok", server.uri())]);

    let report = pipeline.prizes(urls).await.unwrap();
    assert_eq!(report.failed, 0);
    assert_eq!(report.records, 1);
}
