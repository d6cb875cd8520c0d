//! Import pipeline: CSV reading, film resolution, dry run and history write

use crate::common::{film_page, serve, test_config};
use letterboxd_trakt::config::{ApiAuth, Config};
use letterboxd_trakt::crawler::Crawler;
use letterboxd_trakt::trakt::{Importer, TraktClient};
use letterboxd_trakt::MigrationError;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth() -> ApiAuth {
    ApiAuth {
        client_id: "client-123".to_string(),
        access_token: "token-456".to_string(),
    }
}

/// Writes a watch history CSV whose URIs point at the mock server
fn history_csv(base_url: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Name,Year,Letterboxd URI,Rating").unwrap();
    writeln!(file, "2024-12-23,Heat,1995,{}/film/heat/,4.5", base_url).unwrap();
    writeln!(file, "2024-12-23,Breaking Bad,2008,{}/film/breaking-bad/,", base_url).unwrap();
    writeln!(file, "2024-12-23,Alien,1979,{}/film/alien/,", base_url).unwrap();
    writeln!(file, "2024-12-23,,2000,{}/film/nameless/,", base_url).unwrap();
    file.flush().unwrap();
    file
}

async fn mount_films(server: &MockServer) {
    serve(server, "/film/heat/", film_page("Heat", "1995", Some("movie/949"))).await;
    serve(
        server,
        "/film/breaking-bad/",
        film_page("Breaking Bad", "2008", Some("tv/1396")),
    )
    .await;
    serve(server, "/film/alien/", film_page("Alien", "1979", None)).await;
}

fn importer(config: &Config, trakt: Option<TraktClient>) -> Importer<letterboxd_trakt::crawler::HttpFetcher> {
    Importer::new(Crawler::from_config(config).unwrap(), trakt)
}

#[tokio::test]
async fn test_dry_run_notifies_once_per_entry_and_never_writes() {
    let server = MockServer::start().await;
    mount_films(&server).await;
    Mock::given(method("POST"))
        .and(path("/sync/history"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let csv = history_csv(&server.uri());

    let report = importer(&config, None)
        .import_file(csv.path(), true)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.planned.len(), 3);
    assert_eq!(report.would_add.len(), 3);
    assert_eq!(report.unresolved, 1);
    assert_eq!(report.submitted, 0);
    assert!(report.response.is_none());
    assert_eq!(
        report.would_add[0],
        format!("Would add Heat from {}/film/heat/ to Trakt history", server.uri())
    );
}

#[tokio::test]
async fn test_import_posts_one_batch_with_trakt_headers() {
    let server = MockServer::start().await;
    mount_films(&server).await;
    Mock::given(method("POST"))
        .and(path("/sync/history"))
        .and(header("authorization", "Bearer token-456"))
        .and(header("trakt-api-version", "2"))
        .and(header("trakt-api-key", "client-123"))
        .and(body_json(json!({
            "movies": [{ "title": "Heat", "year": 1995, "ids": { "tmdb": 949 } }],
            "shows": [{ "title": "Breaking Bad", "year": 2008, "ids": { "tmdb": 1396 } }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "added": { "movies": 1, "episodes": 62 },
            "not_found": { "movies": [], "shows": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let trakt = TraktClient::new(&config.trakt, &auth()).unwrap();
    let csv = history_csv(&server.uri());

    let report = importer(&config, Some(trakt))
        .import_file(csv.path(), false)
        .await
        .unwrap();

    assert!(report.would_add.is_empty());
    assert_eq!(report.submitted, 2);
    assert_eq!(report.unresolved, 1);
    let response = report.response.unwrap();
    assert_eq!(response.added.movies, 1);
    assert_eq!(response.added.episodes, 62);
}

#[tokio::test]
async fn test_rejected_token_aborts_import() {
    let server = MockServer::start().await;
    mount_films(&server).await;
    Mock::given(method("POST"))
        .and(path("/sync/history"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let trakt = TraktClient::new(&config.trakt, &auth()).unwrap();
    let csv = history_csv(&server.uri());

    let err = importer(&config, Some(trakt))
        .import_file(csv.path(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, MigrationError::Api { status: 401, .. }));
}

#[tokio::test]
async fn test_real_import_without_client_is_refused() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());
    let csv = history_csv(&server.uri());

    let err = importer(&config, None)
        .import_file(csv.path(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, MigrationError::AuthConfig(_)));
}

#[tokio::test]
async fn test_missing_csv_aborts_import() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());

    let err = importer(&config, None)
        .import_file(std::path::Path::new("/nonexistent/Watched_Movies_LBD.csv"), true)
        .await
        .unwrap_err();
    assert!(matches!(err, MigrationError::Io(_)));
}
