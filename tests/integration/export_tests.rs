//! Export pipeline: pagination, both fan-out stages, CSV output

use crate::common::{film_page, listing_page, serve, test_config};
use chrono::Local;
use letterboxd_trakt::crawler::crawl;
use letterboxd_trakt::output::{aggregate_records, write_csv};
use letterboxd_trakt::{MediaType, MigrationError};
use std::collections::HashSet;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a seven-page listing with two films per page
async fn mount_profile(server: &MockServer) -> Vec<String> {
    let mut slugs = Vec::new();

    for page in 1..=7u32 {
        let page_slugs = [format!("film-{}-a", page), format!("film-{}-b", page)];
        let refs: Vec<&str> = page_slugs.iter().map(String::as_str).collect();
        serve(
            server,
            &format!("/dave/films/page/{}/", page),
            listing_page(&refs, Some(7)),
        )
        .await;
        slugs.extend(page_slugs);
    }

    for (i, slug) in slugs.iter().enumerate() {
        let tmdb = format!("movie/{}", 100 + i);
        serve(
            server,
            &format!("/film/{}/", slug),
            film_page(slug, "2001", Some(&tmdb)),
        )
        .await;
    }

    slugs
}

#[tokio::test]
async fn test_export_walks_every_page_and_writes_csv() {
    let server = MockServer::start().await;
    let slugs = mount_profile(&server).await;
    let config = test_config(&server.uri());

    let report = crawl(&config, "dave", false).await.unwrap();

    assert_eq!(report.pages, 7);
    assert_eq!(report.items_discovered, 14);
    assert_eq!(report.details.len(), 14);
    assert_eq!(report.failed_items(), 0);
    assert!(report.details.iter().all(|d| d.media_type == MediaType::Movie));

    let expected: HashSet<String> = slugs
        .iter()
        .map(|s| format!("{}/film/{}/", server.uri(), s))
        .collect();
    let found: HashSet<String> = report.details.iter().map(|d| d.detail_url.clone()).collect();
    assert_eq!(found, expected);

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("Watched_Movies_LBD.csv");
    let today = Local::now().date_naive();
    let records = aggregate_records(&report.details, None, today);
    write_csv(&csv_path, &records).unwrap();

    let written = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 15);
    assert_eq!(lines[0], "Date,Name,Year,Letterboxd URI,Rating");
    let date = today.format("%Y-%m-%d").to_string();
    assert!(lines[1..].iter().all(|l| l.starts_with(&date)));
}

#[tokio::test]
async fn test_single_page_profile_without_pagination() {
    let server = MockServer::start().await;
    serve(&server, "/dave/films/page/1/", listing_page(&["heat", "alien"], None)).await;
    serve(&server, "/film/heat/", film_page("Heat", "1995", Some("movie/949"))).await;
    serve(&server, "/film/alien/", film_page("Alien", "1979", None)).await;

    let report = crawl(&test_config(&server.uri()), "dave", false)
        .await
        .unwrap();

    assert_eq!(report.pages, 1);
    assert_eq!(report.details.len(), 2);
    assert_eq!(report.unresolved_items(), 1);

    let heat = report
        .details
        .iter()
        .find(|d| d.detail_url.ends_with("/film/heat/"))
        .unwrap();
    assert_eq!(heat.external_id.as_deref(), Some("949"));
    assert_eq!(heat.title.as_deref(), Some("Heat"));
    assert_eq!(heat.year.as_deref(), Some("1995"));
}

#[tokio::test]
async fn test_failed_film_page_is_skipped() {
    let server = MockServer::start().await;
    serve(&server, "/dave/films/page/1/", listing_page(&["heat", "gone"], None)).await;
    serve(&server, "/film/heat/", film_page("Heat", "1995", Some("movie/949"))).await;
    Mock::given(method("GET"))
        .and(path("/film/gone/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = crawl(&test_config(&server.uri()), "dave", false)
        .await
        .unwrap();

    assert_eq!(report.items_discovered, 2);
    assert_eq!(report.details.len(), 1);
    assert_eq!(report.failed_items(), 1);
}

#[tokio::test]
async fn test_unknown_profile_aborts_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nobody/films/page/1/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = crawl(&test_config(&server.uri()), "nobody", false)
        .await
        .unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_export_with_ratings_fills_rating_column() {
    let server = MockServer::start().await;
    serve(&server, "/dave/films/page/1/", listing_page(&["heat", "alien"], None)).await;
    serve(&server, "/film/heat/", film_page("Heat", "1995", Some("movie/949"))).await;
    serve(&server, "/film/alien/", film_page("Alien", "1979", Some("movie/348"))).await;
    serve(
        &server,
        "/dave/films/ratings/page/1/",
        r#"<html><body><ul>
            <li class="poster-container">
                <div class="really-lazy-load" data-target-link="/film/heat/"></div>
                <p class="poster-viewingdata"><span class="rating rated-9">★★★★½</span></p>
            </li>
        </ul></body></html>"#
            .to_string(),
    )
    .await;

    let report = crawl(&test_config(&server.uri()), "dave", true)
        .await
        .unwrap();
    let ratings = report.ratings.as_ref().unwrap();
    assert_eq!(ratings.len(), 1);

    let records = aggregate_records(&report.details, Some(ratings), Local::now().date_naive());
    let heat = records.iter().find(|r| r.title == "Heat").unwrap();
    let alien = records.iter().find(|r| r.title == "Alien").unwrap();
    assert_eq!(heat.rating, Some(4.5));
    assert_eq!(alien.rating, None);
}

#[tokio::test]
async fn test_blank_username_never_reaches_site_listing() {
    let server = MockServer::start().await;
    serve(&server, "//films/page/1/", listing_page(&["x"], None)).await;
    serve(&server, "/film/x/", film_page("X", "2000", Some("movie/1"))).await;

    let config = test_config(&server.uri());
    for name in ["", "  ", "dave/films"] {
        let err = crawl(&config, name, false).await.unwrap_err();
        assert!(matches!(err, MigrationError::InvalidUsername(_)));
    }

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}
