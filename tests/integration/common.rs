//! Shared fixtures for the integration tests

use letterboxd_trakt::config::{Config, ScraperConfig, TraktConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing both services at the mock server
pub fn test_config(base_url: &str) -> Config {
    Config {
        scraper: ScraperConfig {
            base_url: base_url.to_string(),
            max_concurrent_fetches: 4,
            request_timeout: Some(5),
        },
        trakt: TraktConfig {
            api_url: base_url.to_string(),
            ..TraktConfig::default()
        },
        ..Config::default()
    }
}

/// Renders a listing page with one poster card per slug
pub fn listing_page(slugs: &[&str], last_page: Option<u32>) -> String {
    let cards: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li class="poster-container"><div class="really-lazy-load poster" data-target-link="/film/{}/"></div></li>"#,
                slug
            )
        })
        .collect();

    let pagination = match last_page {
        Some(n) => format!(
            r#"<div class="paginate-pages"><ul>
                <li><a href="/dave/films/page/2/">2</a></li>
                <li><a href="/dave/films/page/{}/">{}</a></li>
            </ul></div>"#,
            n, n
        ),
        None => String::new(),
    };

    format!(
        r#"<html><body><ul class="poster-list">{}</ul>{}</body></html>"#,
        cards, pagination
    )
}

/// Renders a film page; `tmdb_path` is e.g. `movie/949`, None omits the button
pub fn film_page(title: &str, year: &str, tmdb_path: Option<&str>) -> String {
    let button = tmdb_path
        .map(|p| {
            format!(
                r#"<a href="https://www.themoviedb.org/{}/" class="micro-button track-event">TMDb</a>"#,
                p
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><body><h1 class="headline-1 filmtitle">{}</h1>
        <small class="number"><a href="/films/year/{}/"><span class="year">{}</span></a></small>
        <p class="text-link text-footer">
            <a href="http://www.imdb.com/title/tt0000001/" class="micro-button track-event">IMDb</a>
            {}
        </p></body></html>"#,
        title, year, year, button
    )
}

/// Serves `body` for GET `route`
pub async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
