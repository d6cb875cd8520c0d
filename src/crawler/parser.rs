//! HTML parsers for Letterboxd listing and film pages
//!
//! This module turns page bodies into:
//! - The last page number of a paginated listing
//! - Film detail URLs from a listing page
//! - Ratings from a ratings listing page
//! - TMDb identifier, media type, title and year from a film page
//!
//! Apart from the pagination bound, nothing here fails: a missing element
//! means a missing value.

use crate::model::{ItemDetail, MediaType, RatingEntry};
use crate::url::{absolute_url, page_number_from_href, segment_after};
use crate::MigrationError;
use scraper::{ElementRef, Html, Selector};

/// Class prefix of the half-star rating badge (`rated-1` .. `rated-10`)
const RATING_CLASS_PREFIX: &str = "rated-";

/// Label of the external-link button pointing at TMDb
const TMDB_BUTTON_LABEL: &str = "TMDb";

/// Reads the last page number from a listing page's pagination control
///
/// # Returns
///
/// * `Ok(1)` - The page has no `div.paginate-pages` (single-page listing)
/// * `Ok(n)` - Number parsed from the last pagination link's href
/// * `Err(MigrationError::Parse)` - The last link's href does not end in a page number
///
/// # Example
///
/// ```
/// use letterboxd_trakt::crawler::parse_last_page;
///
/// let html = r#"<div class="paginate-pages"><ul>
///     <li><a href="/dave/films/page/2/">2</a></li>
///     <li><a href="/dave/films/page/7/">7</a></li>
/// </ul></div>"#;
/// assert_eq!(parse_last_page(html, "https://letterboxd.com/dave/films/page/1/").unwrap(), 7);
/// ```
pub fn parse_last_page(html: &str, page_url: &str) -> Result<u32, MigrationError> {
    let document = Html::parse_document(html);

    let pagination = match first_match(&document, "div.paginate-pages") {
        Some(element) => element,
        None => return Ok(1),
    };

    let link_selector = selector("a")?;
    let last_link = match pagination.select(&link_selector).last() {
        Some(link) => link,
        None => {
            tracing::debug!("Pagination on {} has no links, assuming one page", page_url);
            return Ok(1);
        }
    };

    let href = last_link.value().attr("href").ok_or_else(|| MigrationError::Parse {
        url: page_url.to_string(),
        message: "last pagination link has no href".to_string(),
    })?;

    let last_page = page_number_from_href(href).ok_or_else(|| MigrationError::Parse {
        url: page_url.to_string(),
        message: format!("cannot read a page number from pagination href '{}'", href),
    })?;

    Ok(last_page.max(1))
}

/// Extracts the film detail URLs of every poster card on a listing page
///
/// Cards whose lazy-load placeholder has no `data-target-link` are skipped;
/// they have no detail page yet. URLs are returned in document order.
pub fn parse_listing(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    poster_cards(&document)
        .into_iter()
        .filter_map(|card| target_link(&card))
        .map(|link| absolute_url(base_url, &link))
        .collect()
}

/// Extracts ratings from the poster cards of a ratings listing page
///
/// Cards without a rating badge are watched-but-unrated and are omitted.
pub fn parse_ratings(html: &str, base_url: &str) -> Vec<RatingEntry> {
    let document = Html::parse_document(html);
    let Ok(badge_selector) = Selector::parse("span.rating") else {
        return Vec::new();
    };

    poster_cards(&document)
        .into_iter()
        .filter_map(|card| {
            let link = target_link(&card)?;
            let badge = card.select(&badge_selector).next()?;
            let rating = badge.value().classes().find_map(rating_from_class)?;

            Some(RatingEntry {
                detail_url: absolute_url(base_url, &link),
                rating,
            })
        })
        .collect()
}

/// Converts a `rated-N` class token into a score of `N / 2`
///
/// Returns None for other tokens and for levels outside 1..=10.
///
/// # Example
///
/// ```
/// use letterboxd_trakt::crawler::rating_from_class;
///
/// assert_eq!(rating_from_class("rated-7"), Some(3.5));
/// assert_eq!(rating_from_class("rating"), None);
/// ```
pub fn rating_from_class(token: &str) -> Option<f32> {
    let level: u8 = token.strip_prefix(RATING_CLASS_PREFIX)?.parse().ok()?;
    if (1..=10).contains(&level) {
        Some(f32::from(level) / 2.0)
    } else {
        None
    }
}

/// Reads everything the export needs from a single film page
///
/// The TMDb button (`a.micro-button.track-event` labelled `TMDb`) decides
/// the media type: `/movie/` is a movie, `/tv/` a show, anything else or no
/// button at all leaves the identifier unresolved.
pub fn parse_detail(html: &str, detail_url: &str) -> ItemDetail {
    let document = Html::parse_document(html);
    let mut detail = ItemDetail::unresolved(detail_url);

    if let Some(link) = tmdb_link(&document) {
        let media_type = MediaType::from_link(&link);
        let external_id = media_type
            .path_marker()
            .and_then(|marker| segment_after(&link, marker));

        if let Some(id) = external_id {
            detail.external_id = Some(id);
            detail.media_type = media_type;
        } else {
            tracing::debug!("Unrecognised TMDb link {} on {}", link, detail_url);
        }
    }

    detail.title = element_text(&document, "h1.headline-1");
    detail.year = element_text(&document, "span.year");
    detail
}

/// Finds the href of the TMDb external-link button
fn tmdb_link(document: &Html) -> Option<String> {
    let button_selector = Selector::parse("a.micro-button.track-event").ok()?;

    document
        .select(&button_selector)
        .find(|button| button.text().collect::<String>().trim() == TMDB_BUTTON_LABEL)
        .and_then(|button| button.value().attr("href"))
        .map(str::to_string)
}

/// Iterates the `li.poster-container` cards of a listing page
fn poster_cards(document: &Html) -> Vec<ElementRef<'_>> {
    match Selector::parse("li.poster-container") {
        Ok(card_selector) => document.select(&card_selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Reads the detail path from a card's lazy-load placeholder
fn target_link(card: &ElementRef<'_>) -> Option<String> {
    let lazy_selector = Selector::parse("div.really-lazy-load").ok()?;

    card.select(&lazy_selector)
        .next()
        .and_then(|div| div.value().attr("data-target-link"))
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
}

/// Trimmed text of the first element matching `css`, if non-empty
fn element_text(document: &Html, css: &str) -> Option<String> {
    first_match(document, css)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn first_match<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    document.select(&sel).next()
}

fn selector(css: &str) -> Result<Selector, MigrationError> {
    Selector::parse(css).map_err(|e| MigrationError::Parse {
        url: String::new(),
        message: format!("invalid selector '{}': {:?}", css, e),
    })
}
