//! URL helpers for Letterboxd listings and TMDb links
//!
//! Letterboxd paginates listings as `<listing>/page/<n>/` and renders item
//! links as site-relative paths, so most of this is string shaping around a
//! configured base domain.

use crate::MigrationError;

/// Checks a Letterboxd username and returns it without surrounding whitespace
///
/// Usernames are a single path segment: blank names, and names holding a
/// slash, whitespace, `?` or `#`, would address some other page of the site.
///
/// # Examples
///
/// ```
/// use letterboxd_trakt::url::validate_username;
///
/// assert_eq!(validate_username("  dave ").unwrap(), "dave");
/// assert!(validate_username("").is_err());
/// assert!(validate_username("dave/films").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<&str, MigrationError> {
    let trimmed = username.trim();
    let malformed = trimmed.is_empty()
        || trimmed
            .chars()
            .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace());

    if malformed {
        return Err(MigrationError::InvalidUsername(username.to_string()));
    }
    Ok(trimmed)
}

/// Builds the watched-films listing URL for a user
///
/// # Examples
///
/// ```
/// use letterboxd_trakt::url::films_url;
///
/// assert_eq!(
///     films_url("https://letterboxd.com", "dave"),
///     "https://letterboxd.com/dave/films"
/// );
/// ```
pub fn films_url(base_url: &str, username: &str) -> String {
    format!("{}/{}/films", base_url.trim_end_matches('/'), username)
}

/// Builds the rated-films listing URL for a user
pub fn ratings_url(base_url: &str, username: &str) -> String {
    format!("{}/ratings", films_url(base_url, username))
}

/// Builds the URL of one page of a listing
pub fn listing_page_url(listing_base: &str, page: u32) -> String {
    format!("{}/page/{}/", listing_base.trim_end_matches('/'), page)
}

/// Prefixes a site-relative link with the base domain
///
/// Links that are already absolute are returned unchanged.
pub fn absolute_url(base_url: &str, link: &str) -> String {
    let link = link.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if link.starts_with('/') {
        format!("{}{}", base, link)
    } else {
        format!("{}/{}", base, link)
    }
}

/// Reads the page number from a pagination href such as `/dave/films/page/7/`
///
/// Takes whatever follows the last `/page/`, strips slashes, and requires the
/// rest to be a decimal integer.
pub fn page_number_from_href(href: &str) -> Option<u32> {
    let tail = href.rsplit("/page/").next()?;
    tail.trim_matches('/').parse().ok()
}

/// Extracts the path segment following `marker` in an external link
///
/// `https://www.themoviedb.org/movie/603/` with marker `/movie/` gives `603`.
pub fn segment_after(link: &str, marker: &str) -> Option<String> {
    let (_, rest) = link.split_once(marker)?;
    let segment = rest.split('/').next().unwrap_or_default();
    let segment = segment.split(['?', '#']).next().unwrap_or_default();

    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}
