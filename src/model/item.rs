/// Items discovered on listing pages and resolved from detail pages
use std::fmt;

/// A film detail page discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemReference {
    /// Absolute URL of the detail page
    pub detail_url: String,
}

impl ItemReference {
    pub fn new(detail_url: impl Into<String>) -> Self {
        Self {
            detail_url: detail_url.into(),
        }
    }
}

/// Media type of an external TMDb identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaType {
    /// A TMDb `/movie/` link
    Movie,

    /// A TMDb `/tv/` link
    Show,

    /// No identifier affordance, or a link of any other shape
    #[default]
    Unknown,
}

impl MediaType {
    /// Classifies an external link by its `/movie/` or `/tv/` path marker
    pub fn from_link(link: &str) -> Self {
        if link.contains("/movie/") {
            Self::Movie
        } else if link.contains("/tv/") {
            Self::Show
        } else {
            Self::Unknown
        }
    }

    /// The path marker preceding the identifier, if any
    pub fn path_marker(&self) -> Option<&'static str> {
        match self {
            Self::Movie => Some("/movie/"),
            Self::Show => Some("/tv/"),
            Self::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a single detail page resolved to
///
/// A page without the TMDb button yields `external_id: None` and
/// `MediaType::Unknown`. That is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemDetail {
    /// The detail page this was read from
    pub detail_url: String,

    /// TMDb identifier (path segment after `/movie/` or `/tv/`)
    pub external_id: Option<String>,

    /// Media type of `external_id`
    pub media_type: MediaType,

    /// Film title (`h1.headline-1`)
    pub title: Option<String>,

    /// Release year (`span.year`)
    pub year: Option<String>,
}

impl ItemDetail {
    /// Creates a detail with nothing resolved
    pub fn unresolved(detail_url: impl Into<String>) -> Self {
        Self {
            detail_url: detail_url.into(),
            ..Self::default()
        }
    }

    /// Returns true when a TMDb id and a known media type were found
    pub fn is_resolved(&self) -> bool {
        self.external_id.is_some() && self.media_type != MediaType::Unknown
    }

    /// Numeric TMDb id, when the extracted segment is a decimal number
    pub fn tmdb_id(&self) -> Option<u64> {
        self.external_id.as_deref().and_then(|id| id.parse().ok())
    }
}
