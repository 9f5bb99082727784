//! Slug helpers: generation, validation and post URL resolution

use lazy_static::lazy_static;
use regex::Regex;

/// Route prefix for posts addressed by slug
pub const BLOG_ROUTE: &str = "/blog";

lazy_static! {
    static ref SPECIAL_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[\s_-]+").unwrap();
    static ref EDGE_HYPHENS: Regex = Regex::new(r"^-+|-+$").unwrap();
    static ref SLUG_PATTERN: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Generate a URL-friendly slug from a title
///
/// # Examples
/// ```ignore
/// generate_slug("Hello, World!") // -> "hello-world"
/// ```
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = SPECIAL_CHARS.replace_all(lowered.trim(), "");
    let joined = SEPARATORS.replace_all(&stripped, "-");
    EDGE_HYPHENS.replace_all(&joined, "").into_owned()
}

/// Check whether a string is lowercase kebab-case
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.is_match(slug)
}

/// An identifier taken from a post URL segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostId {
    /// A generated slug (`my-post-1`)
    Slug(String),
    /// A legacy filename-derived id (`my-post.md`, `My_Post`)
    Filename(String),
}

impl PostId {
    pub fn kind(&self) -> &'static str {
        match self {
            PostId::Slug(_) => "slug",
            PostId::Filename(_) => "filename",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            PostId::Slug(value) | PostId::Filename(value) => value,
        }
    }
}

/// Classify a URL segment as a slug or a filename-based id
pub fn parse_post_id(id: &str) -> PostId {
    if is_valid_slug(id) && !id.contains('.') {
        PostId::Slug(id.to_string())
    } else {
        PostId::Filename(id.to_string())
    }
}

/// Resolve the URL of a post, preferring its slug over its structural path
pub fn post_url(slug: Option<&str>, path: Option<&str>) -> Option<String> {
    match slug.filter(|s| !s.is_empty()) {
        Some(slug) => Some(format!("{}/{}", BLOG_ROUTE, slug)),
        None => path.map(str::to_string),
    }
}
