//! Post records and their normalized form

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::helpers::{format_date, post_url};

/// Top-level keys a normalized post takes from `meta`
const HOISTED_KEYS: [&str; 6] = ["slug", "publishedAt", "author", "tags", "image", "draft"];

/// Recognized post metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(rename = "publishedAt", default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,

    /// Any other metadata
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A loosely structured post as produced by the content layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Content-managed fields (`title`, `path`, `description`, ...)
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PostMeta>,
}

impl Post {
    /// Get a top-level string field
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.field_str("title")
    }

    /// Structural path of the post (`path`, or the legacy `_path`)
    pub fn path(&self) -> Option<&str> {
        self.field_str("path").or_else(|| self.field_str("_path"))
    }

    /// Canonical URL: `/blog/<slug>` when a slug is known, else the path
    pub fn url(&self) -> Option<String> {
        let slug = self
            .field_str("slug")
            .filter(|s| !s.is_empty())
            .or_else(|| self.meta.as_ref().and_then(|m| m.slug.as_deref()));
        post_url(slug, self.path())
    }

    /// Produce the flattened form of this post
    pub fn normalize(&self) -> NormalizedPost {
        let mut fields = self.fields.clone();
        for key in HOISTED_KEYS {
            fields.shift_remove(key);
        }

        let meta = self.meta.as_ref();
        let text = |value: Option<&String>| value.filter(|s| !s.is_empty()).cloned();

        NormalizedPost {
            fields,
            slug: text(meta.and_then(|m| m.slug.as_ref())),
            published_at: text(meta.and_then(|m| m.published_at.as_ref())),
            author: text(meta.and_then(|m| m.author.as_ref())),
            tags: meta.and_then(|m| m.tags.clone()).unwrap_or_default(),
            image: text(meta.and_then(|m| m.image.as_ref())),
            draft: meta.and_then(|m| m.draft).unwrap_or(false),
            meta: self.meta.clone(),
        }
    }
}

/// A post with its commonly used metadata hoisted to the top level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPost {
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,

    pub slug: Option<String>,

    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,

    pub author: Option<String>,

    pub tags: Vec<String>,

    pub image: Option<String>,

    pub draft: bool,

    /// The original metadata, untouched
    pub meta: Option<PostMeta>,
}

impl NormalizedPost {
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    pub fn path(&self) -> Option<&str> {
        self.fields
            .get("path")
            .or_else(|| self.fields.get("_path"))
            .and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<String> {
        post_url(self.slug.as_deref(), self.path())
    }

    pub fn is_draft(&self) -> bool {
        self.draft
    }

    /// Publication date for display (like "January 15, 2024")
    pub fn display_date(&self) -> String {
        format_date(self.published_at.as_deref())
    }
}

/// Normalize a single post; a missing post stays missing
pub fn normalize_post(post: Option<&Post>) -> Option<NormalizedPost> {
    post.map(Post::normalize)
}

/// Normalize a list of posts; a missing list gives an empty one
pub fn normalize_posts(posts: Option<&[Post]>) -> Vec<NormalizedPost> {
    posts
        .map(|posts| posts.iter().map(Post::normalize).collect())
        .unwrap_or_default()
}
