//! Content loader - loads posts from the content directory

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, Post};
use crate::helpers::BLOG_ROUTE;
use crate::Blog;

/// Loads posts from the content directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// Load all posts under the content directory
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let content_dir = &self.blog.content_dir;
        if !content_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => posts.push(post),
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {:#}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), content_dir);
        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let (fm, body) = FrontMatter::parse(&content)?;

        // Structural path mirrors the file layout: content/blog/a/b.md -> /blog/a/b
        let relative = path
            .strip_prefix(&self.blog.content_dir)
            .unwrap_or(path)
            .with_extension("");
        let route = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let title = fm.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let mut post = Post::default();
        post.fields.insert("title".into(), Value::String(title));
        if let Some(description) = &fm.description {
            post.fields
                .insert("description".into(), Value::String(description.clone()));
        }
        post.fields.insert(
            "path".into(),
            Value::String(format!("{}/{}", BLOG_ROUTE, route)),
        );
        post.fields
            .insert("body".into(), Value::String(body.trim().to_string()));

        let mut meta = fm.meta();
        let mut extra: Vec<_> = fm.extra.into_iter().collect();
        extra.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in extra {
            meta.extra.insert(key, serde_json::to_value(value)?);
        }
        post.meta = Some(meta);

        Ok(post)
    }
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn blog_in(dir: &Path) -> Blog {
        Blog::with_config(dir, SiteConfig::default())
    }

    #[test]
    fn test_load_posts() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path());
        fs::create_dir_all(&blog.content_dir).unwrap();
        fs::write(
            blog.content_dir.join("2024-first.md"),
            "---\ntitle: First Post\nslug: first-post\ntags: [a, b]\nseries: intro\n---\n\nHello.\n",
        )
        .unwrap();
        fs::write(blog.content_dir.join("notes.txt"), "ignored").unwrap();
        fs::write(blog.content_dir.join("untitled.md"), "No header here.\n").unwrap();

        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        assert_eq!(posts.len(), 2);

        let first = &posts[0];
        assert_eq!(first.title(), Some("First Post"));
        assert_eq!(first.path(), Some("/blog/2024-first"));
        assert_eq!(first.url().as_deref(), Some("/blog/first-post"));
        let meta = first.meta.as_ref().unwrap();
        assert_eq!(meta.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(meta.extra.get("series"), Some(&Value::from("intro")));

        let second = &posts[1];
        assert_eq!(second.title(), Some("untitled"));
        assert_eq!(second.url().as_deref(), Some("/blog/untitled"));
    }

    #[test]
    fn test_load_post_with_date_and_published_at() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path());
        fs::create_dir_all(&blog.content_dir).unwrap();
        fs::write(
            blog.content_dir.join("both.md"),
            "---\ntitle: A\ndate: 2024-01-01\npublishedAt: 2024-01-02\n---\nBody\n",
        )
        .unwrap();

        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        let meta = posts[0].meta.as_ref().unwrap();
        assert_eq!(meta.published_at.as_deref(), Some("2024-01-02"));
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_load_posts_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let posts = ContentLoader::new(&blog_in(dir.path())).load_posts().unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file(Path::new("a/b.md")));
        assert!(is_markdown_file(Path::new("post.markdown")));
        assert!(!is_markdown_file(Path::new("image.png")));
        assert!(!is_markdown_file(Path::new("README")));
    }
}
