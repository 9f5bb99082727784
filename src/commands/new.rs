//! Create a new post

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::helpers::{generate_slug, is_valid_slug};
use crate::Blog;

/// Front-matter written for a fresh post
#[derive(Serialize)]
struct NewPostHeader<'a> {
    title: &'a str,
    slug: &'a str,
    #[serde(rename = "publishedAt")]
    published_at: String,
    author: &'a str,
    tags: Vec<String>,
    draft: bool,
}

/// Create a new post whose front-matter already carries its slug
pub fn create_post(blog: &Blog, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(slug) if !is_valid_slug(slug) => {
            anyhow::bail!("Invalid slug {:?}: use lowercase words joined by hyphens", slug)
        }
        Some(slug) => slug.to_string(),
        None => generate_slug(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    fs::create_dir_all(&blog.content_dir)
        .with_context(|| format!("Failed to create {:?}", blog.content_dir))?;

    let file_path = blog.content_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let header = NewPostHeader {
        title,
        slug: &slug,
        published_at: chrono::Local::now().format("%Y-%m-%d").to_string(),
        author: &blog.config.author,
        tags: Vec::new(),
        draft: true,
    };
    let yaml = serde_yaml::to_string(&header).context("Failed to serialize front-matter")?;
    let content = format!("---\n{}---\n\n", yaml);

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}
