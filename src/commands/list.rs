//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::loader::ContentLoader;
use crate::content::{normalize_posts, NormalizedPost};
use crate::Blog;

/// One line of the post listing
///
/// Posts without a slug are still served from their file path and are
/// marked as legacy URLs.
fn post_line(post: &NormalizedPost) -> String {
    format!(
        "  {} - {} [{}]{}{}",
        post.display_date(),
        post.title().unwrap_or("Untitled"),
        post.url().unwrap_or_default(),
        if post.is_draft() { " (draft)" } else { "" },
        if post.slug.is_none() { " (legacy url)" } else { "" },
    )
}

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, drafts: bool) -> Result<()> {
    let loaded = ContentLoader::new(blog).load_posts()?;
    let posts: Vec<_> = normalize_posts(Some(&loaded))
        .into_iter()
        .filter(|p| drafts || !p.is_draft())
        .collect();

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!("{}", post_line(post));
            }
        }
        "tag" | "tags" => {
            let mut tags: HashMap<&str, usize> = HashMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *tags.entry(tag.as_str()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "author" | "authors" => {
            let mut authors: HashMap<&str, usize> = HashMap::new();
            for post in &posts {
                if let Some(author) = &post.author {
                    *authors.entry(author.as_str()).or_insert(0) += 1;
                }
            }
            println!("Authors ({}):", authors.len());
            let mut authors: Vec<_> = authors.into_iter().collect();
            authors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            for (author, count) in authors {
                println!("  {} ({})", author, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, author",
                content_type
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_list_types() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        std::fs::create_dir_all(&blog.content_dir).unwrap();
        std::fs::write(
            blog.content_dir.join("p.md"),
            "---\ntitle: P\nauthor: Ada\ntags: [x]\ndraft: true\n---\n",
        )
        .unwrap();

        assert!(run(&blog, "post", false).is_ok());
        assert!(run(&blog, "tags", true).is_ok());
        assert!(run(&blog, "authors", true).is_ok());
        assert!(run(&blog, "categories", false).is_err());
    }

    #[test]
    fn test_post_lines() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        std::fs::create_dir_all(&blog.content_dir).unwrap();
        std::fs::write(
            blog.content_dir.join("a-slugged.md"),
            "---\ntitle: Slugged\nslug: hello\npublishedAt: 2024-01-15\n---\n",
        )
        .unwrap();
        std::fs::write(
            blog.content_dir.join("b-old-post.md"),
            "---\ntitle: Old One\ndraft: true\n---\n",
        )
        .unwrap();

        let loaded = ContentLoader::new(&blog).load_posts().unwrap();
        let lines: Vec<_> = normalize_posts(Some(&loaded)).iter().map(post_line).collect();
        assert_eq!(
            lines,
            vec![
                "  January 15, 2024 - Slugged [/blog/hello]".to_string(),
                "   - Old One [/blog/b-old-post] (draft) (legacy url)".to_string(),
            ]
        );
    }
}
