//! Check whether referenced images exist

use anyhow::Result;
use indexmap::IndexSet;

use crate::cache::{ExistenceProbe, ImageCache};
use crate::content::loader::ContentLoader;
use crate::content::normalize_posts;
use crate::Blog;

/// Check images, either the given paths or every post's cover image
///
/// Returns the paths found missing.
pub async fn run(blog: &Blog, paths: &[String], remote: bool) -> Result<Vec<String>> {
    let paths = if paths.is_empty() {
        post_images(blog)?
    } else {
        paths.to_vec()
    };

    if remote {
        check_all(&blog.remote_image_cache()?, &paths).await
    } else {
        check_all(&blog.image_cache(), &paths).await
    }
}

/// Cover images referenced by posts, in post order
fn post_images(blog: &Blog) -> Result<Vec<String>> {
    let posts = ContentLoader::new(blog).load_posts()?;
    let images: IndexSet<String> = normalize_posts(Some(&posts))
        .into_iter()
        .filter_map(|p| p.image)
        .collect();
    Ok(images.into_iter().collect())
}

async fn check_all<P: ExistenceProbe>(
    cache: &ImageCache<P>,
    paths: &[String],
) -> Result<Vec<String>> {
    let mut missing = Vec::new();

    for path in paths {
        if cache.check(path).await {
            println!("  found    {}", path);
        } else {
            println!("  missing  {}", path);
            missing.push(path.clone());
        }
    }

    println!(
        "Checked {} images ({} cached), {} missing",
        paths.len(),
        cache.len(),
        missing.len()
    );
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;

    #[tokio::test]
    async fn test_check_post_images() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(blog.public_dir.join("images")).unwrap();
        fs::write(blog.public_dir.join("images/a.png"), b"png").unwrap();
        fs::create_dir_all(&blog.content_dir).unwrap();
        fs::write(
            blog.content_dir.join("a.md"),
            "---\ntitle: A\nimage: /images/a.png\n---\n",
        )
        .unwrap();
        fs::write(
            blog.content_dir.join("b.md"),
            "---\ntitle: B\nimage: /images/b.png\n---\n",
        )
        .unwrap();

        let missing = run(&blog, &[], false).await.unwrap();
        assert_eq!(missing, vec!["/images/b.png".to_string()]);
    }

    #[tokio::test]
    async fn test_check_given_paths() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(&blog.public_dir).unwrap();
        fs::write(blog.public_dir.join("logo.svg"), b"<svg/>").unwrap();

        let paths = vec!["/logo.svg".to_string(), "/gone.svg".to_string()];
        let missing = run(&blog, &paths, false).await.unwrap();
        assert_eq!(missing, vec!["/gone.svg".to_string()]);
    }
}
