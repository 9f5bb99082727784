//! Content module - posts, front-matter and post normalization

mod frontmatter;
mod header;
pub mod loader;
mod post;

pub use frontmatter::FrontMatter;
pub use header::Header;
pub use post::{normalize_post, normalize_posts, NormalizedPost, Post, PostMeta};
