//! blogkit: slug, post-metadata and image helpers for a content-driven blog
//!
//! This crate carries the logic a blog front end leans on while rendering:
//! URL slugs, flattened post metadata, memoized image existence checks, and
//! a maintenance command that backfills missing slugs into post front-matter.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;

use anyhow::Result;
use std::path::Path;

/// The blog site being worked on
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Markdown posts directory
    pub content_dir: std::path::PathBuf,
    /// Static assets directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog instance with an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Image cache backed by the local public directory
    pub fn image_cache(&self) -> cache::ImageCache<cache::FsProbe> {
        let probe = cache::FsProbe::new(&self.public_dir);
        match self.config.image_cache.ttl() {
            Some(ttl) => cache::ImageCache::with_expiry(probe, ttl),
            None => cache::ImageCache::new(probe),
        }
    }

    /// Image cache that asks the deployed site at `config.url`
    pub fn remote_image_cache(&self) -> Result<cache::ImageCache<cache::HttpProbe>> {
        let probe = cache::HttpProbe::new(&self.config.url)?;
        Ok(match self.config.image_cache.ttl() {
            Some(ttl) => cache::ImageCache::with_expiry(probe, ttl),
            None => cache::ImageCache::new(probe),
        })
    }

    /// Backfill missing slugs into post front-matter
    pub fn backfill_slugs(&self) -> Result<commands::slugs::BackfillSummary> {
        commands::slugs::run(self)
    }
}
