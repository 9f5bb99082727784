//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    /// Base URL; remote image probes resolve image paths against it
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Images
    #[serde(default)]
    pub image_cache: ImageCacheConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://localhost:3000".to_string(),

            content_dir: "content/blog".to_string(),
            public_dir: "public".to_string(),

            image_cache: ImageCacheConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }
}

/// Image existence cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCacheConfig {
    /// Seconds before a cached lookup is re-probed; unset keeps entries for
    /// the life of the process
    pub expiry: Option<u64>,
}

impl ImageCacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.expiry.map(Duration::from_secs)
    }
}
