//! Configuration module

mod site;

pub use site::ImageCacheConfig;
pub use site::SiteConfig;
