//! Existence probes backing the image cache

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Why a probe could not answer
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Path escapes the asset root: {0}")]
    InvalidPath(String),
}

/// Checks whether an asset path exists
///
/// Implementations are picked by the host when the cache is built: the
/// filesystem for server-side rendering, HTTP for a deployed site.
pub trait ExistenceProbe: Send + Sync {
    fn probe(&self, path: &str) -> impl Future<Output = Result<bool, ProbeError>> + Send;
}

/// Looks assets up under the local public directory
#[derive(Debug, Clone)]
pub struct FsProbe {
    public_dir: PathBuf,
}

impl FsProbe {
    pub fn new<P: AsRef<Path>>(public_dir: P) -> Self {
        Self {
            public_dir: public_dir.as_ref().to_path_buf(),
        }
    }

    /// Map a URL path (`/images/a.png`) onto the public directory
    fn resolve(&self, path: &str) -> Result<PathBuf, ProbeError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ProbeError::InvalidPath(path.to_string()));
        }
        Ok(self.public_dir.join(relative))
    }
}

impl ExistenceProbe for FsProbe {
    async fn probe(&self, path: &str) -> Result<bool, ProbeError> {
        let full_path = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&full_path).await?)
    }
}

/// Sends a `HEAD` request for the asset to the site
///
/// Any 2xx status means the asset exists; other statuses mean it does not.
/// There is no HTTP response cache here, so every call goes to the network.
/// Wrap the probe in an [`ImageCache`](super::ImageCache) to answer repeat
/// lookups locally.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpProbe {
    pub fn new(base_url: &str) -> Result<Self, ProbeError> {
        Ok(Self::with_client(reqwest::Client::new(), base_url.parse()?))
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn resolve(&self, path: &str) -> Result<Url, ProbeError> {
        Ok(self.base_url.join(path)?)
    }
}

impl ExistenceProbe for HttpProbe {
    async fn probe(&self, path: &str) -> Result<bool, ProbeError> {
        let url = self.resolve(path)?;
        let response = self.client.head(url).send().await?;
        tracing::debug!("HEAD {} -> {}", path, response.status());
        Ok(response.status().is_success())
    }
}
