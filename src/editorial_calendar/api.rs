use super::error::CalendarError;
use crate::config::model::Config;
use futures::future::BoxFuture;
use futures::FutureExt;
use lazy_static::lazy_static;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, trace};

lazy_static! {
    static ref HTTP_CLIENT: Client = Client::new();
}

/// Where the raw calendar document comes from.
///
/// Implementations only fetch the body; parsing and normalization happen in the cache.
pub trait CalendarSource: Send + Sync + Debug {
    /// `bypass_cache` asks intermediaries for the freshest copy, set on periodic refreshes
    fn fetch(&self, bypass_cache: bool) -> BoxFuture<'_, Result<String, CalendarError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

impl SourceLocation {
    /**
    Resolves the configured location:
    * `http://` / `https://` is used as is
    * a path starting with `/` is relative to the site origin
    * `file://` or anything else is a filesystem path
    */
    pub fn resolve(raw: &str, site_origin: &str) -> Self {
        let raw = raw.trim();

        if raw.starts_with("http://") || raw.starts_with("https://") {
            SourceLocation::Url(raw.to_string())
        } else if let Some(path) = raw.strip_prefix("file://") {
            SourceLocation::File(PathBuf::from(path))
        } else if raw.starts_with('/') {
            SourceLocation::Url(format!("{}{}", site_origin.trim_end_matches('/'), raw))
        } else {
            SourceLocation::File(PathBuf::from(raw))
        }
    }
}

pub fn source_from_config(config: &Config) -> Arc<dyn CalendarSource> {
    match SourceLocation::resolve(&config.source_location, &config.site_origin) {
        SourceLocation::Url(url) => {
            info!("Editorial calendar source is {}", url);
            Arc::new(HttpSource::new(url, config.max_retries))
        }
        SourceLocation::File(path) => {
            info!("Editorial calendar source is file {}", path.display());
            Arc::new(FileSource::new(path))
        }
    }
}

#[derive(Debug)]
pub struct HttpSource {
    url: String,
    client: ClientWithMiddleware,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, max_retries: u32) -> Self {
        let client = ClientBuilder::new(HTTP_CLIENT.clone())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(max_retries),
            ))
            .build();

        Self {
            url: url.into(),
            client,
        }
    }

    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn get(&self, bypass_cache: bool) -> Result<String, CalendarError> {
        trace!("Fetching editorial calendar");

        let mut request = self.client.get(&self.url);

        if bypass_cache {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = request
            .send()
            .await
            .map_err(|source| CalendarError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();

        if !status.is_success() {
            return Err(CalendarError::Status(status));
        }

        Ok(response.text().await?)
    }
}

impl CalendarSource for HttpSource {
    fn fetch(&self, bypass_cache: bool) -> BoxFuture<'_, Result<String, CalendarError>> {
        self.get(bypass_cache).boxed()
    }
}

#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn read(&self) -> Result<String, CalendarError> {
        trace!("Reading editorial calendar");

        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CalendarError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

impl CalendarSource for FileSource {
    /// Files have no intermediate cache, so `bypass_cache` is irrelevant
    fn fetch(&self, _bypass_cache: bool) -> BoxFuture<'_, Result<String, CalendarError>> {
        self.read().boxed()
    }
}
