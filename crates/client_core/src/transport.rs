use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::ResultId,
    protocol::{ProcessOutcome, ProcessResponse, UploadRequest, DOWNLOAD_PATH, UPLOAD_PATH},
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::error::BackendError;

/// The remote processing server, reachable through `/upload` and
/// `/download/{id}`.
#[async_trait]
pub trait ProcessingBackend: Send + Sync {
    /// Performs exactly one `/upload` round trip.
    async fn process(&self, request: &UploadRequest) -> Result<ProcessOutcome, BackendError>;
    fn download_url(&self, result_id: &ResultId) -> Result<Url, BackendError>;
}

pub struct HttpProcessingBackend {
    http: Client,
    base_url: Url,
}

impl HttpProcessingBackend {
    pub fn new(server_url: &str, request_timeout: Option<Duration>) -> Result<Self, BackendError> {
        let base_url = normalize_base_url(server_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Ok(Self { http, base_url })
    }

    fn upload_url(&self) -> Result<Url, BackendError> {
        self.base_url
            .join(UPLOAD_PATH)
            .map_err(|err| BackendError::InvalidUrl(err.to_string()))
    }
}

#[async_trait]
impl ProcessingBackend for HttpProcessingBackend {
    async fn process(&self, request: &UploadRequest) -> Result<ProcessOutcome, BackendError> {
        let url = self.upload_url()?;
        debug!(%url, image_len = request.image.as_str().len(), "upload: posting image");
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body: ProcessResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Decode(err.to_string()))?;
        body.into_outcome()
            .map_err(|err| BackendError::Decode(err.to_string()))
    }

    fn download_url(&self, result_id: &ResultId) -> Result<Url, BackendError> {
        let mut url = self
            .base_url
            .join(&format!("{DOWNLOAD_PATH}/"))
            .map_err(|err| BackendError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push(result_id.as_str());
        Ok(url)
    }
}

/// Accepts `http(s)://host[:port][/prefix]` and guarantees a trailing `/` so
/// that endpoint paths join beneath the prefix.
pub fn normalize_base_url(server_url: &str) -> Result<Url, BackendError> {
    let trimmed = server_url.trim();
    let mut url =
        Url::parse(trimmed).map_err(|err| BackendError::InvalidUrl(format!("{trimmed}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BackendError::InvalidUrl(format!(
            "server_url must start with http:// or https://, got {trimmed}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Where a result download ends up. The controller only hands over a URL and
/// a suggested filename; it never reads the body.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn start_download(&self, url: &Url, filename: &str) -> Result<()>;
}

pub struct MissingDownloadSink;

#[async_trait]
impl DownloadSink for MissingDownloadSink {
    async fn start_download(&self, url: &Url, _filename: &str) -> Result<()> {
        Err(anyhow!("no download target available for {url}"))
    }
}

/// Streams the download into `output_dir/<filename>`.
pub struct HttpDownloadSink {
    http: Client,
    output_dir: PathBuf,
}

impl HttpDownloadSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            http: Client::new(),
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl DownloadSink for HttpDownloadSink {
    async fn start_download(&self, url: &Url, filename: &str) -> Result<()> {
        let mut response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("failed to create {}", self.output_dir.display()))?;
        let path = self.output_dir.join(filename);
        let partial = self.output_dir.join(format!("{filename}.part"));

        let written = match stream_to_file(&mut response, &partial).await {
            Ok(written) => written,
            Err(err) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(err);
            }
        };
        if let Err(err) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err).with_context(|| format!("failed to move result to {}", path.display()));
        }

        info!(path = %path.display(), bytes = written, "download: saved result");
        Ok(())
    }
}

/// Writes the whole body to `path`; the caller renames it into place.
async fn stream_to_file(response: &mut reqwest::Response, path: &Path) -> Result<usize> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut written = 0usize;
    while let Some(chunk) = response
        .chunk()
        .await
        .context("download body ended early")?
    {
        file.write_all(&chunk).await?;
        written += chunk.len();
    }
    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url("http://127.0.0.1:5000").expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/");

        let prefixed = normalize_base_url("https://example.test/toon").expect("url");
        assert_eq!(prefixed.join("upload").expect("join").path(), "/toon/upload");
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(matches!(
            normalize_base_url("ws://127.0.0.1:5000"),
            Err(BackendError::InvalidUrl(_))
        ));
    }

    #[test]
    fn download_url_is_built_from_result_id() {
        let backend = HttpProcessingBackend::new("http://127.0.0.1:5000", None).expect("backend");
        let url = backend
            .download_url(&ResultId::new("abc123"))
            .expect("download url");
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/download/abc123");
    }

    #[test]
    fn download_url_escapes_path_separators_in_ids() {
        let backend = HttpProcessingBackend::new("http://127.0.0.1:5000/", None).expect("backend");
        let url = backend
            .download_url(&ResultId::new("a/b"))
            .expect("download url");
        assert_eq!(url.path(), "/download/a%2Fb");
    }
}
