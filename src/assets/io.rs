use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{Result, ViewerError};

/// Local file reader, rooted at the directory of the source asset.
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.extension().is_some() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ViewerError::AssetNotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        Err(ViewerError::AssetNotFound(format!(
            "{} (no file system in the browser, use an http(s) URL)",
            self.root_path.join(uri).display()
        )))
    }
}

/// HTTP reader, rooted at the "directory" of the source URL.
#[cfg(feature = "http")]
pub struct HttpAssetReader {
    root_url: url::Url,
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    pub fn new(url_str: &str) -> Result<Self> {
        let url = url::Url::parse(url_str)?;
        let root_url = if url.path().ends_with('/') {
            url
        } else {
            let mut u = url.clone();
            if let Ok(mut segments) = u.path_segments_mut() {
                segments.pop();
                segments.push("");
            }
            u
        };

        Ok(Self { root_url })
    }

    #[inline]
    #[must_use]
    pub fn root_url(&self) -> &url::Url {
        &self.root_url
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let url = self.root_url.join(uri)?;
        let response = ehttp::fetch_async(ehttp::Request::get(url.as_str()))
            .await
            .map_err(ViewerError::HttpError)?;
        if !response.ok {
            return Err(ViewerError::HttpResponseError { status: response.status });
        }
        Ok(response.bytes)
    }
}

/// Reader selected from the shape of the source string.
#[derive(Clone)]
pub enum AssetReaderVariant {
    File(Arc<FileAssetReader>),
    #[cfg(feature = "http")]
    Http(Arc<HttpAssetReader>),
}

impl AssetReaderVariant {
    pub fn from_source(source: &str) -> Result<Self> {
        if is_remote(source) {
            #[cfg(feature = "http")]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source)?)))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(ViewerError::HttpError(
                    "HTTP feature is not enabled. Enable it with `features = [\"http\"]`".to_string(),
                ))
            }
        } else {
            Ok(Self::File(Arc::new(FileAssetReader::new(source))))
        }
    }

    /// Reads `uri` relative to the reader's root.
    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            Self::File(r) => r.read_bytes(uri).await,
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri).await,
        }
    }

    /// Last path segment of `source`, the part read relative to the root.
    #[must_use]
    pub fn source_filename(source: &str) -> &str {
        if is_remote(source) {
            source.rsplit('/').next().unwrap_or(source)
        } else {
            Path::new(source).file_name().and_then(|s| s.to_str()).unwrap_or(source)
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
