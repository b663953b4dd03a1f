use async_trait::async_trait;
use tracing::debug;

use crate::capability::ImageFetcher;
use crate::error::NetworkError;

/// Downloads images over HTTP.
///
/// The timeout is owned by the `reqwest::Client`; an expired request is
/// reported as `NetworkError::Timeout`. Bodies larger than `max_bytes` are
/// rejected, from the declared length when present and while streaming
/// otherwise.
pub struct HttpImageFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpImageFetcher {
    pub fn new(client: reqwest::Client, max_bytes: u64) -> Self {
        Self { client, max_bytes }
    }

    fn too_large(&self, url: &str) -> NetworkError {
        NetworkError::TooLarge {
            url: url.to_string(),
            limit: self.max_bytes,
        }
    }
}

fn transport_error(url: &str, source: reqwest::Error) -> NetworkError {
    if source.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else {
        NetworkError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        debug!("Fetching image from {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        if !response.status().is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        if response
            .content_length()
            .is_some_and(|length| length > self.max_bytes)
        {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| transport_error(url, e))? {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}
