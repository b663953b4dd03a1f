//! Caption augmenter: turns an image reference into an `alt` text.

use tracing::debug;

use crate::capability::{Captioner, ImageFetcher};
use crate::error::{CapabilityError, PipelineError};

/// Output key of the generated caption.
pub const ALT_FIELD: &str = "alt";

/// Caption the image at `url`.
///
/// An empty URL means no image: returns `Ok(None)` without touching the
/// network. Otherwise the image is downloaded and fully decoded before it is
/// captioned, so truncated or corrupt bodies never reach the captioner.
pub async fn augment_caption(
    url: &str,
    fetcher: &dyn ImageFetcher,
    captioner: &dyn Captioner,
) -> Result<Option<String>, PipelineError> {
    if url.is_empty() {
        debug!("No image reference, skipping caption");
        return Ok(None);
    }

    let bytes = fetcher.fetch(url).await?;
    let mime = decoded_mime(url, &bytes)?;

    let caption = captioner.caption(&bytes, mime).await?;
    debug!("Generated caption for {} ({} bytes)", url, bytes.len());

    Ok(Some(caption))
}

/// Decode `bytes` and return the mime type of their format.
fn decoded_mime(url: &str, bytes: &[u8]) -> Result<&'static str, CapabilityError> {
    let invalid = |e: image::ImageError| CapabilityError::InvalidInput {
        capability: "captioning",
        detail: format!("{} is not a decodable image: {}", url, e),
    };

    let decoded = image::load_from_memory(bytes).map_err(invalid)?;
    let format = image::guess_format(bytes).map_err(invalid)?;
    debug!(
        "Decoded {}x{} {:?} image from {}",
        decoded.width(),
        decoded.height(),
        format,
        url
    );

    Ok(format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::mock::{MockCaptioner, MockFetcher, PNG_BYTES};

    #[tokio::test]
    async fn test_empty_url_skips_network() {
        let fetcher = MockFetcher::serving(PNG_BYTES);
        let captioner = MockCaptioner::new("a park");

        let caption = augment_caption("", &fetcher, &captioner).await.unwrap();

        assert!(caption.is_none());
        assert!(fetcher.calls().is_empty());
        assert!(captioner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_caption_generated() {
        let fetcher = MockFetcher::serving(PNG_BYTES);
        let captioner = MockCaptioner::new("people planting trees");

        let caption = augment_caption("https://img.example.com/e.png", &fetcher, &captioner)
            .await
            .unwrap();

        assert_eq!(caption.as_deref(), Some("people planting trees"));
        assert_eq!(fetcher.calls(), vec!["https://img.example.com/e.png".to_string()]);
        assert_eq!(captioner.calls(), vec!["image/png".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_network_error() {
        let fetcher = MockFetcher::not_found();
        let captioner = MockCaptioner::new("unused");

        let err = augment_caption("https://img.example.com/gone.png", &fetcher, &captioner)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Network(_)));
        assert!(captioner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_image_behind_valid_signature_rejected() {
        let fetcher = MockFetcher::serving(b"\x89PNG\r\n\x1a\ngarbage-not-an-image");
        let captioner = MockCaptioner::new("unused");

        let err = augment_caption("https://img.example.com/broken.png", &fetcher, &captioner)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Capability(CapabilityError::InvalidInput { .. })
        ));
        assert!(captioner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_truncated_image_rejected() {
        let fetcher = MockFetcher::serving(&PNG_BYTES[..PNG_BYTES.len() - 20]);
        let captioner = MockCaptioner::new("unused");

        let err = augment_caption("https://img.example.com/cut.png", &fetcher, &captioner)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Capability(CapabilityError::InvalidInput { .. })
        ));
        assert!(captioner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_image_bytes_rejected() {
        let fetcher = MockFetcher::serving(b"<html>not an image</html>");
        let captioner = MockCaptioner::new("unused");

        let err = augment_caption("https://img.example.com/page", &fetcher, &captioner)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Capability(CapabilityError::InvalidInput { .. })
        ));
        assert!(captioner.calls().is_empty());
    }
}
