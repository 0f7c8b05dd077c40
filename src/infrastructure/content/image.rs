//! Inline Image Content Provider
//!
//! Renders direct image links as inline `<img>` markup. Pure string
//! work; the client fetches the image itself.

use async_trait::async_trait;
use url::Url;

use crate::domain::content::{ContentProvider, ProviderContent};
use crate::shared::error::ChatError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

pub struct ImageContentProvider;

impl ImageContentProvider {
    fn extension(url: &Url) -> Option<String> {
        let path = url.path();
        let (_, ext) = path.rsplit_once('.')?;
        Some(ext.to_lowercase())
    }
}

#[async_trait]
impl ContentProvider for ImageContentProvider {
    fn name(&self) -> &'static str {
        "image"
    }

    fn is_valid_content(&self, url: &Url) -> bool {
        Self::extension(url)
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    async fn get_content(&self, url: &Url) -> Result<Option<ProviderContent>, ChatError> {
        if !self.is_valid_content(url) {
            return Ok(None);
        }
        let title = url
            .path_segments()
            .and_then(|segments| segments.last())
            .map(|name| name.to_string());
        Ok(Some(ProviderContent {
            title,
            markup: format!("<img src=\"{}\" alt=\"\" />", url),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_renders_image_links() {
        let provider = ImageContentProvider;
        let url = Url::parse("https://example.com/pics/cat.PNG").unwrap();

        assert!(provider.is_valid_content(&url));
        let content = provider.get_content(&url).await.unwrap().unwrap();
        assert!(content.markup.contains("cat.PNG"));
        assert_eq!(content.title.as_deref(), Some("cat.PNG"));
    }

    #[tokio::test]
    async fn test_rejects_non_image_links() {
        let provider = ImageContentProvider;
        let url = Url::parse("https://example.com/article").unwrap();

        assert!(!provider.is_valid_content(&url));
        assert!(provider.get_content(&url).await.unwrap().is_none());
    }
}
