//! Content provider port.
//!
//! Providers turn a link into rendered markup (previews, embeds). The
//! pipeline races every enabled provider per link and keeps the first
//! successful, non-empty result.

use async_trait::async_trait;
use url::Url;

use crate::shared::error::ChatError;

/// Rendered result produced by a provider for one link.
#[derive(Debug, Clone)]
pub struct ProviderContent {
    /// Short title for the resolved resource
    pub title: Option<String>,
    /// Rendered markup to append to the message
    pub markup: String,
}

/// Contract every content provider implements.
///
/// `is_valid_content` is a cheap synchronous domain/prefix match;
/// `get_content` may do network I/O and must not panic across this
/// boundary. A fault or timeout is treated as "no result".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Provider name, used for configuration and logging.
    fn name(&self) -> &'static str;

    /// Cheap check whether this provider can handle the link at all.
    fn is_valid_content(&self, url: &Url) -> bool;

    /// Fetch and render the link. `Ok(None)` means "nothing to show".
    async fn get_content(&self, url: &Url) -> Result<Option<ProviderContent>, ChatError>;
}
