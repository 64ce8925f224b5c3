//! Session-cached view of the backend's platform directory.

use downpour_core::{FileType, PlatformInfo};
use downpour_gateway::{GatewayResult, RpcGateway};
use tokio::sync::OnceCell;

/// Fetches the platform list once per session and answers filtered lookups
/// from the cache; the directory is never mutated by this core.
pub struct PlatformDirectory {
    gateway: RpcGateway,
    cache: OnceCell<Vec<PlatformInfo>>,
}

impl PlatformDirectory {
    /// Create an empty directory; the first lookup populates the cache.
    #[must_use]
    pub fn new(gateway: RpcGateway) -> Self {
        Self {
            gateway,
            cache: OnceCell::new(),
        }
    }

    /// Every platform the backend reports.
    ///
    /// # Errors
    ///
    /// Returns the gateway error of the initial fetch; later calls are
    /// served from the cache and cannot fail.
    pub async fn all(&self) -> GatewayResult<Vec<PlatformInfo>> {
        let platforms = self
            .cache
            .get_or_try_init(|| self.gateway.list_platforms())
            .await?;
        Ok(platforms.clone())
    }

    /// Platforms currently enabled for searching.
    ///
    /// # Errors
    ///
    /// Returns the gateway error of the initial fetch.
    pub async fn enabled(&self) -> GatewayResult<Vec<PlatformInfo>> {
        let mut platforms = self.all().await?;
        platforms.retain(|platform| platform.is_enabled);
        Ok(platforms)
    }

    /// Enabled platforms that can serve the given file type.
    ///
    /// # Errors
    ///
    /// Returns the gateway error of the initial fetch.
    pub async fn by_file_type(&self, file_type: FileType) -> GatewayResult<Vec<PlatformInfo>> {
        let mut platforms = self.enabled().await?;
        platforms.retain(|platform| platform.supports(file_type));
        Ok(platforms)
    }
}
