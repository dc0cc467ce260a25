//! Client configuration.

use bon::Builder;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://www1.river.go.jp";
pub const DEFAULT_CHARSET: &str = "EUC-JP";
pub const DEFAULT_MAX_FRAME_ATTEMPTS: u32 = 20;

/// Settings for a [`crate::Wis`] client.
///
/// Every field has a default, so `WisConfig::builder().build()` (or
/// [`WisConfig::default`]) targets the public portal.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wis_scraper::WisConfig;
///
/// let config = WisConfig::builder()
///     .timeout(Duration::from_secs(60))
///     .max_frame_attempts(5)
///     .build();
/// assert_eq!(config.base_url, "http://www1.river.go.jp");
/// assert_eq!(config.max_frame_attempts, 5);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct WisConfig {
    /// Scheme and host of the portal, without a trailing path.
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,
    #[builder(default = concat!("wis-scraper/", env!("CARGO_PKG_VERSION")).to_string(), into)]
    pub user_agent: String,
    /// Per-request timeout.
    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,
    /// Charset used to decode bodies whose response does not declare one.
    #[builder(default = DEFAULT_CHARSET.to_string(), into)]
    pub default_charset: String,
    /// Attempts made at each month's dam data frame before the month is skipped.
    #[builder(default = DEFAULT_MAX_FRAME_ATTEMPTS)]
    pub max_frame_attempts: u32,
}

impl Default for WisConfig {
    fn default() -> Self {
        WisConfig::builder().build()
    }
}
