/// ZeroSSL client configuration
use secrecy::{ExposeSecret, SecretString};

/// Production ZeroSSL REST API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.zerossl.com";

/// Page size used when walking every certificate during cleanup
pub const DEFAULT_CLEANUP_PAGE_SIZE: u32 = 100;

/// ZeroSSL client configuration
#[derive(Debug, Clone)]
pub struct ZeroSslConfig {
    /// API base URL
    pub base_url: String,

    /// API access key, sent as the `access_key` query parameter
    pub api_key: SecretString,

    /// Page size used by the cleanup walker
    pub cleanup_page_size: u32,

    /// Optional `User-Agent` header value
    pub user_agent: Option<String>,
}

impl ZeroSslConfig {
    /// Create a configuration targeting the production API
    ///
    /// # Example
    ///
    /// ```
    /// use armature_zerossl::ZeroSslConfig;
    ///
    /// let config = ZeroSslConfig::new("my-access-key");
    /// assert_eq!(config.base_url, "https://api.zerossl.com");
    /// ```
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: SecretString::new(api_key.into().into()),
            cleanup_page_size: DEFAULT_CLEANUP_PAGE_SIZE,
            user_agent: None,
        }
    }

    /// Point the client at a different API endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the page size used by the cleanup walker
    ///
    /// A size of zero is clamped to one.
    pub fn with_cleanup_page_size(mut self, page_size: u32) -> Self {
        self.cleanup_page_size = page_size.max(1);
        self
    }

    /// Set the `User-Agent` header sent with every request
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}
