//! Client configuration

/// Client configuration for connecting to the inspection store and the
/// object-upload endpoint
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Store base URL (e.g., "http://127.0.0.1:5000")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Object-upload endpoint URL (e.g., a Cloudinary image upload URL)
    pub upload_url: Option<String>,

    /// Unsigned upload preset sent with each object upload
    pub upload_preset: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            upload_url: None,
            upload_preset: None,
        }
    }

    /// Load configuration from the environment (`.env` honored)
    ///
    /// `SITECHECK_BASE_URL` is required; `SITECHECK_TOKEN`,
    /// `SITECHECK_UPLOAD_URL` and `SITECHECK_UPLOAD_PRESET` are optional.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        dotenv::dotenv().ok();

        let mut config = Self::new(std::env::var("SITECHECK_BASE_URL")?);
        if let Ok(token) = std::env::var("SITECHECK_TOKEN") {
            config.token = Some(token);
        }
        if let Ok(url) = std::env::var("SITECHECK_UPLOAD_URL") {
            config.upload_url = Some(url);
        }
        if let Ok(preset) = std::env::var("SITECHECK_UPLOAD_PRESET") {
            config.upload_preset = Some(preset);
        }
        Ok(config)
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the object-upload endpoint and preset
    pub fn with_upload(
        mut self,
        url: impl Into<String>,
        preset: impl Into<String>,
    ) -> Self {
        self.upload_url = Some(url.into());
        self.upload_preset = Some(preset.into());
        self
    }

    /// Create a store client from this configuration
    pub fn build_store_client(&self) -> Result<super::HttpStoreClient, super::ClientError> {
        super::HttpStoreClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5000")
    }
}
