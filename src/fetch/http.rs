use crate::config::WisConfig;
use crate::fetch::error::FetchError;
use crate::fetch::Transport;
use log::{debug, warn};
use reqwest::blocking::Client;

/// [`Transport`] backed by a blocking `reqwest` client.
///
/// Bodies are decoded with the charset declared by the response, falling
/// back to the configured default (the portal serves EUC-JP pages without
/// always saying so in the headers).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    default_charset: String,
}

impl HttpTransport {
    pub fn new(config: &WisConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            default_charset: config.default_charset.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} for {}", status, url);
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let text = response
            .text_with_charset(&self.default_charset)
            .map_err(|e| FetchError::Body(url.to_string(), e))?;
        debug!("Received {} bytes from {}", text.len(), url);
        Ok(text)
    }
}
