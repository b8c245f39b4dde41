//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during a run:
//! - GET of the homepage, kept as raw bytes plus its final URL
//! - HEAD reachability probes with a short bound
//! - GET of linked resources as opaque bytes, whatever their Content-Type
//!
//! Every request carries an explicit timeout. Nothing is retried.

use crate::config::FetcherConfig;
use crate::CloneError;
use reqwest::{Client, StatusCode};
use url::Url;

/// The fetched homepage
#[derive(Debug, Clone)]
pub struct HomePage {
    /// URL the response was served from, after redirects
    pub url: Url,
    /// Response body exactly as received
    pub body: Vec<u8>,
}

impl HomePage {
    /// Body decoded as text for HTML parsing
    pub fn html(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP fetcher holding the clients for one run
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    probe_client: Client,
    config: FetcherConfig,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the client used for HEAD probes, with the connect phase bounded
/// by the probe timeout
fn build_probe_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.probe_timeout())
        .build()
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, CloneError> {
        let client = build_http_client(config)
            .map_err(|source| CloneError::from_reqwest("<client>", source))?;
        let probe_client = build_probe_client(config)
            .map_err(|source| CloneError::from_reqwest("<client>", source))?;

        Ok(Self {
            client,
            probe_client,
            config: config.clone(),
        })
    }

    /// Fetches the homepage
    ///
    /// # Returns
    ///
    /// * `Ok(HomePage)` - Body and final URL of a 2xx response
    /// * `Err(CloneError::Timeout)` - The request exceeded the homepage timeout
    /// * `Err(CloneError::HttpStatus)` - The server answered with a non-2xx status
    /// * `Err(CloneError::Fetch)` - Any other network or protocol failure
    pub async fn fetch_document(&self, url: &str) -> Result<HomePage, CloneError> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.homepage_timeout())
            .send()
            .await
            .map_err(|e| CloneError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CloneError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| CloneError::from_reqwest(url, e))?;

        Ok(HomePage {
            url: final_url,
            body: body.to_vec(),
        })
    }

    /// Sends a HEAD request to decide whether a link is worth downloading
    ///
    /// Returns true only when the final status is exactly 200. Any error,
    /// including a timeout, yields false.
    pub async fn validate_reachable(&self, url: &str) -> bool {
        // reqwest has no read timeout: the client bounds the connect phase
        // and this per-request timeout bounds the whole exchange
        let result = self
            .probe_client
            .head(url)
            .timeout(self.config.probe_timeout())
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                tracing::debug!("Probe of {} returned {}", url, response.status());
                false
            }
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }

    /// Downloads a linked resource as opaque bytes
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - Body of a 2xx response
    /// * `Err(CloneError::Timeout)` - The download exceeded its timeout
    /// * `Err(CloneError::HttpStatus)` - The server answered with a non-2xx status
    /// * `Err(CloneError::Fetch)` - Any other network or protocol failure
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CloneError> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.download_timeout())
            .send()
            .await
            .map_err(|e| CloneError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CloneError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CloneError::from_reqwest(url, e))?;

        Ok(body.to_vec())
    }
}
